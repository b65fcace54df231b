use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    /// Major currency units, as a JSON number or numeric string.
    #[serde(default)]
    pub amount: Option<Value>,
}

impl CreateOrderRequest {
    /// The amount as text, or `None` if it is missing or not a number/string.
    pub fn amount_text(&self) -> Option<String> {
        match self.amount.as_ref()? {
            Value::Number(n) => Some(n.to_string()),
            Value::String(s) => Some(s.clone()),
            _ => None,
        }
    }
}

/// Identifiers the gateway hands the client after checkout.
#[derive(Debug, Deserialize)]
pub struct VerifyPaymentRequest {
    #[serde(default, alias = "gatewayOrderId")]
    pub razorpay_order_id: String,
    #[serde(default, alias = "paymentId")]
    pub razorpay_payment_id: String,
    #[serde(default, alias = "signature")]
    pub razorpay_signature: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: &'static str,
    pub version: &'static str,
}
