use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Order allocation request sent to the gateway.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct NewGatewayOrder {
    /// Minor currency units.
    pub amount: u64,
    pub currency: String,
    pub receipt: String,
}

/// The gateway's representation of an allocated order.
///
/// Fields the relay does not interpret are kept in `extra` so the descriptor
/// can be handed back to the client unchanged.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct OrderDescriptor {
    pub id: String,
    pub amount: u64,
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_keeps_unknown_fields() {
        let body = r#"{
            "id": "order_EKwxwAgItmmXdp",
            "entity": "order",
            "amount": 50000,
            "amount_paid": 0,
            "currency": "INR",
            "receipt": "receipt_ab12cd34",
            "status": "created",
            "attempts": 0
        }"#;
        let descriptor: OrderDescriptor = serde_json::from_str(body).unwrap();
        assert_eq!(descriptor.id, "order_EKwxwAgItmmXdp");
        assert_eq!(descriptor.extra["entity"], "order");

        let round: Value = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(round["amount_paid"], 0);
        assert_eq!(round["attempts"], 0);
        assert_eq!(round["receipt"], "receipt_ab12cd34");
    }
}
