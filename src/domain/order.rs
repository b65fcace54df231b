use crate::error::{RelayError, Result};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Currency used when none is configured.
pub const DEFAULT_CURRENCY: &str = "INR";

/// A positive order amount in minor currency units (paise for INR).
///
/// Only constructible through validation, so every `MinorAmount` in the
/// system is strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct MinorAmount(u64);

impl MinorAmount {
    pub fn new(value: u64) -> Result<Self> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(RelayError::InvalidAmount(
                "Amount must be positive".to_string(),
            ))
        }
    }

    /// Parses a major-unit amount such as `"500"` and converts it to minor units.
    ///
    /// The input must be a finite, positive, whole number of major units.
    pub fn parse_major(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let major = Decimal::from_str(raw)
            .or_else(|_| Decimal::from_scientific(raw))
            .map_err(|_| RelayError::InvalidAmount(format!("'{}' is not a number", raw)))?;
        Self::try_from(major)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl TryFrom<Decimal> for MinorAmount {
    type Error = RelayError;

    fn try_from(major: Decimal) -> Result<Self> {
        if major <= Decimal::ZERO {
            return Err(RelayError::InvalidAmount(
                "Amount must be positive".to_string(),
            ));
        }
        if !major.fract().is_zero() {
            return Err(RelayError::InvalidAmount(
                "Amount must be a whole number of major units".to_string(),
            ));
        }
        let minor = major
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|m| m.to_u64())
            .ok_or_else(|| RelayError::InvalidAmount("Amount is too large".to_string()))?;
        Self::new(minor)
    }
}

impl From<MinorAmount> for u64 {
    fn from(amount: MinorAmount) -> Self {
        amount.0
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Created,
    Paid,
}

/// Result of applying a verified payment to a record.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum PaymentTransition {
    /// The record moved from `created` to `paid`.
    Applied,
    /// The record was already paid; it keeps its original payment id.
    AlreadyPaid { payment_id: String },
}

/// A persisted payment order.
///
/// `payment_id` is present iff `status` is [`OrderStatus::Paid`]. The only
/// mutation is [`OrderRecord::mark_paid`] and deserialization goes through
/// [`StoredOrder`], so the invariant holds for every record in the system.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase", try_from = "StoredOrder")]
pub struct OrderRecord {
    gateway_order_id: String,
    amount: u64,
    currency: String,
    status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    payment_id: Option<String>,
}

/// Unchecked on-disk form of an [`OrderRecord`]; also reads the legacy field names.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredOrder {
    #[serde(alias = "razorpay_order_id")]
    gateway_order_id: String,
    amount: u64,
    currency: String,
    status: OrderStatus,
    #[serde(default, alias = "payment_id")]
    payment_id: Option<String>,
}

impl TryFrom<StoredOrder> for OrderRecord {
    type Error = String;

    fn try_from(stored: StoredOrder) -> std::result::Result<Self, Self::Error> {
        match (stored.status, &stored.payment_id) {
            (OrderStatus::Paid, None) => {
                return Err(format!(
                    "order {} is paid but has no paymentId",
                    stored.gateway_order_id
                ));
            }
            (OrderStatus::Created, Some(_)) => {
                return Err(format!(
                    "order {} is created but carries a paymentId",
                    stored.gateway_order_id
                ));
            }
            _ => {}
        }
        Ok(Self {
            gateway_order_id: stored.gateway_order_id,
            amount: stored.amount,
            currency: stored.currency,
            status: stored.status,
            payment_id: stored.payment_id,
        })
    }
}

impl OrderRecord {
    pub fn created(
        gateway_order_id: impl Into<String>,
        amount: MinorAmount,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            gateway_order_id: gateway_order_id.into(),
            amount: amount.value(),
            currency: currency.into(),
            status: OrderStatus::Created,
            payment_id: None,
        }
    }

    pub fn gateway_order_id(&self) -> &str {
        &self.gateway_order_id
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn payment_id(&self) -> Option<&str> {
        self.payment_id.as_deref()
    }

    /// Moves a `created` order to `paid`. A paid order is never rewritten.
    pub fn mark_paid(&mut self, payment_id: &str) -> PaymentTransition {
        match (self.status, &self.payment_id) {
            (OrderStatus::Paid, Some(existing)) => PaymentTransition::AlreadyPaid {
                payment_id: existing.clone(),
            },
            _ => {
                self.status = OrderStatus::Paid;
                self.payment_id = Some(payment_id.to_string());
                PaymentTransition::Applied
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_major_converts_to_minor_units() {
        assert_eq!(MinorAmount::parse_major("100").unwrap().value(), 10_000);
        assert_eq!(MinorAmount::parse_major(" 500 ").unwrap().value(), 50_000);
        assert_eq!(MinorAmount::parse_major("1000.0").unwrap().value(), 100_000);
    }

    #[test]
    fn test_parse_major_rejects_invalid_input() {
        for raw in ["0", "-5", "abc", "", "NaN", "12.5", "0.00"] {
            assert!(
                matches!(
                    MinorAmount::parse_major(raw),
                    Err(RelayError::InvalidAmount(_))
                ),
                "expected {:?} to be rejected",
                raw
            );
        }
    }

    #[test]
    fn test_minor_amount_overflow() {
        let huge = dec!(1000000000000000000000);
        assert!(matches!(
            MinorAmount::try_from(huge),
            Err(RelayError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_minor_amount_new_validation() {
        assert!(MinorAmount::new(1).is_ok());
        assert!(matches!(
            MinorAmount::new(0),
            Err(RelayError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_created_record_has_no_payment_id() {
        let record = OrderRecord::created("order_1", MinorAmount::new(50_000).unwrap(), "INR");
        assert_eq!(record.status(), OrderStatus::Created);
        assert_eq!(record.payment_id(), None);
        assert_eq!(record.amount(), 50_000);
    }

    #[test]
    fn test_mark_paid_is_monotonic() {
        let mut record = OrderRecord::created("order_1", MinorAmount::new(100).unwrap(), "INR");

        assert_eq!(record.mark_paid("pay_1"), PaymentTransition::Applied);
        assert_eq!(record.status(), OrderStatus::Paid);
        assert_eq!(record.payment_id(), Some("pay_1"));

        // A second payment never overwrites the first
        assert_eq!(
            record.mark_paid("pay_2"),
            PaymentTransition::AlreadyPaid {
                payment_id: "pay_1".to_string()
            }
        );
        assert_eq!(record.status(), OrderStatus::Paid);
        assert_eq!(record.payment_id(), Some("pay_1"));
    }

    #[test]
    fn test_record_serialization_field_names() {
        let mut record = OrderRecord::created("order_1", MinorAmount::new(100).unwrap(), "INR");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["gatewayOrderId"], "order_1");
        assert_eq!(json["status"], "created");
        assert!(json.get("paymentId").is_none());

        record.mark_paid("pay_1");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["status"], "paid");
        assert_eq!(json["paymentId"], "pay_1");
    }

    #[test]
    fn test_record_accepts_legacy_field_names() {
        let legacy = r#"{
            "razorpay_order_id": "order_legacy",
            "amount": 50000,
            "currency": "INR",
            "status": "paid",
            "payment_id": "pay_legacy"
        }"#;
        let record: OrderRecord = serde_json::from_str(legacy).unwrap();
        assert_eq!(record.gateway_order_id(), "order_legacy");
        assert_eq!(record.payment_id(), Some("pay_legacy"));
        assert_eq!(record.status(), OrderStatus::Paid);
    }

    #[test]
    fn test_record_rejects_mismatched_payment_state() {
        let created_with_payment = r#"{
            "gatewayOrderId": "order_1",
            "amount": 100,
            "currency": "INR",
            "status": "created",
            "paymentId": "pay_1"
        }"#;
        let err = serde_json::from_str::<OrderRecord>(created_with_payment).unwrap_err();
        assert!(err.to_string().contains("carries a paymentId"));

        let paid_without_payment = r#"{
            "gatewayOrderId": "order_1",
            "amount": 100,
            "currency": "INR",
            "status": "paid"
        }"#;
        let err = serde_json::from_str::<OrderRecord>(paid_without_payment).unwrap_err();
        assert!(err.to_string().contains("has no paymentId"));
    }
}
