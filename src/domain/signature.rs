//! Payment signature verification.
//!
//! The gateway signs `order_id|payment_id` with HMAC-SHA256 using the shared
//! key secret and hands the lowercase hex digest to the client. A confirmation
//! is only trusted when the relay recomputes the same digest.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Delimiter between order id and payment id in the signed message.
pub const MESSAGE_DELIMITER: char = '|';

/// Builds the exact message the gateway signs.
pub fn canonical_message(order_id: &str, payment_id: &str) -> String {
    format!("{}{}{}", order_id, MESSAGE_DELIMITER, payment_id)
}

/// Computes the lowercase hex HMAC-SHA256 signature for an order/payment pair.
pub fn sign(order_id: &str, payment_id: &str, secret: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(canonical_message(order_id, payment_id).as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Returns true iff `supplied` is exactly the signature for the pair.
///
/// Comparison is on the hex text, so an uppercase rendering of a valid
/// digest is rejected. Empty identifiers never verify.
pub fn verify(order_id: &str, payment_id: &str, supplied: &str, secret: &[u8]) -> bool {
    if order_id.is_empty() || payment_id.is_empty() || supplied.is_empty() {
        return false;
    }
    let expected = sign(order_id, payment_id, secret);
    let expected = expected.as_bytes();
    let supplied = supplied.as_bytes();

    expected.len() == supplied.len() && bool::from(expected.ct_eq(supplied))
}
