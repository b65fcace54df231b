use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Gateway unavailable: {0}")]
    GatewayUnavailable(String),
    /// Never carries the expected digest.
    #[error("Signature mismatch for order {order_id}")]
    SignatureMismatch { order_id: String },
    #[error("Duplicate order id: {0}")]
    DuplicateOrderId(String),
    #[error("Order not found: {0}")]
    OrderNotFound(String),
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, RelayError>;
