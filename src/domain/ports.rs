use super::gateway::{NewGatewayOrder, OrderDescriptor};
use super::order::OrderRecord;
use crate::error::Result;
use async_trait::async_trait;

/// Durable keyed storage for order records.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Adds a new record; fails with `DuplicateOrderId` if the id exists.
    async fn append(&self, record: OrderRecord) -> Result<()>;
    async fn find_by_id(&self, gateway_order_id: &str) -> Result<Option<OrderRecord>>;
    /// Replaces the record with the same id; fails with `OrderNotFound` if absent.
    async fn update(&self, record: OrderRecord) -> Result<()>;
    async fn all(&self) -> Result<Vec<OrderRecord>>;
}

/// Remote service that allocates order identifiers.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_order(&self, request: &NewGatewayOrder) -> Result<OrderDescriptor>;
}

pub type OrderStoreBox = Box<dyn OrderStore>;
pub type PaymentGatewayBox = Box<dyn PaymentGateway>;
