use crate::domain::order::OrderRecord;
use crate::domain::ports::OrderStore;
use crate::error::{RelayError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Orders {
    records: Vec<OrderRecord>,
    index: HashMap<String, usize>,
}

/// A thread-safe in-memory order store.
///
/// Records are kept in insertion order so `all` matches the JSON file store.
/// Ideal for testing or for running without persistence.
#[derive(Default, Clone)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<Orders>>,
}

impl InMemoryOrderStore {
    /// Creates a new, empty in-memory order store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn append(&self, record: OrderRecord) -> Result<()> {
        let mut orders = self.orders.write().await;
        let id = record.gateway_order_id().to_string();
        if orders.index.contains_key(&id) {
            return Err(RelayError::DuplicateOrderId(id));
        }
        let position = orders.records.len();
        orders.records.push(record);
        orders.index.insert(id, position);
        Ok(())
    }

    async fn find_by_id(&self, gateway_order_id: &str) -> Result<Option<OrderRecord>> {
        let orders = self.orders.read().await;
        Ok(orders
            .index
            .get(gateway_order_id)
            .map(|&position| orders.records[position].clone()))
    }

    async fn update(&self, record: OrderRecord) -> Result<()> {
        let mut orders = self.orders.write().await;
        match orders.index.get(record.gateway_order_id()).copied() {
            Some(position) => {
                orders.records[position] = record;
                Ok(())
            }
            None => Err(RelayError::OrderNotFound(
                record.gateway_order_id().to_string(),
            )),
        }
    }

    async fn all(&self) -> Result<Vec<OrderRecord>> {
        let orders = self.orders.read().await;
        Ok(orders.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::{MinorAmount, OrderStatus};

    fn record(id: &str) -> OrderRecord {
        OrderRecord::created(id, MinorAmount::new(50_000).unwrap(), "INR")
    }

    #[tokio::test]
    async fn test_in_memory_append_and_find() {
        let store = InMemoryOrderStore::new();
        store.append(record("order_1")).await.unwrap();

        let retrieved = store.find_by_id("order_1").await.unwrap().unwrap();
        assert_eq!(retrieved, record("order_1"));

        assert!(store.find_by_id("order_2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_in_memory_rejects_duplicate() {
        let store = InMemoryOrderStore::new();
        store.append(record("order_1")).await.unwrap();

        let result = store.append(record("order_1")).await;
        assert!(matches!(result, Err(RelayError::DuplicateOrderId(id)) if id == "order_1"));
        assert_eq!(store.all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_in_memory_update() {
        let store = InMemoryOrderStore::new();
        store.append(record("order_1")).await.unwrap();
        store.append(record("order_2")).await.unwrap();

        let mut paid = record("order_2");
        paid.mark_paid("pay_1");
        store.update(paid).await.unwrap();

        let all = store.all().await.unwrap();
        assert_eq!(all[0].status(), OrderStatus::Created);
        assert_eq!(all[1].status(), OrderStatus::Paid);
        assert_eq!(all[1].payment_id(), Some("pay_1"));
    }

    #[tokio::test]
    async fn test_in_memory_update_unknown_order() {
        let store = InMemoryOrderStore::new();
        let result = store.update(record("missing")).await;
        assert!(matches!(result, Err(RelayError::OrderNotFound(_))));
    }
}
