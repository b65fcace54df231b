#![allow(dead_code)]

use async_trait::async_trait;
use payrelay::application::lifecycle::OrderLifecycle;
use payrelay::config::{GatewayConfig, Secret};
use payrelay::domain::gateway::{NewGatewayOrder, OrderDescriptor};
use payrelay::domain::order::OrderRecord;
use payrelay::domain::ports::{OrderStore, OrderStoreBox, PaymentGateway};
use payrelay::error::{RelayError, Result};
use payrelay::infrastructure::in_memory::InMemoryOrderStore;
use serde_json::{Map, Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const SECRET: &str = "test_secret";

/// Gateway double: sequential order ids, optional failure.
#[derive(Default, Clone)]
pub struct StubGateway {
    pub calls: Arc<AtomicUsize>,
    pub fail: bool,
}

impl StubGateway {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentGateway for StubGateway {
    async fn create_order(&self, request: &NewGatewayOrder) -> Result<OrderDescriptor> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail {
            return Err(RelayError::GatewayUnavailable("stub failure".to_string()));
        }
        let mut extra = Map::new();
        extra.insert("entity".to_string(), Value::from("order"));
        extra.insert("attempts".to_string(), json!(0));
        Ok(OrderDescriptor {
            id: format!("order_test_{}", n),
            amount: request.amount,
            currency: request.currency.clone(),
            receipt: Some(request.receipt.clone()),
            status: Some("created".to_string()),
            extra,
        })
    }
}

/// Store double that reads from `inner` but rejects every write.
#[derive(Default, Clone)]
pub struct ReadOnlyStore {
    pub inner: InMemoryOrderStore,
}

#[async_trait]
impl OrderStore for ReadOnlyStore {
    async fn append(&self, record: OrderRecord) -> Result<()> {
        Err(RelayError::StorageUnavailable(format!(
            "read-only store refused {}",
            record.gateway_order_id()
        )))
    }

    async fn find_by_id(&self, gateway_order_id: &str) -> Result<Option<OrderRecord>> {
        self.inner.find_by_id(gateway_order_id).await
    }

    async fn update(&self, record: OrderRecord) -> Result<()> {
        Err(RelayError::StorageUnavailable(format!(
            "read-only store refused {}",
            record.gateway_order_id()
        )))
    }

    async fn all(&self) -> Result<Vec<OrderRecord>> {
        self.inner.all().await
    }
}

pub fn gateway_config() -> GatewayConfig {
    GatewayConfig::new("rzp_test_key", Secret::new(SECRET))
}

pub fn lifecycle(store: OrderStoreBox, gateway: StubGateway) -> OrderLifecycle {
    OrderLifecycle::new(store, Box::new(gateway), &gateway_config())
}
