//! HTTP client for the payment gateway's order API.

use crate::config::{GatewayConfig, Secret};
use crate::domain::gateway::{NewGatewayOrder, OrderDescriptor};
use crate::domain::ports::PaymentGateway;
use crate::error::{RelayError, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error};

/// Allocates orders via `POST {base_url}/v1/orders` with HTTP basic auth.
///
/// One request per call. Failures are reported as `GatewayUnavailable` and
/// never retried.
pub struct HttpGateway {
    client: Client,
    orders_url: String,
    key_id: String,
    key_secret: Secret,
}

impl HttpGateway {
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RelayError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            orders_url: format!("{}/v1/orders", config.base_url.trim_end_matches('/')),
            key_id: config.key_id.clone(),
            key_secret: config.key_secret.clone(),
        })
    }
}

#[async_trait]
impl PaymentGateway for HttpGateway {
    async fn create_order(&self, request: &NewGatewayOrder) -> Result<OrderDescriptor> {
        debug!(url = %self.orders_url, receipt = %request.receipt, "requesting gateway order");

        let response = self
            .client
            .post(&self.orders_url)
            .basic_auth(&self.key_id, Some(self.key_secret.expose()))
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "gateway request failed");
                RelayError::GatewayUnavailable(format!("request failed: {}", e.without_url()))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%status, body = %body, "gateway rejected order");
            return Err(RelayError::GatewayUnavailable(format!(
                "gateway responded with {}",
                status
            )));
        }

        let descriptor: OrderDescriptor = response.json().await.map_err(|e| {
            RelayError::GatewayUnavailable(format!("invalid order descriptor: {}", e))
        })?;
        if descriptor.id.is_empty() {
            return Err(RelayError::GatewayUnavailable(
                "order descriptor has no id".to_string(),
            ));
        }
        Ok(descriptor)
    }
}
