use crate::config::{GatewayConfig, Secret};
use crate::domain::gateway::{NewGatewayOrder, OrderDescriptor};
use crate::domain::order::{MinorAmount, OrderRecord, PaymentTransition};
use crate::domain::ports::{OrderStoreBox, PaymentGatewayBox};
use crate::domain::signature;
use crate::error::{RelayError, Result};
use rand::Rng;
use rand::distributions::Alphanumeric;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

const RECEIPT_PREFIX: &str = "receipt_";
const RECEIPT_SUFFIX_LEN: usize = 8;

/// What a verified confirmation did to the order store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// The order moved from `created` to `paid`.
    Paid,
    /// The order was already paid; the stored payment id was kept.
    AlreadyPaid { payment_id: String },
    /// The signature was valid but no order with that id is stored.
    UnknownOrder,
}

/// Creates gateway orders and confirms their payments.
///
/// `OrderLifecycle` is the only writer of the order store. Each create and
/// each confirm holds the write lock for its whole read-modify-write, so two
/// confirmations for the same order cannot interleave.
pub struct OrderLifecycle {
    store: OrderStoreBox,
    gateway: PaymentGatewayBox,
    signing_secret: Secret,
    currency: String,
    write_lock: Mutex<()>,
}

impl OrderLifecycle {
    /// Creates a new `OrderLifecycle`.
    ///
    /// # Arguments
    ///
    /// * `store` - The store for order records.
    /// * `gateway` - The gateway that allocates order ids.
    /// * `config` - Gateway settings; supplies the signing secret and currency.
    pub fn new(store: OrderStoreBox, gateway: PaymentGatewayBox, config: &GatewayConfig) -> Self {
        Self {
            store,
            gateway,
            signing_secret: config.key_secret.clone(),
            currency: config.currency.clone(),
            write_lock: Mutex::new(()),
        }
    }

    /// Allocates a gateway order for `amount` major units and records it as `created`.
    ///
    /// Nothing is persisted when the gateway call fails.
    pub async fn create_order(&self, amount: &str) -> Result<OrderDescriptor> {
        let amount = MinorAmount::parse_major(amount)?;
        let request = NewGatewayOrder {
            amount: amount.value(),
            currency: self.currency.clone(),
            receipt: new_receipt(),
        };

        let descriptor = self.gateway.create_order(&request).await?;
        let recorded = MinorAmount::new(descriptor.amount).map_err(|_| {
            RelayError::GatewayUnavailable(format!(
                "gateway returned order {} with amount {}",
                descriptor.id, descriptor.amount
            ))
        })?;
        let record = OrderRecord::created(&descriptor.id, recorded, &descriptor.currency);

        {
            let _guard = self.write_lock.lock().await;
            self.store.append(record).await.inspect_err(|e| {
                error!(order_id = %descriptor.id, error = %e, "failed to record created order");
            })?;
        }

        info!(
            order_id = %descriptor.id,
            amount = descriptor.amount,
            currency = %descriptor.currency,
            receipt = %request.receipt,
            "order created"
        );
        Ok(descriptor)
    }

    /// Confirms a payment reported by the client.
    ///
    /// The signature is checked before the store is touched; a mismatch
    /// leaves every record unchanged.
    pub async fn confirm_payment(
        &self,
        gateway_order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<ConfirmOutcome> {
        if !signature::verify(
            gateway_order_id,
            payment_id,
            signature,
            self.signing_secret.expose().as_bytes(),
        ) {
            warn!(order_id = %gateway_order_id, payment_id = %payment_id, "payment signature mismatch");
            return Err(RelayError::SignatureMismatch {
                order_id: gateway_order_id.to_string(),
            });
        }

        let _guard = self.write_lock.lock().await;
        let Some(mut record) = self.store.find_by_id(gateway_order_id).await? else {
            warn!(order_id = %gateway_order_id, "verified payment for unknown order");
            return Ok(ConfirmOutcome::UnknownOrder);
        };

        match record.mark_paid(payment_id) {
            PaymentTransition::Applied => {
                self.store.update(record).await.inspect_err(|e| {
                    error!(order_id = %gateway_order_id, payment_id = %payment_id, error = %e, "failed to record payment");
                })?;
                info!(order_id = %gateway_order_id, payment_id = %payment_id, "order paid");
                Ok(ConfirmOutcome::Paid)
            }
            PaymentTransition::AlreadyPaid { payment_id: existing } => {
                if existing != payment_id {
                    warn!(
                        order_id = %gateway_order_id,
                        payment_id = %payment_id,
                        recorded_payment_id = %existing,
                        "order already paid with a different payment"
                    );
                }
                Ok(ConfirmOutcome::AlreadyPaid {
                    payment_id: existing,
                })
            }
        }
    }

    /// Returns every stored order in store order.
    pub async fn orders(&self) -> Result<Vec<OrderRecord>> {
        self.store.all().await
    }
}

/// Random correlation label; collisions are possible and harmless.
fn new_receipt() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(RECEIPT_SUFFIX_LEN)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();
    format!("{}{}", RECEIPT_PREFIX, suffix)
}
