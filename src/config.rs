//! Runtime configuration.
//!
//! Everything is resolved once at startup from CLI flags, the environment and
//! an optional `.env` file, then passed into constructors. Secrets are held in
//! [`Secret`], whose `Debug` output is redacted.

use crate::domain::order::DEFAULT_CURRENCY;
use crate::error::{RelayError, Result};
use clap::Args;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_GATEWAY_URL: &str = "https://api.razorpay.com";
pub const DEFAULT_ORDERS_FILE: &str = "orders.json";

/// A secret value that never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<REDACTED>")
    }
}

/// Gateway credentials and request settings.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub base_url: String,
    pub key_id: String,
    pub key_secret: Secret,
    pub currency: String,
    pub timeout: Duration,
}

impl GatewayConfig {
    pub fn new(key_id: impl Into<String>, key_secret: Secret) -> Self {
        Self {
            base_url: DEFAULT_GATEWAY_URL.to_string(),
            key_id: key_id.into(),
            key_secret,
            currency: DEFAULT_CURRENCY.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Which order store backs the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    InMemory,
    JsonFile(PathBuf),
    RocksDb(PathBuf),
}

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub bind_addr: SocketAddr,
    pub gateway: GatewayConfig,
    pub storage: StorageConfig,
    pub static_dir: Option<PathBuf>,
}

/// Shared secret used to verify payment signatures.
#[derive(Args, Debug, Clone)]
pub struct SecretArgs {
    /// Gateway key secret; also the payment signature key
    #[arg(long, env = "GATEWAY_KEY_SECRET", hide_env_values = true)]
    pub key_secret: Option<String>,
}

impl SecretArgs {
    pub fn resolve(&self) -> Result<Secret> {
        match self.key_secret.as_deref() {
            Some(secret) if !secret.trim().is_empty() => Ok(Secret::new(secret)),
            _ => Err(RelayError::Config(
                "GATEWAY_KEY_SECRET is not set".to_string(),
            )),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct GatewayArgs {
    /// Gateway API base URL
    #[arg(long, env = "GATEWAY_BASE_URL", default_value = DEFAULT_GATEWAY_URL)]
    pub gateway_url: String,

    /// Gateway API key identifier
    #[arg(long, env = "GATEWAY_KEY_ID")]
    pub key_id: Option<String>,

    #[command(flatten)]
    pub secret: SecretArgs,

    /// Currency code sent with every order
    #[arg(long, env = "GATEWAY_CURRENCY", default_value = DEFAULT_CURRENCY)]
    pub currency: String,

    /// Timeout for a single gateway request, in seconds
    #[arg(long, env = "GATEWAY_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,
}

impl GatewayArgs {
    pub fn resolve(&self) -> Result<GatewayConfig> {
        let key_id = match self.key_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => {
                return Err(RelayError::Config(
                    "GATEWAY_KEY_ID is not set".to_string(),
                ));
            }
        };
        let currency = self.currency.trim().to_uppercase();
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(RelayError::Config(format!(
                "Invalid currency code '{}'",
                self.currency
            )));
        }
        if self.timeout_secs == 0 {
            return Err(RelayError::Config(
                "GATEWAY_TIMEOUT_SECS must be positive".to_string(),
            ));
        }

        Ok(GatewayConfig {
            base_url: self.gateway_url.trim_end_matches('/').to_string(),
            key_id,
            key_secret: self.secret.resolve()?,
            currency,
            timeout: Duration::from_secs(self.timeout_secs),
        })
    }
}

#[derive(Args, Debug, Clone)]
pub struct StorageArgs {
    /// JSON file holding the order collection
    #[arg(long, env = "PAYRELAY_ORDERS_FILE", default_value = DEFAULT_ORDERS_FILE)]
    pub orders_file: PathBuf,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, env = "PAYRELAY_DB_PATH", conflicts_with = "in_memory")]
    pub db_path: Option<PathBuf>,

    /// Keep orders in memory only
    #[arg(long)]
    pub in_memory: bool,
}

impl StorageArgs {
    /// Picks the store. `--db-path` falls back to the JSON file store when the
    /// binary was built without the `storage-rocksdb` feature.
    pub fn resolve(&self) -> StorageConfig {
        if self.in_memory {
            return StorageConfig::InMemory;
        }
        match &self.db_path {
            Some(path) if cfg!(feature = "storage-rocksdb") => StorageConfig::RocksDb(path.clone()),
            Some(_) => {
                eprintln!(
                    "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to JSON file storage."
                );
                StorageConfig::JsonFile(self.orders_file.clone())
            }
            None => StorageConfig::JsonFile(self.orders_file.clone()),
        }
    }
}
