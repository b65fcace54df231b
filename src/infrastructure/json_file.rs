use crate::domain::order::OrderRecord;
use crate::domain::ports::OrderStore;
use crate::error::{RelayError, Result};
use async_trait::async_trait;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tokio::sync::Mutex;

/// Order store backed by a single JSON file holding an ordered array of records.
///
/// Every mutation reads the whole collection and rewrites the whole file. The
/// read-modify-write cycle runs under a mutex, and the rewrite goes through a
/// temporary file in the same directory that is renamed over the original, so
/// concurrent writers never lose each other's changes and a crash never leaves
/// a truncated file.
#[derive(Clone)]
pub struct JsonFileOrderStore {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl JsonFileOrderStore {
    /// Uses the file at `path`. A missing file is an empty collection; it is
    /// created on the first append.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Vec<OrderRecord>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(RelayError::StorageUnavailable(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        serde_json::from_slice(&bytes).map_err(|e| {
            RelayError::StorageUnavailable(format!(
                "Failed to parse {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    async fn persist(&self, orders: Vec<OrderRecord>) -> Result<()> {
        let path = self.path.clone();
        let written = tokio::task::spawn_blocking(move || write_atomically(&path, &orders))
            .await
            .map_err(|e| RelayError::StorageUnavailable(format!("Writer task failed: {}", e)))?;

        written.map_err(|e| {
            RelayError::StorageUnavailable(format!(
                "Failed to write {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}

fn write_atomically(path: &Path, orders: &[OrderRecord]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let body = serde_json::to_vec_pretty(orders)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(&body)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[async_trait]
impl OrderStore for JsonFileOrderStore {
    async fn append(&self, record: OrderRecord) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut orders = self.load().await?;
        if orders
            .iter()
            .any(|o| o.gateway_order_id() == record.gateway_order_id())
        {
            return Err(RelayError::DuplicateOrderId(
                record.gateway_order_id().to_string(),
            ));
        }
        orders.push(record);
        self.persist(orders).await
    }

    async fn find_by_id(&self, gateway_order_id: &str) -> Result<Option<OrderRecord>> {
        let _guard = self.lock.lock().await;
        let orders = self.load().await?;
        Ok(orders
            .into_iter()
            .find(|o| o.gateway_order_id() == gateway_order_id))
    }

    async fn update(&self, record: OrderRecord) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut orders = self.load().await?;
        let slot = orders
            .iter_mut()
            .find(|o| o.gateway_order_id() == record.gateway_order_id())
            .ok_or_else(|| RelayError::OrderNotFound(record.gateway_order_id().to_string()))?;
        *slot = record;
        self.persist(orders).await
    }

    async fn all(&self) -> Result<Vec<OrderRecord>> {
        let _guard = self.lock.lock().await;
        self.load().await
    }
}
