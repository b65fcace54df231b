use crate::domain::order::OrderRecord;
use crate::domain::ports::OrderStore;
use crate::error::{RelayError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, IteratorMode, Options};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family for storing order records keyed by gateway order id.
pub const CF_ORDERS: &str = "orders";

/// A persistent order store using RocksDB.
///
/// Each record is a single key, so an update never rewrites unrelated orders.
/// Writes are serialized so `append` can check for an existing id and insert
/// without another writer slipping in between.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBOrderStore {
    db: Arc<DB>,
    write_lock: Arc<Mutex<()>>,
}

impl RocksDBOrderStore {
    /// Opens or creates a RocksDB instance at the specified path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_orders = ColumnFamilyDescriptor::new(CF_ORDERS, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_orders]).map_err(storage_error)?;

        Ok(Self {
            db: Arc::new(db),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    fn orders_cf(&self) -> Result<&ColumnFamily> {
        self.db.cf_handle(CF_ORDERS).ok_or_else(|| {
            RelayError::StorageUnavailable("Orders column family not found".to_string())
        })
    }

    fn put(&self, record: &OrderRecord) -> Result<()> {
        let cf = self.orders_cf()?;
        let value = serde_json::to_vec(record).map_err(|e| {
            RelayError::StorageUnavailable(format!("Serialization error: {}", e))
        })?;
        self.db
            .put_cf(cf, record.gateway_order_id().as_bytes(), value)
            .map_err(storage_error)
    }

    fn contains(&self, gateway_order_id: &str) -> Result<bool> {
        let cf = self.orders_cf()?;
        let found = self
            .db
            .get_pinned_cf(cf, gateway_order_id.as_bytes())
            .map_err(storage_error)?;
        Ok(found.is_some())
    }
}

fn storage_error(e: rocksdb::Error) -> RelayError {
    RelayError::StorageUnavailable(format!("RocksDB error: {}", e))
}

fn decode(bytes: &[u8]) -> Result<OrderRecord> {
    serde_json::from_slice(bytes)
        .map_err(|e| RelayError::StorageUnavailable(format!("Deserialization error: {}", e)))
}

#[async_trait]
impl OrderStore for RocksDBOrderStore {
    async fn append(&self, record: OrderRecord) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        if self.contains(record.gateway_order_id())? {
            return Err(RelayError::DuplicateOrderId(
                record.gateway_order_id().to_string(),
            ));
        }
        self.put(&record)
    }

    async fn find_by_id(&self, gateway_order_id: &str) -> Result<Option<OrderRecord>> {
        let cf = self.orders_cf()?;
        match self
            .db
            .get_cf(cf, gateway_order_id.as_bytes())
            .map_err(storage_error)?
        {
            Some(bytes) => Ok(Some(decode(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn update(&self, record: OrderRecord) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        if !self.contains(record.gateway_order_id())? {
            return Err(RelayError::OrderNotFound(
                record.gateway_order_id().to_string(),
            ));
        }
        self.put(&record)
    }

    /// Records come back in key order, not insertion order.
    async fn all(&self) -> Result<Vec<OrderRecord>> {
        let cf = self.orders_cf()?;
        let mut orders = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = item.map_err(storage_error)?;
            orders.push(decode(&value)?);
        }
        Ok(orders)
    }
}
