//! Adapters for the domain ports: order stores and the gateway client.

pub mod http_gateway;
pub mod in_memory;
pub mod json_file;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
