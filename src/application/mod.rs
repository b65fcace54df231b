//! Application layer containing the order lifecycle orchestration.
//!
//! This module defines `OrderLifecycle`, the entry point for creating gateway
//! orders and confirming their payments. It owns the order store and the
//! gateway client and serializes every write to the store.

pub mod lifecycle;
