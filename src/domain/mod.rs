//! Domain types, the signature verifier, and the ports the application
//! layer depends on.

pub mod gateway;
pub mod order;
pub mod ports;
pub mod signature;
