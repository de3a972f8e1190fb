//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod config;
pub mod credentials;
pub mod ports;
pub mod storage;
pub mod vertex;
