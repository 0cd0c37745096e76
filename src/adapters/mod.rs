//! Adapters: concrete implementations at the system boundary.
//!
//! - `http` - Axum REST API
//! - `postgres` - sqlx persistence for the ports
//! - `vnpay` - outbound provider integration (signed redirect URLs)

pub mod http;
pub mod postgres;
pub mod vnpay;
