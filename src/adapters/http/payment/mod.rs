//! HTTP adapter for payment endpoints.
//!
//! Exposes the payment subsystem via REST API:
//! - `POST /api/payments` - Start a payment attempt
//! - `GET /api/payments/:id/status` - Poll one payment's progress
//! - `GET /api/payments/vnpay/return` - Browser return redirect
//! - `POST /api/payments/vnpay/ipn` - Server-to-server confirmation
//! - `POST /api/payments/webhook` - Manual bank-transfer confirmation

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::PaymentAppState;
pub use routes::{payment_router, payment_routes};
