//! Axum router configuration for payment endpoints.
//!
//! This module defines the route structure for the payment API and wires
//! each route to its handler.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    create_payment, get_payment_status, manual_confirm, vnpay_ipn, vnpay_return, PaymentAppState,
};

/// Create the payment API router.
///
/// # Routes
///
/// ## User Endpoints (require authentication)
/// - `POST /` - Start a payment attempt
/// - `GET /:id/status` - Poll one payment's progress
///
/// ## Provider Callback Endpoints (no auth, signature verified)
/// - `GET /vnpay/return` - Browser return redirect
/// - `POST /vnpay/ipn` - Server-to-server confirmation
///
/// ## Operator Endpoints (shared x-api-key credential)
/// - `POST /webhook` - Manual bank-transfer confirmation
pub fn payment_routes() -> Router<PaymentAppState> {
    Router::new()
        // User endpoints
        .route("/", post(create_payment))
        .route("/:id/status", get(get_payment_status))
        // Provider callbacks
        .route("/vnpay/return", get(vnpay_return))
        .route("/vnpay/ipn", post(vnpay_ipn))
        // Operator endpoint
        .route("/webhook", post(manual_confirm))
}

/// Create the complete payment module router, suitable for mounting at
/// `/api/payments`.
pub fn payment_router() -> Router<PaymentAppState> {
    Router::new().nest("/payments", payment_routes())
}
