//! VowPage payment backend - service entrypoint.
//!
//! Loads configuration, connects to PostgreSQL, wires the adapters into
//! the shared application state, and serves the payment API.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use vowpage::adapters::http::{payment_router, PaymentAppState};
use vowpage::adapters::postgres::{
    PostgresPaymentFinalizer, PostgresPaymentRepository, PostgresWeddingReader,
};
use vowpage::adapters::vnpay::VnpayRedirectBuilder;
use vowpage::config::AppConfig;
use vowpage::domain::payment::SecureHashSigner;
use vowpage::ports::SystemClock;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level)),
        )
        .init();

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        info!("running database migrations");
        sqlx::migrate!("./migrations").run(&pool).await?;
    }

    let hash_secret = config.payment.vnpay_hash_secret.expose_secret();
    let state = PaymentAppState {
        payment_repository: Arc::new(PostgresPaymentRepository::new(pool.clone())),
        payment_finalizer: Arc::new(PostgresPaymentFinalizer::new(pool.clone())),
        wedding_reader: Arc::new(PostgresWeddingReader::new(pool)),
        clock: Arc::new(SystemClock),
        signer: Arc::new(SecureHashSigner::new(hash_secret.clone())),
        redirect_builder: Arc::new(VnpayRedirectBuilder::new(
            config.payment.vnpay_tmn_code.clone(),
            config.payment.vnpay_payment_url.clone(),
            config.payment.vnpay_return_url.clone(),
            hash_secret.clone(),
        )),
        bank_account: config.payment.bank_account(),
        admin_api_key: config.payment.admin_api_key.clone(),
        dashboard_url: config.payment.dashboard_url.clone(),
    };

    let cors = build_cors_layer(&config.server.cors_origins_list())?;
    let app = Router::new()
        .nest("/api", payment_router())
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(cors)
        .with_state(state);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, environment = ?config.server.environment, "vowpage payment service listening");

    axum::serve(listener, app).await?;

    Ok(())
}

fn build_cors_layer(origins: &[String]) -> Result<CorsLayer, Box<dyn std::error::Error>> {
    if origins.is_empty() {
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any));
    }

    let parsed = origins
        .iter()
        .map(|o| o.parse())
        .collect::<Result<Vec<http::HeaderValue>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(parsed))
        .allow_methods(Any)
        .allow_headers(Any))
}
