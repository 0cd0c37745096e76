//! HTTP handlers for payment endpoints.
//!
//! These handlers connect Axum routes to application layer command/query
//! handlers. The two provider callback endpoints never surface transport
//! errors: the IPN always answers 200 with an ack body in the provider's
//! vocabulary, and the return endpoint always redirects the browser back
//! to the dashboard with the outcome in the query string.

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect};
use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;
use tracing::warn;

use crate::adapters::vnpay::VnpayRedirectBuilder;
use crate::application::handlers::payment::{
    ConfirmBankTransferCommand, ConfirmBankTransferHandler, ConfirmProviderCallbackCommand,
    ConfirmProviderCallbackHandler, CreatePaymentCommand, CreatePaymentHandler,
    GetPaymentStatusHandler, GetPaymentStatusQuery,
};
use crate::domain::foundation::{DomainError, ErrorCode, PaymentId, UserId, WeddingId};
use crate::domain::payment::{AckCode, BankAccount, PaymentStatus, SecureHashSigner};
use crate::ports::{Clock, PaymentFinalizer, PaymentRepository, WeddingReader};

use super::dto::{
    CreatePaymentRequest, CreatePaymentResponse, ErrorResponse, ManualConfirmRequest,
    ManualConfirmResponse, PaymentStatusResponse, PaymentSummaryResponse, VnpayAckResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// This struct is cloned for each request and contains Arc-wrapped
/// dependencies for efficient sharing across handlers.
#[derive(Clone)]
pub struct PaymentAppState {
    pub payment_repository: Arc<dyn PaymentRepository>,
    pub payment_finalizer: Arc<dyn PaymentFinalizer>,
    pub wedding_reader: Arc<dyn WeddingReader>,
    pub clock: Arc<dyn Clock>,
    pub signer: Arc<SecureHashSigner>,
    pub redirect_builder: Arc<VnpayRedirectBuilder>,
    pub bank_account: BankAccount,
    pub admin_api_key: SecretString,
    /// Frontend page the return endpoint sends the browser to.
    pub dashboard_url: String,
}

impl PaymentAppState {
    /// Create handlers on demand from the shared state.
    pub fn create_payment_handler(&self) -> CreatePaymentHandler {
        CreatePaymentHandler::new(
            self.payment_repository.clone(),
            self.wedding_reader.clone(),
            self.clock.clone(),
            self.redirect_builder.clone(),
            self.bank_account.clone(),
        )
    }

    pub fn provider_callback_handler(&self) -> ConfirmProviderCallbackHandler {
        ConfirmProviderCallbackHandler::new(
            self.payment_repository.clone(),
            self.payment_finalizer.clone(),
            self.signer.clone(),
            self.clock.clone(),
        )
    }

    pub fn bank_transfer_handler(&self) -> ConfirmBankTransferHandler {
        ConfirmBankTransferHandler::new(
            self.payment_repository.clone(),
            self.payment_finalizer.clone(),
            self.clock.clone(),
        )
    }

    pub fn status_handler(&self) -> GetPaymentStatusHandler {
        GetPaymentStatusHandler::new(self.payment_repository.clone(), self.wedding_reader.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// User Context (would come from auth middleware in production)
// ════════════════════════════════════════════════════════════════════════════════

/// Authenticated user context extracted from request.
///
/// The platform's gateway authenticates the session and forwards the
/// identity in the X-User-Id header.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

/// Rejection type for AuthenticatedUser extraction.
pub struct AuthenticationRequired;

impl IntoResponse for AuthenticationRequired {
    fn into_response(self) -> axum::response::Response {
        let error = ErrorResponse::new("AUTHENTICATION_REQUIRED", "Authentication is required");
        (StatusCode::UNAUTHORIZED, Json(error)).into_response()
    }
}

impl<S> axum::extract::FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthenticationRequired;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let user_id = parts
                .headers
                .get("X-User-Id")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| UserId::new(s).ok())
                .ok_or(AuthenticationRequired)?;

            Ok(AuthenticatedUser { user_id })
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Authenticated Endpoints
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/payments - Start a payment attempt
pub async fn create_payment(
    State(state): State<PaymentAppState>,
    user: AuthenticatedUser,
    client_ip: ClientIp,
    Json(request): Json<CreatePaymentRequest>,
) -> Result<impl IntoResponse, PaymentApiError> {
    let wedding_id = parse_wedding_id(&request.wedding_id)?;

    let handler = state.create_payment_handler();
    let cmd = CreatePaymentCommand {
        user_id: user.user_id,
        wedding_id,
        plan: request.plan,
        method: request.method,
        client_ip: client_ip.0,
    };

    let result = handler.handle(cmd).await?;

    let summary = PaymentSummaryResponse {
        id: result.payment.id.to_string(),
        plan: result.payment.plan,
        method: result.payment.method,
        amount: result.payment.amount,
        status: result.payment.status,
    };
    let response = CreatePaymentResponse::new(summary, result.artifact);

    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/payments/:id/status - Poll one payment's progress
pub async fn get_payment_status(
    State(state): State<PaymentAppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, PaymentApiError> {
    let payment_id = parse_payment_id(&id)?;

    let handler = state.status_handler();
    let query = GetPaymentStatusQuery {
        user_id: user.user_id,
        payment_id,
    };

    let view = handler.handle(query).await?;

    let response = PaymentStatusResponse {
        status: view.status,
        paid_at: view.paid_at.map(|t| t.to_iso_string()),
    };

    Ok(Json(response))
}

// ════════════════════════════════════════════════════════════════════════════════
// Provider Callback Endpoints
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/payments/vnpay/return - Browser return redirect
///
/// The browser lands here after the hosted payment page. The outcome is
/// processed through the same path as the IPN, then the browser is sent
/// back to the dashboard; the signed parameters never matter to the user
/// agent itself.
pub async fn vnpay_return(
    State(state): State<PaymentAppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Redirect {
    let handler = state.provider_callback_handler();
    let cmd = ConfirmProviderCallbackCommand { params };

    let target = match handler.handle(cmd).await {
        Ok(ack) => {
            let outcome = match ack.status {
                PaymentStatus::Completed => "success",
                PaymentStatus::Failed => "failed",
                PaymentStatus::Pending => "pending",
            };
            format!(
                "{}?payment_id={}&status={}",
                state.dashboard_url, ack.payment_id, outcome
            )
        }
        Err(err) => {
            warn!(error = %err, "return redirect could not be processed");
            format!("{}?status=invalid", state.dashboard_url)
        }
    };

    Redirect::to(&target)
}

/// POST /api/payments/vnpay/ipn - Server-to-server confirmation
///
/// Always answers 200 with an ack body; the provider keys its retry
/// behavior off RspCode, not HTTP status.
pub async fn vnpay_ipn(
    State(state): State<PaymentAppState>,
    body: Bytes,
) -> Json<VnpayAckResponse> {
    let params = match parse_provider_params(&body) {
        Ok(params) => params,
        Err(code) => {
            warn!(ack = code.as_str(), "IPN body could not be parsed");
            return Json(VnpayAckResponse::from(code));
        }
    };

    let handler = state.provider_callback_handler();
    let cmd = ConfirmProviderCallbackCommand { params };

    let code = match handler.handle(cmd).await {
        Ok(ack) if ack.already_finalized => AckCode::AlreadyConfirmed,
        Ok(_) => AckCode::Confirmed,
        Err(err) => {
            warn!(error = %err, "IPN could not be processed");
            err.ack_code()
        }
    };

    Json(VnpayAckResponse::from(code))
}

/// Lenient parse of the IPN body into the provider's parameter map.
///
/// The provider's serializers are not strict about value types (amounts
/// may arrive as bare numbers), so scalar values are coerced to strings
/// before verification; the secure hash decides whether the result is
/// trustworthy. A body that is not a JSON object at all is acked as an
/// unknown error, never as a transport failure.
fn parse_provider_params(body: &[u8]) -> Result<HashMap<String, String>, AckCode> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|_| AckCode::UnknownError)?;
    let object = value.as_object().ok_or(AckCode::UnknownError)?;

    let mut params = HashMap::new();
    for (key, value) in object {
        let value = match value {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::Bool(b) => b.to_string(),
            _ => return Err(AckCode::UnknownError),
        };
        params.insert(key.clone(), value);
    }
    Ok(params)
}

// ════════════════════════════════════════════════════════════════════════════════
// Operator Endpoint
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/payments/webhook - Manual bank-transfer confirmation
///
/// Guarded by a shared x-api-key credential compared in constant time.
pub async fn manual_confirm(
    State(state): State<PaymentAppState>,
    headers: axum::http::HeaderMap,
    Json(request): Json<ManualConfirmRequest>,
) -> Result<impl IntoResponse, PaymentApiError> {
    let presented = headers
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            DomainError::new(ErrorCode::Unauthorized, "Missing x-api-key header")
        })?;

    let expected = state.admin_api_key.expose_secret().as_bytes();
    if presented.as_bytes().ct_eq(expected).unwrap_u8() != 1 {
        return Err(PaymentApiError(DomainError::new(
            ErrorCode::Unauthorized,
            "Invalid API key",
        )));
    }

    let payment_id = parse_payment_id(&request.payment_id)?;

    let handler = state.bank_transfer_handler();
    let cmd = ConfirmBankTransferCommand {
        payment_id,
        action: request.action,
    };

    let result = handler.handle(cmd).await?;

    let response = ManualConfirmResponse {
        status: result.status,
        applied: result.applied,
    };

    Ok(Json(response))
}

// ════════════════════════════════════════════════════════════════════════════════
// Extractors and Parsing Helpers
// ════════════════════════════════════════════════════════════════════════════════

/// Client IP forwarded by the reverse proxy, passed through to the
/// provider in the redirect parameters.
#[derive(Debug, Clone)]
pub struct ClientIp(pub String);

const FALLBACK_CLIENT_IP: &str = "127.0.0.1";

impl<S> axum::extract::FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let ip = parts
                .headers
                .get("x-forwarded-for")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.split(',').next())
                .map(|s| s.trim().to_string())
                .unwrap_or_else(|| FALLBACK_CLIENT_IP.to_string());

            Ok(ClientIp(ip))
        })
    }
}

fn parse_wedding_id(raw: &str) -> Result<WeddingId, PaymentApiError> {
    raw.parse::<WeddingId>().map_err(|_| {
        PaymentApiError(DomainError::new(
            ErrorCode::InvalidFormat,
            "wedding_id must be a valid UUID",
        ))
    })
}

fn parse_payment_id(raw: &str) -> Result<PaymentId, PaymentApiError> {
    raw.parse::<PaymentId>().map_err(|_| {
        PaymentApiError(DomainError::new(
            ErrorCode::InvalidFormat,
            "payment_id must be a valid UUID",
        ))
    })
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts domain errors to HTTP responses.
pub struct PaymentApiError(DomainError);

impl From<DomainError> for PaymentApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for PaymentApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.0.code {
            ErrorCode::ValidationFailed | ErrorCode::InvalidFormat | ErrorCode::UnknownPlan => {
                StatusCode::BAD_REQUEST
            }
            ErrorCode::PaymentNotFound | ErrorCode::WeddingNotFound => StatusCode::NOT_FOUND,
            ErrorCode::PlanNotAllowed
            | ErrorCode::AlreadyFinalized
            | ErrorCode::InvalidStateTransition => StatusCode::CONFLICT,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::DatabaseError | ErrorCode::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ErrorResponse {
            error_code: self.0.code.to_string(),
            message: self.0.message,
            details: if self.0.details.is_empty() {
                None
            } else {
                serde_json::to_value(&self.0.details).ok()
            },
        };
        (status, Json(body)).into_response()
    }
}
