//! Integration tests for the payment HTTP flow.
//!
//! These tests drive the full wiring end to end over in-memory adapters:
//! 1. Create a payment through the API
//! 2. Deliver a signed provider confirmation to the IPN endpoint
//! 3. Verify the ledger transition and the entitlement grant
//! 4. Replay and tamper with the confirmation
//!
//! Uses in-memory port implementations so no database is required.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{TimeZone, Utc};
use secrecy::SecretString;
use tower::ServiceExt;

use vowpage::adapters::http::{payment_router, PaymentAppState};
use vowpage::adapters::vnpay::VnpayRedirectBuilder;
use vowpage::domain::foundation::{DomainError, PaymentId, Timestamp, UserId, WeddingId};
use vowpage::domain::payment::{
    BankAccount, PaymentRecord, PaymentStatus, SecureHashSigner, SECURE_HASH_FIELD,
};
use vowpage::domain::wedding::{EntitlementGrant, Wedding, WeddingStatus};
use vowpage::ports::{
    Clock, FinalizeResult, PaymentFinalizer, PaymentRepository, WeddingReader,
};

const HASH_SECRET: &str = "integration_hash_secret";
const ADMIN_KEY: &str = "integration-admin-key";
const OWNER: &str = "owner-user-1";

// =============================================================================
// Test Infrastructure
// =============================================================================

/// In-memory payment store with the same conditional-update semantics as
/// the Postgres finalizer: the PENDING guard is checked and flipped under
/// one lock.
#[derive(Default)]
struct InMemoryStore {
    records: Mutex<HashMap<PaymentId, PaymentRecord>>,
    grants: Mutex<Vec<(WeddingId, EntitlementGrant)>>,
}

impl InMemoryStore {
    fn record(&self, id: &PaymentId) -> Option<PaymentRecord> {
        self.records.lock().unwrap().get(id).cloned()
    }

    fn grants(&self) -> Vec<(WeddingId, EntitlementGrant)> {
        self.grants.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentRepository for InMemoryStore {
    async fn create(&self, record: &PaymentRecord) -> Result<(), DomainError> {
        self.records
            .lock()
            .unwrap()
            .insert(record.id, record.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &PaymentId) -> Result<Option<PaymentRecord>, DomainError> {
        Ok(self.records.lock().unwrap().get(id).cloned())
    }
}

#[async_trait]
impl PaymentFinalizer for InMemoryStore {
    async fn complete(
        &self,
        payment_id: &PaymentId,
        provider_transaction_id: Option<String>,
        grant: &EntitlementGrant,
    ) -> Result<FinalizeResult, DomainError> {
        let mut records = self.records.lock().unwrap();
        match records.get_mut(payment_id) {
            None => Ok(FinalizeResult::NotFound),
            Some(record) if record.status != PaymentStatus::Pending => {
                Ok(FinalizeResult::AlreadyFinalized)
            }
            Some(record) => {
                record.status = PaymentStatus::Completed;
                record.paid_at = Some(grant.paid_at);
                record.provider_transaction_id = provider_transaction_id;
                self.grants
                    .lock()
                    .unwrap()
                    .push((record.wedding_id, grant.clone()));
                Ok(FinalizeResult::Applied)
            }
        }
    }

    async fn fail(&self, payment_id: &PaymentId) -> Result<FinalizeResult, DomainError> {
        let mut records = self.records.lock().unwrap();
        match records.get_mut(payment_id) {
            None => Ok(FinalizeResult::NotFound),
            Some(record) if record.status != PaymentStatus::Pending => {
                Ok(FinalizeResult::AlreadyFinalized)
            }
            Some(record) => {
                record.status = PaymentStatus::Failed;
                Ok(FinalizeResult::Applied)
            }
        }
    }
}

struct InMemoryWeddings {
    weddings: Mutex<HashMap<WeddingId, Wedding>>,
}

impl InMemoryWeddings {
    fn with(wedding: Wedding) -> Self {
        let mut map = HashMap::new();
        map.insert(wedding.id, wedding);
        Self {
            weddings: Mutex::new(map),
        }
    }
}

#[async_trait]
impl WeddingReader for InMemoryWeddings {
    async fn find_by_id(&self, id: &WeddingId) -> Result<Option<Wedding>, DomainError> {
        Ok(self.weddings.lock().unwrap().get(id).cloned())
    }
}

struct FixedClock(Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}

fn fixed_now() -> Timestamp {
    Timestamp::from_datetime(Utc.with_ymd_and_hms(2026, 3, 7, 10, 0, 0).unwrap())
}

struct TestApp {
    app: Router,
    store: Arc<InMemoryStore>,
    wedding_id: WeddingId,
}

fn test_app() -> TestApp {
    let store = Arc::new(InMemoryStore::default());
    let wedding = Wedding {
        id: WeddingId::new(),
        owner_user_id: UserId::new(OWNER).unwrap(),
        status: WeddingStatus::Draft,
        plan: vowpage::domain::payment::Plan::Free,
        paid_at: None,
        expires_at: None,
    };
    let wedding_id = wedding.id;

    let state = PaymentAppState {
        payment_repository: store.clone(),
        payment_finalizer: store.clone(),
        wedding_reader: Arc::new(InMemoryWeddings::with(wedding)),
        clock: Arc::new(FixedClock(fixed_now())),
        signer: Arc::new(SecureHashSigner::new(HASH_SECRET)),
        redirect_builder: Arc::new(VnpayRedirectBuilder::new(
            "VOWPAGE1",
            "https://sandbox.vnpayment.vn/paymentv2/vpcpay.html",
            "https://vowpage.example/api/payments/vnpay/return",
            HASH_SECRET,
        )),
        bank_account: BankAccount {
            bank_name: "Vietcombank".to_string(),
            account_number: "1234567890".to_string(),
            account_holder: "NGUYEN VAN A".to_string(),
            branch: "Chi nhanh Ha Noi".to_string(),
        },
        admin_api_key: SecretString::new(ADMIN_KEY.to_string()),
        dashboard_url: "/dashboard/payments".to_string(),
    };

    TestApp {
        app: payment_router().with_state(state),
        store,
        wedding_id,
    }
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn create_payment(test: &TestApp, method: &str) -> String {
    let body = serde_json::json!({
        "wedding_id": test.wedding_id.to_string(),
        "plan": "BASIC",
        "method": method,
    });
    let (status, json) = send(
        &test.app,
        Request::builder()
            .method("POST")
            .uri("/payments")
            .header("content-type", "application/json")
            .header("X-User-Id", OWNER)
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    json["payment"]["id"].as_str().unwrap().to_string()
}

fn signed_ipn_params(payment_id: &str, response_code: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();
    params.insert("vnp_TxnRef".to_string(), payment_id.to_string());
    params.insert("vnp_ResponseCode".to_string(), response_code.to_string());
    params.insert("vnp_TransactionNo".to_string(), "14422574".to_string());
    params.insert("vnp_Amount".to_string(), "50000000".to_string());
    params.insert("vnp_TmnCode".to_string(), "VOWPAGE1".to_string());

    let signature = SecureHashSigner::new(HASH_SECRET).sign(&params);
    params.insert(SECURE_HASH_FIELD.to_string(), signature);
    params
}

async fn post_ipn(app: &Router, params: &HashMap<String, String>) -> serde_json::Value {
    let (status, json) = send(
        app,
        Request::builder()
            .method("POST")
            .uri("/payments/vnpay/ipn")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(params).unwrap()))
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    json
}

// =============================================================================
// Provider Path
// =============================================================================

#[tokio::test]
async fn provider_payment_completes_and_entitles_the_wedding() {
    let test = test_app();
    let payment_id = create_payment(&test, "provider_redirect").await;

    let ack = post_ipn(&test.app, &signed_ipn_params(&payment_id, "00")).await;
    assert_eq!(ack["RspCode"], "00");

    let record = test
        .store
        .record(&payment_id.parse().unwrap())
        .expect("ledger row exists");
    assert_eq!(record.status, PaymentStatus::Completed);
    assert_eq!(record.paid_at, Some(fixed_now()));
    assert_eq!(record.provider_transaction_id.as_deref(), Some("14422574"));

    let grants = test.store.grants();
    assert_eq!(grants.len(), 1);
    assert_eq!(grants[0].0, test.wedding_id);
    assert_eq!(grants[0].1.status, WeddingStatus::Published);
    // BASIC runs for six months from the completion time.
    assert_eq!(grants[0].1.expires_at, Some(fixed_now().add_days(180)));
}

#[tokio::test]
async fn replayed_confirmation_acks_already_confirmed_without_second_grant() {
    let test = test_app();
    let payment_id = create_payment(&test, "provider_redirect").await;
    let params = signed_ipn_params(&payment_id, "00");

    let first = post_ipn(&test.app, &params).await;
    assert_eq!(first["RspCode"], "00");

    let second = post_ipn(&test.app, &params).await;
    assert_eq!(second["RspCode"], "02");

    assert_eq!(test.store.grants().len(), 1);
}

#[tokio::test]
async fn tampered_confirmation_is_rejected_and_mutates_nothing() {
    let test = test_app();
    let payment_id = create_payment(&test, "provider_redirect").await;

    let mut params = signed_ipn_params(&payment_id, "00");
    params.insert("vnp_Amount".to_string(), "100000000".to_string());

    let ack = post_ipn(&test.app, &params).await;
    assert_eq!(ack["RspCode"], "97");

    let record = test.store.record(&payment_id.parse().unwrap()).unwrap();
    assert_eq!(record.status, PaymentStatus::Pending);
    assert!(test.store.grants().is_empty());
}

#[tokio::test]
async fn failed_provider_outcome_is_recorded_and_acked_confirmed() {
    let test = test_app();
    let payment_id = create_payment(&test, "provider_redirect").await;

    let ack = post_ipn(&test.app, &signed_ipn_params(&payment_id, "24")).await;
    assert_eq!(ack["RspCode"], "00");

    let record = test.store.record(&payment_id.parse().unwrap()).unwrap();
    assert_eq!(record.status, PaymentStatus::Failed);
    assert!(test.store.grants().is_empty());
}

#[tokio::test]
async fn confirmation_for_unknown_order_acks_order_not_found() {
    let test = test_app();

    let unknown = PaymentId::new().to_string();
    let ack = post_ipn(&test.app, &signed_ipn_params(&unknown, "00")).await;
    assert_eq!(ack["RspCode"], "01");
}

// =============================================================================
// Manual Path
// =============================================================================

#[tokio::test]
async fn bank_transfer_confirmed_by_operator_completes_the_payment() {
    let test = test_app();
    let payment_id = create_payment(&test, "bank_transfer").await;

    let body = serde_json::json!({
        "payment_id": payment_id,
        "action": "confirm",
    });
    let (status, json) = send(
        &test.app,
        Request::builder()
            .method("POST")
            .uri("/payments/webhook")
            .header("content-type", "application/json")
            .header("x-api-key", ADMIN_KEY)
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["applied"], true);
    assert_eq!(json["status"], "COMPLETED");

    let record = test.store.record(&payment_id.parse().unwrap()).unwrap();
    assert_eq!(record.status, PaymentStatus::Completed);
    // Manual confirmations carry no provider transaction reference.
    assert!(record.provider_transaction_id.is_none());
}

#[tokio::test]
async fn bank_transfer_create_returns_instructions() {
    let test = test_app();
    let body = serde_json::json!({
        "wedding_id": test.wedding_id.to_string(),
        "plan": "STANDARD",
        "method": "bank_transfer",
    });
    let (status, json) = send(
        &test.app,
        Request::builder()
            .method("POST")
            .uri("/payments")
            .header("content-type", "application/json")
            .header("X-User-Id", OWNER)
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["bank_info"]["amount"], 1_000_000);
    assert_eq!(json["bank_info"]["bank_name"], "Vietcombank");
    let content = json["bank_info"]["transfer_content"].as_str().unwrap();
    assert!(content.starts_with("TC"));
    assert!(content.ends_with(" STANDARD"));
    assert!(json.get("payment_url").is_none());
}

// =============================================================================
// Status Poll
// =============================================================================

#[tokio::test]
async fn owner_can_poll_status_through_the_flow() {
    let test = test_app();
    let payment_id = create_payment(&test, "provider_redirect").await;

    let (status, json) = send(
        &test.app,
        Request::builder()
            .uri(format!("/payments/{}/status", payment_id))
            .header("X-User-Id", OWNER)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "PENDING");
    assert!(json["paid_at"].is_null());

    post_ipn(&test.app, &signed_ipn_params(&payment_id, "00")).await;

    let (status, json) = send(
        &test.app,
        Request::builder()
            .uri(format!("/payments/{}/status", payment_id))
            .header("X-User-Id", OWNER)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "COMPLETED");
    assert!(json["paid_at"].is_string());
}

#[tokio::test]
async fn non_owner_poll_looks_like_absence() {
    let test = test_app();
    let payment_id = create_payment(&test, "provider_redirect").await;

    let (status, _) = send(
        &test.app,
        Request::builder()
            .uri(format!("/payments/{}/status", payment_id))
            .header("X-User-Id", "somebody-else")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
