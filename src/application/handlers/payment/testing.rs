//! Shared mocks and fixtures for payment handler tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::adapters::vnpay::VnpayRedirectBuilder;
use crate::domain::foundation::{DomainError, PaymentId, Timestamp, UserId, WeddingId};
use crate::domain::payment::{BankAccount, PaymentRecord, PaymentStatus, Plan};
use crate::domain::wedding::{EntitlementGrant, Wedding, WeddingStatus};
use crate::ports::{Clock, FinalizeResult, PaymentFinalizer, PaymentRepository, WeddingReader};

/// Shared secret used across handler tests.
pub const TEST_HASH_SECRET: &str = "handler_test_hash_secret";

/// Clock pinned to a fixed instant.
pub struct FixedClock {
    now: Timestamp,
}

impl FixedClock {
    pub fn at(now: Timestamp) -> Self {
        Self { now }
    }
}

impl Default for FixedClock {
    fn default() -> Self {
        Self::at(Timestamp::from_datetime(
            Utc.with_ymd_and_hms(2026, 3, 7, 10, 0, 0).unwrap(),
        ))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.now
    }
}

/// In-memory payment store implementing both the repository and the
/// finalizer with the same conditional-update semantics as the Postgres
/// adapter: the PENDING guard is checked and flipped under one lock.
#[derive(Default)]
pub struct MockPaymentStore {
    records: Mutex<HashMap<PaymentId, PaymentRecord>>,
    created_order: Mutex<Vec<PaymentId>>,
    grants: Mutex<Vec<(WeddingId, EntitlementGrant)>>,
    pub fail_writes: bool,
}

impl MockPaymentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: PaymentRecord) -> Self {
        let store = Self::default();
        store
            .records
            .lock()
            .unwrap()
            .insert(record.id, record);
        store
    }

    /// Records persisted through `create`, in insertion order.
    pub fn created(&self) -> Vec<PaymentRecord> {
        let records = self.records.lock().unwrap();
        self.created_order
            .lock()
            .unwrap()
            .iter()
            .filter_map(|id| records.get(id).cloned())
            .collect()
    }

    /// Current state of one record.
    pub fn record(&self, id: &PaymentId) -> Option<PaymentRecord> {
        self.records.lock().unwrap().get(id).cloned()
    }

    /// Entitlement grants applied through `complete`.
    pub fn grants(&self) -> Vec<(WeddingId, EntitlementGrant)> {
        self.grants.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentRepository for MockPaymentStore {
    async fn create(&self, record: &PaymentRecord) -> Result<(), DomainError> {
        if self.fail_writes {
            return Err(DomainError::database("mock write failure"));
        }
        self.records
            .lock()
            .unwrap()
            .insert(record.id, record.clone());
        self.created_order.lock().unwrap().push(record.id);
        Ok(())
    }

    async fn find_by_id(&self, id: &PaymentId) -> Result<Option<PaymentRecord>, DomainError> {
        Ok(self.records.lock().unwrap().get(id).cloned())
    }
}

#[async_trait]
impl PaymentFinalizer for MockPaymentStore {
    async fn complete(
        &self,
        payment_id: &PaymentId,
        provider_transaction_id: Option<String>,
        grant: &EntitlementGrant,
    ) -> Result<FinalizeResult, DomainError> {
        if self.fail_writes {
            return Err(DomainError::database("mock write failure"));
        }
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
        if self.fail_writes {
            return Err(DomainError::database("mock write failure"));
        }
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

/// In-memory wedding reader.
#[derive(Default)]
pub struct MockWeddingReader {
    weddings: Mutex<HashMap<WeddingId, Wedding>>,
}

impl MockWeddingReader {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_wedding(wedding: Wedding) -> Self {
        let reader = Self::default();
        reader
            .weddings
            .lock()
            .unwrap()
            .insert(wedding.id, wedding);
        reader
    }
}

#[async_trait]
impl WeddingReader for MockWeddingReader {
    async fn find_by_id(&self, id: &WeddingId) -> Result<Option<Wedding>, DomainError> {
        Ok(self.weddings.lock().unwrap().get(id).cloned())
    }
}

pub fn test_user() -> UserId {
    UserId::new("user-under-test").unwrap()
}

pub fn wedding_with(status: WeddingStatus, plan: Plan) -> Wedding {
    Wedding {
        id: WeddingId::new(),
        owner_user_id: test_user(),
        status,
        plan,
        paid_at: None,
        expires_at: None,
    }
}

pub fn test_bank_account() -> BankAccount {
    BankAccount {
        bank_name: "Vietcombank".to_string(),
        account_number: "1234567890".to_string(),
        account_holder: "NGUYEN VAN A".to_string(),
        branch: "Chi nhanh Ha Noi".to_string(),
    }
}

pub fn test_redirect_builder() -> VnpayRedirectBuilder {
    VnpayRedirectBuilder::new(
        "VOWPAGE1",
        "https://sandbox.vnpayment.vn/paymentv2/vpcpay.html",
        "https://vowpage.example/api/payments/vnpay/return",
        TEST_HASH_SECRET,
    )
}
