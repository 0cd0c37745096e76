//! PostgreSQL implementation of PaymentRepository.
//!
//! Provides persistent storage for payment ledger rows using PostgreSQL.

use crate::domain::foundation::{DomainError, ErrorCode, PaymentId, Timestamp, WeddingId};
use crate::domain::payment::{PaymentMethod, PaymentRecord, PaymentStatus, Plan};
use crate::ports::PaymentRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL implementation of the PaymentRepository port.
///
/// Uses sqlx for type-safe database operations with connection pooling.
pub struct PostgresPaymentRepository {
    pool: PgPool,
}

impl PostgresPaymentRepository {
    /// Creates a new PostgresPaymentRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a payment.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct PaymentRow {
    pub id: Uuid,
    pub wedding_id: Uuid,
    pub amount: i64,
    pub plan: String,
    pub method: String,
    pub status: String,
    pub provider_transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}

impl TryFrom<PaymentRow> for PaymentRecord {
    type Error = DomainError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        Ok(PaymentRecord {
            id: PaymentId::from_uuid(row.id),
            wedding_id: WeddingId::from_uuid(row.wedding_id),
            amount: row.amount,
            plan: parse_plan(&row.plan)?,
            method: parse_method(&row.method)?,
            status: parse_status(&row.status)?,
            provider_transaction_id: row.provider_transaction_id,
            created_at: Timestamp::from_datetime(row.created_at),
            paid_at: row.paid_at.map(Timestamp::from_datetime),
        })
    }
}

pub(crate) fn parse_plan(s: &str) -> Result<Plan, DomainError> {
    match s.to_uppercase().as_str() {
        "FREE" => Ok(Plan::Free),
        "BASIC" => Ok(Plan::Basic),
        "STANDARD" => Ok(Plan::Standard),
        "PREMIUM" => Ok(Plan::Premium),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid plan value: {}", s),
        )),
    }
}

fn parse_method(s: &str) -> Result<PaymentMethod, DomainError> {
    match s.to_lowercase().as_str() {
        "provider_redirect" => Ok(PaymentMethod::ProviderRedirect),
        "bank_transfer" => Ok(PaymentMethod::BankTransfer),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid method value: {}", s),
        )),
    }
}

pub(crate) fn parse_status(s: &str) -> Result<PaymentStatus, DomainError> {
    match s.to_uppercase().as_str() {
        "PENDING" => Ok(PaymentStatus::Pending),
        "COMPLETED" => Ok(PaymentStatus::Completed),
        "FAILED" => Ok(PaymentStatus::Failed),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid status value: {}", s),
        )),
    }
}

fn method_to_string(method: &PaymentMethod) -> &'static str {
    match method {
        PaymentMethod::ProviderRedirect => "provider_redirect",
        PaymentMethod::BankTransfer => "bank_transfer",
    }
}

pub(crate) fn status_to_string(status: &PaymentStatus) -> &'static str {
    match status {
        PaymentStatus::Pending => "PENDING",
        PaymentStatus::Completed => "COMPLETED",
        PaymentStatus::Failed => "FAILED",
    }
}

#[async_trait]
impl PaymentRepository for PostgresPaymentRepository {
    async fn create(&self, record: &PaymentRecord) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO payments (
                id, wedding_id, amount, plan, method, status,
                provider_transaction_id, created_at, paid_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(record.id.as_uuid())
        .bind(record.wedding_id.as_uuid())
        .bind(record.amount)
        .bind(record.plan.code())
        .bind(method_to_string(&record.method))
        .bind(status_to_string(&record.status))
        .bind(&record.provider_transaction_id)
        .bind(record.created_at.as_datetime())
        .bind(record.paid_at.as_ref().map(|t| *t.as_datetime()))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to save payment: {}", e),
            )
        })?;

        Ok(())
    }

    async fn find_by_id(&self, id: &PaymentId) -> Result<Option<PaymentRecord>, DomainError> {
        let row: Option<PaymentRow> = sqlx::query_as(
            r#"
            SELECT id, wedding_id, amount, plan, method, status,
                   provider_transaction_id, created_at, paid_at
            FROM payments
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find payment: {}", e),
            )
        })?;

        row.map(PaymentRecord::try_from).transpose()
    }
}
