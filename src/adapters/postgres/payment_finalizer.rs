//! PostgreSQL implementation of PaymentFinalizer.
//!
//! The PENDING guard is a conditional UPDATE (`WHERE status = 'PENDING'`),
//! so concurrent finalize calls for the same payment serialize at the row
//! and exactly one observes `rows_affected == 1`. On completion the
//! wedding entitlement update runs in the same transaction as the payment
//! update, so a crash cannot leave a COMPLETED payment with an unentitled
//! wedding.

use crate::domain::foundation::{DomainError, ErrorCode, PaymentId};
use crate::domain::wedding::EntitlementGrant;
use crate::ports::{FinalizeResult, PaymentFinalizer};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::wedding_reader::wedding_status_to_string;

/// PostgreSQL implementation of the PaymentFinalizer port.
pub struct PostgresPaymentFinalizer {
    pool: PgPool,
}

impl PostgresPaymentFinalizer {
    /// Creates a new PostgresPaymentFinalizer with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Classifies a no-op conditional update: the payment either does not
    /// exist or is already terminal.
    async fn classify_missed_update(
        &self,
        payment_id: &PaymentId,
    ) -> Result<FinalizeResult, DomainError> {
        let exists: Option<(String,)> =
            sqlx::query_as("SELECT status FROM payments WHERE id = $1")
                .bind(payment_id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error)?;

        match exists {
            Some(_) => Ok(FinalizeResult::AlreadyFinalized),
            None => Ok(FinalizeResult::NotFound),
        }
    }
}

fn db_error(e: sqlx::Error) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Failed to finalize payment: {}", e),
    )
}

#[async_trait]
impl PaymentFinalizer for PostgresPaymentFinalizer {
    async fn complete(
        &self,
        payment_id: &PaymentId,
        provider_transaction_id: Option<String>,
        grant: &EntitlementGrant,
    ) -> Result<FinalizeResult, DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let updated: Option<(Uuid,)> = sqlx::query_as(
            r#"
            UPDATE payments
            SET status = 'COMPLETED',
                paid_at = $2,
                provider_transaction_id = $3
            WHERE id = $1 AND status = 'PENDING'
            RETURNING wedding_id
            "#,
        )
        .bind(payment_id.as_uuid())
        .bind(grant.paid_at.as_datetime())
        .bind(&provider_transaction_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error)?;

        let Some((wedding_id,)) = updated else {
            tx.rollback().await.map_err(db_error)?;
            return self.classify_missed_update(payment_id).await;
        };

        sqlx::query(
            r#"
            UPDATE weddings
            SET status = $2,
                plan = $3,
                paid_at = $4,
                expires_at = $5,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(wedding_id)
        .bind(wedding_status_to_string(&grant.status))
        .bind(grant.plan.code())
        .bind(grant.paid_at.as_datetime())
        .bind(grant.expires_at.as_ref().map(|t| *t.as_datetime()))
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;

        info!(
            payment_id = %payment_id,
            wedding_id = %wedding_id,
            plan = grant.plan.code(),
            "Payment completed and entitlement applied"
        );

        Ok(FinalizeResult::Applied)
    }

    async fn fail(&self, payment_id: &PaymentId) -> Result<FinalizeResult, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE payments
            SET status = 'FAILED'
            WHERE id = $1 AND status = 'PENDING'
            "#,
        )
        .bind(payment_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return self.classify_missed_update(payment_id).await;
        }

        info!(payment_id = %payment_id, "Payment marked failed");

        Ok(FinalizeResult::Applied)
    }
}
