//! PostgreSQL implementation of WeddingReader.
//!
//! Read-only queries over the ownership and entitlement columns of the
//! weddings table. Entitlement writes go through the finalizer.

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId, WeddingId};
use crate::domain::wedding::{Wedding, WeddingStatus};
use crate::ports::WeddingReader;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::payment_repository::parse_plan;

/// PostgreSQL implementation of the WeddingReader port.
pub struct PostgresWeddingReader {
    pool: PgPool,
}

impl PostgresWeddingReader {
    /// Creates a new PostgresWeddingReader with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of the wedding entitlement slice.
#[derive(Debug, sqlx::FromRow)]
struct WeddingRow {
    id: Uuid,
    owner_user_id: String,
    status: String,
    plan: String,
    paid_at: Option<DateTime<Utc>>,
    expires_at: Option<DateTime<Utc>>,
}

impl TryFrom<WeddingRow> for Wedding {
    type Error = DomainError;

    fn try_from(row: WeddingRow) -> Result<Self, Self::Error> {
        Ok(Wedding {
            id: WeddingId::from_uuid(row.id),
            owner_user_id: UserId::new(row.owner_user_id).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid owner id: {}", e))
            })?,
            status: parse_wedding_status(&row.status)?,
            plan: parse_plan(&row.plan)?,
            paid_at: row.paid_at.map(Timestamp::from_datetime),
            expires_at: row.expires_at.map(Timestamp::from_datetime),
        })
    }
}

fn parse_wedding_status(s: &str) -> Result<WeddingStatus, DomainError> {
    match s.to_uppercase().as_str() {
        "DRAFT" => Ok(WeddingStatus::Draft),
        "DEMO" => Ok(WeddingStatus::Demo),
        "PUBLISHED" => Ok(WeddingStatus::Published),
        "EXPIRED" => Ok(WeddingStatus::Expired),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid wedding status value: {}", s),
        )),
    }
}

pub(crate) fn wedding_status_to_string(status: &WeddingStatus) -> &'static str {
    match status {
        WeddingStatus::Draft => "DRAFT",
        WeddingStatus::Demo => "DEMO",
        WeddingStatus::Published => "PUBLISHED",
        WeddingStatus::Expired => "EXPIRED",
    }
}

#[async_trait]
impl WeddingReader for PostgresWeddingReader {
    async fn find_by_id(&self, id: &WeddingId) -> Result<Option<Wedding>, DomainError> {
        let row: Option<WeddingRow> = sqlx::query_as(
            r#"
            SELECT id, owner_user_id, status, plan, paid_at, expires_at
            FROM weddings
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find wedding: {}", e),
            )
        })?;

        row.map(Wedding::try_from).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wedding_status_strings_round_trip() {
        for status in [
            WeddingStatus::Draft,
            WeddingStatus::Demo,
            WeddingStatus::Published,
            WeddingStatus::Expired,
        ] {
            assert_eq!(
                parse_wedding_status(wedding_status_to_string(&status)).unwrap(),
                status
            );
        }
    }

    #[test]
    fn unknown_wedding_status_is_rejected() {
        assert!(parse_wedding_status("ARCHIVED").is_err());
    }
}
