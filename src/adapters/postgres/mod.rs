//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresPaymentRepository` - Payment ledger persistence
//! - `PostgresPaymentFinalizer` - Atomic finalize + entitlement transaction
//! - `PostgresWeddingReader` - Read-only wedding entitlement queries

mod payment_finalizer;
mod payment_repository;
mod wedding_reader;

pub use payment_finalizer::PostgresPaymentFinalizer;
pub use payment_repository::PostgresPaymentRepository;
pub use wedding_reader::PostgresWeddingReader;
