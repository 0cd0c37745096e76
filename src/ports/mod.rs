//! Ports: async contracts between the application layer and adapters.

mod clock;
mod payment_finalizer;
mod payment_repository;
mod wedding_reader;

pub use clock::{Clock, SystemClock};
pub use payment_finalizer::{FinalizeResult, PaymentFinalizer};
pub use payment_repository::PaymentRepository;
pub use wedding_reader::WeddingReader;
