//! Application command/query handlers.

pub mod payment;
