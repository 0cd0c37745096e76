//! VowPage payment backend
//!
//! This crate implements the payment and entitlement subsystem for the
//! VowPage wedding invitation platform: VNPay hosted-page payments,
//! manual bank transfers, and the atomic entitlement upgrade that follows
//! a confirmed payment.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
