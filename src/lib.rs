//! SORTEO — Lottery prediction settlement and audit engine
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod registry;
pub mod cost;
pub mod payout;
pub mod settlement;
pub mod ingest;
pub mod report;
