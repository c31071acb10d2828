//! Echo Chamber — arithmetic sequence predictor.
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod messages;
pub mod predictor;
pub mod server;
pub mod repl;
