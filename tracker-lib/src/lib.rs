pub mod auth;
pub mod config;
mod error;
pub mod report;
pub mod tracing;
pub mod transaction;
