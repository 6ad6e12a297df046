//! Shared types, errors, and configuration for Fluxo.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for remote store records
//! - Reporting date windows and page ranges
//! - Shared-secret session gate types
//! - Application-wide error types
//! - Configuration management

pub mod auth;
pub mod config;
pub mod error;
pub mod types;


pub use auth::{LoginRequest, SessionToken, SharedSecret};
pub use config::AppConfig;
pub use error::AppError;
pub use types::{DateWindow, RowRange};
