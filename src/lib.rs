//! Penny API Library
//!
//! Re-exports modules for integration testing and the server binary.

pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod security;
pub mod service;

pub use config::Config;
pub use domain::{Principal, Summary, SummaryRange, TransactionKind};
pub use error::{AppError, AppResult};
pub use security::TokenService;
