//! Axum HTTP API server for the job board.
//!
//! This crate provides:
//! - Registration and login for job seekers and recruiters
//! - Bearer token auth with one extractor per account kind
//! - Job search, posting, applying, trending jobs and companies
//! - Rate limiting, security headers and Prometheus metrics

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod password;
pub mod routes;
pub mod security;
pub mod state;

pub use auth::{Auth, Claims, Principal, TokenService};
pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ApiResult, JsonBody};
pub use password::PasswordHasher;
pub use routes::create_router;
pub use state::AppState;
