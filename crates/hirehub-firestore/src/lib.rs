//! Firestore REST API client and repositories.
//!
//! This crate provides:
//! - A Firestore client with service-account or emulator auth, retries for
//!   reads, atomic commits and optimistic-concurrency updates
//! - A generic [`Repository`] over record collections
//! - Account repositories with a unique email index per account kind
//! - Job, trending job and company repositories

pub mod accounts;
pub mod client;
pub mod companies;
pub mod error;
pub mod jobs;
pub mod metrics;
pub mod record;
pub mod repository;
pub mod retry;
pub mod token_cache;
pub mod trending;
pub mod types;

#[cfg(test)]
mod client_tests;

pub use accounts::{email_key, AccountRecord, AccountRepository};
pub use client::{FirestoreClient, FirestoreConfig};
pub use companies::CompanyRepository;
pub use error::{FirestoreError, FirestoreResult};
pub use jobs::JobRepository;
pub use record::{HasApplicants, Record};
pub use repository::{ApplyOutcome, Repository};
pub use retry::RetryConfig;
pub use trending::TrendingJobRepository;
pub use types::{Document, FromFirestoreValue, ToFirestoreValue, Value};
