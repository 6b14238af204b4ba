//! Application state.

use std::sync::Arc;

use chrono::Duration;
use hirehub_firestore::{
    AccountRepository, CompanyRepository, FirestoreClient, JobRepository, TrendingJobRepository,
};
use hirehub_models::{JobSeekerAccount, RecruiterAccount};

use crate::auth::TokenService;
use crate::config::ApiConfig;
use crate::password::PasswordHasher;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ApiConfig>,
    pub firestore: FirestoreClient,
    pub job_seekers: AccountRepository<JobSeekerAccount>,
    pub recruiters: AccountRepository<RecruiterAccount>,
    pub jobs: JobRepository,
    pub trending_jobs: TrendingJobRepository,
    pub companies: CompanyRepository,
    pub tokens: Arc<TokenService>,
    pub passwords: PasswordHasher,
}

impl AppState {
    /// Create application state, connecting to Firestore from the environment.
    pub async fn new(config: ApiConfig) -> anyhow::Result<Self> {
        let firestore = FirestoreClient::from_env().await?;
        Ok(Self::with_firestore(config, firestore))
    }

    /// Create application state over an existing Firestore client.
    pub fn with_firestore(config: ApiConfig, firestore: FirestoreClient) -> Self {
        let tokens = TokenService::new(
            config.jwt_secret.as_bytes(),
            Duration::days(config.token_ttl_days),
        );

        Self {
            job_seekers: AccountRepository::new(firestore.clone()),
            recruiters: AccountRepository::new(firestore.clone()),
            jobs: JobRepository::new(firestore.clone()),
            trending_jobs: TrendingJobRepository::new(firestore.clone()),
            companies: CompanyRepository::new(firestore.clone()),
            firestore,
            tokens: Arc::new(tokens),
            passwords: PasswordHasher::new(),
            config: Arc::new(config),
        }
    }

    /// Replace the password hasher (tests use cheap parameters).
    pub fn with_password_hasher(mut self, passwords: PasswordHasher) -> Self {
        self.passwords = passwords;
        self
    }
}
