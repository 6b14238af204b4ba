//! Bearer token issuance and the per-domain auth extractor.
//!
//! Tokens are HS256 JWTs binding an account id to its account kind. The
//! [`Auth`] extractor is generic over the account type, so job-seeker and
//! recruiter routes share one verification path while each resolves the
//! principal in its own collection.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::{DateTime, Duration, Utc};
use hirehub_firestore::{AccountRecord, AccountRepository};
use hirehub_models::{AccountId, AccountKind, JobSeekerAccount, RecruiterAccount};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

const MISSING_TOKEN: &str = "No token, authorization denied";
const INVALID_TOKEN: &str = "Token is not valid";

/// Token claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Account id
    pub sub: String,
    /// Account domain the token was issued for
    pub kind: AccountKind,
    /// Issued at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch, inclusive)
    pub exp: i64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed or badly signed token")]
    Invalid,

    #[error("token expired")]
    Expired,
}

/// Issues and verifies signed, time-limited bearer tokens.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the caller's clock in `verify_at`.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.required_spec_claims.clear();

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, account_id: &AccountId, kind: AccountKind) -> ApiResult<String> {
        self.issue_at(account_id, kind, Utc::now())
    }

    /// Issue a token valid from `now` until `now + ttl`.
    pub fn issue_at(
        &self,
        account_id: &AccountId,
        kind: AccountKind,
        now: DateTime<Utc>,
    ) -> ApiResult<String> {
        let claims = Claims {
            sub: account_id.to_string(),
            kind,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| ApiError::internal(format!("Failed to sign token: {}", e)))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify signature and expiry. Valid while `now <= exp`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            debug!(error = %e, "Token rejected");
            TokenError::Invalid
        })?;
        if now.timestamp() > data.claims.exp {
            return Err(TokenError::Expired);
        }
        Ok(data.claims)
    }
}

/// An account type that can authenticate requests.
pub trait Principal: AccountRecord + 'static {
    fn repository(state: &AppState) -> &AccountRepository<Self>;
}

impl Principal for JobSeekerAccount {
    fn repository(state: &AppState) -> &AccountRepository<Self> {
        &state.job_seekers
    }
}

impl Principal for RecruiterAccount {
    fn repository(state: &AppState) -> &AccountRepository<Self> {
        &state.recruiters
    }
}

/// Authenticated principal of account type `A`.
pub struct Auth<A>(pub A);

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn reject<A: Principal>(reason: &'static str, message: &'static str) -> ApiError {
    metrics::record_auth_failure(A::KIND.as_str(), reason);
    ApiError::unauthorized(message)
}

#[axum::async_trait]
impl<A: Principal> FromRequestParts<AppState> for Auth<A> {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(|| reject::<A>("missing", MISSING_TOKEN))?;

        let claims = state
            .tokens
            .verify(token)
            .map_err(|_| reject::<A>("invalid", INVALID_TOKEN))?;

        if claims.kind != A::KIND {
            debug!(expected = %A::KIND, got = %claims.kind, "Token issued for another account kind");
            return Err(reject::<A>("wrong_kind", INVALID_TOKEN));
        }

        match A::repository(state).get(&claims.sub).await? {
            Some(account) => Ok(Auth(account)),
            None => Err(reject::<A>("unknown_account", INVALID_TOKEN)),
        }
    }
}
