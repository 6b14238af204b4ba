//! Job-seeker and recruiter accounts.
//!
//! The two account kinds are independent principal domains: each has its own
//! collection, its own token scope and its own email-uniqueness space.

use std::fmt;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};
use crate::ids::AccountId;
use crate::validation::{email, required};

/// Which principal domain an account (or a token) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    JobSeeker,
    Recruiter,
}

impl AccountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::JobSeeker => "job_seeker",
            AccountKind::Recruiter => "recruiter",
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Job-seeker work status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum WorkStatus {
    Experienced,
    Fresher,
}

impl WorkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkStatus::Experienced => "experienced",
            WorkStatus::Fresher => "fresher",
        }
    }

    /// Parse the exact wire value.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "experienced" => Some(WorkStatus::Experienced),
            "fresher" => Some(WorkStatus::Fresher),
            _ => None,
        }
    }
}

/// Behaviour shared by both account kinds.
pub trait Account: Send + Sync {
    /// Principal domain of this account type.
    const KIND: AccountKind;

    /// Public-safe projection returned to clients. Never carries the hash.
    type Profile: Serialize + Send;

    fn id(&self) -> &AccountId;
    fn email(&self) -> &str;
    fn password_hash(&self) -> &str;
    fn profile(&self) -> Self::Profile;
}

// ============================================================================
// Job seekers
// ============================================================================

/// Persisted job-seeker account.
#[derive(Clone)]
pub struct JobSeekerAccount {
    pub id: AccountId,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub mobile: String,
    pub work_status: WorkStatus,
    pub receive_updates: bool,
    pub created_at: DateTime<Utc>,
}

impl JobSeekerAccount {
    /// Build a fresh account from a validated registration.
    pub fn new(registration: NewJobSeeker, password_hash: String, now: DateTime<Utc>) -> Self {
        Self {
            id: AccountId::new(),
            email: registration.email,
            password_hash,
            full_name: registration.full_name,
            mobile: registration.mobile,
            work_status: registration.work_status,
            receive_updates: registration.receive_updates,
            created_at: now,
        }
    }
}

impl fmt::Debug for JobSeekerAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobSeekerAccount")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("full_name", &self.full_name)
            .field("work_status", &self.work_status)
            .finish_non_exhaustive()
    }
}

/// Public projection of a job-seeker account.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobSeekerProfile {
    pub id: AccountId,
    pub email: String,
    pub full_name: String,
    pub work_status: WorkStatus,
}

impl Account for JobSeekerAccount {
    const KIND: AccountKind = AccountKind::JobSeeker;
    type Profile = JobSeekerProfile;

    fn id(&self) -> &AccountId {
        &self.id
    }

    fn email(&self) -> &str {
        &self.email
    }

    fn password_hash(&self) -> &str {
        &self.password_hash
    }

    fn profile(&self) -> JobSeekerProfile {
        JobSeekerProfile {
            id: self.id.clone(),
            email: self.email.clone(),
            full_name: self.full_name.clone(),
            work_status: self.work_status,
        }
    }
}

/// Job-seeker registration payload as received.
///
/// Every field is optional at the wire level so that a missing field is
/// reported as a registration error rather than a JSON shape error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSeekerRegistration {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub mobile: Option<String>,
    pub work_status: Option<String>,
    pub receive_updates: Option<bool>,
}

/// Validated job-seeker registration (password still in plaintext).
#[derive(Clone)]
pub struct NewJobSeeker {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub mobile: String,
    pub work_status: WorkStatus,
    pub receive_updates: bool,
}

impl JobSeekerRegistration {
    /// Check required fields first, then the work-status enum.
    pub fn validate(self) -> ModelResult<NewJobSeeker> {
        let full_name = required(&self.full_name)?;
        let email_raw = required(&self.email)?;
        let password = self
            .password
            .filter(|p| !p.is_empty())
            .ok_or(ModelError::MissingFields)?;
        let mobile = required(&self.mobile)?;
        let work_status_raw = required(&self.work_status)?;

        let work_status =
            WorkStatus::parse(&work_status_raw).ok_or(ModelError::InvalidWorkStatus)?;

        Ok(NewJobSeeker {
            full_name,
            email: email(&email_raw)?,
            password,
            mobile,
            work_status,
            receive_updates: self.receive_updates.unwrap_or(false),
        })
    }
}

// ============================================================================
// Recruiters
// ============================================================================

/// Persisted recruiter account.
#[derive(Clone)]
pub struct RecruiterAccount {
    pub id: AccountId,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub mobile: String,
    pub company_name: String,
    pub designation: String,
    /// Never set by any API operation.
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl RecruiterAccount {
    pub fn new(registration: NewRecruiter, password_hash: String, now: DateTime<Utc>) -> Self {
        Self {
            id: AccountId::new(),
            email: registration.email,
            password_hash,
            full_name: registration.full_name,
            mobile: registration.mobile,
            company_name: registration.company_name,
            designation: registration.designation,
            is_verified: false,
            created_at: now,
        }
    }

    /// Full record minus the password hash.
    pub fn details(&self) -> RecruiterDetails {
        RecruiterDetails {
            id: self.id.clone(),
            email: self.email.clone(),
            full_name: self.full_name.clone(),
            mobile: self.mobile.clone(),
            company_name: self.company_name.clone(),
            designation: self.designation.clone(),
            is_verified: self.is_verified,
            created_at: self.created_at,
        }
    }

    /// Apply a profile update. Returns the names of the fields that changed.
    pub fn apply_update(&mut self, update: RecruiterProfileUpdate) -> Vec<&'static str> {
        let mut changed = Vec::new();
        let non_blank = |v: Option<String>| {
            v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        };

        if let Some(v) = non_blank(update.full_name) {
            self.full_name = v;
            changed.push("full_name");
        }
        if let Some(v) = non_blank(update.mobile) {
            self.mobile = v;
            changed.push("mobile");
        }
        if let Some(v) = non_blank(update.company_name) {
            self.company_name = v;
            changed.push("company_name");
        }
        if let Some(v) = non_blank(update.designation) {
            self.designation = v;
            changed.push("designation");
        }
        changed
    }
}

impl fmt::Debug for RecruiterAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecruiterAccount")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("company_name", &self.company_name)
            .field("is_verified", &self.is_verified)
            .finish_non_exhaustive()
    }
}

/// Public projection of a recruiter account returned by auth endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecruiterProfile {
    pub id: AccountId,
    pub email: String,
    pub full_name: String,
    pub company_name: String,
    pub designation: String,
    pub is_verified: bool,
}

/// Recruiter record without the password hash, returned by the profile endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecruiterDetails {
    #[serde(rename = "_id")]
    pub id: AccountId,
    pub email: String,
    pub full_name: String,
    pub mobile: String,
    pub company_name: String,
    pub designation: String,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl Account for RecruiterAccount {
    const KIND: AccountKind = AccountKind::Recruiter;
    type Profile = RecruiterProfile;

    fn id(&self) -> &AccountId {
        &self.id
    }

    fn email(&self) -> &str {
        &self.email
    }

    fn password_hash(&self) -> &str {
        &self.password_hash
    }

    fn profile(&self) -> RecruiterProfile {
        RecruiterProfile {
            id: self.id.clone(),
            email: self.email.clone(),
            full_name: self.full_name.clone(),
            company_name: self.company_name.clone(),
            designation: self.designation.clone(),
            is_verified: self.is_verified,
        }
    }
}

/// Recruiter registration payload as received.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecruiterRegistration {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub mobile: Option<String>,
    pub company_name: Option<String>,
    pub designation: Option<String>,
}

/// Validated recruiter registration (password still in plaintext).
#[derive(Clone)]
pub struct NewRecruiter {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub mobile: String,
    pub company_name: String,
    pub designation: String,
}

impl RecruiterRegistration {
    pub fn validate(self) -> ModelResult<NewRecruiter> {
        let full_name = required(&self.full_name)?;
        let email_raw = required(&self.email)?;
        let password = self
            .password
            .filter(|p| !p.is_empty())
            .ok_or(ModelError::MissingFields)?;
        let mobile = required(&self.mobile)?;
        let company_name = required(&self.company_name)?;
        let designation = required(&self.designation)?;

        Ok(NewRecruiter {
            full_name,
            email: email(&email_raw)?,
            password,
            mobile,
            company_name,
            designation,
        })
    }
}

/// Partial recruiter profile update. Blank values are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecruiterProfileUpdate {
    pub full_name: Option<String>,
    pub mobile: Option<String>,
    pub company_name: Option<String>,
    pub designation: Option<String>,
}

// ============================================================================
// Login
// ============================================================================

/// Login payload shared by both account kinds.
#[derive(Clone, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    /// Email and password, or `MissingFields`.
    pub fn credentials(self) -> ModelResult<(String, String)> {
        let email = required(&self.email)?;
        let password = self
            .password
            .filter(|p| !p.is_empty())
            .ok_or(ModelError::MissingFields)?;
        Ok((email, password))
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}
