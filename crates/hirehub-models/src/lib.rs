//! Shared data models for the HireHub job board.
//!
//! This crate provides Serde-serializable types for:
//! - Job-seeker and recruiter accounts, plus their public projections
//! - Job postings, trending job postings and the applicants set
//! - Company directory records
//! - The job search filter engine
//!
//! Nothing here performs I/O; persistence lives in `hirehub-firestore`.

pub mod account;
pub mod company;
pub mod error;
pub mod ids;
pub mod job;
pub mod search;
pub mod trending;
mod validation;

// Re-export common types
pub use account::{
    Account, AccountKind, JobSeekerAccount, JobSeekerProfile, JobSeekerRegistration, LoginRequest,
    NewJobSeeker, NewRecruiter, RecruiterAccount, RecruiterDetails, RecruiterProfile,
    RecruiterProfileUpdate, RecruiterRegistration, WorkStatus,
};
pub use company::{Company, CompanyType, CompanyUpdate, NewCompany};
pub use error::{ModelError, ModelResult};
pub use ids::{AccountId, CompanyId, JobId};
pub use job::{Applicants, JobPosting, JobUpdate, NewJob, WorkMode};
pub use search::{ExperienceFilter, JobFilter, JobSearchQuery};
pub use trending::{NewTrendingJob, TrendingCategory, TrendingJob, TrendingJobUpdate};
