//! Trending job postings.
//!
//! Trending postings carry the same descriptive fields as regular postings
//! plus a long-form description and a category, and have no owning recruiter.

use std::fmt;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ModelResult;
use crate::ids::JobId;
use crate::job::{Applicants, WorkMode};
use crate::validation::{clean_list, optional_text, required_text};

/// Listing bucket for trending postings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum TrendingCategory {
    RemoteJobs,
    MncJobs,
    ItJobs,
    FresherJobs,
    MarketingJobs,
    HrJobs,
}

impl TrendingCategory {
    pub const ALL: [TrendingCategory; 6] = [
        TrendingCategory::RemoteJobs,
        TrendingCategory::MncJobs,
        TrendingCategory::ItJobs,
        TrendingCategory::FresherJobs,
        TrendingCategory::MarketingJobs,
        TrendingCategory::HrJobs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TrendingCategory::RemoteJobs => "remote-jobs",
            TrendingCategory::MncJobs => "mnc-jobs",
            TrendingCategory::ItJobs => "it-jobs",
            TrendingCategory::FresherJobs => "fresher-jobs",
            TrendingCategory::MarketingJobs => "marketing-jobs",
            TrendingCategory::HrJobs => "hr-jobs",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

impl fmt::Display for TrendingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrendingJob {
    #[serde(rename = "_id")]
    pub id: JobId,
    pub title: String,
    pub company: String,
    pub experience: String,
    pub salary: String,
    pub location: String,
    pub skills: Vec<String>,
    pub posted_date: DateTime<Utc>,
    pub description: String,
    pub requirements: Vec<String>,
    pub benefits: Vec<String>,
    pub is_active: bool,
    pub work_mode: WorkMode,
    pub department: String,
    pub category: TrendingCategory,
    pub applicants: Applicants,
    pub created_at: DateTime<Utc>,
}

/// Trending job creation payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTrendingJob {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub salary: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub posted_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    pub work_mode: WorkMode,
    #[serde(default)]
    pub department: String,
    pub category: TrendingCategory,
}

impl NewTrendingJob {
    pub fn into_job(self, now: DateTime<Utc>) -> ModelResult<TrendingJob> {
        Ok(TrendingJob {
            id: JobId::new(),
            title: required_text("title", &self.title)?,
            company: required_text("company", &self.company)?,
            experience: required_text("experience", &self.experience)?,
            salary: required_text("salary", &self.salary)?,
            location: required_text("location", &self.location)?,
            skills: clean_list(self.skills),
            posted_date: self.posted_date.unwrap_or(now),
            description: required_text("description", &self.description)?,
            requirements: clean_list(self.requirements),
            benefits: clean_list(self.benefits),
            is_active: self.is_active.unwrap_or(true),
            work_mode: self.work_mode,
            department: required_text("department", &self.department)?,
            category: self.category,
            applicants: Applicants::new(),
            created_at: now,
        })
    }
}

/// Partial trending job update. Applicants are not updatable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingJobUpdate {
    pub title: Option<String>,
    pub company: Option<String>,
    pub experience: Option<String>,
    pub salary: Option<String>,
    pub location: Option<String>,
    pub skills: Option<Vec<String>>,
    pub posted_date: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub requirements: Option<Vec<String>>,
    pub benefits: Option<Vec<String>>,
    pub is_active: Option<bool>,
    pub work_mode: Option<WorkMode>,
    pub department: Option<String>,
    pub category: Option<TrendingCategory>,
}

impl TrendingJobUpdate {
    /// Merge into `job`, returning the stored field names that changed.
    pub fn apply(self, job: &mut TrendingJob) -> ModelResult<Vec<&'static str>> {
        let title = optional_text("title", &self.title)?;
        let company = optional_text("company", &self.company)?;
        let experience = optional_text("experience", &self.experience)?;
        let salary = optional_text("salary", &self.salary)?;
        let location = optional_text("location", &self.location)?;
        let description = optional_text("description", &self.description)?;
        let department = optional_text("department", &self.department)?;

        let mut changed = Vec::new();
        for (slot, value, name) in [
            (&mut job.title, title, "title"),
            (&mut job.company, company, "company"),
            (&mut job.experience, experience, "experience"),
            (&mut job.salary, salary, "salary"),
            (&mut job.location, location, "location"),
            (&mut job.description, description, "description"),
            (&mut job.department, department, "department"),
        ] {
            if let Some(value) = value {
                *slot = value;
                changed.push(name);
            }
        }

        if let Some(v) = self.skills {
            job.skills = clean_list(v);
            changed.push("skills");
        }
        if let Some(v) = self.posted_date {
            job.posted_date = v;
            changed.push("posted_date");
        }
        if let Some(v) = self.requirements {
            job.requirements = clean_list(v);
            changed.push("requirements");
        }
        if let Some(v) = self.benefits {
            job.benefits = clean_list(v);
            changed.push("benefits");
        }
        if let Some(v) = self.is_active {
            job.is_active = v;
            changed.push("is_active");
        }
        if let Some(v) = self.work_mode {
            job.work_mode = v;
            changed.push("work_mode");
        }
        if let Some(v) = self.category {
            job.category = v;
            changed.push("category");
        }
        Ok(changed)
    }
}
