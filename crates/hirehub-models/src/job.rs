//! Job postings and the applicants set.

use std::fmt;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};
use crate::ids::{AccountId, JobId};
use crate::validation::{clean_list, optional_text, required_text};

/// Where the work happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum WorkMode {
    #[serde(rename = "Work from office")]
    Office,
    #[serde(rename = "Remote")]
    Remote,
    #[serde(rename = "Hybrid")]
    Hybrid,
}

impl WorkMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkMode::Office => "Work from office",
            WorkMode::Remote => "Remote",
            WorkMode::Hybrid => "Hybrid",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Work from office" => Some(WorkMode::Office),
            "Remote" => Some(WorkMode::Remote),
            "Hybrid" => Some(WorkMode::Hybrid),
            _ => None,
        }
    }
}

impl fmt::Display for WorkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Job-seekers who applied to a posting. Each id appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Applicants(Vec<AccountId>);

impl Applicants {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from stored ids, collapsing any duplicates.
    pub fn from_ids(ids: impl IntoIterator<Item = AccountId>) -> Self {
        let mut applicants = Self::new();
        for id in ids {
            let _ = applicants.admit(id);
        }
        applicants
    }

    pub fn contains(&self, id: &AccountId) -> bool {
        self.0.contains(id)
    }

    /// Transition `id` from not-applied to applied.
    pub fn admit(&mut self, id: AccountId) -> ModelResult<()> {
        if self.contains(&id) {
            return Err(ModelError::AlreadyApplied);
        }
        self.0.push(id);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AccountId> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[AccountId] {
        &self.0
    }
}

/// A recruiter-owned job posting.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    #[serde(rename = "_id")]
    pub id: JobId,
    pub title: String,
    /// Free text, not a reference to a company record.
    pub company: String,
    /// Free-text range such as "2-5 Yrs" or "15+ Yrs".
    pub experience: String,
    pub salary: String,
    pub location: String,
    pub skills: Vec<String>,
    pub posted_date: String,
    pub work_mode: WorkMode,
    pub department: String,
    pub recruiter_id: AccountId,
    pub applicants: Applicants,
    pub created_at: DateTime<Utc>,
}

/// Job creation payload. Any owner field in the input is ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
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
    pub posted_date: String,
    pub work_mode: WorkMode,
    #[serde(default)]
    pub department: String,
}

impl NewJob {
    /// Validate and stamp with the owning recruiter.
    pub fn into_posting(self, recruiter_id: AccountId, now: DateTime<Utc>) -> ModelResult<JobPosting> {
        Ok(JobPosting {
            id: JobId::new(),
            title: required_text("title", &self.title)?,
            company: required_text("company", &self.company)?,
            experience: required_text("experience", &self.experience)?,
            salary: required_text("salary", &self.salary)?,
            location: required_text("location", &self.location)?,
            skills: clean_list(self.skills),
            posted_date: required_text("postedDate", &self.posted_date)?,
            work_mode: self.work_mode,
            department: required_text("department", &self.department)?,
            recruiter_id,
            applicants: Applicants::new(),
            created_at: now,
        })
    }
}

/// Partial job update. Ownership and applicants are not updatable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobUpdate {
    pub title: Option<String>,
    pub company: Option<String>,
    pub experience: Option<String>,
    pub salary: Option<String>,
    pub location: Option<String>,
    pub skills: Option<Vec<String>>,
    pub posted_date: Option<String>,
    pub work_mode: Option<WorkMode>,
    pub department: Option<String>,
}

impl JobUpdate {
    /// Merge into `job`, returning the stored field names that changed.
    pub fn apply(self, job: &mut JobPosting) -> ModelResult<Vec<&'static str>> {
        let title = optional_text("title", &self.title)?;
        let company = optional_text("company", &self.company)?;
        let experience = optional_text("experience", &self.experience)?;
        let salary = optional_text("salary", &self.salary)?;
        let location = optional_text("location", &self.location)?;
        let posted_date = optional_text("postedDate", &self.posted_date)?;
        let department = optional_text("department", &self.department)?;

        let mut changed = Vec::new();
        let mut set = |slot: &mut String, value: Option<String>, name: &'static str| {
            if let Some(v) = value {
                *slot = v;
                changed.push(name);
            }
        };
        set(&mut job.title, title, "title");
        set(&mut job.company, company, "company");
        set(&mut job.experience, experience, "experience");
        set(&mut job.salary, salary, "salary");
        set(&mut job.location, location, "location");
        set(&mut job.posted_date, posted_date, "posted_date");
        set(&mut job.department, department, "department");

        if let Some(skills) = self.skills {
            job.skills = clean_list(skills);
            changed.push("skills");
        }
        if let Some(mode) = self.work_mode {
            job.work_mode = mode;
            changed.push("work_mode");
        }
        Ok(changed)
    }
}
