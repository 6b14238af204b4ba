//! Company directory records.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{ModelError, ModelResult};
use crate::ids::CompanyId;
use crate::validation::{optional_text, required_text};

/// Employer category shown in the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum CompanyType {
    #[serde(rename = "MNC")]
    Mnc,
    #[serde(rename = "Indian MNC")]
    IndianMnc,
    #[serde(rename = "Startup")]
    Startup,
}

impl CompanyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompanyType::Mnc => "MNC",
            CompanyType::IndianMnc => "Indian MNC",
            CompanyType::Startup => "Startup",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "MNC" => Some(CompanyType::Mnc),
            "Indian MNC" => Some(CompanyType::IndianMnc),
            "Startup" => Some(CompanyType::Startup),
            _ => None,
        }
    }
}

/// A company directory record. Owned by no account.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    #[serde(rename = "_id")]
    pub id: CompanyId,
    pub name: String,
    pub logo: String,
    pub rating: f64,
    pub review_count: i64,
    #[serde(rename = "type")]
    pub company_type: CompanyType,
    pub industry: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub founded_year: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_count: Option<String>,
    pub active_jobs: i64,
    pub created_at: DateTime<Utc>,
}

/// Company creation payload.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewCompany {
    pub name: String,
    #[validate(url(message = "must be a valid URL"))]
    pub logo: String,
    #[validate(range(min = 0.0, max = 5.0, message = "must be between 0 and 5"))]
    pub rating: f64,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub review_count: i64,
    #[serde(rename = "type")]
    pub company_type: CompanyType,
    pub industry: String,
    pub location: String,
    #[serde(default)]
    pub founded_year: Option<i64>,
    #[serde(default)]
    pub employee_count: Option<String>,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub active_jobs: i64,
}

impl NewCompany {
    /// Validate and build the stored record.
    pub fn into_company(self, now: DateTime<Utc>) -> ModelResult<Company> {
        self.validate()?;
        let logo = http_url("logo", &self.logo)?;

        Ok(Company {
            id: CompanyId::new(),
            name: required_text("name", &self.name)?,
            logo,
            rating: self.rating,
            review_count: self.review_count,
            company_type: self.company_type,
            industry: required_text("industry", &self.industry)?,
            location: required_text("location", &self.location)?,
            founded_year: self.founded_year,
            employee_count: self.employee_count.as_deref().and_then(non_blank),
            active_jobs: self.active_jobs,
            created_at: now,
        })
    }
}

/// Partial company update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompanyUpdate {
    pub name: Option<String>,
    #[validate(url(message = "must be a valid URL"))]
    pub logo: Option<String>,
    #[validate(range(min = 0.0, max = 5.0, message = "must be between 0 and 5"))]
    pub rating: Option<f64>,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub review_count: Option<i64>,
    #[serde(rename = "type")]
    pub company_type: Option<CompanyType>,
    pub industry: Option<String>,
    pub location: Option<String>,
    pub founded_year: Option<i64>,
    pub employee_count: Option<String>,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub active_jobs: Option<i64>,
}

impl CompanyUpdate {
    /// Merge into `company`, returning the stored field names that changed.
    ///
    /// Nothing is modified unless every supplied field is valid.
    pub fn apply(self, company: &mut Company) -> ModelResult<Vec<&'static str>> {
        self.validate()?;
        let name = optional_text("name", &self.name)?;
        let industry = optional_text("industry", &self.industry)?;
        let location = optional_text("location", &self.location)?;
        let logo = self.logo.as_deref().map(|l| http_url("logo", l)).transpose()?;

        let mut changed = Vec::new();
        if let Some(v) = name {
            company.name = v;
            changed.push("name");
        }
        if let Some(v) = logo {
            company.logo = v;
            changed.push("logo");
        }
        if let Some(v) = self.rating {
            company.rating = v;
            changed.push("rating");
        }
        if let Some(v) = self.review_count {
            company.review_count = v;
            changed.push("review_count");
        }
        if let Some(v) = self.company_type {
            company.company_type = v;
            changed.push("company_type");
        }
        if let Some(v) = industry {
            company.industry = v;
            changed.push("industry");
        }
        if let Some(v) = location {
            company.location = v;
            changed.push("location");
        }
        if let Some(v) = self.founded_year {
            company.founded_year = Some(v);
            changed.push("founded_year");
        }
        if let Some(v) = self.employee_count {
            company.employee_count = non_blank(&v);
            changed.push("employee_count");
        }
        if let Some(v) = self.active_jobs {
            company.active_jobs = v;
            changed.push("active_jobs");
        }
        Ok(changed)
    }
}

/// Trimmed value, or `None` when nothing is left.
fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn http_url(field: &str, value: &str) -> ModelResult<String> {
    let trimmed = value.trim();
    if trimmed.starts_with("https://") || trimmed.starts_with("http://") {
        Ok(trimmed.to_string())
    } else {
        Err(ModelError::validation(format!(
            "{} must be an http or https URL",
            field
        )))
    }
}
