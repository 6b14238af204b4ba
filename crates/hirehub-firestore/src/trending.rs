//! Trending job persistence.

use std::collections::HashMap;

use hirehub_models::{Applicants, TrendingCategory, TrendingJob, WorkMode};

use crate::error::FirestoreResult;
use crate::record::{applicants_value, fields, Fields, HasApplicants, Record};
use crate::repository::Repository;
use crate::types::{Document, ToFirestoreValue, Value};

pub type TrendingJobRepository = Repository<TrendingJob>;

impl Record for TrendingJob {
    const COLLECTION: &'static str = "trending_jobs";

    fn record_id(&self) -> &str {
        self.id.as_str()
    }

    fn to_fields(&self) -> HashMap<String, Value> {
        fields([
            ("title", self.title.to_firestore_value()),
            ("company", self.company.to_firestore_value()),
            ("experience", self.experience.to_firestore_value()),
            ("salary", self.salary.to_firestore_value()),
            ("location", self.location.to_firestore_value()),
            ("skills", self.skills.to_firestore_value()),
            ("posted_date", self.posted_date.to_firestore_value()),
            ("description", self.description.to_firestore_value()),
            ("requirements", self.requirements.to_firestore_value()),
            ("benefits", self.benefits.to_firestore_value()),
            ("is_active", self.is_active.to_firestore_value()),
            ("work_mode", self.work_mode.as_str().to_firestore_value()),
            ("department", self.department.to_firestore_value()),
            ("category", self.category.as_str().to_firestore_value()),
            ("applicants", applicants_value(&self.applicants)),
            ("created_at", self.created_at.to_firestore_value()),
        ])
    }

    fn from_document(id: &str, doc: &Document) -> FirestoreResult<Self> {
        let f = Fields::of(id, doc)?;
        let created_at = f.timestamp("created_at")?;
        Ok(TrendingJob {
            id: id.into(),
            title: f.string("title")?,
            company: f.string("company")?,
            experience: f.string_or_default("experience"),
            salary: f.string_or_default("salary"),
            location: f.string_or_default("location"),
            skills: f.strings("skills"),
            posted_date: f.timestamp("posted_date").unwrap_or(created_at),
            description: f.string_or_default("description"),
            requirements: f.strings("requirements"),
            benefits: f.strings("benefits"),
            is_active: f.bool_or("is_active", true),
            work_mode: f.parsed("work_mode", WorkMode::parse)?,
            department: f.string_or_default("department"),
            category: f.parsed("category", TrendingCategory::parse)?,
            applicants: f.applicants("applicants"),
            created_at,
        })
    }
}

impl HasApplicants for TrendingJob {
    fn applicants(&self) -> &Applicants {
        &self.applicants
    }

    fn applicants_mut(&mut self) -> &mut Applicants {
        &mut self.applicants
    }
}

impl Repository<TrendingJob> {
    /// Trending postings in `category`, oldest first.
    pub async fn list_by_category(&self, category: TrendingCategory) -> FirestoreResult<Vec<TrendingJob>> {
        let mut jobs = self
            .list_where_eq("category", category.as_str().to_firestore_value())
            .await?;
        jobs.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(jobs)
    }
}
