//! Company directory persistence.

use std::collections::HashMap;

use hirehub_models::{Company, CompanyType};

use crate::error::FirestoreResult;
use crate::record::{fields, Fields, Record};
use crate::repository::Repository;
use crate::types::{Document, ToFirestoreValue, Value};

pub type CompanyRepository = Repository<Company>;

impl Record for Company {
    const COLLECTION: &'static str = "companies";

    fn record_id(&self) -> &str {
        self.id.as_str()
    }

    fn to_fields(&self) -> HashMap<String, Value> {
        fields([
            ("name", self.name.to_firestore_value()),
            ("logo", self.logo.to_firestore_value()),
            ("rating", self.rating.to_firestore_value()),
            ("review_count", self.review_count.to_firestore_value()),
            ("company_type", self.company_type.as_str().to_firestore_value()),
            ("industry", self.industry.to_firestore_value()),
            ("location", self.location.to_firestore_value()),
            ("founded_year", self.founded_year.to_firestore_value()),
            ("employee_count", self.employee_count.to_firestore_value()),
            ("active_jobs", self.active_jobs.to_firestore_value()),
            ("created_at", self.created_at.to_firestore_value()),
        ])
    }

    fn from_document(id: &str, doc: &Document) -> FirestoreResult<Self> {
        let f = Fields::of(id, doc)?;
        Ok(Company {
            id: id.into(),
            name: f.string("name")?,
            logo: f.string_or_default("logo"),
            rating: f.f64("rating")?,
            review_count: f.i64("review_count")?,
            company_type: f.parsed("company_type", CompanyType::parse)?,
            industry: f.string_or_default("industry"),
            location: f.string_or_default("location"),
            founded_year: f.opt_i64("founded_year"),
            employee_count: f.opt_string("employee_count"),
            active_jobs: f.i64("active_jobs")?,
            created_at: f.timestamp("created_at")?,
        })
    }
}
