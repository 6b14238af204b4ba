//! Job posting persistence.

use std::collections::HashMap;

use hirehub_models::{AccountId, Applicants, JobFilter, JobPosting, WorkMode};

use crate::error::FirestoreResult;
use crate::record::{applicants_value, fields, Fields, HasApplicants, Record};
use crate::repository::Repository;
use crate::types::{Document, ToFirestoreValue, Value};

pub type JobRepository = Repository<JobPosting>;

impl Record for JobPosting {
    const COLLECTION: &'static str = "jobs";

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
            ("work_mode", self.work_mode.as_str().to_firestore_value()),
            ("department", self.department.to_firestore_value()),
            ("recruiter_id", self.recruiter_id.as_str().to_firestore_value()),
            ("applicants", applicants_value(&self.applicants)),
            ("created_at", self.created_at.to_firestore_value()),
        ])
    }

    fn from_document(id: &str, doc: &Document) -> FirestoreResult<Self> {
        let f = Fields::of(id, doc)?;
        Ok(JobPosting {
            id: id.into(),
            title: f.string("title")?,
            company: f.string("company")?,
            experience: f.string_or_default("experience"),
            salary: f.string_or_default("salary"),
            location: f.string_or_default("location"),
            skills: f.strings("skills"),
            posted_date: f.string_or_default("posted_date"),
            work_mode: f.parsed("work_mode", WorkMode::parse)?,
            department: f.string_or_default("department"),
            recruiter_id: AccountId::from(f.string("recruiter_id")?),
            applicants: f.applicants("applicants"),
            created_at: f.timestamp("created_at")?,
        })
    }
}

impl HasApplicants for JobPosting {
    fn applicants(&self) -> &Applicants {
        &self.applicants
    }

    fn applicants_mut(&mut self) -> &mut Applicants {
        &mut self.applicants
    }
}

impl Repository<JobPosting> {
    /// Postings matching `filter`, in storage order.
    pub async fn search(&self, filter: &JobFilter) -> FirestoreResult<Vec<JobPosting>> {
        let jobs = self.list().await?;
        if filter.is_unconstrained() {
            return Ok(jobs);
        }
        Ok(filter.apply(jobs))
    }

    /// Postings owned by `recruiter_id`, newest first.
    pub async fn list_by_recruiter(&self, recruiter_id: &AccountId) -> FirestoreResult<Vec<JobPosting>> {
        let mut jobs = self
            .list_where_eq("recruiter_id", recruiter_id.as_str().to_firestore_value())
            .await?;
        // equality + order_by would need a composite index
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(jobs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use hirehub_models::JobId;

    fn posting() -> JobPosting {
        let mut applicants = Applicants::new();
        applicants.admit(AccountId::from("seeker-1")).unwrap();
        JobPosting {
            id: JobId::from("job-1"),
            title: "SRE".into(),
            company: "Acme".into(),
            experience: "2-5 Yrs".into(),
            salary: "10-15 Lacs PA".into(),
            location: "Pune".into(),
            skills: vec!["Linux".into()],
            posted_date: "today".into(),
            work_mode: WorkMode::Office,
            department: "Operations".into(),
            recruiter_id: AccountId::from("rec-1"),
            applicants,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_job_document_fields() {
        let job = posting();
        let doc = Document::new(job.to_fields());
        let decoded = JobPosting::from_document("job-1", &doc).unwrap();

        assert_eq!(decoded.work_mode, WorkMode::Office);
        assert_eq!(decoded.recruiter_id, job.recruiter_id);
        assert_eq!(decoded.applicants.len(), 1);
        assert_eq!(decoded.id.as_str(), "job-1");
    }

    #[test]
    fn test_unknown_work_mode_is_rejected() {
        let mut f = posting().to_fields();
        f.insert("work_mode".into(), "Onsite".to_firestore_value());
        assert!(JobPosting::from_document("job-1", &Document::new(f)).is_err());
    }
}
