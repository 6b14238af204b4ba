//! Job search filter engine.
//!
//! Query parameters are compiled once into a [`JobFilter`], which is then
//! evaluated against each posting. Clauses are ANDed together; the keyword
//! clause and every comma-separated list are ORed internally.
//!
//! The experience clause reproduces the legacy pattern matching over the
//! free-text experience field rather than parsing numeric ranges. Its
//! character-class patterns are built from the query verbatim, so a bound of
//! `15` produces the class `[0-15]` (the digits 0, 1 and 5).

use regex::Regex;
use serde::Deserialize;

use crate::job::JobPosting;

/// Raw search query parameters (`GET /api/jobs?...`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSearchQuery {
    pub keyword: Option<String>,
    pub experience: Option<String>,
    pub location: Option<String>,
    pub work_mode: Option<String>,
    pub department: Option<String>,
    pub salary: Option<String>,
    pub company: Option<String>,
}

impl JobSearchQuery {
    pub fn into_filter(self) -> JobFilter {
        JobFilter::from_query(self)
    }
}

/// Compiled experience clause.
#[derive(Debug, Clone)]
pub enum ExperienceFilter {
    /// No experience constraint.
    Any,
    /// Only the verbatim query value matches.
    Exact(String),
    /// Query of the form `a-N`.
    UpTo {
        query: String,
        range: Regex,
        single: Regex,
    },
    /// Query of the form `M+`.
    AtLeast { prefix: String, range: Option<Regex> },
}

impl ExperienceFilter {
    pub fn parse(param: &str) -> Self {
        if param.is_empty() {
            return ExperienceFilter::Any;
        }

        if let Some(max) = param.split('-').nth(1).filter(|m| !m.is_empty()) {
            let Some(n) = leading_int(max) else {
                return ExperienceFilter::Exact(param.to_string());
            };
            let range = Regex::new(&format!("^[0-{n}]-[0-{n}] Yrs$"));
            let single = Regex::new(&format!("^[0-{n}] Yrs$"));
            return match (range, single) {
                (Ok(range), Ok(single)) => ExperienceFilter::UpTo {
                    query: param.to_string(),
                    range,
                    single,
                },
                _ => ExperienceFilter::Exact(param.to_string()),
            };
        }

        if param.contains('+') {
            return match leading_int(param) {
                Some(m) => ExperienceFilter::AtLeast {
                    prefix: format!("{m}+"),
                    range: Regex::new(&format!(r"^[{m}-9]\d*-[{m}-9]\d* Yrs$")).ok(),
                },
                None => ExperienceFilter::Exact(param.to_string()),
            };
        }

        ExperienceFilter::Any
    }

    pub fn matches(&self, experience: &str) -> bool {
        match self {
            ExperienceFilter::Any => true,
            ExperienceFilter::Exact(query) => experience == query,
            ExperienceFilter::UpTo {
                query,
                range,
                single,
            } => experience == query || range.is_match(experience) || single.is_match(experience),
            ExperienceFilter::AtLeast { prefix, range } => {
                experience.starts_with(prefix.as_str())
                    || range.as_ref().is_some_and(|r| r.is_match(experience))
            }
        }
    }
}

/// Leading unsigned integer of `s`, after optional whitespace and `+` sign.
fn leading_int(s: &str) -> Option<u64> {
    let s = s.trim_start();
    let s = s.strip_prefix('+').unwrap_or(s);
    let end = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    s[..end].parse().ok()
}

/// Compiled job search predicate.
#[derive(Debug, Clone)]
pub struct JobFilter {
    keyword: Option<String>,
    company: Option<String>,
    location: Option<String>,
    work_modes: Option<Vec<String>>,
    departments: Option<Vec<String>>,
    salaries: Option<Vec<String>>,
    experience: ExperienceFilter,
}

impl Default for JobFilter {
    fn default() -> Self {
        JobSearchQuery::default().into_filter()
    }
}

impl JobFilter {
    pub fn from_query(query: JobSearchQuery) -> Self {
        let lower = |v: Option<String>| non_empty(v).map(|s| s.to_lowercase());
        let list = |v: Option<String>| {
            non_empty(v).map(|s| s.split(',').map(str::to_string).collect::<Vec<_>>())
        };

        Self {
            keyword: lower(query.keyword),
            company: lower(query.company),
            location: lower(query.location),
            work_modes: list(query.work_mode),
            departments: list(query.department),
            salaries: list(query.salary),
            experience: non_empty(query.experience)
                .map(|e| ExperienceFilter::parse(&e))
                .unwrap_or(ExperienceFilter::Any),
        }
    }

    pub fn experience(&self) -> &ExperienceFilter {
        &self.experience
    }

    /// True when no clause constrains the result.
    pub fn is_unconstrained(&self) -> bool {
        self.keyword.is_none()
            && self.company.is_none()
            && self.location.is_none()
            && self.work_modes.is_none()
            && self.departments.is_none()
            && self.salaries.is_none()
            && matches!(self.experience, ExperienceFilter::Any)
    }

    pub fn matches(&self, job: &JobPosting) -> bool {
        if let Some(keyword) = &self.keyword {
            let hit = contains_ci(&job.title, keyword)
                || contains_ci(&job.company, keyword)
                || job.skills.iter().any(|s| contains_ci(s, keyword));
            if !hit {
                return false;
            }
        }
        if let Some(company) = &self.company {
            if !contains_ci(&job.company, company) {
                return false;
            }
        }
        if let Some(location) = &self.location {
            if !contains_ci(&job.location, location) {
                return false;
            }
        }
        if !in_list(&self.work_modes, job.work_mode.as_str())
            || !in_list(&self.departments, &job.department)
            || !in_list(&self.salaries, &job.salary)
        {
            return false;
        }
        self.experience.matches(&job.experience)
    }

    /// Keep matching postings, preserving input order.
    pub fn apply(&self, jobs: impl IntoIterator<Item = JobPosting>) -> Vec<JobPosting> {
        jobs.into_iter().filter(|job| self.matches(job)).collect()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// `needle` must already be lower-cased.
fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn in_list(list: &Option<Vec<String>>, value: &str) -> bool {
    match list {
        Some(values) => values.iter().any(|v| v == value),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{AccountId, JobId};
    use crate::job::{Applicants, WorkMode};
    use chrono::Utc;

    fn job(title: &str, experience: &str, mode: WorkMode) -> JobPosting {
        JobPosting {
            id: JobId::new(),
            title: title.to_string(),
            company: "Acme Corp".to_string(),
            experience: experience.to_string(),
            salary: "3-6 Lacs PA".to_string(),
            location: "Bengaluru, India".to_string(),
            skills: vec!["Rust".to_string(), "Kubernetes".to_string()],
            posted_date: "1 day ago".to_string(),
            work_mode: mode,
            department: "Engineering".to_string(),
            recruiter_id: AccountId::from("r1"),
            applicants: Applicants::new(),
            created_at: Utc::now(),
        }
    }

    fn filter(query: JobSearchQuery) -> JobFilter {
        query.into_filter()
    }

    #[test]
    fn test_experience_upper_bound() {
        let jobs: Vec<_> = ["2-5 Yrs", "0-5 Yrs", "6-9 Yrs", "15+ Yrs"]
            .into_iter()
            .map(|e| job("Engineer", e, WorkMode::Remote))
            .collect();

        let result = filter(JobSearchQuery {
            experience: Some("0-5".into()),
            ..Default::default()
        })
        .apply(jobs);

        let found: Vec<_> = result.iter().map(|j| j.experience.as_str()).collect();
        assert_eq!(found, vec!["2-5 Yrs", "0-5 Yrs"]);
    }

    #[test]
    fn test_experience_single_value_and_exact() {
        let f = ExperienceFilter::parse("0-5");
        assert!(f.matches("3 Yrs"));
        assert!(f.matches("0-5"));
        assert!(!f.matches("7 Yrs"));
        assert!(!f.matches("3-5 years"));
    }

    #[test]
    fn test_experience_plus() {
        let f = ExperienceFilter::parse("15+");
        assert!(f.matches("15+ Yrs"));
        assert!(f.matches("5-9 Yrs"));
        assert!(!f.matches("2-5 Yrs"));
        assert!(!f.matches("10+ Yrs"));
    }

    #[test]
    fn test_experience_two_digit_bound_uses_character_class() {
        let f = ExperienceFilter::parse("0-15");
        assert!(f.matches("1-5 Yrs"));
        assert!(!f.matches("2-4 Yrs"));
    }

    #[test]
    fn test_experience_without_range_or_plus_is_ignored() {
        assert!(matches!(ExperienceFilter::parse("5"), ExperienceFilter::Any));
        assert!(matches!(ExperienceFilter::parse("0-"), ExperienceFilter::Any));
        assert!(matches!(
            ExperienceFilter::parse("x-y"),
            ExperienceFilter::Exact(_)
        ));
    }

    #[test]
    fn test_work_mode_list() {
        let jobs = vec![
            job("A", "1 Yrs", WorkMode::Remote),
            job("B", "1 Yrs", WorkMode::Office),
            job("C", "1 Yrs", WorkMode::Hybrid),
        ];
        let result = filter(JobSearchQuery {
            work_mode: Some("Remote,Hybrid".into()),
            ..Default::default()
        })
        .apply(jobs);

        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|j| j.work_mode != WorkMode::Office));
    }

    #[test]
    fn test_keyword_matches_title_company_or_skill() {
        let f = filter(JobSearchQuery {
            keyword: Some("kubernetes".into()),
            ..Default::default()
        });
        assert!(f.matches(&job("Platform Engineer", "2-5 Yrs", WorkMode::Remote)));

        let f = filter(JobSearchQuery {
            keyword: Some("ACME".into()),
            ..Default::default()
        });
        assert!(f.matches(&job("Platform Engineer", "2-5 Yrs", WorkMode::Remote)));

        let f = filter(JobSearchQuery {
            keyword: Some("golang".into()),
            ..Default::default()
        });
        assert!(!f.matches(&job("Platform Engineer", "2-5 Yrs", WorkMode::Remote)));
    }

    #[test]
    fn test_clauses_are_anded() {
        let f = filter(JobSearchQuery {
            keyword: Some("engineer".into()),
            location: Some("bengaluru".into()),
            experience: Some("0-5".into()),
            ..Default::default()
        });
        assert!(f.matches(&job("Engineer", "2-5 Yrs", WorkMode::Hybrid)));
        assert!(!f.matches(&job("Engineer", "6-9 Yrs", WorkMode::Hybrid)));
    }

    #[test]
    fn test_salary_and_department_are_exact() {
        let f = filter(JobSearchQuery {
            salary: Some("3-6 Lacs PA,6-10 Lacs PA".into()),
            department: Some("engineering".into()),
            ..Default::default()
        });
        // department comparison is case-sensitive
        assert!(!f.matches(&job("Engineer", "2-5 Yrs", WorkMode::Remote)));
    }

    #[test]
    fn test_empty_params_are_ignored() {
        let f = filter(JobSearchQuery {
            keyword: Some(String::new()),
            work_mode: Some(String::new()),
            ..Default::default()
        });
        assert!(f.is_unconstrained());
    }
}
