//! Mapping between domain records and Firestore documents.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use hirehub_models::{AccountId, Applicants};

use crate::error::{FirestoreError, FirestoreResult};
use crate::types::{Document, FromFirestoreValue, ToFirestoreValue, Value};

/// A domain record stored as one document in a root collection.
pub trait Record: Sized + Send + Sync {
    /// Collection holding records of this type.
    const COLLECTION: &'static str;

    /// Document id of this record.
    fn record_id(&self) -> &str;

    /// Stored fields, keyed by snake_case field path.
    fn to_fields(&self) -> HashMap<String, Value>;

    /// Rebuild the record from a stored document.
    fn from_document(id: &str, doc: &Document) -> FirestoreResult<Self>;
}

/// Records carrying an applicants set.
pub trait HasApplicants: Record {
    fn applicants(&self) -> &Applicants;
    fn applicants_mut(&mut self) -> &mut Applicants;
}

pub(crate) fn applicants_value(applicants: &Applicants) -> Value {
    applicants
        .iter()
        .map(|id| id.as_str().to_string())
        .collect::<Vec<_>>()
        .to_firestore_value()
}

/// Typed accessors over a document's fields.
pub(crate) struct Fields<'a> {
    id: &'a str,
    fields: &'a HashMap<String, Value>,
}

impl<'a> Fields<'a> {
    pub fn of(id: &'a str, doc: &'a Document) -> FirestoreResult<Self> {
        let fields = doc.fields.as_ref().ok_or_else(|| {
            FirestoreError::invalid_response(format!("Document {} has no fields", id))
        })?;
        Ok(Self { id, fields })
    }

    fn get<T: FromFirestoreValue>(&self, key: &str) -> Option<T> {
        self.fields.get(key).and_then(T::from_firestore_value)
    }

    fn missing(&self, key: &str) -> FirestoreError {
        FirestoreError::invalid_response(format!(
            "Document {} has missing or malformed field `{}`",
            self.id, key
        ))
    }

    pub fn string(&self, key: &str) -> FirestoreResult<String> {
        self.get(key).ok_or_else(|| self.missing(key))
    }

    pub fn string_or_default(&self, key: &str) -> String {
        self.get(key).unwrap_or_default()
    }

    pub fn opt_string(&self, key: &str) -> Option<String> {
        self.get(key)
    }

    pub fn strings(&self, key: &str) -> Vec<String> {
        self.get(key).unwrap_or_default()
    }

    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        self.get(key).unwrap_or(default)
    }

    pub fn i64(&self, key: &str) -> FirestoreResult<i64> {
        self.get(key).ok_or_else(|| self.missing(key))
    }

    pub fn opt_i64(&self, key: &str) -> Option<i64> {
        self.get(key)
    }

    pub fn f64(&self, key: &str) -> FirestoreResult<f64> {
        self.get(key).ok_or_else(|| self.missing(key))
    }

    pub fn timestamp(&self, key: &str) -> FirestoreResult<DateTime<Utc>> {
        self.get(key).ok_or_else(|| self.missing(key))
    }

    /// Parse a stored enum discriminant.
    pub fn parsed<T>(&self, key: &str, parse: impl Fn(&str) -> Option<T>) -> FirestoreResult<T> {
        self.get::<String>(key)
            .and_then(|s| parse(&s))
            .ok_or_else(|| self.missing(key))
    }

    pub fn applicants(&self, key: &str) -> Applicants {
        Applicants::from_ids(self.strings(key).into_iter().map(AccountId::from))
    }
}

/// Build a field map from `(name, value)` pairs.
pub(crate) fn fields<const N: usize>(pairs: [(&str, Value); N]) -> HashMap<String, Value> {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

/// Keep only the fields named in `mask`.
pub(crate) fn masked(
    mut all: HashMap<String, Value>,
    mask: &[&str],
) -> (HashMap<String, Value>, Vec<String>) {
    all.retain(|k, _| mask.contains(&k.as_str()));
    let paths = mask.iter().map(|f| f.to_string()).collect();
    (all, paths)
}
