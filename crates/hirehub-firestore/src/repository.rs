//! Generic repository over a [`Record`] collection.

use std::marker::PhantomData;
use std::time::Duration;

use hirehub_models::{AccountId, ModelError};
use tracing::{debug, info, warn};

use crate::client::{FirestoreClient, MAX_COMMIT_WRITES};
use crate::error::{FirestoreError, FirestoreResult};
use crate::metrics::record_conflict;
use crate::record::{applicants_value, fields, masked, HasApplicants, Record};
use crate::types::{Direction, Document, StructuredQuery, Value, Write};

/// Attempts before an apply that keeps losing races gives up.
const MAX_APPLY_ATTEMPTS: u32 = 5;

/// Base delay between apply attempts (milliseconds).
const APPLY_RETRY_BASE_MS: u64 = 20;

/// Result of an apply-for-job request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    AlreadyApplied,
    NotFound,
}

/// CRUD access to one collection of `R`.
pub struct Repository<R: Record> {
    client: FirestoreClient,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> Clone for Repository<R> {
    fn clone(&self) -> Self {
        Self::new(self.client.clone())
    }
}

impl<R: Record> Repository<R> {
    pub fn new(client: FirestoreClient) -> Self {
        Self {
            client,
            _record: PhantomData,
        }
    }

    pub fn client(&self) -> &FirestoreClient {
        &self.client
    }

    fn decode(doc: &Document) -> FirestoreResult<R> {
        let id = doc
            .id()
            .ok_or_else(|| FirestoreError::invalid_response("Document has no name"))?;
        R::from_document(id, doc)
    }

    /// Insert a new record.
    pub async fn create(&self, record: &R) -> FirestoreResult<()> {
        self.client
            .create_document(R::COLLECTION, record.record_id(), record.to_fields())
            .await?;
        debug!(collection = R::COLLECTION, id = record.record_id(), "Created record");
        Ok(())
    }

    /// Insert every record in one atomic commit.
    pub async fn create_many(&self, records: &[R]) -> FirestoreResult<()> {
        if records.len() > MAX_COMMIT_WRITES {
            return Err(FirestoreError::request_failed(format!(
                "Cannot insert more than {} records at once",
                MAX_COMMIT_WRITES
            )));
        }

        let writes = records
            .iter()
            .map(|r| {
                Write::create(Document::named(
                    self.client.full_document_name(R::COLLECTION, r.record_id()),
                    r.to_fields(),
                ))
            })
            .collect();
        self.client.commit(writes).await?;

        info!(collection = R::COLLECTION, count = records.len(), "Inserted records");
        Ok(())
    }

    pub async fn get(&self, id: &str) -> FirestoreResult<Option<R>> {
        Ok(self.get_versioned(id).await?.map(|(record, _)| record))
    }

    /// Record plus its `updateTime`, for optimistic concurrency.
    pub async fn get_versioned(&self, id: &str) -> FirestoreResult<Option<(R, Option<String>)>> {
        match self.client.get_document(R::COLLECTION, id).await? {
            Some(doc) => {
                let record = R::from_document(id, &doc)?;
                Ok(Some((record, doc.update_time)))
            }
            None => Ok(None),
        }
    }

    /// Every record, oldest first.
    pub async fn list(&self) -> FirestoreResult<Vec<R>> {
        self.query(StructuredQuery::collection(R::COLLECTION).order_by("created_at", Direction::Ascending))
            .await
    }

    /// Records whose `field` equals `value`, in unspecified order.
    pub async fn list_where_eq(&self, field: &str, value: Value) -> FirestoreResult<Vec<R>> {
        self.query(StructuredQuery::collection(R::COLLECTION).where_eq(field, value))
            .await
    }

    async fn query(&self, query: StructuredQuery) -> FirestoreResult<Vec<R>> {
        let docs = self.client.run_query("", query).await?;
        docs.iter().map(Self::decode).collect()
    }

    /// Persist the named fields of `record`. The record must already exist.
    pub async fn update(&self, record: &R, changed: &[&str]) -> FirestoreResult<()> {
        if changed.is_empty() {
            return Ok(());
        }
        let (fields, mask) = masked(record.to_fields(), changed);
        self.client
            .update_document(R::COLLECTION, record.record_id(), fields, Some(mask))
            .await?;
        debug!(collection = R::COLLECTION, id = record.record_id(), fields = ?changed, "Updated record");
        Ok(())
    }

    /// Delete by id. Returns `false` if there was nothing to delete.
    pub async fn delete(&self, id: &str) -> FirestoreResult<bool> {
        match self.client.delete_document(R::COLLECTION, id).await {
            Ok(()) => {
                info!(collection = R::COLLECTION, id = id, "Deleted record");
                Ok(true)
            }
            Err(FirestoreError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

impl<R: HasApplicants> Repository<R> {
    /// Add `applicant` to the record's applicants set exactly once.
    ///
    /// The write is conditioned on the document's `updateTime`; a concurrent
    /// writer forces a re-read, so duplicate concurrent requests admit a
    /// single applicant.
    pub async fn apply(&self, id: &str, applicant: &AccountId) -> FirestoreResult<ApplyOutcome> {
        for attempt in 0..MAX_APPLY_ATTEMPTS {
            let Some((mut record, update_time)) = self.get_versioned(id).await? else {
                return Ok(ApplyOutcome::NotFound);
            };

            match record.applicants_mut().admit(applicant.clone()) {
                Ok(()) => {}
                Err(ModelError::AlreadyApplied) => return Ok(ApplyOutcome::AlreadyApplied),
                Err(e) => return Err(FirestoreError::request_failed(e.to_string())),
            }

            let update = fields([("applicants", applicants_value(record.applicants()))]);
            match self
                .client
                .update_document_with_precondition(
                    R::COLLECTION,
                    id,
                    update,
                    Some(vec!["applicants".to_string()]),
                    update_time.as_deref(),
                )
                .await
            {
                Ok(_) => {
                    info!(
                        collection = R::COLLECTION,
                        id = id,
                        applicant = %applicant,
                        applicants = record.applicants().len(),
                        "Recorded application"
                    );
                    return Ok(ApplyOutcome::Applied);
                }
                Err(e) if e.is_precondition_failed() => {
                    debug!(
                        collection = R::COLLECTION,
                        id = id,
                        attempt = attempt + 1,
                        "Apply lost a concurrent update, retrying"
                    );
                    record_conflict(R::COLLECTION);
                    let delay = Duration::from_millis(APPLY_RETRY_BASE_MS * (attempt as u64 + 1));
                    tokio::time::sleep(delay).await;
                }
                Err(FirestoreError::NotFound(_)) => return Ok(ApplyOutcome::NotFound),
                Err(e) => return Err(e),
            }
        }

        warn!(
            collection = R::COLLECTION,
            id = id,
            attempts = MAX_APPLY_ATTEMPTS,
            "Apply failed after repeated conflicts"
        );
        Err(FirestoreError::request_failed(
            "Failed to apply due to concurrent updates",
        ))
    }
}
