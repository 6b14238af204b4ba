//! Account persistence for both principal domains.
//!
//! Each account kind has its own collection plus an email index collection
//! keyed by a hash of the normalised email. Registration writes the account
//! and its index entry in one commit with `exists=false` preconditions, so a
//! duplicate email can never produce two accounts.

use std::collections::HashMap;

use chrono::Utc;
use hirehub_models::{Account, AccountId, JobSeekerAccount, RecruiterAccount, WorkStatus};
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::client::FirestoreClient;
use crate::error::FirestoreResult;
use crate::record::{fields, Fields, Record};
use crate::repository::Repository;
use crate::types::{Document, FromFirestoreValue, ToFirestoreValue, Value, Write};

/// A stored account type with its own email index.
pub trait AccountRecord: Record + Account {
    /// Collection mapping `email_key(email)` to an account id.
    const EMAIL_INDEX: &'static str;
}

/// Index key for an email: hex SHA-256 of the trimmed, lower-cased address.
pub fn email_key(email: &str) -> String {
    format!("{:x}", Sha256::digest(email.trim().to_lowercase().as_bytes()))
}

/// Repository for one account kind.
pub struct AccountRepository<A: AccountRecord> {
    records: Repository<A>,
}

impl<A: AccountRecord> Clone for AccountRepository<A> {
    fn clone(&self) -> Self {
        Self {
            records: self.records.clone(),
        }
    }
}

impl<A: AccountRecord> AccountRepository<A> {
    pub fn new(client: FirestoreClient) -> Self {
        Self {
            records: Repository::new(client),
        }
    }

    fn client(&self) -> &FirestoreClient {
        self.records.client()
    }

    /// Store a new account. Fails with `AlreadyExists` if the email is taken.
    pub async fn create(&self, account: &A) -> FirestoreResult<()> {
        let key = email_key(account.email());
        let index = fields([
            ("account_id", account.id().as_str().to_firestore_value()),
            ("email", account.email().to_firestore_value()),
            ("created_at", Utc::now().to_firestore_value()),
        ]);

        let client = self.client();
        let writes = vec![
            Write::create(Document::named(
                client.full_document_name(A::EMAIL_INDEX, &key),
                index,
            )),
            Write::create(Document::named(
                client.full_document_name(A::COLLECTION, account.record_id()),
                account.to_fields(),
            )),
        ];
        client.commit(writes).await?;

        info!(kind = %A::KIND, account_id = %account.id(), "Registered account");
        Ok(())
    }

    pub async fn get(&self, id: &str) -> FirestoreResult<Option<A>> {
        self.records.get(id).await
    }

    /// Case-insensitive lookup by email.
    pub async fn find_by_email(&self, email: &str) -> FirestoreResult<Option<A>> {
        let key = email_key(email);
        let Some(index) = self.client().get_document(A::EMAIL_INDEX, &key).await? else {
            return Ok(None);
        };

        let account_id = index
            .fields
            .as_ref()
            .and_then(|f| f.get("account_id"))
            .and_then(String::from_firestore_value);
        let Some(account_id) = account_id else {
            warn!(kind = %A::KIND, "Email index entry without account id");
            return Ok(None);
        };

        let account = self.records.get(&account_id).await?;
        if account.is_none() {
            warn!(kind = %A::KIND, account_id = %account_id, "Email index points at missing account");
        }
        Ok(account)
    }

    /// Persist the named fields of an existing account.
    pub async fn update(&self, account: &A, changed: &[&str]) -> FirestoreResult<()> {
        self.records.update(account, changed).await
    }
}

// ============================================================================
// Record mappings
// ============================================================================

impl Record for JobSeekerAccount {
    const COLLECTION: &'static str = "job_seekers";

    fn record_id(&self) -> &str {
        self.id.as_str()
    }

    fn to_fields(&self) -> HashMap<String, Value> {
        fields([
            ("email", self.email.to_firestore_value()),
            ("password_hash", self.password_hash.to_firestore_value()),
            ("full_name", self.full_name.to_firestore_value()),
            ("mobile", self.mobile.to_firestore_value()),
            ("work_status", self.work_status.as_str().to_firestore_value()),
            ("receive_updates", self.receive_updates.to_firestore_value()),
            ("created_at", self.created_at.to_firestore_value()),
        ])
    }

    fn from_document(id: &str, doc: &Document) -> FirestoreResult<Self> {
        let f = Fields::of(id, doc)?;
        Ok(JobSeekerAccount {
            id: AccountId::from(id),
            email: f.string("email")?,
            password_hash: f.string("password_hash")?,
            full_name: f.string_or_default("full_name"),
            mobile: f.string_or_default("mobile"),
            work_status: f.parsed("work_status", WorkStatus::parse)?,
            receive_updates: f.bool_or("receive_updates", false),
            created_at: f.timestamp("created_at")?,
        })
    }
}

impl AccountRecord for JobSeekerAccount {
    const EMAIL_INDEX: &'static str = "job_seeker_emails";
}

impl Record for RecruiterAccount {
    const COLLECTION: &'static str = "recruiters";

    fn record_id(&self) -> &str {
        self.id.as_str()
    }

    fn to_fields(&self) -> HashMap<String, Value> {
        fields([
            ("email", self.email.to_firestore_value()),
            ("password_hash", self.password_hash.to_firestore_value()),
            ("full_name", self.full_name.to_firestore_value()),
            ("mobile", self.mobile.to_firestore_value()),
            ("company_name", self.company_name.to_firestore_value()),
            ("designation", self.designation.to_firestore_value()),
            ("is_verified", self.is_verified.to_firestore_value()),
            ("created_at", self.created_at.to_firestore_value()),
        ])
    }

    fn from_document(id: &str, doc: &Document) -> FirestoreResult<Self> {
        let f = Fields::of(id, doc)?;
        Ok(RecruiterAccount {
            id: AccountId::from(id),
            email: f.string("email")?,
            password_hash: f.string("password_hash")?,
            full_name: f.string_or_default("full_name"),
            mobile: f.string_or_default("mobile"),
            company_name: f.string_or_default("company_name"),
            designation: f.string_or_default("designation"),
            is_verified: f.bool_or("is_verified", false),
            created_at: f.timestamp("created_at")?,
        })
    }
}

impl AccountRecord for RecruiterAccount {
    const EMAIL_INDEX: &'static str = "recruiter_emails";
}
