//! External collaborators the core consumes but never implements.
//!
//! The backend provides SQLite-backed implementations; tests use in-memory
//! ones. Each call is a single outstanding request and carries no retry
//! policy of its own.

use crate::error::{FetchError, SubmitError};
use crate::model::field::ContentType;
use crate::model::value::{FileRef, Identity, RecordPage, RecordRef};
use serde_json::{Map, Value};

pub trait ContentTypeStore {
    /// Fails with `FetchError::NotFound` for an unknown type.
    fn fetch_schema(&self, type_id: &str) -> Result<ContentType, FetchError>;

    fn publish_schema(&self, content_type: &ContentType) -> Result<(), SubmitError>;
}

pub trait RecordStore {
    /// `page` is 1-based.
    fn list_records(&self, type_id: &str, page: u32, page_size: u32)
        -> Result<RecordPage, FetchError>;

    fn create_record(
        &self,
        type_id: &str,
        payload: &Map<String, Value>,
    ) -> Result<RecordRef, SubmitError>;
}

pub trait IdentityDirectory {
    fn list_identities(&self, filter: Option<&str>) -> Result<Vec<Identity>, FetchError>;
}

pub trait FileDirectory {
    fn list_files(&self, query: &str) -> Result<Vec<FileRef>, FetchError>;
}
