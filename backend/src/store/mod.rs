//! SQLite-backed implementation of every external collaborator.
//!
//! Content types and records are kept as JSON documents; identities and files
//! as plain rows so the directory endpoints can filter them in SQL. One
//! connection is shared behind a mutex, so calls are serialized.

mod error;

pub use error::StoreError;

use common::error::{FetchError, SubmitError};
use common::model::field::ContentType;
use common::model::value::{FileRef, Identity, Record, RecordPage, RecordRef};
use common::ports::{ContentTypeStore, FileDirectory, IdentityDirectory, RecordStore};
use log::{debug, info};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Key under which a listed record carries its own identifier.
pub const RECORD_UID_KEY: &str = "uid";

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS content_types (
        uid  TEXT PRIMARY KEY,
        body TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS records (
        seq              INTEGER PRIMARY KEY AUTOINCREMENT,
        uid              TEXT NOT NULL UNIQUE,
        content_type_uid TEXT NOT NULL,
        body             TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS records_by_type ON records (content_type_uid, seq);
    CREATE TABLE IF NOT EXISTS identities (
        id           TEXT PRIMARY KEY,
        alt_id       TEXT,
        display_name TEXT NOT NULL,
        email        TEXT NOT NULL DEFAULT '',
        subscribed   INTEGER NOT NULL DEFAULT 0
    );
    CREATE TABLE IF NOT EXISTS files (
        id           TEXT PRIMARY KEY,
        url          TEXT NOT NULL,
        display_name TEXT NOT NULL,
        mime_type    TEXT NOT NULL DEFAULT '',
        size_bytes   INTEGER
    );
";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        info!("opening store at {}", path.display());
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    pub fn add_identity(&self, identity: &Identity) -> Result<(), StoreError> {
        self.conn()?.execute(
            "INSERT OR REPLACE INTO identities (id, alt_id, display_name, email, subscribed)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                identity.id,
                identity.alt_id,
                identity.display_name,
                identity.email,
                identity.subscribed
            ],
        )?;
        Ok(())
    }

    pub fn add_file(&self, file: &FileRef) -> Result<(), StoreError> {
        self.conn()?.execute(
            "INSERT OR REPLACE INTO files (id, url, display_name, mime_type, size_bytes)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                file.id,
                file.url,
                file.display_name,
                file.mime_type,
                file.size_bytes.map(|s| s as i64)
            ],
        )?;
        Ok(())
    }

    pub fn content_type(&self, type_id: &str) -> Result<Option<ContentType>, StoreError> {
        let body: Option<String> = self
            .conn()?
            .query_row(
                "SELECT body FROM content_types WHERE uid = ?1",
                params![type_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(body.map(|b| serde_json::from_str(&b)).transpose()?)
    }

    /// Every record of a type, in insertion order.
    pub fn all_records(&self, type_id: &str) -> Result<Vec<Record>, StoreError> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT uid, body FROM records WHERE content_type_uid = ?1 ORDER BY seq")?;
        let rows = stmt.query_map(params![type_id], record_row)?;
        rows.map(|row| decode_record(row?)).collect()
    }

    fn page(&self, type_id: &str, page: u32, page_size: u32) -> Result<RecordPage, StoreError> {
        let conn = self.conn()?;
        let total_count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM records WHERE content_type_uid = ?1",
            params![type_id],
            |row| row.get(0),
        )?;

        let limit = i64::from(page_size.max(1));
        let offset = i64::from(page.max(1) - 1) * limit;
        let mut stmt = conn.prepare(
            "SELECT uid, body FROM records WHERE content_type_uid = ?1
             ORDER BY seq LIMIT ?2 OFFSET ?3",
        )?;
        let records = stmt
            .query_map(params![type_id, limit, offset], record_row)?
            .map(|row| decode_record(row?))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RecordPage {
            records,
            total_count: total_count.max(0) as u64,
        })
    }

    fn insert_record(
        &self,
        type_id: &str,
        payload: &Map<String, Value>,
    ) -> Result<Option<RecordRef>, StoreError> {
        if self.content_type(type_id)?.is_none() {
            return Ok(None);
        }
        let uid = uuid::Uuid::new_v4().to_string();
        self.conn()?.execute(
            "INSERT INTO records (uid, content_type_uid, body) VALUES (?1, ?2, ?3)",
            params![uid, type_id, serde_json::to_string(payload)?],
        )?;
        debug!("stored record {} for `{}`", uid, type_id);
        Ok(Some(RecordRef {
            uid,
            content_type_uid: type_id.to_string(),
        }))
    }

    fn identities(&self, filter: Option<&str>) -> Result<Vec<Identity>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, alt_id, display_name, email, subscribed FROM identities
             WHERE ?1 IS NULL OR display_name LIKE '%' || ?1 || '%' OR email LIKE '%' || ?1 || '%'
             ORDER BY display_name",
        )?;
        let filter = filter.map(str::trim).filter(|f| !f.is_empty());
        let rows = stmt.query_map(params![filter], |row| {
            Ok(Identity {
                id: row.get(0)?,
                alt_id: row.get(1)?,
                display_name: row.get(2)?,
                email: row.get(3)?,
                subscribed: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    fn files(&self, query: &str) -> Result<Vec<FileRef>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, url, display_name, mime_type, size_bytes FROM files
             WHERE display_name LIKE '%' || ?1 || '%'
             ORDER BY display_name",
        )?;
        let rows = stmt.query_map(params![query.trim()], |row| {
            Ok(FileRef {
                id: row.get(0)?,
                url: row.get(1)?,
                display_name: row.get(2)?,
                mime_type: row.get(3)?,
                size_bytes: row.get::<_, Option<i64>>(4)?.map(|s| s.max(0) as u64),
            })
        })?;
        Ok(rows.collect::<Result<_, _>>()?)
    }
}

fn record_row(row: &Row<'_>) -> rusqlite::Result<(String, String)> {
    Ok((row.get(0)?, row.get(1)?))
}

fn decode_record((uid, body): (String, String)) -> Result<Record, StoreError> {
    let mut record: Record = serde_json::from_str(&body)?;
    record
        .entry(RECORD_UID_KEY)
        .or_insert_with(|| Value::String(uid));
    Ok(record)
}

impl ContentTypeStore for SqliteStore {
    fn fetch_schema(&self, type_id: &str) -> Result<ContentType, FetchError> {
        self.content_type(type_id)?
            .ok_or_else(|| FetchError::NotFound(format!("Content type `{}`", type_id)))
    }

    fn publish_schema(&self, content_type: &ContentType) -> Result<(), SubmitError> {
        let body = serde_json::to_string(content_type).map_err(StoreError::from)?;
        self.conn()?
            .execute(
                "INSERT OR REPLACE INTO content_types (uid, body) VALUES (?1, ?2)",
                params![content_type.uid, body],
            )
            .map_err(StoreError::from)?;
        info!(
            "published content type `{}` ({} fields)",
            content_type.uid,
            content_type.schema.len()
        );
        Ok(())
    }
}

impl RecordStore for SqliteStore {
    fn list_records(
        &self,
        type_id: &str,
        page: u32,
        page_size: u32,
    ) -> Result<RecordPage, FetchError> {
        Ok(self.page(type_id, page, page_size)?)
    }

    fn create_record(
        &self,
        type_id: &str,
        payload: &Map<String, Value>,
    ) -> Result<RecordRef, SubmitError> {
        self.insert_record(type_id, payload)?
            .ok_or_else(|| SubmitError::Rejected(format!("Unknown content type `{}`", type_id)))
    }
}

impl IdentityDirectory for SqliteStore {
    fn list_identities(&self, filter: Option<&str>) -> Result<Vec<Identity>, FetchError> {
        Ok(self.identities(filter)?)
    }
}

impl FileDirectory for SqliteStore {
    fn list_files(&self, query: &str) -> Result<Vec<FileRef>, FetchError> {
        Ok(self.files(query)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::model::field::Field;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn store_with_type() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .publish_schema(&ContentType {
                uid: "welcome".into(),
                title: "Welcome".into(),
                description: String::new(),
                schema: vec![Field::text("subject", "Subject")],
                extra: Map::new(),
            })
            .unwrap();
        store
    }

    fn payload(subject: &str) -> Map<String, Value> {
        let Value::Object(map) = json!({ "subject": subject }) else {
            unreachable!()
        };
        map
    }

    #[test]
    fn schemas_round_trip_through_the_table() {
        let store = store_with_type();
        assert_eq!(store.fetch_schema("welcome").unwrap().title, "Welcome");
        assert_eq!(
            store.fetch_schema("missing"),
            Err(FetchError::NotFound("Content type `missing`".into()))
        );
    }

    #[test]
    fn records_page_in_insertion_order() {
        let store = store_with_type();
        for subject in ["a", "b", "c"] {
            store.create_record("welcome", &payload(subject)).unwrap();
        }

        let page = store.list_records("welcome", 2, 2).unwrap();
        assert_eq!(page.total_count, 3);
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.records[0]["subject"], json!("c"));
        assert!(page.records[0].contains_key(RECORD_UID_KEY));
    }

    #[test]
    fn records_need_a_published_type() {
        let store = store_with_type();
        let err = store.create_record("nope", &payload("x")).unwrap_err();
        assert_eq!(err.to_string(), "Submission failed: Unknown content type `nope`");
    }

    #[test]
    fn identities_filter_on_name_and_email() {
        let store = SqliteStore::open_in_memory().unwrap();
        for (id, name, email) in [("1", "Ada Lovelace", "ada@x.io"), ("2", "Alan Turing", "")] {
            store
                .add_identity(&Identity {
                    id: id.into(),
                    alt_id: None,
                    display_name: name.into(),
                    email: email.into(),
                    subscribed: id == "1",
                })
                .unwrap();
        }

        assert_eq!(store.list_identities(None).unwrap().len(), 2);
        let found = store.list_identities(Some("X.IO")).unwrap();
        assert_eq!(found.len(), 1);
        assert!(found[0].subscribed);
    }

    #[test]
    fn files_keep_their_size() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .add_file(&FileRef {
                id: "f1".into(),
                url: "https://cdn/brief.pdf".into(),
                display_name: "brief.pdf".into(),
                mime_type: "application/pdf".into(),
                size_bytes: Some(2048),
            })
            .unwrap();

        let files = store.list_files("brief").unwrap();
        assert_eq!(files[0].size_bytes, Some(2048));
        assert!(store.list_files("logo").unwrap().is_empty());
    }
}
