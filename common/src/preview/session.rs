//! Preview session: a record list with pagination, one selected record, and
//! the latest rendered document.
//!
//! Fetching records and identities happens outside; results are fed in with
//! [`PreviewSession::load_page`] and [`PreviewSession::load_identities`].
//! Rendering is split into [`PreviewSession::request_render`] (issues a
//! token), [`PreviewSession::render`] (pure) and
//! [`PreviewSession::complete`] (applies the document only if its token is
//! still the latest).

use super::html::render_html;
use super::json::{render_json, EntriesInfo};
use super::sample::sample_data;
use super::sequence::{RenderSequence, RenderToken};
use super::resolve_fields;
use crate::error::FetchError;
use crate::model::field::ContentType;
use crate::model::value::{Identity, Record, RecordPage};
use crate::schema::Schema;
use log::{debug, warn};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub current_page: u32,
    pub page_size: u32,
    pub total_count: u64,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_previous: bool,
}

impl Pagination {
    pub fn new(current_page: u32, page_size: u32, total_count: u64) -> Self {
        let page_size = page_size.max(1);
        let total_pages = total_count.div_ceil(u64::from(page_size)) as u32;
        let current_page = current_page.max(1);
        Self {
            current_page,
            page_size,
            total_count,
            total_pages,
            has_next: current_page < total_pages,
            has_previous: current_page > 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewDocument {
    pub token: RenderToken,
    pub html: String,
    pub json: Value,
}

/// What a render needs, captured when the render is requested.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    pub token: RenderToken,
    pub record: Option<Record>,
    pub showing_entry: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct PreviewSession {
    pub content_type: ContentType,
    schema: Schema,
    pub records: Vec<Record>,
    pub pagination: Pagination,
    pub selected: Option<usize>,
    pub identities: Vec<Identity>,
    sequence: RenderSequence,
    pub document: Option<PreviewDocument>,
}

impl PreviewSession {
    pub fn new(content_type: ContentType, page_size: u32) -> Self {
        let schema = Schema::load(&content_type.schema);
        Self {
            content_type,
            schema,
            records: Vec::new(),
            pagination: Pagination::new(1, page_size, 0),
            selected: None,
            identities: Vec::new(),
            sequence: RenderSequence::default(),
            document: None,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// An unreachable directory leaves the session usable with sample data.
    pub fn load_identities(&mut self, result: Result<Vec<Identity>, FetchError>) {
        self.identities = result.unwrap_or_else(|err| {
            warn!("identity directory unavailable, previewing with samples: {}", err);
            Vec::new()
        });
    }

    /// Replaces the record list and preselects the first record.
    pub fn load_page(&mut self, page: RecordPage, page_number: u32) {
        self.pagination = Pagination::new(page_number, self.pagination.page_size, page.total_count);
        self.records = page.records;
        self.selected = if self.records.is_empty() { None } else { Some(0) };
    }

    /// Selects a record on the current page. Out-of-range indexes are ignored.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.records.len() && self.selected != Some(index) {
            self.selected = Some(index);
            true
        } else {
            false
        }
    }

    pub fn selected_record(&self) -> Option<&Record> {
        self.selected.and_then(|i| self.records.get(i))
    }

    pub fn request_render(&mut self) -> RenderRequest {
        RenderRequest {
            token: self.sequence.issue(),
            record: self.selected_record().cloned(),
            showing_entry: self.selected.map(|i| i + 1),
        }
    }

    pub fn render(&self, request: &RenderRequest) -> PreviewDocument {
        let record = request.record.as_ref();
        let fields = resolve_fields(&self.schema, record, &self.identities);
        let entries = EntriesInfo {
            total_entries: self.pagination.total_count,
            current_page: self.pagination.current_page,
            total_pages: self.pagination.total_pages,
            showing_entry: request.showing_entry,
        };
        PreviewDocument {
            token: request.token,
            html: render_html(&self.content_type.title, &fields),
            json: render_json(
                &self.content_type,
                &fields,
                entries,
                record,
                sample_data(&self.schema, record, &self.identities),
            ),
        }
    }

    /// Applies a finished render. Returns `false` and drops the document when
    /// a newer render was requested in the meantime.
    pub fn complete(&mut self, document: PreviewDocument) -> bool {
        if !self.sequence.is_latest(document.token) {
            debug!(
                "discarding stale preview {:?}, latest is {:?}",
                document.token,
                self.sequence.latest()
            );
            return false;
        }
        self.document = Some(document);
        true
    }

    /// Requests, renders and applies in one step.
    pub fn refresh(&mut self) -> &PreviewDocument {
        let request = self.request_render();
        let document = self.render(&request);
        self.document.insert(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::field::Field;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn content_type() -> ContentType {
        ContentType {
            uid: "welcome".into(),
            title: "Welcome".into(),
            description: String::new(),
            schema: vec![Field::text("subject", "Subject")],
            extra: Default::default(),
        }
    }

    fn page(subjects: &[&str], total_count: u64) -> RecordPage {
        RecordPage {
            records: subjects
                .iter()
                .map(|s| {
                    let mut record = Record::new();
                    record.insert("subject".into(), json!(s));
                    record
                })
                .collect(),
            total_count,
        }
    }

    #[test]
    fn pagination_counts_pages() {
        let pagination = Pagination::new(2, 10, 25);
        assert_eq!(pagination.total_pages, 3);
        assert!(pagination.has_next && pagination.has_previous);
        assert!(!Pagination::new(1, 10, 0).has_next);
    }

    #[test]
    fn loading_a_page_preselects_the_first_record() {
        let mut session = PreviewSession::new(content_type(), 10);
        session.load_page(page(&["First", "Second"], 2), 1);
        assert_eq!(session.selected, Some(0));

        let document = session.refresh().clone();
        assert!(document.html.contains("First"));
        assert_eq!(document.json["entries_info"]["showing_entry"], 1);

        session.load_page(page(&[], 0), 1);
        assert_eq!(session.selected, None);
        assert!(session.refresh().html.contains("[Subject]"));
    }

    #[test]
    fn stale_renders_are_discarded() {
        let mut session = PreviewSession::new(content_type(), 10);
        session.load_page(page(&["First", "Second"], 2), 1);

        let slow = session.request_render();
        session.select(1);
        let fast = session.request_render();

        assert!(session.complete(session.render(&fast)));
        assert!(!session.complete(session.render(&slow)));
        let shown = session.document.as_ref().map(|d| d.html.contains("Second"));
        assert_eq!(shown, Some(true));
    }

    #[test]
    fn identity_failures_degrade_to_samples() {
        let mut session = PreviewSession::new(content_type(), 10);
        session.load_identities(Err(FetchError::Failed("timeout".into())));
        assert!(session.identities.is_empty());
    }
}
