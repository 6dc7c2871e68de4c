//! JSON preview document.

use super::PreviewField;
use crate::model::field::ContentType;
use crate::model::value::Record;
use serde::Serialize;
use serde_json::{json, Value};

/// Where the previewed record sits in the record list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EntriesInfo {
    pub total_entries: u64,
    pub current_page: u32,
    pub total_pages: u32,
    /// 1-based position of the shown record on its page, if any.
    pub showing_entry: Option<usize>,
}

pub fn render_json(
    content_type: &ContentType,
    fields: &[PreviewField],
    entries: EntriesInfo,
    current_entry: Option<&Record>,
    sample_data: Value,
) -> Value {
    json!({
        "template": {
            "uid": content_type.uid,
            "title": content_type.title,
            "description": content_type.description,
        },
        "schema": content_type.schema,
        "fields": fields,
        "entries_info": entries,
        "current_entry": current_entry,
        "sample_data": sample_data,
    })
}
