use crate::model::field::DataType;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A record as the store returns it: a partial map identifier → value.
pub type Record = Map<String, Value>;

/// Looks up a flat identifier in a stored record.
///
/// Records hold groups nested, so `g.a` falls back to `record["g"]["a"]` when
/// the record has no literal `g.a` key.
pub fn lookup<'a>(record: &'a Record, uid: &str) -> Option<&'a Value> {
    record.get(uid).or_else(|| {
        let (group, sub) = uid.split_once('.')?;
        record.get(group)?.get(sub)
    })
}

/// An asset from the file directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    pub id: String,
    pub url: String,
    pub display_name: String,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub size_bytes: Option<u64>,
}

impl FileRef {
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    /// Lowercased extension of the display name, falling back to the URL path.
    pub fn extension(&self) -> Option<String> {
        let from = |name: &str| {
            let name = name.split(['?', '#']).next().unwrap_or(name);
            let file = name.rsplit('/').next().unwrap_or(name);
            file.rsplit_once('.')
                .map(|(_, ext)| ext.to_ascii_lowercase())
                .filter(|ext| !ext.is_empty())
        };
        from(&self.display_name).or_else(|| from(&self.url))
    }
}

/// The value held by one form control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldValue {
    pub field_uid: String,
    pub data_type: DataType,
    #[serde(default)]
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_file: Option<FileRef>,
}

impl FieldValue {
    pub fn new(field_uid: impl Into<String>, data_type: DataType, value: impl Into<Value>) -> Self {
        Self {
            field_uid: field_uid.into(),
            data_type,
            value: value.into(),
            selected_file: None,
        }
    }

    pub fn text(field_uid: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field_uid, DataType::Text, Value::String(value.into()))
    }

    pub fn file(field_uid: impl Into<String>, file: Option<FileRef>) -> Self {
        let value = file
            .as_ref()
            .map_or(Value::Null, |f| Value::String(f.url.clone()));
        Self {
            field_uid: field_uid.into(),
            data_type: DataType::File,
            value,
            selected_file: file,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.value.as_str()
    }

    /// True when the scalar carries nothing but whitespace (or nothing at all).
    pub fn is_blank(&self) -> bool {
        is_blank_value(&self.value)
    }

    /// The value as submitted to the record store.
    ///
    /// File fields submit the selected asset's id rather than its URL. Without
    /// a selection (a stored record, or a client posting a raw reference) the
    /// value itself is submitted.
    pub fn submission_value(&self) -> Value {
        match (&self.data_type, &self.selected_file) {
            (DataType::File, Some(file)) => Value::String(file.id.clone()),
            _ => self.value.clone(),
        }
    }

    /// Blankness of what [`FieldValue::submission_value`] would submit.
    pub fn submits_blank(&self) -> bool {
        is_blank_value(&self.submission_value())
    }
}

fn is_blank_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// A directory entry eligible as a recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    /// Secondary key some records use instead of `id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_id: Option<String>,
    pub display_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subscribed: bool,
}

impl Identity {
    pub fn matches_token(&self, token: &str) -> bool {
        self.id == token
            || self.alt_id.as_deref() == Some(token)
            || (!self.email.is_empty() && self.email == token)
    }

    /// The address shown for this identity, synthesizing one when absent.
    pub fn display_email(&self) -> String {
        if !self.email.is_empty() {
            return self.email.clone();
        }
        let first = self
            .display_name
            .split_whitespace()
            .next()
            .unwrap_or("user")
            .to_lowercase();
        format!("{}@example.com", first)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordPage {
    pub records: Vec<Record>,
    pub total_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRef {
    pub uid: String,
    pub content_type_uid: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn asset(name: &str, url: &str) -> FileRef {
        FileRef {
            id: "a1".into(),
            url: url.into(),
            display_name: name.into(),
            mime_type: "application/pdf".into(),
            size_bytes: None,
        }
    }

    #[test]
    fn extension_prefers_display_name() {
        assert_eq!(
            asset("Report.PDF", "https://cdn/x").extension().as_deref(),
            Some("pdf")
        );
        assert_eq!(
            asset("Report", "https://cdn/files/brief.docx?v=2").extension().as_deref(),
            Some("docx")
        );
    }

    #[test]
    fn file_values_submit_the_asset_id() {
        let value = FieldValue::file("file_2", Some(asset("a.pdf", "https://cdn/a.pdf")));
        assert_eq!(value.value, json!("https://cdn/a.pdf"));
        assert_eq!(value.submission_value(), json!("a1"));
        assert_eq!(FieldValue::file("file_2", None).submission_value(), Value::Null);
    }

    #[test]
    fn unselected_file_values_submit_the_raw_reference() {
        let raw = FieldValue::new("file_2", DataType::File, json!("https://cdn/a.pdf"));
        assert_eq!(raw.submission_value(), json!("https://cdn/a.pdf"));
        assert!(!raw.submits_blank());

        let mut picked = FieldValue::file("file_2", Some(asset("a.pdf", "https://cdn/a.pdf")));
        picked.value = Value::Null;
        assert!(!picked.submits_blank());
        assert!(FieldValue::file("file_2", None).submits_blank());
    }

    #[test]
    fn lookup_reaches_into_groups() {
        let record = json!({ "subject": "Hi", "footer": { "note": "bye" } });
        let Value::Object(record) = record else { unreachable!() };
        assert_eq!(lookup(&record, "subject"), Some(&json!("Hi")));
        assert_eq!(lookup(&record, "footer.note"), Some(&json!("bye")));
        assert_eq!(lookup(&record, "footer.missing"), None);
    }

    #[test]
    fn identities_without_email_get_a_sample_address() {
        let identity = Identity {
            id: "blt1".into(),
            alt_id: None,
            display_name: "Ada Lovelace".into(),
            email: String::new(),
            subscribed: true,
        };
        assert_eq!(identity.display_email(), "ada@example.com");
        assert!(!identity.matches_token(""));
    }
}
