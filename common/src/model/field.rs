//! Generic field descriptors exchanged with the record store.
//!
//! The serialized shape is the store's content-type schema format
//! (`uid`, `display_name`, `data_type`, `field_metadata`, ...). Unknown keys at
//! either level are kept in `extra` so that a schema read from the store can be
//! written back without losing anything.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The storage type of a field.
///
/// Types this crate does not interpret (`number`, `boolean`, `reference`, ...)
/// are carried verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DataType {
    Text,
    File,
    Group,
    GroupHeader,
    Other(String),
}

impl DataType {
    pub fn as_str(&self) -> &str {
        match self {
            DataType::Text => "text",
            DataType::File => "file",
            DataType::Group => "group",
            DataType::GroupHeader => "group_header",
            DataType::Other(other) => other,
        }
    }
}

impl From<String> for DataType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "text" => DataType::Text,
            "file" => DataType::File,
            "group" => DataType::Group,
            "group_header" => DataType::GroupHeader,
            _ => DataType::Other(value),
        }
    }
}

impl From<DataType> for String {
    fn from(value: DataType) -> Self {
        match value {
            DataType::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

/// Flavour of rich-text editor a text field asks for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RichTextKind {
    Basic,
    Advanced,
    Custom(String),
}

impl From<String> for RichTextKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "basic" => RichTextKind::Basic,
            "advanced" => RichTextKind::Advanced,
            _ => RichTextKind::Custom(value),
        }
    }
}

impl From<RichTextKind> for String {
    fn from(value: RichTextKind) -> Self {
        match value {
            RichTextKind::Basic => "basic".to_string(),
            RichTextKind::Advanced => "advanced".to_string(),
            RichTextKind::Custom(other) => other,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    pub multiline: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rich_text_type: Option<RichTextKind>,
    /// Set on file fields that only accept images.
    pub image: bool,
    /// Maximum upload size, either a byte count or a string such as `"10MB"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// The field identifier. Roles are inferred from it, see `schema::role`.
    pub uid: String,
    pub display_name: String,
    pub data_type: DataType,
    #[serde(default)]
    pub field_metadata: FieldMetadata,
    #[serde(default)]
    pub mandatory: bool,
    #[serde(default)]
    pub multiple: bool,
    /// Sub-fields of a `group` field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Vec<Field>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Field {
    pub fn new(uid: impl Into<String>, display_name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            uid: uid.into(),
            display_name: display_name.into(),
            data_type,
            field_metadata: FieldMetadata::default(),
            mandatory: false,
            multiple: false,
            schema: None,
            extra: Map::new(),
        }
    }

    pub fn text(uid: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self::new(uid, display_name, DataType::Text)
    }

    pub fn file(uid: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self::new(uid, display_name, DataType::File)
    }

    pub fn group(
        uid: impl Into<String>,
        display_name: impl Into<String>,
        members: Vec<Field>,
    ) -> Self {
        let mut field = Self::new(uid, display_name, DataType::Group);
        field.schema = Some(members);
        field
    }

    pub fn required(mut self, mandatory: bool) -> Self {
        self.mandatory = mandatory;
        self
    }

    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.field_metadata.description = Some(description.into());
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.field_metadata.default_value = Some(value.into());
        self
    }

    pub fn description(&self) -> Option<&str> {
        self.field_metadata
            .description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
    }

    /// The default as a display string; non-string defaults are rendered as JSON.
    pub fn default_text(&self) -> Option<String> {
        match self.field_metadata.default_value.as_ref()? {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    pub fn is_image(&self) -> bool {
        self.field_metadata.image
    }

    /// Group members, or an empty slice for anything that is not a non-empty group.
    pub fn members(&self) -> &[Field] {
        match (&self.data_type, &self.schema) {
            (DataType::Group, Some(members)) => members,
            _ => &[],
        }
    }
}

/// A published schema: what the compiler produces and the store serves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentType {
    pub uid: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub schema: Vec<Field>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn unknown_keys_survive_a_round_trip() {
        let raw = json!({
            "uid": "subject",
            "display_name": "Subject",
            "data_type": "text",
            "field_metadata": { "description": "Email subject line", "version": 3 },
            "mandatory": true,
            "unique": false
        });

        let field: Field = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(field.data_type, DataType::Text);
        assert_eq!(field.field_metadata.extra.get("version"), Some(&json!(3)));
        assert_eq!(field.extra.get("unique"), Some(&json!(false)));

        let back = serde_json::to_value(&field).unwrap();
        assert_eq!(back["field_metadata"]["version"], json!(3));
        assert_eq!(back["unique"], json!(false));
        assert_eq!(back["data_type"], json!("text"));
    }

    #[test]
    fn unrecognised_data_types_are_carried_verbatim() {
        let field: Field = serde_json::from_value(json!({
            "uid": "count",
            "display_name": "Count",
            "data_type": "number"
        }))
        .unwrap();
        assert_eq!(field.data_type, DataType::Other("number".into()));
        assert_eq!(serde_json::to_value(&field).unwrap()["data_type"], json!("number"));
    }

    #[test]
    fn default_text_skips_empty_values() {
        assert_eq!(Field::text("a", "A").with_default("").default_text(), None);
        assert_eq!(
            Field::text("a", "A").with_default(3).default_text(),
            Some("3".to_string())
        );
    }
}
