//! State of a generated data-entry form.
//!
//! One [`FormControl`] per input field of the loaded [`Schema`], in schema
//! order. The control kind is chosen from the field's role when the form is
//! built; validation is never done by the controls themselves, see
//! [`crate::validate`].

use crate::error::FetchError;
use crate::html::{parse_file_size, DEFAULT_MAX_FILE_SIZE};
use crate::model::field::{Field, RichTextKind};
use crate::model::value::{FieldValue, FileRef, Identity, RecordRef};
use crate::schema::role::{ClassifiedField, Role};
use crate::schema::Schema;
use crate::validate::{selection, FieldErrors};
use serde_json::{Map, Value};

/// Which assets a file control accepts.
#[derive(Debug, Clone, PartialEq)]
pub struct FileFilter {
    pub images_only: bool,
    /// Lowercase extensions without the dot. Empty accepts any extension.
    pub extensions: Vec<String>,
    pub max_bytes: u64,
}

impl FileFilter {
    pub fn for_field(field: &Field) -> Self {
        let max_bytes = match &field.field_metadata.file_size {
            Some(Value::Number(n)) => n.as_u64().unwrap_or(DEFAULT_MAX_FILE_SIZE),
            Some(Value::String(s)) => parse_file_size(s),
            _ => DEFAULT_MAX_FILE_SIZE,
        };
        Self {
            images_only: field.is_image(),
            extensions: field
                .field_metadata
                .extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            max_bytes,
        }
    }

    /// Images are filtered by mime type, other files by extension.
    pub fn accepts(&self, file: &FileRef) -> bool {
        let kind_ok = if self.images_only {
            file.is_image()
        } else {
            self.extensions.is_empty()
                || file
                    .extension()
                    .is_some_and(|ext| self.extensions.contains(&ext))
        };
        kind_ok && file.size_bytes.is_none_or(|size| size <= self.max_bytes)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Control {
    /// Search-and-add over the identity directory. `selected` holds ids.
    RecipientPicker { selected: Vec<String>, query: String },
    /// Free-text chips committed with Enter.
    TagInput { tags: Vec<String>, draft: String },
    SingleLine { value: String },
    FilePicker {
        selected: Option<FileRef>,
        filter: FileFilter,
        picker_open: bool,
    },
    RichText { kind: RichTextKind, html: String },
    MultiLine { value: String },
    PlainText { value: String },
}

impl Control {
    fn for_field(classified: &ClassifiedField) -> Self {
        let field = &classified.field;
        let default = field.default_text().unwrap_or_default();
        match classified.role {
            Role::RecipientList => Control::RecipientPicker {
                selected: selection(&Value::String(default)),
                query: String::new(),
            },
            Role::TagList => Control::TagInput {
                tags: field
                    .field_metadata
                    .default_value
                    .as_ref()
                    .map(selection)
                    .unwrap_or_default(),
                draft: String::new(),
            },
            Role::Subject | Role::Cc | Role::Bcc | Role::LinkPart => {
                Control::SingleLine { value: default }
            }
            Role::FileUpload => Control::FilePicker {
                selected: None,
                filter: FileFilter::for_field(field),
                picker_open: false,
            },
            _ => match &field.field_metadata.rich_text_type {
                Some(kind) => Control::RichText {
                    kind: kind.clone(),
                    html: default,
                },
                None if field.field_metadata.multiline => Control::MultiLine { value: default },
                None => Control::PlainText { value: default },
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormControl {
    pub field: ClassifiedField,
    pub control: Control,
}

impl FormControl {
    pub fn uid(&self) -> &str {
        self.field.uid()
    }

    /// The control's current value in the shape the validator reads.
    pub fn value(&self) -> FieldValue {
        let uid = self.uid();
        let data_type = self.field.field.data_type.clone();
        match &self.control {
            Control::RecipientPicker { selected, .. } => {
                FieldValue::new(uid, data_type, Value::String(selected.join(",")))
            }
            Control::TagInput { tags, .. } => FieldValue::new(
                uid,
                data_type,
                Value::Array(tags.iter().cloned().map(Value::String).collect()),
            ),
            Control::FilePicker { selected, .. } => FieldValue::file(uid, selected.clone()),
            Control::RichText { html: value, .. }
            | Control::SingleLine { value }
            | Control::MultiLine { value }
            | Control::PlainText { value } => {
                FieldValue::new(uid, data_type, Value::String(value.clone()))
            }
        }
    }
}

/// The whole form: controls plus the directory data they draw from.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub type_id: String,
    pub schema: Schema,
    pub controls: Vec<FormControl>,
    pub identities: Vec<Identity>,
    pub files: Vec<FileRef>,
    /// Inline messages from the last submit attempt.
    pub errors: FieldErrors,
    /// Top-level message when the record store rejected the submission.
    pub submit_error: Option<String>,
    /// Payload handed to the record store; kept until the store accepts it.
    pub pending: Option<Map<String, Value>>,
    pub submitted: Option<RecordRef>,
}

impl FormState {
    pub fn new(type_id: impl Into<String>, schema: Schema) -> Self {
        let controls = schema
            .inputs()
            .map(|field| FormControl {
                control: Control::for_field(field),
                field: field.clone(),
            })
            .collect();
        Self {
            type_id: type_id.into(),
            schema,
            controls,
            identities: Vec::new(),
            files: Vec::new(),
            errors: FieldErrors::new(),
            submit_error: None,
            pending: None,
            submitted: None,
        }
    }

    pub fn control(&self, uid: &str) -> Option<&FormControl> {
        self.controls.iter().find(|c| c.uid() == uid)
    }

    pub fn control_mut(&mut self, uid: &str) -> Option<&mut Control> {
        self.controls
            .iter_mut()
            .find(|c| c.uid() == uid)
            .map(|c| &mut c.control)
    }

    pub fn values(&self) -> Vec<FieldValue> {
        self.controls.iter().map(FormControl::value).collect()
    }

    pub fn identity(&self, id: &str) -> Option<&Identity> {
        self.identities.iter().find(|i| i.matches_token(id))
    }

    pub fn file(&self, id: &str) -> Option<&FileRef> {
        self.files.iter().find(|f| f.id == id)
    }

    /// Directory loads degrade to an empty list.
    pub(crate) fn loaded<T>(result: Result<Vec<T>, FetchError>, what: &str) -> Vec<T> {
        result.unwrap_or_else(|err| {
            log::warn!("{} unavailable, continuing without them: {}", what, err);
            Vec::new()
        })
    }
}
