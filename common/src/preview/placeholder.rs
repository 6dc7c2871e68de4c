use crate::model::field::Field;
use serde::{Deserialize, Serialize};

/// Stand-in text for a field the previewed record leaves empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placeholder {
    pub text: String,
    pub source: PlaceholderSource,
}

/// Where a placeholder's text came from, most specific first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderSource {
    DefaultValue,
    Description,
    DisplayName,
}

impl Placeholder {
    pub fn for_field(field: &Field) -> Self {
        if let Some(default) = field.default_text() {
            return Self {
                text: default,
                source: PlaceholderSource::DefaultValue,
            };
        }
        match field.description() {
            Some(description) => Self {
                text: format!("[{}]", description),
                source: PlaceholderSource::Description,
            },
            None => Self {
                text: format!("[{}]", field.display_name),
                source: PlaceholderSource::DisplayName,
            },
        }
    }
}
