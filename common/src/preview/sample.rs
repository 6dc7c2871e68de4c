//! Synthesized record data for previews without a record.

use super::{default_or, sample_count};
use crate::identities::sample_emails;
use crate::model::value::{Identity, Record};
use crate::schema::role::Role;
use crate::schema::Schema;
use serde_json::{json, Value};

/// The record itself when there is one, otherwise one sample value per input
/// field keyed by its flat identifier.
pub fn sample_data(schema: &Schema, record: Option<&Record>, identities: &[Identity]) -> Value {
    if let Some(record) = record {
        return Value::Object(record.clone());
    }

    let data: Record = schema
        .inputs()
        .map(|classified| {
            let field = &classified.field;
            let value = match classified.role {
                Role::RecipientList | Role::Cc | Role::Bcc => {
                    Value::String(sample_emails(identities, sample_count(classified.role)))
                }
                Role::Subject => default_or(field, || "Sample Email Subject".to_string()),
                Role::FileUpload if field.is_image() => json!({
                    "url": "https://example.com/sample-image.jpg",
                    "filename": "sample-image.jpg",
                    "content_type": "image/jpeg"
                }),
                Role::FileUpload => json!({
                    "url": "https://example.com/sample-file.pdf",
                    "filename": "sample-file.pdf",
                    "content_type": "application/pdf"
                }),
                _ => default_or(field, || {
                    format!("Sample {}", field.display_name.to_lowercase())
                }),
            };
            (field.uid.clone(), value)
        })
        .collect();
    Value::Object(data)
}
