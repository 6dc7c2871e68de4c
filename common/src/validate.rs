//! Per-role validation of entered values.
//!
//! `validate` is pure: it never mutates the values and never fails. The
//! result maps a field identifier to the first rule that field breaks; a
//! field absent from the map is valid.

use crate::error::FieldError;
use crate::html::is_rich_text_empty;
use crate::model::field::Field;
use crate::model::value::{lookup, FieldValue, Record};
use crate::schema::role::{ClassifiedField, Role};
use crate::schema::Schema;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

pub type FieldErrors = BTreeMap<String, FieldError>;

pub fn is_valid_email(candidate: &str) -> bool {
    EMAIL.is_match(candidate)
}

/// Items of a selection-list value: an array of strings, or a comma or
/// semicolon separated string.
pub fn selection(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .filter(|s| !s.is_empty())
            .collect(),
        Value::String(s) => s
            .split([',', ';'])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}

pub fn validate(schema: &Schema, values: &[FieldValue]) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for field in schema.inputs() {
        let value = values.iter().find(|v| v.field_uid == field.uid());
        if let Some(error) = check(field, value) {
            errors.insert(field.uid().to_string(), error);
        }
    }
    errors
}

/// Validates a stored record, whose groups are nested.
pub fn validate_record(schema: &Schema, record: &Record) -> FieldErrors {
    let values: Vec<FieldValue> = schema
        .inputs()
        .filter_map(|field| {
            let value = lookup(record, field.uid())?;
            Some(FieldValue::new(
                field.uid(),
                field.field.data_type.clone(),
                value.clone(),
            ))
        })
        .collect();
    validate(schema, &values)
}

fn check(classified: &ClassifiedField, value: Option<&FieldValue>) -> Option<FieldError> {
    let field = &classified.field;
    match classified.role {
        Role::GroupHeader | Role::LinkPart | Role::Suppressed => None,
        Role::RecipientList | Role::TagList => {
            let empty = value.is_none_or(|v| selection(&v.value).is_empty());
            (field.mandatory && empty).then(|| FieldError::missing(&field.display_name))
        }
        Role::Cc | Role::Bcc => check_emails(field, value),
        Role::GenericText if field.field_metadata.rich_text_type.is_some() => {
            let empty = value.is_none_or(|v| v.as_str().is_none_or(is_rich_text_empty));
            (field.mandatory && empty).then(|| FieldError::missing(&field.display_name))
        }
        Role::FileUpload => {
            let empty = value.is_none_or(FieldValue::submits_blank);
            (field.mandatory && empty).then(|| FieldError::missing(&field.display_name))
        }
        Role::GenericText | Role::Subject => {
            let empty = value.is_none_or(FieldValue::is_blank);
            (field.mandatory && empty).then(|| FieldError::missing(&field.display_name))
        }
    }
}

fn check_emails(field: &Field, value: Option<&FieldValue>) -> Option<FieldError> {
    let raw = value.and_then(FieldValue::as_str).unwrap_or_default();
    if raw.trim().is_empty() {
        return field
            .mandatory
            .then(|| FieldError::missing(&field.display_name));
    }
    let invalid: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty() && !is_valid_email(token))
        .map(String::from)
        .collect();
    (!invalid.is_empty()).then(|| FieldError::invalid_emails(invalid))
}
