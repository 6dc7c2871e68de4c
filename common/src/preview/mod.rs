//! Preview rendering.
//!
//! A schema plus an optional record is first resolved into a list of
//! [`PreviewField`]s: record values where present, placeholders or sample
//! identities otherwise, recipient identifiers turned into addresses, and the
//! two halves of each link joined. The HTML and JSON documents are both
//! rendered from that one list, so they always show the same fields.

pub mod html;
pub mod json;
pub mod placeholder;
pub mod sample;
pub mod sequence;
pub mod session;

use crate::identities::{resolve_recipients, sample_emails};
use crate::model::field::Field;
use crate::model::value::{lookup, Identity, Record};
use crate::schema::compiler::link_target;
use crate::schema::group::schema_default;
use crate::schema::role::{split_link_part, LinkHalf, Role};
use crate::schema::Schema;
use crate::validate::selection;
use placeholder::Placeholder;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;

/// Sample addresses shown for a recipient-like field without a value.
pub fn sample_count(role: Role) -> usize {
    match role {
        Role::RecipientList => 2,
        _ => 1,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PreviewValue {
    Header,
    Text { text: String },
    /// Trusted rich-text markup from the record or the field default.
    RichText { html: String },
    Recipients { addresses: String },
    Tags { tags: Vec<String> },
    Image { url: String, name: String },
    File { url: String, name: String },
    Link { text: String, url: String, target: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewField {
    pub uid: String,
    pub display_name: String,
    pub role: Role,
    /// True when the record supplied nothing and the value is a stand-in.
    pub placeholder: bool,
    pub value: PreviewValue,
}

/// Resolves every visible field of `schema` against `record`.
pub fn resolve_fields(
    schema: &Schema,
    record: Option<&Record>,
    identities: &[Identity],
) -> Vec<PreviewField> {
    let supplied = |uid: &str| record.and_then(|r| lookup(r, uid)).filter(|v| !is_empty(v));
    let mut links_done: HashSet<String> = HashSet::new();
    let mut resolved = Vec::new();

    for classified in schema.visible() {
        let field = &classified.field;
        let role = classified.role;
        let value = supplied(field.uid.as_str());
        let placeholder = value.is_none();

        let preview = match role {
            Role::GroupHeader => PreviewValue::Header,
            Role::LinkPart => {
                let Some((key, _)) = split_link_part(&field.uid) else {
                    continue;
                };
                if !links_done.insert(key.to_string()) {
                    continue;
                }
                resolved.push(resolve_link(schema, key, field, &supplied));
                continue;
            }
            Role::RecipientList | Role::Cc | Role::Bcc => PreviewValue::Recipients {
                addresses: match value {
                    Some(Value::String(raw)) => resolve_recipients(raw, identities),
                    Some(v) => resolve_recipients(&selection(v).join(","), identities),
                    None => sample_emails(identities, sample_count(role)),
                },
            },
            Role::TagList => PreviewValue::Tags {
                tags: value.map(selection).unwrap_or_default(),
            },
            Role::FileUpload => {
                let (url, name) = value
                    .map(asset_parts)
                    .unwrap_or_else(|| (String::new(), Placeholder::for_field(field).text));
                if field.is_image() {
                    PreviewValue::Image { url, name }
                } else {
                    PreviewValue::File { url, name }
                }
            }
            Role::Subject | Role::GenericText | Role::Suppressed => {
                let text = value
                    .map(display_text)
                    .unwrap_or_else(|| Placeholder::for_field(field).text);
                if field.field_metadata.rich_text_type.is_some() && !placeholder {
                    PreviewValue::RichText { html: text }
                } else {
                    PreviewValue::Text { text }
                }
            }
        };

        resolved.push(PreviewField {
            uid: field.uid.clone(),
            display_name: field.display_name.clone(),
            role,
            placeholder,
            value: preview,
        });
    }
    resolved
}

fn resolve_link<'a>(
    schema: &Schema,
    key: &str,
    first: &Field,
    supplied: &impl Fn(&str) -> Option<&'a Value>,
) -> PreviewField {
    let mut text = String::new();
    let mut url = String::new();
    let mut target = "_blank".to_string();
    let mut any_supplied = false;

    for part in schema.fields().iter().filter(|f| f.role == Role::LinkPart) {
        let Some((part_key, half)) = split_link_part(part.uid()) else {
            continue;
        };
        if part_key != key {
            continue;
        }
        let value = match supplied(part.uid()) {
            Some(v) => {
                any_supplied = true;
                display_text(v)
            }
            None => part.field.default_text().unwrap_or_default(),
        };
        match half {
            LinkHalf::Text => text = value,
            LinkHalf::Url => {
                url = value;
                if let Some(configured) = link_target(&part.field) {
                    target = configured;
                }
            }
        }
    }

    for target_uid in [format!("{}_target", key), format!("{}.target", key)] {
        if let Some(Value::String(t)) = supplied(&target_uid) {
            target = t.clone();
        }
    }
    if text.is_empty() {
        text = url.clone();
    }

    PreviewField {
        uid: key.to_string(),
        display_name: first
            .display_name
            .trim_end_matches(" Text")
            .trim_end_matches(" URL")
            .to_string(),
        role: Role::LinkPart,
        placeholder: !any_supplied,
        value: PreviewValue::Link { text, url, target },
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(_) => selection(value).join(", "),
        other => other.to_string(),
    }
}

/// URL and display name of an asset value: a URL, a bare asset id, or an
/// object with `url` and `filename`.
fn asset_parts(value: &Value) -> (String, String) {
    let tail = |url: &str| url.rsplit('/').next().unwrap_or(url).to_string();
    match value {
        Value::String(s) if s.contains("://") || s.starts_with('/') => (s.clone(), tail(s)),
        Value::String(id) => (String::new(), id.clone()),
        Value::Object(object) => {
            let url = object.get("url").and_then(Value::as_str).unwrap_or_default();
            let name = ["filename", "display_name", "title"]
                .iter()
                .find_map(|key| object.get(*key).and_then(Value::as_str))
                .map_or_else(|| tail(url), String::from);
            (url.to_string(), name)
        }
        other => (String::new(), other.to_string()),
    }
}

/// Default value used for a field in sample data when it has no default.
pub(crate) fn default_or(field: &Field, fallback: impl FnOnce() -> String) -> Value {
    match schema_default(field) {
        Value::String(s) if s.is_empty() => Value::String(fallback()),
        Value::Null => Value::String(fallback()),
        value => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identities::FALLBACK_RECIPIENTS;
    use crate::model::field::Field;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    fn identities() -> Vec<Identity> {
        vec![Identity {
            id: "blt0123456789".into(),
            alt_id: None,
            display_name: "Grace Hopper".into(),
            email: "grace@navy.mil".into(),
            subscribed: true,
        }]
    }

    #[test]
    fn empty_directory_and_no_record_falls_back_to_fixed_recipients() {
        let schema = Schema::load(&[Field::text("recipients", "Recipients")]);
        let fields = resolve_fields(&schema, None, &[]);
        assert_eq!(
            fields[0].value,
            PreviewValue::Recipients {
                addresses: FALLBACK_RECIPIENTS.into()
            }
        );
        assert!(fields[0].placeholder);
    }

    #[test]
    fn record_recipients_resolve_through_the_directory() {
        let schema = Schema::load(&[Field::text("recipients", "Recipients")]);
        let record = record(json!({ "recipients": "blt0123456789, bltzzzzzz999999" }));
        let fields = resolve_fields(&schema, Some(&record), &identities());
        assert_eq!(
            fields[0].value,
            PreviewValue::Recipients {
                addresses: "grace@navy.mil, user-999999@example.com".into()
            }
        );
        assert!(!fields[0].placeholder);
    }

    #[test]
    fn addresses_pass_through_untouched() {
        let schema = Schema::load(&[Field::text("recipients", "Recipients")]);
        let record = record(json!({ "recipients": "a@b.com;c@d.com" }));
        let fields = resolve_fields(&schema, Some(&record), &identities());
        assert_eq!(
            fields[0].value,
            PreviewValue::Recipients {
                addresses: "a@b.com;c@d.com".into()
            }
        );

        let record = self::record(json!({ "recipients": ["blt0123456789"] }));
        let fields = resolve_fields(&schema, Some(&record), &identities());
        assert_eq!(
            fields[0].value,
            PreviewValue::Recipients {
                addresses: "grace@navy.mil".into()
            }
        );
    }

    #[test]
    fn link_halves_render_as_one_link() {
        let schema = Schema::load(&[
            Field::text("link_4_text", "Link Text").with_default("Click Here"),
            Field::text("link_4_url", "Link URL"),
        ]);
        let record = record(json!({ "link_4_url": "https://example.org" }));
        let fields = resolve_fields(&schema, Some(&record), &[]);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].display_name, "Link");
        assert_eq!(
            fields[0].value,
            PreviewValue::Link {
                text: "Click Here".into(),
                url: "https://example.org".into(),
                target: "_blank".into()
            }
        );
    }

    #[test]
    fn missing_values_use_placeholders() {
        let schema = Schema::load(&[
            Field::text("text_1", "Intro").described("Opening paragraph"),
            Field::file("image_2", "Banner"),
        ]);
        let fields = resolve_fields(&schema, None, &[]);
        assert_eq!(
            fields[0].value,
            PreviewValue::Text {
                text: "[Opening paragraph]".into()
            }
        );
        assert_eq!(
            fields[1].value,
            PreviewValue::File {
                url: String::new(),
                name: "[Banner]".into()
            }
        );
    }

    #[test]
    fn grouped_record_values_are_found() {
        let schema = Schema::load(&[Field::group(
            "footer",
            "Footer",
            vec![Field::text("note", "Note")],
        )]);
        let record = record(json!({ "footer": { "note": "Bye" } }));
        let fields = resolve_fields(&schema, Some(&record), &[]);
        assert_eq!(fields[0].value, PreviewValue::Header);
        assert_eq!(fields[1].value, PreviewValue::Text { text: "Bye".into() });
    }
}
