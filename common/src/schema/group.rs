//! Group fields ↔ dot-qualified flat fields.
//!
//! A [`GroupMapping`] is built once from a top-level schema and drives both
//! directions: [`GroupMapping::flatten`] lists the flat fields a form or a
//! preview works with, and [`GroupMapping::nest`] turns the flat values back
//! into the structured payload the record store expects. Because both are
//! driven by the same entries, `nest(flat values of flatten())` restores the
//! group shape, and every declared field is present in the output.

use crate::model::field::{DataType, Field};
use crate::schema::role::is_link_target;
use serde_json::{Map, Value};

/// Suffix of the synthetic header emitted before a group's members.
pub const GROUP_HEADER_SUFFIX: &str = "_group_header";

#[derive(Debug, Clone, PartialEq)]
enum Entry {
    Plain(Field),
    Group { group: Field, members: Vec<Field> },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupMapping {
    entries: Vec<Entry>,
}

impl GroupMapping {
    pub fn new(schema: &[Field]) -> Self {
        let entries = schema
            .iter()
            .map(|field| match field.members() {
                [] => Entry::Plain(field.clone()),
                members => Entry::Group {
                    group: field.clone(),
                    members: members.to_vec(),
                },
            })
            .collect();
        Self { entries }
    }

    /// The flat field list: plain fields pass through, each non-empty group
    /// becomes a header followed by its renamed members.
    pub fn flatten(&self) -> Vec<Field> {
        let mut flat = Vec::new();
        for entry in &self.entries {
            match entry {
                Entry::Plain(field) => flat.push(field.clone()),
                Entry::Group { group, members } => {
                    flat.push(header_for(group));
                    flat.extend(members.iter().map(|member| flat_member(group, member)));
                }
            }
        }
        flat
    }

    /// Rebuilds the structured payload from flat values.
    ///
    /// Keys with a `.` are split on the first dot and collected under their
    /// group. Declared fields missing from `flat` take their schema default;
    /// keys the schema does not declare are kept as they are.
    pub fn nest(&self, flat: &Map<String, Value>) -> Map<String, Value> {
        let mut nested = Map::new();

        for entry in &self.entries {
            match entry {
                Entry::Plain(field) => {
                    let value = flat
                        .get(&field.uid)
                        .cloned()
                        .unwrap_or_else(|| schema_default(field));
                    nested.insert(field.uid.clone(), value);
                }
                Entry::Group { group, members } => {
                    let object = members
                        .iter()
                        .map(|member| {
                            let key = flat_key(&group.uid, &member.uid);
                            let value = flat
                                .get(&key)
                                .cloned()
                                .unwrap_or_else(|| schema_default(member));
                            (member.uid.clone(), value)
                        })
                        .collect();
                    nested.insert(group.uid.clone(), Value::Object(object));
                }
            }
        }

        for (key, value) in flat {
            if self.is_header(key) {
                continue;
            }
            match key.split_once('.') {
                Some((group_id, sub_id)) => match nested.get_mut(group_id) {
                    Some(Value::Object(object)) => {
                        object
                            .entry(sub_id.to_string())
                            .or_insert_with(|| value.clone());
                    }
                    // A scalar already owns the prefix; keep the flat key.
                    Some(_) => {
                        nested.insert(key.clone(), value.clone());
                    }
                    None => {
                        let mut object = Map::new();
                        object.insert(sub_id.to_string(), value.clone());
                        nested.insert(group_id.to_string(), Value::Object(object));
                    }
                },
                None => {
                    nested.entry(key.clone()).or_insert_with(|| value.clone());
                }
            }
        }

        nested
    }

    fn is_header(&self, key: &str) -> bool {
        self.entries.iter().any(|entry| match entry {
            Entry::Group { group, .. } => key == header_uid(&group.uid),
            Entry::Plain(_) => false,
        })
    }
}

/// The value a field takes when nothing was entered for it.
///
/// Link targets open in a new window unless told otherwise; every other field
/// uses its declared default, falling back to an empty value of its type.
pub fn schema_default(field: &Field) -> Value {
    if is_link_target(&field.uid) {
        return Value::String("_blank".to_string());
    }
    if let Some(default) = &field.field_metadata.default_value {
        return default.clone();
    }
    match field.data_type {
        DataType::Text => Value::String(String::new()),
        DataType::Group => Value::Object(
            field
                .members()
                .iter()
                .map(|member| (member.uid.clone(), schema_default(member)))
                .collect(),
        ),
        DataType::File | DataType::GroupHeader | DataType::Other(_) => Value::Null,
    }
}

pub fn header_uid(group_uid: &str) -> String {
    format!("{}{}", group_uid, GROUP_HEADER_SUFFIX)
}

fn flat_key(group_uid: &str, member_uid: &str) -> String {
    format!("{}.{}", group_uid, member_uid)
}

fn header_for(group: &Field) -> Field {
    let mut header = Field::new(
        header_uid(&group.uid),
        group.display_name.clone(),
        DataType::GroupHeader,
    );
    header.field_metadata.description = group.field_metadata.description.clone();
    header
}

fn flat_member(group: &Field, member: &Field) -> Field {
    let mut flat = member.clone();
    flat.uid = flat_key(&group.uid, &member.uid);
    flat.display_name = format!("{} - {}", group.display_name, member.display_name);
    flat
}
