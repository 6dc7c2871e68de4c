//! Dynamic form generation.
//!
//! The form is an Elm-style component without a UI toolkit: [`state`] holds
//! one control per input field, [`messages`] lists what can happen to it,
//! [`update`] applies a message, and [`view`] renders the current state to
//! HTML. Submitting validates every value, then nests the flat values into
//! the schema-complete payload the record store expects.

pub mod messages;
pub mod state;
pub mod update;
pub mod view;

use crate::html::normalize_rich_text;
use crate::model::value::FieldValue;
use crate::ports::RecordStore;
use crate::schema::role::Role;
use crate::schema::Schema;
use crate::validate::{validate, FieldErrors};
use log::info;
use messages::Msg;
use serde_json::{Map, Value};
use state::FormState;

/// Validates `values` and builds the nested submission payload.
///
/// Rich text is normalized and file fields submit their asset id. Fields the
/// values do not mention take their schema defaults.
pub fn build_payload(schema: &Schema, values: &[FieldValue]) -> Result<Map<String, Value>, FieldErrors> {
    let errors = validate(schema, values);
    if !errors.is_empty() {
        return Err(errors);
    }

    let flat: Map<String, Value> = values
        .iter()
        .filter_map(|value| {
            let field = schema.field(&value.field_uid)?;
            if field.role.is_structural() {
                return None;
            }
            let submitted = match (&field.role, &value.value) {
                (Role::GenericText, Value::String(html))
                    if field.field.field_metadata.rich_text_type.is_some() =>
                {
                    Value::String(normalize_rich_text(html))
                }
                _ => value.submission_value(),
            };
            Some((value.field_uid.clone(), submitted))
        })
        .collect();

    Ok(schema.nest(&flat))
}

/// Runs a full submit: validation, nesting, then one `create_record` call.
///
/// Returns `true` when the record store accepted the payload. On rejection
/// the form keeps its values and the pending payload.
pub fn submit(state: &mut FormState, store: &impl RecordStore) -> bool {
    update::update(state, Msg::Submit);
    let Some(payload) = state.pending.clone() else {
        return false;
    };
    match store.create_record(&state.type_id, &payload) {
        Ok(record) => {
            info!("created record `{}` of `{}`", record.uid, record.content_type_uid);
            update::update(state, Msg::SubmitSucceeded(record));
            true
        }
        Err(err) => {
            log::warn!("record store rejected a `{}` submission: {}", state.type_id, err);
            update::update(state, Msg::SubmitFailed(err));
            false
        }
    }
}
