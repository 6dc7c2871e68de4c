//! Update function for the generated form.
//!
//! Elm-style: `update` applies one [`Msg`] to the [`FormState`] and returns
//! whether the view should re-render. Messages naming an unknown field, or a
//! field whose control does not take that message, are ignored.

use super::messages::Msg;
use super::state::{Control, FormState};
use super::build_payload;
use log::debug;

pub fn update(state: &mut FormState, msg: Msg) -> bool {
    match msg {
        Msg::SetText { uid, value } => {
            let changed = match state.control_mut(&uid) {
                Some(
                    Control::SingleLine { value: current }
                    | Control::MultiLine { value: current }
                    | Control::PlainText { value: current }
                    | Control::RichText { html: current, .. },
                ) => {
                    *current = value;
                    true
                }
                _ => false,
            };
            if changed {
                state.errors.remove(&uid);
            }
            changed
        }
        Msg::SearchRecipients { uid, query } => match state.control_mut(&uid) {
            Some(Control::RecipientPicker { query: current, .. }) => {
                *current = query;
                true
            }
            _ => false,
        },
        Msg::AddRecipient { uid, identity_id } => {
            let changed = match state.control_mut(&uid) {
                Some(Control::RecipientPicker { selected, query }) => {
                    query.clear();
                    if !selected.contains(&identity_id) {
                        selected.push(identity_id);
                    }
                    true
                }
                _ => false,
            };
            if changed {
                state.errors.remove(&uid);
            }
            changed
        }
        Msg::RemoveRecipient { uid, identity_id } => match state.control_mut(&uid) {
            Some(Control::RecipientPicker { selected, .. }) => {
                selected.retain(|id| *id != identity_id);
                true
            }
            _ => false,
        },
        Msg::SetTagDraft { uid, draft } => match state.control_mut(&uid) {
            Some(Control::TagInput { draft: current, .. }) => {
                *current = draft;
                true
            }
            _ => false,
        },
        Msg::CommitTag { uid } => {
            let changed = match state.control_mut(&uid) {
                Some(Control::TagInput { tags, draft }) => {
                    let tag = draft.trim().to_string();
                    let lowered = tag.to_lowercase();
                    let duplicate = tags.iter().any(|t| t.to_lowercase() == lowered);
                    if !tag.is_empty() && !duplicate {
                        tags.push(tag);
                    }
                    draft.clear();
                    true
                }
                _ => false,
            };
            if changed {
                state.errors.remove(&uid);
            }
            changed
        }
        Msg::RemoveTag { uid, tag } => match state.control_mut(&uid) {
            Some(Control::TagInput { tags, .. }) => {
                tags.retain(|t| *t != tag);
                true
            }
            _ => false,
        },
        Msg::OpenFilePicker { uid } => set_picker_open(state, &uid, true),
        Msg::CloseFilePicker { uid } => set_picker_open(state, &uid, false),
        Msg::SelectFile { uid, file_id } => {
            let Some(file) = state.file(&file_id).cloned() else {
                debug!("file `{}` is not in the directory", file_id);
                return false;
            };
            let changed = match state.control_mut(&uid) {
                Some(Control::FilePicker {
                    selected,
                    filter,
                    picker_open,
                }) if filter.accepts(&file) => {
                    *selected = Some(file);
                    *picker_open = false;
                    true
                }
                Some(Control::FilePicker { .. }) => {
                    debug!("file `{}` rejected by the filter of `{}`", file_id, uid);
                    false
                }
                _ => false,
            };
            if changed {
                state.errors.remove(&uid);
            }
            changed
        }
        Msg::RemoveFile { uid } => match state.control_mut(&uid) {
            Some(Control::FilePicker { selected, .. }) => selected.take().is_some(),
            _ => false,
        },
        Msg::IdentitiesLoaded(result) => {
            state.identities = FormState::loaded(result, "identities");
            true
        }
        Msg::FilesLoaded(result) => {
            state.files = FormState::loaded(result, "files");
            true
        }
        Msg::Submit => {
            state.submit_error = None;
            match build_payload(&state.schema, &state.values()) {
                Ok(payload) => {
                    state.errors.clear();
                    state.pending = Some(payload);
                }
                Err(errors) => {
                    debug!("submission blocked by {} field error(s)", errors.len());
                    state.errors = errors;
                    state.pending = None;
                }
            }
            true
        }
        Msg::SubmitSucceeded(record) => {
            state.pending = None;
            state.submit_error = None;
            state.submitted = Some(record);
            true
        }
        Msg::SubmitFailed(err) => {
            // The payload and every control keep their values for a retry.
            state.submit_error = Some(err.to_string());
            true
        }
    }
}

fn set_picker_open(state: &mut FormState, uid: &str, open: bool) -> bool {
    match state.control_mut(uid) {
        Some(Control::FilePicker { picker_open, .. }) => {
            *picker_open = open;
            true
        }
        _ => false,
    }
}
