//! Update function for the template builder.
//!
//! Every `Msg` goes through a `Template` method, so a rejected change (second
//! cc block, unknown block id, ...) leaves the block list exactly as it was
//! and only sets `message`.

use super::messages::Msg;
use super::state::BuilderState;
use crate::error::TemplateError;
use crate::schema::compiler::compile;
use log::{debug, info};

/// Applies `msg` and returns whether the view should re-render.
pub fn update(state: &mut BuilderState, msg: Msg) -> bool {
    match msg {
        Msg::AddBlock { block_type, at } => {
            let result = state
                .template
                .insert_block(block_type, at)
                .map(|block| block.id.clone());
            match result {
                Ok(id) => {
                    debug!("added {} block `{}`", block_type.as_str(), id);
                    state.selected_block = Some(id);
                    changed(state)
                }
                Err(err) => rejected(state, err),
            }
        }
        Msg::RemoveBlock(id) => match state.template.remove_block(&id) {
            Ok(_) => {
                if state.selected_block.as_deref() == Some(id.as_str()) {
                    state.selected_block = None;
                }
                changed(state)
            }
            Err(err) => rejected(state, err),
        },
        Msg::MoveBlock { id, direction } => match state.template.move_block(&id, direction) {
            Ok(true) => changed(state),
            Ok(false) => false,
            Err(err) => rejected(state, err),
        },
        Msg::ConfigureBlock { id, config } => match state.template.configure_block(&id, config) {
            Ok(()) => changed(state),
            Err(err) => rejected(state, err),
        },
        Msg::SelectBlock(id) => {
            state.selected_block = id.filter(|id| state.template.block(id).is_some());
            true
        }
        Msg::Rename(name) => {
            state.template.name = name;
            changed(state)
        }
        Msg::Compile => match compile(&state.template) {
            Ok(content_type) => {
                info!(
                    "compiled `{}` into {} fields",
                    content_type.uid,
                    content_type.schema.len()
                );
                state.message = None;
                state.compiled = Some(content_type);
                true
            }
            Err(err) => {
                state.compiled = None;
                rejected(state, err)
            }
        },
        Msg::SaveSucceeded => {
            state.mark_saved();
            state.message = None;
            true
        }
        Msg::SaveFailed(reason) => {
            state.message = Some(reason);
            true
        }
        Msg::SetTemplate(template) => {
            *state = BuilderState::with_template(template);
            state.mark_saved();
            true
        }
        Msg::DismissMessage => state.message.take().is_some(),
    }
}

fn changed(state: &mut BuilderState) -> bool {
    state.message = None;
    state.compiled = None;
    state.refresh_lints();
    true
}

fn rejected(state: &mut BuilderState, err: TemplateError) -> bool {
    debug!("builder change rejected: {}", err);
    state.message = Some(err.to_string());
    true
}
