//! Template builder session, Elm-style: [`state::BuilderState`] is changed
//! only by [`update::update`] applying a [`messages::Msg`].

pub mod messages;
pub mod state;
pub mod update;
