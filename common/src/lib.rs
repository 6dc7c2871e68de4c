//! Core of the notification template system: the block model and its
//! compilation into a field schema, role classification, group mapping,
//! validation, form generation and preview rendering.
//!
//! Everything here is synchronous and free of I/O. Schemas, records,
//! identities and files come in through the traits in [`ports`].

pub mod builder;
pub mod error;
pub mod form;
pub mod html;
pub mod identities;
pub mod jobs;
pub mod model;
pub mod ports;
pub mod preview;
pub mod requests;
pub mod schema;
pub mod validate;
