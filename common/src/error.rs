//! Error taxonomy shared by the core and its collaborators.
//!
//! Field-level errors (`FieldError`) never escape as failures of an operation:
//! the validator returns them in a map keyed by field identifier so callers can
//! show them inline. The remaining enums are proper `Result` errors.

use crate::model::template::BlockType;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while editing or compiling a template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// A second block of a singleton type (cc, bcc, link) was requested.
    #[error(
        "{} section already exists. Only one {} section is allowed per template.",
        .block_type.upper_name(),
        .block_type.upper_name()
    )]
    SchemaConflict { block_type: BlockType },

    /// A configuration of a different block type was applied to a block.
    #[error("Block `{block_id}` expects a {} configuration", .expected.as_str())]
    ConfigMismatch {
        block_id: String,
        expected: BlockType,
    },

    #[error("Please enter a template name")]
    NameRequired,

    #[error("Block `{0}` not found")]
    BlockNotFound(String),

    /// Two blocks share an id, so their fields would share identifiers.
    #[error("Block id `{0}` is used more than once")]
    DuplicateBlockId(String),
}

/// A single failing rule for one field.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldError {
    #[error("{message}")]
    MissingRequired { message: String },

    /// `invalid` lists every offending token, in input order.
    #[error("{message}")]
    FormatInvalid {
        message: String,
        invalid: Vec<String>,
    },
}

impl FieldError {
    pub fn missing(display_name: &str) -> Self {
        FieldError::MissingRequired {
            message: format!("{} is required", display_name),
        }
    }

    pub fn invalid_emails(invalid: Vec<String>) -> Self {
        FieldError::FormatInvalid {
            message: format!("Invalid email address(es): {}", invalid.join(", ")),
            invalid,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            FieldError::MissingRequired { message } | FieldError::FormatInvalid { message, .. } => {
                message
            }
        }
    }
}

/// A schema, record, identity or file directory could not be reached.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum FetchError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Fetch failed: {0}")]
    Failed(String),
}

/// The external record store rejected a submission.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum SubmitError {
    #[error("Submission failed: {0}")]
    Rejected(String),
}
