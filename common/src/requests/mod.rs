//! Request and response payloads of the HTTP surface.

use crate::model::value::FieldValue;
use crate::preview::sequence::RenderToken;
use crate::validate::FieldErrors;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRecordRequest {
    pub values: Vec<FieldValue>,
}

/// Why a record was not created. The submitted values are echoed back so
/// the client can keep them for a retry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionRejected {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "FieldErrors::is_empty")]
    pub errors: FieldErrors,
    pub values: Vec<FieldValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewRequest {
    pub type_id: String,
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default)]
    pub page_size: Option<u32>,
    #[serde(default)]
    pub selected_index: Option<usize>,
    #[serde(default)]
    pub token: RenderToken,
}

fn first_page() -> u32 {
    1
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterQuery {
    pub filter: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilesQuery {
    #[serde(default)]
    pub query: String,
}

/// One send through the mail-dispatch service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailRequest {
    pub content_type_id: String,
    pub record_id: String,
    #[serde(default = "default_locale")]
    pub locale: String,
}

fn default_locale() -> String {
    "en-us".to_string()
}

/// What the mail-dispatch service answers; delivery is not confirmed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MailAcknowledgment {
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStarted {
    pub job_id: String,
}
