//! Status codes for the common error taxonomy: 409 for a singleton
//! conflict, 422 for field errors and a missing name, 404 for anything not
//! found, 502 when the store fails a fetch or rejects a submission, 503 when
//! storage itself is broken or the mail service is not configured.

use crate::store::StoreError;
use actix_web::HttpResponse;
use common::error::{FetchError, SubmitError, TemplateError};
use log::error;
use serde::Serialize;

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

fn body(message: impl ToString) -> ErrorBody {
    ErrorBody {
        message: message.to_string(),
    }
}

pub(crate) fn template_error(err: TemplateError) -> HttpResponse {
    match err {
        TemplateError::SchemaConflict { .. } => HttpResponse::Conflict().json(body(err)),
        TemplateError::BlockNotFound(_) => HttpResponse::NotFound().json(body(err)),
        TemplateError::NameRequired
        | TemplateError::ConfigMismatch { .. }
        | TemplateError::DuplicateBlockId(_) => {
            HttpResponse::UnprocessableEntity().json(body(err))
        }
    }
}

pub(crate) fn fetch_error(err: FetchError) -> HttpResponse {
    match err {
        FetchError::NotFound(_) => HttpResponse::NotFound().json(body(err)),
        FetchError::Failed(_) => {
            error!("{}", err);
            HttpResponse::BadGateway().json(body(err))
        }
    }
}

pub(crate) fn submit_error(err: SubmitError) -> HttpResponse {
    error!("{}", err);
    HttpResponse::BadGateway().json(body(err))
}

pub(crate) fn store_error(err: StoreError) -> HttpResponse {
    error!("{}", err);
    HttpResponse::ServiceUnavailable().json(body(err))
}

pub(crate) fn unavailable(message: &str) -> HttpResponse {
    HttpResponse::ServiceUnavailable().json(body(message))
}

pub(crate) fn bad_gateway(message: impl ToString) -> HttpResponse {
    HttpResponse::BadGateway().json(body(message))
}
