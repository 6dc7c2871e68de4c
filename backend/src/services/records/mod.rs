//! Records of a published content type.
//!
//! - `GET /api/records/{type_id}?page=&page_size=`: one page of records plus
//!   pagination.
//! - `POST /api/records/{type_id}`: validates submitted form values against
//!   the schema, nests group members and stores the record. Rejections echo
//!   the submitted values so the client can retry without re-entering them.
//! - `POST /api/records/{type_id}/verify`: starts a background job checking
//!   every stored record against the current schema; poll it through
//!   `/api/jobs/{job_id}`.

mod create;
mod list;
mod verify;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/records";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/{type_id}", get().to(list::process))
        .route("/{type_id}", post().to(create::process))
        .route("/{type_id}/verify", post().to(verify::process))
}
