//! Template compilation and schema retrieval.
//!
//! - `POST /api/templates/compile`: compiles a block template into a content
//!   type and publishes it to the store. Answers 409 when the template holds
//!   two blocks of a singleton type and 422 when it has no usable name.
//! - `GET /api/templates/{type_id}`: the published content type.

mod compile;
mod get;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/templates";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/compile", post().to(compile::process))
        .route("/{type_id}", get().to(get::process))
}
