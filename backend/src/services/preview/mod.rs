//! `POST /api/preview`: renders one record of a content type as HTML and
//! JSON. The request's render token is echoed back so the client can drop
//! documents that arrive after a newer request.

mod render;

use actix_web::web::{post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/preview";

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("", post().to(render::process))
}
