//! `GET /api/files?query=`: assets whose display name contains the query.

mod list;

use actix_web::web::{get, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/files";

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("", get().to(list::process))
}
