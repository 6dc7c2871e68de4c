//! The identity directory recipients are picked from.
//!
//! - `GET /api/identities?filter=`: identities whose name or email contains
//!   the filter (all when absent).
//! - `POST /api/identities`: adds or replaces one identity.

mod add;
mod list;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/identities";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("", post().to(add::process))
}
