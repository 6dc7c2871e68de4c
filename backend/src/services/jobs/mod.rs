//! Polling of background jobs: `GET /api/jobs/{job_id}` answers the current
//! `JobStatus`, or 404 for an unknown id.

mod get_status;

use actix_web::web::{get, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/jobs";

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("/{job_id}", get().to(get_status::process))
}
