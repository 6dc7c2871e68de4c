//! HTTP surface of the notification service.
//!
//! Each sub-module owns one `/api/...` scope and exposes `configure_routes`.
//! Handlers turn results into responses with an explicit `match`; the status
//! mapping shared by all of them lives in [`responses`].

pub mod files;
pub mod identities;
pub mod jobs;
pub mod mail;
pub mod preview;
pub mod records;
mod responses;
pub mod templates;

use actix_web::web;

/// Registers every service scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(templates::configure_routes())
        .service(records::configure_routes())
        .service(jobs::configure_routes())
        .service(preview::configure_routes())
        .service(identities::configure_routes())
        .service(files::configure_routes())
        .service(mail::configure_routes());
}
