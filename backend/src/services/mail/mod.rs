//! Forwarding to the external mail-dispatch service.
//!
//! - `POST /api/mail/send`: one `MailRequest`.
//! - `POST /api/mail/send-bulk`: an array of them.
//!
//! Both answer the service's acknowledgment, 502 when it fails and 503 when
//! no service is configured.

mod send;

use actix_web::web::{post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/mail";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/send", post().to(send::single))
        .route("/send-bulk", post().to(send::bulk))
}
