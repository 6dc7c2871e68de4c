use crate::mail::{MailClient, MailError};
use crate::services::responses::{bad_gateway, unavailable};
use actix_web::{web, HttpResponse, Responder};
use common::requests::{MailAcknowledgment, MailRequest};

const NOT_CONFIGURED: &str = "Mail service is not configured";

pub(crate) async fn single(
    client: web::Data<Option<MailClient>>,
    payload: web::Json<MailRequest>,
) -> impl Responder {
    let Some(client) = client.get_ref().as_ref() else {
        return unavailable(NOT_CONFIGURED);
    };
    respond(client.send(&payload).await)
}

pub(crate) async fn bulk(
    client: web::Data<Option<MailClient>>,
    payload: web::Json<Vec<MailRequest>>,
) -> impl Responder {
    let Some(client) = client.get_ref().as_ref() else {
        return unavailable(NOT_CONFIGURED);
    };
    if payload.is_empty() {
        return HttpResponse::UnprocessableEntity().body("Nothing to send");
    }
    respond(client.send_bulk(&payload).await)
}

fn respond(result: Result<MailAcknowledgment, MailError>) -> HttpResponse {
    match result {
        Ok(ack) => HttpResponse::Ok().json(ack),
        Err(err) => bad_gateway(err),
    }
}
