use crate::services::responses::store_error;
use crate::store::SqliteStore;
use actix_web::{web, HttpResponse, Responder};
use common::model::value::Identity;

pub(crate) async fn process(
    store: web::Data<SqliteStore>,
    payload: web::Json<Identity>,
) -> impl Responder {
    let identity = payload.into_inner();
    if identity.id.trim().is_empty() {
        return HttpResponse::UnprocessableEntity().body("Identity id must not be empty");
    }
    match store.add_identity(&identity) {
        Ok(()) => HttpResponse::Created().json(identity),
        Err(err) => store_error(err),
    }
}
