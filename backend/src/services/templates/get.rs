use crate::services::responses::fetch_error;
use crate::store::SqliteStore;
use actix_web::{web, HttpResponse, Responder};
use common::ports::ContentTypeStore;

pub(crate) async fn process(
    type_id: web::Path<String>,
    store: web::Data<SqliteStore>,
) -> impl Responder {
    match store.fetch_schema(&type_id) {
        Ok(content_type) => HttpResponse::Ok().json(content_type),
        Err(err) => fetch_error(err),
    }
}
