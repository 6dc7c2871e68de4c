use crate::services::responses::fetch_error;
use crate::store::SqliteStore;
use actix_web::{web, HttpResponse, Responder};
use common::ports::IdentityDirectory;
use common::requests::FilterQuery;

pub(crate) async fn process(
    query: web::Query<FilterQuery>,
    store: web::Data<SqliteStore>,
) -> impl Responder {
    match store.list_identities(query.filter.as_deref()) {
        Ok(identities) => HttpResponse::Ok().json(identities),
        Err(err) => fetch_error(err),
    }
}
