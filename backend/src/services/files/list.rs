use crate::services::responses::fetch_error;
use crate::store::SqliteStore;
use actix_web::{web, HttpResponse, Responder};
use common::ports::FileDirectory;
use common::requests::FilesQuery;

pub(crate) async fn process(
    query: web::Query<FilesQuery>,
    store: web::Data<SqliteStore>,
) -> impl Responder {
    match store.list_files(&query.query) {
        Ok(files) => HttpResponse::Ok().json(files),
        Err(err) => fetch_error(err),
    }
}
