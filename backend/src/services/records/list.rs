use crate::config::Config;
use crate::services::responses::fetch_error;
use crate::store::SqliteStore;
use actix_web::{web, HttpResponse, Responder};
use common::model::value::Record;
use common::ports::RecordStore;
use common::preview::session::Pagination;
use common::requests::PageQuery;
use serde::Serialize;

#[derive(Serialize)]
struct RecordListing {
    records: Vec<Record>,
    pagination: Pagination,
}

pub(crate) async fn process(
    type_id: web::Path<String>,
    query: web::Query<PageQuery>,
    config: web::Data<Config>,
    store: web::Data<SqliteStore>,
) -> impl Responder {
    let page = query.page.unwrap_or(1).max(1);
    let page_size = query.page_size.unwrap_or(config.page_size).max(1);

    match store.list_records(&type_id, page, page_size) {
        Ok(listed) => HttpResponse::Ok().json(RecordListing {
            pagination: Pagination::new(page, page_size, listed.total_count),
            records: listed.records,
        }),
        Err(err) => fetch_error(err),
    }
}
