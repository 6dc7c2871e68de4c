use crate::config::Config;
use crate::services::responses::fetch_error;
use crate::store::SqliteStore;
use actix_web::{web, HttpResponse, Responder};
use common::ports::{ContentTypeStore, IdentityDirectory, RecordStore};
use common::preview::session::{PreviewSession, RenderRequest};
use common::requests::PreviewRequest;
use log::debug;

pub(crate) async fn process(
    config: web::Data<Config>,
    store: web::Data<SqliteStore>,
    payload: web::Json<PreviewRequest>,
) -> impl Responder {
    let request = payload.into_inner();
    let content_type = match store.fetch_schema(&request.type_id) {
        Ok(content_type) => content_type,
        Err(err) => return fetch_error(err),
    };
    let page = request.page.max(1);
    let page_size = request.page_size.unwrap_or(config.page_size).max(1);

    let mut session = PreviewSession::new(content_type, page_size);
    session.load_identities(store.list_identities(None));
    match store.list_records(&request.type_id, page, page_size) {
        Ok(records) => session.load_page(records, page),
        Err(err) => return fetch_error(err),
    }
    if let Some(index) = request.selected_index {
        if index < session.records.len() {
            session.select(index);
        } else {
            debug!("preview index {} out of range, keeping the first record", index);
        }
    }

    let render = RenderRequest {
        token: request.token,
        ..session.request_render()
    };
    HttpResponse::Ok().json(session.render(&render))
}
