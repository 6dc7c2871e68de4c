use crate::services::responses::{submit_error, template_error};
use crate::store::SqliteStore;
use actix_web::{web, HttpResponse, Responder};
use common::model::template::Template;
use common::ports::ContentTypeStore;
use common::schema::compiler::compile;
use log::info;

pub(crate) async fn process(
    store: web::Data<SqliteStore>,
    payload: web::Json<Template>,
) -> impl Responder {
    let content_type = match compile(&payload) {
        Ok(content_type) => content_type,
        Err(err) => return template_error(err),
    };

    match store.publish_schema(&content_type) {
        Ok(()) => {
            info!("template `{}` compiled and published", payload.name);
            HttpResponse::Ok().json(content_type)
        }
        Err(err) => submit_error(err),
    }
}
