use crate::services::responses::fetch_error;
use crate::store::SqliteStore;
use actix_web::{web, HttpResponse, Responder};
use common::form::build_payload;
use common::ports::{ContentTypeStore, RecordStore};
use common::requests::{CreateRecordRequest, SubmissionRejected};
use common::schema::Schema;
use common::validate::FieldErrors;
use log::{info, warn};

pub(crate) async fn process(
    type_id: web::Path<String>,
    store: web::Data<SqliteStore>,
    payload: web::Json<CreateRecordRequest>,
) -> impl Responder {
    let content_type = match store.fetch_schema(&type_id) {
        Ok(content_type) => content_type,
        Err(err) => return fetch_error(err),
    };
    let schema = Schema::load(&content_type.schema);
    let values = payload.into_inner().values;

    let record = match build_payload(&schema, &values) {
        Ok(record) => record,
        Err(errors) => {
            info!("record for `{}` rejected: {} field errors", type_id, errors.len());
            return HttpResponse::UnprocessableEntity().json(SubmissionRejected {
                message: None,
                errors,
                values,
            });
        }
    };

    match store.create_record(&type_id, &record) {
        Ok(created) => HttpResponse::Created().json(created),
        Err(err) => {
            warn!("record store rejected `{}`: {}", type_id, err);
            HttpResponse::BadGateway().json(SubmissionRejected {
                message: Some(err.to_string()),
                errors: FieldErrors::new(),
                values,
            })
        }
    }
}
