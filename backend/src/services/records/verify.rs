//! Background verification of stored records.
//!
//! Records are checked in chunks; each chunk is scanned in parallel and the
//! first invalid record (in storage order) ends the job with `Failed`.
//! Progress is reported after every chunk.

use crate::job_controller::state::{JobUpdate, JobsState};
use crate::services::responses::store_error;
use crate::store::{SqliteStore, StoreError, RECORD_UID_KEY};
use actix_web::{web, HttpResponse, Responder};
use common::jobs::JobStatus;
use common::model::value::Record;
use common::requests::JobStarted;
use common::schema::Schema;
use common::validate::validate_record;
use log::{error, info};
use rayon::prelude::*;
use std::time::Instant;
use tokio::sync::mpsc;

const CHUNK_SIZE: usize = 1_000;

#[derive(Debug, PartialEq, Eq)]
struct InvalidRecord {
    /// 1-based position in storage order.
    position: usize,
    uid: String,
    field: String,
    message: String,
}

fn first_invalid(schema: &Schema, chunk: &[(usize, Record)]) -> Option<InvalidRecord> {
    chunk.par_iter().find_map_first(|(idx, record)| {
        let errors = validate_record(schema, record);
        let (field, err) = errors.into_iter().next()?;
        Some(InvalidRecord {
            position: idx + 1,
            uid: record
                .get(RECORD_UID_KEY)
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
            field,
            message: err.message().to_string(),
        })
    })
}

/// Runs the whole check. The returned status is the job's final state.
fn verify_records_blocking(
    tx: &mpsc::Sender<JobUpdate>,
    job_id: &str,
    store: &SqliteStore,
    type_id: &str,
) -> Result<JobStatus, StoreError> {
    let start = Instant::now();
    let Some(content_type) = store.content_type(type_id)? else {
        return Ok(JobStatus::Failed(format!("Content type `{}` not found", type_id)));
    };
    let schema = Schema::load(&content_type.schema);
    let records: Vec<(usize, Record)> = store.all_records(type_id)?.into_iter().enumerate().collect();

    let mut checked = 0usize;
    for chunk in records.chunks(CHUNK_SIZE) {
        if let Some(invalid) = first_invalid(&schema, chunk) {
            info!("verification of `{}` failed in {:.2?}", type_id, start.elapsed());
            return Ok(JobStatus::Failed(format!(
                "First invalid record at: row {} ({}), field '{}': {}",
                invalid.position, invalid.uid, invalid.field, invalid.message
            )));
        }
        checked += chunk.len();
        let _ = tx.blocking_send(JobUpdate {
            job_id: job_id.to_string(),
            status: JobStatus::InProgress(checked as u32),
        });
    }

    info!(
        "verified {} records of `{}` in {:.2?}",
        checked,
        type_id,
        start.elapsed()
    );
    Ok(JobStatus::Completed(format!("{} records verified", checked)))
}

pub(crate) async fn process(
    type_id: web::Path<String>,
    jobs_state: web::Data<JobsState>,
    store: web::Data<SqliteStore>,
) -> impl Responder {
    // fail fast on a broken store instead of handing out a doomed job id
    if let Err(err) = store.content_type(&type_id) {
        return store_error(err);
    }
    let job_id = schedule_verify_job(jobs_state, store, type_id.into_inner()).await;
    HttpResponse::Accepted().json(JobStarted { job_id })
}

async fn schedule_verify_job(
    jobs_state: web::Data<JobsState>,
    store: web::Data<SqliteStore>,
    type_id: String,
) -> String {
    let job_id = jobs_state.register().await;
    let value = job_id.clone();

    tokio::spawn(async move {
        let tx = jobs_state.tx.clone();
        let job_for_blocking = value.clone();
        let handle = tokio::task::spawn_blocking(move || {
            verify_records_blocking(&tx, &job_for_blocking, &store, &type_id)
        });

        let status = match handle.await {
            Ok(Ok(status)) => status,
            Ok(Err(err)) => {
                error!("verification job {} failed: {}", value, err);
                JobStatus::Failed(err.to_string())
            }
            Err(join_err) => JobStatus::Failed(format!("join error: {}", join_err)),
        };
        jobs_state.jobs.write().await.insert(value, status);
    });

    job_id
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::model::field::Field;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn record(subject: Value) -> Record {
        let Value::Object(map) = json!({ "uid": "r", "subject": subject }) else {
            unreachable!()
        };
        map
    }

    #[test]
    fn reports_the_earliest_invalid_record() {
        let schema = Schema::load(&[Field::text("subject", "Subject").required(true)]);
        let chunk: Vec<(usize, Record)> = [json!("ok"), json!(""), json!("ok"), Value::Null]
            .into_iter()
            .map(record)
            .enumerate()
            .collect();

        assert_eq!(
            first_invalid(&schema, &chunk),
            Some(InvalidRecord {
                position: 2,
                uid: "r".into(),
                field: "subject".into(),
                message: "Subject is required".into(),
            })
        );
        assert_eq!(first_invalid(&schema, &chunk[..1]), None);
    }
}
