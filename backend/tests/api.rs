use actix_web::{test, web, App};
use backend::config::Config;
use backend::job_controller::state::JobsState;
use backend::store::SqliteStore;
use backend::AppState;
use common::jobs::JobStatus;
use common::model::field::ContentType;
use common::model::template::{BlockType, Template};
use common::model::value::{FieldValue, Identity, RecordRef};
use common::ports::RecordStore;
use common::requests::{CreateRecordRequest, JobStarted, SubmissionRejected};
use pretty_assertions::assert_eq;
use serde_json::{json, Map, Value};
use std::time::Duration;
use tempfile::TempDir;

struct Harness {
    state: AppState,
    _dir: TempDir,
}

fn harness() -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::open(dir.path().join("notify.sqlite")).unwrap();
    let (jobs, _rx) = JobsState::new();
    Harness {
        state: AppState {
            config: web::Data::new(Config::default()),
            store: web::Data::new(store),
            jobs: web::Data::new(jobs),
            mail: web::Data::new(None),
        },
        _dir: dir,
    }
}

macro_rules! service {
    ($harness:expr) => {{
        let state = $harness.state.clone();
        test::init_service(App::new().configure(move |cfg| state.configure(cfg))).await
    }};
}

fn welcome_template() -> Template {
    let mut template = Template::new("Welcome");
    template.insert_block(BlockType::Text, None).unwrap();
    template.insert_block(BlockType::Cc, None).unwrap();
    template
}

#[actix_web::test]
async fn compiles_publishes_and_serves_a_template() {
    let harness = harness();
    let app = service!(harness);

    let req = test::TestRequest::post()
        .uri("/api/templates/compile")
        .set_json(welcome_template())
        .to_request();
    let compiled: ContentType = test::call_and_read_body_json(&app, req).await;
    assert_eq!(compiled.uid, "welcome");

    let req = test::TestRequest::get()
        .uri("/api/templates/welcome")
        .to_request();
    let fetched: ContentType = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched, compiled);

    let req = test::TestRequest::get()
        .uri("/api/templates/missing")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);
}

#[actix_web::test]
async fn malformed_templates_are_rejected() {
    let harness = harness();
    let app = service!(harness);

    let mut template = welcome_template();
    let mut duplicate = template.blocks[1].clone();
    duplicate.id = "99".into();
    duplicate.order = 2;
    template.blocks.push(duplicate);

    let req = test::TestRequest::post()
        .uri("/api/templates/compile")
        .set_json(&template)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 409);

    let req = test::TestRequest::post()
        .uri("/api/templates/compile")
        .set_json(Template::new("  "))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 422);

    let mut template = welcome_template();
    let mut reused = template.blocks[0].clone();
    reused.order = 2;
    template.blocks.push(reused);
    let req = test::TestRequest::post()
        .uri("/api/templates/compile")
        .set_json(&template)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 422);
}

#[actix_web::test]
async fn invalid_submissions_echo_their_values() {
    let harness = harness();
    let app = service!(harness);
    let req = test::TestRequest::post()
        .uri("/api/templates/compile")
        .set_json(welcome_template())
        .to_request();
    test::call_service(&app, req).await;

    let values = vec![
        FieldValue::text("subject", "Hello"),
        FieldValue::text("cc_2", "ok@example.com, nope"),
    ];
    let req = test::TestRequest::post()
        .uri("/api/records/welcome")
        .set_json(CreateRecordRequest {
            values: values.clone(),
        })
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 422);
    let rejected: SubmissionRejected = test::read_body_json(resp).await;
    assert_eq!(rejected.values, values);
    assert!(rejected.errors.contains_key("recipients"));
    assert_eq!(
        rejected.errors["cc_2"].message(),
        "Invalid email address(es): nope"
    );

    let values = vec![
        FieldValue::text("subject", "Hello"),
        FieldValue::text("recipients", "ada@example.com"),
    ];
    let req = test::TestRequest::post()
        .uri("/api/records/welcome")
        .set_json(CreateRecordRequest { values })
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let created: RecordRef = test::read_body_json(resp).await;
    assert_eq!(created.content_type_uid, "welcome");

    let req = test::TestRequest::get()
        .uri("/api/records/welcome?page=1&page_size=5")
        .to_request();
    let listing: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listing["pagination"]["total_count"], 1);
    assert_eq!(listing["records"][0]["subject"], "Hello");
}

#[actix_web::test]
async fn preview_echoes_the_render_token() {
    let harness = harness();
    let app = service!(harness);
    let req = test::TestRequest::post()
        .uri("/api/templates/compile")
        .set_json(welcome_template())
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/api/identities")
        .set_json(Identity {
            id: "u1".into(),
            alt_id: None,
            display_name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            subscribed: true,
        })
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 201);

    let req = test::TestRequest::post()
        .uri("/api/preview")
        .set_json(json!({ "type_id": "welcome", "token": 7 }))
        .to_request();
    let document: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(document["token"], 7);
    assert_eq!(document["json"]["template"]["uid"], "welcome");
    assert!(document["json"]["sample_data"]["recipients"]
        .as_str()
        .is_some_and(|s| s.contains("ada@example.com")));
    assert!(document["html"].as_str().is_some_and(|h| h.contains("[Email subject line]")));
}

#[actix_web::test]
async fn verification_reports_the_first_broken_record() {
    let harness = harness();
    let app = service!(harness);
    let req = test::TestRequest::post()
        .uri("/api/templates/compile")
        .set_json(welcome_template())
        .to_request();
    test::call_service(&app, req).await;

    let mut valid = Map::new();
    valid.insert("subject".into(), json!("Hi"));
    valid.insert("recipients".into(), json!(["u1"]));
    let store = harness.state.store.clone();
    store.create_record("welcome", &valid).unwrap();
    store.create_record("welcome", &Map::new()).unwrap();

    let req = test::TestRequest::post()
        .uri("/api/records/welcome/verify")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 202);
    let started: JobStarted = test::read_body_json(resp).await;

    let mut status = JobStatus::Pending;
    for _ in 0..200 {
        let req = test::TestRequest::get()
            .uri(&format!("/api/jobs/{}", started.job_id))
            .to_request();
        status = test::call_and_read_body_json(&app, req).await;
        if status.is_finished() {
            break;
        }
        actix_web::rt::time::sleep(Duration::from_millis(10)).await;
    }

    match status {
        JobStatus::Failed(message) => {
            assert!(message.starts_with("First invalid record at: row 2"), "{}", message)
        }
        other => panic!("unexpected job status {:?}", other),
    }

    let req = test::TestRequest::get().uri("/api/jobs/unknown").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);
}

#[actix_web::test]
async fn mail_is_unavailable_without_configuration() {
    let harness = harness();
    let app = service!(harness);

    let req = test::TestRequest::post()
        .uri("/api/mail/send")
        .set_json(json!({ "content_type_id": "welcome", "record_id": "r1" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 503);
}
