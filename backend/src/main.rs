use actix_web::{web, App, HttpServer};
use backend::config::Config;
use backend::job_controller::state::{start_job_updater, JobsState};
use backend::mail::MailClient;
use backend::store::SqliteStore;
use backend::AppState;
use env_logger::Env;
use log::{error, info, warn};
use std::io;

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|err| {
        error!("{}", err);
        io::Error::new(io::ErrorKind::InvalidInput, err)
    })?;
    let store = SqliteStore::open(&config.db_path).map_err(|err| {
        error!("{}", err);
        io::Error::other(err)
    })?;

    let mail = match &config.mail {
        Some(settings) => match MailClient::new(settings) {
            Ok(client) => Some(client),
            Err(err) => {
                error!("mail client unavailable: {}", err);
                None
            }
        },
        None => {
            warn!("MAIL_SERVICE_URL or MAIL_API_KEY not set, mail endpoints disabled");
            None
        }
    };

    // Initialize job controller state
    let (jobs_state, rx) = JobsState::new();
    let updater_state = jobs_state.clone();
    tokio::spawn(async move {
        start_job_updater(updater_state, rx).await;
    });

    let bind = (config.host.clone(), config.port);
    info!("Server running at {}", config.url());

    let state = AppState {
        config: web::Data::new(config),
        store: web::Data::new(store),
        jobs: web::Data::new(jobs_state),
        mail: web::Data::new(mail),
    };

    HttpServer::new(move || {
        let state = state.clone();
        App::new().configure(move |cfg| state.configure(cfg))
    })
    .bind(bind)?
    .run()
    .await
}
