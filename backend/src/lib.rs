//! Notification service backend: the HTTP surface over `common`, a SQLite
//! store implementing its collaborators, a job controller for background
//! verification and a client for the mail-dispatch service.

pub mod config;
pub mod job_controller;
pub mod mail;
pub mod services;
pub mod store;

use crate::config::Config;
use crate::job_controller::state::JobsState;
use crate::mail::MailClient;
use crate::store::SqliteStore;
use actix_web::web;

/// Everything the handlers read from application data.
#[derive(Clone)]
pub struct AppState {
    pub config: web::Data<Config>,
    pub store: web::Data<SqliteStore>,
    pub jobs: web::Data<JobsState>,
    pub mail: web::Data<Option<MailClient>>,
}

impl AppState {
    /// Registers the shared data and every service scope.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::JsonConfig::default().limit(self.config.json_limit))
            .app_data(self.config.clone())
            .app_data(self.store.clone())
            .app_data(self.jobs.clone())
            .app_data(self.mail.clone());
        services::configure(cfg);
    }
}
