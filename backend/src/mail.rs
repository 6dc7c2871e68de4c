//! HTTP client for the external mail-dispatch service.
//!
//! The service accepts a content type id, a record id and a locale, renders
//! and sends the notification itself, and answers with a job acknowledgment.
//! Delivery is not confirmed here.

use crate::config::MailSettings;
use common::requests::{MailAcknowledgment, MailRequest};
use log::{error, info};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

const API_KEY_HEADER: &str = "x-api-key";
const REQUEST_TIMEOUT_SECS: u64 = 30;
/// Upstream error bodies are cut to this many characters.
const ERROR_BODY_LIMIT: usize = 200;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Mail service unreachable: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Mail service error {status}: {body}")]
    Upstream { status: u16, body: String },
}

#[derive(Clone)]
pub struct MailClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl MailClient {
    pub fn new(settings: &MailSettings) -> Result<Self, MailError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            http,
            base_url: settings.base_url.clone(),
            api_key: settings.api_key.clone(),
        })
    }

    pub async fn send(&self, request: &MailRequest) -> Result<MailAcknowledgment, MailError> {
        info!(
            "dispatching `{}` record {} ({})",
            request.content_type_id, request.record_id, request.locale
        );
        self.post("/send", request).await
    }

    pub async fn send_bulk(
        &self,
        requests: &[MailRequest],
    ) -> Result<MailAcknowledgment, MailError> {
        info!("dispatching {} notifications in bulk", requests.len());
        self.post("/send-bulk", requests).await
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<MailAcknowledgment, MailError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body: String = body.chars().take(ERROR_BODY_LIMIT).collect();
            error!("mail service answered {} for {}: {}", status, path, body);
            return Err(MailError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}
