//! Service configuration, read once from the environment at start-up.

use std::env;
use std::str::FromStr;
use thiserror::Error;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DB_PATH: &str = "notify.sqlite";
const DEFAULT_PAGE_SIZE: u32 = 10;
const DEFAULT_JSON_LIMIT: usize = 10 * 1024 * 1024; // 10 MB

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value `{value}` for {key}")]
    Invalid { key: String, value: String },
}

/// Where the external mail-dispatch service lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailSettings {
    pub base_url: String,
    pub api_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: String,
    pub page_size: u32,
    pub json_limit: usize,
    /// `None` unless both `MAIL_SERVICE_URL` and `MAIL_API_KEY` are set.
    pub mail: Option<MailSettings>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            db_path: DEFAULT_DB_PATH.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            json_limit: DEFAULT_JSON_LIMIT,
            mail: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a configuration from any key lookup; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Config::default();
        let page_size = parsed(&lookup, "NOTIFY_PAGE_SIZE", defaults.page_size)?;
        if page_size == 0 {
            return Err(ConfigError::Invalid {
                key: "NOTIFY_PAGE_SIZE".to_string(),
                value: "0".to_string(),
            });
        }

        let mail = match (
            non_blank(&lookup, "MAIL_SERVICE_URL"),
            non_blank(&lookup, "MAIL_API_KEY"),
        ) {
            (Some(base_url), Some(api_key)) => Some(MailSettings {
                base_url: base_url.trim_end_matches('/').to_string(),
                api_key,
            }),
            _ => None,
        };

        Ok(Self {
            host: non_blank(&lookup, "NOTIFY_HOST").unwrap_or(defaults.host),
            port: parsed(&lookup, "NOTIFY_PORT", defaults.port)?,
            db_path: non_blank(&lookup, "NOTIFY_DB_PATH").unwrap_or(defaults.db_path),
            page_size,
            json_limit: parsed(&lookup, "NOTIFY_JSON_LIMIT_BYTES", defaults.json_limit)?,
            mail,
        })
    }

    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

fn non_blank(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parsed<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError> {
    match non_blank(lookup, key) {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
            key: key.to_string(),
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn unset_keys_fall_back_to_defaults() {
        assert_eq!(config(&[]), Ok(Config::default()));
    }

    #[test]
    fn mail_needs_both_url_and_key() {
        let only_url = config(&[("MAIL_SERVICE_URL", "https://mail.test/")]).unwrap();
        assert_eq!(only_url.mail, None);

        let both = config(&[
            ("MAIL_SERVICE_URL", "https://mail.test/"),
            ("MAIL_API_KEY", "secret"),
        ])
        .unwrap();
        assert_eq!(
            both.mail.map(|m| m.base_url),
            Some("https://mail.test".to_string())
        );
    }

    #[test]
    fn bad_numbers_name_the_key() {
        assert_eq!(
            config(&[("NOTIFY_PORT", "eighty")]),
            Err(ConfigError::Invalid {
                key: "NOTIFY_PORT".into(),
                value: "eighty".into()
            })
        );
        assert!(config(&[("NOTIFY_PAGE_SIZE", "0")]).is_err());
    }
}
