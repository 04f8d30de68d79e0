//! Endpoint configuration for the submission sinks.
//!
//! Values are layered: an optional TOML file, then `BRAND_SAVINGS_*`
//! environment variables (a `.env` file in the working directory is loaded
//! first and never overrides variables that are already set).

use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::pipeline::SubmissionPipeline;
use crate::sinks::HttpWebhookSink;
use crate::sinks::SUBMISSIONS_COLLECTION;
use crate::sinks::SupabaseRecordStore;

pub const ENV_SUPABASE_URL: &str = "BRAND_SAVINGS_SUPABASE_URL";
pub const ENV_SUPABASE_ANON_KEY: &str = "BRAND_SAVINGS_SUPABASE_ANON_KEY";
pub const ENV_WEBHOOK_URL: &str = "BRAND_SAVINGS_WEBHOOK_URL";
pub const ENV_WEBHOOK_TOKEN: &str = "BRAND_SAVINGS_WEBHOOK_TOKEN";

const WEBHOOK_FUNCTION_PATH: &str = "functions/v1/zapier-webhook";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("missing required setting `{field}` (set it in the config file or {env})")]
    Missing {
        field: &'static str,
        env: &'static str,
    },
    #[error("invalid url for `{field}`: {source}")]
    InvalidUrl {
        field: &'static str,
        #[source]
        source: url::ParseError,
    },
}

/// On-disk shape of the config file. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigToml {
    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,
    pub webhook_url: Option<String>,
    pub webhook_token: Option<String>,
    pub collection: Option<String>,
}

impl ConfigToml {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub supabase_url: Url,
    pub supabase_anon_key: String,
    pub webhook_url: Url,
    pub webhook_token: String,
    pub collection: String,
}

impl AppConfig {
    /// Loads `.env`, the optional config file and the process environment.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "loaded .env");
        }
        let file = match config_path {
            Some(path) => ConfigToml::from_path(path)?,
            None => ConfigToml::default(),
        };
        let env: HashMap<String, String> = std::env::vars().collect();
        Self::from_sources(file, &env)
    }

    /// Resolves settings from an explicit file and environment map.
    pub fn from_sources(
        file: ConfigToml,
        env: &HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let pick = |env_key: &str, file_value: Option<String>| {
            env.get(env_key)
                .filter(|v| !v.trim().is_empty())
                .cloned()
                .or(file_value)
        };

        let supabase_url = pick(ENV_SUPABASE_URL, file.supabase_url).ok_or(ConfigError::Missing {
            field: "supabase_url",
            env: ENV_SUPABASE_URL,
        })?;
        let supabase_url = parse_url("supabase_url", &supabase_url)?;
        let supabase_anon_key =
            pick(ENV_SUPABASE_ANON_KEY, file.supabase_anon_key).ok_or(ConfigError::Missing {
                field: "supabase_anon_key",
                env: ENV_SUPABASE_ANON_KEY,
            })?;

        let webhook_url = match pick(ENV_WEBHOOK_URL, file.webhook_url) {
            Some(raw) => parse_url("webhook_url", &raw)?,
            None => default_webhook_url(&supabase_url)?,
        };
        let webhook_token =
            pick(ENV_WEBHOOK_TOKEN, file.webhook_token).unwrap_or_else(|| supabase_anon_key.clone());

        Ok(Self {
            supabase_url,
            supabase_anon_key,
            webhook_url,
            webhook_token,
            collection: file
                .collection
                .unwrap_or_else(|| SUBMISSIONS_COLLECTION.to_string()),
        })
    }

    /// Builds the HTTP-backed submission pipeline for these endpoints.
    pub fn pipeline(&self) -> SubmissionPipeline {
        let client = reqwest::Client::new();
        let store = SupabaseRecordStore::with_client(
            client.clone(),
            self.supabase_url.clone(),
            self.supabase_anon_key.clone(),
        );
        let webhook = HttpWebhookSink::with_client(
            client,
            self.webhook_url.clone(),
            self.webhook_token.clone(),
        );
        SubmissionPipeline::new(Arc::new(store), Arc::new(webhook))
            .with_collection(self.collection.clone())
    }
}

fn parse_url(field: &'static str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidUrl { field, source })
}

fn default_webhook_url(supabase_url: &Url) -> Result<Url, ConfigError> {
    let base = format!(
        "{}/{WEBHOOK_FUNCTION_PATH}",
        supabase_url.as_str().trim_end_matches('/')
    );
    parse_url("webhook_url", &base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn webhook_defaults_derive_from_supabase() {
        let config = AppConfig::from_sources(
            ConfigToml::default(),
            &env(&[
                (ENV_SUPABASE_URL, "https://proj.supabase.co"),
                (ENV_SUPABASE_ANON_KEY, "anon"),
            ]),
        )
        .expect("config");
        assert_eq!(
            config.webhook_url.as_str(),
            "https://proj.supabase.co/functions/v1/zapier-webhook"
        );
        assert_eq!(config.webhook_token, "anon");
        assert_eq!(config.collection, "submissions");
    }

    #[test]
    fn environment_overrides_file() {
        let mut file = NamedTempFile::new().expect("tempfile");
        writeln!(
            file,
            r#"
supabase_url = "https://file.supabase.co"
supabase_anon_key = "file-key"
webhook_url = "https://hooks.example.com/catch"
collection = "leads"
"#
        )
        .expect("write");
        let toml = ConfigToml::from_path(file.path()).expect("parse");
        let config = AppConfig::from_sources(
            toml,
            &env(&[(ENV_SUPABASE_ANON_KEY, "env-key"), (ENV_WEBHOOK_TOKEN, "hook")]),
        )
        .expect("config");
        assert_eq!(config.supabase_url.as_str(), "https://file.supabase.co/");
        assert_eq!(config.supabase_anon_key, "env-key");
        assert_eq!(config.webhook_url.as_str(), "https://hooks.example.com/catch");
        assert_eq!(config.webhook_token, "hook");
        assert_eq!(config.collection, "leads");
    }

    #[test]
    fn missing_key_is_reported() {
        let err = AppConfig::from_sources(
            ConfigToml::default(),
            &env(&[(ENV_SUPABASE_URL, "https://proj.supabase.co")]),
        )
        .expect_err("anon key required");
        assert_matches!(
            err,
            ConfigError::Missing {
                field: "supabase_anon_key",
                ..
            }
        );
    }

    #[test]
    fn invalid_url_is_reported() {
        let err = AppConfig::from_sources(
            ConfigToml::default(),
            &env(&[
                (ENV_SUPABASE_URL, "not a url"),
                (ENV_SUPABASE_ANON_KEY, "anon"),
            ]),
        )
        .expect_err("bad url");
        assert_matches!(err, ConfigError::InvalidUrl { field: "supabase_url", .. });
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let mut file = NamedTempFile::new().expect("tempfile");
        writeln!(file, "supabase_uri = \"typo\"").expect("write");
        assert_matches!(
            ConfigToml::from_path(file.path()),
            Err(ConfigError::Parse { .. })
        );
    }
}
