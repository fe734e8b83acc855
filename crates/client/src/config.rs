//! Client configuration.

use std::path::PathBuf;

use anyhow::Context;

const API_URL_VAR: &str = "LMS_API_URL";
const SESSION_FILE_VAR: &str = "LMS_SESSION_FILE";
const DEFAULT_API_URL: &str = "http://localhost:8000/api";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the REST backend, without trailing slash.
    pub api_url: String,
    /// Where the session survives restarts.
    pub session_file: PathBuf,
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>, session_file: impl Into<PathBuf>) -> Self {
        let api_url: String = api_url.into();
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            session_file: session_file.into(),
        }
    }

    /// Read `LMS_API_URL` and `LMS_SESSION_FILE`, falling back to defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        let api_url = std::env::var(API_URL_VAR).unwrap_or_else(|_| {
            tracing::warn!("{API_URL_VAR} not set; using {DEFAULT_API_URL}");
            DEFAULT_API_URL.to_string()
        });

        let session_file = match std::env::var_os(SESSION_FILE_VAR) {
            Some(path) => PathBuf::from(path),
            None => default_session_file()?,
        };

        Ok(Self::new(api_url, session_file))
    }

    /// Absolute URL for an API path.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }
}

fn default_session_file() -> anyhow::Result<PathBuf> {
    let base = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .context("failed to resolve OS app data directory - tried data_dir() and home_dir()/.local/share")?;

    let mut path = base;
    path.push("lms-admin");
    path.push("session.json");
    Ok(path)
}
