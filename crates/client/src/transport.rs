//! Authenticated HTTP transport.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::config::ClientConfig;
use crate::current::CurrentSession;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl From<Method> for reqwest::Method {
    fn from(value: Method) -> Self {
        match value {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),
    #[error("API error ({status}): {body}")]
    Http { status: u16, body: String },
    #[error("parse error: {0}")]
    Parse(String),
}

impl TransportError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, TransportError::Http { status: 401, .. })
    }

    /// Text suitable for a notification.
    ///
    /// Prefers the backend's `message`/`detail`/`error` field when the body
    /// is JSON.
    pub fn user_message(&self) -> String {
        match self {
            TransportError::Network(_) => "Could not reach the server. Check your connection.".to_string(),
            TransportError::Parse(_) => "The server sent an unexpected response.".to_string(),
            TransportError::Http { status, body } => serde_json::from_str::<Value>(body)
                .ok()
                .and_then(|v| {
                    ["message", "detail", "error"]
                        .iter()
                        .find_map(|k| v.get(k).and_then(Value::as_str).map(str::to_string))
                })
                .unwrap_or_else(|| format!("Request failed with status {status}")),
        }
    }
}

/// `request(method, path, body?)` against the REST backend.
///
/// Implementations attach `Authorization: Bearer <token>` whenever a session
/// is active. Non-2xx responses surface as [`TransportError::Http`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn request(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value, TransportError> {
        (**self).request(method, path, body).await
    }
}

pub struct HttpTransport {
    client: reqwest::Client,
    config: ClientConfig,
    session: CurrentSession,
}

impl HttpTransport {
    pub fn new(config: ClientConfig, session: CurrentSession) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            session,
        }
    }

    pub(crate) fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.session.get() {
            Some(session) => builder.bearer_auth(session.auth_token().expose()),
            None => builder,
        }
    }

    pub(crate) fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub(crate) fn config(&self) -> &ClientConfig {
        &self.config
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value, TransportError> {
        let url = self.config.url(path);
        let mut req = self.authorized(self.client.request(method.into(), &url));
        if let Some(body) = &body {
            req = req.json(body);
        }

        tracing::debug!(?method, %url, "sending request");
        let resp = req.send().await.map_err(|e| TransportError::Network(e.to_string()))?;
        read_response(resp).await
    }
}

pub(crate) async fn read_response(resp: reqwest::Response) -> Result<Value, TransportError> {
    let status = resp.status();
    let text = resp.text().await.map_err(|e| TransportError::Network(e.to_string()))?;

    if !status.is_success() {
        tracing::warn!(status = status.as_u16(), "request rejected");
        return Err(TransportError::Http {
            status: status.as_u16(),
            body: text,
        });
    }
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&text).map_err(|e| TransportError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_prefers_backend_text() {
        let e = TransportError::Http {
            status: 422,
            body: r#"{"message":"Email already registered"}"#.into(),
        };
        assert_eq!(e.user_message(), "Email already registered");

        let e = TransportError::Http {
            status: 500,
            body: "<html>oops</html>".into(),
        };
        assert_eq!(e.user_message(), "Request failed with status 500");
    }

    #[test]
    fn detects_unauthorized() {
        assert!(TransportError::Http { status: 401, body: String::new() }.is_unauthorized());
        assert!(!TransportError::Network("down".into()).is_unauthorized());
    }
}
