//! Plain HTTP wrappers for the operations that are not channel-scoped.
//!
//! Each call is a single request: no retries, no backoff, no timeout. A
//! non-2xx reply keeps its body so callers can surface what the backend said.

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use url::Url;
use votepaxos_core::{Identity, VoterData};

use crate::config::ClientConfig;

#[derive(Debug, Error)]
pub enum RestError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status: {status} body={body}")]
    UnexpectedStatus { status: StatusCode, body: String },
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("preflight did not return an identity")]
    EmptyIdentity,
    #[error("server url '{0}' cannot carry api paths")]
    InvalidBaseUrl(String),
}

/// Backend operations reachable over plain HTTP.
#[async_trait]
pub trait NetworkApi: Send + Sync {
    /// `POST /api/preflight`: obtain or confirm the session identity.
    async fn preflight(&self) -> Result<Identity, RestError>;
    /// `POST /api/spawn/{count}`
    async fn spawn_voters(&self, count: u32) -> Result<Value, RestError>;
    /// `POST /api/terminate/{id}`
    async fn kill_voter(&self, id: &str) -> Result<Value, RestError>;
    /// `POST /api/terminate`
    async fn kill_all_voters(&self) -> Result<Value, RestError>;
    /// `GET /api/refresh`
    async fn refresh(&self) -> Result<VoterData, RestError>;
}

#[derive(Clone)]
pub struct NetworkClient {
    http: Client,
    base_url: Url,
}

impl NetworkClient {
    pub fn new(base_url: Url) -> Self {
        Self {
            http: Client::new(),
            base_url,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.server.clone())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, RestError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| RestError::InvalidBaseUrl(self.base_url.to_string()))?;
            path.pop_if_empty().push("api").extend(segments);
        }
        Ok(url)
    }

    async fn request(&self, method: Method, segments: &[&str]) -> Result<String, RestError> {
        let url = self.endpoint(segments)?;
        debug!(target: "votepaxos::rest", %method, %url, "sending request");
        let res = self.http.request(method, url).send().await?;

        let status = res.status();
        if status.is_success() {
            return Ok(res.text().await?);
        }
        let body = res.text().await.unwrap_or_default();
        debug!(target: "votepaxos::rest", %status, "request rejected");
        Err(RestError::UnexpectedStatus { status, body })
    }

    async fn post_value(&self, segments: &[&str]) -> Result<Value, RestError> {
        let body = self.request(Method::POST, segments).await?;
        Ok(parse_body(&body))
    }
}

#[async_trait]
impl NetworkApi for NetworkClient {
    async fn preflight(&self) -> Result<Identity, RestError> {
        let body = self.request(Method::POST, &["preflight"]).await?;
        let raw = match parse_body(&body) {
            Value::String(id) => id,
            Value::Object(map) => map
                .get("id")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or(RestError::EmptyIdentity)?,
            Value::Number(n) => n.to_string(),
            _ => return Err(RestError::EmptyIdentity),
        };
        Identity::new(raw).map_err(|_| RestError::EmptyIdentity)
    }

    async fn spawn_voters(&self, count: u32) -> Result<Value, RestError> {
        self.post_value(&["spawn", &count.to_string()]).await
    }

    async fn kill_voter(&self, id: &str) -> Result<Value, RestError> {
        self.post_value(&["terminate", id]).await
    }

    async fn kill_all_voters(&self) -> Result<Value, RestError> {
        self.post_value(&["terminate"]).await
    }

    async fn refresh(&self) -> Result<VoterData, RestError> {
        let body = self.request(Method::GET, &["refresh"]).await?;
        if body.trim().is_empty() {
            return Ok(VoterData::default());
        }
        Ok(serde_json::from_str(&body)?)
    }
}

/// JSON when the body parses, the raw text otherwise, `null` when empty.
pub(crate) fn parse_body(body: &str) -> Value {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    serde_json::from_str(trimmed).unwrap_or_else(|_| Value::String(trimmed.to_string()))
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test_timeout::timeout]
    fn endpoints_keep_base_path_and_encode_ids() {
        let client = NetworkClient::new(Url::parse("http://127.0.0.1:4000").unwrap());
        assert_eq!(
            client.endpoint(&["spawn", "3"]).unwrap().as_str(),
            "http://127.0.0.1:4000/api/spawn/3"
        );

        let client = NetworkClient::new(Url::parse("https://votes.example.com/stage/").unwrap());
        assert_eq!(
            client.endpoint(&["terminate", "voter 1/a"]).unwrap().as_str(),
            "https://votes.example.com/stage/api/terminate/voter%201%2Fa"
        );
    }

    #[test_timeout::timeout]
    fn body_parsing() {
        assert_eq!(parse_body(""), Value::Null);
        assert_eq!(parse_body("  \"abc\" "), json!("abc"));
        assert_eq!(parse_body("{\"ok\":true}"), json!({"ok": true}));
        assert_eq!(parse_body("plain text"), json!("plain text"));
    }
}
