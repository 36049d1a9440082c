//! Casdoor management API client.
//!
//! Calls authenticate with the application's client id / secret (HTTP basic)
//! and, when a language is configured, send it as `Accept-Language` so
//! Casdoor localizes its messages.
use reqwest::header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::config::CasdoorSettings;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid casdoor endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
    #[error("invalid client configuration: {0}")]
    Config(String),
    #[error("casdoor request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("casdoor returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("casdoor error: {0}")]
    Api(String),
    #[error("unexpected casdoor response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Organization as returned by `get-organizations`. Fields this service does
/// not use are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub created_time: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub website_url: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    status: String,
    #[serde(default)]
    msg: String,
    #[serde(default)]
    data: Value,
}

#[derive(Clone)]
pub struct CasdoorClient {
    http: reqwest::Client,
    endpoint: Url,
    client_id: String,
    client_secret: String,
}

impl std::fmt::Debug for CasdoorClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // no secret
        f.debug_struct("CasdoorClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("client_id", &self.client_id)
            .finish()
    }
}

impl CasdoorClient {
    pub fn new(settings: &CasdoorSettings) -> Result<Self, ClientError> {
        let endpoint = Url::parse(&format!("{}/", settings.endpoint.trim_end_matches('/')))?;

        let mut headers = HeaderMap::new();
        if let Some(lang) = settings.lang.as_deref() {
            let value = HeaderValue::from_str(lang)
                .map_err(|_| ClientError::Config(format!("invalid lang: {lang}")))?;
            headers.insert(ACCEPT_LANGUAGE, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            endpoint,
            client_id: settings.client_id.clone(),
            client_secret: settings.client_secret.clone(),
        })
    }

    /// `<endpoint>/api/<action>?<query>`
    pub fn get_url(&self, action: &str, query: &[(&str, &str)]) -> Result<Url, ClientError> {
        let mut url = self.endpoint.join("api/")?.join(action)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// Organizations owned by `owner` (Casdoor uses "admin" for the global list).
    pub async fn get_organizations_by_owner(
        &self,
        owner: &str,
    ) -> Result<Vec<Organization>, ClientError> {
        let url = self.get_url("get-organizations", &[("owner", owner)])?;
        let data = self.get_data(url).await?;
        Ok(serde_json::from_value(data)?)
    }

    async fn get_data(&self, url: Url) -> Result<Value, ClientError> {
        tracing::debug!(url = %url, "casdoor request");

        let resp = self
            .http
            .get(url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        unwrap_envelope(serde_json::from_str(&body)?)
    }
}

// Casdoor answers either with the payload itself or with {status,msg,data}.
fn unwrap_envelope(value: Value) -> Result<Value, ClientError> {
    if !value.is_object() {
        return Ok(value);
    }

    let envelope: Envelope = serde_json::from_value(value)?;
    if envelope.status == "error" {
        return Err(ClientError::Api(envelope.msg));
    }
    Ok(match envelope.data {
        Value::Null => Value::Array(Vec::new()),
        data => data,
    })
}
