//! Token extraction strategies.
//!
//! An extractor reads a raw bearer token out of a request. Three outcomes:
//! - `Ok(Some(token))`: a token was found
//! - `Ok(None)`: no token present (the middleware decides whether that is fine)
//! - `Err(_)`: something token-shaped is present but malformed; the request is rejected
//!
//! Extractors compose with [`from_first`], which returns the first token found.

use std::sync::Arc;

use axum::extract::Request;
use axum::http::{HeaderName, header};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("authorization header format must be Bearer {{token}}")]
    BearerFormat,
    #[error("header {0} is not valid ascii")]
    HeaderEncoding(HeaderName),
}

pub type ExtractResult = Result<Option<String>, ExtractError>;

pub trait TokenExtractor: Send + Sync + 'static {
    fn extract(&self, req: &Request) -> ExtractResult;
}

impl<F> TokenExtractor for F
where
    F: Fn(&Request) -> ExtractResult + Send + Sync + 'static,
{
    fn extract(&self, req: &Request) -> ExtractResult {
        self(req)
    }
}

pub type SharedExtractor = Arc<dyn TokenExtractor>;

fn header_str<'a>(req: &'a Request, name: &HeaderName) -> Result<Option<&'a str>, ExtractError> {
    match req.headers().get(name) {
        None => Ok(None),
        Some(v) => v
            .to_str()
            .map(Some)
            .map_err(|_| ExtractError::HeaderEncoding(name.clone())),
    }
}

fn non_empty(token: &str) -> Option<String> {
    (!token.is_empty()).then(|| token.to_string())
}

/// Strict `Authorization: Bearer <token>`.
///
/// Any other shape of a present header is an error, so a caller sending the
/// wrong scheme is rejected instead of silently treated as anonymous.
#[derive(Debug, Clone)]
pub struct BearerHeader {
    name: HeaderName,
}

impl BearerHeader {
    pub fn new(name: HeaderName) -> Self {
        Self { name }
    }
}

impl TokenExtractor for BearerHeader {
    fn extract(&self, req: &Request) -> ExtractResult {
        let Some(value) = header_str(req, &self.name)? else {
            return Ok(None);
        };
        if value.is_empty() {
            return Ok(None);
        }

        let parts: Vec<&str> = value.split_whitespace().collect();
        if parts.len() != 2 || !parts[0].eq_ignore_ascii_case("bearer") {
            return Err(ExtractError::BearerFormat);
        }
        Ok(non_empty(parts[1]))
    }
}

/// Lenient header read: strips a `Bearer ` prefix when present, otherwise
/// returns the raw value.
#[derive(Debug, Clone)]
pub struct RawHeader {
    name: HeaderName,
}

impl RawHeader {
    pub fn new(name: HeaderName) -> Self {
        Self { name }
    }
}

impl TokenExtractor for RawHeader {
    fn extract(&self, req: &Request) -> ExtractResult {
        let Some(value) = header_str(req, &self.name)? else {
            return Ok(None);
        };

        let parts: Vec<&str> = value.split_whitespace().collect();
        if parts.len() > 1 && parts[0].eq_ignore_ascii_case("bearer") {
            return Ok(non_empty(parts[1]));
        }
        Ok(non_empty(value))
    }
}

/// Query parameter, returned verbatim.
#[derive(Debug, Clone)]
pub struct QueryParam {
    name: String,
}

impl QueryParam {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl TokenExtractor for QueryParam {
    fn extract(&self, req: &Request) -> ExtractResult {
        let Some(query) = req.uri().query() else {
            return Ok(None);
        };
        Ok(url::form_urlencoded::parse(query.as_bytes())
            .find(|(k, _)| k == self.name.as_str())
            .and_then(|(_, v)| non_empty(&v)))
    }
}

/// Tries each extractor in order. The first token wins; the first error
/// stops the chain.
#[derive(Clone)]
pub struct FirstOf {
    extractors: Vec<SharedExtractor>,
}

impl TokenExtractor for FirstOf {
    fn extract(&self, req: &Request) -> ExtractResult {
        for extractor in &self.extractors {
            if let Some(token) = extractor.extract(req)? {
                return Ok(Some(token));
            }
        }
        Ok(None)
    }
}

pub fn from_auth_header() -> SharedExtractor {
    Arc::new(BearerHeader::new(header::AUTHORIZATION))
}

pub fn from_header(name: HeaderName) -> SharedExtractor {
    Arc::new(RawHeader::new(name))
}

pub fn from_parameter(name: impl Into<String>) -> SharedExtractor {
    Arc::new(QueryParam::new(name))
}

pub fn from_first(extractors: Vec<SharedExtractor>) -> SharedExtractor {
    Arc::new(FirstOf { extractors })
}

/// Strict bearer header first, then the raw `Authorization` value.
pub fn default_extractor() -> SharedExtractor {
    from_first(vec![
        from_auth_header(),
        from_header(header::AUTHORIZATION),
    ])
}
