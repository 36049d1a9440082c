/*
 * Responsibility
 * - Load settings from the environment (listen port, CORS, MongoDB, identity provider)
 * - Validate required values (missing ones abort startup)
 */
use std::net::{Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppEnv {
    #[default]
    Development,
    Production,
}

impl AppEnv {
    /// Anything other than `production` / `prod` is development.
    pub fn parse(value: &str) -> Self {
        if matches!(value.trim().to_ascii_lowercase().as_str(), "production" | "prod") {
            Self::Production
        } else {
            Self::Development
        }
    }

    pub fn from_env() -> Self {
        optional("APP_ENV")
            .map(|v| Self::parse(&v))
            .unwrap_or_default()
    }

    pub fn is_production(&self) -> bool {
        *self == Self::Production
    }
}

/// Connection settings of the Casdoor identity provider.
///
/// `disabled` short-circuits verification entirely: the auth middleware lets
/// every request through without resolving an identity.
#[derive(Debug, Clone, Default)]
pub struct CasdoorSettings {
    pub endpoint: String,
    pub client_id: String,
    pub client_secret: String,
    pub certificate: String,
    pub organization_name: String,
    pub application_name: String,
    pub disabled: bool,
    pub credentials_optional: bool,
    pub lang: Option<String>,
}

impl CasdoorSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let disabled = flag("CASDOOR_DISABLED");

        // single-line env values carry the PEM with escaped newlines
        let certificate = optional("CASDOOR_CERTIFICATE")
            .map(|pem| pem.replace("\\n", "\n"))
            .unwrap_or_default();
        if !disabled && certificate.is_empty() {
            return Err(ConfigError::Missing("CASDOOR_CERTIFICATE"));
        }

        Ok(Self {
            endpoint: optional("CASDOOR_ENDPOINT")
                .map(|e| e.trim_end_matches('/').to_string())
                .unwrap_or_default(),
            client_id: optional("CASDOOR_CLIENT_ID").unwrap_or_default(),
            client_secret: optional("CASDOOR_CLIENT_SECRET").unwrap_or_default(),
            certificate,
            organization_name: optional("CASDOOR_ORGANIZATION_NAME").unwrap_or_default(),
            application_name: optional("CASDOOR_APPLICATION_NAME").unwrap_or_default(),
            disabled,
            credentials_optional: flag("CASDOOR_CREDENTIALS_OPTIONAL"),
            lang: optional("CASDOOR_LANG"),
        })
    }
}

/// Transport limits applied to every request.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub body_limit_bytes: usize,
    pub request_timeout: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            body_limit_bytes: 1024 * 1024,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl HttpSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            body_limit_bytes: parsed("REQUEST_BODY_LIMIT_BYTES")?
                .unwrap_or(defaults.body_limit_bytes),
            request_timeout: parsed("REQUEST_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
        })
    }
}

pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    /// Exact-match origins honored in production.
    pub cors_allowed_origins: Vec<String>,

    pub mongodb_uri: String,
    pub mongodb_database: String,

    pub http: HttpSettings,
    pub casdoor: CasdoorSettings,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = parsed("PORT")?.unwrap_or(3000);

        Ok(Self {
            addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)),
            app_env: AppEnv::from_env(),
            cors_allowed_origins: optional("CORS_ALLOWED_ORIGINS")
                .map(|v| split_list(&v))
                .unwrap_or_default(),
            mongodb_uri: required("MONGODB_URI")?,
            mongodb_database: required("MONGODB_DATABASE")?,
            http: HttpSettings::from_env()?,
            casdoor: CasdoorSettings::from_env()?,
        })
    }
}

/// Unset and blank values are both `None`.
fn optional(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    optional(key).ok_or(ConfigError::Missing(key))
}

fn parsed<T: FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    optional(key)
        .map(|v| v.parse().map_err(|_| ConfigError::Invalid(key)))
        .transpose()
}

fn flag(key: &str) -> bool {
    optional(key).is_some_and(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
