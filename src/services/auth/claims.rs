use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Claims carried by a Casdoor-issued access token.
///
/// Casdoor embeds the user record in the token body, so besides the
/// registered claims we keep the profile fields the controllers need and
/// collect everything else into `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub scope: String,

    #[serde(default)]
    pub iss: String,
    #[serde(default)]
    pub sub: String,
    // string or array
    #[serde(default)]
    pub aud: serde_json::Value,
    pub exp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Claims {
    /// The user id used for ownership: the Casdoor user id, falling back to `sub`.
    pub fn user_id(&self) -> &str {
        if self.id.trim().is_empty() {
            &self.sub
        } else {
            &self.id
        }
    }
}

/// The verified caller of one request.
///
/// Inserted into request extensions by the auth middleware at most once per
/// request. Handlers read it through the `CurrentUser` extractors.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: String,
    pub claims: Arc<Claims>,
}

impl Identity {
    pub fn from_claims(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id().to_string(),
            claims: Arc::new(claims),
        }
    }

    /// `true` when a non-empty user id was resolved.
    pub fn is_authenticated(&self) -> bool {
        !self.user_id.is_empty()
    }
}

/// User id of an optional identity, empty when absent.
pub fn user_id_of(identity: Option<&Identity>) -> &str {
    identity.map(|i| i.user_id.as_str()).unwrap_or("")
}
