use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::services::auth::{Identity, user_id_of};

/// The identity resolved by the auth middleware, if any.
///
/// Never rejects: anonymous requests get `CurrentUser(None)`.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<Identity>);

impl CurrentUser {
    pub fn identity(&self) -> Option<&Identity> {
        self.0.as_ref()
    }

    /// Empty when anonymous.
    pub fn user_id(&self) -> &str {
        user_id_of(self.identity())
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<Identity>().cloned()))
    }
}

/// Like [`CurrentUser`] but requires an authenticated identity (401 otherwise).
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Identity);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .filter(|i| i.is_authenticated())
            .cloned()
            .map(AuthenticatedUser)
            .ok_or_else(|| AppError::unauthorized("required authorization token not found"))
    }
}
