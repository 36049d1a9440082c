use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use bson::oid::ObjectId;
use thiserror::Error;

use crate::error::AppError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ObjectIdError {
    #[error("id must not be empty")]
    Empty,
    #[error("invalid id,id must be bson id format,id:{0}")]
    Invalid(String),
}

/// Parses a 24-hex record id.
pub fn parse_object_id(raw: &str) -> Result<ObjectId, ObjectIdError> {
    if raw.is_empty() {
        return Err(ObjectIdError::Empty);
    }
    ObjectId::parse_str(raw).map_err(|_| ObjectIdError::Invalid(raw.to_string()))
}

/// `{id}` path segment parsed into an [`ObjectId`].
///
/// Rejects with 400 before the handler runs, so a malformed id never reaches
/// persistence. `raw` keeps the text as sent for error messages.
#[derive(Debug, Clone)]
pub struct EntityId {
    pub id: ObjectId,
    pub raw: String,
}

impl<S> FromRequestParts<S> for EntityId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::bad_request("INVALID_PATH", e.body_text()))?;

        let id = parse_object_id(&raw)?;
        Ok(Self { id, raw })
    }
}
