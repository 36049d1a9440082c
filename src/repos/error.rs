/*
 * Responsibility
 * - What the persistence layer reports upward
 */
use thiserror::Error;

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("mongodb error: {0}")]
    Mongo(#[from] mongodb::error::Error),
    #[error("bson encode error: {0}")]
    Encode(#[from] bson::ser::Error),
    #[error("bson decode error: {0}")]
    Decode(#[from] bson::de::Error),
    /// Failures raised by non-Mongo backends.
    #[error("{0}")]
    Backend(String),
}
