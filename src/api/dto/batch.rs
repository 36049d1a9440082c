use bson::oid::ObjectId;
use serde::Deserialize;

use crate::api::extractors::{ObjectIdError, parse_object_id};

/// Body of `DELETE /`: `{"ids":["<24-hex>", ...]}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchRequest {
    #[serde(default)]
    pub ids: Vec<String>,
}

impl BatchRequest {
    /// All ids parsed; the first malformed one fails the batch.
    pub fn object_ids(&self) -> Result<Vec<ObjectId>, ObjectIdError> {
        self.ids.iter().map(|id| parse_object_id(id)).collect()
    }
}
