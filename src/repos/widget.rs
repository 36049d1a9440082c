/*
 * Responsibility
 * - The demo resource served under /api/v1/widgets
 * - Ownership-aware and modification-tracked
 */
use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::repos::{Capabilities, Entity};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 1024))]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modification_time: Option<DateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modifier_id: Option<String>,
}

impl Entity for Widget {
    const COLLECTION: &'static str = "widgets";
    const CAPABILITIES: Capabilities = Capabilities::NONE
        .with_ownership()
        .with_modification_tracking();

    fn id(&self) -> Option<ObjectId> {
        self.id
    }

    fn set_id(&mut self, id: ObjectId) {
        self.id = Some(id);
    }

    fn creator_id(&self) -> Option<&str> {
        self.creator_id.as_deref()
    }

    fn set_creator_id(&mut self, user_id: &str) {
        self.creator_id = Some(user_id.to_string());
    }
}
