//! Persistable entity types and their opt-in capabilities.
//!
//! Capabilities are declared per type at compile time through
//! [`Entity::CAPABILITIES`]; controllers branch on the constant instead of
//! inspecting values at runtime.

use bson::oid::ObjectId;
use serde::{Serialize, de::DeserializeOwned};
use validator::Validate;

/// Field holding the creator's user id on ownership-aware records.
pub const CREATOR_ID_FIELD: &str = "creatorId";
/// Field holding the last update time on modification-tracked records.
pub const LAST_MODIFICATION_TIME_FIELD: &str = "lastModificationTime";
/// Field holding the last modifier's user id on modification-tracked records.
pub const LAST_MODIFIER_ID_FIELD: &str = "lastModifierId";

/// Capability flags of an entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// Records carry a `creatorId` usable for row-level filtering.
    pub ownership: bool,
    /// Records carry `lastModificationTime` / `lastModifierId`, stamped on update.
    pub modification_tracking: bool,
}

impl Capabilities {
    pub const NONE: Self = Self {
        ownership: false,
        modification_tracking: false,
    };

    pub const fn with_ownership(mut self) -> Self {
        self.ownership = true;
        self
    }

    pub const fn with_modification_tracking(mut self) -> Self {
        self.modification_tracking = true;
        self
    }
}

/// A typed record stored in its own collection.
///
/// Ownership-aware types set `CAPABILITIES.ownership` and override
/// [`creator_id`](Entity::creator_id) / [`set_creator_id`](Entity::set_creator_id).
///
/// ```ignore
/// impl Entity for Widget {
///     const COLLECTION: &'static str = "widgets";
///     const CAPABILITIES: Capabilities = Capabilities::NONE.with_ownership();
///
///     fn id(&self) -> Option<ObjectId> { self.id }
///     fn set_id(&mut self, id: ObjectId) { self.id = Some(id) }
///     fn creator_id(&self) -> Option<&str> { self.creator_id.as_deref() }
///     fn set_creator_id(&mut self, user_id: &str) { self.creator_id = Some(user_id.to_string()) }
/// }
/// ```
pub trait Entity:
    Serialize + DeserializeOwned + Validate + Clone + Send + Sync + Unpin + 'static
{
    const COLLECTION: &'static str;
    const CAPABILITIES: Capabilities = Capabilities::NONE;

    fn id(&self) -> Option<ObjectId>;

    fn set_id(&mut self, id: ObjectId);

    fn creator_id(&self) -> Option<&str> {
        None
    }

    fn set_creator_id(&mut self, _user_id: &str) {}
}
