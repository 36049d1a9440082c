//! Row-level ownership rules and audit stamping for entity types that opt in
//! through [`Capabilities`](crate::repos::Capabilities).

use bson::{DateTime, Document};
use chrono::Utc;

use crate::repos::Entity;
use crate::repos::entity::{CREATOR_ID_FIELD, LAST_MODIFICATION_TIME_FIELD, LAST_MODIFIER_ID_FIELD};
use crate::services::auth::{Identity, user_id_of};

/// Restricts `filter` to records created by the caller.
///
/// No-op when the filter is absent, the type is not ownership-aware, or the
/// caller is anonymous. Idempotent.
pub fn add_owner_constraint_if_needed<T: Entity>(
    filter: Option<&mut Document>,
    identity: Option<&Identity>,
) {
    if !T::CAPABILITIES.ownership {
        return;
    }
    let Some(filter) = filter else {
        return;
    };
    let user_id = user_id_of(identity);
    if user_id.is_empty() {
        return;
    }
    filter.insert(CREATOR_ID_FIELD, user_id);
}

/// `true` when the caller may see `entity`.
///
/// Types without ownership are visible to everyone. For owned types an
/// anonymous caller owns nothing.
pub fn assert_current_user_owns<T: Entity>(entity: &T, identity: Option<&Identity>) -> bool {
    if !T::CAPABILITIES.ownership {
        return true;
    }
    let user_id = user_id_of(identity);
    if user_id.is_empty() {
        return false;
    }

    let creator_id = entity.creator_id().unwrap_or("");
    if creator_id != user_id {
        tracing::warn!(
            collection = T::COLLECTION,
            id = ?entity.id(),
            creator_id,
            user_id,
            "record does not belong to the current user"
        );
        return false;
    }
    true
}

/// Records the caller as creator of a new entity.
pub fn stamp_creator<T: Entity>(entity: &mut T, identity: Option<&Identity>) {
    if !T::CAPABILITIES.ownership {
        return;
    }
    let user_id = user_id_of(identity);
    if !user_id.is_empty() {
        entity.set_creator_id(user_id);
    }
}

/// Removes fields a partial update must not set: the id, and the audit fields
/// the server stamps itself.
pub fn strip_protected_fields<T: Entity>(fields: &mut Document) {
    fields.remove("_id");
    if T::CAPABILITIES.ownership {
        fields.remove(CREATOR_ID_FIELD);
    }
    if T::CAPABILITIES.modification_tracking {
        fields.remove(LAST_MODIFICATION_TIME_FIELD);
        fields.remove(LAST_MODIFIER_ID_FIELD);
    }
}

/// Adds modification time / modifier to a non-empty update.
pub fn stamp_modification<T: Entity>(fields: &mut Document, identity: Option<&Identity>) {
    if fields.is_empty() || !T::CAPABILITIES.modification_tracking {
        return;
    }
    fields.insert(LAST_MODIFICATION_TIME_FIELD, DateTime::from_chrono(Utc::now()));

    let user_id = user_id_of(identity);
    if !user_id.is_empty() {
        fields.insert(LAST_MODIFIER_ID_FIELD, user_id);
    }
}
