/*!
 * Request extractors
 *
 * - CurrentUser / AuthenticatedUser: the identity stored by the auth middleware
 * - EntityId: `{id}` path segment parsed as an ObjectId
 */

mod current_user;
mod object_id;

pub use current_user::{AuthenticatedUser, CurrentUser};
pub use object_id::{EntityId, ObjectIdError, parse_object_id};
