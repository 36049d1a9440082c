pub mod base;
pub mod entity;
pub mod options;
pub mod ownership;

pub use base::{BaseController, authenticate, merge_authenticated_if_needed};
pub use entity::EntityController;
pub use options::{BaseControllerOptions, EntityControllerOptions, ListFilter};
