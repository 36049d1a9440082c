/*
 * Responsibility
 * - Typed entities and the persistence interface the controllers depend on
 * - MongoDB-backed implementation of that interface
 */
pub mod entity;
pub mod error;
pub mod mongo;
pub mod service;
pub mod widget;

pub use entity::{Capabilities, Entity};
pub use error::{RepoError, RepoResult};
pub use mongo::MongoEntityService;
pub use service::{EntityService, ListOptions, Page, SortField};
pub use widget::Widget;
