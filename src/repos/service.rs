/*
 * Responsibility
 * - The persistence interface consumed by the entity controllers
 * - Paging / sorting options passed to list queries
 */
use async_trait::async_trait;
use bson::{Document, oid::ObjectId};

use crate::repos::{Entity, RepoResult};

/// One sort key. Keys are applied in the order given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortField {
    pub key: String,
    pub ascending: bool,
}

impl SortField {
    pub fn asc(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ascending: true,
        }
    }

    pub fn desc(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ascending: false,
        }
    }
}

/// 1-based page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: u64,
    pub size: u64,
}

impl Page {
    /// Largest skip a backend accepts (MongoDB takes it as a signed 64-bit value).
    pub const MAX_SKIP: u64 = i64::MAX as u64;

    /// Saturates instead of overflowing; see [`checked_skip`](Page::checked_skip).
    pub fn skip(&self) -> u64 {
        self.number.saturating_sub(1).saturating_mul(self.size)
    }

    /// `None` when the page lies beyond [`MAX_SKIP`](Page::MAX_SKIP).
    pub fn checked_skip(&self) -> Option<u64> {
        self.number
            .saturating_sub(1)
            .checked_mul(self.size)
            .filter(|skip| *skip <= Self::MAX_SKIP)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub sort: Vec<SortField>,
    pub page: Option<Page>,
}

impl ListOptions {
    pub fn with_sort(mut self, sort: impl IntoIterator<Item = SortField>) -> Self {
        self.sort.extend(sort);
        self
    }

    pub fn with_page(mut self, number: u64, size: u64) -> Self {
        self.page = Some(Page { number, size });
        self
    }

    pub fn sort_document(&self) -> Option<Document> {
        if self.sort.is_empty() {
            return None;
        }
        let mut doc = Document::new();
        for field in &self.sort {
            doc.insert(field.key.clone(), if field.ascending { 1 } else { -1 });
        }
        Some(doc)
    }
}

/// Typed persistence backend of one entity type.
#[async_trait]
pub trait EntityService<T: Entity>: Send + Sync {
    async fn find_all(&self) -> RepoResult<Vec<T>>;

    async fn find_list(&self, filter: Document, options: ListOptions) -> RepoResult<Vec<T>>;

    async fn count(&self, filter: Document) -> RepoResult<u64>;

    /// `Ok(None)` when no record has this id.
    async fn find_by_id(&self, id: ObjectId) -> RepoResult<Option<T>>;

    async fn create(&self, entity: T) -> RepoResult<T>;

    /// Sets only the given fields. An empty document is a no-op.
    async fn update_fields(&self, id: ObjectId, fields: Document) -> RepoResult<()>;

    async fn delete(&self, id: ObjectId) -> RepoResult<()>;

    /// Returns the number of deleted records.
    async fn delete_many(&self, filter: Document) -> RepoResult<u64>;
}
