/*
 * Responsibility
 * - EntityService backed by one MongoDB collection per entity type
 * - The collection name comes from Entity::COLLECTION
 */
use async_trait::async_trait;
use bson::{Document, doc, oid::ObjectId};
use futures::TryStreamExt;
use mongodb::{Collection, Database};

use crate::repos::{Entity, EntityService, ListOptions, RepoResult};

pub struct MongoEntityService<T: Entity> {
    collection: Collection<T>,
}

impl<T: Entity> MongoEntityService<T> {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<T>(T::COLLECTION),
        }
    }

    pub fn collection(&self) -> &Collection<T> {
        &self.collection
    }
}

impl<T: Entity> std::fmt::Debug for MongoEntityService<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MongoEntityService")
            .field("collection", &T::COLLECTION)
            .finish()
    }
}

#[async_trait]
impl<T: Entity> EntityService<T> for MongoEntityService<T> {
    async fn find_all(&self) -> RepoResult<Vec<T>> {
        let cursor = self.collection.find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_list(&self, filter: Document, options: ListOptions) -> RepoResult<Vec<T>> {
        let mut find = self.collection.find(filter);
        if let Some(sort) = options.sort_document() {
            find = find.sort(sort);
        }
        if let Some(page) = options.page {
            find = find.skip(page.skip()).limit(page.size as i64);
        }
        let cursor = find.await?;
        Ok(cursor.try_collect().await?)
    }

    async fn count(&self, filter: Document) -> RepoResult<u64> {
        Ok(self.collection.count_documents(filter).await?)
    }

    async fn find_by_id(&self, id: ObjectId) -> RepoResult<Option<T>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    async fn create(&self, mut entity: T) -> RepoResult<T> {
        if entity.id().is_none() {
            entity.set_id(ObjectId::new());
        }
        self.collection.insert_one(&entity).await?;
        Ok(entity)
    }

    async fn update_fields(&self, id: ObjectId, fields: Document) -> RepoResult<()> {
        // $set with an empty document is rejected by the server
        if fields.is_empty() {
            return Ok(());
        }
        self.collection
            .update_one(doc! { "_id": id }, doc! { "$set": fields })
            .await?;
        Ok(())
    }

    async fn delete(&self, id: ObjectId) -> RepoResult<()> {
        self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(())
    }

    async fn delete_many(&self, filter: Document) -> RepoResult<u64> {
        let result = self.collection.delete_many(filter).await?;
        Ok(result.deleted_count)
    }
}
