use crate::index_trait::MongoIndexModelProvider;
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use log::info;
use mongodb::bson::{doc, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::{error::Result, Collection, Database};
use serde::{de::DeserializeOwned, Serialize};

const DUPLICATE_KEY_CODE: i32 = 11000;

#[async_trait]
pub trait Repository<T> {
    async fn find_by_id(&self, id: &str) -> Result<Option<T>>;
    async fn insert(&self, entity: &T) -> Result<()>;
    async fn find_one(&self, filter: Document) -> Result<Option<T>>;
    async fn query(&self, filter: Document) -> Result<Vec<T>>;
    /// Returns the number of matched documents.
    async fn update_one(&self, filter: Document, update: Document) -> Result<u64>;
}

/// Generic Mongo-backed repository; entities keep their id as a string `_id`.
#[derive(Debug, Clone)]
pub struct BaseRepository<T: Send + Sync> {
    pub collection: Collection<T>,
}

impl<T: Send + Sync> BaseRepository<T> {
    pub fn new(db: &Database, collection_name: &str) -> Self {
        Self { collection: db.collection::<T>(collection_name) }
    }

    /// Creates the indexes declared on `T`. Safe to call on every startup.
    pub async fn ensure_indexes(&self) -> Result<()>
    where
        T: MongoIndexModelProvider,
    {
        let models = T::index_models();
        if models.is_empty() {
            return Ok(());
        }
        self.collection.create_indexes(models).await?;
        info!("indexes ensured on {}", self.collection.name());
        Ok(())
    }
}

#[async_trait]
impl<T> Repository<T> for BaseRepository<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync,
{
    async fn find_by_id(&self, id: &str) -> Result<Option<T>> {
        self.find_one(doc! { "_id": id }).await
    }

    async fn insert(&self, entity: &T) -> Result<()> {
        self.collection.insert_one(entity).await?;
        Ok(())
    }

    async fn find_one(&self, filter: Document) -> Result<Option<T>> {
        self.collection.find_one(filter).await
    }

    async fn query(&self, filter: Document) -> Result<Vec<T>> {
        let cursor = self.collection.find(filter).await?;
        cursor.try_collect().await
    }

    async fn update_one(&self, filter: Document, update: Document) -> Result<u64> {
        let result = self.collection.update_one(filter, update).await?;
        Ok(result.matched_count)
    }
}

/// True when a write was rejected by a unique index (server code 11000).
///
/// Needs a live server to exercise; unit tests cover the same contract
/// through the in-memory store.
pub fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(err.kind.as_ref(), ErrorKind::Write(WriteFailure::WriteError(we)) if we.code == DUPLICATE_KEY_CODE)
}
