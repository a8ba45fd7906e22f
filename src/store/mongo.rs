//! MongoDB-backed song store.

use async_trait::async_trait;
use bson::{Document, doc};
use futures::stream::TryStreamExt;
use mongodb::error::{Error, ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, IndexModel};
use tracing::info;

use crate::config::Config;

use super::{SongStore, StoreError, UpdateOutcome};

const DB_NAME: &str = "songs";
const COLLECTION_NAME: &str = "songs";

#[derive(Clone)]
pub struct MongoStore {
    collection: Collection<Document>,
}

impl MongoStore {
    /// Connect and ping so that bad hosts or credentials fail at startup
    /// instead of on the first request.
    pub async fn connect(config: &Config) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(config.mongo_url())
            .await
            .map_err(map_err)?;
        let db = client.database(DB_NAME);
        db.run_command(doc! {"ping": 1}).await.map_err(map_err)?;
        info!("connected to mongodb at {}", config.mongodb_service);
        Ok(MongoStore {
            collection: db.collection(COLLECTION_NAME),
        })
    }
}

#[async_trait]
impl SongStore for MongoStore {
    async fn count(&self) -> Result<u64, StoreError> {
        self.collection.count_documents(doc! {}).await.map_err(map_err)
    }

    async fn find_all(&self) -> Result<Vec<Document>, StoreError> {
        let cursor = self.collection.find(doc! {}).await.map_err(map_err)?;
        cursor.try_collect().await.map_err(map_err)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Document>, StoreError> {
        self.collection
            .find_one(doc! {"id": id})
            .await
            .map_err(map_err)
    }

    async fn insert(&self, song: Document) -> Result<String, StoreError> {
        match self.collection.insert_one(song).await {
            Ok(result) => Ok(result
                .inserted_id
                .as_object_id()
                .map(|oid| oid.to_hex())
                .unwrap_or_else(|| result.inserted_id.to_string())),
            Err(err) if is_duplicate_key(&err) => Err(StoreError::Duplicate),
            Err(err) => Err(map_err(err)),
        }
    }

    async fn update(&self, id: i64, fields: Document) -> Result<UpdateOutcome, StoreError> {
        let result = self
            .collection
            .update_one(doc! {"id": id}, doc! {"$set": fields})
            .await
            .map_err(map_err)?;
        Ok(UpdateOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let result = self
            .collection
            .delete_one(doc! {"id": id})
            .await
            .map_err(map_err)?;
        Ok(result.deleted_count > 0)
    }

    async fn reseed(&self, songs: Vec<Document>) -> Result<(), StoreError> {
        self.collection.drop().await.map_err(map_err)?;
        if !songs.is_empty() {
            self.collection.insert_many(songs).await.map_err(map_err)?;
        }
        // Unique index on the application-level id closes the window between
        // the pre-insert existence check and the insert itself.
        let index = IndexModel::builder()
            .keys(doc! {"id": 1})
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection.create_index(index).await.map_err(map_err)?;
        Ok(())
    }
}

fn is_duplicate_key(err: &Error) -> bool {
    matches!(
        &*err.kind,
        ErrorKind::Write(WriteFailure::WriteError(write_err)) if write_err.code == 11000
    )
}

fn map_err(err: Error) -> StoreError {
    match &*err.kind {
        ErrorKind::ServerSelection { .. } => StoreError::Unavailable(err.to_string()),
        _ => StoreError::Backend(err.to_string()),
    }
}
