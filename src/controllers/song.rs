//! Operation logic for the songs collection, written against the store
//! trait so handlers stay thin and the logic is testable without a live
//! database.

use serde_json::Value;

use crate::error::ApiError;
use crate::models::song::{InsertedId, SongCount, SongList, json_safe};
use crate::store::{SongStore, StoreError};

const NOT_FOUND_MESSAGE: &str = "song with id not found";

pub async fn count(store: &dyn SongStore) -> Result<SongCount, ApiError> {
    Ok(SongCount {
        count: store.count().await?,
    })
}

pub async fn list(store: &dyn SongStore) -> Result<SongList, ApiError> {
    let songs = store.find_all().await?.iter().map(json_safe).collect();
    Ok(SongList { songs })
}

pub async fn get(store: &dyn SongStore, id: i64) -> Result<Value, ApiError> {
    store
        .find_by_id(id)
        .await?
        .map(|song| json_safe(&song))
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND_MESSAGE.to_string()))
}

pub async fn create(store: &dyn SongStore, body: Value) -> Result<InsertedId, ApiError> {
    let id = body.get("id").and_then(Value::as_i64).ok_or_else(|| {
        ApiError::InvalidInput("Bad request. JSON data and 'id' field are required.".to_string())
    })?;

    // The friendly-message check; the store's unique index on `id` is what
    // actually closes the race against a concurrent create.
    if store.find_by_id(id).await?.is_some() {
        return Err(conflict(id));
    }

    let song = bson::to_document(&body)
        .map_err(|err| ApiError::InvalidInput(format!("malformed song document: {err}")))?;

    match store.insert(song).await {
        Ok(inserted_id) => Ok(InsertedId { inserted_id }),
        Err(StoreError::Duplicate) => Err(conflict(id)),
        Err(err) => Err(err.into()),
    }
}

/// Field-merge update. `Ok(Some(_))` carries the refreshed document;
/// `Ok(None)` means the song exists but no field actually changed.
pub async fn update(
    store: &dyn SongStore,
    id: i64,
    body: Value,
) -> Result<Option<Value>, ApiError> {
    // An empty object is as useless as no body at all; rejecting it here
    // also spares the store an empty $set, which MongoDB refuses.
    match body.as_object() {
        Some(fields) if !fields.is_empty() => {}
        _ => {
            return Err(ApiError::InvalidInput(
                "Bad request. JSON data is required.".to_string(),
            ));
        }
    }

    if store.find_by_id(id).await?.is_none() {
        return Err(ApiError::NotFound(NOT_FOUND_MESSAGE.to_string()));
    }

    let fields = bson::to_document(&body)
        .map_err(|err| ApiError::InvalidInput(format!("malformed song document: {err}")))?;

    let outcome = store.update(id, fields).await?;
    if outcome.modified == 0 {
        return Ok(None);
    }
    Ok(store.find_by_id(id).await?.map(|song| json_safe(&song)))
}

pub async fn delete(store: &dyn SongStore, id: i64) -> Result<(), ApiError> {
    if store.delete(id).await? {
        Ok(())
    } else {
        Err(ApiError::NotFound("song not found".to_string()))
    }
}

fn conflict(id: i64) -> ApiError {
    ApiError::Conflict(format!("song with id {id} already present"))
}
