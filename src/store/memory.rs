//! In-memory song store for tests and local development. Clone-friendly
//! via Arc; insertion order is preserved, like the real collection's
//! natural order.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use bson::Document;
use bson::oid::ObjectId;

use super::{SongStore, StoreError, UpdateOutcome, song_id};

#[derive(Clone, Default)]
pub struct MemoryStore {
    songs: Arc<RwLock<Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Document>>, StoreError> {
        self.songs
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<Document>>, StoreError> {
        self.songs
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))
    }
}

/// Give a document a store-native `_id`, like the real driver does on insert.
fn ensure_object_id(song: &mut Document) -> ObjectId {
    match song.get_object_id("_id") {
        Ok(oid) => oid,
        Err(_) => {
            let oid = ObjectId::new();
            song.insert("_id", oid);
            oid
        }
    }
}

#[async_trait]
impl SongStore for MemoryStore {
    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.read()?.len() as u64)
    }

    async fn find_all(&self) -> Result<Vec<Document>, StoreError> {
        Ok(self.read()?.clone())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Document>, StoreError> {
        Ok(self
            .read()?
            .iter()
            .find(|doc| song_id(doc) == Some(id))
            .cloned())
    }

    async fn insert(&self, mut song: Document) -> Result<String, StoreError> {
        let mut songs = self.write()?;
        if let Some(id) = song_id(&song) {
            if songs.iter().any(|doc| song_id(doc) == Some(id)) {
                return Err(StoreError::Duplicate);
            }
        }
        let oid = ensure_object_id(&mut song);
        songs.push(song);
        Ok(oid.to_hex())
    }

    async fn update(&self, id: i64, fields: Document) -> Result<UpdateOutcome, StoreError> {
        let mut songs = self.write()?;
        let Some(doc) = songs.iter_mut().find(|doc| song_id(doc) == Some(id)) else {
            return Ok(UpdateOutcome {
                matched: 0,
                modified: 0,
            });
        };
        let before = doc.clone();
        for (key, value) in fields {
            doc.insert(key, value);
        }
        Ok(UpdateOutcome {
            matched: 1,
            modified: u64::from(*doc != before),
        })
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let mut songs = self.write()?;
        match songs.iter().position(|doc| song_id(doc) == Some(id)) {
            Some(index) => {
                songs.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn reseed(&self, songs: Vec<Document>) -> Result<(), StoreError> {
        let seeded = songs
            .into_iter()
            .map(|mut song| {
                ensure_object_id(&mut song);
                song
            })
            .collect();
        *self.write()? = seeded;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    async fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        let songs = vec![
            doc! {"id": 1_i64, "title": "A"},
            doc! {"id": 2_i64, "title": "B"},
        ];
        store.reseed(songs).await.unwrap();
        store
    }

    #[tokio::test]
    async fn reseed_replaces_content_and_assigns_object_ids() {
        let store = seeded().await;
        assert_eq!(store.count().await.unwrap(), 2);
        let all = store.find_all().await.unwrap();
        assert!(all.iter().all(|doc| doc.get_object_id("_id").is_ok()));

        store.reseed(vec![doc! {"id": 9_i64}]).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_ids() {
        let store = seeded().await;
        let err = store.insert(doc! {"id": 1_i64, "title": "dup"}).await;
        assert!(matches!(err, Err(StoreError::Duplicate)));
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn insert_returns_hex_object_id() {
        let store = MemoryStore::new();
        let hex = store.insert(doc! {"id": 5_i64}).await.unwrap();
        assert_eq!(hex.len(), 24);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn update_merges_without_touching_other_fields() {
        let store = MemoryStore::new();
        store
            .insert(doc! {"id": 1_i64, "title": "A", "artist": "Someone"})
            .await
            .unwrap();

        let outcome = store.update(1, doc! {"title": "New"}).await.unwrap();
        assert_eq!(
            outcome,
            UpdateOutcome {
                matched: 1,
                modified: 1
            }
        );

        let song = store.find_by_id(1).await.unwrap().unwrap();
        assert_eq!(song.get_str("title").unwrap(), "New");
        assert_eq!(song.get_str("artist").unwrap(), "Someone");
    }

    #[tokio::test]
    async fn update_with_identical_fields_reports_nothing_modified() {
        let store = seeded().await;
        let outcome = store.update(1, doc! {"title": "A"}).await.unwrap();
        assert_eq!(
            outcome,
            UpdateOutcome {
                matched: 1,
                modified: 0
            }
        );
    }

    #[tokio::test]
    async fn update_of_missing_id_matches_nothing() {
        let store = seeded().await;
        let outcome = store.update(42, doc! {"title": "X"}).await.unwrap();
        assert_eq!(
            outcome,
            UpdateOutcome {
                matched: 0,
                modified: 0
            }
        );
    }

    #[tokio::test]
    async fn delete_reports_whether_a_song_was_removed() {
        let store = seeded().await;
        assert!(store.delete(1).await.unwrap());
        assert!(!store.delete(1).await.unwrap());
        assert_eq!(store.count().await.unwrap(), 1);
    }
}
