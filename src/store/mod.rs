//! Document-store boundary for the `songs` collection.

use std::path::Path;

use anyhow::Context;
use async_trait::async_trait;
use bson::{Bson, Document};
use thiserror::Error;

pub mod memory;
pub mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate song id")]
    Duplicate,

    #[error("store unreachable: {0}")]
    Unavailable(String),

    #[error("{0}")]
    Backend(String),
}

/// Counts reported by an update: how many documents matched the id filter
/// and how many actually changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
}

/// CRUD operations over the songs collection, keyed by the application-level
/// integer `id` field (distinct from the store's own `_id`).
#[async_trait]
pub trait SongStore: Send + Sync {
    async fn count(&self) -> Result<u64, StoreError>;

    async fn find_all(&self) -> Result<Vec<Document>, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Document>, StoreError>;

    /// Insert one song, returning the store-native id as a string. Fails with
    /// `StoreError::Duplicate` when the unique index on `id` is violated.
    async fn insert(&self, song: Document) -> Result<String, StoreError>;

    /// Merge `fields` into the document with the given id ($set semantics).
    async fn update(&self, id: i64, fields: Document) -> Result<UpdateOutcome, StoreError>;

    /// Delete by id, reporting whether a document was actually removed.
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;

    /// Drop whatever the collection holds and bulk-insert `songs` in its place.
    async fn reseed(&self, songs: Vec<Document>) -> Result<(), StoreError>;
}

/// Application-level id of a song document, tolerating both integer widths
/// the store may hand back.
pub(crate) fn song_id(doc: &Document) -> Option<i64> {
    match doc.get("id") {
        Some(Bson::Int32(v)) => Some(i64::from(*v)),
        Some(Bson::Int64(v)) => Some(*v),
        _ => None,
    }
}

pub fn parse_seed(raw: &str) -> anyhow::Result<Vec<Document>> {
    let values: Vec<serde_json::Value> =
        serde_json::from_str(raw).context("seed file is not a JSON array")?;
    values
        .iter()
        .map(|value| bson::to_document(value).context("seed entry is not a JSON object"))
        .collect()
}

pub fn load_seed(path: &Path) -> anyhow::Result<Vec<Document>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading seed file {}", path.display()))?;
    parse_seed(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn parse_seed_accepts_an_array_of_objects() {
        let docs = parse_seed(r#"[{"id": 1, "title": "A"}, {"id": 2, "title": "B"}]"#).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(song_id(&docs[0]), Some(1));
        assert_eq!(docs[1].get_str("title").unwrap(), "B");
    }

    #[test]
    fn parse_seed_rejects_non_array_input() {
        assert!(parse_seed(r#"{"id": 1}"#).is_err());
        assert!(parse_seed("not json").is_err());
    }

    #[test]
    fn song_id_reads_both_integer_widths() {
        assert_eq!(song_id(&doc! {"id": 7_i32}), Some(7));
        assert_eq!(song_id(&doc! {"id": 7_i64}), Some(7));
        assert_eq!(song_id(&doc! {"id": "seven"}), None);
        assert_eq!(song_id(&doc! {"title": "no id"}), None);
    }
}
