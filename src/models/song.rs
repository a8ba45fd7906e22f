use bson::{Bson, Document};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SongCount {
    pub count: u64,
}

#[derive(Debug, Serialize)]
pub struct SongList {
    pub songs: Vec<Value>,
}

#[derive(Debug, Serialize)]
pub struct InsertedId {
    #[serde(rename = "inserted id")]
    pub inserted_id: String,
}

/// Structure-preserving transform from a stored document to JSON-safe output:
/// relaxed extended JSON, so `_id` becomes `{"$oid": "<hex>"}` and plain
/// fields pass through unchanged.
pub fn json_safe(doc: &Document) -> Value {
    Bson::from(doc.clone()).into_relaxed_extjson()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use bson::oid::ObjectId;
    use serde_json::json;

    #[test]
    fn json_safe_renders_object_ids_as_oid_wrappers() {
        let oid = ObjectId::new();
        let value = json_safe(&doc! {"_id": oid, "id": 1_i64, "title": "A"});
        assert_eq!(value["_id"]["$oid"], json!(oid.to_hex()));
        assert_eq!(value["id"], json!(1));
        assert_eq!(value["title"], json!("A"));
    }

    #[test]
    fn inserted_id_serializes_with_the_spaced_key() {
        let body = serde_json::to_value(InsertedId {
            inserted_id: "abc123".to_string(),
        })
        .unwrap();
        assert_eq!(body, json!({"inserted id": "abc123"}));
    }
}
