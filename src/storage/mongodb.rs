//! MongoDB storage backend using the official MongoDB async driver.
//!
//! Provides `MongoStore<T>` implementing the document-store contract
//! backed by a MongoDB database via `mongodb::Database`.
//!
//! # Feature flag
//!
//! This module is gated behind the `mongodb_backend` feature flag:
//! ```toml
//! [dependencies]
//! storefront-rs = { version = "0.1", features = ["mongodb_backend"] }
//! ```
//!
//! # Storage model
//!
//! Collection-per-resource: each `MongoStore<T>` operates on the
//! collection named by `T::collection_name()` ("users", "products",
//! "purchases").
//!
//! # Serialization strategy
//!
//! Records are serialized via `serde_json::Value` as an intermediate
//! format, then converted to BSON documents. This keeps UUIDs (stored
//! as strings) and timestamps (stored as RFC 3339 strings) consistent
//! between backends. The `id` field is mapped to MongoDB's `_id`
//! convention.
//!
//! # Lockout counters
//!
//! The account operations use `$inc`/`$set` in a single `update_one`,
//! so counter changes are atomic on the server and concurrent login
//! attempts cannot lose updates.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use futures::TryStreamExt;
use mongodb::Database;
use mongodb::bson::{Bson, Document, doc};
use uuid::Uuid;

use crate::core::record::Record;
use crate::core::store::{AccountStore, DocumentStore};
use crate::entities::user::User;

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

/// Convert a serde_json::Value (expected to be an Object) into a BSON Document,
/// renaming `id` → `_id` for MongoDB convention.
fn json_to_document(json: serde_json::Value) -> Result<Document> {
    let bson_val = mongodb::bson::to_bson(&json)
        .map_err(|e| anyhow!("Failed to convert JSON to BSON: {}", e))?;

    let mut doc = match bson_val {
        Bson::Document(d) => d,
        _ => return Err(anyhow!("Expected BSON document, got non-object")),
    };

    if let Some(id) = doc.remove("id") {
        doc.insert("_id", id);
    }

    Ok(doc)
}

/// Convert a BSON Document back into a serde_json::Value,
/// renaming `_id` → `id` for domain record convention.
fn document_to_json(mut doc: Document) -> serde_json::Value {
    if let Some(id) = doc.remove("_id") {
        doc.insert("id", id);
    }

    Bson::Document(doc).into_relaxed_extjson()
}

/// Convert a UUID to its BSON string representation for queries.
fn uuid_bson(id: &Uuid) -> Bson {
    Bson::String(id.to_string())
}

/// Render a timestamp the way record serialization does.
fn timestamp_bson(at: DateTime<Utc>) -> Bson {
    Bson::String(at.to_rfc3339_opts(SecondsFormat::Micros, true))
}

// ---------------------------------------------------------------------------
// MongoStore<T>
// ---------------------------------------------------------------------------

/// Generic document store backed by MongoDB.
///
/// # Example
///
/// ```rust,ignore
/// use mongodb::Client;
/// use storefront::storage::MongoStore;
///
/// let client = Client::with_uri_str("mongodb://localhost:27017").await?;
/// let db = client.database("storefront");
/// let products = MongoStore::<Product>::new(db);
/// ```
#[derive(Clone, Debug)]
pub struct MongoStore<T> {
    database: Database,
    _marker: std::marker::PhantomData<T>,
}

impl<T> MongoStore<T> {
    /// Create a new `MongoStore` with the given database handle.
    pub fn new(database: Database) -> Self {
        Self {
            database,
            _marker: std::marker::PhantomData,
        }
    }

    /// Get a reference to the underlying database.
    pub fn database(&self) -> &Database {
        &self.database
    }
}

impl<T: Record> MongoStore<T> {
    fn collection(&self) -> mongodb::Collection<Document> {
        self.database.collection(T::collection_name())
    }

    fn record_to_document(record: &T) -> Result<Document> {
        let json = serde_json::to_value(record)
            .map_err(|e| anyhow!("Failed to serialize record: {}", e))?;
        json_to_document(json)
    }

    fn document_to_record(doc: Document) -> Result<T> {
        let json = document_to_json(doc);
        serde_json::from_value(json)
            .map_err(|e| anyhow!("Failed to deserialize record from document: {}", e))
    }
}

#[async_trait]
impl<T: Record> DocumentStore<T> for MongoStore<T> {
    /// List the full collection, ordered by creation time.
    async fn fetch_all(&self) -> Result<Vec<T>> {
        let cursor = self
            .collection()
            .find(doc! {})
            .sort(doc! { "created_at": 1 })
            .await
            .map_err(|e| anyhow!("Failed to list records: {}", e))?;

        let docs: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| anyhow!("Failed to collect records: {}", e))?;

        docs.into_iter().map(Self::document_to_record).collect()
    }

    /// Fetch a record by UUID. Returns `Ok(None)` on a miss.
    async fn fetch_one(&self, id: &Uuid) -> Result<Option<T>> {
        let doc = self
            .collection()
            .find_one(doc! { "_id": uuid_bson(id) })
            .await
            .map_err(|e| anyhow!("Failed to get record: {}", e))?;

        match doc {
            Some(d) => Ok(Some(Self::document_to_record(d)?)),
            None => Ok(None),
        }
    }

    /// Fetch the first record whose named field equals `value`.
    async fn fetch_by_field(&self, field: &str, value: &str) -> Result<Option<T>> {
        let doc = self
            .collection()
            .find_one(doc! { field: value })
            .await
            .map_err(|e| anyhow!("Failed to fetch record by field: {}", e))?;

        match doc {
            Some(d) => Ok(Some(Self::document_to_record(d)?)),
            None => Ok(None),
        }
    }

    /// Insert the record and read it back to return the stored version.
    async fn insert(&self, record: T) -> Result<T> {
        let doc = Self::record_to_document(&record)?;
        let id_bson = uuid_bson(&record.id());

        self.collection()
            .insert_one(doc)
            .await
            .map_err(|e| anyhow!("Failed to insert record: {}", e))?;

        let stored = self
            .collection()
            .find_one(doc! { "_id": id_bson })
            .await
            .map_err(|e| anyhow!("Failed to read back inserted record: {}", e))?
            .ok_or_else(|| anyhow!("Record not found after insert"))?;

        Self::document_to_record(stored)
    }

    /// Replace an existing record.
    ///
    /// Returns `Err` if no document matched.
    async fn update(&self, id: &Uuid, record: T) -> Result<T> {
        let doc = Self::record_to_document(&record)?;
        let id_bson = uuid_bson(id);

        let result = self
            .collection()
            .replace_one(doc! { "_id": &id_bson }, doc)
            .await
            .map_err(|e| anyhow!("Failed to update record: {}", e))?;

        if result.matched_count == 0 {
            return Err(anyhow!("Record not found: {}", id));
        }

        let stored = self
            .collection()
            .find_one(doc! { "_id": id_bson })
            .await
            .map_err(|e| anyhow!("Failed to read back updated record: {}", e))?
            .ok_or_else(|| anyhow!("Record not found after update"))?;

        Self::document_to_record(stored)
    }

    /// Delete a record by UUID. Silently succeeds on a miss (idempotent).
    async fn delete(&self, id: &Uuid) -> Result<()> {
        self.collection()
            .delete_one(doc! { "_id": uuid_bson(id) })
            .await
            .map_err(|e| anyhow!("Failed to delete record: {}", e))?;

        Ok(())
    }
}

#[async_trait]
impl AccountStore for MongoStore<User> {
    /// Single server-side `$inc` + `$set`; never read-modify-write.
    async fn record_failed_login(&self, email: &str, at: DateTime<Utc>) -> Result<()> {
        let result = self
            .collection()
            .update_one(
                doc! { "email": email },
                doc! {
                    "$inc": { "login_attempts": 1_i64 },
                    "$set": { "last_attempt_at": timestamp_bson(at) },
                },
            )
            .await
            .map_err(|e| anyhow!("Failed to record failed login: {}", e))?;

        if result.matched_count == 0 {
            return Err(anyhow!("Account not found: {}", email));
        }

        Ok(())
    }

    async fn reset_login_attempts(&self, email: &str, at: DateTime<Utc>) -> Result<()> {
        let result = self
            .collection()
            .update_one(
                doc! { "email": email },
                doc! {
                    "$set": {
                        "login_attempts": 0_i64,
                        "last_attempt_at": timestamp_bson(at),
                    },
                },
            )
            .await
            .map_err(|e| anyhow!("Failed to reset login attempts: {}", e))?;

        if result.matched_count == 0 {
            return Err(anyhow!("Account not found: {}", email));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_to_document_renames_id_to_underscore_id() {
        let input = json!({"id": "abc", "name": "test"});
        let doc = json_to_document(input).unwrap();

        assert!(doc.contains_key("_id"), "document should contain _id");
        assert!(!doc.contains_key("id"), "document should not contain id");
        assert_eq!(doc.get_str("_id").unwrap(), "abc");
    }

    #[test]
    fn json_to_document_non_object_returns_error() {
        let input = json!("string");
        let result = json_to_document(input);

        assert!(result.is_err());
        let err_msg = result.unwrap_err().to_string();
        assert!(
            err_msg.contains("non-object"),
            "error should mention non-object, got: {err_msg}"
        );
    }

    #[test]
    fn document_to_json_renames_underscore_id_to_id() {
        let doc = doc! { "_id": "abc", "name": "test" };
        let json = document_to_json(doc);

        assert_eq!(json["id"], "abc");
        assert!(json.get("_id").is_none(), "json should not contain _id");
    }

    #[test]
    fn json_document_roundtrip() {
        let original = json!({"id": "round", "name": "trip", "attempts": 3});
        let doc = json_to_document(original).unwrap();
        let back = document_to_json(doc);

        assert_eq!(back["id"], "round");
        assert_eq!(back["name"], "trip");
        assert_eq!(back["attempts"], 3);
        assert!(back.get("_id").is_none());
    }

    #[test]
    fn user_document_roundtrip() {
        let user = User::new(
            "Amy".to_string(),
            "amy@example.com".to_string(),
            "$argon2$...".to_string(),
        );

        let doc = MongoStore::<User>::record_to_document(&user).unwrap();
        assert_eq!(doc.get_str("_id").unwrap(), user.id.to_string());

        let back = MongoStore::<User>::document_to_record(doc).unwrap();
        assert_eq!(back.id, user.id);
        assert_eq!(back.email, user.email);
        assert_eq!(back.login_attempts, 0);
    }

    #[test]
    fn timestamp_bson_is_parseable_rfc3339() {
        let at = Utc::now();
        let Bson::String(rendered) = timestamp_bson(at) else {
            panic!("expected Bson::String");
        };
        let parsed: DateTime<Utc> = rendered.parse().unwrap();
        assert_eq!(
            parsed.timestamp_micros(),
            at.timestamp_micros()
        );
    }
}
