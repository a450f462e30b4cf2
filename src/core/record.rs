//! Record traits defining the core abstraction for all stored resources

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

/// Base trait for every persisted record in the system.
///
/// All records have:
/// - id: unique identifier
/// - created_at / updated_at: managed timestamps
/// - field_text: textual access to named fields, used by field-keyed
///   lookups and by the query pipeline
pub trait Record: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// The collection this record type is stored in (e.g., "users")
    fn collection_name() -> &'static str;

    /// Get the unique identifier for this record
    fn id(&self) -> Uuid;

    /// Get the creation timestamp
    fn created_at(&self) -> DateTime<Utc>;

    /// Get the last update timestamp
    fn updated_at(&self) -> DateTime<Utc>;

    /// Textual value of a named field.
    ///
    /// Returns `None` for unknown fields and for fields without a
    /// textual representation; callers treat that as "no value", never
    /// as an error.
    fn field_text(&self, field: &str) -> Option<String>;
}

/// Trait for records that can be served by the list-query pipeline.
pub trait Searchable: Record {
    /// Fields eligible for substring search matching
    fn searchable_fields() -> &'static [&'static str];

    /// Sort field used when the request does not name one
    fn default_sort_field() -> &'static str;
}
