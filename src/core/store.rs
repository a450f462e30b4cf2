//! Storage traits for document collections
//!
//! Implementations provide the four access shapes the core relies on
//! (fetch-all, fetch-one, fetch-by-field and writes) for a specific
//! record type. The core is agnostic to the underlying document store.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::core::record::Record;

/// Storage contract for one record collection.
#[async_trait]
pub trait DocumentStore<T: Record>: Send + Sync {
    /// Fetch the full collection
    async fn fetch_all(&self) -> Result<Vec<T>>;

    /// Fetch a record by ID
    async fn fetch_one(&self, id: &Uuid) -> Result<Option<T>>;

    /// Fetch the first record whose named field equals `value`
    async fn fetch_by_field(&self, field: &str, value: &str) -> Result<Option<T>>;

    /// Insert a new record
    async fn insert(&self, record: T) -> Result<T>;

    /// Replace an existing record
    async fn update(&self, id: &Uuid, record: T) -> Result<T>;

    /// Delete a record
    async fn delete(&self, id: &Uuid) -> Result<()>;
}

/// Lockout-counter operations on the account collection.
///
/// Both writes are atomic at the storage layer: callers never compute
/// the next counter value from a previously read record, so concurrent
/// attempts against one account cannot lose updates.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Increment the failed-attempt counter and stamp the attempt time.
    async fn record_failed_login(&self, email: &str, at: DateTime<Utc>) -> Result<()>;

    /// Reset the counter to zero and stamp the attempt time.
    async fn reset_login_attempts(&self, email: &str, at: DateTime<Utc>) -> Result<()>;
}
