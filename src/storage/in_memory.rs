//! In-memory implementation of the document-store contract
//!
//! Default backend, used for development and tests. Uses RwLock for
//! thread-safe access; the lockout-counter operations mutate under the
//! write lock, so they are atomic within the process.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::core::record::Record;
use crate::core::store::{AccountStore, DocumentStore};
use crate::entities::user::User;

/// Generic in-memory collection for one record type.
#[derive(Clone)]
pub struct InMemoryStore<T> {
    records: Arc<RwLock<HashMap<Uuid, T>>>,
}

impl<T: Record> InMemoryStore<T> {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<T: Record> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Record> DocumentStore<T> for InMemoryStore<T> {
    async fn fetch_all(&self) -> Result<Vec<T>> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        // Insertion order, so list results are deterministic
        let mut all: Vec<T> = records.values().cloned().collect();
        all.sort_by_key(|r| r.created_at());

        Ok(all)
    }

    async fn fetch_one(&self, id: &Uuid) -> Result<Option<T>> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(records.get(id).cloned())
    }

    async fn fetch_by_field(&self, field: &str, value: &str) -> Result<Option<T>> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(records
            .values()
            .find(|r| r.field_text(field).as_deref() == Some(value))
            .cloned())
    }

    async fn insert(&self, record: T) -> Result<T> {
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        records.insert(record.id(), record.clone());

        Ok(record)
    }

    async fn update(&self, id: &Uuid, record: T) -> Result<T> {
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        if !records.contains_key(id) {
            return Err(anyhow!("Record not found: {}", id));
        }

        records.insert(*id, record.clone());

        Ok(record)
    }

    async fn delete(&self, id: &Uuid) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        records.remove(id);

        Ok(())
    }
}

#[async_trait]
impl AccountStore for InMemoryStore<User> {
    async fn record_failed_login(&self, email: &str, at: DateTime<Utc>) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let user = records
            .values_mut()
            .find(|u| u.email == email)
            .ok_or_else(|| anyhow!("Account not found: {}", email))?;

        user.login_attempts += 1;
        user.last_attempt_at = Some(at);

        Ok(())
    }

    async fn reset_login_attempts(&self, email: &str, at: DateTime<Utc>) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let user = records
            .values_mut()
            .find(|u| u.email == email)
            .ok_or_else(|| anyhow!("Account not found: {}", email))?;

        user.login_attempts = 0;
        user.last_attempt_at = Some(at);

        Ok(())
    }
}
