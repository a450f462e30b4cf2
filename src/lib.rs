//! # Storefront
//!
//! A CRUD marketplace backend exposing users, products and purchases
//! over HTTP, backed by a document store.
//!
//! ## Features
//!
//! - **Generic list-query pipeline**: one search/sort/paginate pass
//!   serves every resource, parameterized by a searchable-field set and
//!   a projector
//! - **Login lockout guard**: failed-attempt threshold with a timed
//!   cooldown, backed by atomic counter updates in the store
//! - **Pluggable storage**: in-memory backend by default, MongoDB
//!   behind the `mongodb_backend` feature
//! - **Typed errors**: precise status codes and stable error codes on
//!   the whole HTTP surface
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use storefront::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = AppConfig::load()?;
//!     let state = AppState::in_memory(config.lockout);
//!
//!     seed_defaults(&state).await?;
//!     serve(&config, state).await
//! }
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod seed;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        error::{ApiError, ApiResult},
        lockout::{LockoutPolicy, LockoutStatus},
        login::{Account, LoginGuard},
        query::{QueryRequest, QueryResult, SortOrder, query},
        record::{Record, Searchable},
        store::{AccountStore, DocumentStore},
    };

    // === Entities ===
    pub use crate::entities::{
        Product, ProductSummary, Purchase, PurchaseDetail, PurchaseSummary, User, UserSummary,
    };

    // === Storage ===
    pub use crate::storage::InMemoryStore;
    #[cfg(feature = "mongodb_backend")]
    pub use crate::storage::MongoStore;

    // === Config / server / seed ===
    pub use crate::config::AppConfig;
    pub use crate::seed::seed_defaults;
    pub use crate::server::{AppState, build_router, serve};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}
