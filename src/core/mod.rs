//! Core abstractions: records, storage contract, query pipeline,
//! lockout guard, errors

pub mod error;
pub mod lockout;
pub mod login;
pub mod password;
pub mod query;
pub mod record;
pub mod store;

pub use error::{ApiError, ApiResult, ValidationError};
pub use lockout::{LockoutPolicy, LockoutStatus};
pub use login::{Account, AccountDirectory, LoginGuard};
pub use query::{PageRequest, QueryRequest, QueryResult, SortOrder, query};
pub use record::{Record, Searchable};
pub use store::{AccountStore, DocumentStore};
