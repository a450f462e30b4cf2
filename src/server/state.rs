//! Shared application state

use std::sync::Arc;

use crate::core::lockout::LockoutPolicy;
use crate::core::login::{AccountDirectory, LoginGuard};
use crate::core::store::DocumentStore;
use crate::entities::{Product, Purchase, User};
use crate::storage::InMemoryStore;

/// Handler state: one store per resource collection plus the login
/// guard in front of the user store.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn AccountDirectory<User>>,
    pub products: Arc<dyn DocumentStore<Product>>,
    pub purchases: Arc<dyn DocumentStore<Purchase>>,
    pub login: Arc<LoginGuard<User>>,
}

impl AppState {
    pub fn new(
        users: Arc<dyn AccountDirectory<User>>,
        products: Arc<dyn DocumentStore<Product>>,
        purchases: Arc<dyn DocumentStore<Purchase>>,
        lockout: LockoutPolicy,
    ) -> Self {
        let login = Arc::new(LoginGuard::new(users.clone(), lockout));
        Self {
            users,
            products,
            purchases,
            login,
        }
    }

    /// Fully in-memory state: the default backend, and what the tests
    /// run against.
    pub fn in_memory(lockout: LockoutPolicy) -> Self {
        Self::new(
            Arc::new(InMemoryStore::<User>::new()),
            Arc::new(InMemoryStore::<Product>::new()),
            Arc::new(InMemoryStore::<Purchase>::new()),
            lockout,
        )
    }
}
