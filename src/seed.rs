//! Default data seeding
//!
//! Creates the default administrator account and a sample product when
//! their collections are empty, so a fresh deployment is immediately
//! usable.

use anyhow::Result;

use crate::core::password;
use crate::entities::product::Product;
use crate::entities::user::User;
use crate::server::state::AppState;

const DEFAULT_ADMIN_NAME: &str = "Administrator";
const DEFAULT_ADMIN_EMAIL: &str = "admin@example.com";
const DEFAULT_ADMIN_PASSWORD: &str = "123456";

/// Seed the default administrator and sample product.
///
/// Idempotent: existing data is left untouched.
pub async fn seed_defaults(state: &AppState) -> Result<()> {
    if state
        .users
        .fetch_by_field("email", DEFAULT_ADMIN_EMAIL)
        .await?
        .is_none()
    {
        let digest = password::hash(DEFAULT_ADMIN_PASSWORD)?;
        state
            .users
            .insert(User::new(
                DEFAULT_ADMIN_NAME.to_string(),
                DEFAULT_ADMIN_EMAIL.to_string(),
                digest,
            ))
            .await?;
        tracing::info!(email = DEFAULT_ADMIN_EMAIL, "created default administrator");
    }

    if state.products.fetch_all().await?.is_empty() {
        state
            .products
            .insert(Product::new(
                "SAMPLE-001".to_string(),
                "Sample Product".to_string(),
                "Example Brand".to_string(),
                10_000.0,
                "Example Category".to_string(),
            ))
            .await?;
        tracing::info!("created sample product");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::lockout::LockoutPolicy;

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let state = AppState::in_memory(LockoutPolicy::default());

        seed_defaults(&state).await.unwrap();
        seed_defaults(&state).await.unwrap();

        let users = state.users.fetch_all().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].email, DEFAULT_ADMIN_EMAIL);

        let products = state.products.fetch_all().await.unwrap();
        assert_eq!(products.len(), 1);
    }

    #[tokio::test]
    async fn test_seeded_admin_password_verifies() {
        let state = AppState::in_memory(LockoutPolicy::default());
        seed_defaults(&state).await.unwrap();

        let admin = state
            .users
            .fetch_by_field("email", DEFAULT_ADMIN_EMAIL)
            .await
            .unwrap()
            .unwrap();
        assert!(password::verify(DEFAULT_ADMIN_PASSWORD, &admin.password_hash).unwrap());
    }
}
