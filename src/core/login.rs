//! The login flow: lockout guard in front of credential verification
//!
//! One pass per attempt: fetch the account, classify it against the
//! [`LockoutPolicy`], then verify the password and record the outcome
//! through the store's atomic counter operations. Locked accounts are
//! rejected before any password work happens.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::core::error::{ApiError, ApiResult};
use crate::core::lockout::{LockoutPolicy, LockoutStatus};
use crate::core::password;
use crate::core::record::Record;
use crate::core::store::{AccountStore, DocumentStore};

/// Trait for records that can authenticate.
pub trait Account: Record {
    fn email(&self) -> &str;
    fn password_hash(&self) -> &str;
    fn login_attempts(&self) -> u32;
    fn last_attempt_at(&self) -> Option<DateTime<Utc>>;
}

/// Combined storage view the login flow needs: document access plus the
/// atomic lockout-counter operations.
pub trait AccountDirectory<A: Account>: DocumentStore<A> + AccountStore {}

impl<A: Account, S: DocumentStore<A> + AccountStore> AccountDirectory<A> for S {}

/// Rate-limited credential checker for one account collection.
pub struct LoginGuard<A: Account> {
    store: Arc<dyn AccountDirectory<A>>,
    policy: LockoutPolicy,
}

impl<A: Account> LoginGuard<A> {
    pub fn new(store: Arc<dyn AccountDirectory<A>>, policy: LockoutPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> LockoutPolicy {
        self.policy
    }

    /// Attempt a login at the current time.
    pub async fn attempt_login(&self, email: &str, supplied_password: &str) -> ApiResult<A> {
        self.attempt_login_at(email, supplied_password, Utc::now())
            .await
    }

    /// Clock-injected attempt, exercised directly by tests.
    ///
    /// # Errors
    ///
    /// - [`ApiError::LockedOut`] while the lockout window is active;
    ///   the password is not checked and no state changes.
    /// - [`ApiError::InvalidCredentials`] on a wrong password or an
    ///   unknown email; the two are indistinguishable to the caller.
    pub async fn attempt_login_at(
        &self,
        email: &str,
        supplied_password: &str,
        now: DateTime<Utc>,
    ) -> ApiResult<A> {
        let Some(account) = self.store.fetch_by_field("email", email).await? else {
            // Unknown accounts must look like a wrong password: burn a
            // verification so timing matches, then answer identically.
            password::verify_sham(supplied_password);
            tracing::debug!(email, "login attempt for unknown account");
            return Err(ApiError::InvalidCredentials);
        };

        match self
            .policy
            .status(account.login_attempts(), account.last_attempt_at(), now)
        {
            LockoutStatus::Locked { remaining_minutes } => {
                tracing::info!(email, remaining_minutes, "login rejected: account locked");
                return Err(ApiError::LockedOut { remaining_minutes });
            }
            LockoutStatus::Expired => {
                self.store.reset_login_attempts(email, now).await?;
            }
            LockoutStatus::Open => {}
        }

        if password::verify(supplied_password, account.password_hash())? {
            self.store.reset_login_attempts(email, now).await?;
            tracing::info!(email, "login succeeded");
            Ok(account)
        } else {
            self.store.record_failed_login(email, now).await?;
            tracing::info!(email, "login failed: wrong password");
            Err(ApiError::InvalidCredentials)
        }
    }
}
