//! User entity: account record with credentials and lockout counters

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::core::login::Account;
use crate::core::record::{Record, Searchable};

/// A registered user account.
///
/// `password_hash` and the lockout counters are internal-only: list and
/// detail endpoints expose [`UserSummary`] instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,

    /// Failed-attempt counter, reset on successful login
    #[serde(default)]
    pub login_attempts: u32,

    /// Timestamp of the most recent login attempt
    #[serde(default)]
    pub last_attempt_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new account with zeroed lockout state.
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            login_attempts: 0,
            last_attempt_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Refresh the update timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Record for User {
    fn collection_name() -> &'static str {
        "users"
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn field_text(&self, field: &str) -> Option<String> {
        match field {
            "name" => Some(self.name.clone()),
            "email" => Some(self.email.clone()),
            _ => None,
        }
    }
}

impl Searchable for User {
    fn searchable_fields() -> &'static [&'static str] {
        &["name", "email"]
    }

    fn default_sort_field() -> &'static str {
        "email"
    }
}

impl Account for User {
    fn email(&self) -> &str {
        &self.email
    }

    fn password_hash(&self) -> &str {
        &self.password_hash
    }

    fn login_attempts(&self) -> u32 {
        self.login_attempts
    }

    fn last_attempt_at(&self) -> Option<DateTime<Utc>> {
        self.last_attempt_at
    }
}

/// Public projection of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl UserSummary {
    pub fn of(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Payload for `POST /users`
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 6, max = 32))]
    pub password: String,

    pub password_confirm: String,
}

/// Payload for `PUT /users/{id}`
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(email)]
    pub email: String,
}

/// Payload for `PUT /users/{id}/password`
#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    pub password_old: String,

    #[validate(length(min = 6, max = 32))]
    pub password_new: String,

    pub password_confirm: String,
}
