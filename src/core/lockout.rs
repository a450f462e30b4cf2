//! Login lockout state machine
//!
//! Pure classification of an account's persisted attempt state. The
//! decision takes `now` as an argument so the flow around it stays
//! deterministic under test; nothing here touches storage.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Lockout policy: failed-attempt threshold and cooldown window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct LockoutPolicy {
    /// Failed attempts before the account locks
    pub max_attempts: u32,

    /// Cooldown window in minutes, measured from the last failed attempt
    pub window_minutes: i64,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            window_minutes: 30,
        }
    }
}

/// State of one account with respect to the lockout policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockoutStatus {
    /// Below the threshold; credentials may be checked
    Open,

    /// At or over the threshold and inside the window; reject without
    /// checking the password
    Locked { remaining_minutes: i64 },

    /// At or over the threshold but the window has passed; the counter
    /// must be reset before proceeding
    Expired,
}

impl LockoutPolicy {
    pub fn window(&self) -> Duration {
        Duration::minutes(self.window_minutes)
    }

    /// Classify an account's persisted `(attempts, last_attempt_at)`
    /// pair at `now`.
    ///
    /// The remaining time of a lock is reported in minutes, rounded up
    /// from the remaining milliseconds.
    pub fn status(
        &self,
        attempts: u32,
        last_attempt_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> LockoutStatus {
        if attempts < self.max_attempts {
            return LockoutStatus::Open;
        }

        // At threshold without a recorded attempt time the lock has
        // nothing to anchor to; treat it as spent.
        let Some(last) = last_attempt_at else {
            return LockoutStatus::Expired;
        };

        let lockout_end = last + self.window();
        if now >= lockout_end {
            LockoutStatus::Expired
        } else {
            let remaining_ms = (lockout_end - now).num_milliseconds();
            LockoutStatus::Locked {
                remaining_minutes: (remaining_ms as u64).div_ceil(60_000) as i64,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> LockoutPolicy {
        LockoutPolicy::default()
    }

    #[test]
    fn test_below_threshold_is_open() {
        let now = Utc::now();
        for attempts in 0..5 {
            assert_eq!(
                policy().status(attempts, Some(now), now),
                LockoutStatus::Open
            );
        }
    }

    #[test]
    fn test_locked_reports_remaining_minutes() {
        // Scenario: 5 attempts, last 10 minutes ago, window 30 minutes
        let now = Utc::now();
        let last = now - Duration::minutes(10);

        assert_eq!(
            policy().status(5, Some(last), now),
            LockoutStatus::Locked {
                remaining_minutes: 20
            }
        );
    }

    #[test]
    fn test_remaining_minutes_round_up() {
        let now = Utc::now();
        // 29 minutes 59 seconds elapsed: one second left rounds to 1
        let last = now - Duration::minutes(29) - Duration::seconds(59);
        assert_eq!(
            policy().status(5, Some(last), now),
            LockoutStatus::Locked {
                remaining_minutes: 1
            }
        );

        // 30 seconds elapsed: 29.5 minutes left rounds to 30
        let last = now - Duration::seconds(30);
        assert_eq!(
            policy().status(7, Some(last), now),
            LockoutStatus::Locked {
                remaining_minutes: 30
            }
        );
    }

    #[test]
    fn test_window_elapsed_is_expired() {
        // Scenario: 5 attempts, last 40 minutes ago
        let now = Utc::now();
        let last = now - Duration::minutes(40);
        assert_eq!(policy().status(5, Some(last), now), LockoutStatus::Expired);
    }

    #[test]
    fn test_exact_window_boundary_is_expired() {
        let now = Utc::now();
        let last = now - Duration::minutes(30);
        assert_eq!(policy().status(5, Some(last), now), LockoutStatus::Expired);
    }

    #[test]
    fn test_threshold_without_timestamp_is_expired() {
        let now = Utc::now();
        assert_eq!(policy().status(5, None, now), LockoutStatus::Expired);
    }

    #[test]
    fn test_custom_policy() {
        let policy = LockoutPolicy {
            max_attempts: 3,
            window_minutes: 10,
        };
        let now = Utc::now();
        let last = now - Duration::minutes(4);

        assert_eq!(policy.status(2, Some(last), now), LockoutStatus::Open);
        assert_eq!(
            policy.status(3, Some(last), now),
            LockoutStatus::Locked {
                remaining_minutes: 6
            }
        );
    }
}
