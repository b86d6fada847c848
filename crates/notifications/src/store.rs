//! In-memory expiring notification store
//!
//! The store owns the only copy of the notification collection. Inserts and
//! sweeps take the write lock for the whole mutation and `list` copies the
//! collection under the read lock, so no caller can observe a half-applied
//! append or a partially swept collection.

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use tracing::debug;

use crate::error::NotificationError;
use crate::notification::{NewNotification, Notification};

/// Expiration offset applied when a candidate carries none
pub const DEFAULT_TTL_SECS: i64 = 600;

/// Largest configurable default TTL (365 days)
pub const MAX_DEFAULT_TTL_SECS: u64 = 365 * 24 * 3600;

/// Insertion-ordered notification store
pub struct NotificationStore {
    notifications: RwLock<Vec<Notification>>,
    default_ttl: Duration,
}

impl NotificationStore {
    /// Create an empty store with the 10 minute default TTL
    pub fn new() -> Self {
        Self::with_default_ttl(Duration::seconds(DEFAULT_TTL_SECS))
    }

    /// Create an empty store with a custom default TTL
    pub fn with_default_ttl(default_ttl: Duration) -> Self {
        Self {
            notifications: RwLock::new(Vec::new()),
            default_ttl,
        }
    }

    /// Expiration offset applied to candidates without one
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Snapshot of all stored notifications in insertion order
    pub fn list(&self) -> Vec<Notification> {
        self.notifications.read().clone()
    }

    /// Number of stored notifications
    pub fn len(&self) -> usize {
        self.notifications.read().len()
    }

    /// Whether the store holds no notifications
    pub fn is_empty(&self) -> bool {
        self.notifications.read().is_empty()
    }

    /// Validate and store a candidate at the current time, returning the materialized notification
    pub fn insert(&self, candidate: NewNotification) -> Result<Notification, NotificationError> {
        self.insert_at(candidate, Utc::now())
    }

    /// Insert with an explicit insertion time used to resolve a default expiration
    pub fn insert_at(
        &self,
        candidate: NewNotification,
        now: DateTime<Utc>,
    ) -> Result<Notification, NotificationError> {
        candidate.validate()?;

        let notification = candidate.materialize(now, self.default_ttl);
        self.notifications.write().push(notification.clone());

        debug!(
            id = %notification.id,
            tag = %notification.tag,
            exp = %notification.expiration,
            "Stored notification"
        );

        Ok(notification)
    }

    /// Remove every notification expiring at or before `now`
    ///
    /// Survivors keep their relative order. Returns the number removed.
    pub fn sweep(&self, now: DateTime<Utc>) -> usize {
        let mut notifications = self.notifications.write();
        let before = notifications.len();
        notifications.retain(|n| !n.is_expired(now));
        before - notifications.len()
    }

    /// Sweep against the current time
    pub fn sweep_expired(&self) -> usize {
        self.sweep(Utc::now())
    }
}

impl Default for NotificationStore {
    fn default() -> Self {
        Self::new()
    }
}
