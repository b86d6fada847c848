//! Notification data model

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::NotificationError;

/// Unix seconds of `0001-01-01T00:00:00Z`, the zero time sent by older clients
const ZERO_TIMESTAMP_SECS: i64 = -62_135_596_800;

/// A stored notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    pub tag: String,
    #[serde(rename = "exp")]
    pub expiration: DateTime<Utc>,
}

impl Notification {
    /// Whether this notification is past its expiration at `now` (inclusive)
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiration <= now
    }
}

/// Candidate for insertion
///
/// Missing text fields deserialize as empty strings and are rejected by
/// [`NewNotification::validate`]. An `id` in the payload is never read.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewNotification {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub tag: String,
    #[serde(rename = "exp", default, skip_serializing_if = "Option::is_none")]
    pub expiration: Option<DateTime<Utc>>,
}

impl NewNotification {
    /// Create a candidate without an expiration
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        tag: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            tag: tag.into(),
            expiration: None,
        }
    }

    /// Set an explicit expiration
    pub fn with_expiration(mut self, expiration: DateTime<Utc>) -> Self {
        self.expiration = Some(expiration);
        self
    }

    /// Reject the first empty required field, checked in the order title, message, tag
    pub fn validate(&self) -> Result<(), NotificationError> {
        if self.title.is_empty() {
            return Err(NotificationError::validation("title"));
        }
        if self.message.is_empty() {
            return Err(NotificationError::validation("message"));
        }
        if self.tag.is_empty() {
            return Err(NotificationError::validation("tag"));
        }
        Ok(())
    }

    /// Materialize into a stored notification with a fresh id
    ///
    /// An absent or zero expiration resolves to `now + default_ttl`, saturating
    /// at the latest representable timestamp.
    pub fn materialize(self, now: DateTime<Utc>, default_ttl: Duration) -> Notification {
        let expiration = match self.expiration {
            Some(exp) if !is_zero_timestamp(&exp) => exp,
            _ => now
                .checked_add_signed(default_ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        };

        Notification {
            id: Uuid::new_v4(),
            title: self.title,
            message: self.message,
            tag: self.tag,
            expiration,
        }
    }
}

/// Whether `ts` is the zero time `0001-01-01T00:00:00Z`
pub fn is_zero_timestamp(ts: &DateTime<Utc>) -> bool {
    ts.timestamp() == ZERO_TIMESTAMP_SECS && ts.timestamp_subsec_nanos() == 0
}
