//! Creation and update timestamps shared by persisted entities.
//!
//! Entities embed a [`Timestamps`] value rather than inheriting timestamp
//! columns; the value enforces `updated_at >= created_at` and never moves
//! `updated_at` backwards.

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A stored `updated_at` precedes `created_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("updated_at {updated_at} precedes created_at {created_at}")]
pub struct TimestampOrderError {
    /// Stored creation instant.
    pub created_at: DateTime<Utc>,
    /// Stored update instant.
    pub updated_at: DateTime<Utc>,
}

/// Row creation and last-update instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamps {
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Timestamps {
    /// Stamps a new row with the current clock time.
    #[must_use]
    pub fn new(clock: &impl Clock) -> Self {
        let now = clock.utc();
        Self {
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstructs timestamps read from storage.
    ///
    /// # Errors
    ///
    /// Returns [`TimestampOrderError`] when `updated_at` is earlier than
    /// `created_at`.
    pub fn from_persisted(
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, TimestampOrderError> {
        if updated_at < created_at {
            return Err(TimestampOrderError {
                created_at,
                updated_at,
            });
        }
        Ok(Self {
            created_at,
            updated_at,
        })
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Refreshes `updated_at` from the clock.
    ///
    /// A clock reading earlier than the current `updated_at` leaves it
    /// unchanged.
    pub fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = self.updated_at.max(clock.utc());
    }
}

/// Entities carrying [`Timestamps`].
pub trait Timestamped {
    /// Returns the entity's timestamps.
    fn timestamps(&self) -> &Timestamps;

    /// Returns the creation timestamp.
    fn created_at(&self) -> DateTime<Utc> {
        self.timestamps().created_at()
    }

    /// Returns the latest update timestamp.
    fn updated_at(&self) -> DateTime<Utc> {
        self.timestamps().updated_at()
    }
}
