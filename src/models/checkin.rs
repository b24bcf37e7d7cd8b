use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of genre preferences every guest picks at the door.
pub const GENRES_PER_CHECKIN: usize = 3;

/// A single guest arrival as shown in the recent activity feed.
///
/// Records are immutable once created apart from `age_minutes`, which only
/// grows through [`CheckinRecord::advance_age`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CheckinRecord {
    id: Uuid,
    guest_name: String,
    genres: [String; GENRES_PER_CHECKIN],
    age_minutes: f64,
    arrived_at: DateTime<Utc>,
}

impl CheckinRecord {
    /// A fresh arrival with an age of zero.
    pub fn arrive(guest_name: impl Into<String>, genres: [String; GENRES_PER_CHECKIN]) -> Result<Self> {
        Self::with_age(guest_name, genres, 0.0)
    }

    /// Builds a record that is already `age_minutes` old (used for seeding).
    pub fn with_age(
        guest_name: impl Into<String>,
        genres: [String; GENRES_PER_CHECKIN],
        age_minutes: f64,
    ) -> Result<Self> {
        if !age_minutes.is_finite() || age_minutes < 0.0 {
            bail!("check-in age must be a non-negative number, got {age_minutes}");
        }
        if genres[0] == genres[1] || genres[0] == genres[2] || genres[1] == genres[2] {
            bail!("check-in genres must be distinct, got {genres:?}");
        }

        Ok(Self {
            id: Uuid::new_v4(),
            guest_name: guest_name.into(),
            genres,
            age_minutes,
            arrived_at: Utc::now(),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn guest_name(&self) -> &str {
        &self.guest_name
    }

    pub fn genres(&self) -> &[String; GENRES_PER_CHECKIN] {
        &self.genres
    }

    pub fn age_minutes(&self) -> f64 {
        self.age_minutes
    }

    pub fn arrived_at(&self) -> DateTime<Utc> {
        self.arrived_at
    }

    /// Negative or non-finite deltas are ignored so the age never goes back.
    pub(crate) fn advance_age(&mut self, delta_minutes: f64) {
        if delta_minutes.is_finite() && delta_minutes > 0.0 {
            self.age_minutes += delta_minutes;
        }
    }
}
