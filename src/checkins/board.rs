use anyhow::{bail, Context, Result};
use serde::Serialize;

use crate::models::{checkin::GENRES_PER_CHECKIN, CheckinRecord, GenreRecord};

use super::{
    activity::RecentActivityLog, catalog::CheckinSeed, random::RandomSource,
    ranking::GenreRanking,
};

pub const DEFAULT_ARRIVAL_PROBABILITY: f64 = 0.4;
pub const DEFAULT_AGE_STEP_MINUTES: f64 = 0.05;

#[derive(Debug, Clone, Copy)]
pub struct TickParams {
    pub arrival_probability: f64,
    pub age_step_minutes: f64,
}

impl Default for TickParams {
    fn default() -> Self {
        Self {
            arrival_probability: DEFAULT_ARRIVAL_PROBABILITY,
            age_step_minutes: DEFAULT_AGE_STEP_MINUTES,
        }
    }
}

/// Read-only copy of the board handed to the presentation layer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSnapshot {
    pub genres: Vec<GenreRecord>,
    pub recent: Vec<CheckinRecord>,
    pub total_checkins: u64,
    pub ticks: u64,
}

/// Owns the ranking, the activity log and the running total. Every mutation
/// goes through [`CheckinBoard::tick`] or [`CheckinBoard::record_arrival`].
#[derive(Debug)]
pub struct CheckinBoard {
    ranking: GenreRanking,
    recent: RecentActivityLog,
    total_checkins: u64,
    ticks: u64,
    /// Catalog order, fixed at construction. Sampling indexes into this.
    catalog: Vec<String>,
    guest_names: Vec<String>,
    params: TickParams,
}

impl CheckinBoard {
    pub fn new(seed: CheckinSeed, recent_capacity: usize, params: TickParams) -> Result<Self> {
        if seed.guest_names.is_empty() {
            bail!("guest name pool is empty");
        }
        if seed.genres.len() < GENRES_PER_CHECKIN {
            bail!(
                "genre catalog needs at least {GENRES_PER_CHECKIN} entries, got {}",
                seed.genres.len()
            );
        }

        let catalog = seed.genres.iter().map(|g| g.name.clone()).collect();
        let ranking = GenreRanking::new(seed.genres)?;
        let recent = RecentActivityLog::from_newest_first(recent_capacity, seed.recent);

        Ok(Self {
            ranking,
            recent,
            total_checkins: seed.total_checkins,
            ticks: 0,
            catalog,
            guest_names: seed.guest_names,
            params,
        })
    }

    /// One generator period: maybe an arrival, then every record ages.
    /// Aging happens on quiet ticks and failed draws too.
    pub fn tick(&mut self, rng: &mut dyn RandomSource) -> Result<Option<CheckinRecord>> {
        self.ticks += 1;

        let arrival = if rng.chance(self.params.arrival_probability) {
            self.draw_checkin(rng).map(|record| {
                self.record_arrival(record.clone());
                Some(record)
            })
        } else {
            Ok(None)
        };

        self.recent.age_all(self.params.age_step_minutes);
        arrival
    }

    /// Feeds one arrival to the ranking and the log and bumps the total.
    pub fn record_arrival(&mut self, record: CheckinRecord) {
        self.ranking.on_checkin(&record);
        self.recent.insert(record);
        self.total_checkins += 1;
    }

    fn draw_checkin(&self, rng: &mut dyn RandomSource) -> Result<CheckinRecord> {
        let guest_index = rng.index(self.guest_names.len());
        let guest = self
            .guest_names
            .get(guest_index)
            .with_context(|| format!("guest index {guest_index} out of range"))?;

        let picked = rng.distinct_indices(self.catalog.len(), GENRES_PER_CHECKIN);
        let genres: [String; GENRES_PER_CHECKIN] = match picked.as_slice() {
            [a, b, c] => [self.genre_at(*a)?, self.genre_at(*b)?, self.genre_at(*c)?],
            other => bail!("expected {GENRES_PER_CHECKIN} genre picks, got {}", other.len()),
        };

        CheckinRecord::arrive(guest.as_str(), genres)
    }

    fn genre_at(&self, index: usize) -> Result<String> {
        self.catalog
            .get(index)
            .cloned()
            .with_context(|| format!("genre index {index} out of range"))
    }

    pub fn genre_ranking(&self, n: usize) -> Vec<GenreRecord> {
        self.ranking.top_n(n).to_vec()
    }

    pub fn recent_checkins(&self, n: usize) -> Vec<CheckinRecord> {
        self.recent.top_n(n)
    }

    pub fn total_checkins(&self) -> u64 {
        self.total_checkins
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn ranking(&self) -> &GenreRanking {
        &self.ranking
    }

    pub fn recent(&self) -> &RecentActivityLog {
        &self.recent
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            genres: self.ranking.all().to_vec(),
            recent: self.recent.top_n(self.recent.len()),
            total_checkins: self.total_checkins,
            ticks: self.ticks,
        }
    }
}
