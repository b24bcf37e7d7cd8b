use std::collections::HashSet;

use anyhow::{bail, Result};

use crate::models::{CheckinRecord, GenreRecord};

/// Genre popularity table, always sorted by count, highest first.
///
/// Ties keep whatever order they had after the previous pass, so the seed
/// order decides the very first ties.
#[derive(Debug, Clone)]
pub struct GenreRanking {
    genres: Vec<GenreRecord>,
}

impl GenreRanking {
    pub fn new(seed: Vec<GenreRecord>) -> Result<Self> {
        let mut seen = HashSet::new();
        for genre in &seed {
            if !seen.insert(genre.name.as_str()) {
                bail!("genre '{}' appears twice in the catalog", genre.name);
            }
        }

        let mut ranking = Self { genres: seed };
        ranking.resort();
        Ok(ranking)
    }

    /// Bumps every catalog genre named by the record and re-sorts. Names that
    /// are not in the catalog are skipped. Returns how many genres matched.
    pub fn on_checkin(&mut self, record: &CheckinRecord) -> usize {
        let mut matched = 0;
        for genre in self.genres.iter_mut() {
            if record.genres().contains(&genre.name) {
                genre.count += 1;
                matched += 1;
            }
        }

        if matched < record.genres().len() {
            log::debug!(
                "check-in {} referenced {} genre(s) outside the catalog",
                record.id(),
                record.genres().len() - matched
            );
        }

        self.resort();
        matched
    }

    pub fn top_n(&self, n: usize) -> &[GenreRecord] {
        &self.genres[..n.min(self.genres.len())]
    }

    pub fn all(&self) -> &[GenreRecord] {
        &self.genres
    }

    pub fn len(&self) -> usize {
        self.genres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genres.is_empty()
    }

    pub fn count_of(&self, name: &str) -> Option<u64> {
        self.genres.iter().find(|g| g.name == name).map(|g| g.count)
    }

    /// Genre names in current ranking order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.genres.iter().map(|g| g.name.as_str())
    }

    fn resort(&mut self) {
        // `sort_by` is stable; equal counts keep their previous order.
        self.genres.sort_by(|a, b| b.count.cmp(&a.count));
    }
}
