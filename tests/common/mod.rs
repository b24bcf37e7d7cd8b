use std::collections::VecDeque;

use vibe_check_lib::checkins::RandomSource;

/// Plays back a fixed script of random decisions. Once the arrival script
/// runs out every further tick is quiet.
#[derive(Default)]
pub struct ScriptedRandom {
    pub arrivals: VecDeque<bool>,
    pub guests: VecDeque<usize>,
    pub genre_picks: VecDeque<Vec<usize>>,
}

impl ScriptedRandom {
    pub fn quiet() -> Self {
        Self::default()
    }

    pub fn with_arrival(mut self, guest: usize, genres: [usize; 3]) -> Self {
        self.arrivals.push_back(true);
        self.guests.push_back(guest);
        self.genre_picks.push_back(genres.to_vec());
        self
    }
}

impl RandomSource for ScriptedRandom {
    fn chance(&mut self, _probability: f64) -> bool {
        self.arrivals.pop_front().unwrap_or(false)
    }

    fn index(&mut self, len: usize) -> usize {
        self.guests.pop_front().unwrap_or(0) % len
    }

    fn distinct_indices(&mut self, len: usize, amount: usize) -> Vec<usize> {
        self.genre_picks
            .pop_front()
            .unwrap_or_else(|| (0..amount.min(len)).collect())
    }
}
