use rand::{rngs::StdRng, Rng, SeedableRng};

/// The three random decisions a check-in tick makes. Kept behind a trait so
/// tests can script exact arrivals.
pub trait RandomSource: Send {
    /// Bernoulli trial with the given probability.
    fn chance(&mut self, probability: f64) -> bool;

    /// Uniform index in `0..len`. `len` is never zero.
    fn index(&mut self, len: usize) -> usize;

    /// `amount` distinct indices in `0..len`, uniformly without replacement.
    fn distinct_indices(&mut self, len: usize, amount: usize) -> Vec<usize>;
}

/// Adapts any `rand` generator.
pub struct RngSource<R>(pub R);

impl RngSource<StdRng> {
    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng + Send> RandomSource for RngSource<R> {
    fn chance(&mut self, probability: f64) -> bool {
        self.0.gen_bool(probability.clamp(0.0, 1.0))
    }

    fn index(&mut self, len: usize) -> usize {
        self.0.gen_range(0..len)
    }

    fn distinct_indices(&mut self, len: usize, amount: usize) -> Vec<usize> {
        rand::seq::index::sample(&mut self.0, len, amount).into_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_distinct_indices_are_distinct_and_in_range() {
        let mut source = RngSource::seeded(7);
        for _ in 0..200 {
            let picked = source.distinct_indices(12, 3);
            assert_eq!(picked.len(), 3);
            assert!(picked.iter().all(|i| *i < 12));
            assert_eq!(picked.iter().collect::<HashSet<_>>().len(), 3);
        }
    }

    #[test]
    fn test_chance_extremes() {
        let mut source = RngSource::seeded(1);
        assert!((0..50).all(|_| source.chance(1.0)));
        assert!((0..50).all(|_| !source.chance(0.0)));
    }
}
