use rand::{rngs::StdRng, Rng, SeedableRng};
use serde_json::{json, Value};
use tokio::{
    sync::mpsc,
    time::{self, Duration, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use super::{adapter::VIBE_UPDATE_EVENT, feed_loop::FeedEvent, frame::Zone};

const ENABLE_LOGS: bool = false;

use crate::log_info;

pub const GRID_ROWS: usize = 8;
pub const GRID_COLUMNS: usize = 8;

/// Stand-in for the camera analysis server: a random walk over hype and
/// energy plus a matching heatmap, pushed as `vibe_update` messages.
pub struct SyntheticVibeSource {
    rng: StdRng,
    hype: f64,
    energy: f64,
    started: Instant,
}

impl SyntheticVibeSource {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            hype: 0.1,
            energy: 1.0,
            started: Instant::now(),
        }
    }

    /// Next payload in the wire format the adapter expects.
    pub fn next_payload(&mut self) -> Value {
        self.hype = (self.hype + self.rng.gen_range(-0.08..0.08)).clamp(0.0, 1.0);
        self.energy = (self.energy + self.rng.gen_range(-0.9..0.9)).clamp(0.0, 15.0);

        let heatmap: Vec<Vec<f64>> = (0..GRID_ROWS)
            .map(|_| {
                (0..GRID_COLUMNS)
                    .map(|_| (self.energy * self.rng.gen_range(0.0..2.0)).max(0.0))
                    .collect()
            })
            .collect();
        let zones = classify_zones(&heatmap);

        json!({
            "ts": self.started.elapsed().as_secs_f64(),
            "hypeScore": self.hype,
            "meanEnergy": self.energy,
            "heatmap": heatmap,
            "zones": zones,
            "peopleCount": self.rng.gen_range(0..40u32),
            "frameWidth": 1920,
            "frameHeight": 1080,
            "latencyMs": self.rng.gen_range(8.0..25.0),
            "fps": 20.0,
        })
    }

    /// Announces a connection, then pushes a frame every `interval` until
    /// cancelled or the receiving side goes away.
    pub async fn run(
        mut self,
        tx: mpsc::Sender<FeedEvent>,
        interval: Duration,
        cancel_token: CancellationToken,
    ) {
        if tx.send(FeedEvent::Connected).await.is_err() {
            return;
        }

        let mut ticker = time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = cancel_token.cancelled() => {
                    let _ = tx.try_send(FeedEvent::Disconnected);
                    log_info!("synthetic vibe source stopped");
                    break;
                }
                _ = ticker.tick() => {
                    let message = FeedEvent::Message {
                        event: VIBE_UPDATE_EVENT.to_string(),
                        payload: self.next_payload(),
                    };
                    if tx.send(message).await.is_err() {
                        break;
                    }
                }
            }
        }
    }
}

/// Buckets each cell by its share of the hottest cell: above two thirds is
/// high, above one third medium.
pub fn classify_zones(heatmap: &[Vec<f64>]) -> Vec<Vec<Zone>> {
    let peak = heatmap
        .iter()
        .flatten()
        .copied()
        .fold(0.0_f64, f64::max)
        .max(1.0);

    heatmap
        .iter()
        .map(|row| {
            row.iter()
                .map(|value| match value / peak {
                    share if share > 2.0 / 3.0 => Zone::High,
                    share if share > 1.0 / 3.0 => Zone::Medium,
                    _ => Zone::Low,
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vibe::frame::VibeFrame;

    #[test]
    fn test_payloads_parse() {
        let mut source = SyntheticVibeSource::new(Some(3));
        for _ in 0..20 {
            let frame = VibeFrame::from_payload(source.next_payload()).unwrap();
            assert_eq!(frame.grid_size(), (GRID_ROWS, GRID_COLUMNS));
            assert!((0.0..=1.0).contains(&frame.hype_score));
            assert!(frame.mean_energy >= 0.0);
        }
    }

    #[test]
    fn test_classify_zones() {
        let zones = classify_zones(&[vec![0.0, 5.0, 9.0]]);
        assert_eq!(zones, vec![vec![Zone::Low, Zone::Medium, Zone::High]]);
    }

    #[test]
    fn test_cold_grid_is_low() {
        // Peak below 1 is treated as 1, so a quiet room stays low.
        let zones = classify_zones(&[vec![0.2, 0.3]]);
        assert_eq!(zones, vec![vec![Zone::Low, Zone::Low]]);
    }
}
