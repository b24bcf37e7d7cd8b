use std::{sync::Arc, time::Duration};

use anyhow::{bail, Result};
use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};

use crate::{
    events::{DashboardEvent, EventBus},
    models::{CheckinRecord, GenreRecord},
};

use super::{
    board::{BoardSnapshot, CheckinBoard},
    random::RandomSource,
};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_error, log_info};

/// Drives a [`CheckinBoard`] on a fixed period and hands out snapshots.
///
/// A whole tick runs under one lock, so readers see either the state before
/// it or after it.
#[derive(Clone)]
pub struct CheckinController {
    board: Arc<Mutex<CheckinBoard>>,
    ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
    tick_interval: Duration,
    summary_every_ticks: u64,
    events: EventBus,
}

impl CheckinController {
    pub fn new(
        board: CheckinBoard,
        tick_interval: Duration,
        summary_every_ticks: u64,
        events: EventBus,
    ) -> Self {
        Self {
            board: Arc::new(Mutex::new(board)),
            ticker: Arc::new(Mutex::new(None)),
            tick_interval,
            summary_every_ticks: summary_every_ticks.max(1),
            events,
        }
    }

    /// Starts ticking. The first tick fires one full period from now.
    pub async fn start(&self, rng: Box<dyn RandomSource>) -> Result<()> {
        let mut ticker_guard = self.ticker.lock().await;
        if ticker_guard.as_ref().is_some_and(|handle| !handle.is_finished()) {
            bail!("check-in ticker already running");
        }

        let board = self.board.clone();
        let events = self.events.clone();
        let period = self.tick_interval;
        let summary_every = self.summary_every_ticks;

        let handle = tokio::spawn(async move {
            let mut rng = rng;
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;

                let outcome = {
                    let mut guard = board.lock().await;
                    guard
                        .tick(rng.as_mut())
                        .map(|arrival| (arrival, guard.total_checkins(), guard.ticks(), leader(&guard)))
                };

                match outcome {
                    Ok((arrival, total, ticks, leader)) => {
                        if let Some(record) = arrival {
                            log_debug!(
                                "check-in: {} -> {:?} (total {})",
                                record.guest_name(),
                                record.genres(),
                                total
                            );
                            events.publish(DashboardEvent::CheckinArrived {
                                record,
                                total_checkins: total,
                            });
                        }

                        if ticks % summary_every == 0 {
                            log_info!(
                                "check-ins after {} ticks: total={}, leading genre={}",
                                ticks,
                                total,
                                leader.as_deref().unwrap_or("-")
                            );
                        }
                    }
                    Err(err) => log_error!("check-in tick failed: {err:?}"),
                }
            }
        });

        *ticker_guard = Some(handle);
        log_info!("check-in ticker started (every {:?})", period);
        Ok(())
    }

    /// Cancels the ticker and waits for it to wind down. No tick fires after
    /// this returns.
    pub async fn stop(&self) {
        let handle = self.ticker.lock().await.take();
        if let Some(handle) = handle {
            handle.abort();
            match handle.await {
                Err(err) if err.is_panic() => log_error!("check-in ticker panicked: {err}"),
                _ => log_info!("check-in ticker stopped"),
            }
        }
    }

    pub async fn snapshot(&self) -> BoardSnapshot {
        self.board.lock().await.snapshot()
    }

    pub async fn genre_ranking(&self, n: usize) -> Vec<GenreRecord> {
        self.board.lock().await.genre_ranking(n)
    }

    pub async fn recent_checkins(&self, n: usize) -> Vec<CheckinRecord> {
        self.board.lock().await.recent_checkins(n)
    }

    pub async fn total_checkins(&self) -> u64 {
        self.board.lock().await.total_checkins()
    }
}

fn leader(board: &CheckinBoard) -> Option<String> {
    board.ranking().top_n(1).first().map(|g| g.name.clone())
}
