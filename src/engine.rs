use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::sync::{broadcast, mpsc, Mutex};

use crate::{
    checkins::{BoardSnapshot, CheckinBoard, CheckinController, CheckinSeed, RandomSource},
    events::{DashboardEvent, EventBus},
    lighting::LightScene,
    models::{CheckinRecord, GenreRecord},
    settings::EngineSettings,
    vibe::{FeedController, FeedEvent, FeedStats, VibeFeedAdapter, VibeFrame},
};

/// Everything a dashboard refresh needs, taken in one go.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub board: BoardSnapshot,
    pub scene: LightScene,
    pub connected: bool,
    pub hype_score: f64,
    pub mean_energy: f64,
    pub feed: FeedStats,
}

/// The two halves of the dashboard: the vibe feed slot with its light scene,
/// and the check-in board with its ticker. They share nothing but the event
/// bus and only meet in the read accessors below.
pub struct VenueEngine {
    settings: EngineSettings,
    events: EventBus,
    feed: VibeFeedAdapter,
    feed_controller: Mutex<FeedController>,
    checkins: CheckinController,
}

impl VenueEngine {
    /// Builds the engine from settings. Nothing runs until
    /// [`VenueEngine::start_checkins`] and [`VenueEngine::attach_feed`].
    pub fn new(settings: EngineSettings) -> Result<Self> {
        settings.validate()?;

        let seed = CheckinSeed::build(settings.seed).context("failed to build check-in seed")?;
        let board = CheckinBoard::new(seed, settings.recent_capacity, settings.tick_params())?;

        let events = EventBus::default();
        let checkins = CheckinController::new(
            board,
            settings.checkin_interval(),
            settings.summary_every_ticks,
            events.clone(),
        );

        Ok(Self {
            feed: VibeFeedAdapter::new(events.clone()),
            feed_controller: Mutex::new(FeedController::new()),
            checkins,
            events,
            settings,
        })
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub async fn start_checkins(&self, rng: Box<dyn RandomSource>) -> Result<()> {
        self.checkins.start(rng).await
    }

    /// Connects a transport. The returned sender is where it pushes
    /// connection changes and named messages.
    pub async fn attach_feed(&self) -> Result<mpsc::Sender<FeedEvent>> {
        self.feed_controller
            .lock()
            .await
            .start(self.feed.clone(), self.settings.feed_buffer)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.events.subscribe()
    }

    pub fn feed_adapter(&self) -> &VibeFeedAdapter {
        &self.feed
    }

    pub fn latest_vibe_frame(&self) -> Option<Arc<VibeFrame>> {
        self.feed.latest()
    }

    pub fn connected(&self) -> bool {
        self.feed.connected()
    }

    pub fn current_light_scene(&self) -> LightScene {
        self.feed.current_scene()
    }

    pub async fn genre_ranking(&self, n: usize) -> Vec<GenreRecord> {
        self.checkins.genre_ranking(n).await
    }

    pub async fn recent_checkins(&self, n: usize) -> Vec<CheckinRecord> {
        self.checkins.recent_checkins(n).await
    }

    pub async fn total_checkins(&self) -> u64 {
        self.checkins.total_checkins().await
    }

    pub async fn dashboard(&self) -> DashboardSnapshot {
        let reading = self.feed.reading();
        let (hype_score, mean_energy) = reading
            .frame
            .as_ref()
            .map(|frame| (frame.hype_score, frame.mean_energy))
            .unwrap_or((0.0, 0.0));

        DashboardSnapshot {
            board: self.checkins.snapshot().await,
            scene: reading.scene,
            connected: reading.connected,
            hype_score,
            mean_energy,
            feed: self.feed.stats(),
        }
    }

    /// Stops the ticker, releases the feed and waits for both loops. Messages
    /// still in flight are dropped.
    pub async fn shutdown(&self) -> Result<()> {
        self.checkins.stop().await;
        self.feed.release();
        self.feed_controller.lock().await.stop().await?;
        log::info!("venue engine shut down");
        Ok(())
    }
}
