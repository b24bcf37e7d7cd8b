use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc, PoisonError, RwLock,
};

use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::{
    error::FeedError,
    events::{DashboardEvent, EventBus},
    lighting::{select_scene, LightScene},
};

use super::frame::VibeFrame;

/// Event name the analysis server pushes frames under.
pub const VIBE_UPDATE_EVENT: &str = "vibe_update";

/// The latest frame together with the scene derived from it.
#[derive(Debug, Clone)]
pub struct FeedReading {
    pub frame: Option<Arc<VibeFrame>>,
    pub scene: LightScene,
    pub connected: bool,
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FeedStats {
    pub accepted: u64,
    pub rejected: u64,
}

#[derive(Default)]
struct Slot {
    latest: Option<Arc<VibeFrame>>,
    scene: LightScene,
}

struct AdapterInner {
    slot: RwLock<Slot>,
    connected: AtomicBool,
    released: CancellationToken,
    accepted: AtomicU64,
    rejected: AtomicU64,
    events: EventBus,
}

/// Single-slot holder for the newest vibe frame. A new frame replaces the
/// old one outright; nothing is queued or reordered.
#[derive(Clone)]
pub struct VibeFeedAdapter {
    inner: Arc<AdapterInner>,
}

impl VibeFeedAdapter {
    pub fn new(events: EventBus) -> Self {
        Self {
            inner: Arc::new(AdapterInner {
                slot: RwLock::new(Slot::default()),
                connected: AtomicBool::new(false),
                released: CancellationToken::new(),
                accepted: AtomicU64::new(0),
                rejected: AtomicU64::new(0),
                events,
            }),
        }
    }

    pub fn latest(&self) -> Option<Arc<VibeFrame>> {
        self.read_slot(|slot| slot.latest.clone())
    }

    /// Scene for the current frame, AMBIENT before the first one arrives.
    pub fn current_scene(&self) -> LightScene {
        self.read_slot(|slot| slot.scene)
    }

    /// Frame and scene read under one lock.
    pub fn reading(&self) -> FeedReading {
        let (frame, scene) = self.read_slot(|slot| (slot.latest.clone(), slot.scene));
        FeedReading {
            frame,
            scene,
            connected: self.connected(),
        }
    }

    pub fn connected(&self) -> bool {
        self.inner.connected.load(Ordering::Acquire)
    }

    pub fn stats(&self) -> FeedStats {
        FeedStats {
            accepted: self.inner.accepted.load(Ordering::Relaxed),
            rejected: self.inner.rejected.load(Ordering::Relaxed),
        }
    }

    /// Records a handshake or a lost channel. The last frame stays in place
    /// either way.
    pub fn set_connected(&self, connected: bool) -> Result<(), FeedError> {
        let previous = {
            let _slot = self
                .inner
                .slot
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            // Checked under the same lock as `release`.
            if self.inner.released.is_cancelled() {
                return Err(FeedError::Detached);
            }
            self.inner.connected.swap(connected, Ordering::AcqRel)
        };

        if previous != connected {
            log::info!(
                "vibe feed {}",
                if connected { "connected" } else { "disconnected" }
            );
            self.inner
                .events
                .publish(DashboardEvent::ConnectionChanged(connected));
        }
        Ok(())
    }

    /// Handles one named push message. Only [`VIBE_UPDATE_EVENT`] carries
    /// frames; a malformed one is dropped and the previous frame kept.
    pub fn deliver(&self, event: &str, payload: Value) -> Result<LightScene, FeedError> {
        if event != VIBE_UPDATE_EVENT {
            return Err(FeedError::UnknownEvent(event.to_string()));
        }

        match VibeFrame::from_payload(payload) {
            Ok(frame) => self.accept(frame),
            Err(err) => {
                self.inner.rejected.fetch_add(1, Ordering::Relaxed);
                Err(err)
            }
        }
    }

    /// Stores an already-parsed frame and recomputes the scene.
    pub fn accept(&self, frame: VibeFrame) -> Result<LightScene, FeedError> {
        let scene = select_scene(frame.hype_score, frame.mean_energy);

        let previous_mode = {
            let mut slot = self
                .inner
                .slot
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            // Checked under the write lock so nothing lands after `release`.
            if self.inner.released.is_cancelled() {
                return Err(FeedError::Detached);
            }
            let previous_mode = slot.latest.as_ref().map(|_| slot.scene.mode);
            slot.latest = Some(Arc::new(frame));
            slot.scene = scene;
            previous_mode
        };

        self.inner.accepted.fetch_add(1, Ordering::Relaxed);
        if previous_mode != Some(scene.mode) {
            log::debug!("light scene -> {}", scene.mode.as_str());
            self.inner.events.publish(DashboardEvent::SceneChanged(scene));
        }
        Ok(scene)
    }

    /// Drops the subscription. Anything delivered afterwards is ignored.
    pub fn release(&self) {
        let _slot = self
            .inner
            .slot
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        self.inner.released.cancel();
        self.inner.connected.store(false, Ordering::Release);
    }

    pub fn is_released(&self) -> bool {
        self.inner.released.is_cancelled()
    }

    /// Token that fires when the adapter is released; feed loops select on it.
    pub fn released_token(&self) -> CancellationToken {
        self.inner.released.clone()
    }

    fn read_slot<T>(&self, f: impl FnOnce(&Slot) -> T) -> T {
        let slot = self
            .inner
            .slot
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        f(&slot)
    }
}
