use anyhow::{bail, Context, Result};
use serde_json::Value;
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::error::FeedError;

use super::adapter::VibeFeedAdapter;

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info, log_warn};

/// What a transport reports upward. Whatever carries the push channel
/// (socket.io, websocket, the synthetic source) translates into these.
#[derive(Debug, Clone)]
pub enum FeedEvent {
    Connected,
    Disconnected,
    Message { event: String, payload: Value },
}

/// Pumps transport events into the adapter until cancelled or until every
/// sender is gone. Events still queued at cancellation are dropped.
pub async fn feed_loop(
    mut rx: mpsc::Receiver<FeedEvent>,
    adapter: VibeFeedAdapter,
    cancel_token: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            _ = cancel_token.cancelled() => {
                log_info!("vibe feed loop shutting down");
                break;
            }
            next = rx.recv() => {
                let Some(event) = next else {
                    log_info!("vibe feed transport closed");
                    break;
                };
                if let Err(err) = apply(&adapter, event) {
                    match &err {
                        FeedError::Detached => break,
                        FeedError::UnknownEvent(name) => log_debug!("ignoring feed event '{name}'"),
                        FeedError::MalformedFrame { .. } => log_warn!("dropping vibe frame: {err}"),
                    }
                }
            }
        }
    }
}

fn apply(adapter: &VibeFeedAdapter, event: FeedEvent) -> Result<(), FeedError> {
    match event {
        FeedEvent::Connected => adapter.set_connected(true),
        FeedEvent::Disconnected => adapter.set_connected(false),
        FeedEvent::Message { event, payload } => adapter.deliver(&event, payload).map(|_| ()),
    }
}

/// Owns the feed loop task; mirrors how the check-in ticker is owned.
pub struct FeedController {
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl FeedController {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel_token: None,
        }
    }

    /// Spawns the loop and returns the sender a transport pushes into.
    pub fn start(
        &mut self,
        adapter: VibeFeedAdapter,
        buffer: usize,
    ) -> Result<mpsc::Sender<FeedEvent>> {
        if self.handle.is_some() {
            bail!("vibe feed already attached");
        }
        if adapter.is_released() {
            bail!("vibe feed adapter already released");
        }

        // Releasing the adapter also ends the loop.
        let cancel_token = adapter.released_token().child_token();
        let (tx, rx) = mpsc::channel(buffer.max(1));

        let handle = tokio::spawn(feed_loop(rx, adapter, cancel_token.clone()));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(tx)
    }

    pub async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle.await.context("vibe feed loop failed to join")
        } else {
            Ok(())
        }
    }

    /// Waits for the loop to end on its own, i.e. once the transport drops
    /// its sender.
    pub async fn join(&mut self) -> Result<()> {
        self.cancel_token = None;
        if let Some(handle) = self.handle.take() {
            handle.await.context("vibe feed loop failed to join")
        } else {
            Ok(())
        }
    }
}

impl Default for FeedController {
    fn default() -> Self {
        Self::new()
    }
}
