pub mod checkins;
pub mod display;
pub mod engine;
pub mod error;
pub mod events;
pub mod lighting;
pub mod models;
pub mod settings;
mod utils;
pub mod vibe;

use std::time::Duration;

use anyhow::Result;
use log::info;
use tokio_util::sync::CancellationToken;

pub use engine::{DashboardSnapshot, VenueEngine};
pub use error::FeedError;
pub use events::DashboardEvent;
pub use lighting::{select_scene, LightMode, LightScene};
pub use settings::EngineSettings;

use checkins::RngSource;
use vibe::SyntheticVibeSource;

const SUMMARY_INTERVAL: Duration = Duration::from_secs(5);

/// Runs the engine against the synthetic vibe source until Ctrl-C.
pub async fn run() -> Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("vibe-check starting up...");

    let settings = EngineSettings::from_env()?;
    let engine = VenueEngine::new(settings.clone())?;

    engine
        .start_checkins(Box::new(RngSource::from_entropy()))
        .await?;

    let tx = engine.attach_feed().await?;
    let source_token = CancellationToken::new();
    let source = tokio::spawn(SyntheticVibeSource::new(None).run(
        tx,
        settings.synthetic_feed_interval(),
        source_token.clone(),
    ));

    let mut summary = tokio::time::interval(SUMMARY_INTERVAL);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                info!("Ctrl-C received, shutting down");
                break;
            }
            _ = summary.tick() => log_dashboard(&engine).await,
        }
    }

    source_token.cancel();
    let _ = source.await;
    engine.shutdown().await
}

async fn log_dashboard(engine: &VenueEngine) {
    let snapshot = engine.dashboard().await;
    let top: Vec<String> = snapshot
        .board
        .genres
        .iter()
        .take(3)
        .map(|g| format!("{} ({})", g.name, g.count))
        .collect();
    let latest = snapshot
        .board
        .recent
        .first()
        .map(|c| format!("{} {}", c.guest_name(), display::age_label(c.age_minutes())))
        .unwrap_or_else(|| "none".to_string());
    let fixture_level = snapshot
        .scene
        .fixture_levels(display::FIXTURE_COUNT)
        .first()
        .copied()
        .unwrap_or(0.0);

    info!(
        "[{}] hype {:.0}% energy {:.1} | lights {} {} {}% bpm {} ({} fixtures @ {:.2}) | {} guests, latest: {} | top: {}",
        display::connection_label(snapshot.connected),
        display::hype_percent(snapshot.hype_score),
        snapshot.mean_energy,
        snapshot.scene.mode.as_str(),
        snapshot.scene.color,
        snapshot.scene.intensity_percent,
        display::bpm_label(&snapshot.scene),
        display::FIXTURE_COUNT,
        fixture_level,
        snapshot.board.total_checkins,
        latest,
        top.join(", ")
    );
}
