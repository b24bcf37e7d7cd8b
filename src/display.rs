//! Formatting helpers for whatever renders the dashboard. Pure functions over
//! engine snapshots; nothing here feeds back into engine state.

use crate::{lighting::LightScene, models::GenreRecord};

/// Energy value that fills the energy bar.
pub const ENERGY_FULL_SCALE: f64 = 15.0;
pub const FIXTURE_COUNT: usize = 8;

/// "just now" under a minute, otherwise whole minutes rounded down.
pub fn age_label(age_minutes: f64) -> String {
    if age_minutes < 1.0 {
        "just now".to_string()
    } else {
        format!("{}m ago", age_minutes.floor() as u64)
    }
}

/// Share of `max` as a percentage, capped to 0..=100.
pub fn bar_percent(value: f64, max: f64) -> f64 {
    if max <= 0.0 || !value.is_finite() {
        return 0.0;
    }
    (value / max * 100.0).clamp(0.0, 100.0)
}

pub fn hype_percent(hype_score: f64) -> f64 {
    bar_percent(hype_score, 1.0)
}

pub fn energy_percent(mean_energy: f64) -> f64 {
    bar_percent(mean_energy, ENERGY_FULL_SCALE)
}

/// Each cell relative to the hottest one. A peak below 1 counts as 1 so a
/// near-empty room does not light up.
pub fn heatmap_intensities(heatmap: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let peak = heatmap
        .iter()
        .flatten()
        .copied()
        .fold(1.0_f64, f64::max);
    heatmap
        .iter()
        .map(|row| row.iter().map(|value| value / peak).collect())
        .collect()
}

/// Bar widths for a ranking slice, relative to the leader (0.0..=1.0).
pub fn genre_shares(ranking: &[GenreRecord]) -> Vec<(String, f64)> {
    let leader = ranking.first().map(|g| g.count).unwrap_or(0).max(1) as f64;
    ranking
        .iter()
        .map(|g| (g.name.clone(), g.count as f64 / leader))
        .collect()
}

pub fn connection_label(connected: bool) -> &'static str {
    if connected {
        "LIVE"
    } else {
        "CAMERA OFFLINE"
    }
}

pub fn bpm_label(scene: &LightScene) -> String {
    if scene.is_synced() {
        scene.bpm.to_string()
    } else {
        "unsynced".to_string()
    }
}
