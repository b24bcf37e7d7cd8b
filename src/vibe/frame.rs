use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FeedError;

/// Per-cell crowd energy class, aligned with the heatmap grid.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    #[default]
    Low,
    Medium,
    High,
}

/// One analysed camera frame as pushed by the vibe server.
///
/// `hype_score` and `mean_energy` are always populated: absent inputs become
/// 0 when the payload is parsed. The image and timing fields are carried
/// through untouched for display.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VibeFrame {
    pub hype_score: f64,
    pub mean_energy: f64,
    pub heatmap: Vec<Vec<f64>>,
    pub zones: Vec<Vec<Zone>>,
    /// Base64-encoded JPEG.
    pub frame: Option<String>,
    pub frame_width: Option<u32>,
    pub frame_height: Option<u32>,
    pub latency_ms: Option<f64>,
    pub fps: Option<f64>,
    pub ts: Option<f64>,
    pub people_count: Option<u32>,
}

/// Wire shape of a `vibe_update` payload. Everything is optional here;
/// [`VibeFrame::from_payload`] decides what is acceptable.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VibePayload {
    hype_score: Option<f64>,
    mean_energy: Option<f64>,
    #[serde(default)]
    heatmap: Option<Vec<Vec<f64>>>,
    #[serde(default)]
    zones: Option<Vec<Vec<Zone>>>,
    frame: Option<String>,
    frame_width: Option<u32>,
    frame_height: Option<u32>,
    latency_ms: Option<f64>,
    fps: Option<f64>,
    ts: Option<f64>,
    people_count: Option<u32>,
}

impl VibeFrame {
    /// Parses and normalises a pushed payload.
    ///
    /// Missing or null metrics read as 0. Metrics of the wrong type, a ragged
    /// heatmap, or zones that do not line up with the heatmap reject the
    /// whole frame.
    pub fn from_payload(payload: Value) -> Result<Self, FeedError> {
        if !payload.is_object() {
            return Err(FeedError::malformed("payload is not an object"));
        }

        let raw: VibePayload =
            serde_json::from_value(payload).map_err(|err| FeedError::malformed(err.to_string()))?;

        let heatmap = raw.heatmap.unwrap_or_default();
        let columns = heatmap.first().map(Vec::len).unwrap_or(0);
        if heatmap.iter().any(|row| row.len() != columns) {
            return Err(FeedError::malformed("heatmap rows differ in length"));
        }

        let zones = raw.zones.unwrap_or_default();
        if !zones.is_empty() {
            let aligned = zones.len() == heatmap.len()
                && zones.iter().all(|row| row.len() == columns);
            if !aligned {
                return Err(FeedError::malformed(format!(
                    "zones grid does not match {}x{} heatmap",
                    heatmap.len(),
                    columns
                )));
            }
        }

        Ok(Self {
            hype_score: raw.hype_score.unwrap_or(0.0).clamp(0.0, 1.0),
            mean_energy: raw.mean_energy.unwrap_or(0.0).max(0.0),
            heatmap,
            zones,
            frame: raw.frame,
            frame_width: raw.frame_width,
            frame_height: raw.frame_height,
            latency_ms: raw.latency_ms,
            fps: raw.fps,
            ts: raw.ts,
            people_count: raw.people_count,
        })
    }

    /// Heatmap dimensions as (rows, columns).
    pub fn grid_size(&self) -> (usize, usize) {
        (
            self.heatmap.len(),
            self.heatmap.first().map(Vec::len).unwrap_or(0),
        )
    }

    /// Zone for a cell; frames without zone data read as [`Zone::Low`].
    pub fn zone_at(&self, row: usize, column: usize) -> Zone {
        self.zones
            .get(row)
            .and_then(|cells| cells.get(column))
            .copied()
            .unwrap_or_default()
    }
}
