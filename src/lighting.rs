use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LightMode {
    Ambient,
    Wave,
    Pulse,
    Strobe,
}

impl LightMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LightMode::Ambient => "AMBIENT",
            LightMode::Wave => "WAVE",
            LightMode::Pulse => "PULSE",
            LightMode::Strobe => "STROBE",
        }
    }
}

/// Lighting configuration derived from the crowd metrics. Holds no history.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LightScene {
    pub mode: LightMode,
    pub color: &'static str,
    pub intensity_percent: u8,
    /// 0 means not synced to a tempo.
    pub bpm: u16,
    pub description: &'static str,
}

const STROBE: LightScene = LightScene {
    mode: LightMode::Strobe,
    color: "#ff0044",
    intensity_percent: 100,
    bpm: 140,
    description: "High intensity strobe sync'd to beat",
};

const PULSE: LightScene = LightScene {
    mode: LightMode::Pulse,
    color: "#ff00ff",
    intensity_percent: 75,
    bpm: 128,
    description: "Rhythmic pulse with color wash",
};

const WAVE: LightScene = LightScene {
    mode: LightMode::Wave,
    color: "#00ffff",
    intensity_percent: 50,
    bpm: 120,
    description: "Gentle wave across fixtures",
};

const AMBIENT: LightScene = LightScene {
    mode: LightMode::Ambient,
    color: "#4400ff",
    intensity_percent: 25,
    bpm: 0,
    description: "Low ambient glow",
};

/// Picks the scene for a (hype, energy) pair. First matching row wins and
/// every comparison is strict, so a value sitting exactly on a threshold
/// falls to the row below. NaN never matches and lands on AMBIENT.
///
/// There is no smoothing: a signal hovering around a threshold flips the
/// scene on every evaluation.
pub fn select_scene(hype_score: f64, mean_energy: f64) -> LightScene {
    if hype_score > 0.7 || mean_energy > 10.0 {
        STROBE
    } else if hype_score > 0.4 || mean_energy > 5.0 {
        PULSE
    } else if hype_score > 0.2 || mean_energy > 2.0 {
        WAVE
    } else {
        AMBIENT
    }
}

impl LightScene {
    pub fn is_synced(&self) -> bool {
        self.bpm > 0
    }

    /// Output level for each fixture in a rig of `fixtures`, in 0.3..=1.0.
    pub fn fixture_levels(&self, fixtures: usize) -> Vec<f64> {
        let level = 0.3 + f64::from(self.intensity_percent) / 100.0 * 0.7;
        vec![level; fixtures]
    }
}

impl Default for LightScene {
    fn default() -> Self {
        AMBIENT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cascade_rows() {
        assert_eq!(select_scene(0.9, 0.0).mode, LightMode::Strobe);
        assert_eq!(select_scene(0.0, 10.5).mode, LightMode::Strobe);
        assert_eq!(select_scene(0.5, 0.0).mode, LightMode::Pulse);
        assert_eq!(select_scene(0.0, 6.0).mode, LightMode::Pulse);
        assert_eq!(select_scene(0.3, 0.0).mode, LightMode::Wave);
        assert_eq!(select_scene(0.0, 2.5).mode, LightMode::Wave);
        assert_eq!(select_scene(0.0, 0.0), AMBIENT);
    }

    #[test]
    fn test_hype_wins_over_lower_energy_row() {
        let scene = select_scene(0.75, 3.0);
        assert_eq!(scene.mode, LightMode::Strobe);
        assert_eq!(scene.bpm, 140);
        assert_eq!(scene.color, "#ff0044");
        assert_eq!(scene.intensity_percent, 100);
    }

    #[test]
    fn test_thresholds_are_strict() {
        assert_eq!(select_scene(0.7, 0.0).mode, LightMode::Pulse);
        assert_eq!(select_scene(0.4, 0.0).mode, LightMode::Wave);
        assert_eq!(select_scene(0.2, 0.0).mode, LightMode::Ambient);
        assert_eq!(select_scene(0.0, 10.0).mode, LightMode::Pulse);
        assert_eq!(select_scene(0.0, 5.0).mode, LightMode::Wave);
        assert_eq!(select_scene(0.0, 2.0).mode, LightMode::Ambient);
    }

    #[test]
    fn test_deterministic() {
        for (hype, energy) in [(0.1, 0.1), (0.41, 4.9), (0.69, 9.99), (1.0, 15.0)] {
            assert_eq!(select_scene(hype, energy), select_scene(hype, energy));
        }
    }

    #[test]
    fn test_nan_is_ambient() {
        assert_eq!(select_scene(f64::NAN, f64::NAN).mode, LightMode::Ambient);
    }

    #[test]
    fn test_ambient_is_unsynced() {
        assert!(!select_scene(0.0, 0.0).is_synced());
        assert!(select_scene(0.3, 0.0).is_synced());
    }

    #[test]
    fn test_fixture_levels() {
        let levels = select_scene(0.9, 0.0).fixture_levels(8);
        assert_eq!(levels.len(), 8);
        assert!(levels.iter().all(|l| (l - 1.0).abs() < 1e-12));

        let ambient = select_scene(0.0, 0.0).fixture_levels(1)[0];
        assert!((ambient - 0.475).abs() < 1e-12);
    }

    #[test]
    fn test_serializes_like_the_dashboard_expects() {
        let value = serde_json::to_value(select_scene(0.5, 0.0)).unwrap();
        assert_eq!(value["mode"], "PULSE");
        assert_eq!(value["intensityPercent"], 75);
        assert_eq!(value["bpm"], 128);
    }
}
