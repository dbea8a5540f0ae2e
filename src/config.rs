use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Fewest people a day can be scheduled with
pub const MIN_HEADCOUNT: usize = 5;

/// Days of history kept and read for fairness scoring
pub const HISTORY_WINDOW_DAYS: usize = 7;

/// Weights for candidate scoring.
///
/// The defaults are the production values; a JSON file with any subset of
/// the fields overrides them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScoringWeights {
    /// Preference assumed when a person has none for a position (1-5 scale)
    pub default_preference: u8,
    /// Bonus for a position the person has not worked yet today
    pub variety_bonus: f64,
    /// Subtracted per time the person worked the position in the history window
    pub history_penalty_per_shift: f64,
    /// Subtracted when the person held the same position in the same slot on the previous recorded day
    pub same_slot_previous_day_penalty: f64,
    /// Base penalty for a second hot station in one day
    pub repeat_hazard_base_penalty: f64,
    /// Taken off the base penalty per seniority rank (GM = 1 ... Team Member = 4)
    pub repeat_hazard_seniority_step: f64,
    /// Added when the hot station is the same type as one already worked today
    pub same_hazard_type_penalty: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            default_preference: 3,
            variety_bonus: 2.0,
            history_penalty_per_shift: 0.5,
            same_slot_previous_day_penalty: 500.0,
            repeat_hazard_base_penalty: 1000.0,
            repeat_hazard_seniority_step: 50.0,
            same_hazard_type_penalty: 500.0,
        }
    }
}

impl ScoringWeights {
    /// Reads weights from a JSON file; missing fields keep their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let weights = serde_json::from_str(&raw)?;
        Ok(weights)
    }
}

/// Runtime settings shared by the CLI and the web server
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub history_path: PathBuf,
    pub staff_path: PathBuf,
    pub history_window: usize,
    pub weights: ScoringWeights,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            history_path: std::env::var("ROTATION_HISTORY")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/history.json")),
            staff_path: PathBuf::from("data/staff.json"),
            history_window: HISTORY_WINDOW_DAYS,
            weights: ScoringWeights::default(),
        }
    }
}
