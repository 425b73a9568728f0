//! Run settings
//!
//! Persisted as JSON next to the results so a batch can be re-run exactly.

use std::fs;
use std::path::{Path, PathBuf};

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Result, SimError};
use crate::scene::GeometryConfig;
use crate::sim::TraceConfig;

/// Which terminal value a retained trajectory contributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecordMode {
    /// y of the exit point on the backstop
    #[default]
    TerminalY,
    /// Heading of the last segment, degrees in (-180, 180]
    ExitAngle,
}

impl RecordMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordMode::TerminalY => "terminal_y",
            RecordMode::ExitAngle => "exit_angle",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "terminal_y" | "y" => Some(RecordMode::TerminalY),
            "exit_angle" | "angle" => Some(RecordMode::ExitAngle),
            _ => None,
        }
    }
}

/// Settings for one batch run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimSettings {
    // === Particle ===
    /// Launch point shared by every trajectory
    pub start: DVec2,
    /// Maximum random deflection per bounce (degrees)
    pub spread: i32,
    /// Bounces allowed before a trajectory is discarded
    pub step_budget: usize,

    // === Batch ===
    /// Number of trajectories to run
    pub trajectories: usize,
    /// Batch seed; trajectory `i` uses stream `i` of this seed
    pub seed: u64,
    /// Value written per retained trajectory
    pub record: RecordMode,
    /// Trajectories ending with |y| at or beyond this are not recorded
    pub max_abs_y: f64,
    /// Result file, truncated at the start of each run
    pub output: PathBuf,

    // === Geometry ===
    pub geometry: GeometryConfig,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            start: DVec2::new(START_X, START_Y),
            spread: REFLECTION_SPREAD as i32,
            step_budget: STEP_BUDGET,

            trajectories: TRAJECTORY_COUNT,
            seed: 0,
            record: RecordMode::TerminalY,
            max_abs_y: MAX_ABS_Y,
            output: PathBuf::from("capillary_results.txt"),

            geometry: GeometryConfig::default(),
        }
    }
}

impl SimSettings {
    /// Load settings from a JSON file; missing fields take their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&json)?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Reject values no run can use
    pub fn validate(&self) -> Result<()> {
        if !self.start.is_finite() {
            return Err(SimError::InvalidConfig("start position must be finite"));
        }
        if self.spread.unsigned_abs() > 180 {
            return Err(SimError::InvalidConfig("spread must be within [-180, 180] degrees"));
        }
        if self.step_budget == 0 {
            return Err(SimError::InvalidConfig("step_budget must be non-zero"));
        }
        if self.max_abs_y.is_nan() || self.max_abs_y <= 0.0 {
            return Err(SimError::InvalidConfig("max_abs_y must be positive"));
        }
        Ok(())
    }

    /// Per-trajectory parameters
    pub fn trace_config(&self) -> TraceConfig {
        TraceConfig {
            start: self.start,
            spread: self.spread,
            step_budget: self.step_budget,
        }
    }
}
