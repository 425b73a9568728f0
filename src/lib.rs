//! Capillary Sim - Monte Carlo particle bounces through a duct and slit array
//!
//! Core modules:
//! - `sim`: Deterministic per-trajectory engine (lines, walls, collisions, reflection)
//! - `scene`: Immutable geometry built from configuration (duct, capillaries, backstop)
//! - `batch`: Parallel batch driver that filters and persists terminal values
//! - `results`: Flat one-float-per-line result store
//! - `settings`: JSON-backed run settings

pub mod batch;
pub mod error;
pub mod results;
pub mod scene;
pub mod settings;
pub mod sim;

pub use batch::{BatchDriver, BatchReport};
pub use error::SimError;
pub use scene::Scene;
pub use settings::{RecordMode, SimSettings};

/// Default run constants
pub mod consts {
    /// Particle start position
    pub const START_X: f64 = 150.0;
    pub const START_Y: f64 = 0.0;

    /// Maximum random deflection added to each reflection (degrees)
    pub const REFLECTION_SPREAD: u32 = 20;
    /// Bounce steps before a trajectory is abandoned
    pub const STEP_BUDGET: usize = 200;
    /// Trajectories per batch
    pub const TRAJECTORY_COUNT: usize = 50_000;

    /// Main duct extent
    pub const DUCT_X_MIN: f64 = 120.0;
    pub const DUCT_X_MAX: f64 = 160.0;
    pub const DUCT_Y_MIN: f64 = -3.0;
    pub const DUCT_Y_MAX: f64 = 3.0;
    /// Half-thickness of the validity box around duct walls
    pub const WALL_TOLERANCE: f64 = 1e-6;

    /// Capillary array defaults
    pub const CAPILLARY_COUNT: usize = 5;
    pub const CAPILLARY_LENGTH: f64 = 20.0;
    /// Half-height of a capillary slit box
    pub const CAPILLARY_HALF_HEIGHT: f64 = 1e-7;

    /// Terminal backstop wall location
    pub const BACKSTOP_X: f64 = 0.0;

    /// Terminal |y| at or beyond which a result is not recorded
    pub const MAX_ABS_Y: f64 = 2000.0;

    /// Redraw attempts before a degenerate reflected heading is given up on
    pub const MAX_HEADING_REDRAWS: u32 = 1000;

    /// Progress log interval (trajectories)
    pub const PROGRESS_EVERY: usize = 500;
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid rounds tiny negatives up to exactly 360
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Normalize an angle in degrees to (-180, 180]
#[inline]
pub fn signed_degrees(angle: f64) -> f64 {
    let wrapped = normalize_degrees(angle);
    if wrapped > 180.0 { wrapped - 360.0 } else { wrapped }
}

/// True when the angle sits exactly on a multiple of 90 degrees
#[inline]
pub fn is_right_angle_multiple(angle: f64) -> bool {
    angle % 90.0 == 0.0
}
