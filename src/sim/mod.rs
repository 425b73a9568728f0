//! Deterministic trajectory engine
//!
//! All collision and reflection logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only, one stream per trajectory
//! - Stable iteration order (by boundary index)
//! - No I/O, no shared mutable state

pub mod boundary;
pub mod collision;
pub mod line;
pub mod reflect;
pub mod state;
pub mod tick;

pub use boundary::{Boundary, BoundingBox};
pub use collision::{Collision, Hit, MissReason, Selection, candidate_hits, find_collision, select_nearest};
pub use line::{Direction, Line, degrees_to_line, line_to_degrees};
pub use reflect::{Reflection, reflect};
pub use state::{Particle, Ray, RngState, Trajectory, TrajectoryPhase};
pub use tick::{TraceConfig, TrajectoryOutcome, run_trajectory, sample_heading, step, trace};
