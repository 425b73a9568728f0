//! Per-trajectory state
//!
//! Everything one particle needs between steps lives here. Nothing is shared
//! between trajectories except the read-only scene.

use glam::DVec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::line::{Direction, Line, degrees_to_line};
use crate::error::Result;
use crate::normalize_degrees;

/// Current phase of a trajectory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrajectoryPhase {
    /// Still bouncing
    Traveling,
    /// Crossed the backstop
    Terminated,
    /// Ran out of steps without escaping
    StepBudgetExhausted,
}

/// A particle's straight-line travel state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub line: Line,
    pub direction: Direction,
    pub position: DVec2,
    /// Heading in degrees, [0, 360), consistent with `line` and `direction`
    pub angle: f64,
}

impl Ray {
    /// Ray leaving `position` with the given heading.
    ///
    /// The heading is stored as given (normalized to [0, 360)), never
    /// re-derived from the slope.
    pub fn from_heading(position: DVec2, angle: f64) -> Result<Self> {
        let (slope, direction) = degrees_to_line(angle)?;
        Ok(Self {
            line: Line::from_slope_and_point(slope, position),
            direction,
            position,
            angle: normalize_degrees(angle),
        })
    }
}

/// Ordered path of one particle, start point first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    points: Vec<DVec2>,
}

impl Trajectory {
    /// Empty path sized for `step_budget` steps plus the start point
    pub fn with_budget(step_budget: usize) -> Self {
        Self {
            points: Vec::with_capacity(step_budget + 1),
        }
    }

    pub fn push(&mut self, point: DVec2) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[DVec2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<DVec2> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<DVec2> {
        self.points.last().copied()
    }

    /// Number of resolved steps (segments) in the path
    pub fn steps(&self) -> usize {
        self.points.len().saturating_sub(1)
    }
}

/// A particle in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub ray: Ray,
    /// Wall hit on the previous step, skipped for the next search
    pub ignore_wall: Option<usize>,
    pub phase: TrajectoryPhase,
    pub trajectory: Trajectory,
    /// Steps allowed before the particle stops as `StepBudgetExhausted`
    pub step_budget: usize,
}

impl Particle {
    /// Particle at `start` with the given heading, path seeded with the start point
    pub fn launch(start: DVec2, heading: f64, step_budget: usize) -> Result<Self> {
        let mut trajectory = Trajectory::with_budget(step_budget);
        trajectory.push(start);
        let phase = if step_budget == 0 {
            TrajectoryPhase::StepBudgetExhausted
        } else {
            TrajectoryPhase::Traveling
        };
        Ok(Self {
            ray: Ray::from_heading(start, heading)?,
            ignore_wall: None,
            phase,
            trajectory,
            step_budget,
        })
    }

    /// Steps resolved so far
    pub fn steps(&self) -> usize {
        self.trajectory.steps()
    }
}

/// RNG seed wrapper so every trajectory gets its own reproducible stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    /// Stream for trajectory `index` of a batch seeded with `seed`
    pub fn for_trajectory(seed: u64, index: usize) -> Self {
        Self {
            seed,
            stream: index as u64,
        }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::new(self.seed, self.stream)
    }
}
