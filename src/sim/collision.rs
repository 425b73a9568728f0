//! Ray/wall collision detection and nearest-hit selection
//!
//! The tricky part of the engine: a line without a direction crosses a wall's
//! infinite extension both ahead of and behind the particle, so every
//! candidate is filtered by travel direction before the nearest one wins.

use glam::DVec2;

use super::boundary::Boundary;
use super::line::Direction;
use super::state::Ray;
use crate::error::{Result, SimError};

/// Why a wall produced no usable collision this step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissReason {
    /// Ray and wall share a gradient
    ParallelLines,
    /// Ray is already past the wall's x-range and moving away from it
    WrongDirection,
    /// Crossing lies outside the wall's validity box
    OutOfLimits,
    /// Crossing lies behind the ray
    BehindRay,
}

/// An admissible crossing with a wall
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub point: DVec2,
    /// Set when the wall is the unbounded backstop
    pub terminal: bool,
}

/// Result of a collision check
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Collision {
    Hit(Hit),
    Miss(MissReason),
}

impl Collision {
    pub fn hit(self) -> Option<Hit> {
        match self {
            Collision::Hit(hit) => Some(hit),
            Collision::Miss(_) => None,
        }
    }
}

/// Check where the ray meets a wall, if it can.
pub fn find_collision(ray: &Ray, boundary: &Boundary) -> Collision {
    let Some(point) = ray.line.intersection(boundary.line()) else {
        return Collision::Miss(MissReason::ParallelLines);
    };

    let limits = match boundary {
        Boundary::Unbounded { .. } => {
            return Collision::Hit(Hit {
                point,
                terminal: true,
            });
        }
        Boundary::Bounded { limits, .. } => limits,
    };

    // Already past the wall and heading further away
    let x = ray.position.x;
    let moving_away = match ray.direction {
        Direction::Decreasing => x < limits.x_min(),
        Direction::Increasing => x > limits.x_max(),
    };
    if moving_away {
        return Collision::Miss(MissReason::WrongDirection);
    }

    if !limits.contains(point) {
        return Collision::Miss(MissReason::OutOfLimits);
    }

    let behind = match ray.direction {
        Direction::Decreasing => point.x > x,
        Direction::Increasing => point.x < x,
    };
    if behind {
        return Collision::Miss(MissReason::BehindRay);
    }

    Collision::Hit(Hit {
        point,
        terminal: false,
    })
}

/// Collect admissible hits against every wall except `ignore`
pub fn candidate_hits(ray: &Ray, boundaries: &[Boundary], ignore: Option<usize>) -> Vec<(Hit, usize)> {
    boundaries
        .iter()
        .enumerate()
        .filter(|(index, _)| Some(*index) != ignore)
        .filter_map(|(index, boundary)| find_collision(ray, boundary).hit().map(|hit| (hit, index)))
        .collect()
}

/// Outcome of choosing among one step's candidates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Selection {
    /// The backstop was the only thing left to hit
    Terminated(DVec2),
    /// Bounce off wall `wall` at `point`
    Bounce { point: DVec2, wall: usize },
}

/// Pick the nearest candidate to `origin`.
///
/// A lone terminal candidate ends the trajectory. Equal distances keep the
/// first candidate in input order. `step` only labels the error.
pub fn select_nearest(origin: DVec2, candidates: &[(Hit, usize)], step: usize) -> Result<Selection> {
    match candidates {
        [] => Err(SimError::NoCandidateHits {
            step,
            x: origin.x,
            y: origin.y,
        }),
        [(hit, _)] if hit.terminal => Ok(Selection::Terminated(hit.point)),
        [first, rest @ ..] => {
            let mut best = first;
            let mut best_dist = origin.distance(first.0.point);
            for candidate in rest {
                let dist = origin.distance(candidate.0.point);
                if dist < best_dist {
                    best = candidate;
                    best_dist = dist;
                }
            }
            Ok(Selection::Bounce {
                point: best.0.point,
                wall: best.1,
            })
        }
    }
}
