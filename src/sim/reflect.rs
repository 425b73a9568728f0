//! Angle reflection off a wall with bounded random scatter
//!
//! Angles are degrees, 0 along +x, anticlockwise. A wall has no direction,
//! so a 45 degree wall reflects exactly like a 225 degree one.

use rand::Rng;

use crate::consts::MAX_HEADING_REDRAWS;
use crate::error::{Result, SimError};
use crate::{is_right_angle_multiple, normalize_degrees};

/// Details of one reflection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reflection {
    /// Outgoing heading in [0, 360), never a multiple of 90
    pub angle: f64,
    /// Mirror reflection before scatter
    pub ideal: f64,
    /// Angular gap between the ideal reflection and the wall's line
    pub limit: f64,
    /// Scatter range actually used after clamping
    pub spread: i32,
    /// Scatter drawn for the accepted heading
    pub perturbation: i32,
}

/// Angular gap between a heading and a wall line, measured either way round
pub fn wall_gap(wall: f64, heading: f64) -> f64 {
    let wall = normalize_degrees(wall) % 180.0;
    [
        (wall - heading).abs(),
        (180.0 + wall - heading).abs(),
        (360.0 + wall - heading).abs(),
        (wall - 180.0 - heading).abs(),
    ]
    .into_iter()
    .fold(f64::INFINITY, f64::min)
}

/// Largest scatter that cannot push the reflected ray back through the wall
pub fn clamp_spread(spread: i32, limit: f64) -> i32 {
    let cap = (limit / 1.5).round() as u32;
    // cap <= 120 since limit never exceeds 180
    spread.unsigned_abs().min(cap) as i32
}

/// Reflect `particle_angle` off a wall oriented at `wall_angle`.
///
/// Scatter is a uniform integer in `[-spread, spread]` after clamping. Draws
/// landing on a multiple of 90 are redrawn; after `MAX_HEADING_REDRAWS`
/// failed draws the reflection is reported as degenerate.
pub fn reflect<R: Rng>(
    particle_angle: f64,
    wall_angle: f64,
    spread: i32,
    rng: &mut R,
) -> Result<Reflection> {
    let wall = normalize_degrees(wall_angle) % 180.0;
    let ideal = normalize_degrees(2.0 * wall - particle_angle);
    let limit = wall_gap(wall, ideal);
    let spread = clamp_spread(spread, limit);

    for _ in 0..MAX_HEADING_REDRAWS {
        let perturbation = rng.random_range(-spread..=spread);
        let angle = normalize_degrees(ideal + f64::from(perturbation));
        if !is_right_angle_multiple(angle) {
            return Ok(Reflection {
                angle,
                ideal,
                limit,
                spread,
                perturbation,
            });
        }
    }

    Err(SimError::DegenerateHeading { angle: ideal })
}
