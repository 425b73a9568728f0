//! Trajectory state machine
//!
//! One `step` resolves one straight segment: find every admissible wall,
//! keep the nearest, then either stop at the backstop or bounce.
//! `trace` repeats that until the particle escapes or the budget runs out.

use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::boundary::Boundary;
use super::collision::{Selection, candidate_hits, select_nearest};
use super::reflect::reflect;
use super::state::{Particle, Ray, Trajectory, TrajectoryPhase};
use crate::error::Result;
use crate::is_right_angle_multiple;

/// Per-trajectory parameters (read-only, shared by every trajectory of a batch)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraceConfig {
    /// Launch point
    pub start: DVec2,
    /// Maximum scatter added to each reflection (degrees)
    pub spread: i32,
    /// Steps allowed before the trajectory is abandoned
    pub step_budget: usize,
}

/// How a trajectory ended
#[derive(Debug, Clone, PartialEq)]
pub enum TrajectoryOutcome {
    /// Reached the backstop; the last point is the exit position
    Terminated {
        trajectory: Trajectory,
        /// Heading of the final segment (degrees, [0, 360))
        exit_angle: f64,
    },
    /// Still bouncing when the budget ran out
    BudgetExhausted { trajectory: Trajectory },
}

impl TrajectoryOutcome {
    pub fn trajectory(&self) -> &Trajectory {
        match self {
            TrajectoryOutcome::Terminated { trajectory, .. }
            | TrajectoryOutcome::BudgetExhausted { trajectory } => trajectory,
        }
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self, TrajectoryOutcome::Terminated { .. })
    }
}

/// Uniform integer launch heading in [0, 360), never a multiple of 90
pub fn sample_heading<R: Rng>(rng: &mut R) -> f64 {
    loop {
        let heading = f64::from(rng.random_range(0_u32..360));
        if !is_right_angle_multiple(heading) {
            return heading;
        }
    }
}

/// Advance the particle by one segment.
///
/// A bounce that uses up the particle's last step moves it to
/// `StepBudgetExhausted`. Does nothing once the particle has left `Traveling`.
pub fn step<R: Rng>(
    particle: &mut Particle,
    boundaries: &[Boundary],
    spread: i32,
    rng: &mut R,
) -> Result<TrajectoryPhase> {
    if particle.phase != TrajectoryPhase::Traveling {
        return Ok(particle.phase);
    }

    let ray = particle.ray;
    let candidates = candidate_hits(&ray, boundaries, particle.ignore_wall);

    match select_nearest(ray.position, &candidates, particle.steps())? {
        Selection::Terminated(point) => {
            particle.trajectory.push(point);
            particle.ray.position = point;
            particle.phase = TrajectoryPhase::Terminated;
        }
        Selection::Bounce { point, wall } => {
            particle.trajectory.push(point);
            let wall_angle = boundaries[wall].orientation_degrees();
            let reflection = reflect(ray.angle, wall_angle, spread, rng)?;
            particle.ray = Ray::from_heading(point, reflection.angle)?;
            particle.ignore_wall = Some(wall);
            if particle.steps() >= particle.step_budget {
                particle.phase = TrajectoryPhase::StepBudgetExhausted;
            }
        }
    }

    Ok(particle.phase)
}

/// Follow one particle from `config.start` along `heading` until it escapes
/// or exhausts its step budget.
pub fn trace<R: Rng>(
    boundaries: &[Boundary],
    config: &TraceConfig,
    heading: f64,
    rng: &mut R,
) -> Result<TrajectoryOutcome> {
    let mut particle = Particle::launch(config.start, heading, config.step_budget)?;

    loop {
        match step(&mut particle, boundaries, config.spread, rng)? {
            TrajectoryPhase::Traveling => {}
            TrajectoryPhase::Terminated => {
                return Ok(TrajectoryOutcome::Terminated {
                    exit_angle: particle.ray.angle,
                    trajectory: particle.trajectory,
                });
            }
            TrajectoryPhase::StepBudgetExhausted => {
                return Ok(TrajectoryOutcome::BudgetExhausted {
                    trajectory: particle.trajectory,
                });
            }
        }
    }
}

/// Follow one particle with a randomly drawn launch heading
pub fn run_trajectory<R: Rng>(
    boundaries: &[Boundary],
    config: &TraceConfig,
    rng: &mut R,
) -> Result<TrajectoryOutcome> {
    let heading = sample_heading(rng);
    trace(boundaries, config, heading, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;
    use crate::sim::boundary::BoundingBox;
    use crate::sim::line::Line;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn config(start: DVec2, step_budget: usize) -> TraceConfig {
        TraceConfig {
            start,
            spread: 0,
            step_budget,
        }
    }

    #[test]
    fn test_straight_into_backstop() {
        let walls = [Boundary::backstop(Line::vertical(0.0))];
        let mut rng = Pcg32::seed_from_u64(1);
        let outcome = trace(&walls, &config(DVec2::new(10.0, 0.0), 10), 180.0, &mut rng).unwrap();

        let TrajectoryOutcome::Terminated { trajectory, .. } = outcome else {
            panic!("expected termination");
        };
        assert_eq!(trajectory.steps(), 1);
        let end = trajectory.last().unwrap();
        assert!(end.distance(DVec2::ZERO) < 1e-9);
    }

    #[test]
    fn test_bounce_then_escape() {
        // Vertical mirror at x = 10, backstop at x = 0
        let walls = [
            Boundary::bounded(
                Line::vertical(10.0),
                BoundingBox::new([10.0 - 1e-6, 10.0 + 1e-6], [-100.0, 100.0]).unwrap(),
            ),
            Boundary::backstop(Line::vertical(0.0)),
        ];
        let mut rng = Pcg32::seed_from_u64(1);
        let outcome = trace(&walls, &config(DVec2::new(8.0, 0.0), 10), 45.0, &mut rng).unwrap();

        let TrajectoryOutcome::Terminated {
            trajectory,
            exit_angle,
        } = outcome
        else {
            panic!("expected termination");
        };
        let points = trajectory.points();
        assert_eq!(points.len(), 3);
        assert!(points[1].distance(DVec2::new(10.0, 2.0)) < 1e-9);
        assert!(points[2].distance(DVec2::new(0.0, 12.0)) < 1e-9);
        assert!((exit_angle - 135.0).abs() < 1e-9);
    }

    #[test]
    fn test_budget_exhausted_between_mirrors() {
        // Two mirrors and no backstop: bounces forever
        let mirror = |x: f64| {
            Boundary::bounded(
                Line::vertical(x),
                BoundingBox::new([x - 1e-6, x + 1e-6], [-1e9, 1e9]).unwrap(),
            )
        };
        let walls = [mirror(0.0), mirror(10.0)];
        let mut rng = Pcg32::seed_from_u64(1);
        let outcome = trace(&walls, &config(DVec2::new(5.0, 0.0), 6), 10.0, &mut rng).unwrap();

        assert!(!outcome.is_terminated());
        assert_eq!(outcome.trajectory().len(), 7);
    }

    #[test]
    fn test_no_hits_is_error() {
        let walls = [Boundary::bounded(
            Line::horizontal(50.0),
            BoundingBox::new([-1.0, 1.0], [49.0, 51.0]).unwrap(),
        )];
        let mut rng = Pcg32::seed_from_u64(1);
        let err = trace(&walls, &config(DVec2::ZERO, 5), 30.0, &mut rng).unwrap_err();
        assert!(matches!(err, SimError::NoCandidateHits { step: 0, .. }));
    }

    #[test]
    fn test_step_after_termination_is_noop() {
        let walls = [Boundary::backstop(Line::vertical(0.0))];
        let mut rng = Pcg32::seed_from_u64(1);
        let mut particle = Particle::launch(DVec2::new(3.0, 0.0), 170.0, 4).unwrap();
        assert_eq!(
            step(&mut particle, &walls, 0, &mut rng).unwrap(),
            TrajectoryPhase::Terminated
        );
        assert_eq!(
            step(&mut particle, &walls, 0, &mut rng).unwrap(),
            TrajectoryPhase::Terminated
        );
        assert_eq!(particle.trajectory.len(), 2);
    }

    #[test]
    fn test_ignore_wall_set_after_bounce() {
        let walls = [
            Boundary::backstop(Line::vertical(-100.0)),
            Boundary::bounded(
                Line::horizontal(1.0),
                BoundingBox::new([-10.0, 10.0], [1.0 - 1e-7, 1.0 + 1e-7]).unwrap(),
            ),
        ];
        let mut rng = Pcg32::seed_from_u64(1);
        let mut particle = Particle::launch(DVec2::ZERO, 60.0, 4).unwrap();
        step(&mut particle, &walls, 0, &mut rng).unwrap();
        assert_eq!(particle.ignore_wall, Some(1));
        assert!((particle.ray.angle - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_step_marks_budget_exhausted() {
        let mirror = |x: f64| {
            Boundary::bounded(
                Line::vertical(x),
                BoundingBox::new([x - 1e-6, x + 1e-6], [-1e9, 1e9]).unwrap(),
            )
        };
        let walls = [mirror(0.0), mirror(10.0)];
        let mut rng = Pcg32::seed_from_u64(1);
        let mut particle = Particle::launch(DVec2::new(5.0, 0.0), 10.0, 2).unwrap();

        assert_eq!(
            step(&mut particle, &walls, 0, &mut rng).unwrap(),
            TrajectoryPhase::Traveling
        );
        assert_eq!(
            step(&mut particle, &walls, 0, &mut rng).unwrap(),
            TrajectoryPhase::StepBudgetExhausted
        );
        // Spent particles stay put
        assert_eq!(
            step(&mut particle, &walls, 0, &mut rng).unwrap(),
            TrajectoryPhase::StepBudgetExhausted
        );
        assert_eq!(particle.trajectory.len(), 3);
    }

    #[test]
    fn test_bounce_keeps_reflected_heading_exactly() {
        // Channel between two horizontal walls, backstop far behind
        let slit = |y: f64| {
            Boundary::bounded(
                Line::horizontal(y),
                BoundingBox::new([-1e6, 1e6], [y - 1e-7, y + 1e-7]).unwrap(),
            )
        };
        let walls = [slit(1.0), slit(-1.0), Boundary::backstop(Line::vertical(-1e7))];
        let mut rng = Pcg32::seed_from_u64(8);
        let mut particle = Particle::launch(DVec2::ZERO, 61.0, 50).unwrap();

        for _ in 0..20 {
            let before = particle.ray.angle;
            let mut expected_rng = rng.clone();
            assert_eq!(
                step(&mut particle, &walls, 20, &mut rng).unwrap(),
                TrajectoryPhase::Traveling
            );
            let Some(wall) = particle.ignore_wall else {
                panic!("particle should have bounced");
            };
            let expected = reflect(before, walls[wall].orientation_degrees(), 20, &mut expected_rng)
                .unwrap();
            assert_eq!(particle.ray.angle, expected.angle);
            assert_eq!(particle.ray.angle.fract(), 0.0);
        }
    }

    #[test]
    fn test_sample_heading_avoids_right_angles() {
        let mut rng = Pcg32::seed_from_u64(99);
        for _ in 0..2000 {
            let heading = sample_heading(&mut rng);
            assert!((0.0..360.0).contains(&heading));
            assert_eq!(heading.fract(), 0.0);
            assert!(!is_right_angle_multiple(heading));
        }
    }

    #[test]
    fn test_determinism() {
        // Same seed, same path
        let walls = [
            Boundary::bounded(
                Line::horizontal(2.0),
                BoundingBox::new([0.0, 50.0], [2.0 - 1e-7, 2.0 + 1e-7]).unwrap(),
            ),
            Boundary::bounded(
                Line::horizontal(-2.0),
                BoundingBox::new([0.0, 50.0], [-2.0 - 1e-7, -2.0 + 1e-7]).unwrap(),
            ),
            Boundary::backstop(Line::vertical(-500.0)),
        ];
        let cfg = TraceConfig {
            start: DVec2::new(45.0, 0.0),
            spread: 20,
            step_budget: 100,
        };
        let a = run_trajectory(&walls, &cfg, &mut Pcg32::seed_from_u64(42)).unwrap();
        let b = run_trajectory(&walls, &cfg, &mut Pcg32::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }
}
