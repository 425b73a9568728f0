//! Straight-line geometry for rays and walls
//!
//! Headings are stored two ways that must agree:
//! - an angle in degrees, 0 along +x, increasing anticlockwise, in [0, 360)
//! - a `Line` plus a `Direction` telling which way along x the ray travels
//!
//! Vertical lines are their own variant so no huge-slope stand-in ever enters
//! the intersection formula.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::normalize_degrees;

/// Sign of travel along the x axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Increasing,
    Decreasing,
}

impl Direction {
    /// +1.0 for increasing x, -1.0 for decreasing x
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Direction::Increasing => 1.0,
            Direction::Decreasing => -1.0,
        }
    }
}

/// An infinite straight line in the plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Line {
    /// y = slope * x + intercept
    Sloped { slope: f64, intercept: f64 },
    /// x = x
    Vertical { x: f64 },
}

impl Line {
    /// Horizontal line y = y
    pub fn horizontal(y: f64) -> Self {
        Line::Sloped {
            slope: 0.0,
            intercept: y,
        }
    }

    pub fn vertical(x: f64) -> Self {
        Line::Vertical { x }
    }

    /// Line with the given slope passing through `point`
    pub fn from_slope_and_point(slope: f64, point: DVec2) -> Self {
        Line::Sloped {
            slope,
            intercept: point.y - slope * point.x,
        }
    }

    /// Orientation of the line in degrees, read as if travelling towards +x.
    ///
    /// Walls have no intrinsic direction, so this is what the reflector uses.
    pub fn orientation_degrees(&self) -> f64 {
        match *self {
            Line::Sloped { slope, .. } => line_to_degrees(slope, Direction::Increasing),
            Line::Vertical { .. } => 90.0,
        }
    }

    /// Whether two lines share a gradient (never meet at a single point)
    pub fn is_parallel_to(&self, other: &Line) -> bool {
        match (self, other) {
            (Line::Sloped { slope: a, .. }, Line::Sloped { slope: b, .. }) => a == b,
            (Line::Vertical { .. }, Line::Vertical { .. }) => true,
            _ => false,
        }
    }

    /// Unique crossing point of two lines, `None` when parallel
    pub fn intersection(&self, other: &Line) -> Option<DVec2> {
        match (*self, *other) {
            (
                Line::Sloped {
                    slope: m1,
                    intercept: c1,
                },
                Line::Sloped {
                    slope: m2,
                    intercept: c2,
                },
            ) => {
                if m1 == m2 {
                    return None;
                }
                let x = (c2 - c1) / (m1 - m2);
                Some(DVec2::new(x, x * m1 + c1))
            }
            (Line::Sloped { slope, intercept }, Line::Vertical { x })
            | (Line::Vertical { x }, Line::Sloped { slope, intercept }) => {
                Some(DVec2::new(x, slope * x + intercept))
            }
            (Line::Vertical { .. }, Line::Vertical { .. }) => None,
        }
    }
}

/// Convert a heading in degrees to a slope and x-direction.
///
/// Fails for headings whose tangent is undefined (90 and 270).
pub fn degrees_to_line(angle: f64) -> Result<(f64, Direction)> {
    let angle = normalize_degrees(angle);
    if angle == 90.0 || angle == 270.0 {
        return Err(SimError::DegenerateHeading { angle });
    }
    let direction = if angle > 90.0 && angle <= 270.0 {
        Direction::Decreasing
    } else {
        Direction::Increasing
    };
    Ok((angle.to_radians().tan(), direction))
}

/// Convert a slope and x-direction back to a heading in [0, 360)
pub fn line_to_degrees(slope: f64, direction: Direction) -> f64 {
    let additional = match direction {
        Direction::Decreasing => 180.0,
        Direction::Increasing if slope < 0.0 => 360.0,
        Direction::Increasing => 0.0,
    };
    normalize_degrees(slope.atan().to_degrees() + additional)
}

/// Smallest angular separation between two headings, in [0, 180]
pub fn angular_distance(a: f64, b: f64) -> f64 {
    let diff = normalize_degrees(a - b);
    diff.min(360.0 - diff)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degrees_to_line_quadrants() {
        let (m, dir) = degrees_to_line(45.0).unwrap();
        assert!((m - 1.0).abs() < 1e-12);
        assert_eq!(dir, Direction::Increasing);

        let (m, dir) = degrees_to_line(135.0).unwrap();
        assert!((m + 1.0).abs() < 1e-12);
        assert_eq!(dir, Direction::Decreasing);

        let (_, dir) = degrees_to_line(270.5).unwrap();
        assert_eq!(dir, Direction::Increasing);

        let (_, dir) = degrees_to_line(180.0).unwrap();
        assert_eq!(dir, Direction::Decreasing);
    }

    #[test]
    fn test_degrees_to_line_rejects_vertical_headings() {
        assert!(matches!(
            degrees_to_line(90.0),
            Err(SimError::DegenerateHeading { .. })
        ));
        assert!(degrees_to_line(-90.0).is_err());
        assert!(degrees_to_line(270.0).is_err());
    }

    #[test]
    fn test_line_to_degrees_wraps_negative_slope() {
        // Heading down-right: negative slope travelling towards +x
        let angle = line_to_degrees(-1.0, Direction::Increasing);
        assert!((angle - 315.0).abs() < 1e-9);

        let angle = line_to_degrees(-1.0, Direction::Decreasing);
        assert!((angle - 135.0).abs() < 1e-9);

        let angle = line_to_degrees(1.0, Direction::Decreasing);
        assert!((angle - 225.0).abs() < 1e-9);
    }

    #[test]
    fn test_from_slope_and_point() {
        let line = Line::from_slope_and_point(2.0, DVec2::new(1.0, 5.0));
        assert_eq!(
            line,
            Line::Sloped {
                slope: 2.0,
                intercept: 3.0
            }
        );
    }

    #[test]
    fn test_orientation_degrees() {
        assert_eq!(Line::vertical(4.0).orientation_degrees(), 90.0);
        assert_eq!(Line::horizontal(-2.0).orientation_degrees(), 0.0);
        let diag = Line::from_slope_and_point(-1.0, DVec2::ZERO);
        assert!((diag.orientation_degrees() - 315.0).abs() < 1e-9);
    }

    #[test]
    fn test_intersection_sloped_and_vertical() {
        let ray = Line::from_slope_and_point(0.5, DVec2::new(0.0, 1.0));
        let p = ray.intersection(&Line::vertical(4.0)).unwrap();
        assert!((p - DVec2::new(4.0, 3.0)).length() < 1e-12);

        let p = ray.intersection(&Line::horizontal(2.0)).unwrap();
        assert!((p - DVec2::new(2.0, 2.0)).length() < 1e-12);
    }

    #[test]
    fn test_parallel_lines_have_no_intersection() {
        let a = Line::from_slope_and_point(1.5, DVec2::ZERO);
        let b = Line::from_slope_and_point(1.5, DVec2::new(0.0, 3.0));
        assert!(a.is_parallel_to(&b));
        assert!(a.intersection(&b).is_none());
        assert!(Line::vertical(1.0).intersection(&Line::vertical(2.0)).is_none());
    }

    #[test]
    fn test_angular_distance() {
        assert!((angular_distance(350.0, 10.0) - 20.0).abs() < 1e-12);
        assert!((angular_distance(10.0, 190.0) - 180.0).abs() < 1e-12);
        assert_eq!(angular_distance(42.0, 42.0), 0.0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn any_heading() -> impl Strategy<Value = f64> {
            (0.0_f64..360.0).prop_filter("not a multiple of 90", |a| a % 90.0 != 0.0)
        }

        proptest! {
            #[test]
            fn heading_round_trips_through_line(angle in any_heading()) {
                let (slope, dir) = degrees_to_line(angle).unwrap();
                let back = line_to_degrees(slope, dir);
                prop_assert!(
                    angular_distance(back, angle) < 1e-6,
                    "angle {angle} came back as {back}"
                );
            }

            #[test]
            fn line_to_degrees_stays_in_range(slope in -1e6_f64..1e6, decreasing in any::<bool>()) {
                let dir = if decreasing { Direction::Decreasing } else { Direction::Increasing };
                let angle = line_to_degrees(slope, dir);
                prop_assert!((0.0..360.0).contains(&angle), "slope {slope} gave {angle}");
            }
        }
    }
}
