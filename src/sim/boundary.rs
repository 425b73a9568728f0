//! Walls of the scene
//!
//! A wall is an infinite line restricted to an axis-aligned validity box, or
//! left unbounded. The single unbounded wall is the terminal backstop: any
//! crossing with it counts, in either direction.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::line::Line;
use crate::error::{Result, SimError};

/// Axis-aligned validity region for intersections on a wall
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// [min, max] along x
    pub x_range: [f64; 2],
    /// [min, max] along y
    pub y_range: [f64; 2],
}

impl BoundingBox {
    /// Build a box; `min` must be strictly below `max` on both axes.
    pub fn new(x_range: [f64; 2], y_range: [f64; 2]) -> Result<Self> {
        let bbox = Self { x_range, y_range };
        bbox.validate(0)?;
        Ok(bbox)
    }

    /// Box spanning `center ± half_extent` on each axis
    pub fn around(center: DVec2, half_extent: DVec2) -> Result<Self> {
        Self::new(
            [center.x - half_extent.x, center.x + half_extent.x],
            [center.y - half_extent.y, center.y + half_extent.y],
        )
    }

    /// Check both ranges are finite with min < max.
    ///
    /// `index` only labels the error.
    pub fn validate(&self, index: usize) -> Result<()> {
        for (axis, [min, max]) in [("x", self.x_range), ("y", self.y_range)] {
            if !min.is_finite() || !max.is_finite() || min >= max {
                return Err(SimError::InvalidLimits {
                    index,
                    axis,
                    min,
                    max,
                });
            }
        }
        Ok(())
    }

    #[inline]
    pub fn x_min(&self) -> f64 {
        self.x_range[0]
    }

    #[inline]
    pub fn x_max(&self) -> f64 {
        self.x_range[1]
    }

    #[inline]
    pub fn y_min(&self) -> f64 {
        self.y_range[0]
    }

    #[inline]
    pub fn y_max(&self) -> f64 {
        self.y_range[1]
    }

    /// Inclusive containment on both axes
    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.x_min() && p.x <= self.x_max() && p.y >= self.y_min() && p.y <= self.y_max()
    }

    pub fn width(&self) -> f64 {
        self.x_max() - self.x_min()
    }

    pub fn height(&self) -> f64 {
        self.y_max() - self.y_min()
    }
}

/// A wall in the scene
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Boundary {
    /// Ordinary wall: hits only count inside `limits`
    Bounded { line: Line, limits: BoundingBox },
    /// Terminal backstop: every crossing ends the trajectory
    Unbounded { line: Line },
}

impl Boundary {
    pub fn bounded(line: Line, limits: BoundingBox) -> Self {
        Boundary::Bounded { line, limits }
    }

    pub fn backstop(line: Line) -> Self {
        Boundary::Unbounded { line }
    }

    pub fn line(&self) -> &Line {
        match self {
            Boundary::Bounded { line, .. } | Boundary::Unbounded { line } => line,
        }
    }

    pub fn limits(&self) -> Option<&BoundingBox> {
        match self {
            Boundary::Bounded { limits, .. } => Some(limits),
            Boundary::Unbounded { .. } => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Boundary::Unbounded { .. })
    }

    /// Orientation of the wall in degrees (see [`Line::orientation_degrees`])
    pub fn orientation_degrees(&self) -> f64 {
        self.line().orientation_degrees()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_rejects_inverted_range() {
        let err = BoundingBox::new([1.0, 0.0], [0.0, 1.0]).unwrap_err();
        assert!(matches!(err, SimError::InvalidLimits { axis: "x", .. }));

        let err = BoundingBox::new([0.0, 1.0], [2.0, 2.0]).unwrap_err();
        assert!(matches!(err, SimError::InvalidLimits { axis: "y", .. }));

        assert!(BoundingBox::new([0.0, f64::NAN], [0.0, 1.0]).is_err());
    }

    #[test]
    fn test_bbox_accepts_thin_slit() {
        let bbox = BoundingBox::new([60.0, 80.0], [2.0 - 1e-7, 2.0 + 1e-7]).unwrap();
        assert!(bbox.height() < 1e-6);
        assert!(bbox.contains(DVec2::new(70.0, 2.0)));
        assert!(!bbox.contains(DVec2::new(70.0, 2.001)));
    }

    #[test]
    fn test_bbox_around() {
        let bbox = BoundingBox::around(DVec2::new(5.0, 0.0), DVec2::new(1.0, 3.0)).unwrap();
        assert_eq!(bbox.x_range, [4.0, 6.0]);
        assert_eq!(bbox.y_range, [-3.0, 3.0]);
        assert!((bbox.width() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_boundary_variants() {
        let wall = Boundary::bounded(
            Line::horizontal(1.0),
            BoundingBox::new([0.0, 1.0], [0.9, 1.1]).unwrap(),
        );
        assert!(!wall.is_terminal());
        assert!(wall.limits().is_some());

        let backstop = Boundary::backstop(Line::vertical(0.0));
        assert!(backstop.is_terminal());
        assert!(backstop.limits().is_none());
        assert_eq!(backstop.orientation_degrees(), 90.0);
    }

    #[test]
    fn test_boundary_serde_roundtrip() {
        let wall = Boundary::backstop(Line::vertical(-4.0));
        let json = serde_json::to_string(&wall).unwrap();
        let back: Boundary = serde_json::from_str(&json).unwrap();
        assert_eq!(wall, back);
    }
}
