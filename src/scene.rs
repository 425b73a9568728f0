//! Scene geometry
//!
//! A scene is the ordered, read-only list of walls every trajectory of a run
//! bounces between. It is assembled once from [`GeometryConfig`]:
//! - the main duct (closed end wall plus top and bottom walls)
//! - the unbounded backstop the particle escapes through
//! - a procedurally generated capillary slit array
//! - any extra walls listed verbatim in the configuration

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Result, SimError};
use crate::sim::{Boundary, BoundingBox, Line};

/// Rectangular duct open towards -x
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DuctConfig {
    pub x_range: [f64; 2],
    pub y_range: [f64; 2],
    /// Half-thickness of each wall's validity box
    pub tolerance: f64,
}

impl Default for DuctConfig {
    fn default() -> Self {
        Self {
            x_range: [DUCT_X_MIN, DUCT_X_MAX],
            y_range: [DUCT_Y_MIN, DUCT_Y_MAX],
            tolerance: WALL_TOLERANCE,
        }
    }
}

impl DuctConfig {
    /// End wall at `x_max`, then the top and bottom walls
    pub fn build(&self) -> Result<Vec<Boundary>> {
        let [x_min, x_max] = self.x_range;
        let [y_min, y_max] = self.y_range;
        let tol = self.tolerance;

        let end = Boundary::bounded(
            Line::vertical(x_max),
            BoundingBox::new([x_max - tol, x_max + tol], [y_min - tol, y_max + tol])?,
        );
        let top = Boundary::bounded(
            Line::horizontal(y_max),
            BoundingBox::new([x_min, x_max + tol], [y_max - tol, y_max + tol])?,
        );
        let bottom = Boundary::bounded(
            Line::horizontal(y_min),
            BoundingBox::new([x_min, x_max + tol], [y_min - tol, y_min + tol])?,
        );
        Ok(vec![end, top, bottom])
    }
}

/// Row of thin horizontal slits dividing a vertical span into `count` channels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapillaryArray {
    /// Number of channels; `count - 1` slit walls are generated
    pub count: usize,
    /// x where the slits begin
    pub x: f64,
    /// Slit length along +x
    pub length: f64,
    /// Vertical span [min, max] shared by the channels
    pub y_span: [f64; 2],
    /// Half-height of each slit's validity box
    pub half_height: f64,
}

impl Default for CapillaryArray {
    fn default() -> Self {
        Self {
            count: CAPILLARY_COUNT,
            x: DUCT_X_MIN,
            length: CAPILLARY_LENGTH,
            y_span: [DUCT_Y_MIN, DUCT_Y_MAX],
            half_height: CAPILLARY_HALF_HEIGHT,
        }
    }
}

impl CapillaryArray {
    /// Array with `count` channels starting at `x` over the default span
    pub fn new(count: usize, x: f64) -> Self {
        Self {
            count,
            x,
            ..Self::default()
        }
    }

    /// y positions of the slit walls, bottom to top
    pub fn slit_positions(&self) -> Result<Vec<f64>> {
        if self.count == 0 {
            return Err(SimError::InvalidCapillaryCount);
        }
        let [y_min, y_max] = self.y_span;
        let spacing = (y_max - y_min) / self.count as f64;
        Ok((1..self.count).map(|i| y_min + i as f64 * spacing).collect())
    }

    pub fn build(&self) -> Result<Vec<Boundary>> {
        let positions = self.slit_positions()?;
        let boundaries = positions
            .iter()
            .map(|&y| {
                BoundingBox::around(
                    DVec2::new(self.x + self.length / 2.0, y),
                    DVec2::new(self.length / 2.0, self.half_height),
                )
                .map(|limits| Boundary::bounded(Line::horizontal(y), limits))
            })
            .collect::<Result<Vec<_>>>()?;
        log::info!("{} capillary walls made at y={:?}", boundaries.len(), positions);
        Ok(boundaries)
    }
}

/// Declarative scene description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryConfig {
    /// Main duct, if any
    #[serde(default)]
    pub duct: Option<DuctConfig>,
    /// x of the vertical backstop wall, if any
    #[serde(default)]
    pub backstop_x: Option<f64>,
    /// Capillary array, if any
    #[serde(default)]
    pub capillaries: Option<CapillaryArray>,
    /// Additional walls, appended as given
    #[serde(default)]
    pub walls: Vec<Boundary>,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            duct: Some(DuctConfig::default()),
            backstop_x: Some(BACKSTOP_X),
            capillaries: Some(CapillaryArray::default()),
            walls: Vec::new(),
        }
    }
}

/// Immutable set of walls for one run
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    boundaries: Vec<Boundary>,
}

impl Scene {
    /// Validate every bounded wall's box and wrap the list.
    pub fn new(boundaries: Vec<Boundary>) -> Result<Self> {
        for (index, boundary) in boundaries.iter().enumerate() {
            if let Some(limits) = boundary.limits() {
                limits.validate(index)?;
            }
        }
        if !boundaries.iter().any(Boundary::is_terminal) {
            log::warn!("Scene has no backstop wall; trajectories can only end by exhausting their budget");
        }
        Ok(Self { boundaries })
    }

    /// Assemble duct, backstop, capillaries and extra walls, in that order
    pub fn from_config(config: &GeometryConfig) -> Result<Self> {
        let mut boundaries = Vec::new();
        if let Some(duct) = &config.duct {
            boundaries.extend(duct.build()?);
        }
        if let Some(x) = config.backstop_x {
            boundaries.push(Boundary::backstop(Line::vertical(x)));
        }
        if let Some(capillaries) = &config.capillaries {
            boundaries.extend(capillaries.build()?);
        }
        boundaries.extend(config.walls.iter().copied());

        let scene = Self::new(boundaries)?;
        log::info!("Scene built with {} walls", scene.len());
        Ok(scene)
    }

    pub fn boundaries(&self) -> &[Boundary] {
        &self.boundaries
    }

    pub fn len(&self) -> usize {
        self.boundaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }
}
