//! Error types shared by the engine, scene construction and batch driver

use thiserror::Error;

/// Errors raised while building a scene, tracing a trajectory or running a batch.
#[derive(Debug, Error)]
pub enum SimError {
    /// No boundary admitted a forward intersection, not even the backstop.
    #[error("no boundary was hit at step {step} from ({x}, {y})")]
    NoCandidateHits { step: usize, x: f64, y: f64 },
    /// A heading whose tangent is undefined, or a reflection that kept landing on one.
    #[error("heading {angle} degrees is degenerate (multiple of 90)")]
    DegenerateHeading { angle: f64 },
    #[error("boundary {index} has an invalid {axis} range [{min}, {max}]")]
    InvalidLimits {
        index: usize,
        axis: &'static str,
        min: f64,
        max: f64,
    },
    #[error("capillary count must be at least 1")]
    InvalidCapillaryCount,
    /// Indicates an invalid configuration value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
    #[error("malformed result line {line}: {text:?}")]
    MalformedResult { line: usize, text: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
