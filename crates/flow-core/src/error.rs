//! Error taxonomy for the flow solver.
//!
//! Every failure is one of three kinds so callers can tell a rejected request
//! (`Input`) from a water level the section cannot hold (`Geometry`) and from
//! a solver defect (`Numerical`).

use std::path::PathBuf;

use thiserror::Error;

/// Top-level solver error.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FlowError {
    #[error("invalid input: {0}")]
    Input(#[from] InputError),

    #[error("geometry error: {0}")]
    Geometry(#[from] GeometryError),

    #[error("numerical error: {0}")]
    Numerical(#[from] NumericalError),
}

/// Rejected request. Never retried.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InputError {
    #[error("ambiguous or missing channel definition")]
    MissingSource,

    #[error("Manning's n must be positive and finite, got {0}")]
    Roughness(f64),

    #[error("channel slope must be non-negative and finite, got {0}")]
    Slope(f64),

    #[error("water surface elevation must be finite, got {0}")]
    WaterSurface(f64),

    #[error("invalid trapezoid: {0}")]
    Trapezoid(String),

    #[error("profile needs at least 2 vertices, got {0}")]
    TooFewVertices(usize),

    #[error("profile vertex {index} is not finite ({station}, {elevation})")]
    NonFiniteVertex {
        index: usize,
        station: f64,
        elevation: f64,
    },

    #[error("cannot read {path}: {message}")]
    FileRead { path: PathBuf, message: String },

    #[error("{path}, line {line}: {message}")]
    FileParse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("invalid request JSON: {0}")]
    Json(String),

    #[error("invalid rating sweep: {0}")]
    Sweep(String),

    #[error("longitudinal slope must be positive (water flows downhill), got {0}")]
    NonPositiveSlope(f64),

    #[error("longitudinal profile has zero horizontal extent")]
    ZeroExtent,
}

/// The water surface does not define a single wetted region on this profile.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    #[error("insufficient intersections: waterline crosses the profile {found} time(s); lower the WSE or check the sampled geometry")]
    InsufficientIntersections { found: usize },

    #[error("no intersection on one side of thalweg; raise or lower the WSE")]
    OneSidedIntersections,

    #[error("channel not found: no ground on one side of the thalweg")]
    ChannelNotFound,
}

/// Degenerate arithmetic that slipped past the geometric checks.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NumericalError {
    #[error("wetted perimeter is zero")]
    ZeroPerimeter,

    #[error("{quantity} is not finite")]
    NonFinite { quantity: &'static str },
}

pub type Result<T> = std::result::Result<T, FlowError>;
