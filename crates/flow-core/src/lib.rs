//! Uniform open-channel flow by Manning's equation for trapezoidal and
//! irregular cross-sections.
//!
//! Pipeline: profile → wetted span → wetted geometry → Manning.
pub mod channel;
pub mod config;
pub mod error;
pub mod estimator;
pub mod geometry;
pub mod intersect;
pub mod manning;
pub mod profile;
pub mod rating;
pub mod report;
pub mod slope;
pub mod wetted;

pub use channel::{build_trapezoid, TrapezoidParams};
pub use config::{SolverConfig, UnitSystem};
pub use error::{FlowError, GeometryError, InputError, NumericalError, Result};
pub use estimator::{estimate_flow, ChannelSource, FlowEstimator, FlowRequest, FlowResult};
pub use manning::ManningSolver;
pub use profile::{Profile, Vertex, WseRange};
pub use rating::{rating_curve, rating_curve_for_request, wse_levels, RatingOptions, RatingPoint};
