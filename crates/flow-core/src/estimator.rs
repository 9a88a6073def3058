//! Flow estimation orchestrator: request in, one result record out.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::channel::{build_trapezoid, TrapezoidParams};
use crate::config::{SolverConfig, UnitSystem};
use crate::error::{InputError, Result};
use crate::geometry::{section_polylines, wetted_geometry, SectionPolylines};
use crate::manning::ManningSolver;
use crate::profile::{Profile, WseRange};
use crate::wetted::select_wetted_span;

// ── Request / result records ──────────────────────────────────────────────────

/// Where the cross-section comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChannelSource {
    /// Two-column station/elevation text file.
    File { path: PathBuf },
    /// In-memory `(station, elevation)` pairs, left to right.
    Profile { points: Vec<(f64, f64)> },
    Trapezoid(TrapezoidParams),
}

impl ChannelSource {
    /// Pick the source from optional parts, in priority order
    /// file → profile → trapezoid.
    pub fn from_parts(
        file: Option<PathBuf>,
        points: Option<Vec<(f64, f64)>>,
        trapezoid: Option<TrapezoidParams>,
    ) -> Result<Self> {
        if let Some(path) = file {
            return Ok(Self::File { path });
        }
        if let Some(points) = points {
            return Ok(Self::Profile { points });
        }
        if let Some(params) = trapezoid {
            return Ok(Self::Trapezoid(params));
        }
        Err(InputError::MissingSource.into())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowRequest {
    pub water_surface_elevation: f64,
    pub roughness_n: f64,
    pub slope: f64,
    #[serde(default)]
    pub units: UnitSystem,
    pub source: ChannelSource,
}

impl FlowRequest {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| InputError::Json(e.to_string()).into())
    }

    pub fn manning(&self) -> Result<ManningSolver> {
        ManningSolver::new(self.roughness_n, self.slope, self.units)
    }
}

/// Hydraulic state of one cross-section at one water level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowResult {
    pub hydraulic_radius: f64,
    pub wetted_perimeter: f64,
    pub wetted_area: f64,
    pub top_width: f64,
    pub discharge: f64,
    pub velocity: f64,
    pub max_depth: f64,
    #[serde(flatten)]
    pub polylines: SectionPolylines,
}

// ── Orchestrator ──────────────────────────────────────────────────────────────

/// Runs profile → wetted span → geometry → Manning for each request.
/// Holds configuration only; every call is independent.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlowEstimator {
    config: SolverConfig,
}

impl FlowEstimator {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Materialize the cross-section described by `source`.
    pub fn resolve_profile(&self, source: &ChannelSource) -> Result<Profile> {
        match source {
            ChannelSource::File { path } => Profile::load(path),
            ChannelSource::Profile { points } => Profile::from_points(points),
            ChannelSource::Trapezoid(params) => build_trapezoid(params, self.config.wall_margin),
        }
    }

    /// Admissible WSE range for `source` given its resolved `profile`.
    ///
    /// Trapezoids span from just above the invert to the design depth;
    /// irregular profiles from just above the thalweg to the lower crest.
    pub fn wse_range(&self, source: &ChannelSource, profile: &Profile) -> Result<WseRange> {
        match source {
            ChannelSource::Trapezoid(params) => Ok(WseRange {
                min: TRAPEZOID_MIN_WSE.min(params.depth),
                max: params.depth,
            }),
            _ => profile.wse_range(),
        }
    }

    pub fn estimate(&self, request: &FlowRequest) -> Result<FlowResult> {
        let manning = request.manning()?;
        let profile = self.resolve_profile(&request.source)?;
        self.estimate_profile(&profile, request.water_surface_elevation, &manning)
    }

    /// Solve an already resolved profile at `wse`.
    pub fn estimate_profile(&self, profile: &Profile, wse: f64, manning: &ManningSolver) -> Result<FlowResult> {
        if !wse.is_finite() {
            return Err(InputError::WaterSurface(wse).into());
        }
        let span = select_wetted_span(profile, wse, self.config.tolerance)?;
        let geometry = wetted_geometry(profile, &span, wse)?;
        let flow = manning.solve(geometry.hydraulic_radius, geometry.wetted_area);

        Ok(FlowResult {
            hydraulic_radius: geometry.hydraulic_radius,
            wetted_perimeter: geometry.wetted_perimeter,
            wetted_area: geometry.wetted_area,
            top_width: geometry.top_width,
            discharge: flow.discharge,
            velocity: flow.velocity,
            max_depth: geometry.max_depth,
            polylines: section_polylines(profile, &geometry.polygon, wse),
        })
    }
}

/// Shallowest water level swept on a trapezoid.
pub const TRAPEZOID_MIN_WSE: f64 = 0.001;

/// Convenience wrapper around [`FlowEstimator::estimate`] with default config.
pub fn estimate_flow(request: &FlowRequest) -> Result<FlowResult> {
    FlowEstimator::new(SolverConfig::for_units(request.units)).estimate(request)
}

// ── Unit tests ────────────────────────────────────────────────────────────────
