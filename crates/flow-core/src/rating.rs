//! Rating curves: the estimator swept over a range of water levels.
//!
//! Each level is solved independently; with the `threading` feature the
//! sweep runs on rayon. Output order always follows the input levels.

use serde::{Deserialize, Serialize};

use crate::error::{InputError, Result};
use crate::estimator::{FlowEstimator, FlowRequest, FlowResult};
use crate::manning::ManningSolver;
use crate::profile::{Profile, WseRange};

/// Default WSE increment; fine enough for a smooth curve on shallow sections.
pub const DEFAULT_STEP: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingOptions {
    pub step: f64,
}

impl Default for RatingOptions {
    fn default() -> Self {
        Self { step: DEFAULT_STEP }
    }
}

/// One row of a rating table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingPoint {
    pub wse: f64,
    pub discharge: f64,
    pub velocity: f64,
    pub hydraulic_radius: f64,
    pub wetted_area: f64,
    pub top_width: f64,
    pub max_depth: f64,
}

impl RatingPoint {
    pub fn from_result(wse: f64, r: &FlowResult) -> Self {
        Self {
            wse,
            discharge: r.discharge,
            velocity: r.velocity,
            hydraulic_radius: r.hydraulic_radius,
            wetted_area: r.wetted_area,
            top_width: r.top_width,
            max_depth: r.max_depth,
        }
    }
}

/// Upper bound on the number of levels in one sweep.
pub const MAX_LEVELS: usize = 100_000;

/// `min, min + step, …` while below `max`, then `max` itself.
pub fn wse_levels(range: WseRange, step: f64) -> Result<Vec<f64>> {
    if !(step.is_finite() && step > 0.0) {
        return Err(InputError::Sweep(format!("step must be positive, got {step}")).into());
    }
    if !(range.min.is_finite() && range.max.is_finite()) || range.max < range.min {
        return Err(InputError::Sweep(format!("empty range [{}, {}]", range.min, range.max)).into());
    }

    let count = ((range.max - range.min) / step).ceil() + 1.0;
    if count > MAX_LEVELS as f64 {
        return Err(InputError::Sweep(format!(
            "step {step} over [{}, {}] gives {count} levels (limit {MAX_LEVELS})",
            range.min, range.max
        ))
        .into());
    }

    // Indexing instead of accumulating keeps late levels free of drift.
    let mut levels = Vec::with_capacity(count as usize);
    let mut i = 0usize;
    loop {
        let wse = range.min + step * i as f64;
        if wse >= range.max {
            break;
        }
        levels.push(wse);
        i += 1;
    }
    levels.push(range.max);
    Ok(levels)
}

/// Solve `profile` at every level in `levels`, preserving order.
/// On failure the error of the lowest failing level is returned.
pub fn rating_curve(
    estimator: &FlowEstimator,
    profile: &Profile,
    manning: &ManningSolver,
    levels: &[f64],
) -> Result<Vec<RatingPoint>> {
    let solve = |&wse: &f64| {
        estimator
            .estimate_profile(profile, wse, manning)
            .map(|r| RatingPoint::from_result(wse, &r))
    };

    // Collected per level first so the reported error does not depend on
    // which worker fails first.
    #[cfg(feature = "threading")]
    let points: Result<Vec<RatingPoint>> = {
        use rayon::prelude::*;
        let solved: Vec<Result<RatingPoint>> = levels.par_iter().map(solve).collect();
        solved.into_iter().collect()
    };
    #[cfg(not(feature = "threading"))]
    let points: Result<Vec<RatingPoint>> = levels.iter().map(solve).collect();

    points
}

/// Sweep the full admissible range of the request's channel.
pub fn rating_curve_for_request(
    estimator: &FlowEstimator,
    request: &FlowRequest,
    options: &RatingOptions,
) -> Result<Vec<RatingPoint>> {
    let manning = request.manning()?;
    let profile = estimator.resolve_profile(&request.source)?;
    let range = estimator.wse_range(&request.source, &profile)?;
    let levels = wse_levels(range, options.step)?;
    log::debug!("rating sweep: {} levels over [{:.3}, {:.3}]", levels.len(), range.min, range.max);
    rating_curve(estimator, &profile, &manning, &levels)
}
