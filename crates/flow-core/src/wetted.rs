//! Wetted span selection: which two waterline crossings bound the water body.
//!
//! All crossings are collected in profile order. The span is the pair
//! nearest the thalweg on either side, measured by cumulative ground
//! distance rather than station so that banks folding back over themselves
//! (undercuts) still bracket correctly.

use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, Result};
use crate::intersect::{segment_waterline, IntersectionPoint};
use crate::profile::Profile;

/// The two waterline crossings bounding the wetted region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WettedSpan {
    pub start: IntersectionPoint,
    pub end: IntersectionPoint,
}

/// Every accepted waterline crossing, in profile order.
///
/// A waterline through a shared vertex is reported by both adjacent
/// segments; crossings closer than `tol` in distance are collapsed.
pub fn waterline_intersections(profile: &Profile, wse: f64, tol: f64) -> Vec<IntersectionPoint> {
    let x_start = profile.first().station;
    let x_end = profile.last().station;

    let mut hits: Vec<IntersectionPoint> = Vec::new();
    for pair in profile.vertices().windows(2) {
        let Some(hit) = segment_waterline(&pair[0], &pair[1], wse, x_start, x_end, tol) else {
            continue;
        };
        match hits.last() {
            Some(prev) if (hit.distance - prev.distance).abs() < tol => {}
            _ => hits.push(hit),
        }
    }
    hits
}

/// Select the wetted span for `wse`.
///
/// Fails with [`GeometryError::InsufficientIntersections`] when the waterline
/// crosses the profile fewer than twice and with
/// [`GeometryError::OneSidedIntersections`] when every crossing lies on one
/// side of the thalweg.
pub fn select_wetted_span(profile: &Profile, wse: f64, tol: f64) -> Result<WettedSpan> {
    let hits = waterline_intersections(profile, wse, tol);
    if hits.len() < 2 {
        log::debug!("wse {wse:.3}: {} waterline crossing(s) {:?}", hits.len(), hits);
        return Err(GeometryError::InsufficientIntersections { found: hits.len() }.into());
    }
    if hits.len() > 2 {
        log::warn!(
            "wse {wse:.3}: waterline crosses the profile {} times (complex channel shape); \
             using the pair around the thalweg",
            hits.len()
        );
    }

    let anchor = profile.thalweg_distance();
    let start = hits
        .iter()
        .filter(|h| h.distance < anchor)
        .max_by(|a, b| a.distance.total_cmp(&b.distance));
    let end = hits
        .iter()
        .filter(|h| h.distance > anchor)
        .min_by(|a, b| a.distance.total_cmp(&b.distance));

    match (start, end) {
        (Some(&start), Some(&end)) => Ok(WettedSpan { start, end }),
        _ => {
            log::debug!("wse {wse:.3}: crossings {hits:?} all on one side of thalweg at {anchor:.3}");
            Err(GeometryError::OneSidedIntersections.into())
        }
    }
}
