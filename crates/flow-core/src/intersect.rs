//! Waterline / profile-segment intersection.
//!
//! Both lines are treated as infinite and solved with the 2×2 determinant
//! (Cramer's rule); the candidate is then accepted only if it lies on the
//! profile segment and on the water surface.

use serde::{Deserialize, Serialize};

use crate::profile::Vertex;

/// A point where a profile segment meets the water surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntersectionPoint {
    pub station: f64,
    pub elevation: f64,
    /// Cumulative ground distance of the point along the profile.
    pub distance: f64,
}

#[inline]
fn det(a: (f64, f64), b: (f64, f64)) -> f64 {
    a.0 * b.1 - a.1 * b.0
}

/// Intersection of the infinite lines through `a` and `b`.
///
/// Returns `None` when the lines are parallel (`div == 0`), which includes a
/// flat segment lying exactly on the waterline.
pub fn line_intersection(a: [(f64, f64); 2], b: [(f64, f64); 2]) -> Option<(f64, f64)> {
    let xdiff = (a[0].0 - a[1].0, b[0].0 - b[1].0);
    let ydiff = (a[0].1 - a[1].1, b[0].1 - b[1].1);

    let div = det(xdiff, ydiff);
    if div == 0.0 {
        return None;
    }

    let d = (det(a[0], a[1]), det(b[0], b[1]));
    Some((det(d, xdiff) / div, det(d, ydiff) / div))
}

/// Intersect the profile segment `prev → next` with the horizontal waterline
/// at `wse` spanning `[x_start, x_end]`.
///
/// Accepts the candidate only if it lies within the segment's station span
/// and elevation span (both ±`tol`, elevation exact on vertical segments)
/// and within `tol` of `wse`.
pub fn segment_waterline(
    prev: &Vertex,
    next: &Vertex,
    wse: f64,
    x_start: f64,
    x_end: f64,
    tol: f64,
) -> Option<IntersectionPoint> {
    let (x, y) = line_intersection(
        [(prev.station, prev.elevation), (next.station, next.elevation)],
        [(x_start, wse), (x_end, wse)],
    )?;
    if !x.is_finite() || !y.is_finite() {
        return None;
    }

    let lo = prev.station.min(next.station);
    let hi = prev.station.max(next.station);
    if x < lo - tol || x > hi + tol {
        return None;
    }
    if (y - wse).abs() >= tol {
        return None;
    }
    // Steep walls pass the station window far beyond their ends. Vertical
    // walls get no slack at all.
    let slack = if prev.station == next.station { 0.0 } else { tol };
    let e_lo = prev.elevation.min(next.elevation);
    let e_hi = prev.elevation.max(next.elevation);
    if y < e_lo - slack || y > e_hi + slack {
        log::debug!("waterline misses segment at station {x:.3} (y = {y:.3}, segment spans {e_lo:.3}..{e_hi:.3})");
        return None;
    }

    Some(IntersectionPoint {
        station: x,
        elevation: y,
        distance: prev.distance + prev.distance_to(x, y),
    })
}
