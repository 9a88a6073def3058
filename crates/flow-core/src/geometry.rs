//! Wetted cross-section metrics from a selected span.
//!
//! The wetted polygon is waterline point → ground vertices under water →
//! waterline point, taken from the profile by cumulative distance. Closing
//! it along the waterline is implicit in the shoelace wrap.

use serde::{Deserialize, Serialize};

use crate::error::{NumericalError, Result};
use crate::profile::{Profile, Vertex};
use crate::wetted::WettedSpan;

/// Polylines for plotting a cross-section; derived data only.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SectionPolylines {
    /// Full ground profile.
    pub ground_polyline: Vec<(f64, f64)>,
    /// Ground stations at the minimum ground elevation (fill baseline).
    pub ground_baseline: Vec<(f64, f64)>,
    /// Wetted stations at the water surface.
    pub water_polyline: Vec<(f64, f64)>,
    /// Ground under water (fill baseline of the water body).
    pub water_baseline: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WettedGeometry {
    pub wetted_area: f64,
    pub wetted_perimeter: f64,
    pub hydraulic_radius: f64,
    pub top_width: f64,
    pub max_depth: f64,
    /// Trimmed wetted polygon, in profile order.
    pub polygon: Vec<Vertex>,
}

/// Absolute shoelace area of a closed polygon (last vertex wraps to first).
pub fn polygon_area(corners: &[(f64, f64)]) -> f64 {
    let n = corners.len();
    let mut twice = 0.0;
    for i in 0..n {
        let (xi, yi) = corners[i];
        let (xj, yj) = corners[(i + 1) % n];
        twice += xi * yj - xj * yi;
    }
    twice.abs() / 2.0
}

/// Waterline start, the profile vertices between, waterline end.
pub fn trim_wetted_polygon(profile: &Profile, span: &WettedSpan) -> Vec<Vertex> {
    let (d_min, d_max) = (span.start.distance, span.end.distance);
    let start = Vertex {
        station: span.start.station,
        elevation: span.start.elevation,
        distance: d_min,
    };
    let end = Vertex {
        station: span.end.station,
        elevation: span.end.elevation,
        distance: d_max,
    };

    std::iter::once(start)
        .chain(profile.vertices().iter().copied())
        .chain(std::iter::once(end))
        .filter(|v| v.distance >= d_min && v.distance <= d_max)
        .collect()
}

/// Area, perimeter, hydraulic radius, top width and depth for `span`.
pub fn wetted_geometry(profile: &Profile, span: &WettedSpan, wse: f64) -> Result<WettedGeometry> {
    let polygon = trim_wetted_polygon(profile, span);
    let corners: Vec<(f64, f64)> = polygon.iter().map(|v| (v.station, v.elevation)).collect();

    let wetted_area = polygon_area(&corners);
    let wetted_perimeter = span.end.distance - span.start.distance;
    if !wetted_area.is_finite() {
        return Err(numerical_defect(profile, wse, NumericalError::NonFinite { quantity: "wetted area" }));
    }
    if !wetted_perimeter.is_finite() {
        return Err(numerical_defect(profile, wse, NumericalError::NonFinite { quantity: "wetted perimeter" }));
    }
    if wetted_perimeter <= 0.0 {
        return Err(numerical_defect(profile, wse, NumericalError::ZeroPerimeter));
    }

    Ok(WettedGeometry {
        wetted_area,
        wetted_perimeter,
        hydraulic_radius: wetted_area / wetted_perimeter,
        top_width: span.end.station - span.start.station,
        max_depth: wse - profile.min_elevation(),
        polygon,
    })
}

/// Plot-ready polylines for `profile` wetted along `polygon` at `wse`.
pub fn section_polylines(profile: &Profile, polygon: &[Vertex], wse: f64) -> SectionPolylines {
    let min_elev = profile.min_elevation();
    SectionPolylines {
        ground_polyline: profile.points(),
        ground_baseline: profile.vertices().iter().map(|v| (v.station, min_elev)).collect(),
        water_polyline: polygon.iter().map(|v| (v.station, wse)).collect(),
        water_baseline: polygon.iter().map(|v| (v.station, v.elevation)).collect(),
    }
}

fn numerical_defect(profile: &Profile, wse: f64, err: NumericalError) -> crate::error::FlowError {
    log::error!("{err} at wse {wse}; profile: {:?}", profile.points());
    err.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wetted::select_wetted_span;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn scenario() -> Profile {
        Profile::from_points(&[(0.0, 10.0), (5.0, 0.0), (15.0, 0.0), (20.0, 10.0)]).unwrap()
    }

    #[test]
    fn shoelace_unit_square_either_winding() {
        let cw = [(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)];
        let ccw = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
        assert_eq!(polygon_area(&cw), 1.0);
        assert_eq!(polygon_area(&ccw), 1.0);
        assert_eq!(polygon_area(&[]), 0.0);
    }

    #[test]
    fn trimmed_polygon_runs_waterline_to_waterline() {
        let p = scenario();
        let span = select_wetted_span(&p, 5.0, 1e-3).unwrap();
        let poly = trim_wetted_polygon(&p, &span);
        let stations: Vec<f64> = poly.iter().map(|v| v.station).collect();
        assert_eq!(poly.len(), 4);
        assert_abs_diff_eq!(stations[0], 2.5, epsilon = 1e-9);
        assert_eq!(&stations[1..3], &[5.0, 15.0]);
        assert_abs_diff_eq!(stations[3], 17.5, epsilon = 1e-9);
    }

    #[test]
    fn scenario_metrics() {
        let p = scenario();
        let span = select_wetted_span(&p, 5.0, 1e-3).unwrap();
        let g = wetted_geometry(&p, &span, 5.0).unwrap();
        let perimeter = 2.0 * 2.5f64.hypot(5.0) + 10.0;
        assert_relative_eq!(g.wetted_area, 62.5, max_relative = 1e-12);
        assert_relative_eq!(g.wetted_perimeter, perimeter, max_relative = 1e-12);
        assert_relative_eq!(g.hydraulic_radius, 62.5 / perimeter, max_relative = 1e-12);
        assert_relative_eq!(g.top_width, 15.0, max_relative = 1e-12);
        assert_eq!(g.max_depth, 5.0);
    }

    #[test]
    fn perimeter_matches_summed_segment_lengths() {
        let p = Profile::from_points(&[(0.0, 3.0), (1.0, 1.0), (2.0, 0.5), (4.0, 0.0), (5.0, 2.0), (6.0, 3.5)])
            .unwrap();
        let span = select_wetted_span(&p, 2.0, 1e-3).unwrap();
        let g = wetted_geometry(&p, &span, 2.0).unwrap();
        let summed: f64 = g
            .polygon
            .windows(2)
            .map(|w| w[0].distance_to(w[1].station, w[1].elevation))
            .sum();
        assert_relative_eq!(g.wetted_perimeter, summed, max_relative = 1e-12);
    }

    #[test]
    fn polylines_follow_polygon() {
        let p = scenario();
        let span = select_wetted_span(&p, 5.0, 1e-3).unwrap();
        let g = wetted_geometry(&p, &span, 5.0).unwrap();
        let lines = section_polylines(&p, &g.polygon, 5.0);
        assert_eq!(lines.ground_polyline.len(), 4);
        assert!(lines.ground_baseline.iter().all(|&(_, y)| y == 0.0));
        assert!(lines.water_polyline.iter().all(|&(_, y)| y == 5.0));
        assert_eq!(lines.water_polyline.len(), lines.water_baseline.len());
        assert_eq!(lines.water_baseline[1], (5.0, 0.0));
    }
}
