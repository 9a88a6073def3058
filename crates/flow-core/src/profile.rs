//! Cross-section profile: station/elevation vertices with cumulative
//! along-ground distance, plus the two-column text format it is exchanged in.
//!
//! ```text
//! 0.000	10.000
//! 5.000	0.000
//! 15.000	0.000
//! 20.000	10.000
//! ```
//!
//! Columns are separated by any whitespace; columns past the second are
//! ignored and there is no header.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, InputError, Result};

/// Lowest admissible WSE sits this far above the thalweg.
pub const THALWEG_CLEARANCE: f64 = 0.01;
/// Highest admissible WSE sits this far below the lower bank crest.
pub const CREST_FREEBOARD: f64 = 0.001;

/// One profile vertex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    /// Cross-channel coordinate.
    pub station: f64,
    pub elevation: f64,
    /// Cumulative 2D length along the ground from the first vertex.
    pub distance: f64,
}

impl Vertex {
    /// Straight-line distance to `(station, elevation)`.
    #[inline]
    pub fn distance_to(&self, station: f64, elevation: f64) -> f64 {
        (station - self.station).hypot(elevation - self.elevation)
    }
}

/// Admissible water-surface range of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WseRange {
    pub min: f64,
    pub max: f64,
}

/// Ordered cross-section polyline, left bank to right bank.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    vertices: Vec<Vertex>,
}

impl Profile {
    /// Build from `(station, elevation)` pairs, computing cumulative distance.
    pub fn from_points(points: &[(f64, f64)]) -> Result<Self> {
        if points.len() < 2 {
            return Err(InputError::TooFewVertices(points.len()).into());
        }
        let mut vertices: Vec<Vertex> = Vec::with_capacity(points.len());
        let mut distance = 0.0;
        for (index, &(station, elevation)) in points.iter().enumerate() {
            if !station.is_finite() || !elevation.is_finite() {
                return Err(InputError::NonFiniteVertex { index, station, elevation }.into());
            }
            if let Some(prev) = vertices.last() {
                distance += prev.distance_to(station, elevation);
            }
            vertices.push(Vertex { station, elevation, distance });
        }
        Ok(Self { vertices })
    }

    /// Read a whitespace-delimited station/elevation file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| InputError::FileRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&text, path)
    }

    /// Parse the text format; `origin` only labels error messages.
    pub fn parse(text: &str, origin: &Path) -> Result<Self> {
        let parse_err = |line: usize, message: String| InputError::FileParse {
            path: origin.to_path_buf(),
            line,
            message,
        };

        let mut points = Vec::new();
        for (i, raw) in text.lines().enumerate() {
            let line = i + 1;
            let mut fields = raw.split_whitespace();
            let Some(first) = fields.next() else { continue };
            let Some(second) = fields.next() else {
                return Err(parse_err(line, "expected station and elevation columns".into()).into());
            };
            let station: f64 = first
                .parse()
                .map_err(|_| parse_err(line, format!("station '{first}' is not a number")))?;
            let elevation: f64 = second
                .parse()
                .map_err(|_| parse_err(line, format!("elevation '{second}' is not a number")))?;
            points.push((station, elevation));
        }

        if points.len() < 2 {
            return Err(parse_err(
                text.lines().count().max(1),
                format!("need at least 2 station/elevation rows, found {}", points.len()),
            )
            .into());
        }
        Self::from_points(&points)
    }

    /// Write `station\televation` rows with three decimals.
    pub fn write_tsv<W: Write>(&self, mut out: W) -> io::Result<()> {
        for v in &self.vertices {
            writeln!(out, "{:.3}\t{:.3}", v.station, v.elevation)?;
        }
        Ok(())
    }

    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Always false for a constructed profile; present for API symmetry.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn first(&self) -> &Vertex {
        &self.vertices[0]
    }

    pub fn last(&self) -> &Vertex {
        &self.vertices[self.vertices.len() - 1]
    }

    pub fn min_elevation(&self) -> f64 {
        self.vertices.iter().map(|v| v.elevation).fold(f64::INFINITY, f64::min)
    }

    pub fn max_elevation(&self) -> f64 {
        self.vertices.iter().map(|v| v.elevation).fold(f64::NEG_INFINITY, f64::max)
    }

    /// Distance anchor of the thalweg: the median distance of all vertices
    /// tied at the minimum elevation.
    ///
    /// With an even count the middle pair is averaged only when the two are
    /// neighbours joined by a flat bed. Two separate low points would put the
    /// mean on whatever lies between them (often a dry bar), so the lower
    /// middle vertex is used instead.
    pub fn thalweg_distance(&self) -> f64 {
        let min = self.min_elevation();
        // Indices come out ascending, so `tied` is sorted by distance too.
        let tied: Vec<(usize, f64)> = self
            .vertices
            .iter()
            .enumerate()
            .filter(|(_, v)| v.elevation == min)
            .map(|(i, v)| (i, v.distance))
            .collect();
        let n = tied.len();
        if n % 2 == 1 {
            return tied[n / 2].1;
        }
        let (lo, hi) = (tied[n / 2 - 1], tied[n / 2]);
        if hi.0 == lo.0 + 1 {
            0.5 * (lo.1 + hi.1)
        } else {
            lo.1
        }
    }

    /// WSE values this profile can hold as a single channel: just above the
    /// thalweg up to just below the lower of the two bank crests.
    pub fn wse_range(&self) -> Result<WseRange> {
        let min_elev = self.min_elevation();
        let first_min = self.vertices.iter().position(|v| v.elevation == min_elev);
        let last_min = self.vertices.iter().rposition(|v| v.elevation == min_elev);
        let (Some(first_min), Some(last_min)) = (first_min, last_min) else {
            return Err(GeometryError::ChannelNotFound.into());
        };

        let crest = |bank: &[Vertex]| {
            bank.iter()
                .map(|v| v.elevation)
                .reduce(f64::max)
                .ok_or(GeometryError::ChannelNotFound)
        };
        let left = crest(&self.vertices[..first_min])?;
        let right = crest(&self.vertices[last_min + 1..])?;

        let range = WseRange {
            min: min_elev + THALWEG_CLEARANCE,
            max: left.min(right) - CREST_FREEBOARD,
        };
        if range.max <= range.min {
            return Err(GeometryError::ChannelNotFound.into());
        }
        Ok(range)
    }

    /// Ground polyline as `(station, elevation)` pairs.
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.vertices.iter().map(|v| (v.station, v.elevation)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FlowError;
    use approx::assert_abs_diff_eq;

    fn trapezoid() -> Profile {
        Profile::from_points(&[(0.0, 10.0), (5.0, 0.0), (15.0, 0.0), (20.0, 10.0)]).unwrap()
    }

    #[test]
    fn distances_accumulate_segment_lengths() {
        let p = trapezoid();
        let wall = 125f64.sqrt();
        let d: Vec<f64> = p.vertices().iter().map(|v| v.distance).collect();
        assert_eq!(d[0], 0.0);
        assert_abs_diff_eq!(d[1], wall, epsilon = 1e-12);
        assert_abs_diff_eq!(d[2], wall + 10.0, epsilon = 1e-12);
        assert_abs_diff_eq!(d[3], 2.0 * wall + 10.0, epsilon = 1e-12);
    }

    #[test]
    fn thalweg_anchor_is_median_of_tied_vertices() {
        let p = trapezoid();
        let wall = 125f64.sqrt();
        assert_abs_diff_eq!(p.thalweg_distance(), wall + 5.0, epsilon = 1e-12);

        let v = Profile::from_points(&[(0.0, 4.0), (3.0, 0.0), (6.0, 4.0)]).unwrap();
        assert_abs_diff_eq!(v.thalweg_distance(), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn separate_tied_low_points_anchor_on_a_real_low_point() {
        // Two sub-channels of equal depth either side of a bar at station 2.
        let p = Profile::from_points(&[(0.0, 5.0), (1.0, 0.0), (2.0, 4.0), (3.0, 0.0), (4.0, 5.0)]).unwrap();
        assert_eq!(p.thalweg_distance(), p.vertices()[1].distance);

        let flat = Profile::from_points(&[(0.0, 2.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0), (4.0, 0.0), (5.0, 2.0)])
            .unwrap();
        assert_abs_diff_eq!(flat.thalweg_distance(), 0.5 * (flat.vertices()[2].distance + flat.vertices()[3].distance));
    }

    #[test]
    fn single_vertex_is_rejected() {
        let err = Profile::from_points(&[(0.0, 1.0)]).unwrap_err();
        assert_eq!(err, FlowError::Input(InputError::TooFewVertices(1)));
    }

    #[test]
    fn nan_vertex_is_rejected() {
        let err = Profile::from_points(&[(0.0, 1.0), (1.0, f64::NAN)]).unwrap_err();
        assert!(matches!(err, FlowError::Input(InputError::NonFiniteVertex { index: 1, .. })));
    }

    #[test]
    fn parse_accepts_tabs_spaces_and_blank_lines() {
        let text = "0\t10\n\n5   0  extra\n15 0\n 20\t10\n";
        let p = Profile::parse(text, Path::new("xs.txt")).unwrap();
        assert_eq!(p.len(), 4);
        assert_eq!(p.points()[1], (5.0, 0.0));
    }

    #[test]
    fn parse_reports_line_of_bad_field() {
        let err = Profile::parse("0 10\n5 zero\n", Path::new("xs.txt")).unwrap_err();
        match err {
            FlowError::Input(InputError::FileParse { line, message, .. }) => {
                assert_eq!(line, 2);
                assert!(message.contains("zero"), "{message}");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parse_rejects_header_and_single_column() {
        assert!(Profile::parse("station elevation\n0 1\n1 0\n", Path::new("h")).is_err());
        assert!(Profile::parse("0\n1\n", Path::new("c")).is_err());
        assert!(Profile::parse("", Path::new("e")).is_err());
    }

    #[test]
    fn missing_file_is_an_input_error() {
        let err = Profile::load(Path::new("/nonexistent/flow/xs.txt")).unwrap_err();
        assert!(matches!(err, FlowError::Input(InputError::FileRead { .. })));
    }

    #[test]
    fn tsv_export_uses_three_decimals() {
        let p = Profile::from_points(&[(0.0, 1.5), (2.25, 0.125)]).unwrap();
        let mut buf = Vec::new();
        p.write_tsv(&mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "0.000\t1.500\n2.250\t0.125\n");
    }

    #[test]
    fn wse_range_stops_below_lower_crest() {
        let p = Profile::from_points(&[(0.0, 8.0), (5.0, 0.0), (15.0, 0.0), (20.0, 10.0)]).unwrap();
        let r = p.wse_range().unwrap();
        assert_abs_diff_eq!(r.min, 0.01, epsilon = 1e-12);
        assert_abs_diff_eq!(r.max, 7.999, epsilon = 1e-12);
    }

    #[test]
    fn wse_range_handles_vertical_walls() {
        let p = Profile::from_points(&[(0.0, 2.0), (0.0, 0.0), (3.0, 0.0), (3.0, 1.5)]).unwrap();
        let r = p.wse_range().unwrap();
        assert_abs_diff_eq!(r.max, 1.499, epsilon = 1e-12);
    }

    #[test]
    fn wse_range_needs_both_banks() {
        let ramp = Profile::from_points(&[(0.0, 0.0), (5.0, 2.0), (10.0, 4.0)]).unwrap();
        assert_eq!(ramp.wse_range().unwrap_err(), FlowError::Geometry(GeometryError::ChannelNotFound));
    }
}
