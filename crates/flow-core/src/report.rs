//! Plain-text results report: header block, section geometry, rating table.
use std::io::{self, Write};

use crate::channel::TrapezoidParams;
use crate::config::UnitSystem;
use crate::profile::Profile;
use crate::rating::RatingPoint;

const BANNER_WIDTH: usize = 20;

/// Geometry block of the report.
#[derive(Debug, Clone, Copy)]
pub enum ReportSection<'a> {
    /// Sampled or file-supplied profile; `source` names where it came from.
    Irregular { source: &'a str, profile: &'a Profile },
    Trapezoid(&'a TrapezoidParams),
}

#[derive(Debug, Clone, Copy)]
pub struct ReportHeader<'a> {
    pub units: UnitSystem,
    pub slope: f64,
    pub roughness_n: f64,
    pub section: ReportSection<'a>,
}

/// Write the full report for `curve`.
pub fn write_report<W: Write>(mut out: W, header: &ReportHeader<'_>, curve: &[RatingPoint]) -> io::Result<()> {
    let banner = "*".repeat(BANNER_WIDTH);
    write!(
        out,
        "{banner}\nFlow Estimator\nEstimates uniform, steady flow in a channel using Mannings equation\n{banner}"
    )?;
    write!(out, "{}", "\n".repeat(5))?;

    let units = header.units.length_label();
    match header.section {
        ReportSection::Irregular { source, profile } => {
            write!(
                out,
                "Type:\tIrregular Cross Section\nUnits:\t{units}\nSource:\t{source}\n\
                 Channel Slope:\t{:.6}\nMannings n:\t{:.2}\n\n\n\nstation\televation\n",
                header.slope, header.roughness_n,
            )?;
            profile.write_tsv(&mut out)?;
        }
        ReportSection::Trapezoid(p) => {
            write!(
                out,
                "Type:\tTrapezoidal Channel\nUnits:\t{units}\nChannel Slope:\t{:.6}\nMannings n:\t{:.2}\n\
                 Bottom Width:\t{:.2}\nRight Side Slope:\t{:.2}\nLeft Side Slope:\t{:.2}\n",
                header.slope, header.roughness_n, p.bottom_width, p.right_side_slope, p.left_side_slope,
            )?;
        }
    }

    write!(out, "{}", "\n".repeat(7))?;
    writeln!(out, "water surface elevation\tflow\tvelocity\tR\tarea\ttop width\tdepth")?;
    for pt in curve {
        writeln!(
            out,
            "{:.3}\t{:.2}\t{:.2}\t{:.2}\t{:.2}\t{:.2}\t{:.2}",
            pt.wse, pt.discharge, pt.velocity, pt.hydraulic_radius, pt.wetted_area, pt.top_width, pt.max_depth
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(wse: f64) -> RatingPoint {
        RatingPoint {
            wse,
            discharge: 12.5,
            velocity: 1.5,
            hydraulic_radius: 0.75,
            wetted_area: 8.0,
            top_width: 6.0,
            max_depth: 1.0,
        }
    }

    #[test]
    fn trapezoid_report_layout() {
        let params = TrapezoidParams {
            depth: 1.0,
            bottom_width: 4.0,
            left_side_slope: 2.0,
            right_side_slope: 3.0,
        };
        let header = ReportHeader {
            units: UnitSystem::Imperial,
            slope: 0.0015,
            roughness_n: 0.035,
            section: ReportSection::Trapezoid(&params),
        };
        let mut buf = Vec::new();
        write_report(&mut buf, &header, &[point(0.5), point(1.0)]).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.starts_with("********************\nFlow Estimator\n"));
        assert!(text.contains("Units:\tft\n"));
        assert!(text.contains("Channel Slope:\t0.001500\n"));
        assert!(text.contains("Right Side Slope:\t3.00\nLeft Side Slope:\t2.00\n"));
        assert!(text.contains("0.500\t12.50\t1.50\t0.75\t8.00\t6.00\t1.00\n"));
        assert!(text.ends_with("1.000\t12.50\t1.50\t0.75\t8.00\t6.00\t1.00\n"));
        assert!(!text.contains("station\televation"));
    }

    #[test]
    fn irregular_report_lists_profile() {
        let profile = Profile::from_points(&[(0.0, 2.0), (1.0, 0.0), (2.0, 2.0)]).unwrap();
        let header = ReportHeader {
            units: UnitSystem::Metric,
            slope: 0.001,
            roughness_n: 0.03,
            section: ReportSection::Irregular { source: "xs.txt", profile: &profile },
        };
        let mut buf = Vec::new();
        write_report(&mut buf, &header, &[]).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("Source:\txs.txt\n"));
        assert!(text.contains("station\televation\n0.000\t2.000\n1.000\t0.000\n2.000\t2.000\n"));
        assert!(text.ends_with("water surface elevation\tflow\tvelocity\tR\tarea\ttop width\tdepth\n"));
    }
}
