use serde::{Deserialize, Serialize};

/// Intersection acceptance tolerance shared by all comparisons against the
/// waterline.
pub const DEFAULT_TOLERANCE: f64 = 0.001;

/// Trapezoid walls rise this many depths above the invert, so the design
/// water level never sits on the topmost vertex.
pub const DEFAULT_WALL_MARGIN: f64 = 1.25;

/// Unit system of the profile and all derived quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    /// Conversion constant `k` of the Manning equation.
    pub fn manning_constant(self) -> f64 {
        match self {
            UnitSystem::Metric => 1.0,
            UnitSystem::Imperial => 1.4859,
        }
    }

    /// Length unit label used in reports.
    pub fn length_label(self) -> &'static str {
        match self {
            UnitSystem::Metric => "m",
            UnitSystem::Imperial => "ft",
        }
    }

    /// Intersection tolerance for this unit system.
    pub fn default_tolerance(self) -> f64 {
        // 1 mm in metres, ~0.3 mm in feet; both well below survey precision.
        match self {
            UnitSystem::Metric => DEFAULT_TOLERANCE,
            UnitSystem::Imperial => DEFAULT_TOLERANCE,
        }
    }
}

impl std::str::FromStr for UnitSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "m" | "metric" => Ok(UnitSystem::Metric),
            "ft" | "imperial" => Ok(UnitSystem::Imperial),
            other => Err(format!("unknown unit system '{other}' (expected metric or imperial)")),
        }
    }
}

/// Solver tuning knobs. Plain data, passed per call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// ε used for waterline acceptance and intersection de-duplication.
    pub tolerance: f64,
    /// Wall height of synthesized trapezoids, in multiples of the depth.
    pub wall_margin: f64,
}

impl SolverConfig {
    pub fn for_units(units: UnitSystem) -> Self {
        Self {
            tolerance: units.default_tolerance(),
            ..Self::default()
        }
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            wall_margin: DEFAULT_WALL_MARGIN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_strings_parse_both_spellings() {
        assert_eq!("m".parse::<UnitSystem>().unwrap(), UnitSystem::Metric);
        assert_eq!("Imperial".parse::<UnitSystem>().unwrap(), UnitSystem::Imperial);
        assert!("furlong".parse::<UnitSystem>().is_err());
    }

    #[test]
    fn partial_config_json_keeps_defaults() {
        let cfg: SolverConfig = serde_json::from_str(r#"{"tolerance": 0.01}"#).unwrap();
        assert_eq!(cfg.tolerance, 0.01);
        assert_eq!(cfg.wall_margin, DEFAULT_WALL_MARGIN);
    }
}
