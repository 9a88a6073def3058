//! Manning's equation for uniform flow.
//!
//!   v = (k / n) · R^(2/3) · √S
//!   Q = v · A
//!
//! `k` is 1.0 in SI units and 1.4859 in US customary units. Typical `n`:
//! - Smooth concrete: n ≈ 0.012
//! - Natural channels: n ≈ 0.03-0.05
//! - Vegetated floodplains: n ≈ 0.1-0.15

use serde::{Deserialize, Serialize};

use crate::config::UnitSystem;
use crate::error::{InputError, Result};

/// Manning roughness and energy slope of a reach.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ManningSolver {
    pub roughness_n: f64,
    pub slope: f64,
    pub units: UnitSystem,
}

/// Mean velocity and discharge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UniformFlow {
    pub velocity: f64,
    pub discharge: f64,
}

impl ManningSolver {
    pub fn new(roughness_n: f64, slope: f64, units: UnitSystem) -> Result<Self> {
        if !(roughness_n.is_finite() && roughness_n > 0.0) {
            return Err(InputError::Roughness(roughness_n).into());
        }
        if !(slope.is_finite() && slope >= 0.0) {
            return Err(InputError::Slope(slope).into());
        }
        Ok(Self { roughness_n, slope, units })
    }

    /// Mean velocity for hydraulic radius `r`.
    #[inline]
    pub fn velocity(&self, hydraulic_radius: f64) -> f64 {
        (self.units.manning_constant() / self.roughness_n)
            * hydraulic_radius.powf(2.0 / 3.0)
            * self.slope.sqrt()
    }

    pub fn solve(&self, hydraulic_radius: f64, wetted_area: f64) -> UniformFlow {
        let velocity = self.velocity(hydraulic_radius);
        UniformFlow {
            velocity,
            discharge: velocity * wetted_area,
        }
    }
}
