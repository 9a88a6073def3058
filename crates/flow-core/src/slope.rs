//! Longitudinal channel slope from an along-channel profile.
//!
//! The profile is sampled in the downstream direction, so a falling bed
//! gives a positive slope:
//!   S = −(z_last − z_first) / (x_last − x_first)
use crate::error::{InputError, Result};
use crate::profile::Profile;

/// Bed slope between the first and last samples of `profile`.
pub fn longitudinal_slope(profile: &Profile) -> Result<f64> {
    let (first, last) = (profile.first(), profile.last());
    let run = last.station - first.station;
    if run == 0.0 {
        return Err(InputError::ZeroExtent.into());
    }
    let slope = -(last.elevation - first.elevation) / run;
    if slope <= 0.0 {
        log::warn!("sampled reach rises downstream (slope {slope:.6})");
        return Err(InputError::NonPositiveSlope(slope).into());
    }
    Ok(slope)
}
