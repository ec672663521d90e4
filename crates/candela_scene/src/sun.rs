//! # Sun
//!
//! Directional light settings. Part of the reset-relevant scene state:
//! any change restarts accumulation.

use serde::{Deserialize, Serialize};

/// Sun light configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sun {
    /// Azimuth angle in radians.
    pub azimuth: f64,
    /// Altitude angle in radians.
    pub altitude: f64,
    /// Light intensity multiplier.
    pub intensity: f64,
}

impl Default for Sun {
    fn default() -> Self {
        Self {
            azimuth: std::f64::consts::FRAC_PI_4,
            altitude: std::f64::consts::FRAC_PI_3,
            intensity: 1.25,
        }
    }
}
