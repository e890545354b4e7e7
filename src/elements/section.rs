//! Section properties for shaft elements

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::error::{TmmError, TmmResult};

/// Solid or hollow circular cross-section
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircularSection {
    /// Outer diameter
    pub outer_diameter: f64,
    /// Bore diameter (zero for a solid shaft)
    pub inner_diameter: f64,
}

impl CircularSection {
    /// Create a solid circular section
    pub fn solid(diameter: f64) -> TmmResult<Self> {
        Self::hollow(diameter, 0.0)
    }

    /// Create a hollow circular section
    pub fn hollow(outer_diameter: f64, inner_diameter: f64) -> TmmResult<Self> {
        if !outer_diameter.is_finite() || outer_diameter <= 0.0 {
            return Err(TmmError::InvalidGeometry(format!(
                "outer diameter must be positive, got {}",
                outer_diameter
            )));
        }
        if !inner_diameter.is_finite() || inner_diameter < 0.0 || inner_diameter >= outer_diameter {
            return Err(TmmError::InvalidGeometry(format!(
                "bore diameter {} must lie in [0, {})",
                inner_diameter, outer_diameter
            )));
        }
        Ok(Self {
            outer_diameter,
            inner_diameter,
        })
    }

    /// Cross-sectional area
    pub fn area(&self) -> f64 {
        PI / 4.0 * (self.outer_diameter.powi(2) - self.inner_diameter.powi(2))
    }

    /// Second moment of area about a diameter, I = π (D⁴ - d⁴) / 64
    pub fn second_moment(&self) -> f64 {
        PI / 64.0 * (self.outer_diameter.powi(4) - self.inner_diameter.powi(4))
    }

    /// Polar moment of area (torsion constant of a circular section)
    pub fn polar_moment(&self) -> f64 {
        2.0 * self.second_moment()
    }

    /// Timoshenko shear coefficient (Cowper) for a hollow circle
    pub fn shear_coefficient(&self, nu: f64) -> f64 {
        let m = self.inner_diameter / self.outer_diameter;
        let m2 = m * m;
        let s = (1.0 + m2).powi(2);
        6.0 * (1.0 + nu) * s / ((7.0 + 6.0 * nu) * s + (20.0 + 12.0 * nu) * m2)
    }
}
