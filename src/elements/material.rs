//! Material properties

use serde::{Deserialize, Serialize};

use crate::error::{TmmError, TmmResult};

/// Linear isotropic material
///
/// Units are the caller's choice but must be consistent with the geometry
/// (e.g. N, mm, MPa).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Modulus of elasticity (Young's modulus)
    pub e: f64,
    /// Poisson's ratio
    pub nu: f64,
}

impl Material {
    /// Create a material, rejecting non-finite or non-physical constants
    pub fn new(e: f64, nu: f64) -> TmmResult<Self> {
        let material = Self { e, nu };
        material.validate()?;
        Ok(material)
    }

    /// Structural steel in N/mm² (E = 210000 MPa, ν = 0.3)
    pub fn steel() -> Self {
        Self { e: 210_000.0, nu: 0.3 }
    }

    /// Aluminium alloy in N/mm² (E = 70000 MPa, ν = 0.33)
    pub fn aluminum() -> Self {
        Self { e: 70_000.0, nu: 0.33 }
    }

    /// Check the elastic constants
    pub fn validate(&self) -> TmmResult<()> {
        if !self.e.is_finite() || self.e <= 0.0 {
            return Err(TmmError::InvalidMaterial(format!(
                "Young's modulus must be finite and positive, got {}",
                self.e
            )));
        }
        if !self.nu.is_finite() || self.nu <= -1.0 || self.nu >= 0.5 {
            return Err(TmmError::InvalidMaterial(format!(
                "Poisson's ratio must lie in (-1, 0.5), got {}",
                self.nu
            )));
        }
        Ok(())
    }

    /// Shear modulus G = E / (2 (1 + ν))
    pub fn shear_modulus(&self) -> f64 {
        self.e / (2.0 * (1.0 + self.nu))
    }

    /// Plane stress modulus E / (1 - ν²)
    pub fn plane_stress_modulus(&self) -> f64 {
        self.e / (1.0 - self.nu * self.nu)
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::steel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shear_modulus() {
        let mat = Material::new(210_000.0, 0.3).unwrap();
        let expected_g = 210_000.0 / 2.6;
        assert!((mat.shear_modulus() - expected_g).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_bad_constants() {
        assert!(Material::new(f64::NAN, 0.3).is_err());
        assert!(Material::new(-1.0, 0.3).is_err());
        assert!(Material::new(210_000.0, 0.5).is_err());
        assert!(Material::new(210_000.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(Material::steel().validate().is_ok());
        assert!(Material::aluminum().validate().is_ok());
    }
}
