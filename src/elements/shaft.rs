//! Shaft element - coupled beam bending, bar extension and torsion
//!
//! State vector `[w, θ, u, φ, Q, M, N, T]`:
//! transverse displacement, bending rotation, axial displacement, twist,
//! followed by shear force, bending moment, axial force and torque.
//!
//! ```text
//! w' = θ + Q / (κ G A)   (shear term for Timoshenko only)
//! θ' = M / (E I)
//! u' = N / (E A)
//! φ' = T / (G J)
//! M' = -Q,  Q' = N' = T' = 0
//! ```

use serde::{Deserialize, Serialize};

use super::material::Material;
use super::section::CircularSection;
use crate::error::{TmmError, TmmResult};
use crate::math::Mat8;

/// Beam theory used for the bending sub-block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BeamTheory {
    /// No shear deformation
    EulerBernoulli,
    /// Shear deformation with Cowper's shear coefficient
    #[default]
    Timoshenko,
}

/// A uniform circular shaft segment between two axial positions
#[derive(Debug, Clone, PartialEq)]
pub struct Shaft {
    section: CircularSection,
    material: Material,
    start: f64,
    end: f64,
    theory: BeamTheory,
    h: Mat8,
}

impl Shaft {
    /// Create a shaft segment spanning `[start, end]` along its axis
    pub fn new(
        section: CircularSection,
        material: Material,
        start: f64,
        end: f64,
        theory: BeamTheory,
    ) -> TmmResult<Self> {
        material.validate()?;
        if !start.is_finite() || !end.is_finite() || end <= start {
            return Err(TmmError::InvalidGeometry(format!(
                "shaft span [{}, {}] must have positive length",
                start, end
            )));
        }

        let h = Self::system_matrix(&section, &material, theory);
        Ok(Self {
            section,
            material,
            start,
            end,
            theory,
            h,
        })
    }

    /// Solid shaft of the given diameter
    pub fn solid(
        diameter: f64,
        material: Material,
        start: f64,
        end: f64,
        theory: BeamTheory,
    ) -> TmmResult<Self> {
        Self::new(CircularSection::solid(diameter)?, material, start, end, theory)
    }

    fn system_matrix(section: &CircularSection, material: &Material, theory: BeamTheory) -> Mat8 {
        let e = material.e;
        let g = material.shear_modulus();
        let a = section.area();
        let i = section.second_moment();
        let j = section.polar_moment();

        let mut h = Mat8::zeros();
        // Bending: w' = θ (+ Q / κGA), θ' = M / EI, M' = -Q
        h[(0, 1)] = 1.0;
        if theory == BeamTheory::Timoshenko {
            h[(0, 4)] = 1.0 / (section.shear_coefficient(material.nu) * g * a);
        }
        h[(1, 5)] = 1.0 / (e * i);
        h[(5, 4)] = -1.0;
        // Bar and torsion
        h[(2, 6)] = 1.0 / (e * a);
        h[(3, 7)] = 1.0 / (g * j);
        h
    }

    pub fn section(&self) -> &CircularSection {
        &self.section
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn theory(&self) -> BeamTheory {
        self.theory
    }

    /// Axial span `(start, end)`
    pub fn span(&self) -> (f64, f64) {
        (self.start, self.end)
    }

    /// Segment length
    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    /// ODE system matrix (constant along the shaft)
    pub(crate) fn ode_matrix(&self) -> Mat8 {
        self.h
    }
}
