//! Thin cylindrical shell element for one circumferential Fourier mode
//!
//! The running coordinate is the axial position `x`. Displacements vary as
//! `u cos nθ`, `v sin nθ`, `w cos nθ` with `β = dw/dx`; resultants are taken
//! per radian of circumference. The system matrix is constant along the
//! shell and is built once, at construction.

use serde::{Deserialize, Serialize};

use super::material::Material;
use super::state_space::{
    hamiltonian_matrix, plate_constitutive, traction_load, GradientOperator, StrainOperator,
};
use super::Gravity;
use crate::error::{TmmError, TmmResult};
use crate::math::{Mat8, Vec4, Vec8};

/// Thin shell kinematics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShellTheory {
    /// Shallow-shell approximation
    #[default]
    Donnell,
    /// Adds the tangential displacement to the curvature changes
    Sanders,
}

/// Cylindrical shell segment of mean radius `radius`
#[derive(Debug, Clone, PartialEq)]
pub struct Shell {
    radius: f64,
    thickness: f64,
    start: f64,
    end: f64,
    material: Material,
    mode: u32,
    theory: ShellTheory,
    gravity: Option<Gravity>,
    h: Mat8,
}

impl Shell {
    /// Create a shell segment spanning `[start, end]` along its axis
    ///
    /// # Arguments
    /// * `radius` - Mean radius of the wall
    /// * `thickness` - Wall thickness
    /// * `start`, `end` - Axial span
    /// * `material` - Elastic constants
    /// * `mode` - Circumferential Fourier mode `n`
    /// * `theory` - Donnell or Sanders kinematics
    pub fn new(
        radius: f64,
        thickness: f64,
        start: f64,
        end: f64,
        material: Material,
        mode: u32,
        theory: ShellTheory,
    ) -> TmmResult<Self> {
        material.validate()?;
        if !radius.is_finite() || radius <= 0.0 || !thickness.is_finite() || thickness <= 0.0 {
            return Err(TmmError::InvalidGeometry(format!(
                "shell radius {} and thickness {} must be positive",
                radius, thickness
            )));
        }
        if !start.is_finite() || !end.is_finite() || end <= start {
            return Err(TmmError::InvalidGeometry(format!(
                "shell span [{}, {}] must have positive length",
                start, end
            )));
        }

        let (g0, g1) = strain_operator(radius, mode as f64, theory);
        let c = plate_constitutive(&material, thickness, radius);
        let h = hamiltonian_matrix(&g0, &g1, &c).ok_or_else(|| {
            TmmError::InvalidMaterial("shell constitutive matrix is singular".to_string())
        })?;

        Ok(Self {
            radius,
            thickness,
            start,
            end,
            material,
            mode,
            theory,
            gravity: None,
            h,
        })
    }

    /// Add self-weight acting in the plane of the cross-section, toward `θ = 0`
    pub fn with_gravity(mut self, gravity: Gravity) -> Self {
        self.gravity = Some(gravity);
        self
    }

    /// Belt wrap pressure on the shell surface
    ///
    /// Not available: always returns [`TmmError::Unsupported`].
    pub fn with_belt_pressure(self, _pressure: f64, _wrap_angle: f64) -> TmmResult<Self> {
        Err(TmmError::Unsupported(
            "belt pressure on shell elements is not implemented".to_string(),
        ))
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn mode(&self) -> u32 {
        self.mode
    }

    pub fn theory(&self) -> ShellTheory {
        self.theory
    }

    /// Axial span `(start, end)`
    pub fn span(&self) -> (f64, f64) {
        (self.start, self.end)
    }

    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    /// Self-weight only excites the beam-like mode
    pub fn has_distributed_load(&self) -> bool {
        self.gravity.is_some() && self.mode == 1
    }

    pub(crate) fn ode_matrix(&self) -> Mat8 {
        self.h
    }

    /// Constant distributed load (cross-section weight `ρ g 2πRt` per 2π)
    pub(crate) fn load(&self) -> Vec8 {
        match self.gravity {
            Some(g) if self.mode == 1 => {
                let weight = g.density * g.acceleration * self.thickness;
                traction_load(&Vec4::new(0.0, -weight, weight, 0.0), self.radius)
            }
            _ => Vec8::zeros(),
        }
    }
}

/// Strain operator in `[ε_x, ε_θ, γ, κ_x, κ_θ, τ]` order
fn strain_operator(r: f64, n: f64, theory: ShellTheory) -> (StrainOperator, GradientOperator) {
    let mut g0 = StrainOperator::zeros();
    g0[(1, 1)] = n / r;
    g0[(1, 2)] = 1.0 / r;
    g0[(2, 0)] = -n / r;
    g0[(4, 2)] = n * n / (r * r);
    g0[(5, 3)] = 2.0 * n / r;

    let mut g1 = GradientOperator::zeros();
    g1[(0, 0)] = 1.0;
    g1[(2, 1)] = 1.0;
    g1[(3, 2)] = -1.0;

    if theory == ShellTheory::Sanders {
        g0[(4, 1)] = n / (r * r);
        g0[(5, 0)] = n / (2.0 * r * r);
        g1[(5, 1)] = 1.5 / r;
    }

    (g0, g1)
}
