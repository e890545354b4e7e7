//! Annular disk element - plane-stress membrane plus Kirchhoff plate
//! bending, expanded in circumferential Fourier modes
//!
//! The running coordinate is the radius `r`. For mode `n` the displacements
//! vary as `u cos nθ`, `v sin nθ`, `w cos nθ`, and the state vector is
//!
//! ```text
//! y = [u, v, w, β, r N_r, r N_rθ, r V_r, -r M_r],   β = dw/dr
//! ```
//!
//! The system matrix varies with `r`, so integration takes the sampled path.

use serde::{Deserialize, Serialize};

use super::material::Material;
use super::state_space::traction_load;
use super::Gravity;
use crate::error::{TmmError, TmmResult};
use crate::math::{Mat8, Vec4, Vec8};

/// Radial thickness profile between the inner and outer radius
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Taper {
    /// `t` varies linearly in `r`
    #[default]
    Linear,
    /// `t = t_inner (r / r_inner)^b`
    PowerLaw,
}

/// Annular disk between `r_inner` and `r_outer`
#[derive(Debug, Clone, PartialEq)]
pub struct Disk {
    r_inner: f64,
    r_outer: f64,
    t_inner: f64,
    t_outer: f64,
    taper: Taper,
    material: Material,
    mode: u32,
    gravity: Option<Gravity>,
}

impl Disk {
    /// Create a disk of uniform thickness
    ///
    /// # Arguments
    /// * `r_inner` - Inner (bore) radius, must be positive
    /// * `r_outer` - Outer radius
    /// * `thickness` - Axial thickness
    /// * `material` - Elastic constants
    /// * `mode` - Circumferential Fourier mode `n`
    pub fn new(
        r_inner: f64,
        r_outer: f64,
        thickness: f64,
        material: Material,
        mode: u32,
    ) -> TmmResult<Self> {
        material.validate()?;
        if !r_inner.is_finite() || !r_outer.is_finite() || r_inner <= 0.0 || r_outer <= r_inner {
            return Err(TmmError::InvalidGeometry(format!(
                "disk radii must satisfy 0 < r_inner < r_outer, got [{}, {}]",
                r_inner, r_outer
            )));
        }
        check_thickness(thickness)?;

        Ok(Self {
            r_inner,
            r_outer,
            t_inner: thickness,
            t_outer: thickness,
            taper: Taper::Linear,
            material,
            mode,
            gravity: None,
        })
    }

    /// Vary the thickness from its inner value to `outer_thickness`
    pub fn with_taper(mut self, outer_thickness: f64, taper: Taper) -> TmmResult<Self> {
        check_thickness(outer_thickness)?;
        self.t_outer = outer_thickness;
        self.taper = taper;
        Ok(self)
    }

    /// Add axial self-weight (acting along `-w`)
    pub fn with_gravity(mut self, gravity: Gravity) -> Self {
        self.gravity = Some(gravity);
        self
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn mode(&self) -> u32 {
        self.mode
    }

    pub fn taper(&self) -> Taper {
        self.taper
    }

    /// Radial span `(r_inner, r_outer)`
    pub fn span(&self) -> (f64, f64) {
        (self.r_inner, self.r_outer)
    }

    /// Thickness at radius `r`
    pub fn thickness_at(&self, r: f64) -> f64 {
        match self.taper {
            Taper::Linear => {
                let s = (r - self.r_inner) / (self.r_outer - self.r_inner);
                self.t_inner + (self.t_outer - self.t_inner) * s
            }
            Taper::PowerLaw => {
                let b = (self.t_outer / self.t_inner).ln() / (self.r_outer / self.r_inner).ln();
                self.t_inner * (r / self.r_inner).powf(b)
            }
        }
    }

    /// True when the element carries a distributed load for its mode
    pub fn has_distributed_load(&self) -> bool {
        self.gravity.is_some() && self.mode == 0
    }

    /// ODE system matrix at radius `r`
    pub(crate) fn ode_matrix(&self, r: f64) -> Mat8 {
        let e = self.material.e;
        let nu = self.material.nu;
        let t = self.thickness_at(r);
        let n = self.mode as f64;
        let n2 = n * n;

        let k = self.material.plane_stress_modulus() * t;
        let gt = self.material.shear_modulus() * t;
        let et = e * t;
        let d = k * t * t / 12.0;
        let c = d * (1.0 - nu * nu);
        let twist = 2.0 * d * (1.0 - nu) * n2;

        let mut h = Mat8::zeros();

        // Membrane: u, v, r N_r, r N_rθ
        h[(0, 0)] = -nu / r;
        h[(0, 1)] = -nu * n / r;
        h[(0, 4)] = 1.0 / (r * k);
        h[(1, 0)] = n / r;
        h[(1, 1)] = 1.0 / r;
        h[(1, 5)] = 1.0 / (r * gt);
        h[(4, 0)] = et / r;
        h[(4, 1)] = et * n / r;
        h[(4, 4)] = nu / r;
        h[(4, 5)] = -n / r;
        h[(5, 0)] = et * n / r;
        h[(5, 1)] = et * n2 / r;
        h[(5, 4)] = nu * n / r;
        h[(5, 5)] = -1.0 / r;

        // Bending: w, β, r V_r, -r M_r
        h[(2, 3)] = 1.0;
        h[(3, 2)] = nu * n2 / (r * r);
        h[(3, 3)] = -nu / r;
        h[(3, 7)] = 1.0 / (r * d);
        h[(6, 2)] = (c * n2 * n2 + twist) / r.powi(3);
        h[(6, 3)] = -(c * n2 + twist) / (r * r);
        h[(6, 7)] = -nu * n2 / (r * r);
        h[(7, 2)] = -(c * n2 + twist) / (r * r);
        h[(7, 3)] = (c + twist) / r;
        h[(7, 6)] = -1.0;
        h[(7, 7)] = nu / r;

        h
    }

    /// Distributed load at radius `r`
    pub(crate) fn load(&self, r: f64) -> Vec8 {
        match self.gravity {
            Some(g) if self.mode == 0 => {
                let weight = g.density * g.acceleration * self.thickness_at(r);
                traction_load(&Vec4::new(0.0, 0.0, -weight, 0.0), r)
            }
            _ => Vec8::zeros(),
        }
    }
}

fn check_thickness(thickness: f64) -> TmmResult<()> {
    if !thickness.is_finite() || thickness <= 0.0 {
        return Err(TmmError::InvalidGeometry(format!(
            "disk thickness must be positive, got {}",
            thickness
        )));
    }
    Ok(())
}
