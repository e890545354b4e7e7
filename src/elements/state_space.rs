//! Hamiltonian state-space construction from a strain operator
//!
//! For a 1-D generalized continuum whose strain energy per unit length is
//! `½ εᵀ C ε` with
//!
//! ```text
//! ε = G0 q + G1 p,   q = [u, v, w, β],   p = [u', v', β'],   w' = β
//! ```
//!
//! the work-conjugate resultants are `f_p = ∂U/∂p` for `(u, v, β)` and the
//! Lagrange multiplier of `w' = β` for `w`. Eliminating `p` yields the first
//! order system `y' = H y` with
//!
//! ```text
//! A = -Pᵀ M⁻¹ N + e_w e_βᵀ      B = Pᵀ M⁻¹ P
//! C = S - Nᵀ M⁻¹ N              D = Nᵀ M⁻¹ P - e_β e_wᵀ
//! M = G1ᵀ C G1,  N = G1ᵀ C G0,  S = G0ᵀ C G0
//! ```
//!
//! where `P` selects `(u, v, β)` out of `q`. The result is Hamiltonian:
//! `B` and `C` are symmetric and `D = -Aᵀ`.

use nalgebra::{Matrix3, SMatrix};

use super::material::Material;
use crate::math::{Mat8, Vec4, Vec8};

/// Strain in terms of the displacements `q` (6 strains x 4 displacements)
pub type StrainOperator = SMatrix<f64, 6, 4>;
/// Strain in terms of the derivatives `(u', v', β')`
pub type GradientOperator = SMatrix<f64, 6, 3>;
/// Constitutive matrix relating the 6 strains to their resultants
pub type Constitutive = SMatrix<f64, 6, 6>;

const W: usize = 2;
const BETA: usize = 3;

/// `P`: picks `(u, v, β)` out of `[u, v, w, β]`
fn selector() -> SMatrix<f64, 3, 4> {
    let mut p = SMatrix::<f64, 3, 4>::zeros();
    p[(0, 0)] = 1.0;
    p[(1, 1)] = 1.0;
    p[(2, BETA)] = 1.0;
    p
}

/// Build the 8x8 ODE system matrix
///
/// Returns `None` if `G1ᵀ C G1` is singular, i.e. the strain operator does
/// not see every derivative.
pub fn hamiltonian_matrix(
    g0: &StrainOperator,
    g1: &GradientOperator,
    c: &Constitutive,
) -> Option<Mat8> {
    let m: Matrix3<f64> = g1.transpose() * c * g1;
    let n = g1.transpose() * c * g0;
    let s = g0.transpose() * c * g0;
    let m_inv = m.try_inverse()?;
    let p = selector();

    let mut a = -(p.transpose() * m_inv * n);
    a[(W, BETA)] += 1.0;
    let b = p.transpose() * m_inv * p;
    let c_h = s - n.transpose() * m_inv * n;
    let mut d = n.transpose() * m_inv * p;
    d[(BETA, W)] -= 1.0;

    let mut h = Mat8::zeros();
    h.fixed_view_mut::<4, 4>(0, 0).copy_from(&a);
    h.fixed_view_mut::<4, 4>(0, 4).copy_from(&b);
    h.fixed_view_mut::<4, 4>(4, 0).copy_from(&c_h);
    h.fixed_view_mut::<4, 4>(4, 4).copy_from(&d);
    Some(h)
}

/// Plane-stress membrane and Kirchhoff bending stiffness of a plate strip,
/// scaled by the radius factor of the running coordinate
///
/// Strain order is `[ε_1, ε_2, γ_12, κ_1, κ_2, τ_12]`.
pub fn plate_constitutive(material: &Material, thickness: f64, radius: f64) -> Constitutive {
    let nu = material.nu;
    let membrane = material.plane_stress_modulus() * thickness;
    let bending = membrane * thickness * thickness / 12.0;
    let shape = Matrix3::new(1.0, nu, 0.0, nu, 1.0, 0.0, 0.0, 0.0, (1.0 - nu) / 2.0);

    let mut c = Constitutive::zeros();
    c.fixed_view_mut::<3, 3>(0, 0).copy_from(&(shape * (membrane * radius)));
    c.fixed_view_mut::<3, 3>(3, 3).copy_from(&(shape * (bending * radius)));
    c
}

/// Load vector for a distributed traction `[p_u, p_v, p_w, m_β]` acting on
/// a strip of the given radius factor
pub fn traction_load(traction: &Vec4, radius: f64) -> Vec8 {
    let mut q = Vec8::zeros();
    q.fixed_rows_mut::<4>(4).copy_from(&(-traction * radius));
    q
}
