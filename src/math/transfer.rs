//! Transfer matrix integration
//!
//! An element is described by the linear ODE `y' = H(z) y + q(z)` on its
//! 8-component state vector. Integrating it over the element span gives the
//! transfer matrix `T` and load vector `P` with `y(end) = T y(start) + P`.
//!
//! The matrix exponential is evaluated by scaling-and-squaring: a 4th-order
//! Taylor polynomial of `exp(X / 2^M) - I`, followed by `M` applications of
//! `exp(2Y) - I = 2E + E²` where `E = exp(Y) - I`. Working with `exp - I`
//! keeps the small sub-step increments from being absorbed by the identity.
//!
//! Loads are carried through an augmented 9x9 system `[[H, q], [0, 0]]`,
//! whose exponential holds `∫ exp(H s) ds · q` in its last column.

use log::trace;

use super::{Mat4, Mat8, Mat9, Vec8};

/// Approximate `exp(x) - I` by scaling-and-squaring with `squarings` doublings
pub fn expm_minus_identity(x: &Mat9, squarings: u32) -> Mat9 {
    let steps = 2f64.powi(squarings as i32);
    let h = x / steps;

    let h2 = h * h;
    let h3 = h2 * h;
    let h4 = h3 * h;
    let mut e = h + h2 * 0.5 + h3 * (1.0 / 6.0) + h4 * (1.0 / 24.0);

    for _ in 0..squarings {
        e = e * 2.0 + e * e;
    }

    e
}

/// Exponentiate an already scaled system matrix `a` (and optional scaled load
/// column `b`), returning `(exp(a), ∫₀¹ exp(a s) ds · b)`
fn exponentiate(a: &Mat8, b: Option<&Vec8>, squarings: u32) -> (Mat8, Vec8) {
    let mut aug = Mat9::zeros();
    aug.fixed_view_mut::<8, 8>(0, 0).copy_from(a);
    if let Some(b) = b {
        aug.fixed_view_mut::<8, 1>(0, 8).copy_from(b);
    }

    let e = expm_minus_identity(&aug, squarings);
    let t = e.fixed_view::<8, 8>(0, 0).into_owned() + Mat8::identity();
    let p = e.fixed_view::<8, 1>(0, 8).into_owned();
    (t, p)
}

/// Closed-form path for a constant ODE matrix: `T = exp(H L)`
///
/// # Arguments
/// * `h` - Constant ODE system matrix
/// * `load` - Constant distributed load `q`, if any
/// * `span` - Integration length `L`
/// * `squarings` - Number of doublings `M`
pub fn integrate_constant(
    h: &Mat8,
    load: Option<&Vec8>,
    span: f64,
    squarings: u32,
) -> (Mat8, Vec8) {
    let scaled_load = load.map(|q| q * span);
    exponentiate(&(h * span), scaled_load.as_ref(), squarings)
}

/// Sampled path for a position-dependent ODE matrix.
///
/// The span `[start, end]` (with `start > 0`) is divided into `samples`
/// sub-intervals of equal width in `s = ln z`. On each sub-interval the system
/// `dy/ds = z (H(z) y + q(z))` is frozen at the midpoint and integrated
/// exactly; sub-interval transfer matrices are composed by left
/// multiplication.
pub fn integrate_sampled(
    h: &dyn Fn(f64) -> Mat8,
    load: Option<&dyn Fn(f64) -> Vec8>,
    start: f64,
    end: f64,
    samples: usize,
    squarings: u32,
) -> (Mat8, Vec8) {
    let samples = samples.max(1);
    let s0 = start.ln();
    let ds = (end.ln() - s0) / samples as f64;

    let mut t = Mat8::identity();
    let mut p = Vec8::zeros();

    for k in 0..samples {
        let z = (s0 + (k as f64 + 0.5) * ds).exp();
        let a = h(z) * (z * ds);
        let b = load.map(|q| q(z) * (z * ds));

        let (t_k, p_k) = exponentiate(&a, b.as_ref(), squarings);
        t = t_k * t;
        p = t_k * p + p_k;
        trace!("sample {} at z = {:.6e}", k, z);
    }

    (t, p)
}

/// Convert a transfer matrix and load vector into nodal stiffness form.
///
/// With the state split as `y = [q; f]` (displacements, section resultants)
/// and nodal forces `-f(start)` at the first node and `f(end)` at the second,
/// the element satisfies `K [q0; q1] = F + R`, where `R` is the equivalent
/// nodal load returned here. Returns `None` if the displacement/force block
/// `T_qf` cannot be inverted.
pub fn stiffness_from_transfer(t: &Mat8, p: &Vec8) -> Option<(Mat8, Vec8)> {
    let t_qq: Mat4 = t.fixed_view::<4, 4>(0, 0).into_owned();
    let t_qf: Mat4 = t.fixed_view::<4, 4>(0, 4).into_owned();
    let t_fq: Mat4 = t.fixed_view::<4, 4>(4, 0).into_owned();
    let t_ff: Mat4 = t.fixed_view::<4, 4>(4, 4).into_owned();
    let p_q = p.fixed_rows::<4>(0).into_owned();
    let p_f = p.fixed_rows::<4>(4).into_owned();

    let y = t_qf.lu().try_inverse()?;

    let k_00 = y * t_qq;
    let k_01 = -y;
    let k_10 = t_fq - t_ff * k_00;
    let k_11 = t_ff * y;

    let mut k = Mat8::zeros();
    k.fixed_view_mut::<4, 4>(0, 0).copy_from(&k_00);
    k.fixed_view_mut::<4, 4>(0, 4).copy_from(&k_01);
    k.fixed_view_mut::<4, 4>(4, 0).copy_from(&k_10);
    k.fixed_view_mut::<4, 4>(4, 4).copy_from(&k_11);

    // Nodal forces produced by the load with both nodes held fixed
    let f_0 = y * p_q;
    let f_1 = p_f - t_ff * f_0;

    let mut equivalent = Vec8::zeros();
    equivalent.fixed_rows_mut::<4>(0).copy_from(&(-f_0));
    equivalent.fixed_rows_mut::<4>(4).copy_from(&(-f_1));

    Some((k, equivalent))
}
