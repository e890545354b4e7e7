//! Mathematical utilities: matrix aliases, dense solve, sparse accumulation
//! and transfer matrix integration

pub mod sparse;
pub mod transfer;

use nalgebra::{DMatrix, DVector, Matrix4, SMatrix, SVector, Vector4};

use crate::error::{TmmError, TmmResult};

// Re-export sparse and transfer utilities
pub use sparse::SparseMatrixBuilder;
pub use transfer::{
    expm_minus_identity, integrate_constant, integrate_sampled, stiffness_from_transfer,
};

pub type Mat = DMatrix<f64>;
pub type Vec = DVector<f64>;
pub type Mat4 = Matrix4<f64>;
pub type Vec4 = Vector4<f64>;

/// 8x8 matrix: element ODE system matrix, transfer matrix or nodal stiffness
pub type Mat8 = SMatrix<f64, 8, 8>;
/// 8-element state vector (4 displacements followed by 4 section resultants)
pub type Vec8 = SVector<f64, 8>;
/// Augmented system `[[H, q], [0, 0]]` carrying a load column
pub type Mat9 = SMatrix<f64, 9, 9>;

/// Solve a square linear system using LU decomposition with partial pivoting.
///
/// Rows are equilibrated to unit max-norm before factorization so the pivot
/// test is independent of the units of each equation. A pivot whose magnitude
/// does not exceed `pivot_tolerance` marks the system as singular and its
/// row index is reported.
pub fn solve_linear_system(a: &Mat, b: &Vec, pivot_tolerance: f64) -> TmmResult<Vec> {
    let n = a.nrows();
    if a.ncols() != n || b.len() != n {
        return Err(TmmError::DimensionMismatch {
            rows: n,
            cols: a.ncols(),
            rhs: b.len(),
        });
    }

    let mut a = a.clone();
    let mut b = b.clone();
    for i in 0..n {
        let scale = a.row(i).amax();
        if scale > 0.0 && scale.is_finite() {
            for j in 0..n {
                a[(i, j)] /= scale;
            }
            b[i] /= scale;
        }
    }

    let lu = a.lu();
    let u = lu.u();
    for i in 0..n {
        // Negated comparison also rejects NaN pivots
        if !(u[(i, i)].abs() > pivot_tolerance) {
            return Err(TmmError::SingularMatrix { pivot: i });
        }
    }

    lu.solve(&b)
        .ok_or(TmmError::SingularMatrix { pivot: n.saturating_sub(1) })
}

/// True when every entry of the matrix is finite
pub fn is_finite_matrix<const R: usize, const C: usize>(m: &SMatrix<f64, R, C>) -> bool {
    m.iter().all(|v| v.is_finite())
}
