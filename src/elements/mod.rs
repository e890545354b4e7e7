//! Structural elements module
//!
//! Every element is a 1-D segment with two nodes whose behaviour is a
//! linear ODE `y' = H(z) y + q(z)` on the 8-component state vector
//! `y = [q; f]` (4 displacements, 4 work-conjugate resultants).

mod disk;
mod material;
mod node;
mod section;
mod shaft;
mod shell;
pub mod state_space;

use serde::{Deserialize, Serialize};

pub use disk::{Disk, Taper};
pub use material::Material;
pub use node::{Node, NodeId, DOF_PER_NODE};
pub use section::CircularSection;
pub use shaft::{BeamTheory, Shaft};
pub use shell::{Shell, ShellTheory};

use crate::analysis::IntegrationOptions;
use crate::error::{TmmError, TmmResult};
use crate::math::{integrate_constant, integrate_sampled, Mat8, Vec8};

/// Gravitational self-weight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gravity {
    /// Gravitational acceleration (e.g. 9810 mm/s²)
    pub acceleration: f64,
    /// Mass density (e.g. 7.85e-9 t/mm³ for steel)
    pub density: f64,
}

impl Gravity {
    pub fn new(acceleration: f64, density: f64) -> Self {
        Self {
            acceleration,
            density,
        }
    }
}

/// Element variant tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    Shaft,
    Disk,
    Shell,
}

/// A structural element
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Shaft(Shaft),
    Disk(Disk),
    Shell(Shell),
}

impl From<Shaft> for Element {
    fn from(shaft: Shaft) -> Self {
        Element::Shaft(shaft)
    }
}

impl From<Disk> for Element {
    fn from(disk: Disk) -> Self {
        Element::Disk(disk)
    }
}

impl From<Shell> for Element {
    fn from(shell: Shell) -> Self {
        Element::Shell(shell)
    }
}

impl Element {
    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Shaft(_) => ElementKind::Shaft,
            Element::Disk(_) => ElementKind::Disk,
            Element::Shell(_) => ElementKind::Shell,
        }
    }

    /// DOFs at each of the two nodes
    pub fn dof_count_per_node(&self) -> usize {
        DOF_PER_NODE
    }

    /// Running-coordinate span `(start, end)`
    pub fn span(&self) -> (f64, f64) {
        match self {
            Element::Shaft(s) => s.span(),
            Element::Disk(d) => d.span(),
            Element::Shell(s) => s.span(),
        }
    }

    /// Circumferential Fourier mode, or `None` for elements that are the
    /// same in every mode (shafts)
    pub fn fourier_mode(&self) -> Option<u32> {
        match self {
            Element::Shaft(_) => None,
            Element::Disk(d) => Some(d.mode()),
            Element::Shell(s) => Some(s.mode()),
        }
    }

    /// True if `load_at` is non-zero somewhere on the span
    pub fn has_distributed_load(&self) -> bool {
        match self {
            Element::Shaft(_) => false,
            Element::Disk(d) => d.has_distributed_load(),
            Element::Shell(s) => s.has_distributed_load(),
        }
    }

    fn check_span(&self, z: f64) -> TmmResult<()> {
        let (start, end) = self.span();
        if !(z >= start && z <= end) {
            return Err(TmmError::OutOfSpan { z, start, end });
        }
        Ok(())
    }

    /// ODE system matrix `H(z)`
    pub fn ode_matrix_at(&self, z: f64) -> TmmResult<Mat8> {
        self.check_span(z)?;
        Ok(match self {
            Element::Shaft(s) => s.ode_matrix(),
            Element::Disk(d) => d.ode_matrix(z),
            Element::Shell(s) => s.ode_matrix(),
        })
    }

    /// Distributed load `q(z)`
    pub fn load_at(&self, z: f64) -> TmmResult<Vec8> {
        self.check_span(z)?;
        Ok(match self {
            Element::Shaft(_) => Vec8::zeros(),
            Element::Disk(d) => d.load(z),
            Element::Shell(s) => s.load(),
        })
    }

    /// Transfer matrix `T` and load vector `P` over the whole span, with
    /// `y(end) = T y(start) + P`
    pub fn compute_transfer_matrix_and_load(&self, options: &IntegrationOptions) -> (Mat8, Vec8) {
        let (start, end) = self.span();
        let squarings = options.squarings;

        match self {
            Element::Shaft(s) => integrate_constant(&s.ode_matrix(), None, end - start, squarings),
            Element::Shell(s) => {
                let load = s.has_distributed_load().then(|| s.load());
                integrate_constant(&s.ode_matrix(), load.as_ref(), end - start, squarings)
            }
            Element::Disk(d) => {
                let loaded = d.has_distributed_load();
                let h = |r: f64| d.ode_matrix(r);
                let q = |r: f64| d.load(r);
                let load: Option<&dyn Fn(f64) -> Vec8> = if loaded { Some(&q) } else { None };
                integrate_sampled(
                    &h,
                    load,
                    start,
                    end,
                    options.sample_count(loaded),
                    squarings,
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn shaft() -> Element {
        Shaft::solid(50.0, Material::steel(), 0.0, 500.0, BeamTheory::Timoshenko)
            .unwrap()
            .into()
    }

    #[test]
    fn test_kind_and_mode() {
        assert_eq!(shaft().kind(), ElementKind::Shaft);
        assert_eq!(shaft().fourier_mode(), None);

        let disk: Element = Disk::new(20.0, 100.0, 5.0, Material::steel(), 2).unwrap().into();
        assert_eq!(disk.kind(), ElementKind::Disk);
        assert_eq!(disk.fourier_mode(), Some(2));
        assert_eq!(disk.dof_count_per_node(), 4);
    }

    #[test]
    fn test_out_of_span_is_rejected() {
        let e = shaft();
        assert!(e.ode_matrix_at(250.0).is_ok());
        assert!(e.ode_matrix_at(500.0).is_ok());
        assert!(matches!(e.ode_matrix_at(-1.0), Err(TmmError::OutOfSpan { .. })));
        assert!(matches!(e.load_at(f64::NAN), Err(TmmError::OutOfSpan { .. })));
    }

    #[test]
    fn test_shaft_transfer_is_exact_polynomial() {
        // Shaft H is nilpotent: T carries the cantilever flexibilities exactly
        let e = shaft();
        let (t, p) = e.compute_transfer_matrix_and_load(&IntegrationOptions::default());
        let Element::Shaft(s) = &e else { unreachable!() };
        let ei = s.material().e * s.section().second_moment();
        let l = 500.0;
        assert_relative_eq!(t[(1, 5)], l / ei, max_relative = 1e-10);
        assert_relative_eq!(t[(5, 4)], -l, max_relative = 1e-10);
        assert_eq!(p, Vec8::zeros());
    }

    #[test]
    fn test_loaded_disk_uses_more_samples() {
        let g = Gravity::new(9810.0, 7.85e-9);
        let disk: Element = Disk::new(20.0, 200.0, 8.0, Material::steel(), 0)
            .unwrap()
            .with_gravity(g)
            .into();
        let coarse = IntegrationOptions::default().with_samples(3, 3);
        let (_, p_coarse) = disk.compute_transfer_matrix_and_load(&coarse);
        let (_, p_default) = disk.compute_transfer_matrix_and_load(&IntegrationOptions::default());
        let fine = IntegrationOptions::default().with_samples(3, 200);
        let (_, p_fine) = disk.compute_transfer_matrix_and_load(&fine);

        let err = |p: &Vec8| (p - p_fine).amax();
        assert!(err(&p_default) < err(&p_coarse));
        assert!(p_default[6] > 0.0);
    }
}
