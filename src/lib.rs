//! TMM Solver - transfer matrix analysis of shafts, disks and cylindrical shells
//!
//! Each element is described by a first-order ODE on an 8-component state
//! vector of displacements and section resultants. The ODE is integrated
//! into a transfer matrix by a scaling-and-squaring matrix exponential,
//! converted to nodal stiffness form, and assembled into one global linear
//! system:
//! - Shaft elements (Euler-Bernoulli or Timoshenko bending, extension, torsion)
//! - Annular disk elements (membrane + plate bending, linear or power-law taper)
//! - Cylindrical shell elements (Donnell or Sanders kinematics)
//! - Circumferential Fourier modes for disks and shells
//! - Gravity loads, point loads, fixed and prescribed DOFs
//!
//! ## Example
//! ```rust
//! use tmm_solver::prelude::*;
//!
//! let shaft = Shaft::solid(50.0, Material::steel(), 0.0, 1000.0, BeamTheory::Timoshenko)?;
//!
//! let mut assembly = Assembly::new();
//! let id = assembly.add_element(shaft);
//! assembly.assemble(0)?;
//!
//! // Clamp the first node, push the tip down
//! let [root, tip] = assembly.element_nodes(id)?;
//! assembly.fix_node(root)?;
//! assembly.apply_force(-1000.0, assembly.node_dof(tip, 0)?)?;
//! assembly.solve()?;
//!
//! let deflection = assembly.node_displacements(tip)?[0];
//! assert!(deflection < -5.0);
//! # Ok::<(), TmmError>(())
//! ```

pub mod analysis;
pub mod assembly;
pub mod elements;
pub mod error;
pub mod math;

// Re-export common types
pub mod prelude {
    pub use crate::analysis::{AnalysisOptions, AssemblyOptions, IntegrationOptions, SolverOptions};
    pub use crate::assembly::{Assembly, AssemblyState, ElementId};
    pub use crate::elements::{
        BeamTheory, CircularSection, Disk, Element, ElementKind, Gravity, Material, Node, NodeId,
        Shaft, Shell, ShellTheory, Taper, DOF_PER_NODE,
    };
    pub use crate::error::{TmmError, TmmResult};
}
