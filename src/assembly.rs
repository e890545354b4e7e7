//! Assembly - global DOF numbering, system accumulation, boundary
//! conditions and the linear solve
//!
//! Each element's transfer matrix `T` and load vector `P` are converted to a
//! nodal stiffness `K_e` and equivalent load `R_e` (see
//! [`stiffness_from_transfer`]) and summed into the global system
//! `K x = F_ext + Σ R_e`. Constraints replace the corresponding equation
//! by an identity row.
//!
//! The assembly moves through the states
//! `Empty → Built → Assembled → Constrained → Solved`.

use std::collections::BTreeMap;

use log::{debug, info, warn};
use rayon::prelude::*;

use crate::analysis::{AnalysisOptions, IntegrationOptions};
use crate::elements::{Element, Node, NodeId, DOF_PER_NODE};
use crate::error::{TmmError, TmmResult};
use crate::math::sparse::sparse_matvec;
use crate::math::{
    is_finite_matrix, solve_linear_system, stiffness_from_transfer, Mat, Mat8,
    SparseMatrixBuilder, Vec as DVec, Vec8,
};

/// Stable handle of an element in an assembly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

impl ElementId {
    /// Insertion position of the element
    pub fn index(self) -> usize {
        self.0
    }
}

/// Lifecycle of an [`Assembly`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblyState {
    /// No elements
    Empty,
    /// Elements added, no global system
    Built,
    /// DOF indices assigned and global system populated
    Assembled,
    /// Loads or constraints applied since assembly
    Constrained,
    /// Solution available
    Solved,
}

#[derive(Debug, Clone)]
struct ElementEntry {
    element: Element,
    nodes: [NodeId; 2],
}

/// Global system built from element contributions
#[derive(Debug, Clone)]
struct GlobalSystem {
    stiffness: SparseMatrixBuilder,
    /// External loads plus equivalent element loads
    loads: DVec,
}

/// Element contribution ready for scattering
struct Contribution {
    dofs: [usize; 8],
    stiffness: Mat8,
    load: Vec8,
}

/// Collection of elements and the global linear system they form
#[derive(Debug, Clone)]
pub struct Assembly {
    options: AnalysisOptions,
    elements: Vec<ElementEntry>,
    nodes: Vec<Node>,
    state: AssemblyState,
    mode: Option<u32>,
    dof_count: usize,
    system: Option<GlobalSystem>,
    /// Constrained DOF → prescribed value; later calls override earlier ones
    constraints: BTreeMap<usize, f64>,
    solution: Option<DVec>,
}

impl Default for Assembly {
    fn default() -> Self {
        Self::new()
    }
}

impl Assembly {
    /// Create an empty assembly with default options
    pub fn new() -> Self {
        Self::with_options(AnalysisOptions::default())
    }

    /// Create an empty assembly with the given options
    pub fn with_options(options: AnalysisOptions) -> Self {
        Self {
            options,
            elements: Vec::new(),
            nodes: Vec::new(),
            state: AssemblyState::Empty,
            mode: None,
            dof_count: 0,
            system: None,
            constraints: BTreeMap::new(),
            solution: None,
        }
    }

    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    pub fn state(&self) -> AssemblyState {
        self.state
    }

    /// Fourier mode of the last successful `assemble`
    pub fn mode(&self) -> Option<u32> {
        self.mode
    }

    // ========================
    // Model Building Methods
    // ========================

    /// Add an element with two fresh nodes
    pub fn add_element(&mut self, element: impl Into<Element>) -> ElementId {
        let start = self.push_node();
        let end = self.push_node();
        self.push_element(element.into(), [start, end])
    }

    /// Add an element whose start node is the end node of `previous`
    ///
    /// Both elements must be of the same kind and Fourier mode, and the new
    /// span must begin where `previous` ends.
    pub fn add_element_after(
        &mut self,
        element: impl Into<Element>,
        previous: ElementId,
    ) -> TmmResult<ElementId> {
        let element = element.into();
        let prev = self
            .elements
            .get(previous.0)
            .ok_or(TmmError::ElementNotFound(previous.0))?;

        if prev.element.kind() != element.kind() {
            return Err(TmmError::IncompatibleNodes(format!(
                "cannot join {:?} element to {:?} element {}",
                element.kind(),
                prev.element.kind(),
                previous.0
            )));
        }
        if prev.element.fourier_mode() != element.fourier_mode() {
            return Err(TmmError::IncompatibleNodes(format!(
                "element {} has Fourier mode {:?}, new element has {:?}",
                previous.0,
                prev.element.fourier_mode(),
                element.fourier_mode()
            )));
        }
        let (_, prev_end) = prev.element.span();
        let (start, _) = element.span();
        let tol = 1e-9 * prev_end.abs().max(start.abs()).max(1.0);
        if (prev_end - start).abs() > tol {
            return Err(TmmError::IncompatibleNodes(format!(
                "element {} ends at {}, new element starts at {}",
                previous.0, prev_end, start
            )));
        }

        let shared = prev.nodes[1];
        let end = self.push_node();
        Ok(self.push_element(element, [shared, end]))
    }

    fn push_node(&mut self) -> NodeId {
        self.nodes.push(Node::new());
        NodeId(self.nodes.len() - 1)
    }

    fn push_element(&mut self, element: Element, nodes: [NodeId; 2]) -> ElementId {
        if self.system.is_some() {
            debug!("element added after assembly, discarding global system");
        }
        self.discard_system();
        self.elements.push(ElementEntry { element, nodes });
        self.state = AssemblyState::Built;
        ElementId(self.elements.len() - 1)
    }

    /// Element by handle
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0).map(|e| &e.element)
    }

    /// Start and end node of an element
    pub fn element_nodes(&self, id: ElementId) -> TmmResult<[NodeId; 2]> {
        self.elements
            .get(id.0)
            .map(|e| e.nodes)
            .ok_or(TmmError::ElementNotFound(id.0))
    }

    /// Node by handle
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // ========================
    // Assembly
    // ========================

    /// Number DOFs and build the global system for Fourier mode `mode`
    ///
    /// Disk and shell elements must have been built for `mode`; shafts take
    /// part in every mode.
    pub fn assemble(&mut self, mode: u32) -> TmmResult<()> {
        self.options.validate()?;
        if self.elements.is_empty() {
            return Err(TmmError::InvalidGeometry(
                "assembly has no elements".to_string(),
            ));
        }
        for (index, entry) in self.elements.iter().enumerate() {
            if let Some(found) = entry.element.fourier_mode() {
                if found != mode {
                    return Err(TmmError::ModeMismatch {
                        element: index,
                        expected: mode,
                        found,
                    });
                }
            }
        }

        self.discard_system();
        self.state = AssemblyState::Built;

        let mut next = 0;
        for entry in &self.elements {
            for id in entry.nodes {
                let node = &mut self.nodes[id.0];
                if !node.is_indexed() {
                    next = node.assign_indices(next);
                }
            }
        }
        self.dof_count = next;

        let contributions = match self.compute_contributions() {
            Ok(contributions) => contributions,
            Err(e) => {
                warn!("assembly of mode {} failed: {}", mode, e);
                self.discard_system();
                return Err(e);
            }
        };

        let mut stiffness = SparseMatrixBuilder::new(self.dof_count);
        let mut loads = DVec::zeros(self.dof_count);
        for c in &contributions {
            stiffness.add_element_matrix(&c.dofs, &c.stiffness);
            for (i, &dof) in c.dofs.iter().enumerate() {
                loads[dof] += c.load[i];
            }
        }

        info!(
            "assembled {} elements, {} nodes, {} DOFs (mode {}, {} triplets)",
            self.elements.len(),
            self.nodes.len(),
            self.dof_count,
            mode,
            stiffness.nnz()
        );

        self.system = Some(GlobalSystem { stiffness, loads });
        self.mode = Some(mode);
        self.state = AssemblyState::Assembled;
        Ok(())
    }

    fn compute_contributions(&self) -> TmmResult<Vec<Contribution>> {
        let integration = &self.options.integration;
        let contribution = |(index, entry): (usize, &ElementEntry)| -> TmmResult<Contribution> {
            let (stiffness, load) = element_contribution(index, &entry.element, integration)?;
            Ok(Contribution {
                dofs: self.global_dofs(entry)?,
                stiffness,
                load,
            })
        };

        if self.options.assembly.parallel {
            self.elements.par_iter().enumerate().map(contribution).collect()
        } else {
            self.elements.iter().enumerate().map(contribution).collect()
        }
    }

    fn global_dofs(&self, entry: &ElementEntry) -> TmmResult<[usize; 8]> {
        let mut dofs = [0; 8];
        for (n, id) in entry.nodes.iter().enumerate() {
            for (i, dof) in self.nodes[id.0].dofs.iter().enumerate() {
                dofs[n * DOF_PER_NODE + i] = dof.ok_or(TmmError::NotAssembled)?;
            }
        }
        Ok(dofs)
    }

    /// Nodal stiffness and equivalent load of one element
    pub fn element_stiffness_and_load(&self, id: ElementId) -> TmmResult<(Mat8, Vec8)> {
        let entry = self
            .elements
            .get(id.0)
            .ok_or(TmmError::ElementNotFound(id.0))?;
        self.options.integration.validate()?;
        element_contribution(id.0, &entry.element, &self.options.integration)
    }

    /// Total number of DOFs (0 before assembly)
    pub fn variable_count(&self) -> usize {
        self.dof_count
    }

    /// Number of equations in the global system (0 before assembly)
    pub fn equation_count(&self) -> usize {
        self.system.as_ref().map_or(0, |s| s.stiffness.size())
    }

    /// Global indices of a node's DOFs
    pub fn dof_indices(&self, node: NodeId) -> TmmResult<[Option<usize>; DOF_PER_NODE]> {
        self.node(node)
            .map(Node::dof_indices)
            .ok_or(TmmError::NodeNotFound(node.0))
    }

    /// Global index of local DOF `local` at `node`
    pub fn node_dof(&self, node: NodeId, local: usize) -> TmmResult<usize> {
        let indices = self.dof_indices(node)?;
        let slot = indices.get(local).ok_or(TmmError::DofOutOfRange {
            dof: local,
            count: DOF_PER_NODE,
        })?;
        slot.ok_or(TmmError::NotAssembled)
    }

    // ========================
    // Loads and Constraints
    // ========================

    fn check_dof(&self, dof: usize) -> TmmResult<()> {
        if self.system.is_none() {
            return Err(TmmError::NotAssembled);
        }
        if dof >= self.dof_count {
            return Err(TmmError::DofOutOfRange {
                dof,
                count: self.dof_count,
            });
        }
        Ok(())
    }

    fn mark_constrained(&mut self) {
        if self.solution.take().is_some() {
            for node in &mut self.nodes {
                node.displacements = [0.0; DOF_PER_NODE];
            }
        }
        self.state = AssemblyState::Constrained;
    }

    /// Add a point force to the load vector
    pub fn apply_force(&mut self, value: f64, dof: usize) -> TmmResult<()> {
        self.check_dof(dof)?;
        if let Some(system) = self.system.as_mut() {
            system.loads[dof] += value;
        }
        self.mark_constrained();
        Ok(())
    }

    /// Add a point moment to the load vector (same as a force on a rotational DOF)
    pub fn apply_moment(&mut self, value: f64, dof: usize) -> TmmResult<()> {
        self.apply_force(value, dof)
    }

    /// Hold a DOF at zero
    pub fn fix_dof(&mut self, dof: usize) -> TmmResult<()> {
        self.prescribe_displacement(0.0, dof)
    }

    /// Hold several DOFs at zero; nothing is applied if any index is invalid
    pub fn fix_dofs(&mut self, dofs: &[usize]) -> TmmResult<()> {
        for &dof in dofs {
            self.check_dof(dof)?;
        }
        for &dof in dofs {
            self.constraints.insert(dof, 0.0);
        }
        self.mark_constrained();
        Ok(())
    }

    /// Hold all DOFs of a node at zero
    pub fn fix_node(&mut self, node: NodeId) -> TmmResult<()> {
        let dofs = (0..DOF_PER_NODE)
            .map(|local| self.node_dof(node, local))
            .collect::<TmmResult<Vec<_>>>()?;
        self.fix_dofs(&dofs)
    }

    /// Hold a DOF at `value`
    pub fn prescribe_displacement(&mut self, value: f64, dof: usize) -> TmmResult<()> {
        self.check_dof(dof)?;
        self.constraints.insert(dof, value);
        self.mark_constrained();
        Ok(())
    }

    /// Dense system matrix and right-hand side with constraint rows applied
    pub fn constrained_system(&self) -> TmmResult<(Mat, DVec)> {
        let system = self.system.as_ref().ok_or(TmmError::NotAssembled)?;
        let mut a = system.stiffness.to_dense();
        let mut b = system.loads.clone();

        for (&dof, &value) in &self.constraints {
            a.row_mut(dof).fill(0.0);
            a[(dof, dof)] = 1.0;
            b[dof] = value;
        }

        Ok((a, b))
    }

    // ========================
    // Solution
    // ========================

    /// Solve the constrained system and store the displacements
    pub fn solve(&mut self) -> TmmResult<&DVec> {
        let (a, b) = self.constrained_system()?;
        debug!(
            "solving {} equations with {} constrained DOFs",
            a.nrows(),
            self.constraints.len()
        );

        let x = match solve_linear_system(&a, &b, self.options.solver.pivot_tolerance) {
            Ok(x) => x,
            Err(err) => {
                warn!("solve failed: {}", err);
                return Err(err);
            }
        };

        for node in &mut self.nodes {
            for (value, dof) in node.displacements.iter_mut().zip(node.dofs) {
                *value = dof.map_or(0.0, |d| x[d]);
            }
        }

        info!("solved {} DOFs, max |x| = {:.6e}", x.len(), x.amax());
        self.state = AssemblyState::Solved;
        Ok(self.solution.insert(x))
    }

    /// Solution vector, if solved
    pub fn solution(&self) -> Option<&DVec> {
        self.solution.as_ref()
    }

    /// Solved value at a DOF
    pub fn displacement(&self, dof: usize) -> TmmResult<f64> {
        let x = self.solution.as_ref().ok_or(TmmError::NotSolved)?;
        x.get(dof).copied().ok_or(TmmError::DofOutOfRange {
            dof,
            count: x.len(),
        })
    }

    /// Solved displacements of a node
    pub fn node_displacements(&self, node: NodeId) -> TmmResult<[f64; DOF_PER_NODE]> {
        if self.solution.is_none() {
            return Err(TmmError::NotSolved);
        }
        self.node(node)
            .map(Node::displacements)
            .ok_or(TmmError::NodeNotFound(node.0))
    }

    /// Residual `K x - F` of the unconstrained system
    ///
    /// Zero at free DOFs (up to round-off); the support reaction at
    /// constrained DOFs.
    pub fn reactions(&self) -> TmmResult<DVec> {
        let x = self.solution.as_ref().ok_or(TmmError::NotSolved)?;
        let system = self.system.as_ref().ok_or(TmmError::NotAssembled)?;
        let csr = system.stiffness.to_csr();
        Ok(sparse_matvec(&csr, x) - &system.loads)
    }

    // ========================
    // Reset
    // ========================

    fn discard_system(&mut self) {
        for node in &mut self.nodes {
            node.reset();
        }
        self.system = None;
        self.constraints.clear();
        self.solution = None;
        self.dof_count = 0;
        self.mode = None;
    }

    /// Drop the global system, loads, constraints and DOF indices; keep elements
    pub fn reset(&mut self) {
        self.discard_system();
        self.state = if self.elements.is_empty() {
            AssemblyState::Empty
        } else {
            AssemblyState::Built
        };
    }

    /// Remove everything
    pub fn clear(&mut self) {
        self.discard_system();
        self.elements.clear();
        self.nodes.clear();
        self.state = AssemblyState::Empty;
    }
}

/// Integrate one element and convert it to stiffness form
fn element_contribution(
    index: usize,
    element: &Element,
    options: &IntegrationOptions,
) -> TmmResult<(Mat8, Vec8)> {
    let (t, p) = element.compute_transfer_matrix_and_load(options);
    if !is_finite_matrix(&t) || !is_finite_matrix(&p) {
        return Err(TmmError::NonFinite { element: index });
    }

    let (k, r) = stiffness_from_transfer(&t, &p)
        .ok_or(TmmError::SingularTransferBlock { element: index })?;
    if !is_finite_matrix(&k) || !is_finite_matrix(&r) {
        return Err(TmmError::NonFinite { element: index });
    }

    debug!("element {} ({:?}): |K|max = {:.3e}", index, element.kind(), k.amax());
    Ok((k, r))
}
