//! Node - displacement values and global DOF indices at one element end

use serde::{Deserialize, Serialize};

/// Degrees of freedom carried by every node
pub const DOF_PER_NODE: usize = 4;

/// Stable handle of a node in an assembly's node arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position of the node in the arena
    pub fn index(self) -> usize {
        self.0
    }
}

/// A node of the 1-D discretisation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    /// Solved displacements, in the DOF order of the owning element kind
    pub(crate) displacements: [f64; DOF_PER_NODE],

    /// Global equation index of each DOF (`None` until assembled)
    pub(crate) dofs: [Option<usize>; DOF_PER_NODE],
}

impl Node {
    /// Create a node with zero displacements and unassigned indices
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of DOFs at this node
    pub fn dof_count(&self) -> usize {
        DOF_PER_NODE
    }

    /// Solved displacements (zero before a successful solve)
    pub fn displacements(&self) -> [f64; DOF_PER_NODE] {
        self.displacements
    }

    /// Global indices of the node's DOFs
    pub fn dof_indices(&self) -> [Option<usize>; DOF_PER_NODE] {
        self.dofs
    }

    /// True once every DOF has a global index
    pub fn is_indexed(&self) -> bool {
        self.dofs.iter().all(Option::is_some)
    }

    /// Assign consecutive global indices starting at `first`; returns the next free index
    pub(crate) fn assign_indices(&mut self, first: usize) -> usize {
        for (i, dof) in self.dofs.iter_mut().enumerate() {
            *dof = Some(first + i);
        }
        first + DOF_PER_NODE
    }

    /// Drop global indices and solved displacements
    pub(crate) fn reset(&mut self) {
        self.dofs = [None; DOF_PER_NODE];
        self.displacements = [0.0; DOF_PER_NODE];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_creation() {
        let node = Node::new();
        assert_eq!(node.dof_count(), 4);
        assert_eq!(node.displacements(), [0.0; 4]);
        assert_eq!(node.dof_indices(), [None; 4]);
        assert!(!node.is_indexed());
    }

    #[test]
    fn test_assign_and_reset() {
        let mut node = Node::new();
        let next = node.assign_indices(8);
        assert_eq!(next, 12);
        assert_eq!(node.dof_indices(), [Some(8), Some(9), Some(10), Some(11)]);
        assert!(node.is_indexed());

        node.displacements[2] = 0.5;
        node.reset();
        assert_eq!(node, Node::new());
    }
}
