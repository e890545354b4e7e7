//! Error types for the transfer matrix solver

use thiserror::Error;

/// Main error type for solver operations
#[derive(Error, Debug)]
pub enum TmmError {
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Invalid material: {0}")]
    InvalidMaterial(String),

    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    #[error("Position {z} lies outside the element span [{start}, {end}]")]
    OutOfSpan { z: f64, start: f64, end: f64 },

    #[error("Element {element} uses Fourier mode {found}, assembly requested mode {expected}")]
    ModeMismatch {
        element: usize,
        expected: u32,
        found: u32,
    },

    #[error("Incompatible nodes: {0}")]
    IncompatibleNodes(String),

    #[error("Not supported: {0}")]
    Unsupported(String),

    #[error("Assembly not assembled - run assemble() first")]
    NotAssembled,

    #[error("System not solved - run solve() first")]
    NotSolved,

    #[error("Singular system matrix: zero pivot at row {pivot}")]
    SingularMatrix { pivot: usize },

    #[error("Element {element}: transfer matrix displacement/force block is singular")]
    SingularTransferBlock { element: usize },

    #[error("Element {element}: transfer matrix contains non-finite values")]
    NonFinite { element: usize },

    #[error("Linear system is {rows}x{cols} with a right-hand side of length {rhs}")]
    DimensionMismatch { rows: usize, cols: usize, rhs: usize },

    #[error("DOF index {dof} out of range (system has {count} DOFs)")]
    DofOutOfRange { dof: usize, count: usize },

    #[error("Element {0} not found in assembly")]
    ElementNotFound(usize),

    #[error("Node {0} not found in assembly")]
    NodeNotFound(usize),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for solver operations
pub type TmmResult<T> = Result<T, TmmError>;
