use thiserror::Error;

use crate::shadow::{BooleanOp, OperandSide};

/// Top-level error type for shadow CSG construction and registration.
#[derive(Debug, Error)]
pub enum CsgError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Errors raised by the kernel while constructing primitives.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors for malformed shadow trees, detected at registration time.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("{operation} is missing its {side} operand")]
    MissingOperand {
        operation: BooleanOp,
        side: OperandSide,
    },

    #[error("kernel solid contains an unresolved operand")]
    UnresolvedOperand,
}

/// Errors related to the geometry registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("top-level object {0} not found")]
    TopLevelObjectNotFound(usize),
}

/// Convenience type alias for results using [`CsgError`].
pub type Result<T> = std::result::Result<T, CsgError>;
