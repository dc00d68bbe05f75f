//! The shadow solid tree: a DAG of boolean combinations over primitives that
//! is built without touching the geometry registry and flattened into it
//! once finished.

mod attributes;
mod flatten;
mod node;

pub use flatten::{BuildGeometry, RegisterSolid};
pub use node::{BooleanOp, OperandSide, Operation, Ownership, ShadowSolid};
