pub mod error;
pub mod geometry;
pub mod kernel;
pub mod math;
pub mod shadow;

pub use error::{CsgError, Result};
pub use kernel::GeometryRegistry;
pub use shadow::{BooleanOp, BuildGeometry, RegisterSolid, ShadowSolid};
