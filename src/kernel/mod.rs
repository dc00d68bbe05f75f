//! Minimal geometry kernel consumed by the shadow solid tree.

pub mod primitive;
pub mod registry;
pub mod solid;

pub use primitive::{BoundarySurface, Primitive, PrimitiveKind};
pub use registry::{GeometryRegistry, RegisteredSurface, SurfaceId, TopLevelObject};
pub use solid::Solid;
