use std::rc::Rc;

use tracing::debug;

use crate::error::Result;
use crate::kernel::GeometryRegistry;

use super::node::{Operation, ShadowSolid};

/// Registers one finished shadow tree as a top-level object of an existing
/// geometry.
///
/// The root handle is consumed: once registered, the tree belongs to the
/// registry.
pub struct RegisterSolid {
    root: ShadowSolid,
}

impl RegisterSolid {
    /// Creates a new `RegisterSolid` operation.
    #[must_use]
    pub fn new(root: ShadowSolid) -> Self {
        Self { root }
    }

    /// Executes the registration and returns the index of the new top-level
    /// object.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree is malformed. The registry is left
    /// untouched in that case.
    pub fn execute(self, registry: &mut GeometryRegistry) -> Result<usize> {
        self.root.validate()?;
        register_validated(&self.root, registry)
    }
}

/// Builds a new geometry from a collection of finished shadow trees, one
/// top-level object per root, in order.
pub struct BuildGeometry {
    roots: Vec<ShadowSolid>,
}

impl BuildGeometry {
    /// Creates a new `BuildGeometry` operation.
    #[must_use]
    pub fn new(roots: impl IntoIterator<Item = ShadowSolid>) -> Self {
        Self {
            roots: roots.into_iter().collect(),
        }
    }

    /// Executes the build, returning the populated registry.
    ///
    /// Every root is validated before any of them is registered.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the trees is malformed.
    pub fn execute(self) -> Result<GeometryRegistry> {
        for root in &self.roots {
            root.validate()?;
        }
        let mut registry = GeometryRegistry::new();
        for root in &self.roots {
            register_validated(root, &mut registry)?;
        }
        debug!(
            objects = registry.top_level_object_count(),
            surfaces = registry.surface_count(),
            "built geometry"
        );
        Ok(registry)
    }
}

/// Walks a validated tree once: registers the surfaces of every terminal,
/// hands every node over to the registry, then adds the root as a top-level
/// object tagged with the root's material at this moment.
///
/// The kernel solid is checked before anything is registered, so a failure
/// leaves both the registry and the nodes' ownership unchanged.
fn register_validated(root: &ShadowSolid, registry: &mut GeometryRegistry) -> Result<usize> {
    root.kernel_solid().validate()?;

    let mut surfaces = 0;
    for node in root.distinct_nodes() {
        if let Operation::Terminal(primitive) = node.operation() {
            surfaces += registry.add_surfaces(primitive);
        }
        node.hand_over_to_registry();
    }

    let material = root.material();
    let index = registry.add_top_level_object(Rc::clone(root.kernel_solid()))?;
    if let Some(name) = &material {
        registry.top_level_object_mut(index)?.set_material(name.as_str());
    }
    debug!(index, surfaces, material = ?material, "registered top-level object");
    Ok(index)
}
