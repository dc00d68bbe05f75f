use std::collections::HashMap;
use std::rc::Rc;

use slotmap::SlotMap;
use tracing::debug;

use crate::error::{RegistryError, Result};

use super::primitive::{BoundarySurface, Primitive};
use super::solid::Solid;

slotmap::new_key_type! {
    /// Unique identifier for a surface in the geometry registry.
    pub struct SurfaceId;
}

/// A surface registered with the geometry, referenced through its primitive.
#[derive(Debug, Clone)]
pub struct RegisteredSurface {
    primitive: Rc<Primitive>,
    index: usize,
}

impl RegisteredSurface {
    /// Returns the primitive owning this surface.
    #[must_use]
    pub fn primitive(&self) -> &Rc<Primitive> {
        &self.primitive
    }

    /// Returns the index of this surface within its primitive.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the surface together with its boundary tag.
    #[must_use]
    pub fn surface(&self) -> &BoundarySurface {
        &self.primitive.surfaces()[self.index]
    }
}

/// An independent, material-tagged region of the model.
#[derive(Debug, Clone)]
pub struct TopLevelObject {
    solid: Rc<Solid>,
    material: Option<String>,
}

impl TopLevelObject {
    /// Returns the solid describing this region.
    #[must_use]
    pub fn solid(&self) -> &Rc<Solid> {
        &self.solid
    }

    /// Returns the material name, if one was assigned.
    #[must_use]
    pub fn material(&self) -> Option<&str> {
        self.material.as_deref()
    }

    /// Assigns the material. An empty name clears it.
    pub fn set_material(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.material = (!name.is_empty()).then_some(name);
    }
}

/// The kernel's geometry: a flat collection of primitive surfaces plus the
/// list of top-level objects built from them.
///
/// Solids and primitives added here are kept alive by the registry for as
/// long as it exists.
#[derive(Debug, Default)]
pub struct GeometryRegistry {
    surfaces: SlotMap<SurfaceId, RegisteredSurface>,
    by_primitive: HashMap<*const Primitive, Vec<SurfaceId>>,
    top_level: Vec<TopLevelObject>,
}

impl GeometryRegistry {
    /// Creates a new, empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Surface operations ---

    /// Registers every surface of `primitive` and returns how many were
    /// added.
    ///
    /// Registering a primitive that is already present adds nothing.
    pub fn add_surfaces(&mut self, primitive: &Rc<Primitive>) -> usize {
        let key = Rc::as_ptr(primitive);
        if self.by_primitive.contains_key(&key) {
            return 0;
        }

        let ids: Vec<SurfaceId> = (0..primitive.surface_count())
            .map(|index| {
                self.surfaces.insert(RegisteredSurface {
                    primitive: Rc::clone(primitive),
                    index,
                })
            })
            .collect();
        let added = ids.len();
        self.by_primitive.insert(key, ids);
        debug!(surfaces = added, primitive = %primitive, "registered primitive surfaces");
        added
    }

    /// Returns the surface ids registered for `primitive`.
    #[must_use]
    pub fn surfaces_of(&self, primitive: &Rc<Primitive>) -> &[SurfaceId] {
        self.by_primitive
            .get(&Rc::as_ptr(primitive))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns the registered surface with the given id.
    #[must_use]
    pub fn surface(&self, id: SurfaceId) -> Option<&RegisteredSurface> {
        self.surfaces.get(id)
    }

    /// Iterates over all registered surfaces.
    pub fn surfaces(&self) -> impl Iterator<Item = (SurfaceId, &RegisteredSurface)> {
        self.surfaces.iter()
    }

    /// Returns the number of registered surfaces.
    #[must_use]
    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    // --- Top-level object operations ---

    /// Adds `solid` as a new top-level object and returns its index.
    ///
    /// # Errors
    ///
    /// Returns an error if the solid has an unresolved operand. Nothing is
    /// added in that case.
    pub fn add_top_level_object(&mut self, solid: Rc<Solid>) -> Result<usize> {
        solid.validate()?;
        self.top_level.push(TopLevelObject {
            solid,
            material: None,
        });
        Ok(self.top_level.len() - 1)
    }

    /// Returns the top-level object at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if no object has that index.
    pub fn top_level_object(&self, index: usize) -> Result<&TopLevelObject> {
        self.top_level
            .get(index)
            .ok_or_else(|| RegistryError::TopLevelObjectNotFound(index).into())
    }

    /// Returns a mutable reference to the top-level object at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if no object has that index.
    pub fn top_level_object_mut(&mut self, index: usize) -> Result<&mut TopLevelObject> {
        self.top_level
            .get_mut(index)
            .ok_or_else(|| RegistryError::TopLevelObjectNotFound(index).into())
    }

    /// Iterates over the top-level objects in registration order.
    pub fn top_level_objects(&self) -> impl Iterator<Item = &TopLevelObject> {
        self.top_level.iter()
    }

    /// Returns the number of top-level objects.
    #[must_use]
    pub fn top_level_object_count(&self) -> usize {
        self.top_level.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{CsgError, TreeError};
    use crate::math::Point3;

    fn brick() -> Rc<Primitive> {
        Rc::new(
            Primitive::ortho_brick(Point3::origin(), Point3::new(1.0, 2.0, 3.0)).unwrap(),
        )
    }

    #[test]
    fn add_surfaces_registers_each_surface() {
        let mut registry = GeometryRegistry::new();
        let prim = brick();
        assert_eq!(registry.add_surfaces(&prim), 6);
        assert_eq!(registry.surface_count(), 6);

        let ids = registry.surfaces_of(&prim);
        assert_eq!(ids.len(), 6);
        let third = registry.surface(ids[2]).unwrap();
        assert_eq!(third.index(), 2);
        assert!(Rc::ptr_eq(third.primitive(), &prim));
    }

    #[test]
    fn duplicate_registration_is_ignored() {
        let mut registry = GeometryRegistry::new();
        let prim = brick();
        registry.add_surfaces(&prim);
        assert_eq!(registry.add_surfaces(&Rc::clone(&prim)), 0);
        assert_eq!(registry.surface_count(), 6);
    }

    #[test]
    fn distinct_but_equal_primitives_both_register() {
        let mut registry = GeometryRegistry::new();
        registry.add_surfaces(&brick());
        registry.add_surfaces(&brick());
        assert_eq!(registry.surface_count(), 12);
    }

    #[test]
    fn registered_surface_sees_later_tags() {
        let mut registry = GeometryRegistry::new();
        let prim = brick();
        registry.add_surfaces(&prim);
        prim.surface(0).unwrap().set_boundary_tag(3);

        let id = registry.surfaces_of(&prim)[0];
        assert_eq!(registry.surface(id).unwrap().surface().boundary_tag(), Some(3));
    }

    #[test]
    fn top_level_objects_are_indexed_in_order() {
        let mut registry = GeometryRegistry::new();
        let solid = Rc::new(Solid::Primitive(brick()));
        assert_eq!(registry.add_top_level_object(Rc::clone(&solid)).unwrap(), 0);
        assert_eq!(registry.add_top_level_object(solid).unwrap(), 1);
        assert_eq!(registry.top_level_object_count(), 2);

        registry.top_level_object_mut(1).unwrap().set_material("copper");
        let materials: Vec<_> = registry.top_level_objects().map(TopLevelObject::material).collect();
        assert_eq!(materials, vec![None, Some("copper")]);
    }

    #[test]
    fn malformed_solid_is_rejected_without_side_effects() {
        let mut registry = GeometryRegistry::new();
        let bad = Rc::new(Solid::difference(
            Rc::new(Solid::Primitive(brick())),
            Rc::new(Solid::Unresolved),
        ));
        let result = registry.add_top_level_object(bad);
        assert!(matches!(
            result,
            Err(CsgError::Tree(TreeError::UnresolvedOperand))
        ));
        assert_eq!(registry.top_level_object_count(), 0);
    }

    #[test]
    fn missing_top_level_object() {
        let registry = GeometryRegistry::new();
        assert!(matches!(
            registry.top_level_object(3),
            Err(CsgError::Registry(RegistryError::TopLevelObjectNotFound(3)))
        ));
    }

    #[test]
    fn empty_material_clears() {
        let mut registry = GeometryRegistry::new();
        let index = registry
            .add_top_level_object(Rc::new(Solid::Primitive(brick())))
            .unwrap();
        let object = registry.top_level_object_mut(index).unwrap();
        object.set_material("steel");
        object.set_material("");
        assert_eq!(object.material(), None);
    }
}
