//! Boundary-condition and material propagation over the shadow tree.
//!
//! Boundary conditions are pushed down eagerly with first-write-wins
//! semantics. Materials stay where they were set and are resolved on demand.

use std::collections::HashMap;
use std::rc::Rc;

use tracing::debug;

use super::node::{Node, Operation, ShadowSolid};

impl ShadowSolid {
    /// Tags this sub-tree with a boundary condition.
    ///
    /// The first tag assigned to a node wins; later calls on an already
    /// tagged node do nothing, whatever the tag. A newly tagged node passes
    /// the tag on to its operands, and a terminal applies it to every
    /// surface of its primitive.
    ///
    /// Recurses once per newly tagged node, so stack use grows with the
    /// depth of the tree.
    pub fn set_boundary_condition(&self, tag: i32) -> &Self {
        if self.0.boundary.set(tag).is_err() {
            return self;
        }

        let (left, right) = self.operation().operands();
        for operand in [left, right].into_iter().flatten() {
            operand.set_boundary_condition(tag);
        }

        if let Operation::Terminal(primitive) = self.operation() {
            for surface in primitive.surfaces() {
                surface.set_boundary_tag(tag);
            }
            debug!(
                surfaces = primitive.surface_count(),
                bc = tag,
                "set boundary condition on primitive surfaces"
            );
        }
        self
    }

    /// Returns the boundary condition assigned to this node, if any.
    #[must_use]
    pub fn boundary_condition(&self) -> Option<i32> {
        self.0.boundary.get().copied()
    }

    /// Sets this node's own material. Operands are not touched.
    ///
    /// An empty name is ignored, so a material once set is never cleared.
    pub fn set_material(&self, name: impl Into<String>) -> &Self {
        let name = name.into();
        if !name.is_empty() {
            *self.0.material.borrow_mut() = Some(name);
        }
        self
    }

    /// Returns the material explicitly set on this node.
    #[must_use]
    pub fn own_material(&self) -> Option<String> {
        self.0.material.borrow().clone()
    }

    /// Resolves the material of this node.
    ///
    /// The node's own material wins, then the resolved material of the left
    /// operand, then that of the right operand. `None` if nothing in the
    /// sub-tree has a material.
    ///
    /// Each distinct node is resolved once, so shared sub-trees cost no more
    /// than their size.
    #[must_use]
    pub fn material(&self) -> Option<String> {
        let mut resolved: HashMap<*const Node, Option<String>> = HashMap::new();
        let mut stack = vec![(self.clone(), false)];
        while let Some((node, expanded)) = stack.pop() {
            let key = Rc::as_ptr(&node.0);
            if resolved.contains_key(&key) {
                continue;
            }
            if let Some(own) = node.own_material() {
                resolved.insert(key, Some(own));
                continue;
            }

            let (left, right) = node.operation().operands();
            if expanded {
                let inherited = [left, right]
                    .into_iter()
                    .flatten()
                    .find_map(|operand| resolved.get(&Rc::as_ptr(&operand.0)).cloned().flatten());
                resolved.insert(key, inherited);
            } else {
                let operands: Vec<ShadowSolid> = [right, left].into_iter().flatten().cloned().collect();
                stack.push((node, true));
                stack.extend(operands.into_iter().map(|operand| (operand, false)));
            }
        }
        resolved.remove(&Rc::as_ptr(&self.0)).flatten()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::kernel::Primitive;
    use crate::math::{Point3, Vector3};
    use crate::shadow::{BooleanOp, ShadowSolid};

    fn ball() -> ShadowSolid {
        ShadowSolid::sphere(Point3::origin(), 1.0).unwrap()
    }

    fn cube() -> ShadowSolid {
        ShadowSolid::ortho_brick(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0))
            .unwrap()
    }

    fn surface_tags(solid: &ShadowSolid) -> Vec<Option<i32>> {
        let primitive: &Primitive = solid.kernel_solid().primitive().unwrap();
        primitive.surfaces().iter().map(|s| s.boundary_tag()).collect()
    }

    #[test]
    fn boundary_condition_reaches_every_primitive_surface() {
        let (sphere, brick) = (ball(), cube());
        let u = &sphere + &brick;
        u.set_boundary_condition(7);

        assert_eq!(u.boundary_condition(), Some(7));
        assert_eq!(surface_tags(&sphere), vec![Some(7)]);
        assert_eq!(surface_tags(&brick), vec![Some(7); 6]);
    }

    #[test]
    fn first_boundary_condition_wins() {
        let s = ball();
        s.set_boundary_condition(1).set_boundary_condition(2);
        assert_eq!(s.boundary_condition(), Some(1));
        assert_eq!(surface_tags(&s), vec![Some(1)]);
    }

    #[test]
    fn tagged_operand_keeps_its_tag_under_later_parent_tag() {
        let (inner, outer) = (ball(), cube());
        inner.set_boundary_condition(3);
        let u = inner.union(&outer);
        u.set_boundary_condition(5);

        assert_eq!(inner.boundary_condition(), Some(3));
        assert_eq!(surface_tags(&inner), vec![Some(3)]);
        assert_eq!(surface_tags(&outer), vec![Some(5); 6]);
    }

    #[test]
    fn subtrahend_is_tagged_too() {
        let (a, b) = (cube(), ball());
        let d = &a - &b;
        d.set_boundary_condition(2);
        assert_eq!(b.boundary_condition(), Some(2));
        assert_eq!(surface_tags(&b), vec![Some(2)]);
    }

    #[test]
    fn untagged_by_default() {
        assert_eq!(ball().boundary_condition(), None);
        assert_eq!(surface_tags(&ball()), vec![None]);
    }

    #[test]
    fn terminal_material_is_stable() {
        let t = ball();
        t.set_material("copper");
        let _tree = (&t + &cube()).set_material("air").clone() * cube();
        assert_eq!(t.material().as_deref(), Some("copper"));
        assert_eq!(t.material().as_deref(), Some("copper"));
    }

    #[test]
    fn composite_material_falls_back_left_then_right() {
        let (a, b) = (ball(), cube());
        let u = a.union(&b);
        assert_eq!(u.material(), None);

        b.set_material("iron");
        assert_eq!(u.material().as_deref(), Some("iron"));

        a.set_material("steel");
        assert_eq!(u.material().as_deref(), Some("steel"));

        u.set_material("glass");
        assert_eq!(u.material().as_deref(), Some("glass"));
        assert_eq!(a.material().as_deref(), Some("steel"));
    }

    #[test]
    fn difference_inherits_minuend_material() {
        let a = ball();
        a.set_material("steel");
        let b = ShadowSolid::plane(Point3::origin(), Vector3::z()).unwrap();
        let c = &a - &b;
        assert_eq!(c.material().as_deref(), Some("steel"));
    }

    #[test]
    fn material_resolves_through_missing_operand() {
        let b = cube();
        b.set_material("wood");
        let broken = ShadowSolid::combine(BooleanOp::Intersection, None, Some(&b));
        assert_eq!(broken.material().as_deref(), Some("wood"));
    }

    #[test]
    fn material_of_deeply_shared_dag_resolves_quickly() {
        let leaf = cube();
        let mut x = leaf.clone();
        for _ in 0..40 {
            x = &x + &x;
        }
        assert_eq!(x.material(), None);

        leaf.set_material("lead");
        assert_eq!(x.material().as_deref(), Some("lead"));
    }

    #[test]
    fn empty_material_is_ignored() {
        let s = ball();
        s.set_material("steel").set_material("");
        assert_eq!(s.own_material().as_deref(), Some("steel"));
    }
}
