use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use crate::error::TreeError;

use super::primitive::Primitive;

/// A kernel-level solid: a boolean expression over primitives.
///
/// Difference has no variant of its own. `A - B` is expressed as
/// `Intersection(A, Complement(B))`, see [`Solid::difference`].
#[derive(Debug, Clone)]
pub enum Solid {
    /// A solid taken directly from a primitive.
    Primitive(Rc<Primitive>),
    /// Points in either operand.
    Union(Rc<Solid>, Rc<Solid>),
    /// Points in both operands.
    Intersection(Rc<Solid>, Rc<Solid>),
    /// Points outside the operand.
    Complement(Rc<Solid>),
    /// Placeholder for an operand that was never supplied.
    Unresolved,
}

impl Solid {
    /// Builds the union of two solids.
    #[must_use]
    pub fn union(a: Rc<Solid>, b: Rc<Solid>) -> Self {
        Self::Union(a, b)
    }

    /// Builds the intersection of two solids.
    #[must_use]
    pub fn intersection(a: Rc<Solid>, b: Rc<Solid>) -> Self {
        Self::Intersection(a, b)
    }

    /// Builds `minuend - subtrahend` as the intersection of the minuend with
    /// the complement of the subtrahend.
    #[must_use]
    pub fn difference(minuend: Rc<Solid>, subtrahend: Rc<Solid>) -> Self {
        Self::Intersection(minuend, Rc::new(Self::Complement(subtrahend)))
    }

    /// Returns the primitive if this is a terminal solid.
    #[must_use]
    pub fn primitive(&self) -> Option<&Rc<Primitive>> {
        match self {
            Self::Primitive(primitive) => Some(primitive),
            _ => None,
        }
    }

    /// Checks that every operand of the expression is resolved.
    ///
    /// Shared sub-expressions are checked once.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::UnresolvedOperand`] if any operand is
    /// [`Solid::Unresolved`].
    pub fn validate(&self) -> Result<(), TreeError> {
        let mut seen = HashSet::new();
        let mut stack = vec![self];
        while let Some(solid) = stack.pop() {
            if !seen.insert(std::ptr::from_ref(solid)) {
                continue;
            }
            match solid {
                Self::Primitive(_) => {}
                Self::Union(a, b) | Self::Intersection(a, b) => {
                    stack.extend([b.as_ref(), a.as_ref()]);
                }
                Self::Complement(a) => stack.push(a.as_ref()),
                Self::Unresolved => return Err(TreeError::UnresolvedOperand),
            }
        }
        Ok(())
    }
}

/// Writes the expression in full, so shared sub-expressions are repeated and
/// recursion depth follows the depth of the expression.
impl fmt::Display for Solid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(primitive) => fmt::Display::fmt(primitive, f),
            Self::Union(a, b) => write!(f, "({a} OR {b})"),
            Self::Intersection(a, b) => write!(f, "({a} AND {b})"),
            Self::Complement(a) => write!(f, "NOT {a}"),
            Self::Unresolved => write!(f, "<unresolved>"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::{Point3, Vector3};

    fn ball() -> Rc<Solid> {
        Rc::new(Solid::Primitive(Rc::new(
            Primitive::sphere(Point3::origin(), 1.0).unwrap(),
        )))
    }

    fn floor() -> Rc<Solid> {
        Rc::new(Solid::Primitive(Rc::new(
            Primitive::half_space(Point3::origin(), Vector3::z()).unwrap(),
        )))
    }

    #[test]
    fn difference_is_intersection_with_complement() {
        let d = Solid::difference(ball(), floor());
        let Solid::Intersection(_, rhs) = &d else {
            panic!("expected intersection");
        };
        assert!(matches!(rhs.as_ref(), Solid::Complement(_)));
    }

    #[test]
    fn display_nests_operators() {
        let s = Solid::union(ball(), Rc::new(Solid::difference(ball(), floor())));
        assert_eq!(
            s.to_string(),
            "(sphere(c=(0, 0, 0), r=1) OR (sphere(c=(0, 0, 0), r=1) AND NOT plane(p=(0, 0, 0), n=(0, 0, 1))))"
        );
    }

    #[test]
    fn validate_rejects_nested_unresolved() {
        let ok = Solid::intersection(ball(), floor());
        assert!(ok.validate().is_ok());

        let bad = Solid::union(ball(), Rc::new(Solid::difference(floor(), Rc::new(Solid::Unresolved))));
        assert_eq!(bad.validate(), Err(TreeError::UnresolvedOperand));
    }

    #[test]
    fn validate_visits_shared_operands_once() {
        let mut s = ball();
        for _ in 0..40 {
            s = Rc::new(Solid::union(Rc::clone(&s), Rc::clone(&s)));
        }
        assert!(s.validate().is_ok());

        let bad = Solid::intersection(s, Rc::new(Solid::Unresolved));
        assert_eq!(bad.validate(), Err(TreeError::UnresolvedOperand));
    }

    #[test]
    fn primitive_accessor() {
        assert!(ball().primitive().is_some());
        assert!(Solid::Complement(ball()).primitive().is_none());
    }
}
