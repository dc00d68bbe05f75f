use std::cell::{Cell, OnceCell, RefCell};
use std::collections::HashSet;
use std::fmt;
use std::ops::{Add, Mul, Sub};
use std::rc::Rc;

use tracing::trace;

use crate::error::{Result, TreeError};
use crate::kernel::{Primitive, Solid};
use crate::math::{Point3, Vector3};

/// The boolean operations that combine two shadow solids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    Union,
    Intersection,
    Difference,
}

impl fmt::Display for BooleanOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Union => "union",
            Self::Intersection => "intersection",
            Self::Difference => "difference",
        })
    }
}

/// Which operand of a boolean operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandSide {
    Left,
    Right,
}

impl fmt::Display for OperandSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Left => "left",
            Self::Right => "right",
        })
    }
}

/// Who is responsible for releasing a node's kernel solid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// The node releases its kernel solid when dropped.
    OwnedBySelf,
    /// The geometry registry holds the kernel solid.
    OwnedByRegistry,
}

/// How a shadow node was built.
///
/// Operands are optional only so that a combination over a missing operand
/// can be represented; such a node is rejected by [`ShadowSolid::validate`].
#[derive(Debug)]
pub enum Operation {
    /// Wraps a single primitive.
    Terminal(Rc<Primitive>),
    Union {
        left: Option<ShadowSolid>,
        right: Option<ShadowSolid>,
    },
    Intersection {
        left: Option<ShadowSolid>,
        right: Option<ShadowSolid>,
    },
    /// `minuend - subtrahend`.
    Difference {
        minuend: Option<ShadowSolid>,
        subtrahend: Option<ShadowSolid>,
    },
}

impl Operation {
    /// Returns the boolean operation, or `None` for a terminal.
    #[must_use]
    pub fn boolean_op(&self) -> Option<BooleanOp> {
        match self {
            Self::Terminal(_) => None,
            Self::Union { .. } => Some(BooleanOp::Union),
            Self::Intersection { .. } => Some(BooleanOp::Intersection),
            Self::Difference { .. } => Some(BooleanOp::Difference),
        }
    }

    /// Returns the left and right operands. Both are `None` for a terminal.
    #[must_use]
    pub fn operands(&self) -> (Option<&ShadowSolid>, Option<&ShadowSolid>) {
        match self {
            Self::Terminal(_) => (None, None),
            Self::Union { left, right } | Self::Intersection { left, right } => {
                (left.as_ref(), right.as_ref())
            }
            Self::Difference {
                minuend,
                subtrahend,
            } => (minuend.as_ref(), subtrahend.as_ref()),
        }
    }
}

#[derive(Debug)]
pub(crate) struct Node {
    pub(crate) operation: Operation,
    pub(crate) solid: Rc<Solid>,
    pub(crate) boundary: OnceCell<i32>,
    pub(crate) material: RefCell<Option<String>>,
    ownership: Cell<Ownership>,
}

impl Drop for Node {
    fn drop(&mut self) {
        if self.ownership.get() == Ownership::OwnedBySelf {
            trace!(operation = ?self.operation.boolean_op(), "releasing unregistered kernel solid");
        }
    }
}

/// A node of the shadow CSG tree.
///
/// Cloning is cheap and shares the node, so one sub-tree can be an operand
/// of several combinations. The structure is fixed at construction; only
/// the boundary condition, material and ownership change afterwards.
///
/// Dropping the last handle to a tree, tagging it and printing it all recurse
/// through the nodes, so very deep chains need a correspondingly deep stack.
#[derive(Debug, Clone)]
pub struct ShadowSolid(pub(crate) Rc<Node>);

impl ShadowSolid {
    fn from_parts(operation: Operation, solid: Solid) -> Self {
        Self(Rc::new(Node {
            operation,
            solid: Rc::new(solid),
            boundary: OnceCell::new(),
            material: RefCell::new(None),
            ownership: Cell::new(Ownership::OwnedBySelf),
        }))
    }

    /// Wraps an existing primitive in a terminal node.
    #[must_use]
    pub fn terminal(primitive: Rc<Primitive>) -> Self {
        let solid = Solid::Primitive(Rc::clone(&primitive));
        Self::from_parts(Operation::Terminal(primitive), solid)
    }

    /// Creates a solid ball.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is non-positive.
    pub fn sphere(center: Point3, radius: f64) -> Result<Self> {
        Ok(Self::terminal(Rc::new(Primitive::sphere(center, radius)?)))
    }

    /// Creates the half-space behind a plane; `normal` points outwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the normal is zero-length.
    pub fn plane(point: Point3, normal: Vector3) -> Result<Self> {
        Ok(Self::terminal(Rc::new(Primitive::half_space(point, normal)?)))
    }

    /// Creates an infinite cylinder with its axis through `a` and `b`.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is non-positive or `a == b`.
    pub fn cylinder(a: Point3, b: Point3, radius: f64) -> Result<Self> {
        Ok(Self::terminal(Rc::new(Primitive::cylinder(a, b, radius)?)))
    }

    /// Creates an axis-aligned box from its two corners.
    ///
    /// # Errors
    ///
    /// Returns an error unless `p1` is strictly below `p2` on every axis.
    pub fn ortho_brick(p1: Point3, p2: Point3) -> Result<Self> {
        Ok(Self::terminal(Rc::new(Primitive::ortho_brick(p1, p2)?)))
    }

    /// Combines two possibly missing operands.
    ///
    /// The kernel solid is built immediately. A missing operand becomes
    /// [`Solid::Unresolved`] and the node fails validation at registration.
    #[must_use]
    pub fn combine(op: BooleanOp, left: Option<&Self>, right: Option<&Self>) -> Self {
        let operand_solid = |operand: Option<&Self>| {
            operand.map_or_else(|| Rc::new(Solid::Unresolved), |s| Rc::clone(&s.0.solid))
        };
        let a = operand_solid(left);
        let b = operand_solid(right);
        let left = left.cloned();
        let right = right.cloned();

        match op {
            BooleanOp::Union => Self::from_parts(Operation::Union { left, right }, Solid::union(a, b)),
            BooleanOp::Intersection => Self::from_parts(
                Operation::Intersection { left, right },
                Solid::intersection(a, b),
            ),
            BooleanOp::Difference => Self::from_parts(
                Operation::Difference {
                    minuend: left,
                    subtrahend: right,
                },
                Solid::difference(a, b),
            ),
        }
    }

    /// Returns the union of `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self::combine(BooleanOp::Union, Some(self), Some(other))
    }

    /// Returns the intersection of `self` and `other`.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        Self::combine(BooleanOp::Intersection, Some(self), Some(other))
    }

    /// Returns `self` with `other` removed.
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        Self::combine(BooleanOp::Difference, Some(self), Some(other))
    }

    /// Returns how this node was built.
    #[must_use]
    pub fn operation(&self) -> &Operation {
        &self.0.operation
    }

    /// Returns the kernel solid backing this node.
    #[must_use]
    pub fn kernel_solid(&self) -> &Rc<Solid> {
        &self.0.solid
    }

    /// Returns who is responsible for the kernel solid.
    #[must_use]
    pub fn ownership(&self) -> Ownership {
        self.0.ownership.get()
    }

    /// Returns `true` until the node has been handed to a registry.
    #[must_use]
    pub fn owns_kernel_solid(&self) -> bool {
        self.ownership() == Ownership::OwnedBySelf
    }

    /// Returns `true` if both handles refer to the same node.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn hand_over_to_registry(&self) {
        self.0.ownership.set(Ownership::OwnedByRegistry);
    }

    /// Returns every distinct node of the sub-tree in depth-first pre-order,
    /// left operand before right. Shared nodes appear once.
    #[must_use]
    pub fn distinct_nodes(&self) -> Vec<Self> {
        let mut seen = HashSet::new();
        let mut order = Vec::new();
        let mut stack = vec![self.clone()];
        while let Some(node) = stack.pop() {
            if !seen.insert(Rc::as_ptr(&node.0)) {
                continue;
            }
            let (left, right) = node.operation().operands();
            stack.extend(right.cloned());
            stack.extend(left.cloned());
            order.push(node);
        }
        order
    }

    /// Checks that every boolean node of the sub-tree has both operands.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::MissingOperand`] for the first incomplete node
    /// in depth-first order.
    pub fn validate(&self) -> std::result::Result<(), TreeError> {
        for node in self.distinct_nodes() {
            let Some(operation) = node.operation().boolean_op() else {
                continue;
            };
            match node.operation().operands() {
                (None, _) => {
                    return Err(TreeError::MissingOperand {
                        operation,
                        side: OperandSide::Left,
                    })
                }
                (_, None) => {
                    return Err(TreeError::MissingOperand {
                        operation,
                        side: OperandSide::Right,
                    })
                }
                _ => {}
            }
        }
        Ok(())
    }
}

impl fmt::Display for ShadowSolid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.solid, f)
    }
}

macro_rules! impl_boolean_operator {
    ($trait:ident, $method:ident, $combinator:ident) => {
        impl $trait<&ShadowSolid> for &ShadowSolid {
            type Output = ShadowSolid;

            fn $method(self, rhs: &ShadowSolid) -> ShadowSolid {
                self.$combinator(rhs)
            }
        }

        impl $trait for ShadowSolid {
            type Output = ShadowSolid;

            fn $method(self, rhs: ShadowSolid) -> ShadowSolid {
                self.$combinator(&rhs)
            }
        }
    };
}

impl_boolean_operator!(Add, add, union);
impl_boolean_operator!(Mul, mul, intersection);
impl_boolean_operator!(Sub, sub, difference);
