use std::fmt;

use crate::error::{GeometryError, Result};
use crate::math::{write_xyz, Point3, Vector3, TOLERANCE};

/// An infinite cylindrical surface in 3D space.
///
/// The axis passes through the two points `a` and `b`; the surface extends
/// past both of them.
#[derive(Debug, Clone)]
pub struct Cylinder {
    a: Point3,
    b: Point3,
    radius: f64,
}

impl Cylinder {
    /// Creates a new cylinder.
    ///
    /// # Arguments
    ///
    /// * `a` - A point on the axis
    /// * `b` - A second point on the axis (must differ from `a`)
    /// * `radius` - Radius (must be positive)
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is non-positive or the axis points
    /// coincide.
    pub fn new(a: Point3, b: Point3, radius: f64) -> Result<Self> {
        if radius < TOLERANCE {
            return Err(
                GeometryError::Degenerate("cylinder radius must be positive".into()).into(),
            );
        }
        if (b - a).norm() < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(Self { a, b, radius })
    }

    /// Returns the first axis point.
    #[must_use]
    pub fn a(&self) -> &Point3 {
        &self.a
    }

    /// Returns the second axis point.
    #[must_use]
    pub fn b(&self) -> &Point3 {
        &self.b
    }

    /// Returns the radius.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Returns the unit axis direction from `a` towards `b`.
    #[must_use]
    pub fn axis(&self) -> Vector3 {
        (self.b - self.a).normalize()
    }
}

impl fmt::Display for Cylinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cylinder(a=")?;
        write_xyz(f, &self.a.coords)?;
        write!(f, ", b=")?;
        write_xyz(f, &self.b.coords)?;
        write!(f, ", r={})", self.radius)
    }
}
