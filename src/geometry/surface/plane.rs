use std::fmt;

use crate::error::{GeometryError, Result};
use crate::math::{write_xyz, Point3, Vector3, TOLERANCE};

/// An infinite plane in 3D space.
///
/// Defined by a point on the plane and a unit normal. As the boundary of a
/// half-space primitive the normal points away from the material.
#[derive(Debug, Clone)]
pub struct Plane {
    point: Point3,
    normal: Vector3,
}

impl Plane {
    /// Creates a plane through `point` with the given normal.
    ///
    /// The normal is normalized.
    ///
    /// # Errors
    ///
    /// Returns an error if the normal vector is zero-length.
    pub fn new(point: Point3, normal: Vector3) -> Result<Self> {
        let len = normal.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(Self {
            point,
            normal: normal / len,
        })
    }

    /// Returns the reference point of the plane.
    #[must_use]
    pub fn point(&self) -> &Point3 {
        &self.point
    }

    /// Returns the unit normal of the plane.
    #[must_use]
    pub fn normal(&self) -> &Vector3 {
        &self.normal
    }
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "plane(p=")?;
        write_xyz(f, &self.point.coords)?;
        write!(f, ", n=")?;
        write_xyz(f, &self.normal)?;
        write!(f, ")")
    }
}
