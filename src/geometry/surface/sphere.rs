use std::fmt;

use crate::error::{GeometryError, Result};
use crate::math::{write_xyz, Point3, TOLERANCE};

/// A spherical surface in 3D space.
#[derive(Debug, Clone)]
pub struct Sphere {
    center: Point3,
    radius: f64,
}

impl Sphere {
    /// Creates a new sphere.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is non-positive.
    pub fn new(center: Point3, radius: f64) -> Result<Self> {
        if radius < TOLERANCE {
            return Err(
                GeometryError::Degenerate("sphere radius must be positive".into()).into(),
            );
        }
        Ok(Self { center, radius })
    }

    /// Returns the center of the sphere.
    #[must_use]
    pub fn center(&self) -> &Point3 {
        &self.center
    }

    /// Returns the radius.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl fmt::Display for Sphere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sphere(c=")?;
        write_xyz(f, &self.center.coords)?;
        write!(f, ", r={})", self.radius)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn accessors() {
        let s = Sphere::new(Point3::new(1.0, 0.0, 0.0), 2.5).unwrap();
        assert_eq!(*s.center(), Point3::new(1.0, 0.0, 0.0));
        assert!((s.radius() - 2.5).abs() < TOLERANCE);
    }

    #[test]
    fn non_positive_radius_is_degenerate() {
        assert!(Sphere::new(Point3::origin(), 0.0).is_err());
        assert!(Sphere::new(Point3::origin(), -1.0).is_err());
    }

    #[test]
    fn display() {
        let s = Sphere::new(Point3::origin(), 1.0).unwrap();
        assert_eq!(s.to_string(), "sphere(c=(0, 0, 0), r=1)");
    }
}
