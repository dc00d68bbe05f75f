mod cylinder;
mod plane;
mod sphere;

pub use cylinder::Cylinder;
pub use plane::Plane;
pub use sphere::Sphere;

use std::fmt;

/// The geometric surface bounding a primitive.
#[derive(Debug, Clone)]
pub enum Surface {
    /// A planar surface.
    Plane(Plane),
    /// A spherical surface.
    Sphere(Sphere),
    /// An infinite cylindrical surface.
    Cylinder(Cylinder),
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plane(plane) => fmt::Display::fmt(plane, f),
            Self::Sphere(sphere) => fmt::Display::fmt(sphere, f),
            Self::Cylinder(cylinder) => fmt::Display::fmt(cylinder, f),
        }
    }
}
