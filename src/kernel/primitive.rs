use std::cell::Cell;
use std::fmt;

use crate::error::{GeometryError, Result};
use crate::geometry::surface::{Cylinder, Plane, Sphere, Surface};
use crate::math::{write_xyz, Point3, Vector3};

/// A primitive surface together with its boundary-condition tag.
///
/// The tag lives in a [`Cell`] because primitives are shared between shadow
/// nodes and the geometry registry, and tagging may happen after the
/// primitive was registered.
#[derive(Debug, Clone)]
pub struct BoundarySurface {
    surface: Surface,
    boundary_tag: Cell<Option<i32>>,
}

impl BoundarySurface {
    fn new(surface: Surface) -> Self {
        Self {
            surface,
            boundary_tag: Cell::new(None),
        }
    }

    /// Returns the underlying surface geometry.
    #[must_use]
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Returns the boundary-condition tag, if any was applied.
    #[must_use]
    pub fn boundary_tag(&self) -> Option<i32> {
        self.boundary_tag.get()
    }

    /// Applies a boundary-condition tag, replacing any previous one.
    pub fn set_boundary_tag(&self, tag: i32) {
        self.boundary_tag.set(Some(tag));
    }
}

/// The shape a primitive was built from.
#[derive(Debug, Clone)]
pub enum PrimitiveKind {
    /// Ball bounded by one sphere.
    Sphere(Sphere),
    /// Half-space behind a plane.
    HalfSpace(Plane),
    /// Infinite solid cylinder.
    Cylinder(Cylinder),
    /// Axis-aligned box bounded by six planes.
    OrthoBrick { min: Point3, max: Point3 },
}

/// A kernel primitive: a simple solid bounded by one or more surfaces.
#[derive(Debug, Clone)]
pub struct Primitive {
    kind: PrimitiveKind,
    surfaces: Vec<BoundarySurface>,
}

impl Primitive {
    /// Creates a solid ball.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is non-positive.
    pub fn sphere(center: Point3, radius: f64) -> Result<Self> {
        let sphere = Sphere::new(center, radius)?;
        Ok(Self::from_parts(
            PrimitiveKind::Sphere(sphere.clone()),
            vec![Surface::Sphere(sphere)],
        ))
    }

    /// Creates the half-space behind the plane through `point`, with
    /// `normal` pointing outwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the normal is zero-length.
    pub fn half_space(point: Point3, normal: Vector3) -> Result<Self> {
        let plane = Plane::new(point, normal)?;
        Ok(Self::from_parts(
            PrimitiveKind::HalfSpace(plane.clone()),
            vec![Surface::Plane(plane)],
        ))
    }

    /// Creates an infinite solid cylinder whose axis runs through `a` and `b`.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is non-positive or `a == b`.
    pub fn cylinder(a: Point3, b: Point3, radius: f64) -> Result<Self> {
        let cylinder = Cylinder::new(a, b, radius)?;
        Ok(Self::from_parts(
            PrimitiveKind::Cylinder(cylinder.clone()),
            vec![Surface::Cylinder(cylinder)],
        ))
    }

    /// Creates an axis-aligned box spanning `min` to `max`.
    ///
    /// Faces are ordered `-x, +x, -y, +y, -z, +z`, each with an outward
    /// normal.
    ///
    /// # Errors
    ///
    /// Returns an error unless `min` is strictly below `max` on every axis.
    pub fn ortho_brick(min: Point3, max: Point3) -> Result<Self> {
        if (0..3).any(|i| min[i] >= max[i]) {
            return Err(GeometryError::Degenerate(
                "brick min corner must be below max corner on every axis".into(),
            )
            .into());
        }

        let mut surfaces = Vec::with_capacity(6);
        for axis in 0..3 {
            let outward = Vector3::ith(axis, 1.0);
            surfaces.push(Surface::Plane(Plane::new(min, -outward)?));
            surfaces.push(Surface::Plane(Plane::new(max, outward)?));
        }

        Ok(Self::from_parts(
            PrimitiveKind::OrthoBrick { min, max },
            surfaces,
        ))
    }

    fn from_parts(kind: PrimitiveKind, surfaces: Vec<Surface>) -> Self {
        Self {
            kind,
            surfaces: surfaces.into_iter().map(BoundarySurface::new).collect(),
        }
    }

    /// Returns the shape this primitive was built from.
    #[must_use]
    pub fn kind(&self) -> &PrimitiveKind {
        &self.kind
    }

    /// Returns the number of bounding surfaces.
    #[must_use]
    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    /// Returns the `index`-th bounding surface.
    #[must_use]
    pub fn surface(&self, index: usize) -> Option<&BoundarySurface> {
        self.surfaces.get(index)
    }

    /// Returns all bounding surfaces.
    #[must_use]
    pub fn surfaces(&self) -> &[BoundarySurface] {
        &self.surfaces
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            PrimitiveKind::Sphere(sphere) => fmt::Display::fmt(sphere, f),
            PrimitiveKind::HalfSpace(plane) => fmt::Display::fmt(plane, f),
            PrimitiveKind::Cylinder(cylinder) => fmt::Display::fmt(cylinder, f),
            PrimitiveKind::OrthoBrick { min, max } => {
                write!(f, "orthobrick(min=")?;
                write_xyz(f, &min.coords)?;
                write!(f, ", max=")?;
                write_xyz(f, &max.coords)?;
                write!(f, ")")
            }
        }
    }
}
