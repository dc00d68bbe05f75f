pub mod surface;

pub use surface::{Cylinder, Plane, Sphere, Surface};
