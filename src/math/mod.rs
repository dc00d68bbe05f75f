/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Writes a vector as `(x, y, z)`.
pub(crate) fn write_xyz(f: &mut std::fmt::Formatter<'_>, v: &Vector3) -> std::fmt::Result {
    write!(f, "({}, {}, {})", v.x, v.y, v.z)
}
