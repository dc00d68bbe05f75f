//! Builds a small two-region geometry from shadow solids and prints it.
//!
//! Usage:
//! ```text
//! cargo run --example build_geometry
//! RUST_LOG=csg_shadow=debug cargo run --example build_geometry
//! ```

use csg_shadow::math::{Point3, Vector3};
use csg_shadow::{BuildGeometry, Result, ShadowSolid};

fn main() -> Result<()> {
    // Default: WARN for everything, INFO for csg_shadow.
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("csg_shadow=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let housing = ShadowSolid::ortho_brick(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0))?;
    let bore = ShadowSolid::cylinder(Point3::origin(), Point3::new(0.0, 0.0, 1.0), 0.4)?;
    let shell = &housing - &bore;
    shell.set_material("steel").set_boundary_condition(1);

    let core = ShadowSolid::sphere(Point3::origin(), 0.3)?;
    let cap = ShadowSolid::plane(Point3::new(0.0, 0.0, 0.2), Vector3::z())?;
    let plug = &core * &cap;
    plug.set_material("copper").set_boundary_condition(2);

    let geometry = BuildGeometry::new([shell, plug]).execute()?;
    for (index, object) in geometry.top_level_objects().enumerate() {
        println!(
            "tlo {index} [{}]: {}",
            object.material().unwrap_or("-"),
            object.solid()
        );
    }
    println!("{} surfaces", geometry.surface_count());
    Ok(())
}
