// src/domino.rs
//! The domino-run scene: a fixed table and a spiral of dominoes placed
//! along a Catmull-Rom curve.

use glam::{Quat, Vec3};

use crate::body::ShapeDesc;
use crate::curve::{densify_polyline, CatmullRom};
use crate::engine::Simulation;
use crate::error::Result;
use crate::placement::{Pose, PosePlacer};

/// Spacing between dominoes along the curve, in world units.
pub const FOOTPRINT: f32 = 0.4;
/// Parameter increment for the arc-length walk. Small enough that the
/// footprint, not the step, bounds placement error.
pub const SAMPLE_STEP: f32 = 1e-4;

pub const DOMINO_HALF_EXTENTS: Vec3 = Vec3::new(0.375, 0.5, 0.05);
pub const DOMINO_MASS: f32 = 1.0;

const TABLE_POSITION: Vec3 = Vec3::new(0.0, -0.525, 0.0);
const TABLE_HALF_EXTENTS: Vec3 = Vec3::new(15.0, 0.25, 15.0);
const TABLE_COLOR: [f32; 4] = [0.53, 0.53, 0.53, 1.0];

const DOMINO_COLORS: [[f32; 4]; 4] = [
    [0.90, 0.30, 0.25, 1.0],
    [0.95, 0.75, 0.20, 1.0],
    [0.30, 0.70, 0.40, 1.0],
    [0.25, 0.50, 0.90, 1.0],
];

/// Control points of the rectangular spiral, outermost ring first,
/// tightening by two units per lap and ending at the origin.
pub fn control_points() -> Vec<Vec3> {
    [
        [-10.0, 0.0, -10.0],
        [10.0, 0.0, -10.0],
        [10.0, 0.0, 10.0],
        [-10.0, 0.0, 10.0],
        [-10.0, 0.0, -8.0],
        [8.0, 0.0, -8.0],
        [8.0, 0.0, 8.0],
        [-8.0, 0.0, 8.0],
        [-8.0, 0.0, -6.0],
        [6.0, 0.0, -6.0],
        [6.0, 0.0, 6.0],
        [-6.0, 0.0, 6.0],
        [-6.0, 0.0, -4.0],
        [4.0, 0.0, -4.0],
        [4.0, 0.0, 4.0],
        [-4.0, 0.0, 4.0],
        [-4.0, 0.0, -2.0],
        [2.0, 0.0, -2.0],
        [2.0, 0.0, 2.0],
        [-2.0, 0.0, 2.0],
        [-2.0, 0.0, 0.0],
        [0.0, 0.0, 0.0],
    ]
    .into_iter()
    .map(Vec3::from_array)
    .collect()
}

/// Populate `sim` with the table and the domino spiral. Returns the number
/// of dominoes placed.
pub fn build(sim: &mut Simulation) -> Result<usize> {
    sim.spawn(
        Pose {
            position: TABLE_POSITION,
            rotation: Quat::IDENTITY,
        },
        ShapeDesc::Cuboid {
            half_extents: TABLE_HALF_EXTENTS,
        },
        0.0,
        TABLE_COLOR,
    )?;

    // Densifying the polyline before fitting keeps the spline close to the
    // straight runs of the spiral instead of bowing across the corners.
    let curve = CatmullRom::new(densify_polyline(&control_points()), false)?;
    let placer = PosePlacer::new(&curve, FOOTPRINT, SAMPLE_STEP)?;

    let mut count = 0;
    for pose in placer {
        let color = DOMINO_COLORS[count % DOMINO_COLORS.len()];
        sim.spawn(
            pose,
            ShapeDesc::Cuboid {
                half_extents: DOMINO_HALF_EXTENTS,
            },
            DOMINO_MASS,
            color,
        )?;
        count += 1;
    }
    log::info!("placed {count} dominoes along the spiral");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_places_the_table_and_a_long_run_of_dominoes() {
        let mut sim = Simulation::new();
        let count = build(&mut sim).unwrap();
        assert!(count > 100, "expected a long run, placed {count}");
        assert_eq!(sim.scene.len(), count + 1);
        assert_eq!(sim.world.body_count(), count + 1);
    }

    #[test]
    fn dominoes_stand_on_the_curve_plane() {
        let mut sim = Simulation::new();
        build(&mut sim).unwrap();
        for proxy in sim.scene.iter().skip(1) {
            assert!(proxy.transform.translation.y.abs() < 1e-3);
        }
    }

    #[test]
    fn the_table_is_immovable() {
        let mut sim = Simulation::new();
        let (table, _) = sim
            .spawn(
                Pose {
                    position: TABLE_POSITION,
                    rotation: Quat::IDENTITY,
                },
                ShapeDesc::Cuboid {
                    half_extents: TABLE_HALF_EXTENTS,
                },
                0.0,
                TABLE_COLOR,
            )
            .unwrap();
        assert!(sim.world.is_fixed(table));
    }
}
