// src/body.rs
//! Construction of paired physics bodies and render proxies.
//!
//! `BodyFactory::create` only builds the parts; inserting them into the
//! world and the scene is the caller's job (`engine::Simulation::spawn`), so
//! construction and world membership stay independently testable.

use glam::Vec3;
use rapier3d::prelude::{ActiveEvents, Collider, ColliderBuilder, RigidBody, RigidBodyBuilder};

use crate::error::{Error, Result};
use crate::physics::to_isometry;
use crate::placement::Pose;
use crate::scene::{RenderProxy, Transform};

/// Collision shape of a spawned object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeDesc {
    /// Box with the given half-extents.
    Cuboid { half_extents: Vec3 },
    /// Sphere with the given radius.
    Ball { radius: f32 },
}

impl ShapeDesc {
    fn validate(&self) -> Result<()> {
        match *self {
            ShapeDesc::Cuboid { half_extents } => {
                if half_extents.min_element() <= 0.0 {
                    return Err(Error::invalid_configuration(format!(
                        "cuboid half-extents must be positive, got {half_extents:?}"
                    )));
                }
            }
            ShapeDesc::Ball { radius } => {
                if radius <= 0.0 {
                    return Err(Error::invalid_configuration(format!(
                        "ball radius must be positive, got {radius}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Render scale applied to the unit cube the renderer instances.
    fn render_scale(&self) -> Vec3 {
        match *self {
            ShapeDesc::Cuboid { half_extents } => half_extents * 2.0,
            ShapeDesc::Ball { radius } => Vec3::splat(radius * 2.0),
        }
    }
}

pub struct BodyFactory;

impl BodyFactory {
    /// Build a rigid body, its collider, and the paired render proxy.
    ///
    /// Mass 0 produces an immovable (fixed) body; a positive mass produces a
    /// dynamic body whose local inertia Rapier derives from shape + mass.
    /// Negative mass or degenerate shape dimensions are scene-description
    /// bugs and fail construction outright.
    pub fn create(
        pose: Pose,
        shape: ShapeDesc,
        mass: f32,
        color: [f32; 4],
    ) -> Result<(RigidBody, Collider, RenderProxy)> {
        shape.validate()?;
        if mass < 0.0 {
            return Err(Error::invalid_configuration(format!(
                "body mass must be non-negative, got {mass}"
            )));
        }

        let builder = if mass == 0.0 {
            RigidBodyBuilder::fixed()
        } else {
            RigidBodyBuilder::dynamic()
        };
        let body = builder
            .position(to_isometry(pose.position, pose.rotation))
            .build();

        let collider = match shape {
            ShapeDesc::Cuboid { half_extents } => {
                ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            }
            ShapeDesc::Ball { radius } => ColliderBuilder::ball(radius),
        };
        let collider = if mass > 0.0 {
            collider
                .mass(mass)
                .active_events(ActiveEvents::COLLISION_EVENTS)
        } else {
            collider
        }
        .build();

        // The proxy's initial transform seeds from the pose; after this the
        // sync loop is its only writer.
        let proxy = RenderProxy {
            transform: Transform {
                translation: pose.position,
                rotation: pose.rotation,
                scale: shape.render_scale(),
            },
            color,
        };

        Ok((body, collider, proxy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;
    use rapier3d::prelude::RigidBodyType;

    fn pose() -> Pose {
        Pose {
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Quat::from_rotation_y(0.4),
        }
    }

    #[test]
    fn zero_mass_builds_a_fixed_body() {
        let (body, _, _) = BodyFactory::create(
            pose(),
            ShapeDesc::Cuboid {
                half_extents: Vec3::splat(0.5),
            },
            0.0,
            [1.0; 4],
        )
        .unwrap();
        assert_eq!(body.body_type(), RigidBodyType::Fixed);
    }

    #[test]
    fn positive_mass_builds_a_dynamic_body() {
        let (body, _, _) =
            BodyFactory::create(pose(), ShapeDesc::Ball { radius: 0.25 }, 1.0, [1.0; 4]).unwrap();
        assert_eq!(body.body_type(), RigidBodyType::Dynamic);
    }

    #[test]
    fn negative_mass_is_rejected() {
        let err = BodyFactory::create(pose(), ShapeDesc::Ball { radius: 0.25 }, -1.0, [1.0; 4])
            .map(|_| ())
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn degenerate_shapes_are_rejected() {
        let err = BodyFactory::create(pose(), ShapeDesc::Ball { radius: 0.0 }, 1.0, [1.0; 4])
            .map(|_| ())
            .unwrap_err();
        assert!(err.is_configuration());

        let err = BodyFactory::create(
            pose(),
            ShapeDesc::Cuboid {
                half_extents: Vec3::new(1.0, -0.1, 1.0),
            },
            1.0,
            [1.0; 4],
        )
        .map(|_| ())
        .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn proxy_is_seeded_from_the_pose() {
        let p = pose();
        let (_, _, proxy) = BodyFactory::create(
            p,
            ShapeDesc::Cuboid {
                half_extents: Vec3::new(0.375, 0.5, 0.05),
            },
            1.0,
            [0.5; 4],
        )
        .unwrap();
        assert_eq!(proxy.transform.translation, p.position);
        assert_eq!(proxy.transform.rotation, p.rotation);
        assert_eq!(proxy.transform.scale, Vec3::new(0.75, 1.0, 0.1));
    }
}
