// src/engine.rs
//! Simulation core: physics world, render scene, and the registry that
//! keeps them in lockstep.

use glam::{Quat, Vec3};

use crate::body::{BodyFactory, ShapeDesc};
use crate::camera::Ray;
use crate::error::Result;
use crate::physics::{PhysicsWorld, RigidBodyHandle};
use crate::placement::Pose;
use crate::scene::{ProxyHandle, Scene};
use crate::sync::SyncRegistry;

pub const GRAVITY: Vec3 = Vec3::new(0.0, -9.807, 0.0);

pub struct Simulation {
    pub world: PhysicsWorld,
    pub scene: Scene,
    pub registry: SyncRegistry,
}

impl Simulation {
    pub fn new() -> Self {
        Self {
            world: PhysicsWorld::new(GRAVITY),
            scene: Scene::new(),
            registry: SyncRegistry::new(),
        }
    }

    /// Spawn a body/proxy pair and register them for sync. The pair becomes
    /// visible to the sync pass on the next `tick`.
    pub fn spawn(
        &mut self,
        pose: Pose,
        shape: ShapeDesc,
        mass: f32,
        color: [f32; 4],
    ) -> Result<(RigidBodyHandle, ProxyHandle)> {
        let (body, collider, proxy) = BodyFactory::create(pose, shape, mass, color)?;
        let proxy = self.scene.add_proxy(proxy);
        let body = self.world.add_body(body, collider);
        self.registry.bind(body, proxy);
        Ok((body, proxy))
    }

    /// Spawn a ball at the ray origin and launch it along the ray.
    pub fn spawn_projectile(
        &mut self,
        ray: Ray,
        radius: f32,
        mass: f32,
        speed: f32,
        color: [f32; 4],
    ) -> Result<(RigidBodyHandle, ProxyHandle)> {
        let pose = Pose {
            position: ray.origin,
            rotation: Quat::IDENTITY,
        };
        let (body, proxy) = self.spawn(pose, ShapeDesc::Ball { radius }, mass, color)?;
        self.world.set_linear_velocity(body, ray.dir * speed);
        Ok((body, proxy))
    }

    /// Advance one frame: promote pending bindings, step physics, then copy
    /// poses onto the proxies.
    pub fn tick(&mut self, dt: f32) -> Result<()> {
        self.registry.drain_pending();
        self.world.step(dt)?;
        self.registry.sync(&self.world, &mut self.scene);
        let collisions = self.world.drain_collision_events();
        if !collisions.is_empty() {
            log::trace!("frame saw {} collision events", collisions.len());
        }
        Ok(())
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_registers_on_the_next_tick() {
        let mut sim = Simulation::new();
        let pose = Pose {
            position: Vec3::new(0.0, 1.0, 0.0),
            rotation: Quat::IDENTITY,
        };
        sim.spawn(pose, ShapeDesc::Ball { radius: 0.25 }, 1.0, [1.0; 4])
            .unwrap();
        assert!(sim.registry.is_empty());

        sim.tick(0.0).unwrap();
        assert_eq!(sim.registry.len(), 1);
        assert_eq!(sim.scene.len(), 1);
    }

    #[test]
    fn projectile_launches_along_the_ray() {
        let mut sim = Simulation::new();
        let ray = Ray {
            origin: Vec3::new(0.0, 20.0, 20.0),
            dir: Vec3::new(0.0, 0.0, -1.0),
        };
        let (body, _) = sim.spawn_projectile(ray, 0.25, 1.0, 20.0, [1.0, 0.0, 0.0, 1.0]).unwrap();

        let v = sim.world.linear_velocity(body).unwrap();
        assert!((v - Vec3::new(0.0, 0.0, -20.0)).length() < 1e-5);
    }

    #[test]
    fn tick_rejects_negative_deltas() {
        let mut sim = Simulation::new();
        assert!(sim.tick(-0.016).unwrap_err().is_argument());
    }

    #[test]
    fn proxies_track_falling_bodies() {
        let mut sim = Simulation::new();
        let pose = Pose {
            position: Vec3::new(0.0, 10.0, 0.0),
            rotation: Quat::IDENTITY,
        };
        let (_, proxy) = sim
            .spawn(pose, ShapeDesc::Ball { radius: 0.25 }, 1.0, [1.0; 4])
            .unwrap();

        for _ in 0..30 {
            sim.tick(1.0 / 60.0).unwrap();
        }
        let y = sim.scene.get(proxy).unwrap().transform.translation.y;
        assert!(y < 10.0 - 0.5, "expected the proxy to fall, got y = {y}");
    }
}
