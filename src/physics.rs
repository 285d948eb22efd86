// src/physics.rs
//! Rapier-backed dynamics world.
//!
//! Owns the whole pipeline — broad/narrow phase, islands, CCD solver, body
//! and collider sets — plus the gravity vector and the collision-event
//! channel. `step` is the only physics-side mutator of body poses; everything
//! else is registration and read access. glam is the engine-side math type,
//! nalgebra lives only at this boundary.

use crossbeam::channel::{unbounded, Receiver};
use glam::{Quat, Vec3};
use nalgebra::{Quaternion, vector};
use rapier3d::prelude as rap;

use crate::error::{Error, Result};

pub use rapier3d::prelude::{CollisionEvent, RigidBodyHandle};

pub struct PhysicsWorld {
    gravity: rap::Vector<rap::Real>,
    pipeline: rap::PhysicsPipeline,
    integration_params: rap::IntegrationParameters,
    islands: rap::IslandManager,
    broad_phase: rap::BroadPhase,
    narrow_phase: rap::NarrowPhase,
    bodies: rap::RigidBodySet,
    colliders: rap::ColliderSet,
    impulse_joints: rap::ImpulseJointSet,
    multibody_joints: rap::MultibodyJointSet,
    ccd_solver: rap::CCDSolver,
    query_pipeline: rap::QueryPipeline,
    collision_recv: Receiver<rap::CollisionEvent>,
    contact_force_recv: Receiver<rap::ContactForceEvent>,
    event_handler: rap::ChannelEventCollector,
}

impl PhysicsWorld {
    pub fn new(gravity: Vec3) -> Self {
        let (collision_send, collision_recv) = unbounded();
        let (contact_force_send, contact_force_recv) = unbounded();
        let event_handler = rap::ChannelEventCollector::new(collision_send, contact_force_send);

        Self {
            gravity: to_vector(gravity),
            pipeline: rap::PhysicsPipeline::new(),
            integration_params: rap::IntegrationParameters::default(),
            islands: rap::IslandManager::new(),
            broad_phase: rap::BroadPhase::new(),
            narrow_phase: rap::NarrowPhase::new(),
            bodies: rap::RigidBodySet::new(),
            colliders: rap::ColliderSet::new(),
            impulse_joints: rap::ImpulseJointSet::new(),
            multibody_joints: rap::MultibodyJointSet::new(),
            ccd_solver: rap::CCDSolver::new(),
            query_pipeline: rap::QueryPipeline::new(),
            collision_recv,
            contact_force_recv,
            event_handler,
        }
    }

    /// Advance the simulation by `dt` seconds.
    ///
    /// Negative time is nonsensical for integration and rejected; zero is a
    /// no-op. Large deltas degrade accuracy but are left to the solver.
    pub fn step(&mut self, dt: f32) -> Result<()> {
        if dt < 0.0 {
            return Err(Error::invalid_argument(format!(
                "step delta must be non-negative, got {dt}"
            )));
        }
        if dt == 0.0 {
            return Ok(());
        }

        self.integration_params.dt = dt;
        self.pipeline.step(
            &self.gravity,
            &self.integration_params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.event_handler,
        );
        Ok(())
    }

    /// Insert a body and attach its collider. Returns the body handle the
    /// sync registry pairs with a render proxy.
    pub fn add_body(&mut self, body: rap::RigidBody, collider: rap::Collider) -> RigidBodyHandle {
        let handle = self.bodies.insert(body);
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        handle
    }

    /// Current world pose of a body, if the engine has one for it this frame.
    pub fn body_pose(&self, handle: RigidBodyHandle) -> Option<(Vec3, Quat)> {
        self.bodies.get(handle).map(|b| from_isometry(b.position()))
    }

    pub fn linear_velocity(&self, handle: RigidBodyHandle) -> Option<Vec3> {
        self.bodies.get(handle).map(|b| from_vector(b.linvel()))
    }

    pub fn set_linear_velocity(&mut self, handle: RigidBodyHandle, velocity: Vec3) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.set_linvel(to_vector(velocity), true);
        }
    }

    pub fn is_fixed(&self, handle: RigidBodyHandle) -> bool {
        self.bodies.get(handle).map_or(false, |b| b.is_fixed())
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn gravity(&self) -> Vec3 {
        from_vector(&self.gravity)
    }

    /// Drains collision events accumulated since the last call. Non-blocking.
    pub fn drain_collision_events(&self) -> Vec<rap::CollisionEvent> {
        // Contact-force events are not consumed anywhere; keep the channel
        // from backing up.
        for _ in self.contact_force_recv.try_iter() {}
        self.collision_recv.try_iter().collect()
    }
}

// -------------------------------------------------------------------------
// glam <-> nalgebra conversions (this module is the only crossing point)
// -------------------------------------------------------------------------

#[inline]
pub(crate) fn to_vector(v: Vec3) -> rap::Vector<rap::Real> {
    vector![v.x, v.y, v.z]
}

#[inline]
pub(crate) fn from_vector(v: &rap::Vector<rap::Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

#[inline]
pub(crate) fn to_isometry(translation: Vec3, rotation: Quat) -> rap::Isometry<rap::Real> {
    rap::Isometry::from_parts(
        rap::Translation::from(vector![translation.x, translation.y, translation.z]),
        rap::Rotation::from_quaternion(Quaternion::new(
            rotation.w, rotation.x, rotation.y, rotation.z,
        )),
    )
}

#[inline]
pub(crate) fn from_isometry(iso: &rap::Isometry<rap::Real>) -> (Vec3, Quat) {
    let t = iso.translation;
    let r = iso.rotation;
    (
        Vec3::new(t.x, t.y, t.z),
        Quat::from_xyzw(r.i, r.j, r.k, r.w),
    )
}
