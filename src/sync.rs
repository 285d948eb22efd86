// src/sync.rs
//! Physics-to-render synchronization.
//!
//! Bodies and proxies are paired by handle, never by pointer. Bindings made
//! mid-frame land in a pending queue and only become visible to `sync` after
//! the next `drain_pending`, so a frame always iterates a stable set.

use parking_lot::Mutex;

use crate::physics::{PhysicsWorld, RigidBodyHandle};
use crate::scene::{ProxyHandle, Scene};

/// A physics body paired with the proxy that renders it.
#[derive(Debug, Clone, Copy)]
pub struct BodyBinding {
    pub body: RigidBodyHandle,
    pub proxy: ProxyHandle,
}

#[derive(Default)]
pub struct SyncRegistry {
    live: Vec<BodyBinding>,
    pending: Mutex<Vec<BodyBinding>>,
}

impl SyncRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a binding. Takes `&self` so spawns can happen while the frame
    /// still holds the registry; the pair starts syncing next frame.
    pub fn bind(&self, body: RigidBodyHandle, proxy: ProxyHandle) {
        self.pending.lock().push(BodyBinding { body, proxy });
    }

    /// Promote queued bindings to the live set. Call once at frame start.
    pub fn drain_pending(&mut self) -> usize {
        let mut pending = self.pending.lock();
        let n = pending.len();
        self.live.append(&mut pending);
        n
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Copy each live body's pose onto its proxy, verbatim. A binding whose
    /// body no longer resolves is skipped, not treated as an error. Returns
    /// the number of pairs updated.
    pub fn sync(&self, world: &PhysicsWorld, scene: &mut Scene) -> usize {
        let mut updated = 0;
        for binding in &self.live {
            let Some((position, rotation)) = world.body_pose(binding.body) else {
                log::debug!("sync: body for proxy {:?} not found, skipping", binding.proxy);
                continue;
            };
            let Some(proxy) = scene.get_mut(binding.proxy) else {
                log::debug!("sync: proxy {:?} not found, skipping", binding.proxy);
                continue;
            };
            proxy.transform.translation = position;
            proxy.transform.rotation = rotation;
            updated += 1;
        }
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{BodyFactory, ShapeDesc};
    use crate::placement::Pose;
    use crate::scene::{RenderProxy, Transform};
    use glam::{Quat, Vec3};

    fn spawn_pair(world: &mut PhysicsWorld, scene: &mut Scene) -> (RigidBodyHandle, ProxyHandle) {
        let pose = Pose {
            position: Vec3::new(0.0, 5.0, 0.0),
            rotation: Quat::IDENTITY,
        };
        let (body, collider, proxy) =
            BodyFactory::create(pose, ShapeDesc::Ball { radius: 0.25 }, 1.0, [1.0; 4]).unwrap();
        let body = world.add_body(body, collider);
        let proxy = scene.add_proxy(proxy);
        (body, proxy)
    }

    #[test]
    fn pending_bindings_are_invisible_until_drained() {
        let mut world = PhysicsWorld::new(Vec3::new(0.0, -9.807, 0.0));
        let mut scene = Scene::new();
        let mut registry = SyncRegistry::new();

        let (body, proxy) = spawn_pair(&mut world, &mut scene);
        registry.bind(body, proxy);

        assert_eq!(registry.sync(&world, &mut scene), 0);
        assert_eq!(registry.drain_pending(), 1);
        assert_eq!(registry.sync(&world, &mut scene), 1);
    }

    #[test]
    fn sync_copies_poses_and_is_idempotent_without_stepping() {
        let mut world = PhysicsWorld::new(Vec3::new(0.0, -9.807, 0.0));
        let mut scene = Scene::new();
        let mut registry = SyncRegistry::new();

        let (body, proxy) = spawn_pair(&mut world, &mut scene);
        registry.bind(body, proxy);
        registry.drain_pending();

        world.step(1.0 / 60.0).unwrap();
        registry.sync(&world, &mut scene);
        let first = scene.get(proxy).unwrap().transform;

        registry.sync(&world, &mut scene);
        let second = scene.get(proxy).unwrap().transform;
        assert_eq!(first.translation, second.translation);
        assert_eq!(first.rotation, second.rotation);

        let (expected_pos, expected_rot) = world.body_pose(body).unwrap();
        assert_eq!(first.translation, expected_pos);
        assert_eq!(first.rotation, expected_rot);
    }

    #[test]
    fn unresolvable_body_is_skipped_without_poisoning_the_rest() {
        let mut world = PhysicsWorld::new(Vec3::new(0.0, -9.807, 0.0));
        let mut scene = Scene::new();
        let mut registry = SyncRegistry::new();

        let stale_proxy = scene.add_proxy(RenderProxy {
            transform: Transform::identity(),
            color: [1.0; 4],
        });
        registry.bind(RigidBodyHandle::invalid(), stale_proxy);
        let (body, proxy) = spawn_pair(&mut world, &mut scene);
        registry.bind(body, proxy);
        registry.drain_pending();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.sync(&world, &mut scene), 1);
        assert!(scene.get(proxy).is_some());
    }
}
