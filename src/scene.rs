// src/scene.rs
//! Render-side scene: a flat arena of proxies addressed by integer handles.
//!
//! Proxies carry only what drawing needs — a transform and a color. Their
//! transforms are written by the sync loop from the paired rigid bodies,
//! never the other way around (the one exception is creation, where the
//! initial pose seeds both sides). Pairing lives in `sync::SyncRegistry` as
//! handles into this arena, so there are no back-references between the
//! physics and render sides.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};

/// Index of a proxy in the scene arena. Stable for the proxy's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProxyHandle(u32);

impl ProxyHandle {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Position + orientation + scale of a render proxy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    #[inline]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// A drawable object in the scene.
#[derive(Debug, Clone, Copy)]
pub struct RenderProxy {
    pub transform: Transform,
    pub color: [f32; 4],
}

/// Per-instance GPU payload: model matrix + color (matches the shader layout).
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

/// Proxy arena.
#[derive(Default)]
pub struct Scene {
    proxies: Vec<RenderProxy>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_proxy(&mut self, proxy: RenderProxy) -> ProxyHandle {
        let handle = ProxyHandle(self.proxies.len() as u32);
        self.proxies.push(proxy);
        handle
    }

    pub fn get(&self, handle: ProxyHandle) -> Option<&RenderProxy> {
        self.proxies.get(handle.index())
    }

    pub fn get_mut(&mut self, handle: ProxyHandle) -> Option<&mut RenderProxy> {
        self.proxies.get_mut(handle.index())
    }

    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RenderProxy> {
        self.proxies.iter()
    }

    /// Collect instance data for the renderer (call once per frame, after the
    /// sync loop has written this frame's transforms).
    pub fn collect_instances(&self, out: &mut Vec<InstanceRaw>) {
        out.clear();
        for proxy in &self.proxies {
            out.push(InstanceRaw {
                model: proxy.transform.matrix().to_cols_array_2d(),
                color: proxy.color,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proxy_at(x: f32) -> RenderProxy {
        RenderProxy {
            transform: Transform {
                translation: Vec3::new(x, 0.0, 0.0),
                ..Transform::identity()
            },
            color: [1.0; 4],
        }
    }

    #[test]
    fn handles_address_their_own_proxy() {
        let mut scene = Scene::new();
        let a = scene.add_proxy(proxy_at(1.0));
        let b = scene.add_proxy(proxy_at(2.0));
        assert_ne!(a, b);
        assert_eq!(scene.get(a).unwrap().transform.translation.x, 1.0);
        assert_eq!(scene.get(b).unwrap().transform.translation.x, 2.0);
    }

    #[test]
    fn collect_instances_emits_one_entry_per_proxy() {
        let mut scene = Scene::new();
        scene.add_proxy(proxy_at(1.0));
        scene.add_proxy(proxy_at(2.0));
        let mut out = Vec::new();
        scene.collect_instances(&mut out);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].model[3][0], 1.0); // translation column
    }
}
