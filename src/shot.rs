// src/shot.rs
//! Click-to-shoot: a guarded click unprojects the cursor into a ray and
//! fires a ball along it.

use crate::camera::Camera;
use crate::engine::Simulation;
use crate::scene::ProxyHandle;

pub const BALL_COLOR: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

/// A primary-button click, with the modifier guard state at click time.
#[derive(Debug, Clone, Copy)]
pub struct ShotEvent {
    pub x: f32,
    pub y: f32,
    pub guard_held: bool,
}

pub struct Shooter {
    pub radius: f32,
    pub mass: f32,
    pub speed: f32,
}

impl Default for Shooter {
    fn default() -> Self {
        Self {
            radius: 0.25,
            mass: 1.0,
            speed: 20.0,
        }
    }
}

impl Shooter {
    /// Handle a click. Clicks without the guard modifier, or before the
    /// simulation exists, do nothing. Returns the spawned ball's proxy.
    pub fn on_click(
        &self,
        event: ShotEvent,
        viewport: (f32, f32),
        camera: &Camera,
        sim: Option<&mut Simulation>,
    ) -> Option<ProxyHandle> {
        if !event.guard_held {
            return None;
        }
        let Some(sim) = sim else {
            log::debug!("shot ignored, simulation not ready");
            return None;
        };

        let ray = camera.screen_ray(event.x, event.y, viewport.0, viewport.1);
        match sim.spawn_projectile(ray, self.radius, self.mass, self.speed, BALL_COLOR) {
            Ok((_, proxy)) => Some(proxy),
            Err(err) => {
                log::error!("failed to spawn projectile: {err}");
                None
            }
        }
    }
}
