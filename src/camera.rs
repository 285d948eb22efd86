// src/camera.rs
//! Perspective camera and screen-space ray unprojection.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

pub struct Camera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub fovy: f32,
    pub aspect: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn new(position: Vec3, yaw: f32, pitch: f32, aspect: f32) -> Self {
        Self {
            position,
            yaw,
            pitch,
            fovy: 75.0_f32.to_radians(),
            aspect,
            znear: 0.1,
            zfar: 100.0,
        }
    }

    pub fn forward(&self) -> Vec3 {
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw).normalize()
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.forward(), Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy, self.aspect, self.znear, self.zfar)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Unproject a window-space cursor position into a world-space ray.
    ///
    /// `px`/`py` are in physical pixels with the origin at the top-left, as
    /// winit reports them.
    pub fn screen_ray(&self, px: f32, py: f32, width: f32, height: f32) -> Ray {
        let ndc_x = (px / width) * 2.0 - 1.0;
        let ndc_y = -((py / height) * 2.0 - 1.0);

        let inv = self.view_proj().inverse();
        let near = inv.project_point3(Vec3::new(ndc_x, ndc_y, 0.0));
        let far = inv.project_point3(Vec3::new(ndc_x, ndc_y, 1.0));

        Ray {
            origin: self.position,
            dir: (far - near).normalize(),
        }
    }
}

/// World-space ray, `dir` normalized.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub position: [f32; 4],
}

impl CameraUniform {
    pub fn from_camera(camera: &Camera) -> Self {
        Self {
            view_proj: camera.view_proj().to_cols_array_2d(),
            position: [camera.position.x, camera.position.y, camera.position.z, 1.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_ray_points_along_the_view_direction() {
        let camera = Camera::new(Vec3::new(0.0, 20.0, 20.0), std::f32::consts::PI, -0.5, 16.0 / 9.0);
        let ray = camera.screen_ray(640.0, 360.0, 1280.0, 720.0);
        assert!(ray.dir.dot(camera.forward()) > 0.999);
        assert_eq!(ray.origin, camera.position);
    }

    #[test]
    fn corner_rays_diverge_from_the_view_direction() {
        let camera = Camera::new(Vec3::ZERO, 0.0, 0.0, 16.0 / 9.0);
        let center = camera.screen_ray(640.0, 360.0, 1280.0, 720.0);
        let corner = camera.screen_ray(0.0, 0.0, 1280.0, 720.0);
        assert!(corner.dir.dot(center.dir) < 0.999);
        assert!((corner.dir.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn aspect_updates_on_resize() {
        let mut camera = Camera::new(Vec3::ZERO, 0.0, 0.0, 1.0);
        camera.set_aspect(1920, 1080);
        assert!((camera.aspect - 1920.0 / 1080.0).abs() < 1e-6);
        camera.set_aspect(100, 0);
        assert!((camera.aspect - 1920.0 / 1080.0).abs() < 1e-6);
    }
}
