//! AR camera pose resource.
//!
//! The host writes the device camera pose and projection parameters here
//! every frame. Systems use it to place the board in front of the viewer, to
//! project world anchors to screen space for UI affordances and to map
//! viewport points back into the world.
//!
//! Screen coordinates are pixels with the origin at the bottom-left corner.
//! Viewport coordinates are `(0..1, 0..1, depth)` over the same area.

use bevy_ecs::prelude::Resource;
use glam::{Vec2, Vec3};

use crate::components::transform::Transform3D;

/// ECS resource holding the active AR camera.
#[derive(Resource, Clone, Copy, Debug)]
pub struct ArCamera {
    /// World pose; the camera looks along its local +Z.
    pub transform: Transform3D,
    /// Vertical field of view in degrees.
    pub vertical_fov_degrees: f32,
    /// Distance to the near clip plane in meters.
    pub near_clip: f32,
    /// Screen size in pixels.
    pub screen_size: Vec2,
}

impl Default for ArCamera {
    fn default() -> Self {
        Self {
            transform: Transform3D::IDENTITY,
            vertical_fov_degrees: 60.0,
            near_clip: 0.1,
            screen_size: Vec2::new(1080.0, 1920.0),
        }
    }
}

impl ArCamera {
    pub fn position(&self) -> Vec3 {
        self.transform.translation
    }

    pub fn forward(&self) -> Vec3 {
        self.transform.forward()
    }

    pub fn up(&self) -> Vec3 {
        self.transform.up()
    }

    pub fn right(&self) -> Vec3 {
        self.transform.right()
    }

    fn aspect(&self) -> f32 {
        if self.screen_size.y <= 0.0 {
            1.0
        } else {
            self.screen_size.x / self.screen_size.y
        }
    }

    fn half_tan(&self) -> f32 {
        (self.vertical_fov_degrees.to_radians() * 0.5).tan()
    }

    /// Map a viewport point `(vx, vy, depth)` to world space.
    pub fn viewport_to_world(&self, viewport: Vec3) -> Vec3 {
        let half_h = self.half_tan() * viewport.z;
        let half_w = half_h * self.aspect();
        self.position()
            + self.forward() * viewport.z
            + self.right() * ((viewport.x - 0.5) * 2.0 * half_w)
            + self.up() * ((viewport.y - 0.5) * 2.0 * half_h)
    }

    /// Project a world point to screen pixels.
    ///
    /// Points behind the camera (or on its plane) have no projection.
    pub fn world_to_screen(&self, point: Vec3) -> Option<Vec2> {
        let local = self.transform.rotation.inverse() * (point - self.position());
        if local.z <= f32::EPSILON {
            return None;
        }
        let half_h = self.half_tan() * local.z;
        let half_w = half_h * self.aspect();
        if half_h <= 0.0 || half_w <= 0.0 {
            return None;
        }
        let ndc = Vec2::new(local.x / half_w, local.y / half_h);
        Some((ndc * 0.5 + Vec2::splat(0.5)) * self.screen_size)
    }
}
