use bevy_ecs::prelude::Component;
use glam::Vec3;

pub const MIN_SCALE_MULTIPLIER: f32 = 0.1;
pub const MAX_SCALE_MULTIPLIER: f32 = 3.0;

/// Drives an entity's local scale to `base_scale * multiplier` every frame.
#[derive(Component, Clone, Debug, Copy, PartialEq)]
pub struct ScaleAdjuster {
    pub base_scale: Vec3,
    multiplier: f32,
}

impl ScaleAdjuster {
    pub fn new(base_scale: Vec3, multiplier: f32) -> Self {
        Self {
            base_scale,
            multiplier: multiplier.clamp(MIN_SCALE_MULTIPLIER, MAX_SCALE_MULTIPLIER),
        }
    }

    pub fn multiplier(&self) -> f32 {
        self.multiplier
    }

    pub fn set_multiplier(&mut self, multiplier: f32) {
        self.multiplier = multiplier.clamp(MIN_SCALE_MULTIPLIER, MAX_SCALE_MULTIPLIER);
    }

    pub fn scale(&self) -> Vec3 {
        self.base_scale * self.multiplier
    }
}

impl Default for ScaleAdjuster {
    fn default() -> Self {
        Self::new(Vec3::ONE, 1.0)
    }
}
