//! Ray intersection against scene geometry.
//!
//! The host engine owns the physics scene; the crate only needs "where does
//! this ray first hit something". Hosts implement [`RaycastProvider`] and
//! insert it wrapped in a [`Raycaster`] resource. [`GroundPlanes`] is a small
//! built-in provider for detected horizontal planes, used by the session
//! replay and tests.

use bevy_ecs::prelude::Resource;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A ray hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub point: Vec3,
    pub distance: f32,
}

/// Scene ray query.
pub trait RaycastProvider: Send + Sync {
    /// First hit along `direction` (normalized) from `origin` within
    /// `max_distance`, if any.
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit>;
}

/// ECS resource holding the active ray query provider.
#[derive(Resource)]
pub struct Raycaster(pub Box<dyn RaycastProvider>);

impl Raycaster {
    pub fn new(provider: impl RaycastProvider + 'static) -> Self {
        Self(Box::new(provider))
    }

    pub fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        self.0.raycast(origin, direction, max_distance)
    }
}

/// Infinite horizontal planes at fixed heights.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroundPlanes {
    pub heights: Vec<f32>,
}

impl GroundPlanes {
    pub fn new(heights: impl Into<Vec<f32>>) -> Self {
        Self {
            heights: heights.into(),
        }
    }
}

impl RaycastProvider for GroundPlanes {
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        if direction.y.abs() <= f32::EPSILON {
            return None;
        }
        self.heights
            .iter()
            .filter_map(|&h| {
                let distance = (h - origin.y) / direction.y;
                (distance >= 0.0 && distance <= max_distance).then(|| RayHit {
                    point: origin + direction * distance,
                    distance,
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}
