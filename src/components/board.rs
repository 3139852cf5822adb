use bevy_ecs::prelude::Component;

use crate::components::transform::Transform3D;

/// Tag for the spawned game board root.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Board;

/// Anchor requested from the host to stabilize the entity against drift.
///
/// `pose` is the world pose at the time the anchor was created.
#[derive(Component, Clone, Copy, Debug)]
pub struct SpatialAnchor {
    pub pose: Transform3D,
}
