//! Scale adjuster system.
use bevy_ecs::prelude::*;

use crate::components::scale::ScaleAdjuster;
use crate::components::transform::Transform3D;

/// Write `base_scale * multiplier` into the local scale of every adjusted
/// entity whose scale differs.
pub fn scale_adjuster_system(mut query: Query<(&ScaleAdjuster, &mut Transform3D)>) {
    for (adjuster, mut transform) in query.iter_mut() {
        let scale = adjuster.scale();
        if transform.scale != scale {
            transform.scale = scale;
        }
    }
}
