//! Pose tween system.
//!
//! Advances every [`PoseTween`] from the current world time and removes it
//! once the target pose is reached. When the animated entity is the session
//! board, the drag-rotation accumulators are resynchronized with the final
//! pose so the next gesture continues from where the animation left off.
//!
//! While a recenter is in flight, each intermediate pose is dropped onto the
//! ground under it, so the board slides along detected surfaces instead of
//! cutting through them.

use bevy_ecs::prelude::*;
use glam::Vec3;
use log::debug;

use crate::components::transform::{Transform3D, to_euler_degrees};
use crate::components::tween::{PoseTween, TweenPurpose};
use crate::resources::gameconfig::{GameConfig, RecenterSettings};
use crate::resources::raycast::Raycaster;
use crate::resources::session::BoardSession;
use crate::resources::worldtime::WorldTime;

/// Yaw and pitch to continue dragging from after a tween ends.
///
/// A reset lands on the configured pitch and keeps the yaw. A recenter reads
/// both angles back from the target rotation.
pub fn accumulators_after(
    purpose: TweenPurpose,
    target: &Transform3D,
    yaw: f32,
    reset_pitch: f32,
    max_pitch: f32,
) -> (f32, f32) {
    match purpose {
        TweenPurpose::Reset => (yaw, reset_pitch.clamp(-max_pitch, max_pitch)),
        TweenPurpose::Recenter => {
            let euler = to_euler_degrees(target.rotation);
            (euler.y, euler.x.clamp(-max_pitch, max_pitch))
        }
    }
}

/// `position` lifted or lowered onto the first ground hit below it.
///
/// The ray starts one meter above `position`; without a hit the position is
/// returned unchanged.
pub fn snap_to_ground(
    position: Vec3,
    raycaster: &Raycaster,
    settings: &RecenterSettings,
) -> Vec3 {
    let hit = raycaster.raycast(
        position + Vec3::Y,
        Vec3::NEG_Y,
        settings.ground_check_distance,
    );
    match hit {
        Some(hit) => Vec3::new(
            position.x,
            hit.point.y + settings.ground_clearance,
            position.z,
        ),
        None => position,
    }
}

pub fn pose_tween_system(
    mut commands: Commands,
    time: Res<WorldTime>,
    config: Res<GameConfig>,
    raycaster: Option<Res<Raycaster>>,
    mut session: ResMut<BoardSession>,
    mut query: Query<(Entity, &PoseTween, &mut Transform3D)>,
) {
    for (entity, tween, mut transform) in query.iter_mut() {
        let mut pose = tween.sample(time.elapsed);
        if !tween.is_finished(time.elapsed) {
            if let (TweenPurpose::Recenter, Some(raycaster)) =
                (tween.purpose, raycaster.as_deref())
            {
                pose.translation = snap_to_ground(pose.translation, raycaster, &config.recenter);
            }
            *transform = pose;
            continue;
        }
        *transform = pose;
        commands.entity(entity).remove::<PoseTween>();
        if session.board() == Some(entity) {
            let (yaw, pitch) = accumulators_after(
                tween.purpose,
                &tween.to,
                session.yaw,
                config.recenter.reset_pitch,
                config.gesture.max_vertical_angle,
            );
            session.yaw = yaw;
            session.pitch = pitch;
        }
        debug!("{:?} animation finished on {:?}", tween.purpose, entity);
    }
}
