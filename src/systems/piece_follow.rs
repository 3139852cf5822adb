//! Pieces following their markers, and the placement prompt.
//!
//! While a piece is [`Following`](crate::components::piece::PieceState::Following)
//! and its marker is tracking, [`piece_follow_system`] eases the piece toward
//! the marker pose with an exponential approach. Position changes at or below
//! the follow threshold are treated as tracking jitter: the piece holds its
//! last stable position instead. Rotation always eases.
//!
//! [`placement_prompt_system`] keeps each visible [`PlacementPrompt`] above
//! its piece, turned to face the camera and projected to screen space.

use bevy_ecs::prelude::*;
use glam::{Quat, Vec3};

use crate::components::marker::TrackedMarker;
use crate::components::piece::{PROMPT_HEIGHT, Piece, PieceFollow, PlacementPrompt};
use crate::components::transform::{GlobalTransform3D, Transform3D, look_rotation};
use crate::resources::camera::ArCamera;
use crate::resources::worldtime::WorldTime;

/// Result of one follow step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FollowStep {
    pub position: Vec3,
    pub rotation: Quat,
    pub last_stable_position: Vec3,
}

/// Advance `current` toward `marker` by one frame of `dt` seconds.
pub fn follow_step(
    current: &Transform3D,
    last_stable_position: Vec3,
    marker: &Transform3D,
    follow: &PieceFollow,
    dt: f32,
) -> FollowStep {
    let (target_position, target_rotation) = follow.target_pose(marker);
    let t = (dt * follow.smoothness).clamp(0.0, 1.0);

    let (position, last_stable_position) =
        if current.translation.distance(target_position) > follow.position_threshold {
            let p = current.translation.lerp(target_position, t);
            (p, p)
        } else {
            (last_stable_position, last_stable_position)
        };

    FollowStep {
        position,
        rotation: current.rotation.slerp(target_rotation, t).normalize(),
        last_stable_position,
    }
}

pub fn piece_follow_system(
    time: Res<WorldTime>,
    mut pieces: Query<(&mut Piece, &PieceFollow, &mut Transform3D), Without<TrackedMarker>>,
    markers: Query<(&TrackedMarker, &Transform3D), Without<Piece>>,
) {
    for (mut piece, follow, mut transform) in pieces.iter_mut() {
        if !piece.is_following() {
            continue;
        }
        let Some(marker) = piece.marker() else {
            continue;
        };
        let Ok((tracked, marker_pose)) = markers.get(marker) else {
            continue;
        };
        if !tracked.is_tracking() {
            continue;
        }

        let step = follow_step(
            &transform,
            piece.last_stable_position,
            marker_pose,
            follow,
            time.delta,
        );
        transform.translation = step.position;
        transform.rotation = step.rotation;
        piece.last_stable_position = step.last_stable_position;
    }
}

/// Update the anchor, facing and screen position of visible prompts.
pub fn placement_prompt_system(
    camera: Option<Res<ArCamera>>,
    mut prompts: Query<(&mut PlacementPrompt, &GlobalTransform3D)>,
) {
    for (mut prompt, global) in prompts.iter_mut() {
        if !prompt.visible {
            continue;
        }
        prompt.world_position = global.translation() + Vec3::Y * PROMPT_HEIGHT;
        match camera.as_deref() {
            Some(camera) => {
                prompt.facing =
                    look_rotation(prompt.world_position - camera.position(), Vec3::Y);
                prompt.screen_position = camera.world_to_screen(prompt.world_position);
            }
            None => prompt.screen_position = None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_large_move_eases_toward_target() {
        let follow = PieceFollow::default();
        let marker = Transform3D::from_translation(Vec3::new(1.0, 0.0, 0.0));
        let current = Transform3D::IDENTITY;
        // dt * smoothness = 0.02 * 25 = 0.5
        let step = follow_step(&current, Vec3::ZERO, &marker, &follow, 0.02);
        let target = Vec3::new(1.0, 0.1, 0.0);
        assert!((step.position - target * 0.5).length() < 1e-5);
        assert_eq!(step.last_stable_position, step.position);
    }

    #[test]
    fn test_jitter_holds_last_stable_position() {
        let follow = PieceFollow::default();
        let stable = Vec3::new(0.0, 0.1, 0.0);
        let current = Transform3D::from_translation(stable);
        let marker = Transform3D::from_translation(Vec3::new(0.002, 0.0, 0.0));
        let step = follow_step(&current, stable, &marker, &follow, 0.02);
        assert_eq!(step.position, stable);
        assert_eq!(step.last_stable_position, stable);
    }

    #[test]
    fn test_long_frame_snaps_to_target() {
        let follow = PieceFollow::default();
        let marker = Transform3D::from_translation(Vec3::new(0.0, 0.0, 2.0))
            .with_rotation(Quat::from_rotation_y(1.0));
        let step = follow_step(&Transform3D::IDENTITY, Vec3::ZERO, &marker, &follow, 1.0);
        let (target_position, target_rotation) = follow.target_pose(&marker);
        assert!((step.position - target_position).length() < 1e-5);
        assert!(step.rotation.angle_between(target_rotation) < 1e-3);
    }

    #[test]
    fn test_prompt_faces_away_from_camera() {
        let mut world = World::new();
        world.insert_resource(ArCamera::default());
        let piece = world
            .spawn((
                PlacementPrompt {
                    visible: true,
                    ..PlacementPrompt::default()
                },
                GlobalTransform3D(Transform3D::from_translation(Vec3::new(0.0, -0.2, 1.0))),
            ))
            .id();
        let mut schedule = Schedule::default();
        schedule.add_systems(placement_prompt_system);
        schedule.run(&mut world);

        let prompt = world.get::<PlacementPrompt>(piece).unwrap();
        assert!((prompt.world_position - Vec3::new(0.0, 0.0, 1.0)).length() < 1e-5);
        assert!((prompt.facing * Vec3::Z - Vec3::Z).length() < 1e-4);
        let screen = prompt.screen_position.unwrap();
        assert!((screen - glam::Vec2::new(540.0, 960.0)).length() < 1e-2);
    }
}
