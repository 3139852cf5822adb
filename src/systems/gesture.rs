//! Touch gestures on the placed board.
//!
//! - One finger dragging rotates the board. Horizontal motion turns it about
//!   the vertical axis, vertical motion tilts it. Both angles accumulate in
//!   [`BoardSession`] and the rotation is rebuilt from them each frame, so
//!   drift cannot build up.
//! - Two fingers pinching scale the board uniformly within the configured
//!   bounds.
//!
//! Gestures are ignored while the board runs a recenter or reset animation.

use bevy_ecs::prelude::*;
use glam::{Vec2, Vec3};

use crate::components::board::Board;
use crate::components::transform::{Transform3D, euler_degrees};
use crate::components::tween::PoseTween;
use crate::resources::gameconfig::{GameConfig, GestureSettings};
use crate::resources::session::BoardSession;
use crate::resources::touch::{TouchContact, TouchInput, TouchPhase};
use crate::resources::worldtime::WorldTime;

/// New `(yaw, pitch)` after dragging by `delta` pixels over `dt` seconds.
pub fn drag_rotation(
    yaw: f32,
    pitch: f32,
    delta: Vec2,
    dt: f32,
    settings: &GestureSettings,
) -> (f32, f32) {
    let d = delta * settings.rotation_speed * dt;
    let mut yaw = yaw - d.x;
    if let Some(max) = settings.max_rotation_angle {
        yaw = yaw.clamp(-max, max);
    }
    let max_pitch = settings.max_vertical_angle;
    let pitch = (pitch + d.y).clamp(-max_pitch, max_pitch);
    (yaw, pitch)
}

/// New scale after a two-finger pinch.
///
/// The change in finger distance since the previous frame, times the
/// sensitivity, is added to every axis; each axis is then clamped.
pub fn pinch_scale(
    scale: Vec3,
    a: &TouchContact,
    b: &TouchContact,
    settings: &GestureSettings,
) -> Vec3 {
    let current = a.position.distance(b.position);
    let previous = a.previous_position().distance(b.previous_position());
    let change = (current - previous) * settings.scale_sensitivity;
    (scale + Vec3::splat(change)).clamp(
        Vec3::splat(settings.min_scale),
        Vec3::splat(settings.max_scale),
    )
}

/// Apply the current frame's touches to the board.
pub fn board_gesture_system(
    touches: Res<TouchInput>,
    time: Res<WorldTime>,
    config: Res<GameConfig>,
    mut session: ResMut<BoardSession>,
    mut boards: Query<&mut Transform3D, (With<Board>, Without<PoseTween>)>,
) {
    let Some(board) = session.board() else {
        return;
    };
    let Ok(mut transform) = boards.get_mut(board) else {
        return;
    };
    let settings = &config.gesture;

    match touches.contacts.as_slice() {
        [touch] => {
            if !settings.allow_rotation || touch.phase != TouchPhase::Moved {
                return;
            }
            let (yaw, pitch) =
                drag_rotation(session.yaw, session.pitch, touch.delta, time.delta, settings);
            session.yaw = yaw;
            session.pitch = pitch;
            transform.rotation = euler_degrees(pitch, yaw, 0.0);
        }
        [a, b] => {
            let scale = pinch_scale(transform.scale, a, b, settings);
            if scale != transform.scale {
                transform.scale = scale;
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(id: u64, position: Vec2, delta: Vec2) -> TouchContact {
        TouchContact {
            id,
            position,
            delta,
            phase: TouchPhase::Moved,
        }
    }

    #[test]
    fn test_drag_turns_and_tilts() {
        let settings = GestureSettings::default();
        let (yaw, pitch) = drag_rotation(0.0, 0.0, Vec2::new(10.0, 5.0), 0.1, &settings);
        assert!((yaw + 20.0).abs() < 1e-4);
        assert!((pitch - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let settings = GestureSettings {
            max_vertical_angle: 45.0,
            ..GestureSettings::default()
        };
        let (_, pitch) = drag_rotation(40.0, 40.0, Vec2::new(0.0, 100.0), 0.1, &settings);
        assert_eq!(pitch, 45.0);
        let (_, pitch) = drag_rotation(0.0, -40.0, Vec2::new(0.0, -100.0), 0.1, &settings);
        assert_eq!(pitch, -45.0);
    }

    #[test]
    fn test_optional_yaw_clamp() {
        let free = GestureSettings::default();
        let (yaw, _) = drag_rotation(0.0, 0.0, Vec2::new(-100.0, 0.0), 0.1, &free);
        assert!((yaw - 200.0).abs() < 1e-3);

        let clamped = GestureSettings {
            max_rotation_angle: Some(30.0),
            ..GestureSettings::default()
        };
        let (yaw, _) = drag_rotation(0.0, 0.0, Vec2::new(-100.0, 0.0), 0.1, &clamped);
        assert_eq!(yaw, 30.0);
    }

    #[test]
    fn test_pinch_spread_grows_and_clamps() {
        let settings = GestureSettings::default();
        // fingers moved apart by 20 pixels each: distance 100 -> 140
        let a = contact(0, Vec2::new(0.0, 0.0), Vec2::new(-20.0, 0.0));
        let b = contact(1, Vec2::new(140.0, 0.0), Vec2::new(20.0, 0.0));
        let scale = pinch_scale(Vec3::ONE, &a, &b, &settings);
        assert!((scale - Vec3::splat(1.4)).length() < 1e-4);

        let scale = pinch_scale(Vec3::splat(1.9), &a, &b, &settings);
        assert_eq!(scale, Vec3::splat(settings.max_scale));
    }

    #[test]
    fn test_pinch_never_goes_below_min() {
        let settings = GestureSettings::default();
        let a = contact(0, Vec2::new(40.0, 0.0), Vec2::new(40.0, 0.0));
        let b = contact(1, Vec2::new(60.0, 0.0), Vec2::new(-40.0, 0.0));
        let scale = pinch_scale(Vec3::splat(0.3), &a, &b, &settings);
        assert_eq!(scale, Vec3::splat(settings.min_scale));
    }
}
