//! Pose tween component for animated board moves.
//!
//! A [`PoseTween`] animates an entity's [`Transform3D`] from a start pose to a
//! target pose over a fixed duration. The tween is plain data: it records
//! when it started, and sampling or completion checks are pure functions of
//! the current world time. See [`crate::systems::tween`] for the update
//! system.

use bevy_ecs::prelude::Component;

use crate::components::transform::Transform3D;

/// Easing functions for smooth interpolation.
///
/// These functions transform a linear `t` value (0.0 to 1.0) to create
/// different acceleration/deceleration curves.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Easing {
    /// Constant speed (no easing).
    Linear,
    /// Hermite `t * t * (3 - 2t)`, slow start and end.
    SmoothStep,
}

/// What requested the tween; used to update the gesture accumulators when
/// it completes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TweenPurpose {
    Recenter,
    Reset,
}

/// Animates an entity's [`Transform3D`] between two poses.
#[derive(Component, Clone, Debug)]
pub struct PoseTween {
    /// Pose at the start of the animation.
    pub from: Transform3D,
    /// Pose reached at the end.
    pub to: Transform3D,
    /// World time at which the tween started, in seconds.
    pub start_time: f32,
    /// Duration in seconds.
    pub duration: f32,
    /// Easing function to use.
    pub easing: Easing,
    pub purpose: TweenPurpose,
}

impl PoseTween {
    pub fn new(
        from: Transform3D,
        to: Transform3D,
        start_time: f32,
        duration: f32,
        purpose: TweenPurpose,
    ) -> Self {
        PoseTween {
            from,
            to,
            start_time,
            duration,
            easing: Easing::Linear,
            purpose,
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Linear progress in `[0, 1]` at world time `now`.
    ///
    /// Zero or negative durations complete immediately.
    pub fn progress(&self, now: f32) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.start_time) / self.duration).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self, now: f32) -> bool {
        self.progress(now) >= 1.0
    }

    /// Interpolated pose at world time `now`; exactly `to` once finished.
    pub fn sample(&self, now: f32) -> Transform3D {
        if self.is_finished(now) {
            return self.to;
        }
        let t = ease(self.easing, self.progress(now));
        Transform3D {
            translation: self.from.translation.lerp(self.to.translation, t),
            rotation: self.from.rotation.slerp(self.to.rotation, t),
            scale: self.from.scale.lerp(self.to.scale, t),
        }
    }
}

/// Apply an easing function to a normalized time value.
///
/// The input `t` is clamped to [0.0, 1.0] and transformed according to the
/// easing curve.
pub fn ease(e: Easing, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    match e {
        Easing::Linear => t,
        Easing::SmoothStep => t * t * (3.0 - 2.0 * t),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::transform::euler_degrees;
    use glam::Vec3;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    const ALL: [Easing; 2] = [Easing::Linear, Easing::SmoothStep];

    // ==================== EASING FUNCTION TESTS ====================

    #[test]
    fn test_ease_endpoints() {
        for easing in ALL {
            assert!(approx_eq(ease(easing, 0.0), 0.0), "{:?} at 0", easing);
            assert!(approx_eq(ease(easing, 1.0), 1.0), "{:?} at 1", easing);
        }
    }

    #[test]
    fn test_ease_clamps_input() {
        for easing in ALL {
            assert!(approx_eq(ease(easing, -3.0), 0.0));
            assert!(approx_eq(ease(easing, 7.0), 1.0));
        }
    }

    #[test]
    fn test_smoothstep_midpoint_and_quarter() {
        assert!(approx_eq(ease(Easing::SmoothStep, 0.5), 0.5));
        assert!(approx_eq(ease(Easing::SmoothStep, 0.25), 0.15625));
    }

    #[test]
    fn test_ease_monotonic() {
        for easing in ALL {
            let mut prev = 0.0;
            for i in 1..=20 {
                let v = ease(easing, i as f32 / 20.0);
                assert!(v + EPSILON >= prev, "{:?} must not decrease", easing);
                prev = v;
            }
        }
    }

    // ==================== POSE TWEEN TESTS ====================

    fn sample_tween() -> PoseTween {
        let from = Transform3D::from_translation(Vec3::ZERO).with_scale(Vec3::splat(2.0));
        let to = Transform3D::from_translation(Vec3::new(0.0, 0.0, 1.0))
            .with_rotation(euler_degrees(0.0, 90.0, 0.0));
        PoseTween::new(from, to, 10.0, 0.5, TweenPurpose::Recenter)
    }

    #[test]
    fn test_progress_is_pure_function_of_time() {
        let tw = sample_tween();
        assert!(approx_eq(tw.progress(10.0), 0.0));
        assert!(approx_eq(tw.progress(10.25), 0.5));
        assert!(approx_eq(tw.progress(9.0), 0.0));
        assert!(approx_eq(tw.progress(11.0), 1.0));
        assert!(!tw.is_finished(10.49));
        assert!(tw.is_finished(10.5));
    }

    #[test]
    fn test_sample_halfway_linear() {
        let tw = sample_tween();
        let mid = tw.sample(10.25);
        assert!((mid.translation - Vec3::new(0.0, 0.0, 0.5)).length() < 1e-4);
        assert!((mid.scale - Vec3::splat(1.5)).length() < 1e-4);
        assert!(
            mid.rotation
                .angle_between(euler_degrees(0.0, 45.0, 0.0))
                < 1e-3
        );
    }

    #[test]
    fn test_sample_finished_is_exact_target() {
        let tw = sample_tween().with_easing(Easing::SmoothStep);
        assert_eq!(tw.sample(20.0), tw.to);
    }

    #[test]
    fn test_zero_duration_finishes_immediately() {
        let mut tw = sample_tween();
        tw.duration = 0.0;
        assert!(tw.is_finished(10.0));
        assert_eq!(tw.sample(10.0), tw.to);
    }
}
