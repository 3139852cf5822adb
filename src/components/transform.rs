//! 3D transforms for entities.
//!
//! [`Transform3D`] is the local transform of an entity: relative to its
//! [`ChildOf`](bevy_ecs::hierarchy::ChildOf) parent when it has one, world
//! space otherwise. [`GlobalTransform3D`] holds the composed world-space result
//! computed by [`propagate_transforms`](crate::systems::propagate_transforms::propagate_transforms).
//!
//! Composition is plain data in, plain data out so that hierarchy math can be
//! tested without a world.
//!
//! Conventions: Y is up, an unrotated object faces +Z and its right is +X.
//! Euler angles are degrees, applied yaw (Y) then pitch (X) then roll (Z).

use bevy_ecs::prelude::Component;
use glam::{EulerRot, Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Local position, orientation and scale of an entity.
#[derive(Component, Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform3D {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform3D {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn from_translation_rotation(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
            scale: Vec3::ONE,
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Local +Z axis in the parent space.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Local +Y axis in the parent space.
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Local +X axis in the parent space.
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Map a point from this transform's local space into its parent space.
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.translation + self.rotation * (point * self.scale)
    }

    /// Map a point from the parent space into this transform's local space.
    ///
    /// Scale axes equal to zero map to zero instead of producing infinities.
    pub fn inverse_transform_point(&self, point: Vec3) -> Vec3 {
        let unrotated = self.rotation.inverse() * (point - self.translation);
        Vec3::new(
            safe_div(unrotated.x, self.scale.x),
            safe_div(unrotated.y, self.scale.y),
            safe_div(unrotated.z, self.scale.z),
        )
    }

    /// Compose `child` (expressed in this transform's space) onto `self`.
    ///
    /// Scale is applied component-wise; non-uniform parent scale combined with
    /// a rotated child is approximated, not sheared.
    pub fn mul_transform(&self, child: &Transform3D) -> Transform3D {
        Transform3D {
            translation: self.transform_point(child.translation),
            rotation: (self.rotation * child.rotation).normalize(),
            scale: self.scale * child.scale,
        }
    }

    /// Express the world-space `world` transform relative to `self`.
    ///
    /// Inverse of [`Transform3D::mul_transform`]: `self.mul_transform(&self.relative(w)) == w`.
    pub fn relative(&self, world: &Transform3D) -> Transform3D {
        Transform3D {
            translation: self.inverse_transform_point(world.translation),
            rotation: (self.rotation.inverse() * world.rotation).normalize(),
            scale: Vec3::new(
                safe_div(world.scale.x, self.scale.x),
                safe_div(world.scale.y, self.scale.y),
                safe_div(world.scale.z, self.scale.z),
            ),
        }
    }
}

fn safe_div(a: f32, b: f32) -> f32 {
    if b.abs() <= f32::EPSILON { 0.0 } else { a / b }
}

/// Computed world-space transform for entities.
///
/// Managed by the transform propagation system. Roots mirror their local
/// [`Transform3D`]; children hold the composition of the full ancestor chain.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct GlobalTransform3D(pub Transform3D);

impl GlobalTransform3D {
    pub fn translation(&self) -> Vec3 {
        self.0.translation
    }

    pub fn scale(&self) -> Vec3 {
        self.0.scale
    }
}

/// Rotation from Euler angles in degrees: `pitch` about X, `yaw` about Y,
/// `roll` about Z.
pub fn euler_degrees(pitch: f32, yaw: f32, roll: f32) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        yaw.to_radians(),
        pitch.to_radians(),
        roll.to_radians(),
    )
}

/// Rotation from an Euler vector `(pitch, yaw, roll)` in degrees.
pub fn euler_vec_degrees(angles: Vec3) -> Quat {
    euler_degrees(angles.x, angles.y, angles.z)
}

/// Decompose a rotation into `(pitch, yaw, roll)` degrees, the inverse of
/// [`euler_degrees`].
pub fn to_euler_degrees(rotation: Quat) -> Vec3 {
    let (yaw, pitch, roll) = rotation.to_euler(EulerRot::YXZ);
    Vec3::new(pitch.to_degrees(), yaw.to_degrees(), roll.to_degrees())
}

/// Rotation whose +Z axis points along `forward` with +Y as close to `up` as
/// possible.
///
/// Degenerate inputs (zero forward, or forward parallel to up) fall back to
/// a rotation built around +X so the result is always a valid unit quaternion.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Quat {
    let Some(z) = forward.try_normalize() else {
        return Quat::IDENTITY;
    };
    let x = up
        .cross(z)
        .try_normalize()
        .or_else(|| Vec3::X.cross(z).cross(z).try_normalize())
        .unwrap_or(Vec3::X);
    let y = z.cross(x);
    Quat::from_mat3(&Mat3::from_cols(x, y, z)).normalize()
}
