//! The only mutable per-instance state.

use glam::{EulerRot, Mat4, Quat, Vec3};

/// Position, Euler rotation (XYZ order, radians) and uniform scale.
///
/// These three fields are the source of truth; a matrix is only derived when
/// the frame is written out, so nothing is ever decomposed back.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LiveTransform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale:    f32,
}

impl LiveTransform {
    pub fn new(position: Vec3, rotation: Vec3, scale: f32) -> Self {
        LiveTransform { position, rotation, scale }
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.rotation.is_finite() && self.scale.is_finite()
    }

    pub fn quat(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    /// Scale, then rotate, then translate.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(Vec3::splat(self.scale), self.quat(), self.position)
    }
}
