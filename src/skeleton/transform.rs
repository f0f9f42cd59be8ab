use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// A bone's transform relative to its parent.
///
/// Plain TRS data with no matrix cache; poses hold thousands of these and are
/// rebuilt every frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoneTransform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl BoneTransform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    #[must_use]
    pub fn new(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    #[must_use]
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    #[must_use]
    pub fn from_rotation(rotation: Quat) -> Self {
        Self {
            rotation,
            ..Self::IDENTITY
        }
    }

    /// Returns true if `| |rotation| - 1 | <= tolerance`.
    #[inline]
    #[must_use]
    pub fn is_rotation_normalized(&self, tolerance: f32) -> bool {
        (self.rotation.length() - 1.0).abs() <= tolerance
    }

    /// Component-wise comparison within `epsilon`.
    ///
    /// Rotations compare as orientations, so `q` and `-q` are equal.
    #[must_use]
    pub fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        let rotation_eq = self.rotation.abs_diff_eq(other.rotation, epsilon)
            || self.rotation.abs_diff_eq(-other.rotation, epsilon);

        rotation_eq
            && self.translation.abs_diff_eq(other.translation, epsilon)
            && self.scale.abs_diff_eq(other.scale, epsilon)
    }
}

impl Default for BoneTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
