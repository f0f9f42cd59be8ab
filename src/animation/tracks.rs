use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::animation::values::Interpolatable;
use crate::skeleton::BoneTransform;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InterpolationMode {
    #[default]
    Linear,
    Step,
}

/// Uniformly sampled keys for one bone: one key per frame, or a single key
/// when the channel is constant for the whole clip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawBoneTrack {
    pub pos_keys: Vec<Vec3>,
    pub rot_keys: Vec<Quat>,
    pub scale_keys: Vec<Vec3>,
}

impl RawBoneTrack {
    #[must_use]
    pub fn new(pos_keys: Vec<Vec3>, rot_keys: Vec<Quat>, scale_keys: Vec<Vec3>) -> Self {
        Self {
            pos_keys,
            rot_keys,
            scale_keys,
        }
    }

    #[must_use]
    pub fn with_capacity(frames: usize) -> Self {
        Self {
            pos_keys: Vec::with_capacity(frames),
            rot_keys: Vec::with_capacity(frames),
            scale_keys: Vec::with_capacity(frames),
        }
    }

    /// Track holding `transform` for the whole clip.
    #[must_use]
    pub fn constant(transform: BoneTransform) -> Self {
        Self {
            pos_keys: vec![transform.translation],
            rot_keys: vec![transform.rotation],
            scale_keys: vec![transform.scale],
        }
    }

    pub fn push_key(&mut self, transform: &BoneTransform) {
        self.pos_keys.push(transform.translation);
        self.rot_keys.push(transform.rotation);
        self.scale_keys.push(transform.scale);
    }

    /// Number of frames covered by the position channel.
    #[inline]
    #[must_use]
    pub fn num_keys(&self) -> usize {
        self.pos_keys.len()
    }

    /// Every channel has either `num_frames` keys or exactly one.
    #[must_use]
    pub fn is_valid_for(&self, num_frames: usize) -> bool {
        let ok = |len: usize| len == num_frames || len == 1;
        ok(self.pos_keys.len()) && ok(self.rot_keys.len()) && ok(self.scale_keys.len())
    }

    /// Samples at a fractional frame position.
    ///
    /// Positions outside the key range clamp to the first/last key. Empty
    /// channels take their value from `fallback`.
    #[must_use]
    pub fn sample(
        &self,
        frame_pos: f64,
        interpolation: InterpolationMode,
        fallback: BoneTransform,
    ) -> BoneTransform {
        BoneTransform {
            translation: sample_keys(&self.pos_keys, frame_pos, interpolation)
                .unwrap_or(fallback.translation),
            rotation: sample_keys(&self.rot_keys, frame_pos, interpolation)
                .unwrap_or(fallback.rotation),
            scale: sample_keys(&self.scale_keys, frame_pos, interpolation)
                .unwrap_or(fallback.scale),
        }
    }
}

/// Samples a uniformly spaced key array at `frame_pos` (in frames).
pub fn sample_keys<T: Interpolatable>(
    keys: &[T],
    frame_pos: f64,
    interpolation: InterpolationMode,
) -> Option<T> {
    let len = keys.len();
    if len == 0 {
        return None;
    }
    // Fast path: constant channel
    if len == 1 || frame_pos <= 0.0 || frame_pos.is_nan() {
        return Some(keys[0]);
    }

    let last = len - 1;
    let index = (frame_pos.floor() as usize).min(last);
    if index >= last {
        return Some(keys[last]);
    }

    let t = (frame_pos - index as f64).clamp(0.0, 1.0) as f32;
    Some(match interpolation {
        InterpolationMode::Step => keys[index],
        InterpolationMode::Linear => {
            if t <= f32::EPSILON {
                keys[index]
            } else {
                T::interpolate_linear(keys[index], keys[index + 1], t)
            }
        }
    })
}
