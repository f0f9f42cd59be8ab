use std::sync::Arc;

use crate::animation::controller::ClipController;
use crate::animation::frame_rate::FrameRate;
use crate::animation::tracks::{InterpolationMode, RawBoneTrack};
use crate::assets::path::AssetPath;
use crate::errors::Result;
use crate::skeleton::Skeleton;

// Frame positions this close to an integer are treated as that key.
const FRAME_SNAP_EPSILON: f64 = 1e-4;

#[derive(Debug, Clone, PartialEq)]
pub struct BoneAnimationTrack {
    pub bone_name: String,
    pub data: RawBoneTrack,
}

/// A skeletal animation sequence: uniformly sampled bone tracks bound to a
/// skeleton.
#[derive(Debug, Clone)]
pub struct AnimationClip {
    path: AssetPath,
    skeleton: Option<Arc<Skeleton>>,
    sample_rate: FrameRate,
    number_of_frames: usize,
    pub interpolation: InterpolationMode,
    pub(crate) tracks: Vec<BoneAnimationTrack>,
}

impl AnimationClip {
    pub fn new(
        path: AssetPath,
        skeleton: Option<Arc<Skeleton>>,
        sample_rate: FrameRate,
        number_of_frames: usize,
    ) -> Result<Self> {
        sample_rate.validate()?;
        Ok(Self {
            path,
            skeleton,
            sample_rate,
            number_of_frames,
            interpolation: InterpolationMode::Linear,
            tracks: Vec::new(),
        })
    }

    #[must_use]
    pub fn with_interpolation(mut self, interpolation: InterpolationMode) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Object name of the clip.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        self.path.object_name()
    }

    #[inline]
    #[must_use]
    pub fn path(&self) -> &AssetPath {
        &self.path
    }

    /// The skeleton this clip animates, if it resolves.
    #[inline]
    #[must_use]
    pub fn skeleton(&self) -> Option<&Arc<Skeleton>> {
        self.skeleton.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn sample_rate(&self) -> FrameRate {
        self.sample_rate
    }

    #[inline]
    #[must_use]
    pub fn number_of_frames(&self) -> usize {
        self.number_of_frames
    }

    /// Length in seconds: the time of the last key.
    #[must_use]
    pub fn play_length(&self) -> f64 {
        self.sample_rate
            .as_seconds(self.number_of_frames.saturating_sub(1))
    }

    /// Time of `frame` in seconds, clamped to `[0, play_length]`.
    #[must_use]
    pub fn time_at_frame(&self, frame: usize) -> f64 {
        let last = self.number_of_frames.saturating_sub(1);
        self.sample_rate.as_seconds(frame.min(last))
    }

    /// Fractional frame position of `time`, clamped to the key range.
    ///
    /// Times kept in `f64` map back onto whole frames exactly for any clip
    /// length a `usize` frame count can describe in practice.
    #[must_use]
    pub fn frame_at_time(&self, time: f64) -> f64 {
        let last = self.number_of_frames.saturating_sub(1) as f64;
        let pos = self.sample_rate.as_frame_time(time).clamp(0.0, last);
        let rounded = pos.round();
        if (pos - rounded).abs() < FRAME_SNAP_EPSILON {
            rounded
        } else {
            pos
        }
    }

    #[inline]
    #[must_use]
    pub fn bone_tracks(&self) -> &[BoneAnimationTrack] {
        &self.tracks
    }

    #[must_use]
    pub fn find_bone_track(&self, bone_name: &str) -> Option<&RawBoneTrack> {
        self.tracks
            .iter()
            .find(|t| t.bone_name == bone_name)
            .map(|t| &t.data)
    }

    /// Editing interface for this clip's bone tracks.
    pub fn controller(&mut self) -> ClipController<'_> {
        ClipController::new(self)
    }

    /// Copy of this clip living at `path`. Skeleton, timing and tracks are shared.
    #[must_use]
    pub fn duplicate(&self, path: AssetPath) -> Self {
        Self {
            path,
            ..self.clone()
        }
    }
}
