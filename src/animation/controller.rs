use glam::{Quat, Vec3};

use crate::animation::clip::{AnimationClip, BoneAnimationTrack};
use crate::animation::tracks::RawBoneTrack;
use crate::errors::{MirrorError, Result};

/// Editing interface over a clip's bone tracks.
pub trait AnimationDataController {
    /// Adds an empty track for `bone_name`. Returns `false` if one already exists.
    fn add_bone_track(&mut self, bone_name: &str) -> Result<bool>;

    /// Replaces all keys of an existing track in one call.
    fn set_bone_track_keys(
        &mut self,
        bone_name: &str,
        pos_keys: &[Vec3],
        rot_keys: &[Quat],
        scale_keys: &[Vec3],
    ) -> Result<()>;

    /// Removes the track for `bone_name`. Returns `false` if there was none.
    fn remove_bone_track(&mut self, bone_name: &str) -> bool;

    fn remove_all_bone_tracks(&mut self);
}

/// [`AnimationDataController`] operating directly on an [`AnimationClip`].
pub struct ClipController<'a> {
    clip: &'a mut AnimationClip,
}

impl<'a> ClipController<'a> {
    pub(crate) fn new(clip: &'a mut AnimationClip) -> Self {
        Self { clip }
    }

    fn check_bone(&self, bone_name: &str) -> Result<()> {
        match self.clip.skeleton() {
            Some(skeleton) if skeleton.find_bone_index(bone_name).is_none() => {
                Err(MirrorError::UnknownBone(bone_name.to_string()))
            }
            _ => Ok(()),
        }
    }
}

impl AnimationDataController for ClipController<'_> {
    fn add_bone_track(&mut self, bone_name: &str) -> Result<bool> {
        self.check_bone(bone_name)?;
        if self.clip.find_bone_track(bone_name).is_some() {
            return Ok(false);
        }
        self.clip.tracks.push(BoneAnimationTrack {
            bone_name: bone_name.to_string(),
            data: RawBoneTrack::default(),
        });
        Ok(true)
    }

    fn set_bone_track_keys(
        &mut self,
        bone_name: &str,
        pos_keys: &[Vec3],
        rot_keys: &[Quat],
        scale_keys: &[Vec3],
    ) -> Result<()> {
        let frames = self.clip.number_of_frames();
        let data = RawBoneTrack::new(pos_keys.to_vec(), rot_keys.to_vec(), scale_keys.to_vec());

        let same_length = pos_keys.len() == rot_keys.len() && pos_keys.len() == scale_keys.len();
        if !same_length || !data.is_valid_for(frames) {
            return Err(MirrorError::KeyCountMismatch {
                bone: bone_name.to_string(),
                positions: pos_keys.len(),
                rotations: rot_keys.len(),
                scales: scale_keys.len(),
                frames,
            });
        }

        let track = self
            .clip
            .tracks
            .iter_mut()
            .find(|t| t.bone_name == bone_name)
            .ok_or_else(|| MirrorError::TrackNotFound(bone_name.to_string()))?;
        track.data = data;
        Ok(())
    }

    fn remove_bone_track(&mut self, bone_name: &str) -> bool {
        let before = self.clip.tracks.len();
        self.clip.tracks.retain(|t| t.bone_name != bone_name);
        self.clip.tracks.len() != before
    }

    fn remove_all_bone_tracks(&mut self) {
        self.clip.tracks.clear();
    }
}
