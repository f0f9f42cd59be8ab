//! Serialized form of clip packages.
//!
//! The runtime types keep lookups and shared skeletons that have no place on
//! disk, so persistence goes through these plain documents instead.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::animation::{AnimationClip, BoneAnimationTrack, FrameRate, InterpolationMode, RawBoneTrack};
use crate::assets::path::AssetPath;
use crate::errors::{MirrorError, Result};
use crate::skeleton::{Bone, BoneTransform, Skeleton};

/// Current document format version.
pub const CLIP_DOCUMENT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoneDocument {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<usize>,
    #[serde(default)]
    pub rest_pose: BoneTransform,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkeletonDocument {
    pub name: String,
    pub bones: Vec<BoneDocument>,
}

impl SkeletonDocument {
    #[must_use]
    pub fn from_skeleton(skeleton: &Skeleton) -> Self {
        Self {
            name: skeleton.name().to_string(),
            bones: skeleton
                .bones()
                .iter()
                .map(|b| BoneDocument {
                    name: b.name.clone(),
                    parent: b.parent,
                    rest_pose: b.rest_pose,
                })
                .collect(),
        }
    }

    pub fn into_skeleton(self) -> Result<Skeleton> {
        let bones = self
            .bones
            .into_iter()
            .map(|b| Bone::new(b.name, b.parent, b.rest_pose))
            .collect();
        Skeleton::new(self.name, bones)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackDocument {
    pub bone: String,
    #[serde(flatten)]
    pub keys: RawBoneTrack,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipDocument {
    pub version: u32,
    pub package: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skeleton: Option<SkeletonDocument>,
    pub sample_rate: FrameRate,
    pub number_of_frames: usize,
    #[serde(default)]
    pub interpolation: InterpolationMode,
    #[serde(default)]
    pub tracks: Vec<TrackDocument>,
}

impl ClipDocument {
    #[must_use]
    pub fn from_clip(clip: &AnimationClip) -> Self {
        Self {
            version: CLIP_DOCUMENT_VERSION,
            package: clip.path().package().to_string(),
            name: clip.name().to_string(),
            skeleton: clip
                .skeleton()
                .map(|s| SkeletonDocument::from_skeleton(s)),
            sample_rate: clip.sample_rate(),
            number_of_frames: clip.number_of_frames(),
            interpolation: clip.interpolation,
            tracks: clip
                .bone_tracks()
                .iter()
                .map(|t| TrackDocument {
                    bone: t.bone_name.clone(),
                    keys: t.data.clone(),
                })
                .collect(),
        }
    }

    /// Rebuilds the clip, re-validating the skeleton and every track.
    pub fn into_clip(self) -> Result<AnimationClip> {
        let path = AssetPath::new(self.package, self.name)?;
        let skeleton = self
            .skeleton
            .map(SkeletonDocument::into_skeleton)
            .transpose()?
            .map(Arc::new);

        let mut clip = AnimationClip::new(path, skeleton, self.sample_rate, self.number_of_frames)?
            .with_interpolation(self.interpolation);

        for track in self.tracks {
            if !track.keys.is_valid_for(clip.number_of_frames()) {
                return Err(MirrorError::KeyCountMismatch {
                    bone: track.bone,
                    positions: track.keys.pos_keys.len(),
                    rotations: track.keys.rot_keys.len(),
                    scales: track.keys.scale_keys.len(),
                    frames: clip.number_of_frames(),
                });
            }
            if let Some(skeleton) = clip.skeleton()
                && skeleton.find_bone_index(&track.bone).is_none()
            {
                return Err(MirrorError::UnknownBone(track.bone));
            }
            clip.tracks.push(BoneAnimationTrack {
                bone_name: track.bone,
                data: track.keys,
            });
        }

        Ok(clip)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
