use std::ops::{Index, IndexMut};

use crate::skeleton::container::{BoneContainer, CompactBoneIndex};
use crate::skeleton::transform::BoneTransform;

/// Local-space transforms for every bone of a [`BoneContainer`], indexed by
/// compact bone index.
///
/// Lives for a single frame's computation and is never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Pose {
    transforms: Vec<BoneTransform>,
}

impl Pose {
    /// Pose initialised to the container's rest pose.
    #[must_use]
    pub fn rest(bones: &BoneContainer) -> Self {
        Self {
            transforms: bones.rest_pose().collect(),
        }
    }

    #[must_use]
    pub fn from_transforms(transforms: Vec<BoneTransform>) -> Self {
        Self { transforms }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, index: CompactBoneIndex) -> Option<&BoneTransform> {
        self.transforms.get(index.0)
    }

    #[inline]
    #[must_use]
    pub fn transforms(&self) -> &[BoneTransform] {
        &self.transforms
    }
}

impl Index<CompactBoneIndex> for Pose {
    type Output = BoneTransform;

    #[inline]
    fn index(&self, index: CompactBoneIndex) -> &Self::Output {
        &self.transforms[index.0]
    }
}

impl IndexMut<CompactBoneIndex> for Pose {
    #[inline]
    fn index_mut(&mut self, index: CompactBoneIndex) -> &mut Self::Output {
        &mut self.transforms[index.0]
    }
}
