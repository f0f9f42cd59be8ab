use std::sync::Arc;

use crate::skeleton::skeleton::Skeleton;
use crate::skeleton::transform::BoneTransform;

/// Dense index over the bones active in one evaluation context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompactBoneIndex(pub usize);

/// The set of skeleton bones a pose is evaluated for.
///
/// Maps skeleton (mesh) bone indices to compact indices and back. The required
/// list is kept parent-first, which pose evaluation relies on.
#[derive(Debug, Clone)]
pub struct BoneContainer {
    skeleton: Arc<Skeleton>,
    // compact -> skeleton
    bone_indices: Vec<usize>,
    // skeleton -> compact
    compact_lookup: Vec<Option<CompactBoneIndex>>,
}

impl BoneContainer {
    /// Builds a container for `required`, adding missing parents and sorting.
    #[must_use]
    pub fn new(mut required: Vec<usize>, skeleton: Arc<Skeleton>) -> Self {
        skeleton.ensure_parents_exist_and_sort(&mut required);

        let mut compact_lookup = vec![None; skeleton.num_bones()];
        for (compact, &bone) in required.iter().enumerate() {
            compact_lookup[bone] = Some(CompactBoneIndex(compact));
        }

        Self {
            skeleton,
            bone_indices: required,
            compact_lookup,
        }
    }

    /// Container over every bone of the skeleton.
    #[must_use]
    pub fn full(skeleton: Arc<Skeleton>) -> Self {
        let required = (0..skeleton.num_bones()).collect();
        Self::new(required, skeleton)
    }

    #[inline]
    #[must_use]
    pub fn skeleton(&self) -> &Arc<Skeleton> {
        &self.skeleton
    }

    #[inline]
    #[must_use]
    pub fn num_bones(&self) -> usize {
        self.bone_indices.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bone_indices.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn make_compact_index(&self, skeleton_index: usize) -> Option<CompactBoneIndex> {
        self.compact_lookup.get(skeleton_index).copied().flatten()
    }

    #[inline]
    #[must_use]
    pub fn skeleton_index(&self, compact: CompactBoneIndex) -> Option<usize> {
        self.bone_indices.get(compact.0).copied()
    }

    /// Compact index of the named bone, if the bone is part of this container.
    #[must_use]
    pub fn find_compact_index(&self, bone_name: &str) -> Option<CompactBoneIndex> {
        self.skeleton
            .find_bone_index(bone_name)
            .and_then(|index| self.make_compact_index(index))
    }

    #[must_use]
    pub fn bone_name(&self, compact: CompactBoneIndex) -> Option<&str> {
        self.skeleton_index(compact)
            .and_then(|index| self.skeleton.bone_name(index))
    }

    /// Skeleton indices in compact (parent-first) order.
    #[inline]
    #[must_use]
    pub fn bone_indices(&self) -> &[usize] {
        &self.bone_indices
    }

    pub fn compact_indices(&self) -> impl Iterator<Item = CompactBoneIndex> + '_ {
        (0..self.bone_indices.len()).map(CompactBoneIndex)
    }

    /// Rest-pose transforms in compact order.
    pub fn rest_pose(&self) -> impl Iterator<Item = BoneTransform> + '_ {
        self.bone_indices
            .iter()
            .map(|&index| self.skeleton.bones()[index].rest_pose)
    }
}
