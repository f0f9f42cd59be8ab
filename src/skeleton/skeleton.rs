use rustc_hash::FxHashMap;

use crate::errors::{MirrorError, Result};
use crate::skeleton::transform::BoneTransform;

#[derive(Debug, Clone, PartialEq)]
pub struct Bone {
    pub name: String,
    /// Index of the parent bone, `None` for a root.
    pub parent: Option<usize>,
    /// Local rest-pose transform, used for bones a clip does not animate.
    pub rest_pose: BoneTransform,
}

impl Bone {
    #[must_use]
    pub fn new(name: impl Into<String>, parent: Option<usize>, rest_pose: BoneTransform) -> Self {
        Self {
            name: name.into(),
            parent,
            rest_pose,
        }
    }

    #[must_use]
    pub fn root(name: impl Into<String>) -> Self {
        Self::new(name, None, BoneTransform::IDENTITY)
    }
}

/// Reference skeleton shared by every clip authored against it.
///
/// Bones are ordered so that ancestors precede descendants
/// (`parent(i) < i`), names are unique.
#[derive(Debug, Clone)]
pub struct Skeleton {
    name: String,
    bones: Vec<Bone>,
    name_lookup: FxHashMap<String, usize>,
}

impl Skeleton {
    pub fn new(name: impl Into<String>, bones: Vec<Bone>) -> Result<Self> {
        let name = name.into();
        let mut name_lookup = FxHashMap::default();
        name_lookup.reserve(bones.len());

        for (index, bone) in bones.iter().enumerate() {
            if bone.name.is_empty() {
                return Err(MirrorError::InvalidSkeleton(format!(
                    "{name}: bone {index} has an empty name"
                )));
            }
            if let Some(parent) = bone.parent
                && parent >= index
            {
                return Err(MirrorError::InvalidSkeleton(format!(
                    "{name}: bone '{}' ({index}) has parent {parent}, parents must precede children",
                    bone.name
                )));
            }
            if name_lookup.insert(bone.name.clone(), index).is_some() {
                return Err(MirrorError::InvalidSkeleton(format!(
                    "{name}: duplicate bone name '{}'",
                    bone.name
                )));
            }
        }

        Ok(Self {
            name,
            bones,
            name_lookup,
        })
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn num_bones(&self) -> usize {
        self.bones.len()
    }

    #[inline]
    #[must_use]
    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    #[inline]
    #[must_use]
    pub fn bone(&self, index: usize) -> Option<&Bone> {
        self.bones.get(index)
    }

    #[inline]
    #[must_use]
    pub fn bone_name(&self, index: usize) -> Option<&str> {
        self.bones.get(index).map(|b| b.name.as_str())
    }

    #[inline]
    #[must_use]
    pub fn parent_index(&self, index: usize) -> Option<usize> {
        self.bones.get(index).and_then(|b| b.parent)
    }

    #[inline]
    #[must_use]
    pub fn find_bone_index(&self, name: &str) -> Option<usize> {
        self.name_lookup.get(name).copied()
    }

    /// Adds any missing ancestors of the listed bones, then sorts the list
    /// so parents come before their children. Out-of-range indices are dropped.
    pub fn ensure_parents_exist_and_sort(&self, required: &mut Vec<usize>) {
        let mut present = vec![false; self.bones.len()];
        for &index in required.iter() {
            if let Some(slot) = present.get_mut(index) {
                *slot = true;
            }
        }

        // Walking downwards means each newly marked parent is visited later.
        for index in (0..self.bones.len()).rev() {
            if present[index]
                && let Some(parent) = self.bones[index].parent
            {
                present[parent] = true;
            }
        }

        required.clear();
        required.extend(
            present
                .iter()
                .enumerate()
                .filter_map(|(index, &p)| p.then_some(index)),
        );
    }
}
