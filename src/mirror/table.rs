use std::path::Path;

use bitflags::bitflags;
use glam::{Quat, Vec3};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::skeleton::Skeleton;

bitflags! {
    /// Axes whose translation component is negated.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct AxisFlags: u8 {
        const X = 1 << 0;
        const Y = 1 << 1;
        const Z = 1 << 2;
    }
}

impl AxisFlags {
    #[must_use]
    pub fn apply(self, v: Vec3) -> Vec3 {
        let sign = |axis: AxisFlags| if self.contains(axis) { -1.0 } else { 1.0 };
        Vec3::new(v.x * sign(Self::X), v.y * sign(Self::Y), v.z * sign(Self::Z))
    }
}

/// Normal of the plane a rotation is reflected across.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MirrorAxis {
    #[default]
    None,
    X,
    Y,
    Z,
}

impl MirrorAxis {
    /// Reflects `q` across the plane perpendicular to this axis.
    ///
    /// The component along the axis is kept, the other two imaginary parts
    /// flip sign. Length is preserved exactly.
    #[must_use]
    pub fn mirror_rotation(self, q: Quat) -> Quat {
        match self {
            Self::None => q,
            Self::X => Quat::from_xyzw(q.x, -q.y, -q.z, q.w),
            Self::Y => Quat::from_xyzw(-q.x, q.y, -q.z, q.w),
            Self::Z => Quat::from_xyzw(-q.x, -q.y, q.z, q.w),
        }
    }

    /// Position flags matching a full reflection across this axis' plane.
    #[must_use]
    pub fn position_flags(self) -> AxisFlags {
        match self {
            Self::None => AxisFlags::empty(),
            Self::X => AxisFlags::X,
            Self::Y => AxisFlags::Y,
            Self::Z => AxisFlags::Z,
        }
    }
}

/// One row of a mirror table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MirrorEntry {
    pub name: String,
    pub mirrored_name: String,
    #[serde(default)]
    pub position_flip: AxisFlags,
    #[serde(default)]
    pub rotation_mirror: MirrorAxis,
}

impl MirrorEntry {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        mirrored_name: impl Into<String>,
        position_flip: AxisFlags,
        rotation_mirror: MirrorAxis,
    ) -> Self {
        Self {
            name: name.into(),
            mirrored_name: mirrored_name.into(),
            position_flip,
            rotation_mirror,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct MirrorTableDocument {
    entries: Vec<MirrorEntry>,
}

/// Bone-name remapping plus per-bone flip rules.
///
/// Bones without an entry map onto themselves, unflipped.
#[derive(Debug, Clone, Default)]
pub struct MirrorTable {
    entries: Vec<MirrorEntry>,
    lookup: FxHashMap<String, usize>,
}

impl MirrorTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_entry(mut self, entry: MirrorEntry) -> Self {
        self.insert(entry);
        self
    }

    /// Inserts `entry`, returning the entry it replaced.
    pub fn insert(&mut self, entry: MirrorEntry) -> Option<MirrorEntry> {
        if let Some(&index) = self.lookup.get(&entry.name) {
            return Some(std::mem::replace(&mut self.entries[index], entry));
        }
        self.lookup.insert(entry.name.clone(), self.entries.len());
        self.entries.push(entry);
        None
    }

    #[inline]
    #[must_use]
    pub fn get(&self, bone_name: &str) -> Option<&MirrorEntry> {
        self.lookup.get(bone_name).map(|&i| &self.entries[i])
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MirrorEntry> {
        self.entries.iter()
    }

    /// Builds a table for `skeleton` by swapping name tokens, e.g. `("_l", "_r")`.
    /// Each pair is tried in both directions.
    ///
    /// Every bone gets an entry with the given flips. Bones whose swapped name
    /// does not exist in the skeleton (spine, head...) map onto themselves.
    #[must_use]
    pub fn from_name_swaps(
        skeleton: &Skeleton,
        swaps: &[(&str, &str)],
        position_flip: AxisFlags,
        rotation_mirror: MirrorAxis,
    ) -> Self {
        let mut table = Self::new();
        for bone in skeleton.bones() {
            let mirrored = swaps
                .iter()
                .flat_map(|&(a, b)| [swap_token(&bone.name, a, b), swap_token(&bone.name, b, a)])
                .flatten()
                .find(|candidate| skeleton.find_bone_index(candidate).is_some())
                .unwrap_or_else(|| bone.name.clone());

            table.insert(MirrorEntry::new(
                bone.name.clone(),
                mirrored,
                position_flip,
                rotation_mirror,
            ));
        }
        table
    }

    /// True if mapping twice returns every entry to itself with the same flips.
    #[must_use]
    pub fn is_self_inverse(&self) -> bool {
        self.entries.iter().all(|entry| match self.get(&entry.mirrored_name) {
            Some(back) => {
                back.mirrored_name == entry.name
                    && back.position_flip == entry.position_flip
                    && back.rotation_mirror == entry.rotation_mirror
            }
            // An unlisted target maps onto itself, unflipped
            None => false,
        })
    }

    /// Entries naming a bone, or a mirrored bone, missing from `skeleton`.
    pub fn unresolved_entries<'a>(
        &'a self,
        skeleton: &'a Skeleton,
    ) -> impl Iterator<Item = &'a MirrorEntry> + 'a {
        self.entries.iter().filter(move |e| {
            skeleton.find_bone_index(&e.name).is_none()
                || skeleton.find_bone_index(&e.mirrored_name).is_none()
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let document: MirrorTableDocument = serde_json::from_str(json)?;
        let mut table = Self::new();
        for entry in document.entries {
            table.insert(entry);
        }
        Ok(table)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json(&self) -> Result<String> {
        let document = MirrorTableDocument {
            entries: self.entries.clone(),
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }
}

fn swap_token(name: &str, from: &str, to: &str) -> Option<String> {
    if from.is_empty() {
        return None;
    }
    if let Some(stem) = name.strip_suffix(from) {
        return Some(format!("{stem}{to}"));
    }
    if let Some(rest) = name.strip_prefix(from) {
        return Some(format!("{to}{rest}"));
    }
    name.contains(from).then(|| name.replacen(from, to, 1))
}

#[cfg(test)]
mod tests {
    use super::swap_token;

    #[test]
    fn swap_token_prefers_suffix_then_prefix() {
        assert_eq!(swap_token("hand_l", "_l", "_r").as_deref(), Some("hand_r"));
        assert_eq!(swap_token("l_hand", "l_", "r_").as_deref(), Some("r_hand"));
        assert_eq!(swap_token("upper_l_arm", "_l", "_r").as_deref(), Some("upper_r_arm"));
        assert_eq!(swap_token("spine", "_l", "_r"), None);
        assert_eq!(swap_token("spine", "", "_r"), None);
    }
}
