use crate::mirror::table::{AxisFlags, MirrorAxis, MirrorTable};
use crate::skeleton::{BoneContainer, BoneTransform, CompactBoneIndex, Pose};

/// Reflects a whole local pose according to a mirror table.
pub trait PoseMirror {
    /// Returns the mirrored pose. `pose` is only read, so every bone sees the
    /// un-mirrored source values.
    fn mirror_pose(&self, pose: &Pose, bones: &BoneContainer, table: &MirrorTable) -> Pose;
}

/// Per-bone rule resolved against a bone container.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ResolvedMirror {
    source: CompactBoneIndex,
    position_flip: AxisFlags,
    rotation_mirror: MirrorAxis,
}

impl ResolvedMirror {
    fn apply(&self, transform: BoneTransform) -> BoneTransform {
        BoneTransform {
            translation: self.position_flip.apply(transform.translation),
            rotation: self.rotation_mirror.mirror_rotation(transform.rotation),
            scale: transform.scale,
        }
    }
}

/// Table-driven mirror: bone `b` takes the transform of its mirrored bone,
/// with that entry's translation axes negated and rotation reflected.
///
/// A mirrored bone missing from the container falls back to `b` itself
/// (flips still apply). Bones without an entry are copied unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableMirror;

impl TableMirror {
    fn resolve(bones: &BoneContainer, table: &MirrorTable) -> Vec<Option<ResolvedMirror>> {
        bones
            .compact_indices()
            .map(|compact| {
                let name = bones.bone_name(compact)?;
                let entry = table.get(name)?;
                let source = bones
                    .find_compact_index(&entry.mirrored_name)
                    .unwrap_or(compact);
                Some(ResolvedMirror {
                    source,
                    position_flip: entry.position_flip,
                    rotation_mirror: entry.rotation_mirror,
                })
            })
            .collect()
    }
}

impl PoseMirror for TableMirror {
    fn mirror_pose(&self, pose: &Pose, bones: &BoneContainer, table: &MirrorTable) -> Pose {
        let rules = Self::resolve(bones, table);

        let transforms = pose
            .transforms()
            .iter()
            .zip(&rules)
            .map(|(&own, rule)| match rule {
                Some(rule) => rule.apply(pose[rule.source]),
                None => own,
            })
            .collect();

        Pose::from_transforms(transforms)
    }
}
