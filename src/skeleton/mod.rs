pub mod container;
pub mod pose;
#[allow(clippy::module_inception)]
pub mod skeleton;
pub mod transform;

pub use container::{BoneContainer, CompactBoneIndex};
pub use pose::Pose;
pub use skeleton::{Bone, Skeleton};
pub use transform::BoneTransform;
