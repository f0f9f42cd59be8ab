#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod animation;
pub mod assets;
pub mod errors;
pub mod mirror;
pub mod module;
pub mod settings;
pub mod skeleton;

pub use animation::{AnimationClip, AnimationDataController, FrameRate, InterpolationMode, PoseSource, RawBoneTrack};
pub use assets::{AssetPath, AssetStore, FileAssetStore, MemoryAssetStore};
pub use errors::{MirrorError, Result};
pub use mirror::{
    AxisFlags, MirrorAxis, MirrorEntry, MirrorOutput, MirrorResampler, MirrorTable, PoseMirror, TableMirror,
    make_mirror_animation,
};
pub use module::MirrorAnimationModule;
pub use settings::MirrorSettings;
pub use skeleton::{Bone, BoneContainer, BoneTransform, Pose, Skeleton};
