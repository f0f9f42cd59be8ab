pub mod clip;
pub mod controller;
pub mod frame_rate;
pub mod sampler;
pub mod tracks;
pub mod values;

pub use clip::{AnimationClip, BoneAnimationTrack};
pub use controller::{AnimationDataController, ClipController};
pub use frame_rate::FrameRate;
pub use sampler::PoseSource;
pub use tracks::{InterpolationMode, RawBoneTrack};
