pub mod pose_mirror;
pub mod resampler;
pub mod table;

pub use pose_mirror::{PoseMirror, TableMirror};
pub use resampler::{MirrorOutput, MirrorResampler, make_mirror_animation, sample_mirrored_pose};
pub use table::{AxisFlags, MirrorAxis, MirrorEntry, MirrorTable};
