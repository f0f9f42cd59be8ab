use crate::animation::clip::AnimationClip;
use crate::skeleton::{BoneContainer, Pose};

/// Anything that can produce a local-space pose at a point in time.
pub trait PoseSource {
    /// Local pose for every bone of `bones` at `time` seconds.
    ///
    /// Root motion is never extracted: the root keeps its animated translation.
    fn sample_pose(&self, bones: &BoneContainer, time: f64) -> Pose;
}

impl PoseSource for AnimationClip {
    fn sample_pose(&self, bones: &BoneContainer, time: f64) -> Pose {
        let mut pose = Pose::rest(bones);
        let frame_pos = self.frame_at_time(time);

        for track in self.bone_tracks() {
            // Tracks for bones outside the container are skipped
            let Some(compact) = bones.find_compact_index(&track.bone_name) else {
                continue;
            };
            let rest = pose[compact];
            pose[compact] = track.data.sample(frame_pos, self.interpolation, rest);
        }

        pose
    }
}
