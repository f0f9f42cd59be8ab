//! Mirror Resampler
//!
//! Produces the mirrored copy of an animation clip. The source clip is
//! duplicated next to itself, then every frame is sampled and mirrored as a
//! whole pose, and the per-bone keys read from those poses replace all tracks
//! of the duplicate before it is saved.
//!
//! Sampling and mirroring a full pose is the expensive step, so it runs once
//! per frame and the result is shared by every bone.
//!
//! ```rust,ignore
//! use anim_mirror::{MemoryAssetStore, MirrorResampler, MirrorSettings};
//!
//! let mut store = MemoryAssetStore::new();
//! let resampler = MirrorResampler::new(MirrorSettings::default());
//! let output = resampler.make_mirror_animation(Some(&walk_right), Some(&table), &mut store)?;
//! assert_eq!(output.clip.name(), "WalkRight_Mirror");
//! ```

use crate::animation::{AnimationClip, AnimationDataController, PoseSource, RawBoneTrack};
use crate::assets::AssetStore;
use crate::errors::{MirrorError, Result};
use crate::mirror::pose_mirror::{PoseMirror, TableMirror};
use crate::mirror::table::MirrorTable;
use crate::settings::MirrorSettings;
use crate::skeleton::{BoneContainer, Pose};

/// Result of a successful mirroring run.
#[derive(Debug, Clone)]
pub struct MirrorOutput {
    /// The saved mirrored clip.
    pub clip: AnimationClip,
    /// Where the store put it.
    pub location: String,
}

/// Samples `source` at `time` and mirrors the result in one step.
///
/// The returned pose is a fresh value; nothing is shared with later frames.
pub fn sample_mirrored_pose<P, M>(
    source: &P,
    bones: &BoneContainer,
    time: f64,
    table: &MirrorTable,
    mirror: &M,
) -> Pose
where
    P: PoseSource + ?Sized,
    M: PoseMirror + ?Sized,
{
    let pose = source.sample_pose(bones, time);
    mirror.mirror_pose(&pose, bones, table)
}

/// Mirrors `source` with default settings and the table-driven mirror.
pub fn make_mirror_animation<S: AssetStore + ?Sized>(
    source: Option<&AnimationClip>,
    table: Option<&MirrorTable>,
    store: &mut S,
) -> Result<MirrorOutput> {
    MirrorResampler::new(MirrorSettings::default()).make_mirror_animation(source, table, store)
}

/// Runs mirroring passes with fixed settings and a pose-mirroring strategy.
pub struct MirrorResampler<M: PoseMirror = TableMirror> {
    settings: MirrorSettings,
    mirror: M,
}

impl MirrorResampler<TableMirror> {
    /// Resampler using the table-driven [`TableMirror`].
    #[must_use]
    pub fn new(settings: MirrorSettings) -> Self {
        Self::with_mirror(settings, TableMirror)
    }
}

impl<M: PoseMirror> MirrorResampler<M> {
    /// Resampler using a custom pose mirror.
    #[must_use]
    pub fn with_mirror(settings: MirrorSettings, mirror: M) -> Self {
        Self { settings, mirror }
    }

    /// Settings every run of this resampler uses.
    #[inline]
    #[must_use]
    pub fn settings(&self) -> &MirrorSettings {
        &self.settings
    }

    /// Writes the mirrored version of `source` next to it and saves it to `store`.
    ///
    /// Every failure is logged once at error level and returned; nothing is
    /// saved unless the whole clip was resampled.
    pub fn make_mirror_animation<S: AssetStore + ?Sized>(
        &self,
        source: Option<&AnimationClip>,
        table: Option<&MirrorTable>,
        store: &mut S,
    ) -> Result<MirrorOutput> {
        self.run(source, table, store).inspect_err(|err| {
            log::error!("Mirror animation failed. Reason: {err}");
        })
    }

    fn run<S: AssetStore + ?Sized>(
        &self,
        source: Option<&AnimationClip>,
        table: Option<&MirrorTable>,
        store: &mut S,
    ) -> Result<MirrorOutput> {
        let source =
            source.ok_or_else(|| MirrorError::InvalidInput("invalid animation".to_string()))?;
        let table =
            table.ok_or_else(|| MirrorError::InvalidInput("invalid mirror table".to_string()))?;
        self.settings.validate()?;

        let output_path = source.path().with_suffix(&self.settings.name_suffix)?;
        let mut output = source.duplicate(output_path);

        let Some(skeleton) = output.skeleton().cloned() else {
            // The duplicate only exists in memory; dropping it leaves no asset behind.
            log::warn!("Discarding unsaved duplicate '{}'", output.path());
            return Err(MirrorError::MissingSkeleton {
                asset: output.name().to_string(),
            });
        };

        for entry in table.unresolved_entries(&skeleton) {
            log::warn!(
                "Mirror entry '{}' -> '{}' does not resolve against skeleton '{}'",
                entry.name,
                entry.mirrored_name,
                skeleton.name()
            );
        }

        let bones = BoneContainer::full(skeleton.clone());
        let frame_times: Vec<f64> = (0..source.number_of_frames())
            .map(|frame| source.time_at_frame(frame))
            .collect();

        let tracks = self.resample(source, &bones, table, &frame_times)?;

        let mut controller = output.controller();
        controller.remove_all_bone_tracks();
        for (index, track) in tracks.iter().enumerate() {
            let Some(bone_name) = skeleton.bone_name(index) else {
                continue;
            };
            controller.add_bone_track(bone_name)?;
            controller.set_bone_track_keys(
                bone_name,
                &track.pos_keys,
                &track.rot_keys,
                &track.scale_keys,
            )?;
        }

        let location =
            store
                .save_clip(&output)
                .map_err(|err| MirrorError::PersistenceFailure {
                    package: output.path().package().to_string(),
                    source: Box::new(err),
                })?;

        log::info!(
            "Mirrored '{}' -> '{}' ({} bones, {} frames), saved to {location}",
            source.path(),
            output.path(),
            skeleton.num_bones(),
            frame_times.len()
        );

        Ok(MirrorOutput {
            clip: output,
            location,
        })
    }

    /// Mirrored key sequences for every bone of `bones.skeleton()`, indexed by
    /// skeleton bone index, one key per entry of `frame_times`.
    ///
    /// Each frame's pose is sampled and mirrored exactly once.
    pub fn resample<P: PoseSource + ?Sized>(
        &self,
        source: &P,
        bones: &BoneContainer,
        table: &MirrorTable,
        frame_times: &[f64],
    ) -> Result<Vec<RawBoneTrack>> {
        let skeleton = bones.skeleton();
        let mut tracks = vec![RawBoneTrack::with_capacity(frame_times.len()); skeleton.num_bones()];

        for (frame, &time) in frame_times.iter().enumerate() {
            let pose = sample_mirrored_pose(source, bones, time, table, &self.mirror);

            for (bone, track) in tracks.iter_mut().enumerate() {
                // Bones outside the container have nothing to write
                let Some(compact) = bones.make_compact_index(bone) else {
                    continue;
                };
                let Some(local) = pose.get(compact) else {
                    continue;
                };

                if !local.is_rotation_normalized(self.settings.rotation_tolerance) {
                    return Err(MirrorError::InvariantViolation {
                        bone: skeleton.bone_name(bone).unwrap_or_default().to_string(),
                        frame,
                        length: local.rotation.length(),
                    });
                }

                track.push_key(local);
            }
        }

        log::debug!(
            "Resampled {} frames for {} bones",
            frame_times.len(),
            bones.num_bones()
        );

        Ok(tracks)
    }
}
