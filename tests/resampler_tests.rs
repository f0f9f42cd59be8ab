//! Mirror Resampler Tests
//!
//! Tests for:
//! - make_mirror_animation input validation (missing clip, table, skeleton)
//! - Output timing, rotation normalization, determinism
//! - Double mirroring with a self-inverse table
//! - Per-axis flip scenario on a two-bone clip
//! - Zero-frame clips, persistence failures, invariant violations
//! - One pose evaluation and one mirror per frame
//! - Long clips reproducing every key exactly

use std::cell::{Cell, RefCell};
use std::sync::{Arc, Once};

use glam::{Quat, Vec3};
use log::{Level, LevelFilter, Log, Metadata, Record};

use anim_mirror::animation::{AnimationDataController, FrameRate, InterpolationMode, PoseSource};
use anim_mirror::assets::{AssetPath, AssetStore, MemoryAssetStore};
use anim_mirror::errors::{MirrorError, Result};
use anim_mirror::mirror::{
    AxisFlags, MirrorAxis, MirrorEntry, MirrorResampler, MirrorTable, PoseMirror, TableMirror,
    make_mirror_animation,
};
use anim_mirror::skeleton::{Bone, BoneContainer, BoneTransform, Pose, Skeleton};
use anim_mirror::{AnimationClip, MirrorAnimationModule, MirrorSettings};

const EPSILON: f32 = 1e-4;

// ============================================================================
// Log capture
// ============================================================================

thread_local! {
    static RECORDS: RefCell<Vec<(Level, String)>> = const { RefCell::new(Vec::new()) };
}

struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        RECORDS.with(|r| r.borrow_mut().push((record.level(), record.args().to_string())));
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;
static INIT_LOGGER: Once = Once::new();

/// Installs the capturing logger and clears this thread's records.
fn capture_logs() {
    INIT_LOGGER.call_once(|| {
        log::set_logger(&LOGGER).expect("logger already set");
        log::set_max_level(LevelFilter::Trace);
    });
    RECORDS.with(|r| r.borrow_mut().clear());
}

fn errors_logged() -> Vec<String> {
    RECORDS.with(|r| {
        r.borrow()
            .iter()
            .filter(|(level, _)| *level == Level::Error)
            .map(|(_, msg)| msg.clone())
            .collect()
    })
}

// ============================================================================
// Fixtures
// ============================================================================

fn clip_path(name: &str) -> AssetPath {
    AssetPath::new(format!("/Game/Anims/{name}"), name).unwrap()
}

fn two_bone_skeleton() -> Arc<Skeleton> {
    Arc::new(
        Skeleton::new(
            "Biped",
            vec![
                Bone::root("root"),
                Bone::new(
                    "child",
                    Some(0),
                    BoneTransform::from_translation(Vec3::new(0.0, 1.0, 0.0)),
                ),
            ],
        )
        .unwrap(),
    )
}

fn root_keys(frames: usize) -> (Vec<Vec3>, Vec<Quat>, Vec<Vec3>) {
    (
        (0..frames)
            .map(|f| Vec3::new(0.1 * f as f32, 0.2, 0.3))
            .collect(),
        (0..frames)
            .map(|f| Quat::from_rotation_y(0.1 * f as f32))
            .collect(),
        vec![Vec3::ONE; frames],
    )
}

fn child_keys(frames: usize) -> (Vec<Vec3>, Vec<Quat>, Vec<Vec3>) {
    (
        (0..frames)
            .map(|f| Vec3::new(1.0 + f as f32, 2.0, 3.0))
            .collect(),
        (0..frames)
            .map(|f| Quat::from_rotation_x(0.2 * f as f32))
            .collect(),
        (0..frames)
            .map(|f| Vec3::splat(1.0 + 0.5 * f as f32))
            .collect(),
    )
}

fn two_bone_clip(frames: usize) -> AnimationClip {
    let mut clip = AnimationClip::new(
        clip_path("Walk"),
        Some(two_bone_skeleton()),
        FrameRate::FPS_30,
        frames,
    )
    .unwrap();

    let mut controller = clip.controller();
    for (bone, (pos, rot, scale)) in [("root", root_keys(frames)), ("child", child_keys(frames))] {
        controller.add_bone_track(bone).unwrap();
        controller
            .set_bone_track_keys(bone, &pos, &rot, &scale)
            .unwrap();
    }
    clip
}

fn flip_child_x_table() -> MirrorTable {
    MirrorTable::new()
        .with_entry(MirrorEntry::new(
            "root",
            "root",
            AxisFlags::empty(),
            MirrorAxis::None,
        ))
        .with_entry(MirrorEntry::new(
            "child",
            "child",
            AxisFlags::X,
            MirrorAxis::None,
        ))
}

fn biped_skeleton() -> Arc<Skeleton> {
    Arc::new(
        Skeleton::new(
            "Biped",
            vec![
                Bone::root("pelvis"),
                Bone::new(
                    "spine",
                    Some(0),
                    BoneTransform::from_translation(Vec3::new(0.0, 0.2, 0.0)),
                ),
                Bone::new(
                    "thigh_l",
                    Some(0),
                    BoneTransform::from_translation(Vec3::new(0.1, -0.1, 0.0)),
                ),
                Bone::new(
                    "thigh_r",
                    Some(0),
                    BoneTransform::from_translation(Vec3::new(-0.1, -0.1, 0.0)),
                ),
                Bone::new(
                    "calf_l",
                    Some(2),
                    BoneTransform::from_translation(Vec3::new(0.0, -0.4, 0.0)),
                ),
                Bone::new(
                    "calf_r",
                    Some(3),
                    BoneTransform::from_translation(Vec3::new(0.0, -0.4, 0.0)),
                ),
            ],
        )
        .unwrap(),
    )
}

/// Clip animating every biped bone except `calf_r`, which stays at rest.
fn biped_clip(frames: usize) -> AnimationClip {
    let skeleton = biped_skeleton();
    let mut clip =
        AnimationClip::new(clip_path("Run"), Some(skeleton.clone()), FrameRate::FPS_30, frames)
            .unwrap();

    let mut controller = clip.controller();
    for (index, bone) in skeleton.bones().iter().enumerate() {
        if bone.name == "calf_r" {
            continue;
        }
        let phase = index as f32 * 0.3;
        let pos: Vec<Vec3> = (0..frames)
            .map(|f| bone.rest_pose.translation + Vec3::new(0.01 * f as f32, 0.0, 0.02 * phase))
            .collect();
        let rot: Vec<Quat> = (0..frames)
            .map(|f| {
                let t = f as f32 * 0.15 + phase;
                (Quat::from_rotation_x(t) * Quat::from_rotation_z(0.5 * t)).normalize()
            })
            .collect();
        let scale = vec![Vec3::ONE; frames];

        controller.add_bone_track(&bone.name).unwrap();
        controller
            .set_bone_track_keys(&bone.name, &pos, &rot, &scale)
            .unwrap();
    }
    clip
}

fn biped_table() -> MirrorTable {
    MirrorTable::from_name_swaps(&biped_skeleton(), &[("_l", "_r")], AxisFlags::X, MirrorAxis::X)
}

struct FailingStore {
    attempts: usize,
}

impl AssetStore for FailingStore {
    fn save_clip(&mut self, _clip: &AnimationClip) -> Result<String> {
        self.attempts += 1;
        Err(MirrorError::IoError(std::io::Error::other("disk full")))
    }

    fn load_clip(&self, path: &AssetPath) -> Result<AnimationClip> {
        Err(MirrorError::AssetNotFound(path.to_string()))
    }

    fn contains(&self, _path: &AssetPath) -> bool {
        false
    }
}

// ============================================================================
// Input Validation
// ============================================================================

#[test]
fn missing_clip_is_invalid_input() {
    capture_logs();
    let mut store = MemoryAssetStore::new();
    let table = flip_child_x_table();

    let result = make_mirror_animation(None, Some(&table), &mut store);

    assert!(matches!(result, Err(MirrorError::InvalidInput(_))));
    assert!(store.is_empty());
    assert_eq!(store.save_count(), 0);
    assert_eq!(errors_logged().len(), 1, "errors: {:?}", errors_logged());
}

#[test]
fn missing_table_is_invalid_input() {
    capture_logs();
    let mut store = MemoryAssetStore::new();
    let clip = two_bone_clip(3);

    let result = make_mirror_animation(Some(&clip), None, &mut store);

    assert!(matches!(result, Err(MirrorError::InvalidInput(_))));
    assert!(store.is_empty());
    assert_eq!(errors_logged().len(), 1, "errors: {:?}", errors_logged());
}

#[test]
fn both_inputs_missing_logs_one_error() {
    capture_logs();
    let mut store = MemoryAssetStore::new();

    let result = make_mirror_animation(None, None, &mut store);

    assert!(matches!(result, Err(MirrorError::InvalidInput(_))));
    assert_eq!(errors_logged().len(), 1);
}

#[test]
fn missing_skeleton_saves_nothing() {
    capture_logs();
    let mut store = MemoryAssetStore::new();
    let clip = AnimationClip::new(clip_path("Orphan"), None, FrameRate::FPS_30, 4).unwrap();
    let table = flip_child_x_table();

    let result = make_mirror_animation(Some(&clip), Some(&table), &mut store);

    match result {
        Err(MirrorError::MissingSkeleton { asset }) => assert_eq!(asset, "Orphan_Mirror"),
        other => panic!("expected MissingSkeleton, got {other:?}"),
    }
    assert!(store.is_empty());
    let errors = errors_logged();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("Orphan_Mirror"), "got {}", errors[0]);
}

#[test]
fn invalid_settings_are_rejected_before_any_work() {
    capture_logs();
    let mut store = MemoryAssetStore::new();
    let clip = two_bone_clip(3);
    let table = flip_child_x_table();
    let resampler = MirrorResampler::new(MirrorSettings {
        name_suffix: String::new(),
        ..Default::default()
    });

    let result = resampler.make_mirror_animation(Some(&clip), Some(&table), &mut store);

    assert!(matches!(result, Err(MirrorError::InvalidSettings(_))));
    assert!(store.is_empty());
}

// ============================================================================
// Output Asset
// ============================================================================

#[test]
fn output_is_a_suffixed_sibling() {
    let mut store = MemoryAssetStore::new();
    let clip = two_bone_clip(3);
    let table = flip_child_x_table();

    let output = make_mirror_animation(Some(&clip), Some(&table), &mut store).unwrap();

    assert_eq!(output.clip.name(), "Walk_Mirror");
    assert_eq!(output.clip.path().package(), "/Game/Anims/Walk_Mirror");
    assert!(store.contains(output.clip.path()));
    assert!(!store.contains(clip.path()), "source must not be re-saved");
    assert_eq!(store.save_count(), 1);
}

#[test]
fn output_keeps_timing() {
    let mut store = MemoryAssetStore::new();
    let clip = biped_clip(17);

    let output = make_mirror_animation(Some(&clip), Some(&biped_table()), &mut store).unwrap();

    assert_eq!(output.clip.number_of_frames(), clip.number_of_frames());
    assert_eq!(output.clip.sample_rate(), clip.sample_rate());
    assert!((output.clip.play_length() - clip.play_length()).abs() < f64::EPSILON);
}

#[test]
fn output_has_one_full_track_per_bone_in_skeleton_order() {
    let mut store = MemoryAssetStore::new();
    let clip = biped_clip(5);

    let output = make_mirror_animation(Some(&clip), Some(&biped_table()), &mut store).unwrap();

    let names: Vec<&str> = output
        .clip
        .bone_tracks()
        .iter()
        .map(|t| t.bone_name.as_str())
        .collect();
    assert_eq!(
        names,
        ["pelvis", "spine", "thigh_l", "thigh_r", "calf_l", "calf_r"]
    );
    for track in output.clip.bone_tracks() {
        assert_eq!(track.data.pos_keys.len(), 5);
        assert_eq!(track.data.rot_keys.len(), 5);
        assert_eq!(track.data.scale_keys.len(), 5);
    }
}

#[test]
fn saved_clip_matches_returned_clip() {
    let mut store = MemoryAssetStore::new();
    let clip = biped_clip(4);

    let output = make_mirror_animation(Some(&clip), Some(&biped_table()), &mut store).unwrap();
    let loaded = store.load_clip(output.clip.path()).unwrap();

    assert_eq!(loaded.bone_tracks(), output.clip.bone_tracks());
    assert_eq!(loaded.number_of_frames(), 4);
}

// ============================================================================
// Key Properties
// ============================================================================

#[test]
fn every_rotation_key_is_normalized() {
    let mut store = MemoryAssetStore::new();
    let clip = biped_clip(24);

    let output = make_mirror_animation(Some(&clip), Some(&biped_table()), &mut store).unwrap();

    for track in output.clip.bone_tracks() {
        for (frame, q) in track.data.rot_keys.iter().enumerate() {
            assert!(
                (q.length() - 1.0).abs() < EPSILON,
                "{} frame {frame}: |q| = {}",
                track.bone_name,
                q.length()
            );
        }
    }
}

#[test]
fn repeated_runs_are_bit_identical() {
    let clip = biped_clip(12);
    let table = biped_table();
    let mut store = MemoryAssetStore::new();

    let first = MirrorResampler::new(MirrorSettings::default())
        .make_mirror_animation(Some(&clip), Some(&table), &mut store)
        .unwrap();
    let second = MirrorResampler::new(MirrorSettings {
        name_suffix: "_Left".to_string(),
        ..Default::default()
    })
    .make_mirror_animation(Some(&clip), Some(&table), &mut store)
    .unwrap();

    assert_ne!(first.clip.path(), second.clip.path());
    assert_eq!(first.clip.bone_tracks(), second.clip.bone_tracks());
    assert_eq!(store.len(), 2);
}

#[test]
fn mirroring_twice_restores_the_original() {
    let mut store = MemoryAssetStore::new();
    let clip = biped_clip(10);
    let table = biped_table();
    assert!(table.is_self_inverse());

    let once = make_mirror_animation(Some(&clip), Some(&table), &mut store).unwrap();
    let twice = make_mirror_animation(Some(&once.clip), Some(&table), &mut store).unwrap();
    assert_eq!(twice.clip.name(), "Run_Mirror_Mirror");

    let skeleton = biped_skeleton();
    let bones = BoneContainer::full(skeleton.clone());
    for frame in 0..clip.number_of_frames() {
        let time = clip.time_at_frame(frame);
        let original = clip.sample_pose(&bones, time);
        let restored = twice.clip.sample_pose(&bones, time);
        for compact in bones.compact_indices() {
            assert!(
                original[compact].abs_diff_eq(&restored[compact], EPSILON),
                "{:?} frame {frame}: {:?} != {:?}",
                bones.bone_name(compact),
                original[compact],
                restored[compact]
            );
        }
    }
}

#[test]
fn mirroring_once_swaps_sides() {
    let mut store = MemoryAssetStore::new();
    let clip = biped_clip(6);

    let output = make_mirror_animation(Some(&clip), Some(&biped_table()), &mut store).unwrap();

    let source_left = clip.find_bone_track("thigh_l").unwrap();
    let mirrored_right = output.clip.find_bone_track("thigh_r").unwrap();
    for frame in 0..6 {
        let src = source_left.pos_keys[frame];
        let dst = mirrored_right.pos_keys[frame];
        assert!((dst.x + src.x).abs() < EPSILON);
        assert!((dst.y - src.y).abs() < EPSILON);
        assert!((dst.z - src.z).abs() < EPSILON);

        let expected = MirrorAxis::X.mirror_rotation(source_left.rot_keys[frame]);
        assert!(mirrored_right.rot_keys[frame].abs_diff_eq(expected, EPSILON));
    }
}

#[test]
fn unanimated_bones_take_the_mirrored_rest_pose() {
    let mut store = MemoryAssetStore::new();
    let clip = biped_clip(3);

    let output = make_mirror_animation(Some(&clip), Some(&biped_table()), &mut store).unwrap();

    // calf_r has no source track; calf_l now carries calf_r's rest pose, flipped on X
    let calf_l = output.clip.find_bone_track("calf_l").unwrap();
    for pos in &calf_l.pos_keys {
        assert!(pos.abs_diff_eq(Vec3::new(0.0, -0.4, 0.0), EPSILON), "got {pos}");
    }
    for rot in &calf_l.rot_keys {
        assert!(rot.abs_diff_eq(Quat::IDENTITY, EPSILON));
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn single_axis_flip_on_two_bones() {
    let mut store = MemoryAssetStore::new();
    let clip = two_bone_clip(3);

    let output = make_mirror_animation(Some(&clip), Some(&flip_child_x_table()), &mut store).unwrap();

    let root_in = clip.find_bone_track("root").unwrap();
    let root_out = output.clip.find_bone_track("root").unwrap();
    assert_eq!(root_out, root_in, "root track must be untouched");

    let child_in = clip.find_bone_track("child").unwrap();
    let child_out = output.clip.find_bone_track("child").unwrap();
    let negated_x: Vec<Vec3> = child_in
        .pos_keys
        .iter()
        .map(|p| Vec3::new(-p.x, p.y, p.z))
        .collect();
    assert_eq!(child_out.pos_keys, negated_x);
    assert_eq!(child_out.rot_keys, child_in.rot_keys);
    assert_eq!(child_out.scale_keys, child_in.scale_keys);
}

/// One-bone clip whose keys differ at every frame.
fn long_root_clip(frames: usize, rate: FrameRate, interpolation: InterpolationMode) -> AnimationClip {
    let skeleton = Arc::new(Skeleton::new("Root", vec![Bone::root("root")]).unwrap());
    let mut clip = AnimationClip::new(clip_path("Long"), Some(skeleton), rate, frames)
        .unwrap()
        .with_interpolation(interpolation);

    let pos: Vec<Vec3> = (0..frames).map(|f| Vec3::new(f as f32, 0.0, 0.0)).collect();
    let rot: Vec<Quat> = (0..frames)
        .map(|f| Quat::from_rotation_z(f as f32 * 0.001))
        .collect();
    let scale: Vec<Vec3> = (0..frames)
        .map(|f| Vec3::splat(1.0 + f as f32 * 1e-4))
        .collect();

    let mut controller = clip.controller();
    controller.add_bone_track("root").unwrap();
    controller
        .set_bone_track_keys("root", &pos, &rot, &scale)
        .unwrap();
    clip
}

#[test]
fn long_clips_keep_every_key_under_identity_table() {
    let table = MirrorTable::new().with_entry(MirrorEntry::new(
        "root",
        "root",
        AxisFlags::empty(),
        MirrorAxis::None,
    ));
    let rates = [FrameRate::FPS_30, FrameRate::new(30000, 1001).unwrap()];

    for rate in rates {
        for interpolation in [InterpolationMode::Linear, InterpolationMode::Step] {
            let mut store = MemoryAssetStore::new();
            let clip = long_root_clip(2400, rate, interpolation);

            let output = make_mirror_animation(Some(&clip), Some(&table), &mut store).unwrap();

            let input = clip.find_bone_track("root").unwrap();
            let mirrored = output.clip.find_bone_track("root").unwrap();
            let first_drift = (0..2400).find(|&f| {
                input.pos_keys[f] != mirrored.pos_keys[f]
                    || input.rot_keys[f] != mirrored.rot_keys[f]
                    || input.scale_keys[f] != mirrored.scale_keys[f]
            });
            assert_eq!(
                first_drift, None,
                "{rate:?} {interpolation:?}: key drifted at frame {first_drift:?}"
            );
            assert_eq!(mirrored, input);
        }
    }
}

#[test]
fn zero_frames_still_saves_empty_tracks() {
    let mut store = MemoryAssetStore::new();
    let clip = two_bone_clip(0);

    let output = make_mirror_animation(Some(&clip), Some(&flip_child_x_table()), &mut store).unwrap();

    assert_eq!(store.save_count(), 1);
    assert_eq!(output.clip.number_of_frames(), 0);
    assert_eq!(output.clip.bone_tracks().len(), 2);
    for track in output.clip.bone_tracks() {
        assert!(track.data.pos_keys.is_empty());
        assert!(track.data.rot_keys.is_empty());
        assert!(track.data.scale_keys.is_empty());
    }
}

#[test]
fn save_failure_is_reported_without_retry() {
    capture_logs();
    let mut store = FailingStore { attempts: 0 };
    let clip = two_bone_clip(3);

    let result = make_mirror_animation(Some(&clip), Some(&flip_child_x_table()), &mut store);

    match result {
        Err(MirrorError::PersistenceFailure { package, .. }) => {
            assert_eq!(package, "/Game/Anims/Walk_Mirror");
        }
        other => panic!("expected PersistenceFailure, got {other:?}"),
    }
    assert_eq!(store.attempts, 1);
    assert_eq!(errors_logged().len(), 1);
}

// ============================================================================
// Strategy Seams
// ============================================================================

struct CountingSource<'a> {
    inner: &'a AnimationClip,
    calls: Cell<usize>,
}

impl PoseSource for CountingSource<'_> {
    fn sample_pose(&self, bones: &BoneContainer, time: f64) -> Pose {
        self.calls.set(self.calls.get() + 1);
        self.inner.sample_pose(bones, time)
    }
}

struct CountingMirror<'a> {
    calls: &'a Cell<usize>,
}

impl PoseMirror for CountingMirror<'_> {
    fn mirror_pose(&self, pose: &Pose, bones: &BoneContainer, table: &MirrorTable) -> Pose {
        self.calls.set(self.calls.get() + 1);
        TableMirror.mirror_pose(pose, bones, table)
    }
}

#[test]
fn pose_is_evaluated_once_per_frame() {
    let clip = biped_clip(9);
    let source = CountingSource {
        inner: &clip,
        calls: Cell::new(0),
    };
    let mirror_calls = Cell::new(0);
    let resampler = MirrorResampler::with_mirror(
        MirrorSettings::default(),
        CountingMirror {
            calls: &mirror_calls,
        },
    );
    let bones = BoneContainer::full(biped_skeleton());
    let times: Vec<f64> = (0..9).map(|f| clip.time_at_frame(f)).collect();

    let tracks = resampler
        .resample(&source, &bones, &biped_table(), &times)
        .unwrap();

    assert_eq!(tracks.len(), 6);
    assert_eq!(source.calls.get(), 9, "one sample per frame, not per bone");
    assert_eq!(mirror_calls.get(), 9, "one mirror per frame, not per bone");
}

struct DenormalizingMirror;

impl PoseMirror for DenormalizingMirror {
    fn mirror_pose(&self, pose: &Pose, _bones: &BoneContainer, _table: &MirrorTable) -> Pose {
        let mut out = pose.clone();
        if let Some(last) = out.len().checked_sub(1) {
            out[anim_mirror::skeleton::CompactBoneIndex(last)].rotation =
                Quat::from_xyzw(0.0, 0.0, 0.0, 2.0);
        }
        out
    }
}

#[test]
fn non_normalized_rotation_aborts_the_run() {
    capture_logs();
    let mut store = MemoryAssetStore::new();
    let clip = two_bone_clip(3);
    let resampler = MirrorResampler::with_mirror(MirrorSettings::default(), DenormalizingMirror);

    let result = resampler.make_mirror_animation(Some(&clip), Some(&flip_child_x_table()), &mut store);

    match result {
        Err(MirrorError::InvariantViolation { bone, frame, length }) => {
            assert_eq!(bone, "child");
            assert_eq!(frame, 0);
            assert!((length - 2.0).abs() < EPSILON);
        }
        other => panic!("expected InvariantViolation, got {other:?}"),
    }
    assert!(store.is_empty());
    assert_eq!(errors_logged().len(), 1);
}

// ============================================================================
// Module
// ============================================================================

#[test]
fn module_lifecycle_and_forwarding() {
    let mut module = MirrorAnimationModule::new(MirrorSettings {
        name_suffix: "_L".to_string(),
        ..Default::default()
    });
    assert!(!module.is_started());
    module.startup_module();
    assert!(module.is_started());

    let mut store = MemoryAssetStore::new();
    let clip = two_bone_clip(2);
    let output = module
        .make_mirror_animation(Some(&clip), Some(&flip_child_x_table()), &mut store)
        .unwrap();
    assert_eq!(output.clip.name(), "Walk_L");

    module.shutdown_module();
    assert!(!module.is_started());
}
