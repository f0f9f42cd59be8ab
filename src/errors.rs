//! Error Types
//!
//! This module defines the error type used throughout the crate.
//!
//! # Overview
//!
//! [`MirrorError`] covers every failure mode of a mirroring run:
//! - Rejected inputs (missing clip or mirror table, unresolved skeleton)
//! - Malformed skeletons, tracks and asset paths
//! - Persistence failures while saving the output asset
//! - Data invariants broken mid-run (non-normalized rotations)
//!
//! # Usage
//!
//! All fallible APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, MirrorError>`.
//!
//! ```rust,ignore
//! use anim_mirror::errors::{MirrorError, Result};
//!
//! fn mirror_walk_cycle() -> Result<()> {
//!     // Operations that may fail return Result
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for animation mirroring.
#[derive(Error, Debug)]
pub enum MirrorError {
    // ========================================================================
    // Mirroring Errors
    // ========================================================================
    /// A required input (source clip or mirror table) was not supplied.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The clip has no resolvable skeleton.
    #[error("Animation with invalid skeleton: {asset}")]
    MissingSkeleton {
        /// Name of the clip whose skeleton could not be resolved
        asset: String,
    },

    /// Saving the output asset failed.
    #[error("Failed to persist '{package}': {source}")]
    PersistenceFailure {
        /// Package path of the asset being saved
        package: String,
        /// Underlying store error
        #[source]
        source: Box<MirrorError>,
    },

    /// A mirrored rotation came out non-normalized.
    #[error("Rotation of bone '{bone}' at frame {frame} is not normalized (length {length})")]
    InvariantViolation {
        /// Bone whose key was rejected
        bone: String,
        /// Frame index of the key
        frame: usize,
        /// Measured quaternion length
        length: f32,
    },

    // ========================================================================
    // Skeleton & Track Errors
    // ========================================================================
    /// The skeleton hierarchy is malformed.
    #[error("Invalid skeleton: {0}")]
    InvalidSkeleton(String),

    /// A bone name does not exist in the skeleton.
    #[error("Unknown bone: {0}")]
    UnknownBone(String),

    /// No track exists for the given bone.
    #[error("Bone track not found: {0}")]
    TrackNotFound(String),

    /// Key array lengths do not agree with each other or with the clip.
    #[error(
        "Key count mismatch on '{bone}': {positions} positions, {rotations} rotations, {scales} scales (clip has {frames} frames)"
    )]
    KeyCountMismatch {
        /// Bone whose keys were rejected
        bone: String,
        /// Number of position keys supplied
        positions: usize,
        /// Number of rotation keys supplied
        rotations: usize,
        /// Number of scale keys supplied
        scales: usize,
        /// Frame count of the clip
        frames: usize,
    },

    /// A frame rate with a zero numerator or denominator.
    #[error("Invalid frame rate: {numerator}/{denominator}")]
    InvalidFrameRate {
        /// Frames
        numerator: u32,
        /// Seconds
        denominator: u32,
    },

    // ========================================================================
    // Asset Errors
    // ========================================================================
    /// The asset path is not a valid package path / object name pair.
    #[error("Invalid asset path: {0}")]
    InvalidAssetPath(String),

    /// The requested asset was not found.
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    /// Settings failed validation.
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    // ========================================================================
    // I/O & Format Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Alias for `Result<T, MirrorError>`.
pub type Result<T> = std::result::Result<T, MirrorError>;
