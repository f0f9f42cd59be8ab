//! Mirroring Settings
//!
//! [`MirrorSettings`] controls where mirrored clips are written and how strictly
//! their keys are validated. Settings load from JSON; missing fields take their
//! defaults.
//!
//! ```rust,ignore
//! use anim_mirror::MirrorSettings;
//!
//! let settings = MirrorSettings {
//!     name_suffix: "_L".to_string(),
//!     ..Default::default()
//! };
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{MirrorError, Result};

pub const DEFAULT_NAME_SUFFIX: &str = "_Mirror";
pub const DEFAULT_ROTATION_TOLERANCE: f32 = 1e-4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorSettings {
    /// Appended to both the package path and the object name of the output.
    pub name_suffix: String,
    /// Largest accepted deviation of a rotation key's length from 1.
    pub rotation_tolerance: f32,
    /// Indent JSON written by file-backed stores. Applied when the store is
    /// built with [`FileAssetStore::from_settings`]; the resampler itself
    /// never formats output.
    ///
    /// [`FileAssetStore::from_settings`]: crate::assets::FileAssetStore::from_settings
    pub pretty_json: bool,
}

impl Default for MirrorSettings {
    fn default() -> Self {
        Self {
            name_suffix: DEFAULT_NAME_SUFFIX.to_string(),
            rotation_tolerance: DEFAULT_ROTATION_TOLERANCE,
            pretty_json: true,
        }
    }
}

impl MirrorSettings {
    pub fn validate(&self) -> Result<()> {
        if self.name_suffix.is_empty() {
            return Err(MirrorError::InvalidSettings(
                "name_suffix must not be empty".to_string(),
            ));
        }
        if self.name_suffix.contains(['/', '\\', '.']) {
            return Err(MirrorError::InvalidSettings(format!(
                "name_suffix '{}' contains a path separator",
                self.name_suffix
            )));
        }
        if self.rotation_tolerance.is_nan() || self.rotation_tolerance <= 0.0 {
            return Err(MirrorError::InvalidSettings(format!(
                "rotation_tolerance must be positive, got {}",
                self.rotation_tolerance
            )));
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}
