use std::fmt;
use std::path::{Path, PathBuf};

use crate::errors::{MirrorError, Result};

/// File extension of serialized clip packages.
pub const CLIP_PACKAGE_EXTENSION: &str = "anim.json";

/// Location of an asset: a long package path (`/Game/Anims/Walk`) and the
/// object name inside that package (`Walk`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetPath {
    package: String,
    object_name: String,
}

impl AssetPath {
    pub fn new(package: impl Into<String>, object_name: impl Into<String>) -> Result<Self> {
        let package = package.into();
        let object_name = object_name.into();

        if !package.starts_with('/') {
            return Err(MirrorError::InvalidAssetPath(format!(
                "package path '{package}' must start with '/'"
            )));
        }
        let segments: Vec<&str> = package[1..].split('/').collect();
        if segments
            .iter()
            .any(|s| s.is_empty() || *s == "." || *s == ".." || s.contains('\\'))
        {
            return Err(MirrorError::InvalidAssetPath(format!(
                "package path '{package}' has an empty or relative segment"
            )));
        }
        if object_name.is_empty() || object_name.contains(['/', '\\', '.']) {
            return Err(MirrorError::InvalidAssetPath(format!(
                "object name '{object_name}' is empty or contains a separator"
            )));
        }

        Ok(Self {
            package,
            object_name,
        })
    }

    /// Path whose object name equals the last package segment.
    pub fn from_package(package: impl Into<String>) -> Result<Self> {
        let package = package.into();
        let name = package.rsplit('/').next().unwrap_or_default().to_string();
        Self::new(package, name)
    }

    #[inline]
    #[must_use]
    pub fn package(&self) -> &str {
        &self.package
    }

    #[inline]
    #[must_use]
    pub fn object_name(&self) -> &str {
        &self.object_name
    }

    /// Sibling location with `suffix` appended to both package and object name.
    pub fn with_suffix(&self, suffix: &str) -> Result<Self> {
        Self::new(
            format!("{}{suffix}", self.package),
            format!("{}{suffix}", self.object_name),
        )
    }

    /// On-disk file of this package under `root`.
    #[must_use]
    pub fn to_file_path(&self, root: &Path) -> PathBuf {
        let mut path = root.to_path_buf();
        for segment in self.package[1..].split('/') {
            path.push(segment);
        }
        let file_name = format!(
            "{}.{CLIP_PACKAGE_EXTENSION}",
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        );
        path.set_file_name(file_name);
        path
    }
}

impl fmt::Display for AssetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.package, self.object_name)
    }
}
