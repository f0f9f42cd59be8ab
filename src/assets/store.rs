use std::fs;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use crate::animation::AnimationClip;
use crate::assets::document::ClipDocument;
use crate::assets::path::AssetPath;
use crate::errors::{MirrorError, Result};
use crate::settings::MirrorSettings;

/// Durable storage for clip packages.
pub trait AssetStore {
    /// Persists `clip` at its own asset path, replacing any previous package.
    /// Returns a human-readable location of the saved package.
    fn save_clip(&mut self, clip: &AnimationClip) -> Result<String>;

    fn load_clip(&self, path: &AssetPath) -> Result<AnimationClip>;

    fn contains(&self, path: &AssetPath) -> bool;
}

/// Stores each package as a JSON file below a root directory.
pub struct FileAssetStore {
    root_path: PathBuf,
    pretty: bool,
}

impl FileAssetStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root_path: root.as_ref().to_path_buf(),
            pretty: true,
        }
    }

    /// Store below `root` writing JSON the way `settings` asks for.
    pub fn from_settings(root: impl AsRef<Path>, settings: &MirrorSettings) -> Self {
        Self::new(root).with_pretty_json(settings.pretty_json)
    }

    #[must_use]
    pub fn with_pretty_json(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    #[inline]
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    #[must_use]
    pub fn file_path(&self, path: &AssetPath) -> PathBuf {
        path.to_file_path(&self.root_path)
    }
}

impl AssetStore for FileAssetStore {
    fn save_clip(&mut self, clip: &AnimationClip) -> Result<String> {
        let file = self.file_path(clip.path());
        if let Some(dir) = file.parent() {
            fs::create_dir_all(dir)?;
        }

        let document = ClipDocument::from_clip(clip);
        let json = if self.pretty {
            serde_json::to_string_pretty(&document)?
        } else {
            serde_json::to_string(&document)?
        };
        fs::write(&file, json)?;

        Ok(file.display().to_string())
    }

    fn load_clip(&self, path: &AssetPath) -> Result<AnimationClip> {
        let file = self.file_path(path);
        if !file.is_file() {
            return Err(MirrorError::AssetNotFound(path.to_string()));
        }
        let json = fs::read_to_string(&file)?;
        ClipDocument::from_json_str(&json)?.into_clip()
    }

    fn contains(&self, path: &AssetPath) -> bool {
        self.file_path(path).is_file()
    }
}

/// In-memory store, for editor sessions that persist elsewhere and for tests.
#[derive(Default)]
pub struct MemoryAssetStore {
    packages: FxHashMap<AssetPath, ClipDocument>,
    save_count: usize,
}

impl MemoryAssetStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Number of successful saves since creation.
    #[inline]
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.save_count
    }
}

impl AssetStore for MemoryAssetStore {
    fn save_clip(&mut self, clip: &AnimationClip) -> Result<String> {
        self.packages
            .insert(clip.path().clone(), ClipDocument::from_clip(clip));
        self.save_count += 1;
        Ok(clip.path().to_string())
    }

    fn load_clip(&self, path: &AssetPath) -> Result<AnimationClip> {
        self.packages
            .get(path)
            .cloned()
            .ok_or_else(|| MirrorError::AssetNotFound(path.to_string()))?
            .into_clip()
    }

    fn contains(&self, path: &AssetPath) -> bool {
        self.packages.contains_key(path)
    }
}
