pub mod document;
pub mod path;
pub mod store;

pub use document::ClipDocument;
pub use path::{AssetPath, CLIP_PACKAGE_EXTENSION};
pub use store::{AssetStore, FileAssetStore, MemoryAssetStore};
