use std::sync::Arc;

use bevy::prelude::*;
use constants::interaction::TEXT_OBJECT_SCALE;
use thiserror::Error;

use super::catalog::EmojiCatalog;
use crate::engine::scene::{ObjectKind, text_bounds};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("unknown emoji `{0}`")]
    UnknownEmoji(String),
    #[error("text objects need at least one visible character")]
    EmptyText,
    #[error("loader failed: {0}")]
    Loader(String),
}

/// A ready-to-place object as produced by a loader.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedNode {
    pub kind: ObjectKind,
    pub scale: f32,
    /// Unscaled bounding box.
    pub size: Vec3,
    pub model: Option<String>,
}

/// Produces placeable nodes. Runs on the async compute pool.
pub trait ObjectLoader: Send + Sync + 'static {
    fn load(&self, kind: &ObjectKind) -> Result<LoadedNode, LoadError>;
}

/// The loader placement requests go through.
#[derive(Resource, Clone)]
pub struct Loader(pub Arc<dyn ObjectLoader>);

impl Loader {
    pub fn new(loader: impl ObjectLoader) -> Self {
        Self(Arc::new(loader))
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new(CatalogLoader::new(EmojiCatalog::default()))
    }
}

/// Resolves emoji props against the catalog and sizes 3D text.
#[derive(Debug, Clone)]
pub struct CatalogLoader {
    catalog: EmojiCatalog,
}

impl CatalogLoader {
    pub fn new(catalog: EmojiCatalog) -> Self {
        Self { catalog }
    }
}

impl ObjectLoader for CatalogLoader {
    fn load(&self, kind: &ObjectKind) -> Result<LoadedNode, LoadError> {
        match kind {
            ObjectKind::Emoji { name } => {
                let emoji = self
                    .catalog
                    .get(name)
                    .ok_or_else(|| LoadError::UnknownEmoji(name.clone()))?;
                Ok(LoadedNode {
                    kind: kind.clone(),
                    scale: emoji.scale,
                    size: Vec3::from_array(emoji.size),
                    model: emoji.model.clone(),
                })
            }
            ObjectKind::Text { text } => {
                if text.trim().is_empty() {
                    return Err(LoadError::EmptyText);
                }
                Ok(LoadedNode {
                    kind: kind.clone(),
                    scale: TEXT_OBJECT_SCALE,
                    size: text_bounds(text),
                    model: None,
                })
            }
        }
    }
}
