use bevy::asset::LoadState;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::object_loader::{CatalogLoader, Loader};

pub const EMOJI_CATALOG_PATH: &str = "catalog/emoji_catalog.json";

fn default_scale() -> f32 {
    1.0
}

/// One placeable emoji prop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmojiDefinition {
    pub name: String,
    /// glTF file to render. Without one a placeholder box of `size` is drawn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default = "default_scale")]
    pub scale: f32,
    /// Unscaled bounding box used for picking and frustum tests.
    pub size: [f32; 3],
}

/// Emoji props offered for placement. Mirrors `emoji_catalog.json`.
#[derive(Asset, Resource, TypePath, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmojiCatalog {
    pub emojis: Vec<EmojiDefinition>,
}

impl Default for EmojiCatalog {
    fn default() -> Self {
        let emoji = |name: &str, size: f32| EmojiDefinition {
            name: name.to_string(),
            model: None,
            scale: 1.0,
            size: [size, size, size * 0.4],
        };
        Self {
            emojis: vec![
                emoji("smile", 0.12),
                emoji("heart", 0.1),
                emoji("star", 0.12),
                emoji("thumbs_up", 0.14),
            ],
        }
    }
}

impl EmojiCatalog {
    pub fn get(&self, name: &str) -> Option<&EmojiDefinition> {
        self.emojis.iter().find(|emoji| emoji.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.emojis.iter().map(|emoji| emoji.name.as_str())
    }
}

/// Progress of loading the catalog asset.
#[derive(Resource, Default)]
pub struct CatalogLoading {
    handle: Option<Handle<EmojiCatalog>>,
    pub finished: bool,
}

pub fn start_catalog_loading(mut loading: ResMut<CatalogLoading>, asset_server: Res<AssetServer>) {
    loading.handle = Some(asset_server.load(EMOJI_CATALOG_PATH));
}

/// Installs the loaded catalog, or keeps the built-in one if loading failed.
pub fn load_catalog_system(
    mut commands: Commands,
    mut loading: ResMut<CatalogLoading>,
    asset_server: Res<AssetServer>,
    catalogs: Res<Assets<EmojiCatalog>>,
) {
    if loading.finished {
        return;
    }
    let Some(handle) = loading.handle.clone() else {
        return;
    };

    if let Some(catalog) = catalogs.get(&handle) {
        println!("✓ Emoji catalog loaded ({} entries)", catalog.emojis.len());
        commands.insert_resource(Loader::new(CatalogLoader::new(catalog.clone())));
        commands.insert_resource(catalog.clone());
        loading.finished = true;
    } else if let LoadState::Failed(err) = asset_server.load_state(&handle) {
        warn!(
            "Emoji catalog failed to load ({}), using the built-in catalog",
            err
        );
        loading.finished = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_json_fills_defaults() {
        let catalog: EmojiCatalog = serde_json::from_str(
            r#"{ "emojis": [ { "name": "cup", "size": [0.1, 0.12, 0.1] } ] }"#,
        )
        .expect("valid catalog");
        let cup = catalog.get("cup").expect("cup entry");
        assert_eq!(cup.scale, 1.0);
        assert_eq!(cup.model, None);
    }

    #[test]
    fn shipped_catalog_parses() {
        let json = include_str!("../../../assets/catalog/emoji_catalog.json");
        let catalog: EmojiCatalog = serde_json::from_str(json).expect("valid catalog");
        assert!(catalog.names().count() > 0);
    }

    #[test]
    fn built_in_catalog_has_unique_names() {
        let catalog = EmojiCatalog::default();
        let mut names: Vec<&str> = catalog.names().collect();
        let count = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), count);
    }
}
