#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Loads tileset definitions from a TOML manifest.
//!
//! ```toml
//! version = 1
//!
//! [[tileset]]
//! id = "TEMPERAT"
//!
//! [[tileset.template]]
//! id = 255
//! name = "clear1"
//! pick_any = true
//! ```

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use skirmish_map_core::{TemplateInfo, TileSet, TileSetCatalog};

const SUPPORTED_MANIFEST_VERSION: u32 = 1;

#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    version: u32,
    #[serde(default, rename = "tileset")]
    tilesets: Vec<TilesetEntry>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct TilesetEntry {
    id: String,
    #[serde(default, rename = "template")]
    templates: Vec<TemplateEntry>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct TemplateEntry {
    id: u16,
    name: Option<String>,
    #[serde(default)]
    pick_any: bool,
}

/// Reads the manifest at `path` into a catalog.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<TileSetCatalog> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read tileset manifest at {}", path.display()))?;
    parse_catalog(&contents)
        .with_context(|| format!("invalid tileset manifest at {}", path.display()))
}

/// Parses manifest text into a catalog.
pub fn parse_catalog(contents: &str) -> Result<TileSetCatalog> {
    let manifest: Manifest =
        toml::from_str(contents).context("failed to parse tileset manifest toml contents")?;
    if manifest.version != SUPPORTED_MANIFEST_VERSION {
        bail!(
            "unsupported tileset manifest version {}; expected {}",
            manifest.version,
            SUPPORTED_MANIFEST_VERSION
        );
    }

    let mut catalog = TileSetCatalog::new();
    for entry in manifest.tilesets {
        let mut tileset = TileSet::new(entry.id.as_str());
        for template in entry.templates {
            let info = TemplateInfo::new(template.name, template.pick_any);
            if tileset.insert_template(template.id, info).is_some() {
                bail!(
                    "tileset `{}` defines template {} more than once",
                    entry.id,
                    template.id
                );
            }
        }
        log::debug!(
            "loaded tileset `{}` with {} templates",
            entry.id,
            tileset.template_count()
        );
        if catalog.insert(tileset).is_some() {
            bail!("tileset `{}` is defined more than once", entry.id);
        }
    }

    Ok(catalog)
}
