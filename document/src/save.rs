//! Serialising documents into package entries.

use skirmish_map_core::{
    PackageEntries, PackageError, TilesetRegistry, MAP_GRID_ENTRY, MAP_TEXT_ENTRY,
};
use skirmish_map_grid_codec::{write_grids, GridCodecError};
use skirmish_map_markup::{write_string, MarkupNode};
use thiserror::Error;

use crate::{fields::SCALAR_FIELDS, MapDocument, CURRENT_FORMAT};

/// Reasons a document could not be saved.
#[derive(Debug, Error)]
pub enum MapSaveError {
    /// The document's tileset is not known to the registry.
    #[error("tileset `{0}` is not registered")]
    UnknownTileset(String),
    /// The grids could not be encoded.
    #[error("tile data could not be encoded")]
    Grid(#[from] GridCodecError),
    /// The package rejected the entries.
    #[error(transparent)]
    Package(#[from] PackageError),
}

impl MapDocument {
    /// Serialises the document into its `map.yaml` and `map.bin` entries.
    ///
    /// The document is upgraded to the current format first, so saving a
    /// migrated map is a one-way conversion.
    pub fn to_entries(
        &mut self,
        tilesets: &dyn TilesetRegistry,
    ) -> Result<PackageEntries, MapSaveError> {
        self.metadata.map_format = CURRENT_FORMAT;

        let tileset = self.metadata.tileset.as_deref().unwrap_or_default();
        if !tilesets.contains_tileset(tileset) {
            return Err(MapSaveError::UnknownTileset(tileset.to_owned()));
        }
        let grid = write_grids(&self.terrain, &self.resources, |template| {
            tilesets.is_pick_any(tileset, template)
        })?;
        let text = write_string(&self.to_nodes());
        log::debug!(
            "serialised map: {} text bytes, {} grid bytes",
            text.len(),
            grid.len()
        );

        let mut entries = PackageEntries::new();
        let _ = entries.insert(MAP_TEXT_ENTRY.to_owned(), text.into_bytes());
        let _ = entries.insert(MAP_GRID_ENTRY.to_owned(), grid);
        Ok(entries)
    }

    fn to_nodes(&self) -> Vec<MarkupNode> {
        let mut root: Vec<MarkupNode> = SCALAR_FIELDS
            .iter()
            .filter_map(|field| {
                (field.write)(self).map(|value| MarkupNode::with_value(field.name, value))
            })
            .collect();

        root.push(MarkupNode::section(
            "Players",
            self.players.iter().map(|slot| slot.to_node()).collect(),
        ));
        root.push(MarkupNode::section(
            "Actors",
            self.actors
                .iter()
                .map(|(id, placement)| placement.to_node(id))
                .collect(),
        ));
        root.push(MarkupNode::section(
            "Waypoints",
            self.waypoints()
                .map(|(name, point)| MarkupNode::with_value(name, point.to_string()))
                .collect(),
        ));
        root.push(MarkupNode::section(
            "Smudges",
            self.smudges.iter().map(|smudge| smudge.to_node()).collect(),
        ));
        for (name, nodes) in self.rules.sections() {
            root.push(MarkupNode::section(name, nodes.to_vec()));
        }

        root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_map_core::{Point2D, TemplateInfo, TileSet, TileSetCatalog};
    use skirmish_map_markup::parse_str;

    use crate::{ActorPlacement, SmudgeMark};

    fn catalog() -> TileSetCatalog {
        let mut catalog = TileSetCatalog::new();
        let _ = catalog.insert(
            TileSet::new("TEMPERAT").with_template(3, TemplateInfo::new(None, false)),
        );
        catalog
    }

    #[test]
    fn sections_follow_the_persisted_order() {
        let mut map = MapDocument::from_tileset("TEMPERAT", &catalog()).expect("tileset exists");
        map.add_actor("Actor0", ActorPlacement::new("mcv", Point2D::ZERO, "Neutral"))
            .expect("new id");
        map.smudges_mut()
            .push(SmudgeMark::new("sc1", Point2D::ZERO, 0));

        let entries = map.to_entries(&catalog()).expect("map saves");
        let text = std::str::from_utf8(&entries[MAP_TEXT_ENTRY]).expect("utf-8 text");
        let nodes = parse_str(text).expect("written text parses");
        let keys: Vec<&str> = nodes.iter().map(|node| node.key.as_str()).collect();

        assert_eq!(
            keys,
            [
                "Selectable",
                "MapFormat",
                "Title",
                "Description",
                "Author",
                "Tileset",
                "MapSize",
                "Bounds",
                "UseAsShellmap",
                "Players",
                "Actors",
                "Waypoints",
                "Smudges",
                "Rules",
                "Sequences",
                "Weapons",
                "Voices",
            ]
        );
        assert_eq!(entries.len(), 2);
        assert!(entries.contains_key(MAP_GRID_ENTRY));
    }

    #[test]
    fn saving_forces_the_current_format() {
        let mut map = MapDocument::from_tileset("TEMPERAT", &catalog()).expect("tileset exists");
        map.metadata_mut().map_format = 4;

        let _ = map.to_entries(&catalog()).expect("map saves");
        assert_eq!(map.metadata().map_format, CURRENT_FORMAT);
    }

    #[test]
    fn unknown_tileset_is_rejected() {
        let mut map = MapDocument::from_tileset("TEMPERAT", &catalog()).expect("tileset exists");
        map.metadata_mut().tileset = Some("SNOW".to_owned());

        assert!(matches!(
            map.to_entries(&catalog()),
            Err(MapSaveError::UnknownTileset(name)) if name == "SNOW"
        ));
    }

    #[test]
    fn unknown_template_is_rejected() {
        let mut map = MapDocument::from_tileset("TEMPERAT", &catalog()).expect("tileset exists");
        let _ = map.set_terrain(0, 0, skirmish_map_core::TerrainCell::new(99, 0));

        assert!(matches!(
            map.to_entries(&catalog()),
            Err(MapSaveError::Grid(GridCodecError::UnknownTemplate { template: 99, .. }))
        ));
    }
}
