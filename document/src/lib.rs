#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Map document aggregate and its persistence.
//!
//! A [`MapDocument`] owns everything a map package describes: scalar
//! metadata, player slots, actor placements, smudges, rule overrides and the
//! terrain, resource and custom-terrain grids. Documents are loaded from the
//! structured text and binary grid entries of a package, migrating older
//! formats on the way in, and always saved in the current format.
//!
//! [`MapSession`] ties a document to the package it was loaded from.

use skirmish_map_core::{
    Bounds, Grid, GridSize, InvalidBounds, Point2D, ResourceCell, TerrainCell, TilesetRegistry,
};
use thiserror::Error;

mod actors;
mod config;
mod fields;
mod load;
mod players;
mod resize;
mod rules;
mod save;
mod session;
mod smudges;

pub use actors::{ActorNodeError, ActorPlacement, ActorRegistry, DuplicateActor};
pub use config::LoadEnvironment;
pub use fields::FieldValueError;
pub use load::LoadFailure;
pub use players::{DuplicateSlot, PlayerSlot, PlayerSlots, CREEPS, NEUTRAL};
pub use resize::ResizeError;
pub use rules::RuleOverrideSet;
pub use save::MapSaveError;
pub use session::{MapLoadError, MapSession};
pub use smudges::{InvalidSmudge, SmudgeMark};

/// Format written by every save.
pub const CURRENT_FORMAT: u32 = 5;
/// Oldest format that can still be migrated on load.
pub const OLDEST_SUPPORTED_FORMAT: u32 = 4;

/// Scalar metadata persisted at the top of the map text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapMetadata {
    /// Format version the document was loaded from, or will be saved as.
    pub map_format: u32,
    /// Whether the map is offered in map choosers.
    pub selectable: bool,
    /// Mod the map was authored for.
    pub requires_mod: Option<String>,
    /// Display title.
    pub title: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// Map author.
    pub author: Option<String>,
    /// Identifier of the tileset painting the terrain grid.
    pub tileset: Option<String>,
    /// Map category, such as `Conquest`.
    pub map_type: Option<String>,
    /// Number of player start locations.
    pub start_points: Option<u32>,
    /// Whether the map may be used as a menu background.
    pub use_as_shellmap: bool,
}

impl Default for MapMetadata {
    fn default() -> Self {
        Self {
            map_format: CURRENT_FORMAT,
            selectable: true,
            requires_mod: None,
            title: None,
            description: None,
            author: None,
            tileset: None,
            map_type: None,
            start_points: None,
            use_as_shellmap: false,
        }
    }
}

/// A fresh map could not be created for the tileset.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum NewMapError {
    /// The registry does not know the tileset.
    #[error("tileset `{0}` is not registered")]
    UnknownTileset(String),
    /// The tileset defines no templates to paint with.
    #[error("tileset `{0}` defines no templates")]
    EmptyTileset(String),
}

/// In-memory representation of a complete map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapDocument {
    metadata: MapMetadata,
    map_size: GridSize,
    bounds: Bounds,
    waypoints: Vec<(String, Point2D)>,
    players: PlayerSlots,
    actors: ActorRegistry,
    smudges: Vec<SmudgeMark>,
    rules: RuleOverrideSet,
    terrain: Grid<TerrainCell>,
    resources: Grid<ResourceCell>,
    custom_terrain: Grid<Option<String>>,
}

impl MapDocument {
    /// Creates a 1x1 map painted with the tileset's first template.
    pub fn from_tileset(
        tileset: &str,
        registry: &dyn TilesetRegistry,
    ) -> Result<Self, NewMapError> {
        if !registry.contains_tileset(tileset) {
            return Err(NewMapError::UnknownTileset(tileset.to_owned()));
        }
        let template = registry
            .first_template(tileset)
            .ok_or_else(|| NewMapError::EmptyTileset(tileset.to_owned()))?;

        let size = GridSize::new(1, 1);
        let mut map = Self::blank();
        map.metadata.title = Some("Name your map here".to_owned());
        map.metadata.description = Some("Describe your map here".to_owned());
        map.metadata.author = Some("Your name here".to_owned());
        map.metadata.tileset = Some(tileset.to_owned());
        map.map_size = size;
        map.terrain = Grid::filled(size, TerrainCell::new(template, 0));
        map.resources = Grid::filled(size, ResourceCell::default());
        map.custom_terrain = Grid::filled(size, None);
        Ok(map)
    }

    /// Document without any cells, used as the starting point for loads.
    pub(crate) fn blank() -> Self {
        let empty = GridSize::default();
        Self {
            metadata: MapMetadata::default(),
            map_size: empty,
            bounds: Bounds::default(),
            waypoints: Vec::new(),
            players: PlayerSlots::new(),
            actors: ActorRegistry::new(),
            smudges: Vec::new(),
            rules: RuleOverrideSet::default(),
            terrain: Grid::filled(empty, TerrainCell::default()),
            resources: Grid::filled(empty, ResourceCell::default()),
            custom_terrain: Grid::filled(empty, None),
        }
    }

    /// Scalar metadata.
    #[must_use]
    pub fn metadata(&self) -> &MapMetadata {
        &self.metadata
    }

    /// Scalar metadata for editing.
    pub fn metadata_mut(&mut self) -> &mut MapMetadata {
        &mut self.metadata
    }

    /// Dimensions shared by every grid.
    #[must_use]
    pub const fn map_size(&self) -> GridSize {
        self.map_size
    }

    /// Playable region of the map.
    #[must_use]
    pub const fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Reports whether the point lies inside the playable region.
    #[must_use]
    pub const fn is_in_map(&self, point: Point2D) -> bool {
        self.bounds.contains(point)
    }

    /// Named waypoints in document order.
    pub fn waypoints(&self) -> impl Iterator<Item = (&str, Point2D)> {
        self.waypoints
            .iter()
            .map(|(name, point)| (name.as_str(), *point))
    }

    /// Looks up a waypoint by name.
    #[must_use]
    pub fn waypoint(&self, name: &str) -> Option<Point2D> {
        self.waypoints()
            .find_map(|(key, point)| (key == name).then_some(point))
    }

    /// Moves an existing waypoint or appends a new one, returning the
    /// previous position.
    pub fn set_waypoint(&mut self, name: impl Into<String>, point: Point2D) -> Option<Point2D> {
        let name = name.into();
        match self.waypoints.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => Some(std::mem::replace(existing, point)),
            None => {
                self.waypoints.push((name, point));
                None
            }
        }
    }

    /// Player slots in document order.
    #[must_use]
    pub fn players(&self) -> &PlayerSlots {
        &self.players
    }

    /// Player slots for editing.
    pub fn players_mut(&mut self) -> &mut PlayerSlots {
        &mut self.players
    }

    /// Actor placements in document order.
    #[must_use]
    pub fn actors(&self) -> &ActorRegistry {
        &self.actors
    }

    /// Places an actor under a new id.
    pub fn add_actor(
        &mut self,
        id: impl Into<String>,
        placement: ActorPlacement,
    ) -> Result<(), DuplicateActor> {
        self.actors.insert(id, placement)
    }

    /// Removes the actor placed under `id`.
    pub fn remove_actor(&mut self, id: &str) -> Option<ActorPlacement> {
        self.actors.remove(id)
    }

    /// Decals in document order.
    #[must_use]
    pub fn smudges(&self) -> &[SmudgeMark] {
        &self.smudges
    }

    /// Decals for editing.
    pub fn smudges_mut(&mut self) -> &mut Vec<SmudgeMark> {
        &mut self.smudges
    }

    /// Rule overrides.
    #[must_use]
    pub fn rules(&self) -> &RuleOverrideSet {
        &self.rules
    }

    /// Rule overrides for editing.
    pub fn rules_mut(&mut self) -> &mut RuleOverrideSet {
        &mut self.rules
    }

    /// Terrain grid.
    #[must_use]
    pub fn terrain(&self) -> &Grid<TerrainCell> {
        &self.terrain
    }

    /// Resource grid.
    #[must_use]
    pub fn resources(&self) -> &Grid<ResourceCell> {
        &self.resources
    }

    /// Per-cell terrain type overrides. Never persisted.
    #[must_use]
    pub fn custom_terrain(&self) -> &Grid<Option<String>> {
        &self.custom_terrain
    }

    /// Replaces a terrain cell, returning the previous one.
    pub fn set_terrain(&mut self, x: u32, y: u32, cell: TerrainCell) -> Option<TerrainCell> {
        self.terrain.set(x, y, cell)
    }

    /// Replaces a resource cell, returning the previous one.
    pub fn set_resource(&mut self, x: u32, y: u32, cell: ResourceCell) -> Option<ResourceCell> {
        self.resources.set(x, y, cell)
    }

    /// Tags a cell with a custom terrain type, returning the previous tag.
    ///
    /// The outer `None` means the position lies outside the grid.
    pub fn set_custom_terrain(
        &mut self,
        x: u32,
        y: u32,
        terrain_type: Option<String>,
    ) -> Option<Option<String>> {
        self.custom_terrain.set(x, y, terrain_type)
    }

    /// Replaces the playable region.
    ///
    /// The region is independent of the grid size and may exclude a border
    /// of cells.
    pub fn set_cordon(
        &mut self,
        left: i32,
        top: i32,
        right: i32,
        bottom: i32,
    ) -> Result<(), InvalidBounds> {
        self.bounds = Bounds::from_ltrb(left, top, right, bottom)?;
        Ok(())
    }
}
