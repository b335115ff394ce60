//! Reading documents from their persisted entries.

use std::collections::HashMap;

use skirmish_map_core::{Grid, PackageError, Point2D};
use skirmish_map_grid_codec::{read_grids, DecodedGrids, GridCodecError};
use skirmish_map_markup::{nodes_dict, parse_bytes, MarkupError, MarkupNode};
use thiserror::Error;

use crate::{
    actors::{ActorNodeError, ActorPlacement, DuplicateActor},
    config::LoadEnvironment,
    fields::{parse_value, FieldValueError, SCALAR_FIELDS},
    players::{DuplicateSlot, PlayerSlot},
    smudges::{InvalidSmudge, SmudgeMark},
    MapDocument, CURRENT_FORMAT, OLDEST_SUPPORTED_FORMAT,
};

const WAYPOINTS: &str = "Waypoints";

/// Reasons a document could not be loaded.
#[derive(Debug, Error)]
pub enum LoadFailure {
    /// The map predates the oldest format that can be migrated.
    #[error("map format {version} is not supported")]
    UnsupportedFormat {
        /// Format declared by the map.
        version: u32,
    },
    /// The binary grids are malformed or disagree with the metadata.
    #[error("invalid tile data")]
    Grid(#[from] GridCodecError),
    /// The map text is not well formed.
    #[error("invalid map text")]
    Markup(#[from] MarkupError),
    /// A required top-level section is absent.
    #[error("map text has no `{0}` section")]
    MissingSection(&'static str),
    /// A field value could not be parsed.
    #[error("invalid field value")]
    InvalidField(#[from] FieldValueError),
    /// Two player slots share a name.
    #[error("invalid player slots")]
    DuplicateSlot(#[from] DuplicateSlot),
    /// Two actors share an id.
    #[error("invalid actor list")]
    DuplicateActor(#[from] DuplicateActor),
    /// An actor node lacks required data.
    #[error("actor `{id}` is invalid")]
    InvalidActor {
        /// Id of the offending actor.
        id: String,
        /// What the actor lacks.
        #[source]
        source: ActorNodeError,
    },
    /// A smudge key is malformed.
    #[error("invalid smudge list")]
    InvalidSmudge(#[from] InvalidSmudge),
    /// A pre-`RequiresMod` map was loaded without any active mod to assume.
    #[error("map format predates `RequiresMod` and no mod is loaded")]
    NoActiveMod,
    /// The package could not supply an entry.
    #[error("map entry could not be read")]
    Package(#[from] PackageError),
}

type Sections<'a> = HashMap<&'a str, &'a MarkupNode>;

impl MapDocument {
    /// Loads a document from its text and grid entries.
    pub fn load(
        text: &[u8],
        grid: &[u8],
        env: &LoadEnvironment,
    ) -> Result<Self, LoadFailure> {
        Self::load_with(text, || Ok::<_, PackageError>(grid), env)
    }

    /// Loads a document, fetching the grid entry only once the text has been
    /// accepted.
    ///
    /// Text problems, such as an unsupported format, are reported in
    /// preference to a missing or unreadable grid entry.
    pub fn load_with<B, F>(
        text: &[u8],
        read_grid: F,
        env: &LoadEnvironment,
    ) -> Result<Self, LoadFailure>
    where
        B: AsRef<[u8]>,
        F: FnOnce() -> Result<B, PackageError>,
    {
        let nodes = parse_bytes(text)?;
        let sections = nodes_dict(&nodes)?;

        let mut map = Self::blank();
        map.metadata.map_format = OLDEST_SUPPORTED_FORMAT;
        for field in SCALAR_FIELDS {
            if let Some(node) = sections.get(field.name) {
                (field.read)(&mut map, node.value().unwrap_or_default())?;
            }
        }
        if let Some(node) = sections.get(WAYPOINTS) {
            map.waypoints = read_waypoints(node)?;
        }

        let version = map.metadata.map_format;
        if version < OLDEST_SUPPORTED_FORMAT {
            return Err(LoadFailure::UnsupportedFormat { version });
        }
        let legacy = version < CURRENT_FORMAT;
        log::debug!("loading format {version} map sized {}", map.map_size);

        if legacy {
            let active = env.active_mod().ok_or(LoadFailure::NoActiveMod)?;
            log::info!("format {version} map has no RequiresMod, assuming `{active}`");
            map.metadata.requires_mod = Some(active.to_owned());
        }

        for node in &required(&sections, "Players")?.children {
            map.players.insert(PlayerSlot::from_node(node)?)?;
        }
        if legacy {
            map.players.apply_creep_migration()?;
            log::info!("added creep slot to format {version} map");
        }
        let synthesised = map.players.ensure_playable(map.waypoints.len())?;
        if synthesised > 0 {
            log::info!("map has no playable slots, added {synthesised} from waypoints");
        }

        for node in &required(&sections, "Actors")?.children {
            let placement = ActorPlacement::from_node(node).map_err(|source| {
                LoadFailure::InvalidActor {
                    id: node.key.clone(),
                    source,
                }
            })?;
            map.actors.insert(node.key.as_str(), placement)?;
        }

        for node in &required(&sections, "Smudges")?.children {
            map.smudges.push(SmudgeMark::from_key(&node.key)?);
        }

        map.rules.rules = required(&sections, "Rules")?.children.clone();
        map.rules.sequences = optional(&sections, "Sequences");
        map.rules.weapons = optional(&sections, "Weapons");
        map.rules.voices = optional(&sections, "Voices");

        let grid = read_grid()?;
        let DecodedGrids { terrain, resources } = read_grids(grid.as_ref(), map.map_size)?;
        map.terrain = terrain;
        map.resources = resources;
        map.custom_terrain = Grid::filled(map.map_size, None);

        Ok(map)
    }
}

fn required<'a>(
    sections: &Sections<'a>,
    name: &'static str,
) -> Result<&'a MarkupNode, LoadFailure> {
    sections
        .get(name)
        .copied()
        .ok_or(LoadFailure::MissingSection(name))
}

fn optional(sections: &Sections<'_>, name: &str) -> Vec<MarkupNode> {
    sections
        .get(name)
        .map(|node| node.children.clone())
        .unwrap_or_default()
}

fn read_waypoints(node: &MarkupNode) -> Result<Vec<(String, Point2D)>, LoadFailure> {
    let _ = node.nodes_dict()?;
    node.children
        .iter()
        .map(|waypoint| -> Result<(String, Point2D), LoadFailure> {
            let point = parse_value(WAYPOINTS, waypoint.value().unwrap_or_default())?;
            Ok((waypoint.key.clone(), point))
        })
        .collect()
}
