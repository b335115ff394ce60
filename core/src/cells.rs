//! Packed terrain and resource cells and their per-cell codec.
//!
//! Terrain templates whose variants are interchangeable ("pick-any") never
//! persist the index chosen in memory. Instead the index is derived from the
//! cell position, producing a stable 4x4 tiling pattern that survives repeated
//! saves without churn.

use serde::{Deserialize, Serialize};

/// Raw terrain index that asks the codec to choose the variant.
pub const PICK_ANY_SENTINEL: u8 = 0xFF;

/// Terrain cell referencing a tile template and one of its sub-tiles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TerrainCell {
    template: u16,
    index: u8,
}

impl TerrainCell {
    /// Creates a terrain cell from its template and sub-tile index.
    #[must_use]
    pub const fn new(template: u16, index: u8) -> Self {
        Self { template, index }
    }

    /// Identifier of the tile template.
    #[must_use]
    pub const fn template(&self) -> u16 {
        self.template
    }

    /// Sub-tile index inside the template.
    #[must_use]
    pub const fn index(&self) -> u8 {
        self.index
    }
}

/// Resource cell referencing a resource kind and its density variant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceCell {
    kind: u8,
    index: u8,
}

impl ResourceCell {
    /// Creates a resource cell from its kind and variant index.
    #[must_use]
    pub const fn new(kind: u8, index: u8) -> Self {
        Self { kind, index }
    }

    /// Identifier of the resource kind. Zero marks an empty cell.
    #[must_use]
    pub const fn kind(&self) -> u8 {
        self.kind
    }

    /// Variant or density index.
    #[must_use]
    pub const fn index(&self) -> u8 {
        self.index
    }
}

/// Deterministic sub-tile index for the cell at `(x, y)`.
#[must_use]
pub const fn pick_any_index(x: u32, y: u32) -> u8 {
    ((x % 4) + (y % 4) * 4) as u8
}

/// Materialises a terrain cell read from storage.
///
/// Only the sentinel index is re-derived; every other raw index passes
/// through untouched.
#[must_use]
pub const fn decode_terrain_cell(template: u16, index: u8, x: u32, y: u32) -> TerrainCell {
    if index == PICK_ANY_SENTINEL {
        TerrainCell::new(template, pick_any_index(x, y))
    } else {
        TerrainCell::new(template, index)
    }
}

/// Materialises a resource cell read from storage.
#[must_use]
pub const fn decode_resource_cell(kind: u8, index: u8) -> ResourceCell {
    ResourceCell::new(kind, index)
}

/// Produces the raw `(template, index)` pair persisted for a terrain cell.
///
/// Pick-any templates always persist the position-derived index, whatever
/// index the cell currently holds.
#[must_use]
pub const fn encode_terrain_cell(cell: TerrainCell, x: u32, y: u32, pick_any: bool) -> (u16, u8) {
    if pick_any {
        (cell.template(), pick_any_index(x, y))
    } else {
        (cell.template(), cell.index())
    }
}

/// Produces the raw `(kind, index)` pair persisted for a resource cell.
#[must_use]
pub const fn encode_resource_cell(cell: ResourceCell) -> (u8, u8) {
    (cell.kind(), cell.index())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pick_any_index_tiles_every_four_cells() {
        assert_eq!(pick_any_index(0, 0), 0);
        assert_eq!(pick_any_index(3, 0), 3);
        assert_eq!(pick_any_index(0, 1), 4);
        assert_eq!(pick_any_index(3, 3), 15);
        assert_eq!(pick_any_index(4, 4), 0);
        assert_eq!(pick_any_index(9, 6), 9);
    }

    #[test]
    fn sentinel_index_is_resolved_from_position() {
        let cell = decode_terrain_cell(255, PICK_ANY_SENTINEL, 6, 1);
        assert_eq!(cell, TerrainCell::new(255, 6));
    }

    #[test]
    fn explicit_index_passes_through_decode() {
        for raw in [0_u8, 7, 15, 16, 254] {
            let cell = decode_terrain_cell(12, raw, 5, 9);
            assert_eq!(cell.index(), raw, "raw index {raw} must survive decode");
        }
    }

    #[test]
    fn resource_decode_keeps_sentinel_value() {
        let cell = decode_resource_cell(2, PICK_ANY_SENTINEL);
        assert_eq!(cell, ResourceCell::new(2, PICK_ANY_SENTINEL));
        assert_eq!(encode_resource_cell(cell), (2, PICK_ANY_SENTINEL));
    }

    #[test]
    fn encode_rederives_index_for_pick_any_templates() {
        let cell = TerrainCell::new(255, 11);
        assert_eq!(encode_terrain_cell(cell, 2, 1, true), (255, 6));
        assert_eq!(encode_terrain_cell(cell, 2, 1, false), (255, 11));
    }
}
