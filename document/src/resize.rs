//! Changing the extent of the tile grids.

use skirmish_map_core::{GridSize, ResourceCell, TerrainCell};
use thiserror::Error;

use crate::MapDocument;

/// Reasons a resize was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ResizeError {
    /// The current grid has no origin cell to fill new cells with.
    #[error("cannot resize a map without cells")]
    EmptyGrid,
    /// The requested size has no cells.
    #[error("cannot resize a map to {0}")]
    EmptyTarget(GridSize),
    /// The requested size cannot be persisted.
    #[error("map size {0} exceeds {}x{}", u16::MAX, u16::MAX)]
    TooLarge(GridSize),
}

impl MapDocument {
    /// Resizes the terrain and resource grids.
    ///
    /// Cells inside both extents are kept. Cells added by growth copy the
    /// current origin cell, not a blank tile.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), ResizeError> {
        let terrain_fill = *self.terrain.get(0, 0).ok_or(ResizeError::EmptyGrid)?;
        let resource_fill = *self.resources.get(0, 0).ok_or(ResizeError::EmptyGrid)?;
        self.resize_with_fill(width, height, terrain_fill, resource_fill)
    }

    /// Resizes the grids, filling cells added by growth with the given cells.
    ///
    /// Custom terrain tags are kept for surviving cells and cleared elsewhere.
    pub fn resize_with_fill(
        &mut self,
        width: u32,
        height: u32,
        terrain_fill: TerrainCell,
        resource_fill: ResourceCell,
    ) -> Result<(), ResizeError> {
        let size = GridSize::new(width, height);
        if size.is_empty() {
            return Err(ResizeError::EmptyTarget(size));
        }
        let limit = u32::from(u16::MAX);
        if width > limit || height > limit {
            return Err(ResizeError::TooLarge(size));
        }

        log::debug!("resizing map from {} to {size}", self.map_size);
        self.terrain = self.terrain.resized(size, &terrain_fill);
        self.resources = self.resources.resized(size, &resource_fill);
        self.custom_terrain = self.custom_terrain.resized(size, &None);
        self.map_size = size;
        Ok(())
    }
}
