#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Binary codec for the terrain and resource grids of a map.
//!
//! All values are little-endian:
//!
//! - format: `u8`, always [`TILE_FORMAT`]
//! - width: `u16`, height: `u16`
//! - for every cell, `y` outer and `x` inner: terrain template `u16`,
//!   terrain index `u8`
//! - for every cell, same order: resource kind `u8`, resource index `u8`
//!
//! The header dimensions are a cross-check only. The map metadata is the
//! authority on grid size, so readers are handed the expected size up front.

use skirmish_map_core::{
    decode_resource_cell, decode_terrain_cell, encode_resource_cell, encode_terrain_cell, Grid,
    GridSize, ResourceCell, TerrainCell,
};
use thiserror::Error;

/// Only binary layout understood by the codec.
pub const TILE_FORMAT: u8 = 1;

const HEADER_LEN: usize = 5;
const TERRAIN_CELL_LEN: usize = 3;
const RESOURCE_CELL_LEN: usize = 2;

/// Grids materialised from a binary blob.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedGrids {
    /// Terrain cells with every sentinel index resolved.
    pub terrain: Grid<TerrainCell>,
    /// Resource cells exactly as stored.
    pub resources: Grid<ResourceCell>,
}

/// Errors raised while reading or writing binary grids.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GridCodecError {
    /// The leading format byte is not [`TILE_FORMAT`].
    #[error("unknown binary map format {0}")]
    Format(u8),
    /// The header dimensions disagree with the map metadata.
    #[error("tile data is sized {found} but the map declares {expected}")]
    SizeMismatch {
        /// Size declared by the map metadata.
        expected: GridSize,
        /// Size found in the binary header.
        found: GridSize,
    },
    /// The blob ended before every declared cell was read.
    #[error("tile data ended unexpectedly at byte {offset}")]
    Truncated {
        /// Byte offset at which more data was required.
        offset: usize,
    },
    /// A terrain template is not defined by the active tileset.
    #[error("terrain template {template} at {x},{y} is not defined by the tileset")]
    UnknownTemplate {
        /// Offending template identifier.
        template: u16,
        /// Column of the offending cell.
        x: u32,
        /// Row of the offending cell.
        y: u32,
    },
    /// Terrain and resource grids do not share the same extent.
    #[error("terrain grid is sized {terrain} but resource grid is sized {resources}")]
    GridMismatch {
        /// Extent of the terrain grid.
        terrain: GridSize,
        /// Extent of the resource grid.
        resources: GridSize,
    },
    /// The grid cannot be described by the 16-bit header fields.
    #[error("grid sized {0} exceeds the binary format limits")]
    DimensionsTooLarge(GridSize),
}

/// Decodes the terrain and resource grids from `bytes`.
///
/// Fails when the format byte is unknown, when the header disagrees with
/// `expected`, or when the blob is shorter than the declared grid.
pub fn read_grids(bytes: &[u8], expected: GridSize) -> Result<DecodedGrids, GridCodecError> {
    let mut reader = ByteReader::new(bytes);

    let format = reader.read_u8()?;
    if format != TILE_FORMAT {
        return Err(GridCodecError::Format(format));
    }

    let width = reader.read_u16()?;
    let height = reader.read_u16()?;
    let found = GridSize::new(u32::from(width), u32::from(height));
    if found != expected {
        return Err(GridCodecError::SizeMismatch { expected, found });
    }

    match encoded_len(width, height) {
        Some(required) if bytes.len() >= required => {}
        _ => {
            return Err(GridCodecError::Truncated {
                offset: bytes.len(),
            })
        }
    }

    let terrain = Grid::try_from_fn(found, |x, y| -> Result<_, GridCodecError> {
        let template = reader.read_u16()?;
        let index = reader.read_u8()?;
        Ok(decode_terrain_cell(template, index, x, y))
    })?;
    let resources = Grid::try_from_fn(found, |_, _| -> Result<_, GridCodecError> {
        let kind = reader.read_u8()?;
        let index = reader.read_u8()?;
        Ok(decode_resource_cell(kind, index))
    })?;

    if reader.remaining() > 0 {
        log::debug!(
            "ignoring {} trailing bytes after {} tile data",
            reader.remaining(),
            found
        );
    }

    Ok(DecodedGrids { terrain, resources })
}

/// Encodes the grids into a binary blob.
///
/// `is_pick_any` resolves whether a terrain template is pick-any; returning
/// `None` marks the template as unknown and aborts encoding.
pub fn write_grids<F>(
    terrain: &Grid<TerrainCell>,
    resources: &Grid<ResourceCell>,
    mut is_pick_any: F,
) -> Result<Vec<u8>, GridCodecError>
where
    F: FnMut(u16) -> Option<bool>,
{
    let size = terrain.size();
    if resources.size() != size {
        return Err(GridCodecError::GridMismatch {
            terrain: size,
            resources: resources.size(),
        });
    }

    let width = u16::try_from(size.width()).map_err(|_| GridCodecError::DimensionsTooLarge(size))?;
    let height =
        u16::try_from(size.height()).map_err(|_| GridCodecError::DimensionsTooLarge(size))?;

    let capacity = encoded_len(width, height).ok_or(GridCodecError::DimensionsTooLarge(size))?;
    let mut out = Vec::with_capacity(capacity);
    out.push(TILE_FORMAT);
    out.extend_from_slice(&width.to_le_bytes());
    out.extend_from_slice(&height.to_le_bytes());

    for (x, y, cell) in terrain.iter() {
        let pick_any = is_pick_any(cell.template()).ok_or(GridCodecError::UnknownTemplate {
            template: cell.template(),
            x,
            y,
        })?;
        let (template, index) = encode_terrain_cell(*cell, x, y, pick_any);
        out.extend_from_slice(&template.to_le_bytes());
        out.push(index);
    }

    for (_, _, cell) in resources.iter() {
        let (kind, index) = encode_resource_cell(*cell);
        out.push(kind);
        out.push(index);
    }

    Ok(out)
}

/// Blob length for a `width` by `height` grid, `None` if it overflows `usize`.
fn encoded_len(width: u16, height: u16) -> Option<usize> {
    usize::from(width)
        .checked_mul(usize::from(height))?
        .checked_mul(TERRAIN_CELL_LEN + RESOURCE_CELL_LEN)?
        .checked_add(HEADER_LEN)
}

struct ByteReader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    fn read_u8(&mut self) -> Result<u8, GridCodecError> {
        let [value] = self.take::<1>()?;
        Ok(value)
    }

    fn read_u16(&mut self) -> Result<u16, GridCodecError> {
        Ok(u16::from_le_bytes(self.take::<2>()?))
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], GridCodecError> {
        let truncated = GridCodecError::Truncated {
            offset: self.offset,
        };
        let end = self.offset.checked_add(N).ok_or(truncated.clone())?;
        let slice = self.bytes.get(self.offset..end).ok_or(truncated.clone())?;
        let array = <[u8; N]>::try_from(slice).map_err(|_| truncated)?;
        self.offset = end;
        Ok(array)
    }

    fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.offset)
    }
}
