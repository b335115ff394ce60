#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the skirmish map container.
//!
//! This crate defines the value types every other member speaks in: integer
//! positions, playable bounds, dense cell grids and the packed terrain and
//! resource cells stored inside them. It also declares the collaborator
//! traits the document layer consumes without owning: [`Package`] archives
//! that expose named byte entries, and the [`TilesetRegistry`] consulted when
//! tile templates must be resolved.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod cells;
mod grid;
mod package;
mod tileset;

pub use cells::{
    decode_resource_cell, decode_terrain_cell, encode_resource_cell, encode_terrain_cell,
    pick_any_index, ResourceCell, TerrainCell, PICK_ANY_SENTINEL,
};
pub use grid::Grid;
pub use package::{
    Package, PackageEntries, PackageError, PackageFactory, MAP_GRID_ENTRY, MAP_TEXT_ENTRY,
};
pub use tileset::{TemplateInfo, TileSet, TileSetCatalog, TilesetRegistry};

/// Integer position on the map plane.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Point2D {
    x: i32,
    y: i32,
}

impl Point2D {
    /// Point located at the map origin.
    pub const ZERO: Self = Self::new(0, 0);

    /// Creates a new point from its components.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal component.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical component.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }
}

impl fmt::Display for Point2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl FromStr for Point2D {
    type Err = ValueParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let [x, y] = parse_components::<i32, 2>(value, "point")?;
        Ok(Self::new(x, y))
    }
}

/// Dimensions of a cell grid measured in whole cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    width: u32,
    height: u32,
}

impl GridSize {
    /// Creates a new size descriptor with explicit dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of cell columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of cell rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether the size describes a grid without any cells.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Reports whether the provided cell lies inside the grid extent.
    #[must_use]
    pub const fn contains(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.width, self.height)
    }
}

impl FromStr for GridSize {
    type Err = ValueParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let [width, height] = parse_components::<u32, 2>(value, "grid size")?;
        Ok(Self::new(width, height))
    }
}

/// Axis-aligned rectangle stored as its four edges.
///
/// Containment is inclusive of the left and top edges and exclusive of the
/// right and bottom edges. The constructors guarantee `right >= left` and
/// `bottom >= top`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bounds {
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
}

impl Bounds {
    /// Constructs bounds from explicit edges.
    ///
    /// Both extents must be representable as `i32`.
    pub fn from_ltrb(left: i32, top: i32, right: i32, bottom: i32) -> Result<Self, InvalidBounds> {
        let width = right.checked_sub(left);
        let height = bottom.checked_sub(top);
        if right < left || bottom < top || width.is_none() || height.is_none() {
            return Err(InvalidBounds {
                left,
                top,
                right,
                bottom,
            });
        }

        Ok(Self {
            left,
            top,
            right,
            bottom,
        })
    }

    /// Constructs bounds anchored at `origin` spanning `width` by `height`.
    pub fn from_origin_and_size(
        origin: Point2D,
        width: i32,
        height: i32,
    ) -> Result<Self, InvalidBounds> {
        let right = origin.x().checked_add(width);
        let bottom = origin.y().checked_add(height);
        match (right, bottom) {
            (Some(right), Some(bottom)) => Self::from_ltrb(origin.x(), origin.y(), right, bottom),
            _ => Err(InvalidBounds {
                left: origin.x(),
                top: origin.y(),
                right: origin.x().saturating_add(width),
                bottom: origin.y().saturating_add(height),
            }),
        }
    }

    /// Left edge, inclusive.
    #[must_use]
    pub const fn left(&self) -> i32 {
        self.left
    }

    /// Top edge, inclusive.
    #[must_use]
    pub const fn top(&self) -> i32 {
        self.top
    }

    /// Right edge, exclusive.
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.right
    }

    /// Bottom edge, exclusive.
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.bottom
    }

    /// Upper-left corner of the rectangle.
    #[must_use]
    pub const fn origin(&self) -> Point2D {
        Point2D::new(self.left, self.top)
    }

    /// Horizontal extent.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.right.saturating_sub(self.left)
    }

    /// Vertical extent.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.bottom.saturating_sub(self.top)
    }

    /// Reports whether the point lies inside the rectangle.
    #[must_use]
    pub const fn contains(&self, point: Point2D) -> bool {
        point.x() >= self.left
            && point.x() < self.right
            && point.y() >= self.top
            && point.y() < self.bottom
    }
}

/// Text form is `x,y,width,height`.
impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.left,
            self.top,
            self.width(),
            self.height()
        )
    }
}

impl FromStr for Bounds {
    type Err = ValueParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let [x, y, width, height] = parse_components::<i32, 4>(value, "bounds")?;
        Self::from_origin_and_size(Point2D::new(x, y), width, height).map_err(|_| {
            ValueParseError {
                kind: "bounds",
                value: value.to_owned(),
            }
        })
    }
}

/// Rejected rectangle whose edges are inverted or overflow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("invalid bounds: left {left}, top {top}, right {right}, bottom {bottom}")]
pub struct InvalidBounds {
    /// Requested left edge.
    pub left: i32,
    /// Requested top edge.
    pub top: i32,
    /// Requested right edge.
    pub right: i32,
    /// Requested bottom edge.
    pub bottom: i32,
}

/// A comma separated value could not be parsed into a core type.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("could not parse {kind} from '{value}'")]
pub struct ValueParseError {
    /// Human readable name of the expected type.
    pub kind: &'static str,
    /// Offending text.
    pub value: String,
}

fn parse_components<T: FromStr + Copy + Default, const N: usize>(
    value: &str,
    kind: &'static str,
) -> Result<[T; N], ValueParseError> {
    let error = || ValueParseError {
        kind,
        value: value.to_owned(),
    };

    let mut components = [T::default(); N];
    let mut parts = value.split(',');
    for slot in components.iter_mut() {
        let part = parts.next().ok_or_else(error)?;
        *slot = part.trim().parse::<T>().map_err(|_| error())?;
    }
    if parts.next().is_some() {
        return Err(error());
    }

    Ok(components)
}
