//! Decal marks encoded entirely in their node key.

use skirmish_map_core::Point2D;
use skirmish_map_markup::MarkupNode;
use thiserror::Error;

/// Decorative decal placed on a cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SmudgeMark {
    /// Decal type identifier.
    pub smudge_type: String,
    /// Cell the decal covers.
    pub location: Point2D,
    /// Decal depth, interpreted by the renderer.
    pub depth: i32,
}

/// A smudge key does not follow `<type> <x>,<y> <depth>`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("smudge `{0}` is not of the form `<type> <x>,<y> <depth>`")]
pub struct InvalidSmudge(pub String);

impl SmudgeMark {
    /// Creates a decal mark.
    #[must_use]
    pub fn new(smudge_type: impl Into<String>, location: Point2D, depth: i32) -> Self {
        Self {
            smudge_type: smudge_type.into(),
            location,
            depth,
        }
    }

    pub(crate) fn from_key(key: &str) -> Result<Self, InvalidSmudge> {
        let invalid = || InvalidSmudge(key.to_owned());
        let mut tokens = key
            .split([' ', ','])
            .map(str::trim)
            .filter(|token| !token.is_empty());

        let smudge_type = tokens.next().ok_or_else(invalid)?;
        let mut number = || -> Result<i32, InvalidSmudge> {
            tokens
                .next()
                .and_then(|token| token.parse().ok())
                .ok_or_else(invalid)
        };
        let x = number()?;
        let y = number()?;
        let depth = number()?;

        let extra = tokens.count();
        if extra > 0 {
            log::warn!("ignoring {extra} trailing tokens in smudge `{key}`");
        }

        Ok(Self::new(smudge_type, Point2D::new(x, y), depth))
    }

    pub(crate) fn to_node(&self) -> MarkupNode {
        MarkupNode::new(format!(
            "{} {} {}",
            self.smudge_type, self.location, self.depth
        ))
    }
}
