//! Read-only tileset registry contract and an in-memory catalog.

use std::collections::BTreeMap;

/// Resolves tile template properties for a tileset.
pub trait TilesetRegistry {
    /// Reports whether the registry knows the tileset.
    fn contains_tileset(&self, tileset: &str) -> bool;

    /// Reports whether the template is pick-any.
    ///
    /// Returns `None` when either the tileset or the template is unknown.
    fn is_pick_any(&self, tileset: &str, template: u16) -> Option<bool>;

    /// Template used to paint freshly created maps.
    fn first_template(&self, tileset: &str) -> Option<u16>;
}

/// Properties of a single tile template.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TemplateInfo {
    name: Option<String>,
    pick_any: bool,
}

impl TemplateInfo {
    /// Creates template properties.
    #[must_use]
    pub fn new(name: Option<String>, pick_any: bool) -> Self {
        Self { name, pick_any }
    }

    /// Optional display name of the template.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Whether the template's variants are interchangeable.
    #[must_use]
    pub const fn pick_any(&self) -> bool {
        self.pick_any
    }
}

/// Tile templates belonging to a single tileset, in definition order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileSet {
    id: String,
    templates: Vec<(u16, TemplateInfo)>,
}

impl TileSet {
    /// Creates an empty tileset.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            templates: Vec::new(),
        }
    }

    /// Adds a template, returning the tileset for chaining.
    #[must_use]
    pub fn with_template(mut self, template: u16, info: TemplateInfo) -> Self {
        let _ = self.insert_template(template, info);
        self
    }

    /// Inserts a template, returning the definition it replaced.
    ///
    /// A replaced template keeps its original position.
    pub fn insert_template(&mut self, template: u16, info: TemplateInfo) -> Option<TemplateInfo> {
        match self.templates.iter_mut().find(|(id, _)| *id == template) {
            Some((_, existing)) => Some(std::mem::replace(existing, info)),
            None => {
                self.templates.push((template, info));
                None
            }
        }
    }

    /// Identifier of the tileset.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Looks up a template.
    #[must_use]
    pub fn template(&self, template: u16) -> Option<&TemplateInfo> {
        self.templates
            .iter()
            .find_map(|(id, info)| (*id == template).then_some(info))
    }

    /// First template in definition order.
    #[must_use]
    pub fn first_template(&self) -> Option<u16> {
        self.templates.first().map(|(id, _)| *id)
    }

    /// Number of templates in the tileset.
    #[must_use]
    pub fn template_count(&self) -> usize {
        self.templates.len()
    }
}

/// Collection of tilesets keyed by identifier.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TileSetCatalog {
    tilesets: BTreeMap<String, TileSet>,
}

impl TileSetCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a tileset, returning the definition it replaced.
    pub fn insert(&mut self, tileset: TileSet) -> Option<TileSet> {
        self.tilesets.insert(tileset.id().to_owned(), tileset)
    }

    /// Looks up a tileset by identifier.
    #[must_use]
    pub fn get(&self, tileset: &str) -> Option<&TileSet> {
        self.tilesets.get(tileset)
    }

    /// Number of tilesets in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tilesets.len()
    }

    /// Reports whether the catalog holds no tilesets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tilesets.is_empty()
    }
}

impl TilesetRegistry for TileSetCatalog {
    fn contains_tileset(&self, tileset: &str) -> bool {
        self.tilesets.contains_key(tileset)
    }

    fn is_pick_any(&self, tileset: &str, template: u16) -> Option<bool> {
        self.get(tileset)?
            .template(template)
            .map(TemplateInfo::pick_any)
    }

    fn first_template(&self, tileset: &str) -> Option<u16> {
        self.get(tileset)?.first_template()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temperate() -> TileSet {
        TileSet::new("TEMPERAT")
            .with_template(255, TemplateInfo::new(Some("clear1".into()), true))
            .with_template(3, TemplateInfo::new(Some("w1".into()), false))
    }

    #[test]
    fn catalog_resolves_pick_any_flags() {
        let mut catalog = TileSetCatalog::new();
        assert!(catalog.insert(temperate()).is_none());

        assert_eq!(catalog.is_pick_any("TEMPERAT", 255), Some(true));
        assert_eq!(catalog.is_pick_any("TEMPERAT", 3), Some(false));
        assert_eq!(catalog.is_pick_any("TEMPERAT", 4), None);
        assert_eq!(catalog.is_pick_any("SNOW", 255), None);
    }

    #[test]
    fn first_template_follows_definition_order() {
        let mut catalog = TileSetCatalog::new();
        let _ = catalog.insert(temperate());

        assert_eq!(catalog.first_template("TEMPERAT"), Some(255));
        assert_eq!(catalog.first_template("DESERT"), None);
        assert!(catalog.contains_tileset("TEMPERAT"));
    }

    #[test]
    fn replacing_a_template_keeps_its_position() {
        let mut tileset = temperate();
        let replaced = tileset.insert_template(255, TemplateInfo::new(None, false));

        assert_eq!(
            replaced.as_ref().and_then(TemplateInfo::name),
            Some("clear1")
        );
        assert_eq!(tileset.first_template(), Some(255));
        assert_eq!(tileset.template_count(), 2);
        assert_eq!(tileset.template(255).map(TemplateInfo::pick_any), Some(false));
    }
}
