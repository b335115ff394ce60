//! Actor placements keyed by a unique placement id.

use skirmish_map_core::Point2D;
use skirmish_map_markup::MarkupNode;
use thiserror::Error;

use crate::fields::{parse_value, FieldValueError};

const LOCATION: &str = "Location";
const OWNER: &str = "Owner";

/// Entity instance placed on the map at load time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActorPlacement {
    /// Type identifier resolved by the rules layer.
    pub actor_type: String,
    /// Cell the actor is placed on.
    pub location: Point2D,
    /// Name of the owning player slot.
    pub owner: String,
    /// Remaining init values in document order.
    pub properties: Vec<MarkupNode>,
}

impl ActorPlacement {
    /// Creates a placement without extra properties.
    #[must_use]
    pub fn new(actor_type: impl Into<String>, location: Point2D, owner: impl Into<String>) -> Self {
        Self {
            actor_type: actor_type.into(),
            location,
            owner: owner.into(),
            properties: Vec::new(),
        }
    }

    pub(crate) fn from_node(node: &MarkupNode) -> Result<Self, ActorNodeError> {
        let actor_type = node
            .value()
            .ok_or(ActorNodeError::MissingType)?
            .to_owned();
        let mut location = None;
        let mut owner = None;
        let mut properties = Vec::new();

        for field in &node.children {
            let value = field.value().unwrap_or_default();
            match field.key.as_str() {
                LOCATION => location = Some(parse_value(LOCATION, value)?),
                OWNER if !value.is_empty() => owner = Some(value.to_owned()),
                _ => properties.push(field.clone()),
            }
        }

        Ok(Self {
            actor_type,
            location: location.ok_or(ActorNodeError::MissingField(LOCATION))?,
            owner: owner.ok_or(ActorNodeError::MissingField(OWNER))?,
            properties,
        })
    }

    pub(crate) fn to_node(&self, id: &str) -> MarkupNode {
        let mut fields = Vec::with_capacity(self.properties.len() + 2);
        fields.push(MarkupNode::with_value(LOCATION, self.location.to_string()));
        fields.push(MarkupNode::with_value(OWNER, self.owner.as_str()));
        fields.extend(self.properties.iter().cloned());
        MarkupNode::with_value(id, self.actor_type.as_str()).with_children(fields)
    }
}

/// An actor node lacks data every placement needs.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ActorNodeError {
    /// The node carries no type identifier.
    #[error("actor has no type")]
    MissingType,
    /// A required init value is absent.
    #[error("actor has no `{0}`")]
    MissingField(&'static str),
    /// An init value could not be parsed.
    #[error(transparent)]
    Field(#[from] FieldValueError),
}

/// A placement with the same id already exists.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("actor id `{0}` is already in use")]
pub struct DuplicateActor(pub String);

/// Actor placements in insertion order with unique ids.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActorRegistry {
    actors: Vec<(String, ActorPlacement)>,
}

impl ActorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a placement under `id`, rejecting ids already in use.
    pub fn insert(
        &mut self,
        id: impl Into<String>,
        placement: ActorPlacement,
    ) -> Result<(), DuplicateActor> {
        let id = id.into();
        if self.contains(&id) {
            return Err(DuplicateActor(id));
        }
        self.actors.push((id, placement));
        Ok(())
    }

    /// Removes and returns the placement stored under `id`.
    pub fn remove(&mut self, id: &str) -> Option<ActorPlacement> {
        let position = self.actors.iter().position(|(key, _)| key == id)?;
        Some(self.actors.remove(position).1)
    }

    /// Looks up a placement.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ActorPlacement> {
        self.actors
            .iter()
            .find_map(|(key, placement)| (key == id).then_some(placement))
    }

    /// Reports whether `id` is in use.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Iterates over `(id, placement)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ActorPlacement)> {
        self.actors
            .iter()
            .map(|(id, placement)| (id.as_str(), placement))
    }

    /// Number of placements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    /// Reports whether no actors are placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// First `ActorN` id not yet in use.
    #[must_use]
    pub fn next_id(&self) -> String {
        (0..)
            .map(|index: usize| format!("Actor{index}"))
            .find(|id| !self.contains(id))
            .unwrap_or_default()
    }
}
