//! Player slot registry and the slot migrations applied at load time.

use skirmish_map_markup::MarkupNode;
use thiserror::Error;

use crate::fields::{format_bool, format_list, parse_bool, parse_list, FieldValueError};

/// Reserved slot owning hostile fauna.
pub const CREEPS: &str = "Creeps";
/// Conventional slot owning neutral structures.
pub const NEUTRAL: &str = "Neutral";

const SLOT_KEY_PREFIX: &str = "PlayerReference@";
const RANDOM_RACE: &str = "Random";

/// Named player configuration stored in the map.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlayerSlot {
    /// Unique slot name.
    pub name: String,
    /// Faction played by the slot.
    pub race: Option<String>,
    /// Whether the slot owns the world actor.
    pub owns_world: bool,
    /// Whether the slot stays out of combat.
    pub non_combatant: bool,
    /// Whether a human may take the slot.
    pub playable: bool,
    /// Whether the slot receives the default starting units.
    pub default_starting_units: bool,
    /// Names of allied slots.
    pub allies: Vec<String>,
    /// Names of hostile slots.
    pub enemies: Vec<String>,
    /// Fields the container carries without interpreting, in document order.
    pub extra: Vec<MarkupNode>,
}

impl PlayerSlot {
    /// Creates a slot with the provided name and default flags.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Reports whether the slot takes part in combat.
    #[must_use]
    pub const fn is_combatant(&self) -> bool {
        !self.non_combatant
    }

    /// Reports whether `other` is listed as an enemy.
    #[must_use]
    pub fn is_enemy(&self, other: &str) -> bool {
        self.enemies.iter().any(|enemy| enemy == other)
    }

    pub(crate) fn from_node(node: &MarkupNode) -> Result<Self, FieldValueError> {
        let fallback_name = node.key.strip_prefix(SLOT_KEY_PREFIX).unwrap_or(&node.key);
        let mut slot = Self::new(fallback_name);

        for field in &node.children {
            let value = field.value().unwrap_or_default();
            match field.key.as_str() {
                "Name" if !value.is_empty() => slot.name = value.to_owned(),
                "Name" => {}
                "Race" => slot.race = (!value.is_empty()).then(|| value.to_owned()),
                "OwnsWorld" => slot.owns_world = parse_bool("OwnsWorld", value)?,
                "NonCombatant" => slot.non_combatant = parse_bool("NonCombatant", value)?,
                "Playable" => slot.playable = parse_bool("Playable", value)?,
                "DefaultStartingUnits" => {
                    slot.default_starting_units = parse_bool("DefaultStartingUnits", value)?;
                }
                "Allies" => slot.allies = parse_list(value),
                "Enemies" => slot.enemies = parse_list(value),
                _ => slot.extra.push(field.clone()),
            }
        }

        Ok(slot)
    }

    pub(crate) fn to_node(&self) -> MarkupNode {
        let mut fields = vec![MarkupNode::with_value("Name", self.name.as_str())];
        if let Some(race) = &self.race {
            fields.push(MarkupNode::with_value("Race", race.as_str()));
        }
        fields.push(MarkupNode::with_value("OwnsWorld", format_bool(self.owns_world)));
        fields.push(MarkupNode::with_value(
            "NonCombatant",
            format_bool(self.non_combatant),
        ));
        fields.push(MarkupNode::with_value("Playable", format_bool(self.playable)));
        fields.push(MarkupNode::with_value(
            "DefaultStartingUnits",
            format_bool(self.default_starting_units),
        ));
        if !self.allies.is_empty() {
            fields.push(MarkupNode::with_value("Allies", format_list(&self.allies)));
        }
        if !self.enemies.is_empty() {
            fields.push(MarkupNode::with_value("Enemies", format_list(&self.enemies)));
        }
        fields.extend(self.extra.iter().cloned());

        MarkupNode::section(format!("{SLOT_KEY_PREFIX}{}", self.name), fields)
    }
}

/// A slot with the same name already exists.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("player slot `{0}` is defined more than once")]
pub struct DuplicateSlot(pub String);

/// Player slots in insertion order with unique names.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlayerSlots {
    slots: Vec<PlayerSlot>,
}

impl PlayerSlots {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a slot, rejecting names already in use.
    pub fn insert(&mut self, slot: PlayerSlot) -> Result<(), DuplicateSlot> {
        if self.contains(&slot.name) {
            return Err(DuplicateSlot(slot.name));
        }
        self.slots.push(slot);
        Ok(())
    }

    /// Removes the named slot.
    pub fn remove(&mut self, name: &str) -> Option<PlayerSlot> {
        let position = self.slots.iter().position(|slot| slot.name == name)?;
        Some(self.slots.remove(position))
    }

    /// Looks up a slot by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PlayerSlot> {
        self.slots.iter().find(|slot| slot.name == name)
    }

    /// Looks up a slot by name for editing. Renaming through this reference
    /// bypasses the uniqueness check.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut PlayerSlot> {
        self.slots.iter_mut().find(|slot| slot.name == name)
    }

    /// Reports whether a slot with the name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterates over slots in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &PlayerSlot> {
        self.slots.iter()
    }

    /// Slot names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|slot| slot.name.as_str())
    }

    /// Number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Reports whether no slots are defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Makes every combatant hostile to creeps and appends the creep slot.
    ///
    /// The creep slot is hostile to every slot present before it was added,
    /// except the neutral slot.
    pub(crate) fn apply_creep_migration(&mut self) -> Result<(), DuplicateSlot> {
        for slot in self
            .slots
            .iter_mut()
            .filter(|slot| slot.is_combatant() && !slot.is_enemy(CREEPS))
        {
            slot.enemies.push(CREEPS.to_owned());
        }

        let enemies = self
            .names()
            .filter(|name| *name != NEUTRAL)
            .map(str::to_owned)
            .collect();
        self.insert(PlayerSlot {
            name: CREEPS.to_owned(),
            race: Some(RANDOM_RACE.to_owned()),
            non_combatant: true,
            enemies,
            ..PlayerSlot::default()
        })
    }

    /// Adds one playable `MultiN` slot per starting waypoint when no slot is
    /// playable. Returns the number of slots added.
    pub(crate) fn ensure_playable(&mut self, start_count: usize) -> Result<usize, DuplicateSlot> {
        if self.slots.iter().any(|slot| slot.playable) {
            return Ok(0);
        }

        for index in 0..start_count {
            self.insert(PlayerSlot {
                name: format!("Multi{index}"),
                race: Some(RANDOM_RACE.to_owned()),
                playable: true,
                default_starting_units: true,
                enemies: vec![CREEPS.to_owned()],
                ..PlayerSlot::default()
            })?;
        }

        Ok(start_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(name: &str, non_combatant: bool, enemies: &[&str]) -> PlayerSlot {
        PlayerSlot {
            name: name.to_owned(),
            non_combatant,
            enemies: enemies.iter().map(|enemy| (*enemy).to_owned()).collect(),
            ..PlayerSlot::default()
        }
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut slots = PlayerSlots::new();
        slots.insert(PlayerSlot::new("GoodGuy")).expect("first insert");
        assert_eq!(
            slots.insert(PlayerSlot::new("GoodGuy")),
            Err(DuplicateSlot("GoodGuy".to_owned()))
        );
        assert_eq!(slots.len(), 1);
    }

    #[test]
    fn creep_migration_updates_combatants_and_appends_creeps() {
        let mut slots = PlayerSlots::new();
        slots.insert(slot("Neutral", true, &[])).expect("insert");
        slots.insert(slot("GoodGuy", false, &["BadGuy"])).expect("insert");
        slots.insert(slot("BadGuy", false, &["GoodGuy", CREEPS])).expect("insert");

        slots.apply_creep_migration().expect("migration succeeds");

        assert_eq!(slots.get("Neutral").map(|s| s.enemies.len()), Some(0));
        assert_eq!(
            slots.get("GoodGuy").map(|s| s.enemies.clone()),
            Some(vec!["BadGuy".to_owned(), CREEPS.to_owned()])
        );
        assert_eq!(
            slots.get("BadGuy").map(|s| s.enemies.clone()),
            Some(vec!["GoodGuy".to_owned(), CREEPS.to_owned()]),
            "existing creep enemies must not be duplicated"
        );

        let creeps = slots.get(CREEPS).expect("creeps slot added");
        assert!(creeps.non_combatant);
        assert!(!creeps.playable);
        assert_eq!(creeps.enemies, vec!["GoodGuy".to_owned(), "BadGuy".to_owned()]);
        assert_eq!(slots.names().last(), Some(CREEPS));
    }

    #[test]
    fn creep_migration_fails_when_creeps_already_exist() {
        let mut slots = PlayerSlots::new();
        slots.insert(slot(CREEPS, true, &[])).expect("insert");
        assert!(slots.apply_creep_migration().is_err());
    }

    #[test]
    fn playable_slots_are_synthesised_per_start() {
        let mut slots = PlayerSlots::new();
        slots.insert(slot("Neutral", true, &[])).expect("insert");

        assert_eq!(slots.ensure_playable(3), Ok(3));
        let names: Vec<&str> = slots.names().collect();
        assert_eq!(names, ["Neutral", "Multi0", "Multi1", "Multi2"]);

        let multi = slots.get("Multi1").expect("synthesised slot");
        assert!(multi.playable);
        assert!(multi.default_starting_units);
        assert_eq!(multi.enemies, vec![CREEPS.to_owned()]);
    }

    #[test]
    fn existing_playable_slot_suppresses_synthesis() {
        let mut slots = PlayerSlots::new();
        slots
            .insert(PlayerSlot {
                playable: true,
                ..PlayerSlot::new("Human")
            })
            .expect("insert");

        assert_eq!(slots.ensure_playable(4), Ok(0));
        assert_eq!(slots.len(), 1);
    }

    #[test]
    fn node_conversion_keeps_unknown_fields() {
        let node = MarkupNode::section(
            "PlayerReference@GoodGuy",
            vec![
                MarkupNode::with_value("Name", "GoodGuy"),
                MarkupNode::with_value("Race", "allies"),
                MarkupNode::with_value("Playable", "True"),
                MarkupNode::with_value("Enemies", "BadGuy, Creeps"),
                MarkupNode::with_value("ColorRamp", "161,134,236"),
            ],
        );

        let slot = PlayerSlot::from_node(&node).expect("slot parses");
        assert_eq!(slot.race.as_deref(), Some("allies"));
        assert!(slot.playable);
        assert_eq!(slot.enemies, vec!["BadGuy".to_owned(), "Creeps".to_owned()]);
        assert_eq!(slot.extra.len(), 1);

        let reparsed = PlayerSlot::from_node(&slot.to_node()).expect("written slot parses");
        assert_eq!(reparsed, slot);
    }

    #[test]
    fn missing_name_falls_back_to_node_key() {
        let node = MarkupNode::section("PlayerReference@Neutral", Vec::new());
        let slot = PlayerSlot::from_node(&node).expect("slot parses");
        assert_eq!(slot.name, "Neutral");
    }

    #[test]
    fn malformed_flags_are_reported() {
        let node = MarkupNode::section(
            "PlayerReference@GoodGuy",
            vec![MarkupNode::with_value("Playable", "maybe")],
        );
        assert!(PlayerSlot::from_node(&node).is_err());
    }
}
