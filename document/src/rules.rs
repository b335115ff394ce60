//! Rule, sequence, weapon and voice overrides embedded in a map.

use skirmish_map_markup::MarkupNode;

/// Map-local rule overrides carried verbatim.
///
/// Downstream rule resolution is order sensitive, so every list keeps the
/// order it was loaded or built in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuleOverrideSet {
    /// Actor rule overrides.
    pub rules: Vec<MarkupNode>,
    /// Sprite sequence overrides.
    pub sequences: Vec<MarkupNode>,
    /// Weapon overrides.
    pub weapons: Vec<MarkupNode>,
    /// Voice overrides.
    pub voices: Vec<MarkupNode>,
}

impl RuleOverrideSet {
    /// Section names paired with their lists in the order they are written.
    pub(crate) fn sections(&self) -> [(&'static str, &[MarkupNode]); 4] {
        [
            ("Rules", &self.rules),
            ("Sequences", &self.sequences),
            ("Weapons", &self.weapons),
            ("Voices", &self.voices),
        ]
    }

    /// Reports whether no overrides are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections().iter().all(|(_, nodes)| nodes.is_empty())
    }
}
