//! Environment consulted while loading older map formats.

use serde::Deserialize;

/// Mods loaded by the embedding application.
///
/// ```toml
/// mods = ["ra", "cnc"]
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoadEnvironment {
    /// Mod identifiers in load order.
    #[serde(default)]
    pub mods: Vec<String>,
}

impl LoadEnvironment {
    /// Creates an environment from mod identifiers in load order.
    #[must_use]
    pub fn new<I, S>(mods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            mods: mods.into_iter().map(Into::into).collect(),
        }
    }

    /// Parses the environment from TOML.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Mod assumed by maps that predate the `RequiresMod` field.
    #[must_use]
    pub fn active_mod(&self) -> Option<&str> {
        self.mods.first().map(String::as_str)
    }
}
