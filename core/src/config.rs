use serde::{Deserialize, Serialize};

use crate::*;

/// Player preferences, as read from a TOML file.
///
/// ```toml
/// difficulty = "custom"
/// seed = 42
///
/// [custom]
/// rows = 12
/// cols = 20
/// mines = 30
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub difficulty: Difficulty,
    /// Only used when `difficulty` is custom.
    pub custom: Option<GameSettings>,
    /// Fixes every mine layout of the session when set.
    pub seed: Option<u64>,
}

impl Preferences {
    /// Parses and validates preferences.
    pub fn from_toml_str(input: &str) -> core::result::Result<Self, ConfigError> {
        let preferences: Self = toml::from_str(input)?;
        preferences.settings()?;
        Ok(preferences)
    }

    pub fn settings(&self) -> Result<GameSettings> {
        self.difficulty.resolve(self.custom)
    }
}
