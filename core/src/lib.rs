use core::fmt;
use core::ops::BitOr;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

pub use cell::*;
pub use config::*;
pub use error::*;
pub use game::*;
pub use grid::*;
pub use reducer::*;
pub use timer::*;
pub use types::*;

pub mod board;
mod cell;
mod config;
mod error;
mod game;
mod grid;
mod reducer;
mod timer;
mod types;

/// Board dimensions and mine count.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSettings {
    pub rows: Coord,
    pub cols: Coord,
    pub mines: CellCount,
}

impl GameSettings {
    pub const fn new_unchecked(rows: Coord, cols: Coord, mines: CellCount) -> Self {
        Self { rows, cols, mines }
    }

    pub fn new(rows: Coord, cols: Coord, mines: CellCount) -> Result<Self> {
        let settings = Self::new_unchecked(rows, cols, mines);
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(GameError::InvalidDimensions);
        }
        if self.mines > self.total_cells() {
            return Err(GameError::TooManyMines);
        }
        Ok(())
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.rows, self.cols)
    }

    pub const fn safe_cell_count(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Expert,
    Custom,
}

impl Difficulty {
    pub const BEGINNER: GameSettings = GameSettings::new_unchecked(9, 9, 10);
    pub const INTERMEDIATE: GameSettings = GameSettings::new_unchecked(16, 16, 40);
    pub const EXPERT: GameSettings = GameSettings::new_unchecked(16, 30, 99);

    /// Preset settings, `None` for [`Difficulty::Custom`].
    pub const fn settings(self) -> Option<GameSettings> {
        match self {
            Self::Beginner => Some(Self::BEGINNER),
            Self::Intermediate => Some(Self::INTERMEDIATE),
            Self::Expert => Some(Self::EXPERT),
            Self::Custom => None,
        }
    }

    /// Settings to play with: the preset, or `custom` for [`Difficulty::Custom`].
    pub fn resolve(self, custom: Option<GameSettings>) -> Result<GameSettings> {
        match self.settings() {
            Some(preset) => Ok(preset),
            None => {
                let custom = custom.ok_or(GameError::MissingCustomSettings)?;
                custom.validate()?;
                Ok(custom)
            }
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Expert => "expert",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "expert" => Ok(Self::Expert),
            "custom" => Ok(Self::Custom),
            _ => Err(GameError::UnknownDifficulty),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitMine => true,
            Won => true,
        }
    }
}

/// Merges outcomes of opening several cells at once.
impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use RevealOutcome::*;
        match (self, rhs) {
            (HitMine, _) => HitMine,
            (_, HitMine) => HitMine,
            (Won, _) => Won,
            (_, Won) => Won,
            (Revealed, _) => Revealed,
            (_, Revealed) => Revealed,
            (NoChange, NoChange) => NoChange,
        }
    }
}
