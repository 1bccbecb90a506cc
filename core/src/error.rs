use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid cell id, expected \"x,y\"")]
    InvalidCellId,
    #[error("Board needs at least one row and one column")]
    InvalidDimensions,
    #[error("Too many mines")]
    TooManyMines,
    #[error("Unknown difficulty")]
    UnknownDifficulty,
    #[error("Custom difficulty requires explicit settings")]
    MissingCustomSettings,
    #[error("Board shape does not match its cell coordinates")]
    InvalidBoardShape,
}

pub type Result<T> = core::result::Result<T, GameError>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not parse preferences: {0}")]
    Parse(#[from] toml::de::Error),
    #[error(transparent)]
    Game(#[from] GameError),
}
