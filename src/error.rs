//! errors surfaced by the simulation. Eliminations are game outcomes, not errors.
use std::error::Error;
use std::fmt;

use crate::items::ItemKind;

/// Everything that can go wrong while setting up or advancing a game
#[derive(Debug)]
pub enum GameError {
    /// the configuration can never produce a playable game
    InvalidConfig(String),
    /// the configuration JSON could not be parsed
    MalformedConfig(serde_json::Error),
    /// no free cell was left for a new item
    GridSaturated {
        /// the item that could not be placed
        kind: ItemKind,
        /// random probes made before falling back to a full scan
        attempts: usize,
    },
    /// a turn was requested after the winner was fixed
    GameAlreadyOver,
    /// a turn was requested after an earlier turn failed part way through
    GameAborted,
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::InvalidConfig(reason) => write!(f, "invalid configuration: {}", reason),
            GameError::MalformedConfig(e) => write!(f, "malformed configuration: {}", e),
            GameError::GridSaturated { kind, attempts } => write!(
                f,
                "no free cell for {} after {} random probes and a full scan",
                kind, attempts
            ),
            GameError::GameAlreadyOver => write!(f, "the game is already over"),
            GameError::GameAborted => write!(f, "the game was aborted by an earlier error"),
        }
    }
}

impl Error for GameError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            GameError::MalformedConfig(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for GameError {
    fn from(e: serde_json::Error) -> Self {
        GameError::MalformedConfig(e)
    }
}
