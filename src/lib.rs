#![deny(
    warnings,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs
)]
//! A deterministic two-snake duel on a fixed grid.
//!
//! Two snakes compete for food while avoiding walls, spike traps, their own
//! bodies and each other. Each snake is steered by an [`agents::Agent`]: an
//! A* searcher that heads for the most valuable food, a one-ply local search
//! that scores neighbouring cells, or a scripted move list standing in for a
//! human player.
//!
//! ```
//! # use snake_duel::agents::{AStarAgent, LocalSearchAgent};
//! # use snake_duel::config::{GameConfig, LocalSearchConfig};
//! # use snake_duel::game::{Game, Match};
//! let config = GameConfig {
//!     seed: Some(7),
//!     max_turns: 300,
//!     ..GameConfig::default()
//! };
//! let mut duel = Match::new(
//!     Game::new(config).unwrap(),
//!     Box::new(AStarAgent::default()),
//!     Box::new(LocalSearchAgent::with_seed(LocalSearchConfig::default(), 7)),
//! );
//! let outcome = duel.play_until_over(1_000).unwrap();
//! assert!(outcome.is_some());
//! ```
//!
//! All randomness comes from seedable `SmallRng`s, so a game is reproducible
//! from its configuration and agent seeds.

use config::GameConfig;

pub mod agents;
pub mod config;
pub mod error;
pub mod game;
pub mod grid;
pub mod items;
pub mod snake;
pub mod snapshot;
pub mod types;

/// Loads a configuration fixture from a given string
pub fn config_fixture(config_fixture: &str) -> GameConfig {
    let c: Result<GameConfig, _> = GameConfig::from_json(config_fixture);
    c.expect("the json literal is valid")
}
