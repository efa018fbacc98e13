//! Terminal checks run by the turn controller. Each function is pure and
//! returns the first outcome it finds, in resolution order.
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::grid::Grid;
use crate::snake::Snake;
use crate::types::SnakeId;

/// Why the game ended. Snake ids name the snake the event happened to.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "reason", content = "snake", rename_all = "snake_case")]
pub enum EndReason {
    /// the head left the board
    OutOfBounds(SnakeId),
    /// the head ran into its own body
    SelfCollision(SnakeId),
    /// both heads landed on the same cell
    HeadToHead,
    /// the head ran into the opponent's body
    BodyCollision(SnakeId),
    /// the snake reached the winning score
    MaxScore(SnakeId),
    /// the score went negative
    Eliminated(SnakeId),
    /// both scores went negative on the same turn
    BothEliminated,
    /// the turn limit was reached
    MaxTurns,
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndReason::OutOfBounds(id) => write!(f, "snake {} left the board", id.0),
            EndReason::SelfCollision(id) => write!(f, "snake {} bit itself", id.0),
            EndReason::HeadToHead => write!(f, "head to head collision"),
            EndReason::BodyCollision(id) => write!(f, "snake {} hit its opponent", id.0),
            EndReason::MaxScore(id) => write!(f, "snake {} reached the winning score", id.0),
            EndReason::Eliminated(id) => write!(f, "snake {} was eliminated", id.0),
            EndReason::BothEliminated => write!(f, "both snakes were eliminated"),
            EndReason::MaxTurns => write!(f, "turn limit reached"),
        }
    }
}

/// A finished game: the winner, `None` for a tie, and why it ended
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    #[allow(missing_docs)]
    pub winner: Option<SnakeId>,
    #[allow(missing_docs)]
    pub reason: EndReason,
}

impl Outcome {
    fn win(winner: SnakeId, reason: EndReason) -> Self {
        Outcome {
            winner: Some(winner),
            reason,
        }
    }

    fn tie(reason: EndReason) -> Self {
        Outcome {
            winner: None,
            reason,
        }
    }
}

/// runs the collision checks after both snakes have moved: walls, then
/// self collisions, then head to head, then head into body. Snake A is
/// always checked before snake B.
pub fn check_collisions(grid: &Grid, a: &Snake, b: &Snake) -> Option<Outcome> {
    let snakes = [(SnakeId::A, a), (SnakeId::B, b)];

    for (id, snake) in snakes.iter() {
        if !grid.is_valid_position(snake.head_position()) {
            return Some(Outcome::win(id.other(), EndReason::OutOfBounds(*id)));
        }
    }

    for (id, snake) in snakes.iter() {
        if snake.has_self_collision() {
            return Some(Outcome::win(id.other(), EndReason::SelfCollision(*id)));
        }
    }

    if a.head_position() == b.head_position() {
        return Some(Outcome::tie(EndReason::HeadToHead));
    }

    for ((id, snake), (_, opponent)) in snakes.iter().zip(snakes.iter().rev()) {
        if opponent.collides_with_body(snake.head_position()) {
            return Some(Outcome::win(id.other(), EndReason::BodyCollision(*id)));
        }
    }

    None
}

/// score thresholds, checked after items are collected. A winning score
/// takes precedence over eliminations.
pub fn check_scores(a: &Snake, b: &Snake, max_score: i32) -> Option<Outcome> {
    if a.score() >= max_score {
        return Some(Outcome::win(SnakeId::A, EndReason::MaxScore(SnakeId::A)));
    }
    if b.score() >= max_score {
        return Some(Outcome::win(SnakeId::B, EndReason::MaxScore(SnakeId::B)));
    }
    match (a.score() < 0, b.score() < 0) {
        (true, true) => Some(Outcome::tie(EndReason::BothEliminated)),
        (true, false) => Some(Outcome::win(SnakeId::B, EndReason::Eliminated(SnakeId::A))),
        (false, true) => Some(Outcome::win(SnakeId::A, EndReason::Eliminated(SnakeId::B))),
        (false, false) => None,
    }
}

/// the turn limit outcome: strictly higher score wins, otherwise a tie
pub fn turn_limit_outcome(a: &Snake, b: &Snake) -> Outcome {
    match a.score().cmp(&b.score()) {
        Ordering::Greater => Outcome::win(SnakeId::A, EndReason::MaxTurns),
        Ordering::Less => Outcome::win(SnakeId::B, EndReason::MaxTurns),
        Ordering::Equal => Outcome::tie(EndReason::MaxTurns),
    }
}
