//! various types that are shared by the simulation and the agents
use serde::{Deserialize, Serialize, Serializer};
use std::fmt::{self, Debug};
use std::time::Duration;

use crate::grid::Position;

/// A vector with which to do positional math
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vector {
    /// x offset
    pub x: i32,
    /// y offset
    pub y: i32,
}

impl Vector {
    /// the zero vector, used by a snake that has not picked a heading yet
    pub const ZERO: Vector = Vector { x: 0, y: 0 };
}

/// Represents a move. The grid uses screen coordinates, so `Up` decreases y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Move {
    #[allow(missing_docs)]
    Up,
    #[allow(missing_docs)]
    Down,
    #[allow(missing_docs)]
    Left,
    #[allow(missing_docs)]
    Right,
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Left => write!(f, "left"),
            Move::Right => write!(f, "right"),
            Move::Up => write!(f, "up"),
            Move::Down => write!(f, "down"),
        }
    }
}

impl Move {
    /// convert this move to a vector
    pub fn to_vector(self) -> Vector {
        match self {
            Move::Left => Vector { x: -1, y: 0 },
            Move::Right => Vector { x: 1, y: 0 },
            Move::Up => Vector { x: 0, y: -1 },
            Move::Down => Vector { x: 0, y: 1 },
        }
    }

    /// create a Move from the given vector, `None` for anything that isn't a unit step
    pub fn from_vector(vector: Vector) -> Option<Self> {
        match vector {
            Vector { x: -1, y: 0 } => Some(Self::Left),
            Vector { x: 1, y: 0 } => Some(Self::Right),
            Vector { x: 0, y: -1 } => Some(Self::Up),
            Vector { x: 0, y: 1 } => Some(Self::Down),
            _ => None,
        }
    }

    /// the move that takes `from` to the orthogonally adjacent `to`
    pub fn between(from: Position, to: Position) -> Option<Self> {
        Self::from_vector(Vector {
            x: to.x - from.x,
            y: to.y - from.y,
        })
    }

    /// returns all possible moves, in the order Up, Down, Left, Right
    pub fn all() -> [Move; 4] {
        [Move::Up, Move::Down, Move::Left, Move::Right]
    }

    /// the 180 degree turn of this move
    pub fn reverse(self) -> Move {
        match self {
            Move::Up => Move::Down,
            Move::Down => Move::Up,
            Move::Left => Move::Right,
            Move::Right => Move::Left,
        }
    }
}

/// Vector for a heading, where `None` is the heading of a snake that has not moved yet
pub fn heading_vector(heading: Option<Move>) -> Vector {
    heading.map(Move::to_vector).unwrap_or(Vector::ZERO)
}

/// token to represent one of the two snakes. `SnakeId(0)` is snake A and
/// `SnakeId(1)` is snake B; collision checks always consider A first.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize)]
#[repr(transparent)]
pub struct SnakeId(pub u8);

impl SnakeId {
    /// the first snake
    pub const A: SnakeId = SnakeId(0);
    /// the second snake
    pub const B: SnakeId = SnakeId(1);

    /// convert this snake ID to a usize
    pub fn as_usize(&self) -> usize {
        self.0 as usize
    }

    /// the opponent of this snake
    pub fn other(&self) -> SnakeId {
        if *self == SnakeId::A {
            SnakeId::B
        } else {
            SnakeId::A
        }
    }

    /// both snake ids, in resolution order
    pub fn both() -> [SnakeId; 2] {
        [SnakeId::A, SnakeId::B]
    }
}

impl Serialize for SnakeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.0)
    }
}

/// Instruments to be used with the turn controller
pub trait SimulatorInstruments: Debug {
    #[allow(missing_docs)]
    fn observe_turn(&self, duration: Duration);
}

/// Instruments that discard every observation
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopInstruments;

impl SimulatorInstruments for NoopInstruments {
    fn observe_turn(&self, _duration: Duration) {}
}

/// A game which can have it's winner determined
pub trait VictorDeterminableGame: Debug {
    #[allow(missing_docs)]
    fn is_over(&self) -> bool;

    /// get the winner for a given game, will return None in the case of a draw, or if the game is not over
    fn get_winner(&self) -> Option<SnakeId>;
}

/// a game for which the size of the game board can be determined
pub trait SizeDeterminableGame {
    #[allow(missing_docs)]
    fn get_width(&self) -> u32;
    #[allow(missing_docs)]
    fn get_height(&self) -> u32;
}

/// a game for which the current turn is determinable
pub trait TurnDeterminableGame {
    #[allow(missing_docs)]
    fn turn(&self) -> u64;
}

/// A game for which the food on the board can be queried
pub trait FoodGettableGame {
    /// every normal and super food position, normal food first
    fn get_all_food_as_positions(&self) -> Vec<Position>;
}

/// A game where an entire snake body is gettable
pub trait SnakeBodyGettableGame {
    /// return a Vec of the positions for a given snake body, in order from head to tail
    fn get_snake_body_vec(&self, snake_id: &SnakeId) -> Vec<Position>;
}
