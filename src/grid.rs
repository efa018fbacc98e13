//! positions and the fixed-size board they live on
use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::types::{Move, Vector};

/// A cell on the board, 0-indexed from the top left corner
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    #[allow(missing_docs)]
    pub x: i32,
    #[allow(missing_docs)]
    pub y: i32,
}

impl Position {
    #[allow(missing_docs)]
    pub const fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    #[allow(missing_docs)]
    pub fn add_vec(&self, v: Vector) -> Position {
        Position {
            x: self.x + v.x,
            y: self.y + v.y,
        }
    }

    /// |dx| + |dy|
    pub fn manhattan_distance(&self, other: &Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// true when both axis deltas are at most `range`, i.e. a square
    /// neighbourhood rather than a diamond
    pub fn within_box(&self, other: &Position, range: i32) -> bool {
        (self.x - other.x).abs() <= range && (self.y - other.y).abs() <= range
    }
}

/// Immutable board dimensions
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
}

impl Grid {
    /// builds a grid, rejecting empty boards and sizes that don't fit the
    /// signed coordinate space
    pub fn new(width: u32, height: u32) -> Result<Self, GameError> {
        if width == 0 || height == 0 {
            return Err(GameError::InvalidConfig(format!(
                "grid must be non-empty, got {}x{}",
                width, height
            )));
        }
        if width > i32::MAX as u32 || height > i32::MAX as u32 {
            return Err(GameError::InvalidConfig(format!(
                "grid {}x{} exceeds the coordinate range",
                width, height
            )));
        }
        Ok(Grid { width, height })
    }

    #[allow(missing_docs)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[allow(missing_docs)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// total number of cells on the board
    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// true iff both coordinates are within `[0, width) x [0, height)`
    pub fn is_valid_position(&self, position: Position) -> bool {
        position.x >= 0
            && position.x < self.width as i32
            && position.y >= 0
            && position.y < self.height as i32
    }

    /// in-bounds orthogonal neighbours with the move that reaches each one
    pub fn possible_moves(&self, position: Position) -> impl Iterator<Item = (Move, Position)> + '_ {
        Move::all()
            .into_iter()
            .map(move |mv| (mv, position.add_vec(mv.to_vector())))
            .filter(move |(_, p)| self.is_valid_position(*p))
    }

    /// in-bounds orthogonal neighbours
    pub fn neighbors(&self, position: Position) -> impl Iterator<Item = Position> + '_ {
        self.possible_moves(position).map(|(_, p)| p)
    }

    /// every cell on the board in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Position> {
        let (w, h) = (self.width as i32, self.height as i32);
        (0..h).flat_map(move |y| (0..w).map(move |x| Position::new(x, y)))
    }
}
