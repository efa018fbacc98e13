//! A single snake: its body, heading, score and delayed growth.
//!
//! The snake never validates its own moves. Moving into a wall or into a body
//! is legal here and leaves an invalid head that the collision checks pick up
//! on the same turn.
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::grid::Position;
use crate::types::{heading_vector, Move};

/// Struct holding one snake's state, head at the front of `body`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    name: String,
    body: VecDeque<Position>,
    direction: Option<Move>,
    score: i32,
    pending_growth: u32,
}

impl Snake {
    /// a fresh single-segment snake that hasn't picked a heading
    pub fn new(name: impl Into<String>, head: Position) -> Self {
        Snake {
            name: name.into(),
            body: VecDeque::from(vec![head]),
            direction: None,
            score: 0,
            pending_growth: 0,
        }
    }

    /// builds a snake from an explicit head-first body, used for fixtures.
    /// Panics on an empty body.
    pub fn from_body(
        name: impl Into<String>,
        body: impl IntoIterator<Item = Position>,
        direction: Option<Move>,
    ) -> Self {
        let body: VecDeque<Position> = body.into_iter().collect();
        assert!(!body.is_empty(), "a snake needs at least a head");
        Snake {
            name: name.into(),
            body,
            direction,
            score: 0,
            pending_growth: 0,
        }
    }

    #[allow(missing_docs)]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// every segment, head first
    pub fn body(&self) -> &VecDeque<Position> {
        &self.body
    }

    /// the current heading, `None` before the first move
    pub fn direction(&self) -> Option<Move> {
        self.direction
    }

    #[allow(missing_docs)]
    pub fn score(&self) -> i32 {
        self.score
    }

    #[allow(missing_docs)]
    pub fn set_score(&mut self, score: i32) {
        self.score = score;
    }

    #[allow(missing_docs)]
    pub fn add_score(&mut self, delta: i32) {
        self.score += delta;
    }

    /// segments still to be added by upcoming moves
    pub fn pending_growth(&self) -> u32 {
        self.pending_growth
    }

    #[allow(missing_docs)]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// always false, a snake keeps at least its head
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    #[allow(missing_docs)]
    pub fn head_position(&self) -> Position {
        self.body[0]
    }

    #[allow(missing_docs)]
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// all four moves minus the reverse of `current`. A single-segment snake
    /// may reverse in place, and with no heading every move is available.
    pub fn available_directions(&self, current: Option<Move>) -> Vec<Move> {
        Move::all()
            .into_iter()
            .filter(|mv| match current {
                Some(cur) if self.body.len() != 1 => *mv != cur.reverse(),
                _ => true,
            })
            .collect()
    }

    /// moves the head one step along `direction`, keeping the tail while
    /// growth is pending. `None` advances by the zero vector.
    pub fn advance(&mut self, direction: Option<Move>) {
        self.direction = direction;
        let new_head = self.head_position().add_vec(heading_vector(direction));
        self.body.push_front(new_head);
        if self.pending_growth > 0 {
            self.pending_growth -= 1;
        } else {
            self.body.pop_back();
        }
    }

    /// queue `amount` segments to be added on upcoming moves
    pub fn grow(&mut self, amount: u32) {
        self.pending_growth += amount;
    }

    /// drops the tail segment. Returns false when only the head is left,
    /// which the caller must treat as elimination.
    pub fn shrink(&mut self) -> bool {
        if self.body.len() > 1 {
            self.body.pop_back();
            true
        } else {
            false
        }
    }

    /// true when the head shares a cell with any other segment
    pub fn has_self_collision(&self) -> bool {
        let head = self.head_position();
        self.body.iter().skip(1).any(|p| *p == head)
    }

    /// true when `pos` is a non-head segment
    pub fn collides_with_body(&self, pos: Position) -> bool {
        self.body.iter().skip(1).any(|p| *p == pos)
    }

    /// true when any segment, head included, is on `pos`
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// true when `pos` is a segment that will still be occupied after the next
    /// move, i.e. anything but the tail
    pub fn blocks(&self, pos: Position) -> bool {
        let n = self.body.len();
        self.body.iter().take(n - 1).any(|p| *p == pos)
    }

    /// opponent segments inside the square of half-width `range` around our head
    pub fn visible_opponent_segments(&self, opponent: &Snake, range: i32) -> Vec<Position> {
        let head = self.head_position();
        opponent
            .body
            .iter()
            .filter(|seg| head.within_box(seg, range))
            .copied()
            .collect()
    }
}
