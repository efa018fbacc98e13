//! Decision makers for the two snakes.
//!
//! Every agent sees the board through an [`AgentView`], a borrow of the
//! pre-turn state, and answers with a heading. Agents never mutate the game;
//! the turn controller applies their decisions.
use std::fmt::Debug;

use crate::grid::{Grid, Position};
use crate::items::ItemRegistry;
use crate::snake::Snake;
use crate::types::Move;

mod astar;
mod local_search;
mod scripted;

pub use astar::{AStarAgent, SearchTrace};
pub use local_search::{LocalSearchAgent, LocalTrace, MoveEvaluation};
pub use scripted::ScriptedAgent;

/// Read-only view of the board from one snake's point of view
#[derive(Debug, Clone, Copy)]
pub struct AgentView<'a> {
    #[allow(missing_docs)]
    pub grid: &'a Grid,
    /// the snake being controlled
    pub me: &'a Snake,
    #[allow(missing_docs)]
    pub opponent: &'a Snake,
    #[allow(missing_docs)]
    pub items: &'a ItemRegistry,
    /// half-width of the square around our head in which opponent segments are visible
    pub visibility_range: i32,
}

impl<'a> AgentView<'a> {
    #[allow(missing_docs)]
    pub fn head(&self) -> Position {
        self.me.head_position()
    }

    /// a cell the head can move onto without dying on the spot: on the board,
    /// not on our own body (the tail moves away), not on the opponent
    pub fn is_legal(&self, position: Position) -> bool {
        self.grid.is_valid_position(position)
            && !self.me.blocks(position)
            && !self.opponent.occupies(position)
    }

    /// the moves available from the current heading that land on a legal cell,
    /// in `Move::all()` order
    pub fn legal_moves(&self) -> Vec<(Move, Position)> {
        let head = self.head();
        self.me
            .available_directions(self.me.direction())
            .into_iter()
            .map(|mv| (mv, head.add_vec(mv.to_vector())))
            .filter(|(_, p)| self.is_legal(*p))
            .collect()
    }

    /// opponent segments our radar picks up
    pub fn visible_opponent_segments(&self) -> Vec<Position> {
        self.me
            .visible_opponent_segments(self.opponent, self.visibility_range)
    }
}

/// Diagnostics of an agent's most recent decision
#[derive(Debug, Clone, Copy)]
pub enum DecisionTrace<'a> {
    #[allow(missing_docs)]
    Search(&'a SearchTrace),
    #[allow(missing_docs)]
    Local(&'a LocalTrace),
}

/// Anything that can steer a snake
pub trait Agent: Debug {
    /// display name of the strategy
    fn name(&self) -> &str;

    /// picks the next heading. `None` keeps the current heading.
    fn decide(&mut self, view: &AgentView<'_>) -> Option<Move>;

    /// diagnostics of the last call to `decide`, for visualisation
    fn trace(&self) -> Option<DecisionTrace<'_>> {
        None
    }
}
