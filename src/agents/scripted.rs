use std::collections::VecDeque;

use super::{Agent, AgentView};
use crate::types::Move;

/// Replays a fixed list of decisions, then keeps the current heading. Stands
/// in for a human player or any other outside decision source.
#[derive(Debug, Clone)]
pub struct ScriptedAgent {
    name: String,
    moves: VecDeque<Option<Move>>,
}

impl ScriptedAgent {
    #[allow(missing_docs)]
    pub fn new(name: impl Into<String>, moves: impl IntoIterator<Item = Option<Move>>) -> Self {
        ScriptedAgent {
            name: name.into(),
            moves: moves.into_iter().collect(),
        }
    }

    /// queues another decision behind the remaining ones
    pub fn push(&mut self, mv: Option<Move>) {
        self.moves.push_back(mv);
    }

    /// decisions not yet replayed
    pub fn remaining(&self) -> usize {
        self.moves.len()
    }
}

impl Agent for ScriptedAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn decide(&mut self, _view: &AgentView<'_>) -> Option<Move> {
        self.moves.pop_front().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Grid, Position};
    use crate::items::ItemRegistry;
    use crate::snake::Snake;

    #[test]
    fn test_replays_then_keeps_heading() {
        let grid = Grid::new(5, 5).unwrap();
        let me = Snake::new("me", Position::new(1, 1));
        let opponent = Snake::new("them", Position::new(3, 3));
        let items = ItemRegistry::new();
        let view = AgentView {
            grid: &grid,
            me: &me,
            opponent: &opponent,
            items: &items,
            visibility_range: 2,
        };
        let mut agent = ScriptedAgent::new("human", vec![Some(Move::Up), None]);
        agent.push(Some(Move::Left));
        assert_eq!(agent.remaining(), 3);
        assert_eq!(agent.decide(&view), Some(Move::Up));
        assert_eq!(agent.decide(&view), None);
        assert_eq!(agent.decide(&view), Some(Move::Left));
        assert_eq!(agent.decide(&view), None);
        assert_eq!(agent.name(), "human");
        assert!(agent.trace().is_none());
    }
}
