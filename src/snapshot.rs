//! A frozen, serializable copy of the game for renderers and logs.
use itertools::Itertools;
use num_format::{Locale, ToFormattedString};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::game::{EndReason, GameState};
use crate::grid::Position;
use crate::items::ItemKind;
use crate::types::{Move, SnakeId, TurnDeterminableGame, VictorDeterminableGame};

/// What a renderer needs to know about one snake
#[allow(missing_docs)]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SnakeSnapshot {
    pub name: String,
    /// head first
    pub body: Vec<Position>,
    pub direction: Option<Move>,
    pub score: i32,
}

/// Everything visible about a game at the end of a turn
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    #[allow(missing_docs)]
    pub width: u32,
    #[allow(missing_docs)]
    pub height: u32,
    /// snake A, then snake B
    pub snakes: [SnakeSnapshot; 2],
    #[allow(missing_docs)]
    pub normal_food: Vec<Position>,
    #[allow(missing_docs)]
    pub super_food: Vec<Position>,
    #[allow(missing_docs)]
    pub spike_traps: Vec<Position>,
    #[allow(missing_docs)]
    pub turn: u64,
    #[allow(missing_docs)]
    pub game_over: bool,
    /// the winning snake, `None` while playing or after a tie
    pub winner_id: Option<SnakeId>,
    /// name of the winning snake, for display
    pub winner: Option<String>,
    #[allow(missing_docs)]
    pub end_reason: Option<EndReason>,
}

impl Snapshot {
    /// captures the current state
    pub fn capture(state: &GameState) -> Self {
        let snake = |id: SnakeId| {
            let s = state.snake(id);
            SnakeSnapshot {
                name: s.name().to_string(),
                body: s.body().iter().copied().collect_vec(),
                direction: s.direction(),
                score: s.score(),
            }
        };
        let items = state.items();
        Snapshot {
            width: state.grid().width(),
            height: state.grid().height(),
            snakes: [snake(SnakeId::A), snake(SnakeId::B)],
            normal_food: items.positions(ItemKind::NormalFood).collect_vec(),
            super_food: items.positions(ItemKind::SuperFood).collect_vec(),
            spike_traps: items.positions(ItemKind::SpikeTrap).collect_vec(),
            turn: state.turn(),
            game_over: state.is_over(),
            winner_id: state.get_winner(),
            winner: state
                .get_winner()
                .map(|id| state.snake(id).name().to_string()),
            end_reason: state.outcome().map(|o| o.reason),
        }
    }

    #[allow(missing_docs)]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    #[allow(missing_docs)]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    fn glyph(&self, position: Position) -> char {
        let [a, b] = &self.snakes;
        if a.body.first() == Some(&position) {
            'A'
        } else if b.body.first() == Some(&position) {
            'B'
        } else if a.body.contains(&position) {
            'a'
        } else if b.body.contains(&position) {
            'b'
        } else if self.normal_food.contains(&position) {
            'f'
        } else if self.super_food.contains(&position) {
            'S'
        } else if self.spike_traps.contains(&position) {
            'x'
        } else {
            '.'
        }
    }
}

impl From<&GameState> for Snapshot {
    fn from(state: &GameState) -> Self {
        Snapshot::capture(state)
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        // row 0 is the top of the board
        for y in 0..self.height as i32 {
            let row = (0..self.width as i32)
                .map(|x| self.glyph(Position::new(x, y)))
                .join(" ");
            writeln!(f, "{}", row)?;
        }
        write!(f, "turn {}", self.turn.to_formatted_string(&Locale::en))?;
        for snake in self.snakes.iter() {
            write!(
                f,
                " ({} score: {} length: {})",
                snake.name,
                snake.score,
                snake.body.len()
            )?;
        }
        if self.game_over {
            match &self.winner {
                Some(name) => write!(f, " winner: {}", name)?,
                None => write!(f, " tie")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::game::Game;
    use crate::snake::Snake;

    fn small_game() -> Game {
        Game::builder(GameConfig {
            grid_width: 5,
            grid_height: 3,
            seed: Some(1),
            ..GameConfig::default()
        })
        .snakes(
            Snake::from_body(
                "Blue Snake",
                vec![Position::new(1, 0), Position::new(0, 0)],
                Some(Move::Right),
            ),
            Snake::new("Orange Snake", Position::new(4, 2)),
        )
        .item(ItemKind::NormalFood, Position::new(2, 1))
        .item(ItemKind::SuperFood, Position::new(3, 1))
        .item(ItemKind::SpikeTrap, Position::new(0, 2))
        .build()
        .unwrap()
    }

    #[test]
    fn test_capture_copies_state() {
        let game = small_game();
        let snapshot = Snapshot::from(game.state());
        assert_eq!(snapshot.snakes[0].name, "Blue Snake");
        assert_eq!(snapshot.snakes[0].body.len(), 2);
        assert_eq!(snapshot.normal_food, vec![Position::new(2, 1)]);
        assert_eq!(snapshot.turn, 0);
        assert!(!snapshot.game_over);
        assert_eq!(snapshot.winner_id, None);
        assert_eq!(snapshot.winner, None);
    }

    #[test]
    fn test_renders_board() {
        let snapshot = Snapshot::capture(small_game().state());
        let expected = "\na A . . .\n. . f S .\nx . . . B\nturn 0 (Blue Snake score: 0 length: 2) (Orange Snake score: 0 length: 1)";
        assert_eq!(snapshot.to_string(), expected);
    }

    #[test]
    fn test_winner_is_named() {
        let mut game = small_game();
        game.step([Some(Move::Up), Some(Move::Up)]).unwrap();
        let snapshot = Snapshot::capture(game.state());
        assert!(snapshot.game_over);
        assert_eq!(snapshot.winner_id, Some(SnakeId::B));
        assert_eq!(snapshot.winner.as_deref(), Some("Orange Snake"));
        assert_eq!(snapshot.end_reason, Some(EndReason::OutOfBounds(SnakeId::A)));
        assert!(snapshot.to_string().ends_with("winner: Orange Snake"));
    }

    #[test]
    fn test_winner_id_separates_same_names() {
        let mut game = Game::builder(GameConfig {
            grid_width: 5,
            grid_height: 3,
            seed: Some(1),
            ..GameConfig::default()
        })
        .snakes(
            Snake::new("Twin", Position::new(1, 1)),
            Snake::new("Twin", Position::new(3, 0)),
        )
        .no_items()
        .build()
        .unwrap();
        game.step([Some(Move::Down), Some(Move::Up)]).unwrap();
        let snapshot = Snapshot::capture(game.state());
        assert_eq!(snapshot.end_reason, Some(EndReason::OutOfBounds(SnakeId::B)));
        assert_eq!(snapshot.winner_id, Some(SnakeId::A));
        assert_eq!(snapshot.winner.as_deref(), Some("Twin"));
        let parsed = Snapshot::from_json(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(parsed.winner_id, Some(SnakeId::A));
    }

    #[test]
    fn test_json_keeps_everything() {
        let snapshot = Snapshot::capture(small_game().state());
        let json = snapshot.to_json().unwrap();
        assert!(json.contains("\"direction\":\"right\""));
        assert_eq!(Snapshot::from_json(&json).unwrap(), snapshot);
    }

    #[test]
    fn test_turn_uses_thousands_separator() {
        let mut snapshot = Snapshot::capture(small_game().state());
        snapshot.turn = 12_345;
        assert!(snapshot.to_string().contains("turn 12,345"));
    }
}
