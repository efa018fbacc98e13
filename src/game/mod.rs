//! The game state and the turn controller that owns it.
//!
//! A turn is: bump the turn counter (ending the game at the turn limit),
//! apply both moves, run the collision checks, collect items, then run the
//! score checks. The winner is fixed at most once, after which every further
//! `step` is rejected. A turn that fails part way leaves the state unusable,
//! so the game is aborted and rejects every further `step` as well.
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::agents::AgentView;
use crate::config::GameConfig;
use crate::error::GameError;
use crate::grid::{Grid, Position};
use crate::items::{ItemEvent, ItemKind, ItemRegistry};
use crate::snake::Snake;
use crate::types::{
    FoodGettableGame, Move, SizeDeterminableGame, SnakeBodyGettableGame, SnakeId,
    TurnDeterminableGame, VictorDeterminableGame,
};

pub mod collision;
mod duel;

pub use collision::{EndReason, Outcome};
pub use duel::Match;

/// Everything the simulation knows about a game in progress
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct GameState {
    grid: Grid,
    snakes: [Snake; 2],
    items: ItemRegistry,
    turn: u64,
    outcome: Option<Outcome>,
}

impl GameState {
    #[allow(missing_docs)]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[allow(missing_docs)]
    pub fn snake(&self, id: SnakeId) -> &Snake {
        &self.snakes[id.as_usize()]
    }

    /// both snakes, A first
    pub fn snakes(&self) -> &[Snake; 2] {
        &self.snakes
    }

    #[allow(missing_docs)]
    pub fn items(&self) -> &ItemRegistry {
        &self.items
    }

    /// how the game ended, `None` while it is still being played
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// the read-only view an agent decides from
    pub fn view_for(&self, id: SnakeId, visibility_range: i32) -> AgentView<'_> {
        AgentView {
            grid: &self.grid,
            me: self.snake(id),
            opponent: self.snake(id.other()),
            items: &self.items,
            visibility_range,
        }
    }

    fn finish(&mut self, outcome: Outcome) {
        debug_assert!(self.outcome.is_none(), "winner already fixed");
        if self.outcome.is_none() {
            debug!(winner = ?outcome.winner, reason = %outcome.reason, turn = self.turn, "game over");
            self.outcome = Some(outcome);
        }
    }
}

impl VictorDeterminableGame for GameState {
    fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    fn get_winner(&self) -> Option<SnakeId> {
        self.outcome.and_then(|o| o.winner)
    }
}

impl TurnDeterminableGame for GameState {
    fn turn(&self) -> u64 {
        self.turn
    }
}

impl SizeDeterminableGame for GameState {
    fn get_width(&self) -> u32 {
        self.grid.width()
    }

    fn get_height(&self) -> u32 {
        self.grid.height()
    }
}

impl FoodGettableGame for GameState {
    fn get_all_food_as_positions(&self) -> Vec<Position> {
        self.items.all_food().map(|(_, p)| p).collect()
    }
}

impl SnakeBodyGettableGame for GameState {
    fn get_snake_body_vec(&self, snake_id: &SnakeId) -> Vec<Position> {
        self.snake(*snake_id).body().iter().copied().collect()
    }
}

/// What one call to [`Game::step`] did
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TurnReport {
    /// the turn number this report is for, starting at 1
    pub turn: u64,
    /// item pickups and trap hits, in resolution order
    pub events: Vec<ItemEvent>,
    /// set when this turn ended the game
    pub outcome: Option<Outcome>,
}

/// The turn controller: the only thing that mutates a [`GameState`]
#[derive(Debug, Clone)]
pub struct Game {
    config: GameConfig,
    state: GameState,
    rng: SmallRng,
    aborted: bool,
}

impl Game {
    /// a game with both snakes on distinct random cells and the configured
    /// items spawned around them
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        Self::builder(config).build()
    }

    /// starts a game with an explicit layout
    pub fn builder(config: GameConfig) -> GameBuilder {
        GameBuilder {
            config,
            snakes: None,
            items: None,
        }
    }

    #[allow(missing_docs)]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[allow(missing_docs)]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// true once a turn has failed with an error
    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    /// the read-only view for one snake's agent
    pub fn view_for(&self, id: SnakeId) -> AgentView<'_> {
        self.state.view_for(id, self.config.visibility_range)
    }

    /// plays one turn. `moves[i]` is the heading for snake i; `None` keeps
    /// the snake's current heading.
    #[instrument(level = "trace", skip_all, fields(turn = self.state.turn + 1))]
    pub fn step(&mut self, moves: [Option<Move>; 2]) -> Result<TurnReport, GameError> {
        if self.aborted {
            return Err(GameError::GameAborted);
        }
        if self.state.is_over() {
            return Err(GameError::GameAlreadyOver);
        }
        let state = &mut self.state;
        state.turn += 1;
        let mut report = TurnReport {
            turn: state.turn,
            events: vec![],
            outcome: None,
        };

        if state.turn >= self.config.max_turns {
            let outcome = collision::turn_limit_outcome(&state.snakes[0], &state.snakes[1]);
            state.finish(outcome);
            report.outcome = Some(outcome);
            return Ok(report);
        }

        for (snake, mv) in state.snakes.iter_mut().zip(moves) {
            let heading = mv.or_else(|| snake.direction());
            snake.advance(heading);
        }

        if let Some(outcome) =
            collision::check_collisions(&state.grid, &state.snakes[0], &state.snakes[1])
        {
            state.finish(outcome);
            report.outcome = Some(outcome);
            return Ok(report);
        }

        report.events =
            match state
                .items
                .collect_items(&state.grid, &mut state.snakes, &self.config, &mut self.rng)
            {
                Ok(events) => events,
                Err(e) => {
                    warn!(turn = state.turn, error = %e, "aborting game");
                    self.aborted = true;
                    return Err(e);
                }
            };

        if let Some(outcome) = collision::check_scores(
            &state.snakes[0],
            &state.snakes[1],
            self.config.max_score,
        ) {
            state.finish(outcome);
            report.outcome = Some(outcome);
        }
        Ok(report)
    }
}

/// Builds a [`Game`], either from explicit snakes and items or at random
#[derive(Debug, Clone)]
pub struct GameBuilder {
    config: GameConfig,
    snakes: Option<[Snake; 2]>,
    items: Option<ItemRegistry>,
}

impl GameBuilder {
    /// uses these snakes instead of random single-segment ones
    pub fn snakes(mut self, a: Snake, b: Snake) -> Self {
        self.snakes = Some([a, b]);
        self
    }

    /// places an item. Once any item is placed the registry is not
    /// populated at random.
    pub fn item(mut self, kind: ItemKind, position: Position) -> Self {
        self.items
            .get_or_insert_with(ItemRegistry::new)
            .place(kind, position);
        self
    }

    /// leaves the board without any items
    pub fn no_items(mut self) -> Self {
        self.items.get_or_insert_with(ItemRegistry::new);
        self
    }

    /// validates the configuration and lays out the board
    pub fn build(self) -> Result<Game, GameError> {
        let config = self.config;
        config.validate()?;
        let grid = config.grid()?;
        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        let snakes = match self.snakes {
            Some(snakes) => snakes,
            None => random_snakes(&grid, &config, &mut rng),
        };

        let items = match self.items {
            Some(items) => items,
            None => {
                let mut items = ItemRegistry::new();
                items.populate(&grid, &snakes, &config, &mut rng)?;
                items
            }
        };

        Ok(Game {
            config,
            state: GameState {
                grid,
                snakes,
                items,
                turn: 0,
                outcome: None,
            },
            rng,
            aborted: false,
        })
    }
}

fn random_snakes<R: Rng>(grid: &Grid, config: &GameConfig, rng: &mut R) -> [Snake; 2] {
    let mut random_cell = || {
        Position::new(
            rng.gen_range(0..grid.width() as i32),
            rng.gen_range(0..grid.height() as i32),
        )
    };
    // validation guarantees at least two cells
    let first = random_cell();
    let mut second = random_cell();
    while second == first {
        second = random_cell();
    }
    let [name_a, name_b] = config.snake_names.clone();
    [Snake::new(name_a, first), Snake::new(name_b, second)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config_fixture;

    fn config() -> GameConfig {
        GameConfig {
            seed: Some(3),
            ..GameConfig::default()
        }
    }

    fn dot(name: &str, x: i32, y: i32) -> Snake {
        Snake::new(name, Position::new(x, y))
    }

    #[test]
    fn test_random_start_is_consistent() {
        let game = Game::new(config()).unwrap();
        let state = game.state();
        assert_ne!(
            state.snake(SnakeId::A).head_position(),
            state.snake(SnakeId::B).head_position()
        );
        assert_eq!(state.get_all_food_as_positions().len(), 4);
        assert_eq!(state.items().items(ItemKind::SpikeTrap).len(), 2);
        assert_eq!(state.turn(), 0);
        assert!(!state.is_over());
        assert_eq!(state.snake(SnakeId::A).name(), "Blue Snake");
        assert_eq!(state.snake(SnakeId::A).direction(), None);
    }

    #[test]
    fn test_same_seed_same_game() {
        let a = Game::new(config()).unwrap();
        let b = Game::new(config()).unwrap();
        assert_eq!(a.state(), b.state());
    }

    #[test]
    fn test_fixture_config_builds() {
        let game = Game::new(config_fixture(include_str!("../../fixtures/small_arena.json"))).unwrap();
        assert_eq!(game.state().get_width(), 8);
        assert_eq!(game.state().get_height(), 6);
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let bad = GameConfig {
            grid_height: 0,
            ..config()
        };
        assert!(matches!(Game::new(bad), Err(GameError::InvalidConfig(_))));
    }

    #[test]
    fn test_food_consumption_scenario() {
        let mut game = Game::builder(config())
            .snakes(dot("a", 5, 5), dot("b", 15, 15))
            .item(ItemKind::NormalFood, Position::new(6, 5))
            .build()
            .unwrap();

        let report = game.step([Some(Move::Right), Some(Move::Up)]).unwrap();
        assert_eq!(report.turn, 1);
        assert_eq!(report.outcome, None);
        assert_eq!(
            report.events,
            vec![ItemEvent::AteNormalFood {
                snake: SnakeId::A,
                position: Position::new(6, 5)
            }]
        );

        let a = game.state().snake(SnakeId::A);
        assert_eq!(a.score(), 1);
        assert_eq!(a.len(), 1);
        assert_eq!(a.pending_growth(), 1);
        let food = game.state().get_all_food_as_positions();
        assert_eq!(food.len(), 1);
        assert_ne!(food[0], Position::new(6, 5));
        assert!(!game.state().snake(SnakeId::A).occupies(food[0]));

        // the growth lands on the next move
        game.step([Some(Move::Down), Some(Move::Up)]).unwrap();
        assert_eq!(game.state().snake(SnakeId::A).len(), 2);
    }

    #[test]
    fn test_trap_elimination_scenario() {
        let mut game = Game::builder(config())
            .snakes(dot("a", 3, 3), dot("b", 15, 15))
            .item(ItemKind::SpikeTrap, Position::new(4, 3))
            .build()
            .unwrap();
        let report = game.step([Some(Move::Right), Some(Move::Up)]).unwrap();
        assert_eq!(game.state().snake(SnakeId::A).score(), -1);
        assert_eq!(
            report.outcome,
            Some(Outcome {
                winner: Some(SnakeId::B),
                reason: EndReason::Eliminated(SnakeId::A)
            })
        );
        assert!(game.state().is_over());
        // the trap was replaced
        assert_eq!(game.state().items().items(ItemKind::SpikeTrap).len(), 1);
    }

    #[test]
    fn test_head_to_head_scenario() {
        let mut game = Game::builder(config())
            .snakes(dot("a", 4, 4), dot("b", 6, 4))
            .no_items()
            .build()
            .unwrap();
        let report = game.step([Some(Move::Right), Some(Move::Left)]).unwrap();
        assert_eq!(report.outcome.unwrap().reason, EndReason::HeadToHead);
        assert!(game.state().is_over());
        assert_eq!(game.state().get_winner(), None);
    }

    #[test]
    fn test_max_turns_tie_scenario() {
        let mut game = Game::builder(GameConfig {
            max_turns: 3,
            ..config()
        })
        .snakes(dot("a", 1, 1), dot("b", 10, 10))
        .no_items()
        .build()
        .unwrap();
        assert!(game.step([Some(Move::Right), Some(Move::Left)]).unwrap().outcome.is_none());
        assert!(game.step([None, None]).unwrap().outcome.is_none());
        let report = game.step([None, None]).unwrap();
        assert_eq!(report.turn, 3);
        assert_eq!(
            report.outcome,
            Some(Outcome {
                winner: None,
                reason: EndReason::MaxTurns
            })
        );
        // the limit turn applies no moves
        assert_eq!(game.state().snake(SnakeId::A).head_position(), Position::new(3, 1));
    }

    #[test]
    fn test_max_turns_higher_score_wins() {
        let mut a = dot("a", 1, 1);
        a.set_score(4);
        let mut game = Game::builder(GameConfig {
            max_turns: 1,
            ..config()
        })
        .snakes(a, dot("b", 10, 10))
        .no_items()
        .build()
        .unwrap();
        let report = game.step([None, None]).unwrap();
        assert_eq!(report.outcome.unwrap().winner, Some(SnakeId::A));
    }

    #[test]
    fn test_wall_collision_ends_game() {
        let mut game = Game::builder(config())
            .snakes(dot("a", 0, 5), dot("b", 10, 10))
            .no_items()
            .build()
            .unwrap();
        let report = game.step([Some(Move::Left), Some(Move::Up)]).unwrap();
        let outcome = report.outcome.unwrap();
        assert_eq!(outcome.winner, Some(SnakeId::B));
        assert_eq!(outcome.reason, EndReason::OutOfBounds(SnakeId::A));
    }

    #[test]
    fn test_winning_score_ends_game() {
        let mut a = dot("a", 5, 5);
        a.set_score(19);
        let mut game = Game::builder(config())
            .snakes(a, dot("b", 15, 15))
            .item(ItemKind::NormalFood, Position::new(5, 4))
            .build()
            .unwrap();
        let report = game.step([Some(Move::Up), Some(Move::Up)]).unwrap();
        assert_eq!(report.outcome.unwrap().reason, EndReason::MaxScore(SnakeId::A));
    }

    #[test]
    fn test_step_after_game_over_is_rejected() {
        let mut game = Game::builder(config())
            .snakes(dot("a", 4, 4), dot("b", 6, 4))
            .no_items()
            .build()
            .unwrap();
        game.step([Some(Move::Right), Some(Move::Left)]).unwrap();
        let frozen = game.state().clone();
        assert!(matches!(
            game.step([Some(Move::Up), Some(Move::Up)]),
            Err(GameError::GameAlreadyOver)
        ));
        assert_eq!(game.state(), &frozen);
    }

    #[test]
    fn test_saturated_grid_aborts_game() {
        // a 3x1 strip: the second meal leaves no cell for the replacement
        let mut game = Game::builder(GameConfig {
            grid_width: 3,
            grid_height: 1,
            food_count: 1,
            spike_trap_count: 0,
            ..config()
        })
        .snakes(dot("a", 0, 0), dot("b", 2, 0))
        .item(ItemKind::NormalFood, Position::new(1, 0))
        .build()
        .unwrap();

        game.step([Some(Move::Right), None]).unwrap();
        assert_eq!(game.state().get_all_food_as_positions(), vec![Position::new(0, 0)]);

        let err = game.step([Some(Move::Left), None]).unwrap_err();
        assert!(matches!(
            err,
            GameError::GridSaturated {
                kind: ItemKind::NormalFood | ItemKind::SuperFood,
                ..
            }
        ));
        assert!(game.is_aborted());
        assert!(!game.state().is_over());

        let frozen = game.state().clone();
        assert!(matches!(game.step([None, None]), Err(GameError::GameAborted)));
        assert_eq!(game.state(), &frozen);
    }

    #[test]
    fn test_none_keeps_heading() {
        let mut game = Game::builder(config())
            .snakes(dot("a", 2, 2), dot("b", 10, 10))
            .no_items()
            .build()
            .unwrap();
        game.step([Some(Move::Down), Some(Move::Left)]).unwrap();
        game.step([None, None]).unwrap();
        assert_eq!(game.state().snake(SnakeId::A).head_position(), Position::new(2, 4));
        assert_eq!(game.state().snake(SnakeId::B).head_position(), Position::new(8, 10));
    }

    #[test]
    fn test_trait_accessors() {
        let game = Game::builder(config())
            .snakes(
                Snake::from_body(
                    "a",
                    vec![Position::new(2, 2), Position::new(1, 2)],
                    Some(Move::Right),
                ),
                dot("b", 9, 9),
            )
            .item(ItemKind::SuperFood, Position::new(5, 5))
            .item(ItemKind::NormalFood, Position::new(6, 5))
            .build()
            .unwrap();
        let state = game.state();
        assert_eq!(
            state.get_snake_body_vec(&SnakeId::A),
            vec![Position::new(2, 2), Position::new(1, 2)]
        );
        // normal food first
        assert_eq!(
            state.get_all_food_as_positions(),
            vec![Position::new(6, 5), Position::new(5, 5)]
        );
    }
}
