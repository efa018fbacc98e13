use std::time::Instant;
use tracing::{debug, instrument};

use super::{Game, Outcome, TurnReport};
use crate::agents::Agent;
use crate::error::GameError;
use crate::types::{NoopInstruments, SimulatorInstruments, SnakeId, VictorDeterminableGame};

/// A game driven by two agents. Agent `i` controls snake `SnakeId(i)`.
#[derive(Debug)]
pub struct Match<I: SimulatorInstruments = NoopInstruments> {
    game: Game,
    agents: [Box<dyn Agent>; 2],
    instruments: I,
}

impl Match<NoopInstruments> {
    #[allow(missing_docs)]
    pub fn new(game: Game, a: Box<dyn Agent>, b: Box<dyn Agent>) -> Self {
        Self::with_instruments(game, a, b, NoopInstruments)
    }
}

impl<I: SimulatorInstruments> Match<I> {
    /// like `new`, reporting the time spent on every turn to `instruments`
    pub fn with_instruments(game: Game, a: Box<dyn Agent>, b: Box<dyn Agent>, instruments: I) -> Self {
        Match {
            game,
            agents: [a, b],
            instruments,
        }
    }

    #[allow(missing_docs)]
    pub fn game(&self) -> &Game {
        &self.game
    }

    #[allow(missing_docs)]
    pub fn instruments(&self) -> &I {
        &self.instruments
    }

    #[allow(missing_docs)]
    pub fn agent(&self, id: SnakeId) -> &dyn Agent {
        self.agents[id.as_usize()].as_ref()
    }

    /// asks both agents for a move, then steps the game. Both decisions are
    /// taken from the same pre-turn state.
    #[instrument(level = "trace", skip_all)]
    pub fn play_turn(&mut self) -> Result<TurnReport, GameError> {
        let start = Instant::now();
        let game = &self.game;
        let mut decisions = [None; 2];
        for (id, agent) in SnakeId::both().into_iter().zip(self.agents.iter_mut()) {
            let view = game.view_for(id);
            decisions[id.as_usize()] = agent.decide(&view);
        }
        let report = self.game.step(decisions)?;
        self.instruments.observe_turn(start.elapsed());
        Ok(report)
    }

    /// plays until the game ends or `turn_limit` more turns have been played,
    /// returning the outcome if there is one
    pub fn play_until_over(&mut self, turn_limit: u64) -> Result<Option<Outcome>, GameError> {
        for _ in 0..turn_limit {
            if let Some(outcome) = self.play_turn()?.outcome {
                debug!(
                    a = self.agents[0].name(),
                    b = self.agents[1].name(),
                    turn = self.game.state().turn,
                    "match finished"
                );
                return Ok(Some(outcome));
            }
        }
        Ok(self.game.state().outcome())
    }

    /// true once the underlying game has a result
    pub fn is_over(&self) -> bool {
        self.game.state().is_over()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::{AStarAgent, LocalSearchAgent, ScriptedAgent};
    use crate::config::{AStarConfig, GameConfig, LocalSearchConfig};
    use crate::game::EndReason;
    use crate::grid::Position;
    use crate::snake::Snake;
    use crate::types::Move;
    use std::cell::Cell;
    use std::time::Duration;

    #[derive(Debug, Default)]
    struct CountingInstruments {
        turns: Cell<u32>,
    }

    impl SimulatorInstruments for CountingInstruments {
        fn observe_turn(&self, _duration: Duration) {
            self.turns.set(self.turns.get() + 1);
        }
    }

    fn config(seed: u64) -> GameConfig {
        GameConfig {
            seed: Some(seed),
            max_turns: 500,
            ..GameConfig::default()
        }
    }

    #[test]
    fn test_scripted_agents_drive_the_game() {
        let game = Game::builder(config(1))
            .snakes(
                Snake::new("a", Position::new(4, 4)),
                Snake::new("b", Position::new(6, 4)),
            )
            .no_items()
            .build()
            .unwrap();
        let mut duel = Match::with_instruments(
            game,
            Box::new(ScriptedAgent::new("left", vec![Some(Move::Right)])),
            Box::new(ScriptedAgent::new("right", vec![Some(Move::Left)])),
            CountingInstruments::default(),
        );
        let outcome = duel.play_until_over(10).unwrap().unwrap();
        assert_eq!(outcome.reason, EndReason::HeadToHead);
        assert_eq!(duel.instruments.turns.get(), 1);
        assert!(duel.is_over());
        assert!(duel.play_turn().is_err());
    }

    #[test]
    fn test_agents_see_the_same_pre_turn_state() {
        // both heads land on (2, 1)
        let game = Game::builder(config(2))
            .snakes(
                Snake::new("a", Position::new(1, 1)),
                Snake::new("b", Position::new(3, 1)),
            )
            .no_items()
            .build()
            .unwrap();
        let mut duel = Match::new(
            game,
            Box::new(ScriptedAgent::new("a", vec![Some(Move::Right)])),
            Box::new(ScriptedAgent::new("b", vec![Some(Move::Left)])),
        );
        let report = duel.play_turn().unwrap();
        assert_eq!(report.outcome.unwrap().winner, None);
    }

    #[test]
    fn test_ai_match_terminates_with_a_result() {
        let game = Game::new(config(9)).unwrap();
        let mut duel = Match::new(
            game,
            Box::new(AStarAgent::new(AStarConfig::default())),
            Box::new(LocalSearchAgent::with_seed(LocalSearchConfig::default(), 9)),
        );
        let outcome = duel.play_until_over(1_000).unwrap();
        assert!(outcome.is_some());
        assert!(duel.game().state().turn <= 500);
        assert_eq!(duel.agent(SnakeId::A).name(), "A* Search");
    }

    #[test]
    fn test_turn_limit_stops_early() {
        let game = Game::builder(config(4))
            .snakes(
                Snake::new("a", Position::new(0, 0)),
                Snake::new("b", Position::new(0, 19)),
            )
            .no_items()
            .build()
            .unwrap();
        let mut duel = Match::new(
            game,
            Box::new(ScriptedAgent::new("a", vec![Some(Move::Right)])),
            Box::new(ScriptedAgent::new("b", vec![Some(Move::Right)])),
        );
        assert_eq!(duel.play_until_over(5).unwrap(), None);
        assert_eq!(duel.game().state().snake(SnakeId::A).head_position(), Position::new(5, 0));
    }
}
