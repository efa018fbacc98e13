use std::cell::Cell;
use std::time::Duration;

use num_format::{Locale, ToFormattedString};
use snake_duel::agents::{AStarAgent, LocalSearchAgent};
use snake_duel::config::{GameConfig, LocalSearchConfig, LocalSearchMode};
use snake_duel::game::{Game, Match};
use snake_duel::snapshot::Snapshot;
use snake_duel::types::SimulatorInstruments;

#[derive(Debug, Default)]
struct Instruments {
    turns: Cell<u64>,
    total: Cell<Duration>,
}

impl SimulatorInstruments for Instruments {
    fn observe_turn(&self, duration: Duration) {
        self.turns.set(self.turns.get() + 1);
        self.total.set(self.total.get() + duration);
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let mut wins = [0u64; 2];
    let mut ties = 0u64;
    let mut turns = 0u64;
    let mut time = Duration::ZERO;
    let mut last = None;
    let turn_cap = GameConfig::default().max_turns;

    for seed in 0..100 {
        let config = GameConfig {
            seed: Some(seed),
            ..GameConfig::default()
        };
        let local = LocalSearchConfig {
            mode: if seed % 2 == 0 {
                LocalSearchMode::MinimizeCost
            } else {
                LocalSearchMode::MaximizeReward
            },
            ..LocalSearchConfig::default()
        };
        let mut duel = Match::with_instruments(
            Game::new(config).unwrap(),
            Box::new(AStarAgent::default()),
            Box::new(LocalSearchAgent::with_seed(local, seed)),
            Instruments::default(),
        );
        match duel.play_until_over(turn_cap).unwrap() {
            Some(outcome) => match outcome.winner {
                Some(id) => wins[id.as_usize()] += 1,
                None => ties += 1,
            },
            None => ties += 1,
        }
        let instruments = duel.instruments();
        turns += instruments.turns.get();
        time += instruments.total.get();
        last = Some(Snapshot::capture(duel.game().state()));
    }

    if let Some(snapshot) = last {
        println!("{}", snapshot);
    }
    println!(
        "astar wins: {} local search wins: {} ties: {}",
        wins[0], wins[1], ties
    );
    println!(
        "played {} turns in {:?} ({} turns/s)",
        turns.to_formatted_string(&Locale::en),
        time,
        ((turns as f64 / time.as_secs_f64().max(f64::EPSILON)) as u64)
            .to_formatted_string(&Locale::en)
    );
}
