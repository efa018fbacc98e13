//! One-ply greedy agent that scores each legal neighbour of the head.
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use tracing::trace;

use super::{Agent, AgentView, DecisionTrace};
use crate::config::{LocalSearchConfig, LocalSearchMode};
use crate::grid::Position;
use crate::items::ItemKind;
use crate::types::Move;

/// The score one candidate move received
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveEvaluation {
    #[allow(missing_docs)]
    pub direction: Move,
    /// the cell the head would land on
    pub position: Position,
    /// a cost in `MinimizeCost` mode, a reward in `MaximizeReward` mode
    pub score: f64,
}

/// Diagnostics of the last greedy decision
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalTrace {
    /// every legal neighbour with its score, in `Move::all()` order
    pub evaluations: Vec<MoveEvaluation>,
    #[allow(missing_docs)]
    pub chosen: Option<Move>,
    /// exploration factor in effect, always 0 in `MinimizeCost` mode
    pub exploration: f64,
}

/// Greedy agent that looks one move ahead
#[derive(Debug, Clone)]
pub struct LocalSearchAgent {
    config: LocalSearchConfig,
    rng: SmallRng,
    history: VecDeque<Position>,
    no_progress: u32,
    last: LocalTrace,
}

impl LocalSearchAgent {
    /// an agent drawing its tie-breaks from `rng`
    pub fn new(config: LocalSearchConfig, rng: SmallRng) -> Self {
        LocalSearchAgent {
            config,
            rng,
            history: VecDeque::with_capacity(config.history_len),
            no_progress: 0,
            last: LocalTrace::default(),
        }
    }

    #[allow(missing_docs)]
    pub fn with_seed(config: LocalSearchConfig, seed: u64) -> Self {
        Self::new(config, SmallRng::seed_from_u64(seed))
    }

    /// cost of landing on `position`, lower is better. A trap costs the trap
    /// constant, food the food constant, anything else grows with the distance
    /// to the nearest food.
    pub fn position_cost(&self, view: &AgentView<'_>, position: Position) -> f64 {
        let cost = match view.items.item_at(position) {
            Some(ItemKind::SpikeTrap) => self.config.trap_cost,
            Some(_) => self.config.food_cost,
            None => match nearest_food_distance(view, position) {
                Some(distance) => self.config.distance_weight * distance + self.config.base_food_cost,
                None => self.config.base_food_cost,
            },
        };
        cost as f64
    }

    /// reward of landing on `position` before any exploration noise, higher
    /// is better
    pub fn position_reward(&self, view: &AgentView<'_>, position: Position) -> f64 {
        let config = &self.config;
        let mut score = config.normal_move_reward;
        score += self.food_reward(view, position);
        if view.items.is_trap(position) {
            score -= config.trap_penalty;
        }

        let range = config.opponent_penalty_radius;
        for segment in view.visible_opponent_segments() {
            let distance = position.manhattan_distance(&segment);
            if distance <= range {
                score -= config.opponent_penalty * (range + 1 - distance) as f64;
            }
        }

        let (w, h) = (view.grid.width() as i32, view.grid.height() as i32);
        if position.x <= 1 || position.x >= w - 2 {
            score -= config.wall_penalty;
        }
        if position.y <= 1 || position.y >= h - 2 {
            score -= config.wall_penalty;
        }

        let open = Move::all()
            .into_iter()
            .filter(|mv| view.is_legal(position.add_vec(mv.to_vector())))
            .count();
        score + config.open_space_reward * open as f64
    }

    fn food_reward(&self, view: &AgentView<'_>, position: Position) -> f64 {
        let radius = self.config.food_attraction_radius;
        let mut score = 0.0;
        for (kind, food) in view.items.all_food() {
            let reward = match kind {
                ItemKind::SuperFood => self.config.super_food_reward,
                _ => self.config.normal_food_reward,
            };
            if food == position {
                return reward;
            }
            let distance = position.manhattan_distance(&food);
            if distance <= radius {
                score += reward * (radius + 1 - distance) as f64 / 10.0;
            }
        }
        score
    }

    /// how much noise and revisit penalty to apply, from 0 to 1. Grows when
    /// the head keeps coming back to the same cells or stops closing in on food.
    pub fn exploration_factor(&self) -> f64 {
        let max_visits = self
            .history
            .iter()
            .map(|p| self.history.iter().filter(|q| *q == p).count())
            .max()
            .unwrap_or(0);
        let looping = max_visits.saturating_sub(1) as f64;
        looping.max(self.no_progress as f64 / 3.0).min(1.0)
    }

    fn remember(&mut self, head: Position) {
        if self.config.history_len == 0 {
            return;
        }
        if self.history.len() == self.config.history_len {
            self.history.pop_front();
        }
        self.history.push_back(head);
    }

    fn decide_min_cost(&mut self, view: &AgentView<'_>) -> Option<Move> {
        let evaluations: Vec<MoveEvaluation> = view
            .legal_moves()
            .into_iter()
            .map(|(direction, position)| MoveEvaluation {
                direction,
                position,
                score: self.position_cost(view, position),
            })
            .collect();

        let best = evaluations
            .iter()
            .map(|e| e.score)
            .fold(f64::INFINITY, f64::min);
        let tied: Vec<Move> = evaluations
            .iter()
            .filter(|e| e.score == best)
            .map(|e| e.direction)
            .collect();
        let chosen = tied.choose(&mut self.rng).copied();

        self.last = LocalTrace {
            evaluations,
            chosen,
            exploration: 0.0,
        };
        chosen
    }

    fn decide_max_reward(&mut self, view: &AgentView<'_>) -> Option<Move> {
        let head = view.head();
        self.remember(head);
        let exploration = self.exploration_factor();

        let mut evaluations = vec![];
        for (direction, position) in view.legal_moves() {
            let mut score = self.position_reward(view, position);
            if exploration > 0.0 {
                score += self.rng.gen_range(0.0..=exploration);
                if self.history.contains(&position) {
                    score -= 50.0 * exploration;
                }
            }
            evaluations.push(MoveEvaluation {
                direction,
                position,
                score,
            });
        }

        let mut best: Option<&MoveEvaluation> = None;
        for evaluation in evaluations.iter() {
            if best.map_or(true, |b| evaluation.score > b.score) {
                best = Some(evaluation);
            }
        }
        let chosen = best.map(|b| b.direction);

        if let Some(best) = best {
            if is_making_progress(view, head, best.position) {
                self.no_progress = 0;
            } else {
                self.no_progress += 1;
            }
        }

        self.last = LocalTrace {
            evaluations,
            chosen,
            exploration,
        };
        chosen
    }
}

fn nearest_food_distance(view: &AgentView<'_>, position: Position) -> Option<i32> {
    view.items
        .all_food()
        .map(|(_, food)| position.manhattan_distance(&food))
        .min()
}

/// landing on food, or getting closer to the food nearest the head
fn is_making_progress(view: &AgentView<'_>, head: Position, next: Position) -> bool {
    if view.items.all_food().any(|(_, food)| food == next) {
        return true;
    }
    let closest = view
        .items
        .all_food()
        .map(|(_, food)| food)
        .min_by_key(|food| head.manhattan_distance(food));
    match closest {
        Some(food) => next.manhattan_distance(&food) < head.manhattan_distance(&food),
        None => false,
    }
}

impl Agent for LocalSearchAgent {
    fn name(&self) -> &str {
        "Local Search"
    }

    fn decide(&mut self, view: &AgentView<'_>) -> Option<Move> {
        let chosen = match self.config.mode {
            LocalSearchMode::MinimizeCost => self.decide_min_cost(view),
            LocalSearchMode::MaximizeReward => self.decide_max_reward(view),
        };
        trace!(?chosen, evaluated = self.last.evaluations.len(), "local search decision");
        chosen
    }

    fn trace(&self) -> Option<DecisionTrace<'_>> {
        Some(DecisionTrace::Local(&self.last))
    }
}
