//! Best-first search toward the most valuable food item.
//!
//! The heuristic adds danger penalties near visible opponent segments and
//! traps on top of the manhattan distance. It overestimates near danger, so
//! paths are not guaranteed optimal; away from danger it is plain manhattan.
use fxhash::{FxHashMap, FxHashSet};
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use tracing::{instrument, trace};

use super::{Agent, AgentView, DecisionTrace};
use crate::config::{AStarConfig, SearchFallback};
use crate::grid::Position;
use crate::items::ItemKind;
use crate::types::Move;

/// What the last search looked at
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchTrace {
    /// the food item the search aimed for
    pub target: Option<Position>,
    /// cells in the order they were expanded
    pub explored: Vec<Position>,
    /// best known cost from the head for every cell reached
    pub costs: FxHashMap<Position, i32>,
    /// head to target inclusive, empty when no path was found
    pub path: Vec<Position>,
    /// true when the move came from the fallback rather than a path
    pub fallback_used: bool,
}

/// Steers along an A* path to the food with the best reward for its distance
#[derive(Debug, Clone)]
pub struct AStarAgent {
    config: AStarConfig,
    last: SearchTrace,
}

struct Danger {
    segments: Vec<Position>,
    traps: Vec<Position>,
}

impl AStarAgent {
    #[allow(missing_docs)]
    pub fn new(config: AStarConfig) -> Self {
        AStarAgent {
            config,
            last: SearchTrace::default(),
        }
    }

    /// the food with the highest `reward - weight * distance`, first found
    /// wins ties. Normal food is considered before super food.
    pub fn select_target(&self, view: &AgentView<'_>) -> Option<Position> {
        let head = view.head();
        let mut best: Option<(i32, Position)> = None;
        for (kind, position) in view.items.all_food() {
            let reward = match kind {
                ItemKind::SuperFood => self.config.super_food_reward,
                _ => self.config.normal_food_reward,
            };
            let value = reward - self.config.target_distance_weight * head.manhattan_distance(&position);
            if best.map_or(true, |(v, _)| value > v) {
                best = Some((value, position));
            }
        }
        best.map(|(_, p)| p)
    }

    /// cost of stepping onto `position`
    pub fn move_cost(&self, view: &AgentView<'_>, position: Position) -> i32 {
        match view.items.item_at(position) {
            Some(ItemKind::SpikeTrap) => self.config.trap_cost,
            Some(ItemKind::NormalFood) => self.config.normal_food_cost,
            Some(ItemKind::SuperFood) => self.config.super_food_cost,
            None => self.config.normal_move_cost,
        }
    }

    fn danger(&self, view: &AgentView<'_>) -> Danger {
        Danger {
            segments: view.visible_opponent_segments(),
            traps: view.items.positions(ItemKind::SpikeTrap).collect(),
        }
    }

    fn proximity_penalty(&self, position: Position, around: &[Position], weight: i32) -> i32 {
        let radius = self.config.danger_radius;
        around
            .iter()
            .map(|p| position.manhattan_distance(p))
            .filter(|d| *d <= radius)
            .map(|d| weight * (radius + 1 - d))
            .sum()
    }

    fn heuristic(&self, position: Position, target: Position, danger: &Danger) -> i32 {
        position.manhattan_distance(&target)
            + self.proximity_penalty(position, &danger.segments, self.config.opponent_penalty_weight)
            + self.proximity_penalty(position, &danger.traps, self.config.trap_penalty_weight)
    }

    /// runs the search from the head to `target`, recording everything in the
    /// trace. Returns the path head first, or an empty path.
    #[instrument(level = "trace", skip_all, fields(goal = ?target))]
    pub fn find_path(&mut self, view: &AgentView<'_>, target: Position) -> Vec<Position> {
        let start = view.head();
        let danger = self.danger(view);
        let head_moves = view.me.available_directions(view.me.direction());
        let all_moves = Move::all();

        let mut open = BinaryHeap::new();
        let mut came_from: FxHashMap<Position, Position> = FxHashMap::default();
        let mut g_score: FxHashMap<Position, i32> = FxHashMap::default();
        let mut closed: FxHashSet<Position> = FxHashSet::default();
        let mut explored = vec![];

        g_score.insert(start, 0);
        open.push(Reverse((self.heuristic(start, target, &danger), start)));

        let mut path = vec![];
        while let Some(Reverse((f, current))) = open.pop() {
            if !closed.insert(current) {
                continue;
            }
            explored.push(current);
            trace!(x = current.x, y = current.y, f, "expanding");

            if current == target {
                path.push(current);
                let mut cur = current;
                while let Some(prev) = came_from.get(&cur) {
                    path.push(*prev);
                    cur = *prev;
                }
                path.reverse();
                break;
            }

            let base_g = g_score[&current];
            let moves = if current == start {
                &head_moves[..]
            } else {
                &all_moves[..]
            };
            for mv in moves {
                let neighbor = current.add_vec(mv.to_vector());
                if !view.is_legal(neighbor) || closed.contains(&neighbor) {
                    continue;
                }
                let tentative_g = base_g + self.move_cost(view, neighbor);
                if tentative_g < *g_score.get(&neighbor).unwrap_or(&i32::MAX) {
                    came_from.insert(neighbor, current);
                    g_score.insert(neighbor, tentative_g);
                    open.push(Reverse((
                        tentative_g + self.heuristic(neighbor, target, &danger),
                        neighbor,
                    )));
                }
            }
        }

        self.last.explored = explored;
        self.last.costs = g_score;
        self.last.path = path.clone();
        path
    }

    /// the legal move that keeps furthest from visible opponent segments and
    /// traps, first found wins ties
    pub fn safety_move(&self, view: &AgentView<'_>) -> Option<Move> {
        let danger = self.danger(view);
        let mut best: Option<(i32, Move)> = None;
        for (mv, position) in view.legal_moves() {
            let score = self.config.safety_base_score
                - self.proximity_penalty(position, &danger.segments, self.config.safety_opponent_weight)
                - self.proximity_penalty(position, &danger.traps, self.config.safety_trap_weight);
            if best.map_or(true, |(s, _)| score > s) {
                best = Some((score, mv));
            }
        }
        best.map(|(_, mv)| mv)
    }

    fn fallback(&mut self, view: &AgentView<'_>) -> Option<Move> {
        self.last.fallback_used = true;
        match self.config.fallback {
            SearchFallback::SafetyMove => self.safety_move(view),
            SearchFallback::KeepDirection => None,
        }
    }
}

impl Default for AStarAgent {
    fn default() -> Self {
        Self::new(AStarConfig::default())
    }
}

impl Agent for AStarAgent {
    fn name(&self) -> &str {
        "A* Search"
    }

    fn decide(&mut self, view: &AgentView<'_>) -> Option<Move> {
        self.last = SearchTrace::default();
        let target = match self.select_target(view) {
            Some(target) => target,
            None => return self.fallback(view),
        };
        self.last.target = Some(target);

        let path = self.find_path(view, target);
        match path.get(1) {
            Some(next) => Move::between(view.head(), *next),
            None => self.fallback(view),
        }
    }

    fn trace(&self) -> Option<DecisionTrace<'_>> {
        Some(DecisionTrace::Search(&self.last))
    }
}
