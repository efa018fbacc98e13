//! Named numeric parameters injected into the board, the item registry and the agents.
//!
//! Every struct here is plain data with a `Default` matching the tuned values
//! of the arena, and can be loaded from JSON with missing fields falling back
//! to those defaults.
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use crate::error::GameError;
use crate::grid::Grid;

/// Parameters of the arena itself
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    #[allow(missing_docs)]
    pub grid_width: u32,
    #[allow(missing_docs)]
    pub grid_height: u32,
    /// food items kept on the board at all times (normal and super combined)
    pub food_count: usize,
    /// spike traps kept on the board at all times
    pub spike_trap_count: usize,
    /// chance that a spawned food item is normal rather than super food
    pub normal_food_probability: f64,
    /// segments added after eating normal food
    pub normal_expansion: u32,
    /// segments added after eating super food
    pub super_expansion: u32,
    /// smallest score bonus for super food
    pub super_bonus_min: i32,
    /// largest score bonus for super food
    pub super_bonus_max: i32,
    /// reaching this score wins the game
    pub max_score: i32,
    /// the game ends on this turn and the higher score wins
    pub max_turns: u64,
    /// half-width of the square a snake can see opponent segments in
    pub visibility_range: i32,
    /// display names for snake A and snake B
    pub snake_names: [String; 2],
    /// number of visual tags an item can carry
    pub item_variants: u8,
    /// random probes before the registry falls back to scanning for a free cell
    pub spawn_retry_budget: usize,
    /// seed for the game's random source, entropy when absent
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            grid_width: 20,
            grid_height: 20,
            food_count: 4,
            spike_trap_count: 2,
            normal_food_probability: 0.8,
            normal_expansion: 1,
            super_expansion: 1,
            super_bonus_min: 1,
            super_bonus_max: 3,
            max_score: 20,
            max_turns: 10_000,
            visibility_range: 2,
            snake_names: ["Blue Snake".to_string(), "Orange Snake".to_string()],
            item_variants: 4,
            spawn_retry_budget: 256,
            seed: None,
        }
    }
}

impl GameConfig {
    /// parses and validates a JSON configuration
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// the board described by this configuration
    pub fn grid(&self) -> Result<Grid, GameError> {
        Grid::new(self.grid_width, self.grid_height)
    }

    /// inclusive range the super food bonus is drawn from
    pub fn super_bonus_range(&self) -> RangeInclusive<i32> {
        self.super_bonus_min..=self.super_bonus_max
    }

    /// rejects configurations that can never produce a playable game
    pub fn validate(&self) -> Result<(), GameError> {
        let grid = self.grid()?;
        // both snakes start on their own cell
        let needed = self.food_count + self.spike_trap_count + 2;
        if needed > grid.cell_count() {
            return invalid(format!(
                "{} food, {} traps and two snakes need {} cells but the grid has {}",
                self.food_count,
                self.spike_trap_count,
                needed,
                grid.cell_count()
            ));
        }
        if !(0.0..=1.0).contains(&self.normal_food_probability) {
            return invalid(format!(
                "normal food probability {} is outside [0, 1]",
                self.normal_food_probability
            ));
        }
        if self.super_bonus_range().is_empty() {
            return invalid(format!(
                "super food bonus range {}..={} is empty",
                self.super_bonus_min, self.super_bonus_max
            ));
        }
        if self.max_score <= 0 {
            return invalid(format!("max score must be positive, got {}", self.max_score));
        }
        if self.max_turns == 0 {
            return invalid("max turns must be positive".to_string());
        }
        if self.visibility_range < 0 {
            return invalid(format!(
                "visibility range must not be negative, got {}",
                self.visibility_range
            ));
        }
        if self.item_variants == 0 {
            return invalid("items need at least one visual variant".to_string());
        }
        if self.spawn_retry_budget == 0 {
            return invalid("spawn retry budget must be positive".to_string());
        }
        Ok(())
    }
}

fn invalid(reason: String) -> Result<(), GameError> {
    Err(GameError::InvalidConfig(reason))
}

/// What the A* agent does when it has no path to follow
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SearchFallback {
    /// score each legal neighbour by its distance to danger and take the best one
    SafetyMove,
    /// keep the current heading
    KeepDirection,
}

/// Costs and weights for [`crate::agents::AStarAgent`]
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct AStarConfig {
    /// value of normal food when picking a target
    pub normal_food_reward: i32,
    /// value of super food when picking a target
    pub super_food_reward: i32,
    /// value lost per step of distance to a target
    pub target_distance_weight: i32,
    /// edge cost of stepping onto a trap
    pub trap_cost: i32,
    /// edge cost of stepping onto normal food
    pub normal_food_cost: i32,
    /// edge cost of stepping onto super food
    pub super_food_cost: i32,
    /// edge cost of stepping onto an empty cell
    pub normal_move_cost: i32,
    /// heuristic penalty per unit of closeness to a visible opponent segment
    pub opponent_penalty_weight: i32,
    /// heuristic penalty per unit of closeness to a trap
    pub trap_penalty_weight: i32,
    /// manhattan distance inside which danger penalties apply
    pub danger_radius: i32,
    /// starting score of a safety move
    pub safety_base_score: i32,
    /// safety move penalty per unit of closeness to a visible opponent segment
    pub safety_opponent_weight: i32,
    /// safety move penalty per unit of closeness to a trap
    pub safety_trap_weight: i32,
    #[allow(missing_docs)]
    pub fallback: SearchFallback,
}

impl Default for AStarConfig {
    fn default() -> Self {
        AStarConfig {
            normal_food_reward: 100,
            super_food_reward: 140,
            target_distance_weight: 5,
            trap_cost: 15,
            normal_food_cost: 1,
            super_food_cost: 1,
            normal_move_cost: 2,
            opponent_penalty_weight: 10,
            trap_penalty_weight: 3,
            danger_radius: 2,
            safety_base_score: 50,
            safety_opponent_weight: 10,
            safety_trap_weight: 10,
            fallback: SearchFallback::SafetyMove,
        }
    }
}

/// Which way the local search agent ranks neighbouring cells
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LocalSearchMode {
    /// lowest cost wins, ties broken uniformly at random
    MinimizeCost,
    /// highest reward wins, with loop escape through position history
    MaximizeReward,
}

/// Costs and weights for [`crate::agents::LocalSearchAgent`]
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct LocalSearchConfig {
    #[allow(missing_docs)]
    pub mode: LocalSearchMode,
    /// cost of a cell holding a trap
    pub trap_cost: i32,
    /// cost of a cell holding food
    pub food_cost: i32,
    /// cost added to the distance term of an empty cell
    pub base_food_cost: i32,
    /// cost per step of distance to the nearest food
    pub distance_weight: i32,

    /// reward of landing on normal food
    pub normal_food_reward: f64,
    /// reward of landing on super food
    pub super_food_reward: f64,
    /// base reward of any legal move
    pub normal_move_reward: f64,
    /// penalty of landing on a trap
    pub trap_penalty: f64,
    /// penalty per unit of closeness to a visible opponent segment
    pub opponent_penalty: f64,
    /// manhattan distance inside which the opponent penalty applies
    pub opponent_penalty_radius: i32,
    /// penalty per axis for hugging a wall
    pub wall_penalty: f64,
    /// reward per open neighbour of the evaluated cell
    pub open_space_reward: f64,
    /// manhattan distance inside which food still attracts
    pub food_attraction_radius: i32,
    /// head positions remembered for loop detection
    pub history_len: usize,
}

impl Default for LocalSearchConfig {
    fn default() -> Self {
        LocalSearchConfig {
            mode: LocalSearchMode::MinimizeCost,
            trap_cost: 100,
            food_cost: 0,
            base_food_cost: 10,
            distance_weight: 5,
            normal_food_reward: 100.0,
            super_food_reward: 200.0,
            normal_move_reward: 50.0,
            trap_penalty: 15.0,
            opponent_penalty: 20.0,
            opponent_penalty_radius: 2,
            wall_penalty: 10.0,
            open_space_reward: 15.0,
            food_attraction_radius: 5,
            history_len: 10,
        }
    }
}
