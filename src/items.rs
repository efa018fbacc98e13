//! Food and spike trap bookkeeping.
//!
//! The registry keeps a fixed number of food items (normal or super, chosen
//! at spawn time) and a fixed number of spike traps on the board. Every item
//! sits on its own cell, and never on a snake at the moment it spawns.
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

use crate::config::GameConfig;
use crate::error::GameError;
use crate::grid::{Grid, Position};
use crate::snake::Snake;
use crate::types::SnakeId;

/// The three categories of item on the board
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// +1 score and growth
    NormalFood,
    /// a random score bonus and growth
    SuperFood,
    /// costs a segment and a point
    SpikeTrap,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::NormalFood => write!(f, "normal food"),
            ItemKind::SuperFood => write!(f, "super food"),
            ItemKind::SpikeTrap => write!(f, "spike trap"),
        }
    }
}

/// An item on the board with the visual variant the renderer should use
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Item {
    #[allow(missing_docs)]
    pub position: Position,
    /// which of the configured visual variants to draw
    pub tag: u8,
}

/// What happened to a snake when its head met an item
#[allow(missing_docs)]
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ItemEvent {
    AteNormalFood { snake: SnakeId, position: Position },
    AteSuperFood {
        snake: SnakeId,
        position: Position,
        bonus: i32,
    },
    /// the snake lost its tail segment and a point
    HitTrap { snake: SnakeId, position: Position },
    /// the snake had no segment to lose, its score is now -1
    EliminatedByTrap { snake: SnakeId, position: Position },
}

/// The food and trap registry. Iteration order within a category is spawn order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemRegistry {
    normal_food: Vec<Item>,
    super_food: Vec<Item>,
    spike_traps: Vec<Item>,
}

impl ItemRegistry {
    /// an empty registry, to be filled with `place` or `populate`
    pub fn new() -> Self {
        Self::default()
    }

    /// spawns the configured number of food items and traps
    pub fn populate<R: Rng>(
        &mut self,
        grid: &Grid,
        snakes: &[Snake],
        config: &GameConfig,
        rng: &mut R,
    ) -> Result<(), GameError> {
        for _ in 0..config.food_count {
            self.spawn_random_food(grid, snakes, config, rng)?;
        }
        for _ in 0..config.spike_trap_count {
            self.spawn_spike_trap(grid, snakes, config, rng)?;
        }
        Ok(())
    }

    /// the items of one category, in spawn order
    pub fn items(&self, kind: ItemKind) -> &[Item] {
        match kind {
            ItemKind::NormalFood => &self.normal_food,
            ItemKind::SuperFood => &self.super_food,
            ItemKind::SpikeTrap => &self.spike_traps,
        }
    }

    fn items_mut(&mut self, kind: ItemKind) -> &mut Vec<Item> {
        match kind {
            ItemKind::NormalFood => &mut self.normal_food,
            ItemKind::SuperFood => &mut self.super_food,
            ItemKind::SpikeTrap => &mut self.spike_traps,
        }
    }

    /// the positions of one category, in spawn order
    pub fn positions(&self, kind: ItemKind) -> impl Iterator<Item = Position> + '_ {
        self.items(kind).iter().map(|item| item.position)
    }

    /// every food item with its kind, normal food first
    pub fn all_food(&self) -> impl Iterator<Item = (ItemKind, Position)> + '_ {
        self.positions(ItemKind::NormalFood)
            .map(|p| (ItemKind::NormalFood, p))
            .chain(
                self.positions(ItemKind::SuperFood)
                    .map(|p| (ItemKind::SuperFood, p)),
            )
    }

    /// the kind of item on `position`, traps checked first
    pub fn item_at(&self, position: Position) -> Option<ItemKind> {
        [ItemKind::SpikeTrap, ItemKind::NormalFood, ItemKind::SuperFood]
            .into_iter()
            .find(|kind| self.positions(*kind).any(|p| p == position))
    }

    /// true when a trap is on `position`
    pub fn is_trap(&self, position: Position) -> bool {
        self.positions(ItemKind::SpikeTrap).any(|p| p == position)
    }

    #[allow(missing_docs)]
    pub fn len(&self) -> usize {
        self.normal_food.len() + self.super_food.len() + self.spike_traps.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// true when neither a snake nor an item is on `position`
    pub fn is_position_empty(&self, position: Position, snakes: &[Snake]) -> bool {
        !snakes.iter().any(|s| s.occupies(position)) && self.item_at(position).is_none()
    }

    /// places an item on an explicit cell. The caller is responsible for
    /// keeping positions unique.
    pub fn place(&mut self, kind: ItemKind, position: Position) {
        debug_assert!(self.item_at(position).is_none(), "{:?} already holds an item", position);
        self.items_mut(kind).push(Item { position, tag: 0 });
    }

    /// normal food with the configured probability, otherwise super food
    pub fn spawn_random_food<R: Rng>(
        &mut self,
        grid: &Grid,
        snakes: &[Snake],
        config: &GameConfig,
        rng: &mut R,
    ) -> Result<Position, GameError> {
        let kind = if rng.gen::<f64>() < config.normal_food_probability {
            ItemKind::NormalFood
        } else {
            ItemKind::SuperFood
        };
        self.spawn(kind, grid, snakes, config, rng)
    }

    #[allow(missing_docs)]
    pub fn spawn_spike_trap<R: Rng>(
        &mut self,
        grid: &Grid,
        snakes: &[Snake],
        config: &GameConfig,
        rng: &mut R,
    ) -> Result<Position, GameError> {
        self.spawn(ItemKind::SpikeTrap, grid, snakes, config, rng)
    }

    fn spawn<R: Rng>(
        &mut self,
        kind: ItemKind,
        grid: &Grid,
        snakes: &[Snake],
        config: &GameConfig,
        rng: &mut R,
    ) -> Result<Position, GameError> {
        let position = self.random_empty_position(kind, grid, snakes, config, rng)?;
        let tag = rng.gen_range(0..config.item_variants);
        self.items_mut(kind).push(Item { position, tag });
        debug!(%kind, x = position.x, y = position.y, "spawned item");
        Ok(position)
    }

    fn random_empty_position<R: Rng>(
        &self,
        kind: ItemKind,
        grid: &Grid,
        snakes: &[Snake],
        config: &GameConfig,
        rng: &mut R,
    ) -> Result<Position, GameError> {
        let (w, h) = (grid.width() as i32, grid.height() as i32);
        for _ in 0..config.spawn_retry_budget {
            let position = Position::new(rng.gen_range(0..w), rng.gen_range(0..h));
            if self.is_position_empty(position, snakes) {
                return Ok(position);
            }
        }

        warn!(
            %kind,
            attempts = config.spawn_retry_budget,
            "random spawn budget exhausted, scanning for a free cell"
        );
        let free: Vec<Position> = grid
            .cells()
            .filter(|p| self.is_position_empty(*p, snakes))
            .collect();
        if free.is_empty() {
            return Err(GameError::GridSaturated {
                kind,
                attempts: config.spawn_retry_budget,
            });
        }
        Ok(free[rng.gen_range(0..free.len())])
    }

    fn take_at(&mut self, kind: ItemKind, position: Position) -> bool {
        let items = self.items_mut(kind);
        match items.iter().position(|item| item.position == position) {
            Some(index) => {
                items.remove(index);
                true
            }
            None => false,
        }
    }

    /// resolves every snake head against the registry, snake A first. For
    /// each snake normal food is checked, then super food, then traps; at
    /// most one item per category is consumed and each consumed item is
    /// replaced straight away.
    pub fn collect_items<R: Rng>(
        &mut self,
        grid: &Grid,
        snakes: &mut [Snake],
        config: &GameConfig,
        rng: &mut R,
    ) -> Result<Vec<ItemEvent>, GameError> {
        let mut events = vec![];
        for index in 0..snakes.len() {
            let id = SnakeId(index as u8);
            let head = snakes[index].head_position();

            if self.take_at(ItemKind::NormalFood, head) {
                let snake = &mut snakes[index];
                snake.grow(config.normal_expansion);
                snake.add_score(1);
                events.push(ItemEvent::AteNormalFood {
                    snake: id,
                    position: head,
                });
                self.spawn_random_food(grid, snakes, config, rng)?;
            }

            if self.take_at(ItemKind::SuperFood, head) {
                let bonus = rng.gen_range(config.super_bonus_range());
                let snake = &mut snakes[index];
                snake.grow(config.super_expansion);
                snake.add_score(bonus);
                events.push(ItemEvent::AteSuperFood {
                    snake: id,
                    position: head,
                    bonus,
                });
                self.spawn_random_food(grid, snakes, config, rng)?;
            }

            if self.take_at(ItemKind::SpikeTrap, head) {
                let snake = &mut snakes[index];
                let shrunk = snake.shrink();
                snake.set_score((snake.score() - 1).max(0));
                if shrunk {
                    events.push(ItemEvent::HitTrap {
                        snake: id,
                        position: head,
                    });
                } else {
                    // sentinel read by the score checks as elimination
                    snake.set_score(-1);
                    events.push(ItemEvent::EliminatedByTrap {
                        snake: id,
                        position: head,
                    });
                }
                self.spawn_spike_trap(grid, snakes, config, rng)?;
            }
        }
        for event in events.iter() {
            debug!(?event, "item collected");
        }
        Ok(events)
    }
}
