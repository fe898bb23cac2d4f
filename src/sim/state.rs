//! Round state and entity types
//!
//! Everything one round of play owns lives here. The engine keeps exactly one
//! `RoundState` while a round is on screen and drops it afterwards.

use std::ops::RangeInclusive;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::effects::StatusEffects;
use super::spawn::Difficulty;
use crate::consts::*;

/// Scale a base size by a modifier, truncated to whole pixels.
///
/// Computed in f64, so 90 * 0.7 lands just under 63 and truncates to 62.
pub fn scaled_size(base: Vec2, factor: f64) -> Vec2 {
    (base.as_dvec2() * factor).floor().as_vec2()
}

/// The player's block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner (x never changes)
    pub pos: Vec2,
    pub base_size: Vec2,
    /// Size after the shrink modifier
    pub size: Vec2,
    pub base_speed: f32,
    /// Speed after the boost modifier
    pub speed: f32,
}

impl Default for Player {
    fn default() -> Self {
        let size = Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT);
        Self {
            pos: Vec2::new(PLAYER_X, (SCREEN_HEIGHT / 2.0 - PLAYER_HEIGHT / 2.0).floor()),
            base_size: size,
            size,
            base_speed: PLAYER_SPEED,
            speed: PLAYER_SPEED,
        }
    }
}

impl Player {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    pub fn apply_speed_multiplier(&mut self, factor: f64) {
        self.speed = (f64::from(self.base_speed) * factor) as f32;
    }

    pub fn apply_size_multiplier(&mut self, factor: f64) {
        self.size = scaled_size(self.base_size, factor);
    }

    /// Move vertically by the current speed.
    ///
    /// There are no walls: leaving the top re-enters at the bottom and vice
    /// versa. Up is applied before down when both are held.
    pub fn steer(&mut self, up: bool, down: bool) {
        let floor = SCREEN_HEIGHT - self.size.y;
        if up {
            self.pos.y -= self.speed;
            if self.pos.y < 0.0 {
                self.pos.y = floor;
            }
        }
        if down {
            self.pos.y += self.speed;
            if self.pos.y > floor {
                self.pos.y = 0.0;
            }
        }
    }
}

/// Obstacle shape templates: a fixed width and an inclusive height range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleShape {
    /// Tall pillar
    Tall,
    Square,
    /// Low and wide slab
    Wide,
    /// Thin, tall needle
    Slim,
    SmallSquare,
}

impl ObstacleShape {
    pub const ALL: [ObstacleShape; 5] = [
        ObstacleShape::Tall,
        ObstacleShape::Square,
        ObstacleShape::Wide,
        ObstacleShape::Slim,
        ObstacleShape::SmallSquare,
    ];

    pub fn width(self) -> u32 {
        match self {
            ObstacleShape::Tall => 40,
            ObstacleShape::Square => 60,
            ObstacleShape::Wide => 80,
            ObstacleShape::Slim => 30,
            ObstacleShape::SmallSquare => 50,
        }
    }

    pub fn height_range(self) -> RangeInclusive<u32> {
        match self {
            ObstacleShape::Tall => 80..=200,
            ObstacleShape::Square => 60..=60,
            ObstacleShape::Wide => 40..=60,
            ObstacleShape::Slim => 100..=180,
            ObstacleShape::SmallSquare => 50..=50,
        }
    }

    /// Pick a template uniformly
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// Roll a concrete (width, height) for this template
    pub fn roll_size<R: Rng>(self, rng: &mut R) -> Vec2 {
        let height = rng.random_range(self.height_range());
        Vec2::new(self.width() as f32, height as f32)
    }
}

/// A scrolling obstacle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub shape: ObstacleShape,
    pub pos: Vec2,
    pub base_size: Vec2,
    pub size: Vec2,
    pub base_speed: f32,
    pub speed: f32,
}

impl Obstacle {
    pub fn new(id: u32, shape: ObstacleShape, pos: Vec2, size: Vec2, speed: f32) -> Self {
        Self {
            id,
            shape,
            pos,
            base_size: size,
            size,
            base_speed: speed,
            speed,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    /// Scroll left by the current speed
    pub fn advance(&mut self) {
        self.pos.x -= self.speed;
    }

    /// Fully past the left edge
    pub fn is_off_screen(&self) -> bool {
        self.pos.x + self.size.x < 0.0
    }

    pub fn apply_size_multiplier(&mut self, factor: f64) {
        self.size = scaled_size(self.base_size, factor);
    }

    pub fn apply_speed_multiplier(&mut self, factor: f64) {
        self.speed = (f64::from(self.base_speed) * factor) as f32;
    }
}

/// Power-up types. Each one drives the status effect of the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// Player moves faster
    Speed,
    /// Player gets smaller
    Shrink,
    /// Obstacles get smaller
    ObstacleShrink,
    /// Obstacles move slower
    Slow,
}

impl ItemKind {
    pub const ALL: [ItemKind; 4] = [
        ItemKind::Speed,
        ItemKind::Shrink,
        ItemKind::ObstacleShrink,
        ItemKind::Slow,
    ];

    /// Stable slot used by the effect table
    pub fn index(self) -> usize {
        match self {
            ItemKind::Speed => 0,
            ItemKind::Shrink => 1,
            ItemKind::ObstacleShrink => 2,
            ItemKind::Slow => 3,
        }
    }

    /// Multiplier applied to the effect's target while active
    pub fn multiplier(self) -> f64 {
        match self {
            ItemKind::Speed => 1.5,
            ItemKind::Shrink => 0.6,
            ItemKind::ObstacleShrink => 0.7,
            ItemKind::Slow => 0.7,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::Speed => "speed",
            ItemKind::Shrink => "shrink",
            ItemKind::ObstacleShrink => "obstacle_shrink",
            ItemKind::Slow => "slow",
        }
    }

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// A collectible power-up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: u32,
    pub kind: ItemKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub collected: bool,
}

impl Item {
    pub fn new(id: u32, kind: ItemKind, pos: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            size: Vec2::splat(ITEM_SIZE),
            collected: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    pub fn advance(&mut self) {
        self.pos.x -= ITEM_SPEED;
    }

    pub fn is_off_screen(&self) -> bool {
        self.pos.x + self.size.x < 0.0
    }
}

/// Complete state of one round (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    pub player: Player,
    /// Live obstacles, in spawn order
    pub obstacles: Vec<Obstacle>,
    /// Live items, in spawn order
    pub items: Vec<Item>,
    pub difficulty: Difficulty,
    pub effects: StatusEffects,
    pub score: u64,
    /// Set by the "go" input; gates all movement and spawning
    pub started: bool,
    /// Frames left in the post-collision ending window (0 = not ending)
    pub ending_ticks: u32,
    /// Next entity ID
    next_id: u32,
}

impl Default for RoundState {
    fn default() -> Self {
        Self::new()
    }
}

impl RoundState {
    /// A fresh round waiting for the "go" input
    pub fn new() -> Self {
        Self {
            player: Player::default(),
            obstacles: Vec::new(),
            items: Vec::new(),
            difficulty: Difficulty::default(),
            effects: StatusEffects::default(),
            score: 0,
            started: false,
            ending_ticks: 0,
            next_id: 1,
        }
    }

    /// Return to the initial state. Calling this twice is the same as once.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// In the post-collision window
    pub fn is_ending(&self) -> bool {
        self.ending_ticks > 0
    }

    /// Simulation moves entities and spawns only in this phase
    pub fn is_advancing(&self) -> bool {
        self.started && !self.is_ending()
    }
}
