//! Spawning and difficulty escalation
//!
//! Runs once per frame while the round is advancing. All timing is measured
//! in frames of game time; all randomness comes from the caller's RNG.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::cue::{CueKind, Cues, MAX_WIND_DENSITY};
use super::state::{Item, ItemKind, Obstacle, ObstacleShape, RoundState};
use crate::consts::*;

/// Obstacle spawn interval at round start (frames)
pub const START_SPAWN_INTERVAL: u32 = 120;
/// Spawn interval never drops below this (frames)
pub const MIN_SPAWN_INTERVAL: u32 = 60;
/// Frames between spawn-count checks
pub const COUNT_CHECK_FRAMES: u64 = 300;
/// Frames between item spawn rolls
pub const ITEM_SPAWN_FRAMES: u64 = 300;
/// Chance that an item roll actually spawns an item
pub const ITEM_SPAWN_CHANCE: f64 = 0.4;
/// Frames between obstacle speed-ups
pub const SPEED_UP_FRAMES: u64 = 1200;
/// Speed added per escalation (pixels per frame)
pub const SPEED_UP_STEP: f32 = 0.5;

/// Difficulty controller state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    /// Frames of game time since the round started
    pub game_time: u64,
    /// Frames since the last survival point
    pub score_timer: u32,
    pub last_obstacle_spawn: u64,
    pub last_item_spawn: u64,
    pub last_speed_up: u64,
    pub last_count_increase: u64,
    /// Running total that decides when `spawn_count` grows
    pub increase_counter: u32,
    /// Frames between obstacle batches
    pub spawn_interval: u32,
    /// Obstacles per batch
    pub spawn_count: u32,
    /// Base obstacle speed
    pub base_speed: f32,
    /// Speed handed to newly spawned obstacles
    pub obstacle_speed: f32,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self {
            game_time: 0,
            score_timer: 0,
            last_obstacle_spawn: 0,
            last_item_spawn: 0,
            last_speed_up: 0,
            last_count_increase: 0,
            increase_counter: 0,
            spawn_interval: START_SPAWN_INTERVAL,
            spawn_count: 1,
            base_speed: OBSTACLE_START_SPEED,
            obstacle_speed: OBSTACLE_START_SPEED,
        }
    }
}

impl Difficulty {
    /// Current obstacle speed relative to the base speed
    pub fn speed_ratio(&self) -> f32 {
        self.obstacle_speed / self.base_speed
    }
}

/// What one frame of escalation did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpawnReport {
    pub obstacles_spawned: u32,
    pub item_spawned: Option<ItemKind>,
    pub spawn_count_raised: bool,
    pub speed_up: bool,
}

/// Spawn one batch of `spawn_count` obstacles at the right edge
pub fn spawn_obstacles<R: Rng>(round: &mut RoundState, rng: &mut R) -> u32 {
    let count = round.difficulty.spawn_count;
    let speed = round.difficulty.obstacle_speed;
    for _ in 0..count {
        let shape = ObstacleShape::random(rng);
        let size = shape.roll_size(rng);
        let max_y = (SCREEN_HEIGHT - size.y) as u32;
        let y = rng.random_range(0..=max_y) as f32;
        let id = round.next_entity_id();
        round
            .obstacles
            .push(Obstacle::new(id, shape, Vec2::new(SCREEN_WIDTH, y), size, speed));
    }
    count
}

/// Spawn one item of a random kind at the right edge
pub fn spawn_item<R: Rng>(round: &mut RoundState, rng: &mut R) -> ItemKind {
    let kind = ItemKind::random(rng);
    let y = rng.random_range(ITEM_MARGIN as u32..=(SCREEN_HEIGHT - ITEM_MARGIN) as u32) as f32;
    let id = round.next_entity_id();
    round.items.push(Item::new(id, kind, Vec2::new(SCREEN_WIDTH, y)));
    kind
}

/// Advance game time, score and every escalation rule by one frame
pub fn advance<R: Rng>(round: &mut RoundState, rng: &mut R, cues: &mut Cues) -> SpawnReport {
    let mut report = SpawnReport::default();

    round.difficulty.game_time += 1;
    round.difficulty.score_timer += 1;
    if round.difficulty.score_timer >= SCORE_INTERVAL_FRAMES {
        round.score += 1;
        round.difficulty.score_timer = 0;
    }

    let now = round.difficulty.game_time;

    if now - round.difficulty.last_obstacle_spawn >= u64::from(round.difficulty.spawn_interval) {
        report.obstacles_spawned = spawn_obstacles(round, rng);
        round.difficulty.last_obstacle_spawn = now;
        if round.difficulty.spawn_interval > MIN_SPAWN_INTERVAL {
            round.difficulty.spawn_interval -= 1;
        }
        log::debug!(
            "t={} spawned {} obstacles, next interval {}",
            now,
            report.obstacles_spawned,
            round.difficulty.spawn_interval
        );
    }

    if now - round.difficulty.last_count_increase >= COUNT_CHECK_FRAMES {
        // The counter grows by the current batch size, so each raise of
        // spawn_count arrives sooner than the last.
        let difficulty = &mut round.difficulty;
        difficulty.increase_counter += difficulty.spawn_count;
        difficulty.last_count_increase = now;
        if difficulty.increase_counter % 3 == 0 {
            difficulty.spawn_count += 1;
            report.spawn_count_raised = true;
            log::debug!("t={} spawn count raised to {}", now, difficulty.spawn_count);
        }
    }

    if now - round.difficulty.last_item_spawn >= ITEM_SPAWN_FRAMES {
        if rng.random_bool(ITEM_SPAWN_CHANCE) {
            let kind = spawn_item(round, rng);
            report.item_spawned = Some(kind);
            log::debug!("t={} spawned {} item", now, kind.as_str());
        }
        round.difficulty.last_item_spawn = now;
    }

    if now - round.difficulty.last_speed_up >= SPEED_UP_FRAMES {
        speed_up(round, cues);
        report.speed_up = true;
    }

    report
}

/// Raise obstacle speed and push it to every live obstacle
fn speed_up(round: &mut RoundState, cues: &mut Cues) {
    let difficulty = &mut round.difficulty;
    difficulty.obstacle_speed += SPEED_UP_STEP;
    difficulty.base_speed += SPEED_UP_STEP;
    difficulty.last_speed_up = difficulty.game_time;

    let speed = difficulty.obstacle_speed;
    let slowed = round.effects.is_active(ItemKind::Slow);
    for obstacle in &mut round.obstacles {
        obstacle.base_speed = speed;
        if !slowed {
            obstacle.speed = speed;
        }
    }

    let center = Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0);
    let density = round.difficulty.speed_ratio().min(MAX_WIND_DENSITY);
    cues.push(CueKind::SpeedUp, center);
    cues.push(CueKind::Wind { density }, center);
    log::debug!("t={} obstacle speed now {}", round.difficulty.game_time, speed);
}
