//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one call to `tick` per frame)
//! - Injected RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod cue;
pub mod effects;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Rect, first_obstacle_hit, resolve_items, resolve_obstacles};
pub use cue::{Cue, CueKind, Cues};
pub use effects::{EFFECT_DURATION_FRAMES, EffectTimer, StatusEffects, apply_modifiers};
pub use spawn::{Difficulty, MIN_SPAWN_INTERVAL, SpawnReport, START_SPAWN_INTERVAL};
pub use state::{Item, ItemKind, Obstacle, ObstacleShape, Player, RoundState};
pub use tick::{TickInput, TickOutcome, tick};
