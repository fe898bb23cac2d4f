//! Collision detection and outcome resolution
//!
//! Everything is an axis-aligned rectangle. Hit-boxes always use the
//! current (post-modifier) size, so shrink effects really shrink them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::cue::{COLLISION_FLASH, COLLISION_SHAKE, CueKind, Cues, PICKUP_FLASH};
use super::state::{ItemKind, Obstacle, RoundState};
use crate::consts::*;

/// Axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Strict overlap: rectangles that only share an edge do not collide,
    /// and empty rectangles never collide.
    pub fn overlaps(&self, other: &Rect) -> bool {
        if self.size.x <= 0.0 || self.size.y <= 0.0 || other.size.x <= 0.0 || other.size.y <= 0.0
        {
            return false;
        }
        self.pos.x < other.right()
            && other.pos.x < self.right()
            && self.pos.y < other.bottom()
            && other.pos.y < self.bottom()
    }
}

/// Index of the first obstacle overlapping `player`, in iteration order
pub fn first_obstacle_hit(player: &Rect, obstacles: &[Obstacle]) -> Option<usize> {
    obstacles.iter().position(|o| o.rect().overlaps(player))
}

/// Scroll obstacles, drop the ones past the edge and test for a hit.
///
/// At most one collision is acted upon. On a hit the round enters its ending
/// window and stops advancing. Returns whether a collision happened.
pub fn resolve_obstacles(round: &mut RoundState, cues: &mut Cues) -> bool {
    for obstacle in &mut round.obstacles {
        obstacle.advance();
    }
    round.obstacles.retain(|o| !o.is_off_screen());

    let player = round.player.rect();
    let Some(index) = first_obstacle_hit(&player, &round.obstacles) else {
        return false;
    };

    let impact = round.obstacles[index].rect().center();
    cues.push(CueKind::Collision { shake: COLLISION_SHAKE }, impact);
    cues.push(CueKind::Flash { strength: COLLISION_FLASH }, impact);
    round.ending_ticks = ENDING_FRAMES;
    round.started = false;
    log::info!(
        "Collision with obstacle {} at t={} (score {})",
        round.obstacles[index].id,
        round.difficulty.game_time,
        round.score
    );
    true
}

/// Scroll items, drop off-screen ones and collect any the player touches.
///
/// Each collected item adds the bonus, (re)starts its effect and leaves the
/// live set. Returns the kinds collected this frame.
pub fn resolve_items(round: &mut RoundState, cues: &mut Cues) -> Vec<ItemKind> {
    let player = round.player.rect();
    let mut collected = Vec::new();

    for item in &mut round.items {
        if item.collected {
            continue;
        }
        item.advance();
        if item.is_off_screen() {
            continue;
        }
        let rect = item.rect();
        if rect.overlaps(&player) {
            item.collected = true;
            collected.push((item.kind, rect.center()));
        }
    }
    round.items.retain(|i| !i.collected && !i.is_off_screen());

    let mut kinds = Vec::with_capacity(collected.len());
    for (kind, at) in collected {
        debug_assert!(round.score.checked_add(ITEM_BONUS).is_some());
        round.score += ITEM_BONUS;
        round.effects.activate(kind);
        cues.push(CueKind::Pickup { kind }, at);
        cues.push(CueKind::Flash { strength: PICKUP_FLASH }, at);
        log::debug!("Picked up {} item, score {}", kind.as_str(), round.score);
        kinds.push(kind);
    }
    kinds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Item, ObstacleShape};

    fn obstacle_at(round: &mut RoundState, x: f32, y: f32, speed: f32) {
        let id = round.next_entity_id();
        round.obstacles.push(Obstacle::new(
            id,
            ObstacleShape::Square,
            Vec2::new(x, y),
            Vec2::new(60.0, 60.0),
            speed,
        ));
    }

    #[test]
    fn test_rect_overlap() {
        let a = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let b = Rect::new(Vec2::new(5.0, 5.0), Vec2::new(10.0, 10.0));
        let touching = Rect::new(Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0));
        let empty = Rect::new(Vec2::new(2.0, 2.0), Vec2::ZERO);

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&touching));
        assert!(!a.overlaps(&empty));
        assert_eq!(a.center(), Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_obstacles_scroll_and_cull() {
        let mut round = RoundState::new();
        let mut cues = Cues::default();
        obstacle_at(&mut round, 600.0, 0.0, 3.0);
        obstacle_at(&mut round, -58.0, 700.0, 3.0);

        assert!(!resolve_obstacles(&mut round, &mut cues));
        assert_eq!(round.obstacles.len(), 1);
        assert_eq!(round.obstacles[0].pos.x, 597.0);
    }

    #[test]
    fn test_single_collision_per_frame() {
        let mut round = RoundState::new();
        let mut cues = Cues::default();
        round.started = true;
        let y = round.player.pos.y;
        obstacle_at(&mut round, 63.0, y, 3.0);
        obstacle_at(&mut round, 53.0, y, 3.0);

        assert!(resolve_obstacles(&mut round, &mut cues));
        assert!(!round.started);
        assert_eq!(round.ending_ticks, ENDING_FRAMES);

        let collisions = cues
            .as_slice()
            .iter()
            .filter(|c| matches!(c.kind, CueKind::Collision { .. }))
            .count();
        assert_eq!(collisions, 1);
        // Cue sits on the first obstacle found
        let cue = cues.as_slice()[0];
        assert_eq!(cue.pos, Vec2::new(60.0 + 30.0, y + 30.0));
    }

    #[test]
    fn test_shrunk_player_slips_past() {
        let mut round = RoundState::new();
        let mut cues = Cues::default();
        round.player.pos.y = 100.0;
        // Obstacle top at 137: inside a 60px player, just below a 36px one
        obstacle_at(&mut round, 80.0, 137.0, 3.0);
        round.player.apply_size_multiplier(0.6);
        assert!(!resolve_obstacles(&mut round, &mut cues));

        round.player.apply_size_multiplier(1.0);
        assert!(resolve_obstacles(&mut round, &mut cues));
    }

    #[test]
    fn test_item_pickup() {
        let mut round = RoundState::new();
        let mut cues = Cues::default();
        let y = round.player.pos.y;
        let id = round.next_entity_id();
        round.items.push(Item::new(id, ItemKind::Shrink, Vec2::new(70.0, y)));
        let id = round.next_entity_id();
        round.items.push(Item::new(id, ItemKind::Speed, Vec2::new(900.0, y)));

        let collected = resolve_items(&mut round, &mut cues);
        assert_eq!(collected, vec![ItemKind::Shrink]);
        assert_eq!(round.score, ITEM_BONUS);
        assert!(round.effects.is_active(ItemKind::Shrink));
        assert_eq!(round.items.len(), 1);
        assert_eq!(round.items[0].pos.x, 897.0);

        // Removed exactly once: nothing more to collect
        assert!(resolve_items(&mut round, &mut cues).is_empty());
        assert_eq!(round.score, ITEM_BONUS);
    }

    #[test]
    fn test_items_cull_off_screen() {
        let mut round = RoundState::new();
        let mut cues = Cues::default();
        let id = round.next_entity_id();
        round.items.push(Item::new(id, ItemKind::Slow, Vec2::new(-28.0, 10.0)));

        assert!(resolve_items(&mut round, &mut cues).is_empty());
        assert!(round.items.is_empty());
    }
}
