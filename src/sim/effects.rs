//! Timed status effects granted by items
//!
//! One timer per `ItemKind`, all swept together once per frame. Modifiers are
//! multiplicative and re-asserted on every frame so entities spawned mid-effect
//! pick them up too.

use serde::{Deserialize, Serialize};

use super::state::{ItemKind, RoundState};

/// Effect duration in frames (10 seconds at 60 Hz)
pub const EFFECT_DURATION_FRAMES: u32 = 600;

/// Timer record for a single effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectTimer {
    pub active: bool,
    /// Frames elapsed since (re)activation
    pub timer: u32,
    pub duration: u32,
}

impl Default for EffectTimer {
    fn default() -> Self {
        Self {
            active: false,
            timer: 0,
            duration: EFFECT_DURATION_FRAMES,
        }
    }
}

impl EffectTimer {
    /// Frames until expiry (0 when inactive)
    pub fn remaining(&self) -> u32 {
        if self.active {
            self.duration.saturating_sub(self.timer)
        } else {
            0
        }
    }
}

/// Effect table indexed by `ItemKind::index`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffects {
    timers: [EffectTimer; 4],
}

impl StatusEffects {
    /// Turn an effect on. Re-activating restarts the timer instead of stacking.
    pub fn activate(&mut self, kind: ItemKind) {
        let slot = &mut self.timers[kind.index()];
        slot.active = true;
        slot.timer = 0;
    }

    pub fn is_active(&self, kind: ItemKind) -> bool {
        self.timers[kind.index()].active
    }

    pub fn timer(&self, kind: ItemKind) -> &EffectTimer {
        &self.timers[kind.index()]
    }

    /// Currently active effects, in table order
    pub fn active(&self) -> impl Iterator<Item = ItemKind> + '_ {
        ItemKind::ALL
            .into_iter()
            .filter(move |kind| self.is_active(*kind))
    }

    /// Multiplier the effect contributes right now (1.0 when inactive)
    pub fn factor(&self, kind: ItemKind) -> f64 {
        if self.is_active(kind) {
            kind.multiplier()
        } else {
            1.0
        }
    }

    /// Advance every active timer by one frame.
    ///
    /// Returns the effects that expired on this frame; they are already
    /// inactive with a zeroed timer.
    pub fn tick(&mut self) -> Vec<ItemKind> {
        let mut expired = Vec::new();
        for kind in ItemKind::ALL {
            let slot = &mut self.timers[kind.index()];
            if !slot.active {
                continue;
            }
            slot.timer += 1;
            if slot.timer >= slot.duration {
                slot.active = false;
                slot.timer = 0;
                expired.push(kind);
            }
        }
        expired
    }

    /// Deactivate everything
    pub fn clear(&mut self) {
        self.timers = Default::default();
    }
}

/// Re-assert all modifiers on the player and every live obstacle.
///
/// Inactive effects contribute 1.0, which restores base values on expiry.
pub fn apply_modifiers(round: &mut RoundState) {
    let effects = &round.effects;
    let boost = effects.factor(ItemKind::Speed);
    let shrink = effects.factor(ItemKind::Shrink);
    let obstacle_shrink = effects.factor(ItemKind::ObstacleShrink);
    let slow = effects.factor(ItemKind::Slow);

    round.player.apply_speed_multiplier(boost);
    round.player.apply_size_multiplier(shrink);
    for obstacle in &mut round.obstacles {
        obstacle.apply_size_multiplier(obstacle_shrink);
        obstacle.apply_speed_multiplier(slow);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Obstacle, ObstacleShape};
    use glam::Vec2;

    #[test]
    fn test_effect_expires_after_duration() {
        let mut effects = StatusEffects::default();
        effects.activate(ItemKind::Shrink);

        for _ in 0..EFFECT_DURATION_FRAMES - 1 {
            assert!(effects.tick().is_empty());
        }
        assert!(effects.is_active(ItemKind::Shrink));
        assert_eq!(effects.timer(ItemKind::Shrink).remaining(), 1);

        assert_eq!(effects.tick(), vec![ItemKind::Shrink]);
        assert!(!effects.is_active(ItemKind::Shrink));
        assert_eq!(effects.timer(ItemKind::Shrink).timer, 0);
    }

    #[test]
    fn test_reactivation_restarts_timer() {
        let mut effects = StatusEffects::default();
        effects.activate(ItemKind::Speed);
        for _ in 0..300 {
            effects.tick();
        }
        assert_eq!(effects.timer(ItemKind::Speed).timer, 300);

        effects.activate(ItemKind::Speed);
        assert_eq!(effects.timer(ItemKind::Speed).timer, 0);
        assert_eq!(effects.factor(ItemKind::Speed), 1.5);
    }

    #[test]
    fn test_effects_are_independent() {
        let mut effects = StatusEffects::default();
        effects.activate(ItemKind::Slow);
        for _ in 0..100 {
            effects.tick();
        }
        effects.activate(ItemKind::ObstacleShrink);

        let active: Vec<_> = effects.active().collect();
        assert_eq!(active, vec![ItemKind::ObstacleShrink, ItemKind::Slow]);

        for _ in 0..500 {
            effects.tick();
        }
        assert!(!effects.is_active(ItemKind::Slow));
        assert!(effects.is_active(ItemKind::ObstacleShrink));
    }

    #[test]
    fn test_apply_modifiers_covers_new_obstacles() {
        let mut round = RoundState::new();
        round.effects.activate(ItemKind::Slow);
        round.effects.activate(ItemKind::ObstacleShrink);
        round.effects.activate(ItemKind::Speed);

        let id = round.next_entity_id();
        round.obstacles.push(Obstacle::new(
            id,
            ObstacleShape::Square,
            Vec2::new(1200.0, 10.0),
            Vec2::new(60.0, 60.0),
            3.0,
        ));
        apply_modifiers(&mut round);

        let obstacle = &round.obstacles[0];
        assert_eq!(obstacle.size, Vec2::new(42.0, 42.0));
        assert!((obstacle.speed - 2.1).abs() < 1e-5);
        assert_eq!(round.player.speed, 10.5);
        assert_eq!(round.player.size, round.player.base_size);

        round.effects.clear();
        apply_modifiers(&mut round);
        let obstacle = &round.obstacles[0];
        assert_eq!(obstacle.size, obstacle.base_size);
        assert_eq!(obstacle.speed, obstacle.base_speed);
        assert_eq!(round.player.speed, round.player.base_speed);
    }
}
