//! Transient presentation cues
//!
//! The simulation announces notable moments (collision, pickup, speed-up, ...)
//! as short-lived cues. The presentation layer animates them from their
//! remaining lifetime; nothing in gameplay reads them back.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::ItemKind;

/// Screen shake strength on collision
pub const COLLISION_SHAKE: f32 = 15.0;
/// Flash strengths, fading by `FLASH_FADE_PER_FRAME`
pub const COLLISION_FLASH: u32 = 200;
pub const PICKUP_FLASH: u32 = 100;
pub const FLASH_FADE_PER_FRAME: u32 = 5;
/// Wind density never exceeds this
pub const MAX_WIND_DENSITY: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CueKind {
    /// Round started ("Go!!!")
    Go,
    /// Player hit an obstacle
    Collision { shake: f32 },
    /// Full-screen flash; alpha is `strength` at spawn
    Flash { strength: u32 },
    /// Item collected (+100 popup)
    Pickup { kind: ItemKind },
    /// Obstacle speed escalated
    SpeedUp,
    /// Ambient wind streaks after a speed-up
    Wind { density: f32 },
    /// Finished round beat the stored best
    NewHighScore,
}

impl CueKind {
    /// Frames the cue stays on screen
    pub fn lifetime(&self) -> u32 {
        match self {
            CueKind::Go => 90,
            CueKind::Collision { .. } => 60,
            CueKind::Flash { strength } => strength / FLASH_FADE_PER_FRAME,
            CueKind::Pickup { .. } => 40,
            CueKind::SpeedUp => 90,
            CueKind::Wind { .. } => 120,
            CueKind::NewHighScore => 180,
        }
    }
}

/// A live cue
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cue {
    pub kind: CueKind,
    pub pos: Vec2,
    /// Frames left
    pub ttl: u32,
    /// Frames at spawn
    pub lifetime: u32,
}

impl Cue {
    /// 0.0 at spawn, approaching 1.0 as the cue expires
    pub fn progress(&self) -> f32 {
        if self.lifetime == 0 {
            return 1.0;
        }
        1.0 - self.ttl as f32 / self.lifetime as f32
    }
}

/// Queue of live cues, owned by the engine so cues outlive the round that
/// emitted them
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cues {
    list: Vec<Cue>,
    /// Drop wind and zero out screen shake
    pub reduced_motion: bool,
}

impl Cues {
    pub fn new(reduced_motion: bool) -> Self {
        Self {
            list: Vec::new(),
            reduced_motion,
        }
    }

    pub fn push(&mut self, kind: CueKind, pos: Vec2) {
        let kind = match kind {
            CueKind::Wind { .. } if self.reduced_motion => return,
            CueKind::Collision { .. } if self.reduced_motion => CueKind::Collision { shake: 0.0 },
            other => other,
        };
        let lifetime = kind.lifetime();
        if lifetime == 0 {
            return;
        }
        self.list.push(Cue {
            kind,
            pos,
            ttl: lifetime,
            lifetime,
        });
    }

    /// Age every cue by one frame and drop the expired ones
    pub fn decay(&mut self) {
        for cue in &mut self.list {
            cue.ttl = cue.ttl.saturating_sub(1);
        }
        self.list.retain(|c| c.ttl > 0);
    }

    pub fn as_slice(&self) -> &[Cue] {
        &self.list
    }

    pub fn clear(&mut self) {
        self.list.clear();
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_decays_to_removal() {
        let mut cues = Cues::default();
        cues.push(CueKind::Pickup { kind: ItemKind::Slow }, Vec2::ZERO);
        assert_eq!(cues.as_slice()[0].ttl, 40);

        for _ in 0..39 {
            cues.decay();
        }
        assert_eq!(cues.len(), 1);
        cues.decay();
        assert!(cues.is_empty());
    }

    #[test]
    fn test_flash_lifetime_follows_strength() {
        assert_eq!(CueKind::Flash { strength: COLLISION_FLASH }.lifetime(), 40);
        assert_eq!(CueKind::Flash { strength: PICKUP_FLASH }.lifetime(), 20);
    }

    #[test]
    fn test_reduced_motion_filters() {
        let mut cues = Cues::new(true);
        cues.push(CueKind::Wind { density: 1.0 }, Vec2::ZERO);
        cues.push(CueKind::Collision { shake: COLLISION_SHAKE }, Vec2::ZERO);

        assert_eq!(cues.len(), 1);
        assert_eq!(cues.as_slice()[0].kind, CueKind::Collision { shake: 0.0 });
    }

    #[test]
    fn test_progress() {
        let mut cues = Cues::default();
        cues.push(CueKind::SpeedUp, Vec2::ZERO);
        assert_eq!(cues.as_slice()[0].progress(), 0.0);
        for _ in 0..45 {
            cues.decay();
        }
        assert!((cues.as_slice()[0].progress() - 0.5).abs() < 1e-6);
    }
}
