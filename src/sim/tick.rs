//! Fixed timestep simulation tick
//!
//! Advances one round by exactly one frame. The order inside a frame is fixed:
//! bookkeeping and spawning, effect expiry, effect application, obstacles and
//! collision, items and pickups, cue and countdown decay.

use rand::Rng;

use super::collision::{resolve_items, resolve_obstacles};
use super::cue::Cues;
use super::effects::apply_modifiers;
use super::spawn;
use super::state::RoundState;

/// Held directions for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
}

/// What a tick did to the round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Round is waiting for the "go" input; nothing moved
    Waiting,
    /// A normal frame (advancing or counting down the ending window)
    Advanced,
    /// The player hit an obstacle this frame
    Collided,
    /// Ending window ran out; the round is over
    Finished,
}

/// Advance the round by one fixed timestep
pub fn tick<R: Rng>(
    state: &mut RoundState,
    input: &TickInput,
    rng: &mut R,
    cues: &mut Cues,
) -> TickOutcome {
    if !state.started && !state.is_ending() {
        cues.decay();
        return TickOutcome::Waiting;
    }

    let advancing = state.is_advancing();

    if advancing {
        spawn::advance(state, rng, cues);
        state.player.steer(input.up, input.down);
    }

    for kind in state.effects.tick() {
        log::debug!("{} effect expired", kind.as_str());
    }
    apply_modifiers(state);

    if advancing {
        if resolve_obstacles(state, cues) {
            // Frozen from here; the frame ends at the collision
            return TickOutcome::Collided;
        }
        if !resolve_items(state, cues).is_empty() {
            // Effects take hold on the pickup frame itself
            apply_modifiers(state);
        }
    }

    cues.decay();

    if state.is_ending() {
        state.ending_ticks -= 1;
        if state.ending_ticks == 0 {
            return TickOutcome::Finished;
        }
    }

    TickOutcome::Advanced
}
