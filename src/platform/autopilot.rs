//! Demo-mode autopilot
//!
//! Plays a round through ordinary input events: presses "go" when the round is
//! waiting, then steers toward the nearest row that is clear of incoming
//! obstacles, detouring for items when nothing is close.

use crate::engine::{Direction, InputEvent, Screen, Snapshot};
use crate::sim::{RoundState, TickInput};

/// How far ahead of the player obstacles are considered (pixels)
const LOOKAHEAD: f32 = 360.0;
/// Extra clearance kept around obstacles (pixels)
const CLEARANCE: f32 = 12.0;
/// Candidate rows are sampled this far apart (pixels)
const ROW_STEP: f32 = 8.0;

#[derive(Debug, Default)]
pub struct Autopilot {
    held: TickInput,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events to feed the engine before the next step
    pub fn events(&mut self, frame: &Snapshot<'_>) -> Vec<InputEvent> {
        let mut events = Vec::new();
        let want = match (frame.screen, frame.round) {
            (Screen::Playing, Some(round)) => {
                if !round.started && !round.is_ending() {
                    events.push(InputEvent::StartRound);
                }
                steer(round)
            }
            _ => TickInput::default(),
        };

        if want.up != self.held.up {
            events.push(InputEvent::DirectionHeld(Direction::Up, want.up));
        }
        if want.down != self.held.down {
            events.push(InputEvent::DirectionHeld(Direction::Down, want.down));
        }
        self.held = want;
        events
    }
}

/// Is a player top edge at `y` clear of every obstacle in range?
fn row_is_clear(round: &RoundState, y: f32) -> bool {
    let player = &round.player;
    let left = player.pos.x;
    let right = player.pos.x + player.size.x + LOOKAHEAD;
    round.obstacles.iter().all(|o| {
        let ahead = o.pos.x < right && o.pos.x + o.size.x > left - CLEARANCE;
        let overlaps_row =
            y < o.pos.y + o.size.y + CLEARANCE && o.pos.y - CLEARANCE < y + player.size.y;
        !(ahead && overlaps_row)
    })
}

/// Held directions that move the player toward the best clear row
pub fn steer(round: &RoundState) -> TickInput {
    let player = &round.player;
    let current = player.pos.y;
    let max_y = crate::consts::SCREEN_HEIGHT - player.size.y;

    let target = if row_is_clear(round, current) {
        // Safe where we are: go for the nearest item ahead, if its row is clear
        round
            .items
            .iter()
            .filter(|i| i.pos.x > player.pos.x)
            .min_by(|a, b| a.pos.x.total_cmp(&b.pos.x))
            .map(|i| (i.pos.y + i.size.y / 2.0 - player.size.y / 2.0).clamp(0.0, max_y))
            .filter(|&y| row_is_clear(round, y))
            .unwrap_or(current)
    } else {
        let rows = (max_y / ROW_STEP) as u32;
        (0..=rows)
            .map(|i| i as f32 * ROW_STEP)
            .filter(|&y| row_is_clear(round, y))
            .min_by(|a, b| (a - current).abs().total_cmp(&(b - current).abs()))
            .unwrap_or(current)
    };

    let delta = target - current;
    let deadband = player.speed / 2.0;
    TickInput {
        up: delta < -deadband,
        down: delta > deadband,
    }
}
