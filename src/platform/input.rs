//! Keyboard and mouse mapping
//!
//! Translates raw keys and click coordinates into `InputEvent`s for the
//! screen currently shown. Layout numbers are screen pixels on the
//! 1200x800 playfield.

use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::engine::{Direction, InputEvent, Screen};

/// Keys the game listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Space,
    Escape,
    Enter,
}

/// Map a key press or release on `screen` to an engine event
pub fn map_key(screen: Screen, key: Key, pressed: bool) -> Option<InputEvent> {
    match key {
        Key::Up => return Some(InputEvent::DirectionHeld(Direction::Up, pressed)),
        Key::Down => return Some(InputEvent::DirectionHeld(Direction::Down, pressed)),
        _ => {}
    }
    if !pressed {
        return None;
    }

    match (screen, key) {
        (Screen::Start, Key::Space | Key::Enter) => Some(InputEvent::StartRound),
        (Screen::Playing, Key::Space) => Some(InputEvent::StartRound),
        (Screen::Playing, Key::Escape) => Some(InputEvent::Pause),
        (Screen::Paused, Key::Escape) => Some(InputEvent::Resume),
        (Screen::Paused, Key::Enter) => Some(InputEvent::QuitToTitle),
        (Screen::Result, Key::Enter) => Some(InputEvent::Replay),
        (Screen::Result, Key::Escape) => Some(InputEvent::ConfirmAtResult),
        _ => None,
    }
}

/// Menu buttons share one column
const BUTTON_LEFT: f32 = 450.0;
const BUTTON_RIGHT: f32 = 750.0;

/// Pause dialog size
const PAUSE_BOX_WIDTH: f32 = 400.0;
const PAUSE_BOX_HEIGHT: f32 = 250.0;

fn in_column(x: f32) -> bool {
    (BUTTON_LEFT..=BUTTON_RIGHT).contains(&x)
}

fn in_rows(y: f32, top: f32, bottom: f32) -> bool {
    (top..=bottom).contains(&y)
}

/// Map a click at (x, y) on `screen` to the button's event, if any.
///
/// The title screen's score and instructions buttons only open overlays in the
/// presentation layer, so they yield no engine event.
pub fn hit_test(screen: Screen, x: f32, y: f32) -> Option<InputEvent> {
    match screen {
        Screen::Start => {
            if !in_column(x) {
                return None;
            }
            if in_rows(y, 280.0, 330.0) {
                Some(InputEvent::StartRound)
            } else if in_rows(y, 520.0, 570.0) {
                Some(InputEvent::QuitApplication)
            } else {
                None
            }
        }
        Screen::Paused => {
            let box_x = (SCREEN_WIDTH - PAUSE_BOX_WIDTH) / 2.0;
            let box_y = (SCREEN_HEIGHT - PAUSE_BOX_HEIGHT) / 2.0;
            if !(box_x + 50.0..=box_x + PAUSE_BOX_WIDTH - 50.0).contains(&x) {
                return None;
            }
            if in_rows(y, box_y + 120.0, box_y + 165.0) {
                Some(InputEvent::Resume)
            } else if in_rows(y, box_y + 180.0, box_y + 225.0) {
                Some(InputEvent::QuitToTitle)
            } else {
                None
            }
        }
        Screen::Result => {
            if !in_column(x) {
                return None;
            }
            if in_rows(y, 380.0, 430.0) {
                Some(InputEvent::Replay)
            } else if in_rows(y, 450.0, 500.0) {
                Some(InputEvent::ConfirmAtResult)
            } else if in_rows(y, 520.0, 570.0) {
                Some(InputEvent::QuitApplication)
            } else {
                None
            }
        }
        Screen::Playing => None,
    }
}
