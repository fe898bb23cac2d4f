//! Platform abstraction layer
//!
//! Everything between the engine and the outside world:
//! - Frame clock (fixed 60 Hz ticks)
//! - Presenter trait for whatever draws the snapshot
//! - Key and mouse mapping onto semantic input events
//! - Autopilot input for demo/headless play

pub mod autopilot;
pub mod clock;
pub mod input;

pub use autopilot::Autopilot;
pub use clock::FrameClock;
pub use input::{Key, hit_test, map_key};

use crate::engine::Snapshot;

/// Consumer of one snapshot per frame. Implementations only read.
pub trait Presenter {
    fn present(&mut self, frame: &Snapshot<'_>);
}
