//! Fixed-rate frame clock
//!
//! Converts elapsed wall time into a whole number of simulation steps using an
//! accumulator, capped so a long stall cannot snowball.

use std::thread;
use std::time::{Duration, Instant};

use crate::consts::SIM_DT;

/// Maximum steps per update to prevent spiral of death
pub const MAX_SUBSTEPS: u32 = 8;

#[derive(Debug)]
pub struct FrameClock {
    accumulator: f32,
    last: Option<Instant>,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            accumulator: 0.0,
            last: None,
        }
    }

    /// Feed `dt` seconds of wall time; returns how many steps to run
    pub fn advance(&mut self, dt: f32) -> u32 {
        let dt = dt.clamp(0.0, 0.25);
        self.accumulator += dt;

        let mut steps = 0;
        while self.accumulator >= SIM_DT && steps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            steps += 1;
        }
        steps
    }

    /// Block until at least one step is due, then return the step count
    pub fn wait(&mut self) -> u32 {
        loop {
            let now = Instant::now();
            let dt = match self.last {
                Some(last) => now.duration_since(last).as_secs_f32(),
                None => SIM_DT,
            };
            self.last = Some(now);

            let steps = self.advance(dt);
            if steps > 0 {
                return steps;
            }
            let owed = (SIM_DT - self.accumulator).max(0.0);
            thread::sleep(Duration::from_secs_f32(owed));
        }
    }

    /// Forget accumulated time (after a pause in the outer loop)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.last = None;
    }
}
