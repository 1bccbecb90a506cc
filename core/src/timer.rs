use serde::{Deserialize, Serialize};

/// Whole-second game clock driven by an external one-second tick.
///
/// The owner of the periodic tick calls [`Timer::tick`]; ticks arriving while
/// the timer is stopped are dropped, so a tick source that outlives the game
/// it was started for cannot move the clock.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    elapsed: u32,
    running: bool,
}

impl Timer {
    pub const fn new(initial: u32) -> Self {
        Self {
            elapsed: initial,
            running: false,
        }
    }

    pub const fn elapsed_secs(&self) -> u32 {
        self.elapsed
    }

    pub const fn is_running(&self) -> bool {
        self.running
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    /// Stops counting, keeping the elapsed time.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn toggle(&mut self) {
        self.running = !self.running;
    }

    /// Stops and rewinds to `initial`.
    pub fn reset(&mut self, initial: u32) {
        *self = Self::new(initial);
    }

    /// Advances one second if running. Returns whether the time changed.
    pub fn tick(&mut self) -> bool {
        if self.running {
            self.elapsed = self.elapsed.saturating_add(1);
        }
        self.running
    }
}
