//! Lamp circulation for the `loop` show sequence.
//!
//! A second timed state machine, independent of the signal cycle: it
//! rotates RED → YELLOW → GREEN on a fixed interval and knows nothing about
//! the configured phase durations. The loop sequence blocks the scheduler
//! for its whole run, so it has to carry its own timing check; this is it.

use crate::signal::SignalColor;

/// Interval-driven color rotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LightCirculation {
    color: SignalColor,
    interval_ms: u64,
    last_change_ms: u64,
}

impl LightCirculation {
    /// Start at `color` with the interval timer at `now_ms`.
    pub const fn new(color: SignalColor, interval_ms: u64, now_ms: u64) -> Self {
        Self {
            color,
            interval_ms,
            last_change_ms: now_ms,
        }
    }

    /// Lamp currently selected.
    pub const fn color(&self) -> SignalColor {
        self.color
    }

    /// Rotate to the next color if a full interval has passed.
    ///
    /// Returns the new color when it changed. The interval restarts at
    /// `now_ms`, not at the nominal deadline.
    pub fn update(&mut self, now_ms: u64) -> Option<SignalColor> {
        if now_ms.saturating_sub(self.last_change_ms) < self.interval_ms {
            return None;
        }
        self.color = self.color.next_in_circulation();
        self.last_change_ms = now_ms;
        Some(self.color)
    }
}
