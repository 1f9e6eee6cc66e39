//! Half-step coil sequencer.
//!
//! [`StepSequencer`] walks an 8-row energization table one row per call.
//! Each advance writes the next row to the coils and then blocks for the
//! step delay; every higher-level motion is built from this primitive.

use crate::config::PHASE_COUNT;
use crate::traits::{CoilDriver, CoilPattern, Delay, Direction};

/// Half-step energization table for a 4-coil unipolar motor (28BYJ-48 on a
/// ULN2003 board). Adjacent rows differ in exactly one coil.
pub const PHASE_TABLE: [CoilPattern; PHASE_COUNT] = [
    [true, false, false, false],
    [true, true, false, false],
    [false, true, false, false],
    [false, true, true, false],
    [false, false, true, false],
    [false, false, true, true],
    [false, false, false, true],
    [true, false, false, true],
];

/// Current position in [`PHASE_TABLE`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepSequencer {
    phase: usize,
}

impl StepSequencer {
    /// Sequencer at phase 0.
    pub const fn new() -> Self {
        Self { phase: 0 }
    }

    /// Index of the last pattern written (always `< PHASE_COUNT`).
    pub const fn phase(&self) -> usize {
        self.phase
    }

    /// Pattern for the current phase.
    pub const fn pattern(&self) -> CoilPattern {
        PHASE_TABLE[self.phase]
    }

    /// Phase one step away from `phase` in `direction`, wrapped into range.
    pub const fn next_phase(phase: usize, direction: Direction) -> usize {
        match direction {
            Direction::Clockwise => (phase + 1) % PHASE_COUNT,
            Direction::CounterClockwise => (phase + PHASE_COUNT - 1) % PHASE_COUNT,
        }
    }

    /// Move one phase, energize the coils, then block for `step_delay_ms`.
    pub fn advance<C, D>(&mut self, direction: Direction, coils: &mut C, delay: &mut D, step_delay_ms: u32)
    where
        C: CoilDriver,
        D: Delay,
    {
        self.phase = Self::next_phase(self.phase, direction);
        coils.energize(PHASE_TABLE[self.phase]);
        delay.delay_ms(step_delay_ms);
    }
}
