//! Stepper motor controller.
//!
//! [`MotorController`] owns the coil outputs, the [`StepSequencer`], and the
//! motor's run state. Every motion is blocking: `move_steps(n)` occupies the
//! caller for `n * step_delay_ms` and nothing else runs meanwhile.
//!
//! # Example
//!
//! ```rust
//! use stepper_signal::{MotorController, Direction};
//! use stepper_signal::config::MotorConfig;
//! use stepper_signal::hal::{MockClock, MockCoils};
//! use stepper_signal::traits::Clock;
//!
//! let mut motor = MotorController::new(MockCoils::new(), &MotorConfig::default());
//! let mut clock = MockClock::new();
//!
//! motor.move_steps(10, Direction::Clockwise, &mut clock).unwrap();
//! assert_eq!(motor.state().current_phase, 2); // 10 mod 8
//! assert_eq!(clock.now_ms(), 20); // 10 steps * 2ms
//! ```

use crate::config::{MotorConfig, MAX_STEP_COUNT, MAX_STEP_DELAY_MS, MIN_STEP_DELAY_MS};
use crate::error::InvalidArgument;
use crate::sequencer::StepSequencer;
use crate::traits::{CoilDriver, Delay, Direction};

/// Snapshot of the motor for status and display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotorState {
    /// Index into the coil table.
    pub current_phase: usize,
    /// Delay after each step; lower is faster.
    pub step_delay_ms: u32,
    /// True only while a move is in progress.
    pub is_running: bool,
}

/// Stepper motor controller.
///
/// # Type Parameter
///
/// - `C`: The coil output implementation ([`CoilDriver`] trait)
pub struct MotorController<C: CoilDriver> {
    coils: C,
    sequencer: StepSequencer,
    step_delay_ms: u32,
    is_running: bool,
    demo_steps: u32,
    demo_pause_ms: u32,
}

impl<C: CoilDriver> MotorController<C> {
    /// Create a controller with de-energized coils.
    pub fn new(mut coils: C, config: &MotorConfig) -> Self {
        coils.release();
        Self {
            coils,
            sequencer: StepSequencer::new(),
            step_delay_ms: config.step_delay_ms.clamp(MIN_STEP_DELAY_MS, MAX_STEP_DELAY_MS),
            is_running: false,
            demo_steps: config.demo_steps,
            demo_pause_ms: config.demo_pause_ms,
        }
    }

    /// Check a step count without moving.
    pub fn validate_step_count(count: i64) -> Result<u32, InvalidArgument> {
        if (1..=MAX_STEP_COUNT).contains(&count) {
            Ok(count as u32)
        } else {
            Err(InvalidArgument::StepCount(count))
        }
    }

    /// Take `count` steps in `direction`, blocking for the whole move.
    ///
    /// Fails without touching any state unless `1 <= count <= 100_000`.
    pub fn move_steps<D: Delay>(
        &mut self,
        count: i64,
        direction: Direction,
        delay: &mut D,
    ) -> Result<u32, InvalidArgument> {
        let steps = Self::validate_step_count(count)?;

        log::debug!("moving {} steps {}", steps, direction.as_str());
        self.is_running = true;
        for _ in 0..steps {
            self.sequencer
                .advance(direction, &mut self.coils, delay, self.step_delay_ms);
        }
        self.is_running = false;

        Ok(steps)
    }

    /// Take a single step. Used by composite operations that interleave
    /// their own timing checks between steps.
    pub fn step<D: Delay>(&mut self, direction: Direction, delay: &mut D) {
        self.sequencer
            .advance(direction, &mut self.coils, delay, self.step_delay_ms);
    }

    /// Check a step delay without applying it.
    pub fn validate_speed(delay_ms: i64) -> Result<u32, InvalidArgument> {
        if (MIN_STEP_DELAY_MS as i64..=MAX_STEP_DELAY_MS as i64).contains(&delay_ms) {
            Ok(delay_ms as u32)
        } else {
            Err(InvalidArgument::Speed(delay_ms))
        }
    }

    /// Set the delay after each step.
    ///
    /// Accepted iff `MIN_STEP_DELAY_MS <= delay_ms <= MAX_STEP_DELAY_MS`;
    /// otherwise the previous delay is kept.
    pub fn set_speed(&mut self, delay_ms: i64) -> Result<u32, InvalidArgument> {
        self.step_delay_ms = Self::validate_speed(delay_ms)?;
        Ok(self.step_delay_ms)
    }

    /// De-energize every coil, whatever the current phase.
    pub fn stop(&mut self) {
        self.coils.release();
        self.is_running = false;
    }

    /// Fixed choreography: forward, pause, back, stop. Blocks throughout.
    pub fn run_demo<D: Delay>(&mut self, delay: &mut D) {
        let steps = self.demo_steps as i64;

        log::info!("Running motor demonstration...");
        log::info!("Clockwise {} steps", steps);
        if let Err(e) = self.move_steps(steps, Direction::Clockwise, delay) {
            log::warn!("demo skipped forward leg: {}", e);
        }
        delay.delay_ms(self.demo_pause_ms);

        log::info!("Counter-clockwise {} steps", steps);
        if let Err(e) = self.move_steps(steps, Direction::CounterClockwise, delay) {
            log::warn!("demo skipped reverse leg: {}", e);
        }

        self.stop();
        log::info!("Motor demo complete!");
    }

    /// Mark the motor as moving for a composite operation.
    pub(crate) fn set_running(&mut self, running: bool) {
        self.is_running = running;
    }

    /// Current state snapshot.
    pub fn state(&self) -> MotorState {
        MotorState {
            current_phase: self.sequencer.phase(),
            step_delay_ms: self.step_delay_ms,
            is_running: self.is_running,
        }
    }

    /// Current step delay.
    pub fn step_delay_ms(&self) -> u32 {
        self.step_delay_ms
    }

    /// Borrow the coil driver (mostly for tests).
    pub fn coils(&self) -> &C {
        &self.coils
    }
}
