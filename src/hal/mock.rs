//! Mock implementations for testing without hardware.
//!
//! This module provides test doubles for every hardware seam, enabling
//! development and testing on desktop without a motor or lamps attached.
//!
//! # Available Mocks
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockCoils`] | [`CoilDriver`] | Records coil patterns |
//! | [`MockLamps`] | [`SignalLamps`] | Records lamp states |
//! | [`MockClock`] | [`Clock`] + [`Delay`] | Simulated time; delays advance it |
//! | [`MockDisplay`] | [`StatusDisplay`] | Records every display call |
//! | [`MockInput`] | [`CommandInput`] | Queued command lines |
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
//! motor.move_steps(4, Direction::Clockwise, &mut clock).unwrap();
//!
//! // Verify via the mock
//! assert_eq!(motor.coils().pattern, [false, false, true, false]);
//! assert_eq!(clock.now_ms(), 8);
//! ```
//!
//! [`CoilDriver`]: crate::traits::CoilDriver
//! [`SignalLamps`]: crate::traits::SignalLamps
//! [`Clock`]: crate::traits::Clock
//! [`Delay`]: crate::traits::Delay
//! [`StatusDisplay`]: crate::traits::StatusDisplay
//! [`CommandInput`]: crate::input::CommandInput

use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::vec::Vec;

use crate::input::{CommandInput, CommandLine};
use crate::traits::{
    Clock, CoilDriver, CoilPattern, Delay, LampState, LoopProgress, SignalLamps, StatusDisplay,
};
use crate::SystemStatus;

// ============================================================================
// Hardware Mocks
// ============================================================================

/// Mock coil driver.
///
/// # Example
///
/// ```rust
/// use stepper_signal::hal::MockCoils;
/// use stepper_signal::traits::CoilDriver;
///
/// let mut coils = MockCoils::new();
/// coils.energize([true, true, false, false]);
/// coils.release();
///
/// assert_eq!(coils.pattern, [false; 4]);
/// assert_eq!(coils.writes, 2);
/// ```
#[derive(Debug, Default)]
pub struct MockCoils {
    /// Pattern most recently written.
    pub pattern: CoilPattern,
    /// Number of writes, releases included.
    pub writes: usize,
}

impl MockCoils {
    /// Creates a mock with every coil off and no writes recorded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of coils currently energized.
    pub fn energized(&self) -> usize {
        self.pattern.iter().filter(|c| **c).count()
    }
}

impl CoilDriver for MockCoils {
    fn energize(&mut self, pattern: CoilPattern) {
        self.pattern = pattern;
        self.writes += 1;
    }
}

/// Mock lamp driver.
///
/// Every write is appended to `history` so tests can check whole
/// sequences, flash patterns in particular.
///
/// # Example
///
/// ```rust
/// use stepper_signal::hal::MockLamps;
/// use stepper_signal::traits::{LampState, SignalLamps};
///
/// let mut lamps = MockLamps::new();
/// lamps.set_lamps(LampState::ALL);
/// lamps.set_lamps(LampState::OFF);
///
/// assert_eq!(lamps.lamps, LampState::OFF);
/// assert_eq!(lamps.history, vec![LampState::ALL, LampState::OFF]);
/// ```
#[derive(Debug, Default)]
pub struct MockLamps {
    /// Lamps as last driven.
    pub lamps: LampState,
    /// Every state written, oldest first.
    pub history: Vec<LampState>,
}

impl MockLamps {
    /// Creates a mock with every lamp dark and an empty history.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SignalLamps for MockLamps {
    fn set_lamps(&mut self, lamps: LampState) {
        self.lamps = lamps;
        self.history.push(lamps);
    }
}

/// Mock clock for testing.
///
/// Provides a controllable time source. Blocking delays advance the
/// simulated time instead of sleeping, so a 100 000-step move finishes
/// instantly while still costing the right number of milliseconds.
///
/// # Example
///
/// ```rust
/// use stepper_signal::hal::MockClock;
/// use stepper_signal::traits::{Clock, Delay};
///
/// let mut clock = MockClock::new();
/// assert_eq!(clock.now_ms(), 0);
///
/// clock.set(1000);
/// assert_eq!(clock.now_ms(), 1000);
///
/// clock.advance(500);
/// clock.delay_ms(250);
/// assert_eq!(clock.now_ms(), 1750);
/// assert_eq!(clock.total_delay_ms, 250);
/// ```
#[derive(Debug)]
pub struct MockClock {
    current_ms: u64,
    /// Sum of every `delay_ms` request.
    pub total_delay_ms: u64,
}

impl MockClock {
    /// Creates a new mock clock starting at 0ms.
    pub fn new() -> Self {
        Self {
            current_ms: 0,
            total_delay_ms: 0,
        }
    }

    /// Sets the current time in milliseconds.
    pub fn set(&mut self, ms: u64) {
        self.current_ms = ms;
    }

    /// Advances the clock by the given duration.
    pub fn advance(&mut self, ms: u64) {
        self.current_ms += ms;
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u64 {
        self.current_ms
    }
}

impl Delay for MockClock {
    fn delay_ms(&mut self, ms: u32) {
        self.advance(ms as u64);
        self.total_delay_ms += ms as u64;
    }
}

// ============================================================================
// Display Mock
// ============================================================================

/// One call recorded by [`MockDisplay`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DisplayEvent {
    /// `show_status`
    Status(SystemStatus),
    /// `show_command`
    Command(String),
    /// `show_error`
    Error(String),
    /// `show_signal`
    Signal(String),
    /// `show_loop_progress`
    Progress(LoopProgress),
}

/// Mock display for testing.
///
/// Records every call in order. The filtering helpers return the text or
/// values of one kind of call.
///
/// # Example
///
/// ```rust
/// use stepper_signal::hal::MockDisplay;
/// use stepper_signal::traits::StatusDisplay;
///
/// let mut display = MockDisplay::new();
/// display.show_command("STOP").unwrap();
/// display.show_error("Unknown cmd").unwrap();
///
/// assert_eq!(display.commands().collect::<Vec<_>>(), ["STOP"]);
/// assert_eq!(display.errors().collect::<Vec<_>>(), ["Unknown cmd"]);
/// assert_eq!(display.events.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct MockDisplay {
    /// Every call, oldest first.
    pub events: Vec<DisplayEvent>,
    /// When set, every call fails (after being recorded).
    pub fail: bool,
}

impl MockDisplay {
    /// Creates a new mock display.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock display whose calls all return an error.
    pub fn failing() -> Self {
        Self {
            events: Vec::new(),
            fail: true,
        }
    }

    /// Text passed to `show_command`.
    pub fn commands(&self) -> impl Iterator<Item = &str> {
        self.events.iter().filter_map(|e| match e {
            DisplayEvent::Command(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Text passed to `show_error`.
    pub fn errors(&self) -> impl Iterator<Item = &str> {
        self.events.iter().filter_map(|e| match e {
            DisplayEvent::Error(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Labels passed to `show_signal`.
    pub fn signals(&self) -> impl Iterator<Item = &str> {
        self.events.iter().filter_map(|e| match e {
            DisplayEvent::Signal(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Loop progress snapshots.
    pub fn progress(&self) -> impl Iterator<Item = &LoopProgress> {
        self.events.iter().filter_map(|e| match e {
            DisplayEvent::Progress(p) => Some(p),
            _ => None,
        })
    }

    /// Number of `show_status` calls.
    pub fn status_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, DisplayEvent::Status(_)))
            .count()
    }

    /// Most recent status rendered.
    pub fn last_status(&self) -> Option<&SystemStatus> {
        self.events.iter().rev().find_map(|e| match e {
            DisplayEvent::Status(s) => Some(s),
            _ => None,
        })
    }

    fn record(&mut self, event: DisplayEvent) -> Result<(), ()> {
        self.events.push(event);
        if self.fail {
            Err(())
        } else {
            Ok(())
        }
    }
}

impl StatusDisplay for MockDisplay {
    type Error = ();

    fn show_status(&mut self, status: &SystemStatus) -> Result<(), ()> {
        self.record(DisplayEvent::Status(*status))
    }

    fn show_command(&mut self, text: &str) -> Result<(), ()> {
        self.record(DisplayEvent::Command(text.into()))
    }

    fn show_error(&mut self, text: &str) -> Result<(), ()> {
        self.record(DisplayEvent::Error(text.into()))
    }

    fn show_signal(&mut self, label: &str) -> Result<(), ()> {
        self.record(DisplayEvent::Signal(label.into()))
    }

    fn show_loop_progress(&mut self, progress: &LoopProgress) -> Result<(), ()> {
        self.record(DisplayEvent::Progress(*progress))
    }
}

// ============================================================================
// Input Mock
// ============================================================================

/// Mock command input.
///
/// Lines come out in the order they were queued, one per poll.
///
/// # Example
///
/// ```rust
/// use stepper_signal::hal::MockInput;
/// use stepper_signal::input::CommandInput;
///
/// let mut input = MockInput::new();
/// input.queue_line("red");
/// input.queue_line("green");
///
/// assert_eq!(input.poll_line().as_deref(), Some("red"));
/// assert_eq!(input.poll_line().as_deref(), Some("green"));
/// assert_eq!(input.poll_line(), None);
/// ```
#[derive(Debug, Default)]
pub struct MockInput {
    queue: VecDeque<CommandLine>,
}

impl MockInput {
    /// Creates an input with nothing queued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a line. Lines longer than the input limit are truncated.
    pub fn queue_line(&mut self, line: &str) {
        let mut buf = CommandLine::new();
        for ch in line.chars() {
            if buf.push(ch).is_err() {
                break;
            }
        }
        self.queue.push_back(buf);
    }

    /// Lines not yet polled.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl CommandInput for MockInput {
    fn poll_line(&mut self) -> Option<CommandLine> {
        self.queue.pop_front()
    }
}
