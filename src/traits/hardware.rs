//! Hardware abstraction traits for coils, lamps, and time.
//!
//! This module defines the hardware seams that let the controller run on a
//! microcontroller or on a desktop with mocks.
//!
//! # Key Traits
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`CoilDriver`] | Four stepper coil outputs (ULN2003-style driver) |
//! | [`SignalLamps`] | Red/yellow/green lamp outputs |
//! | [`Clock`] | Monotonic millisecond time source |
//! | [`Delay`] | Blocking delay |
//!
//! Output traits cannot fail. Implementations handle (and log) pin errors
//! themselves so a glitching output never aborts a half-finished move.
//!
//! # Example
//!
//! ```rust
//! use stepper_signal::traits::{Clock, Delay};
//! use stepper_signal::hal::MockClock;
//!
//! let mut clock = MockClock::new();
//! clock.delay_ms(250);
//! assert_eq!(clock.now_ms(), 250);
//! ```

/// Rotation direction of the stepper.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Direction {
    /// Walk the phase table forwards.
    #[default]
    Clockwise,
    /// Walk the phase table backwards.
    CounterClockwise,
}

impl Direction {
    /// Returns the direction as a lowercase string.
    ///
    /// # Examples
    ///
    /// ```
    /// use stepper_signal::Direction;
    ///
    /// assert_eq!(Direction::Clockwise.as_str(), "clockwise");
    /// assert_eq!(Direction::CounterClockwise.as_str(), "counter_clockwise");
    /// ```
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Direction::Clockwise => "clockwise",
            Direction::CounterClockwise => "counter_clockwise",
        }
    }

    /// The opposite direction.
    #[inline]
    pub const fn reversed(self) -> Self {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
        }
    }
}

/// Energization of the four coils (A, B, C, D).
pub type CoilPattern = [bool; 4];

/// All coils off.
pub const COILS_RELEASED: CoilPattern = [false; 4];

/// Four-coil stepper output.
///
/// # Example Implementation
///
/// ```rust,ignore
/// use stepper_signal::traits::{CoilDriver, CoilPattern};
///
/// struct MyCoils { /* four GPIO handles */ }
///
/// impl CoilDriver for MyCoils {
///     fn energize(&mut self, pattern: CoilPattern) {
///         // write pattern[0..4] to IN1..IN4
///     }
/// }
/// ```
pub trait CoilDriver {
    /// Drive the four coil outputs to `pattern`.
    fn energize(&mut self, pattern: CoilPattern);

    /// De-energize every coil.
    fn release(&mut self) {
        self.energize(COILS_RELEASED);
    }
}

/// State of the three signal lamps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LampState {
    /// Red lamp lit.
    pub red: bool,
    /// Yellow lamp lit.
    pub yellow: bool,
    /// Green lamp lit.
    pub green: bool,
}

impl LampState {
    /// Every lamp dark.
    pub const OFF: LampState = LampState::new(false, false, false);

    /// Every lamp lit.
    pub const ALL: LampState = LampState::new(true, true, true);

    /// Build a lamp state from individual flags.
    pub const fn new(red: bool, yellow: bool, green: bool) -> Self {
        Self { red, yellow, green }
    }

    /// Number of lit lamps.
    pub const fn lit_count(&self) -> u8 {
        self.red as u8 + self.yellow as u8 + self.green as u8
    }
}

/// Red/yellow/green lamp output.
pub trait SignalLamps {
    /// Drive all three lamps at once.
    fn set_lamps(&mut self, lamps: LampState);
}

/// Time source for `no_std` environments.
///
/// Provides monotonic time in milliseconds. On desktop this wraps
/// `std::time::Instant`; on a microcontroller, a hardware timer.
pub trait Clock {
    /// Milliseconds since an arbitrary epoch.
    ///
    /// Must be monotonically increasing.
    fn now_ms(&self) -> u64;
}

/// Blocking delay.
///
/// Every blocking operation in the controller goes through this trait,
/// which is what makes step timing and flash patterns testable without
/// waiting in real time.
pub trait Delay {
    /// Block for `ms` milliseconds.
    fn delay_ms(&mut self, ms: u32);
}

/// A time source that can also block: what the scheduler and any
/// operation with its own timing checks need.
pub trait Timer: Clock + Delay {}

impl<T: Clock + Delay> Timer for T {}
