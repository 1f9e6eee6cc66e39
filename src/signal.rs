//! Traffic signal controller.
//!
//! [`SignalController`] runs a timed RED → GREEN → YELLOW → RED cycle and
//! offers manual overrides and blocking flash effects.
//!
//! # Polling and latency
//!
//! The cycle only moves when [`SignalController::advance_cycle`] is called,
//! so it has to be polled every scheduler iteration. While another
//! operation blocks (a long move, a flash, the loop sequence) nobody polls,
//! and the current phase stays lit for up to the length of that block past
//! its configured duration. The phase timer restarts from the poll that
//! performed the transition, so the delay is absorbed rather than caught up
//! and no phase is ever skipped. [`Transition::overdue_ms`] reports how late
//! each transition was.
//!
//! # Example
//!
//! ```rust
//! use stepper_signal::{SignalController, SignalColor};
//! use stepper_signal::config::SignalConfig;
//! use stepper_signal::hal::MockLamps;
//!
//! let mut signal = SignalController::new(MockLamps::new(), &SignalConfig::default());
//! signal.toggle_cycle(0);
//! assert_eq!(signal.state().phase, SignalColor::Red);
//!
//! let t = signal.advance_cycle(10_000).unwrap();
//! assert_eq!(t.to, SignalColor::Green);
//! ```

use core::fmt;

use crate::config::{
    SignalConfig, DEFAULT_GREEN_MS, DEFAULT_RED_MS, DEFAULT_YELLOW_MS, MIN_TIMING_MS,
};
use crate::error::InvalidArgument;
use crate::traits::{Delay, LampState, SignalLamps};

// ============================================================================
// Colors and Timing
// ============================================================================

/// One of the three signal lamps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SignalColor {
    /// Stop.
    #[default]
    Red,
    /// Prepare to stop.
    Yellow,
    /// Go.
    Green,
}

impl SignalColor {
    /// Uppercase name as printed on the serial line.
    pub const fn as_str(&self) -> &'static str {
        match self {
            SignalColor::Red => "RED",
            SignalColor::Yellow => "YELLOW",
            SignalColor::Green => "GREEN",
        }
    }

    /// Next phase of the automatic cycle: RED → GREEN → YELLOW → RED.
    pub const fn next_in_cycle(self) -> Self {
        match self {
            SignalColor::Red => SignalColor::Green,
            SignalColor::Green => SignalColor::Yellow,
            SignalColor::Yellow => SignalColor::Red,
        }
    }

    /// Next lamp of the loop circulation: RED → YELLOW → GREEN → RED.
    pub const fn next_in_circulation(self) -> Self {
        match self {
            SignalColor::Red => SignalColor::Yellow,
            SignalColor::Yellow => SignalColor::Green,
            SignalColor::Green => SignalColor::Red,
        }
    }

    /// Lamp state with only this color lit.
    pub const fn lamps(self) -> LampState {
        match self {
            SignalColor::Red => LampState::new(true, false, false),
            SignalColor::Yellow => LampState::new(false, true, false),
            SignalColor::Green => LampState::new(false, false, true),
        }
    }
}

impl fmt::Display for SignalColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-phase durations of the automatic cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignalTiming {
    /// Red duration in milliseconds.
    pub red_ms: u64,
    /// Yellow duration in milliseconds.
    pub yellow_ms: u64,
    /// Green duration in milliseconds.
    pub green_ms: u64,
}

impl Default for SignalTiming {
    fn default() -> Self {
        Self::new(DEFAULT_RED_MS, DEFAULT_YELLOW_MS, DEFAULT_GREEN_MS)
    }
}

impl SignalTiming {
    /// Timing from red, yellow, green durations. Not validated.
    pub const fn new(red_ms: u64, yellow_ms: u64, green_ms: u64) -> Self {
        Self {
            red_ms,
            yellow_ms,
            green_ms,
        }
    }

    /// Duration of `color`.
    pub const fn duration_ms(&self, color: SignalColor) -> u64 {
        match color {
            SignalColor::Red => self.red_ms,
            SignalColor::Yellow => self.yellow_ms,
            SignalColor::Green => self.green_ms,
        }
    }

    /// Check every duration against [`MIN_TIMING_MS`].
    pub fn validate(&self) -> Result<(), InvalidArgument> {
        if self.red_ms >= MIN_TIMING_MS
            && self.yellow_ms >= MIN_TIMING_MS
            && self.green_ms >= MIN_TIMING_MS
        {
            Ok(())
        } else {
            Err(InvalidArgument::TimingTooShort)
        }
    }

    /// Parse a `red,yellow,green` triple such as `5000,2000,4000`.
    ///
    /// Only the shape is checked here; range checks happen in
    /// [`SignalController::set_timing`]. Fields after the third are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use stepper_signal::SignalTiming;
    ///
    /// assert_eq!(SignalTiming::parse("5000,2000,4000"), Ok(SignalTiming::new(5000, 2000, 4000)));
    /// assert!(SignalTiming::parse("5000,2000").is_err());
    /// assert!(SignalTiming::parse(",2000,4000").is_err());
    /// assert_eq!(SignalTiming::parse("5000,2000,4000,1"), Ok(SignalTiming::new(5000, 2000, 4000)));
    /// ```
    pub fn parse(text: &str) -> Result<Self, InvalidArgument> {
        let mut fields = text.split(',');
        let (Some(red), Some(yellow), Some(green)) = (fields.next(), fields.next(), fields.next())
        else {
            return Err(InvalidArgument::TimingFormat);
        };

        let field = |s: &str| {
            s.trim()
                .parse::<u64>()
                .map_err(|_| InvalidArgument::TimingFormat)
        };

        Ok(Self::new(field(red)?, field(yellow)?, field(green)?))
    }
}

impl fmt::Display for SignalTiming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RED: {}s, YELLOW: {}s, GREEN: {}s",
            self.red_ms / 1000,
            self.yellow_ms / 1000,
            self.green_ms / 1000
        )
    }
}

/// A blocking on/off lamp pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlashPattern {
    /// Number of on/off cycles.
    pub cycles: u32,
    /// Time lit per cycle.
    pub on_ms: u32,
    /// Time dark per cycle.
    pub off_ms: u32,
}

impl FlashPattern {
    /// Pattern with the given cycle count and half-periods.
    pub const fn new(cycles: u32, on_ms: u32, off_ms: u32) -> Self {
        Self {
            cycles,
            on_ms,
            off_ms,
        }
    }

    /// Total blocking time of the pattern.
    pub const fn duration_ms(&self) -> u64 {
        self.cycles as u64 * (self.on_ms as u64 + self.off_ms as u64)
    }
}

// ============================================================================
// Controller
// ============================================================================

/// Snapshot of the signal for status and display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignalState {
    /// Automatic cycle enabled.
    pub is_running: bool,
    /// Time the current phase started.
    pub cycle_start_ms: u64,
    /// Current phase of the automatic cycle.
    pub phase: SignalColor,
    /// Lamps as last driven.
    pub lamps: LampState,
    /// Phase durations.
    pub timing: SignalTiming,
}

/// A phase change performed by [`SignalController::advance_cycle`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transition {
    /// Phase that ended.
    pub from: SignalColor,
    /// Phase that began.
    pub to: SignalColor,
    /// How long the ended phase overran its configured duration.
    pub overdue_ms: u64,
}

/// Traffic signal controller.
///
/// # Type Parameter
///
/// - `L`: The lamp output implementation ([`SignalLamps`] trait)
pub struct SignalController<L: SignalLamps> {
    lamps: L,
    lit: LampState,
    is_running: bool,
    cycle_start_ms: u64,
    phase: SignalColor,
    timing: SignalTiming,
}

impl<L: SignalLamps> SignalController<L> {
    /// Create a stopped controller with every lamp dark.
    pub fn new(lamps: L, config: &SignalConfig) -> Self {
        let mut signal = Self {
            lamps,
            lit: LampState::OFF,
            is_running: false,
            cycle_start_ms: 0,
            phase: SignalColor::Red,
            timing: config.timing,
        };
        signal.drive(LampState::OFF);
        signal
    }

    fn drive(&mut self, lamps: LampState) {
        self.lit = lamps;
        self.lamps.set_lamps(lamps);
    }

    /// Poll the automatic cycle.
    ///
    /// Does nothing unless the cycle is running. When the current phase has
    /// been lit for at least its duration, moves to the next phase, lights
    /// only that lamp, and restarts the phase timer at `now_ms`. At most one
    /// transition happens per call.
    pub fn advance_cycle(&mut self, now_ms: u64) -> Option<Transition> {
        if !self.is_running {
            return None;
        }

        let elapsed = now_ms.saturating_sub(self.cycle_start_ms);
        let duration = self.timing.duration_ms(self.phase);
        if elapsed < duration {
            return None;
        }

        let from = self.phase;
        let to = from.next_in_cycle();
        self.phase = to;
        self.drive(to.lamps());
        self.cycle_start_ms = now_ms;

        log::info!("Traffic: {} -> {}", from, to);
        Some(Transition {
            from,
            to,
            overdue_ms: elapsed - duration,
        })
    }

    /// Light exactly one lamp. Stops the automatic cycle.
    pub fn set_color(&mut self, color: SignalColor) {
        self.is_running = false;
        self.drive(color.lamps());
    }

    /// Drive the lamps directly. Stops the automatic cycle.
    pub fn set_raw(&mut self, red: bool, yellow: bool, green: bool) {
        self.is_running = false;
        self.drive(LampState::new(red, yellow, green));
    }

    /// Start or stop the automatic cycle; returns whether it now runs.
    ///
    /// Starting always begins at RED with the phase timer at `now_ms`.
    /// Stopping turns every lamp off.
    pub fn toggle_cycle(&mut self, now_ms: u64) -> bool {
        self.is_running = !self.is_running;

        if self.is_running {
            self.phase = SignalColor::Red;
            self.cycle_start_ms = now_ms;
            self.drive(SignalColor::Red.lamps());
            log::info!("Traffic light cycle STARTED");
        } else {
            self.drive(LampState::OFF);
            log::info!("Traffic light cycle STOPPED");
        }

        self.is_running
    }

    /// Blink every lamp. Stops the automatic cycle and blocks for
    /// [`FlashPattern::duration_ms`].
    pub fn flash<D: Delay>(&mut self, pattern: &FlashPattern, delay: &mut D) {
        log::info!("Flashing all traffic lights");
        self.blink(LampState::ALL, pattern, delay);
        log::info!("Flash complete");
    }

    /// Blink the red lamp only. Stops the automatic cycle and blocks for
    /// [`FlashPattern::duration_ms`].
    pub fn emergency_flash<D: Delay>(&mut self, pattern: &FlashPattern, delay: &mut D) {
        log::info!("Emergency flashing RED");
        self.blink(SignalColor::Red.lamps(), pattern, delay);
        log::info!("Emergency flash complete");
    }

    fn blink<D: Delay>(&mut self, on: LampState, pattern: &FlashPattern, delay: &mut D) {
        self.is_running = false;
        for _ in 0..pattern.cycles {
            self.drive(on);
            delay.delay_ms(pattern.on_ms);
            self.drive(LampState::OFF);
            delay.delay_ms(pattern.off_ms);
        }
    }

    /// Replace all three durations at once.
    ///
    /// All-or-nothing: if any value is below [`MIN_TIMING_MS`] nothing
    /// changes.
    pub fn set_timing(&mut self, red_ms: u64, yellow_ms: u64, green_ms: u64) -> Result<SignalTiming, InvalidArgument> {
        let timing = SignalTiming::new(red_ms, yellow_ms, green_ms);
        timing.validate()?;
        self.timing = timing;
        log::info!("Traffic timing updated: {}", timing);
        Ok(timing)
    }

    /// Parse a `red,yellow,green` triple and apply it.
    pub fn parse_timing(&mut self, text: &str) -> Result<SignalTiming, InvalidArgument> {
        let timing = SignalTiming::parse(text)?;
        self.set_timing(timing.red_ms, timing.yellow_ms, timing.green_ms)
    }

    /// Current state snapshot.
    pub fn state(&self) -> SignalState {
        SignalState {
            is_running: self.is_running,
            cycle_start_ms: self.cycle_start_ms,
            phase: self.phase,
            lamps: self.lit,
            timing: self.timing,
        }
    }

    /// Whether the automatic cycle is running.
    pub fn is_running(&self) -> bool {
        self.is_running
    }

    /// Current phase durations.
    pub fn timing(&self) -> SignalTiming {
        self.timing
    }

    /// Time left in the current phase, if the cycle runs.
    pub fn remaining_ms(&self, now_ms: u64) -> Option<u64> {
        if !self.is_running {
            return None;
        }
        let elapsed = now_ms.saturating_sub(self.cycle_start_ms);
        Some(self.timing.duration_ms(self.phase).saturating_sub(elapsed))
    }

    /// Borrow the lamp driver (mostly for tests).
    pub fn lamps(&self) -> &L {
        &self.lamps
    }
}
