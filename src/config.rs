//! Controller constants and builder-style configuration.
//!
//! Every tunable of the controller lives here. Defaults match
//! the values the controller shipped with; nothing is persisted, so a restart
//! always comes back to [`ControllerConfig::default`].
//!
//! # Example
//!
//! ```rust
//! use stepper_signal::config::{ControllerConfig, LoopConfig, MotorConfig, SignalConfig};
//! use stepper_signal::SignalTiming;
//!
//! // Use defaults
//! let config = ControllerConfig::default();
//! assert_eq!(config.motor.step_delay_ms, 2);
//!
//! // Or customize
//! let config = ControllerConfig::default()
//!     .with_motor(MotorConfig::default().with_step_delay_ms(5))
//!     .with_signal(SignalConfig::default().with_timing(SignalTiming::new(5000, 2000, 4000)))
//!     .with_loop(LoopConfig::default().with_steps(200));
//! ```

use crate::signal::{FlashPattern, SignalTiming};

// ============================================================================
// Motor Limits
// ============================================================================

/// Number of rows in the half-step coil table.
pub const PHASE_COUNT: usize = 8;

/// Shortest accepted delay between steps (fastest speed).
pub const MIN_STEP_DELAY_MS: u32 = 1;

/// Longest accepted delay between steps (slowest speed).
pub const MAX_STEP_DELAY_MS: u32 = 20;

/// Step delay applied at startup.
pub const DEFAULT_STEP_DELAY_MS: u32 = 2;

/// Upper bound for a single move command.
pub const MAX_STEP_COUNT: i64 = 100_000;

/// Steps per direction in the demo choreography.
pub const DEMO_STEPS: u32 = 512;

/// Pause between the two halves of the demo.
pub const DEMO_PAUSE_MS: u32 = 1000;

// ============================================================================
// Signal Limits
// ============================================================================

/// Shortest accepted duration for any signal phase.
pub const MIN_TIMING_MS: u64 = 1000;

/// Default red phase duration.
pub const DEFAULT_RED_MS: u64 = 10_000;

/// Default yellow phase duration.
pub const DEFAULT_YELLOW_MS: u64 = 1500;

/// Default green phase duration.
pub const DEFAULT_GREEN_MS: u64 = 10_000;

/// On/off cycles for the all-lamps flash.
pub const FLASH_CYCLES: u32 = 6;

/// Half-period of the all-lamps flash.
pub const FLASH_DELAY_MS: u32 = 300;

/// On/off cycles for the red emergency flash.
pub const EMERGENCY_FLASH_CYCLES: u32 = 10;

/// Half-period of the red emergency flash.
pub const EMERGENCY_FLASH_DELAY_MS: u32 = 500;

// ============================================================================
// Loop Sequence
// ============================================================================

/// Steps taken by the `loop` show sequence.
pub const LOOP_SEQUENCE_STEPS: u32 = 10_000;

/// Interval between lamp changes while the loop sequence runs.
pub const LIGHT_CIRCULATION_MS: u64 = 1000;

/// How long `LOOP START` stays on the display before motion begins.
pub const LOOP_START_HOLD_MS: u32 = 2000;

/// How long the completion message is held after the loop finishes.
pub const LOOP_FINISH_HOLD_MS: u32 = 30_000;

/// Loop progress is redrawn at least this often (in steps).
pub const LOOP_PROGRESS_EVERY: u32 = 500;

// ============================================================================
// Main Config
// ============================================================================

/// Complete controller configuration
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControllerConfig {
    /// Motor defaults and demo choreography
    pub motor: MotorConfig,
    /// Signal timing and flash patterns
    pub signal: SignalConfig,
    /// Parameters of the `loop` show sequence
    pub loop_sequence: LoopConfig,
}

impl ControllerConfig {
    /// Set motor configuration
    pub fn with_motor(mut self, motor: MotorConfig) -> Self {
        self.motor = motor;
        self
    }

    /// Set signal configuration
    pub fn with_signal(mut self, signal: SignalConfig) -> Self {
        self.signal = signal;
        self
    }

    /// Set loop sequence configuration
    pub fn with_loop(mut self, loop_sequence: LoopConfig) -> Self {
        self.loop_sequence = loop_sequence;
        self
    }
}

// ============================================================================
// Motor Config
// ============================================================================

/// Motor configuration
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotorConfig {
    /// Step delay at startup, clamped into the accepted range
    pub step_delay_ms: u32,
    /// Steps per direction in the demo
    pub demo_steps: u32,
    /// Pause between demo halves
    pub demo_pause_ms: u32,
}

impl Default for MotorConfig {
    fn default() -> Self {
        Self {
            step_delay_ms: DEFAULT_STEP_DELAY_MS,
            demo_steps: DEMO_STEPS,
            demo_pause_ms: DEMO_PAUSE_MS,
        }
    }
}

impl MotorConfig {
    /// Set the startup step delay
    pub fn with_step_delay_ms(mut self, ms: u32) -> Self {
        self.step_delay_ms = ms.clamp(MIN_STEP_DELAY_MS, MAX_STEP_DELAY_MS);
        self
    }

    /// Set the demo step count
    pub fn with_demo_steps(mut self, steps: u32) -> Self {
        self.demo_steps = steps;
        self
    }

    /// Set the demo pause
    pub fn with_demo_pause_ms(mut self, ms: u32) -> Self {
        self.demo_pause_ms = ms;
        self
    }
}

// ============================================================================
// Signal Config
// ============================================================================

/// Signal light configuration
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignalConfig {
    /// Phase durations at startup
    pub timing: SignalTiming,
    /// Pattern used by the `flash` command
    pub flash: FlashPattern,
    /// Pattern used by the `emergency` command
    pub emergency: FlashPattern,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            timing: SignalTiming::default(),
            flash: FlashPattern::new(FLASH_CYCLES, FLASH_DELAY_MS, FLASH_DELAY_MS),
            emergency: FlashPattern::new(
                EMERGENCY_FLASH_CYCLES,
                EMERGENCY_FLASH_DELAY_MS,
                EMERGENCY_FLASH_DELAY_MS,
            ),
        }
    }
}

impl SignalConfig {
    /// Set the startup timing
    ///
    /// Values below [`MIN_TIMING_MS`] are raised to the minimum.
    pub fn with_timing(mut self, timing: SignalTiming) -> Self {
        self.timing = SignalTiming::new(
            timing.red_ms.max(MIN_TIMING_MS),
            timing.yellow_ms.max(MIN_TIMING_MS),
            timing.green_ms.max(MIN_TIMING_MS),
        );
        self
    }

    /// Set the flash pattern
    pub fn with_flash(mut self, flash: FlashPattern) -> Self {
        self.flash = flash;
        self
    }

    /// Set the emergency flash pattern
    pub fn with_emergency(mut self, emergency: FlashPattern) -> Self {
        self.emergency = emergency;
        self
    }
}

// ============================================================================
// Loop Config
// ============================================================================

/// Configuration of the `loop` show sequence
///
/// The circulation interval is independent of
/// [`SignalConfig::timing`]: the loop runs its own lamp rotation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoopConfig {
    /// Clockwise steps to take
    pub steps: u32,
    /// Interval between lamp changes
    pub circulation_ms: u64,
    /// Hold time for `LOOP START` before motion
    pub start_hold_ms: u32,
    /// Hold time for the completion message
    pub finish_hold_ms: u32,
    /// Redraw progress at least every this many steps (0 = only on color change)
    pub progress_every: u32,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            steps: LOOP_SEQUENCE_STEPS,
            circulation_ms: LIGHT_CIRCULATION_MS,
            start_hold_ms: LOOP_START_HOLD_MS,
            finish_hold_ms: LOOP_FINISH_HOLD_MS,
            progress_every: LOOP_PROGRESS_EVERY,
        }
    }
}

impl LoopConfig {
    /// Set the step count
    pub fn with_steps(mut self, steps: u32) -> Self {
        self.steps = steps;
        self
    }

    /// Set the circulation interval
    pub fn with_circulation_ms(mut self, ms: u64) -> Self {
        self.circulation_ms = ms;
        self
    }

    /// Set both display hold times
    pub fn with_holds(mut self, start_ms: u32, finish_ms: u32) -> Self {
        self.start_hold_ms = start_ms;
        self.finish_hold_ms = finish_ms;
        self
    }

    /// Set the progress redraw interval
    pub fn with_progress_every(mut self, steps: u32) -> Self {
        self.progress_every = steps;
        self
    }
}
