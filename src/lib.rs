//! # stepper-signal
//!
//! A stepper motor and three-color traffic signal controller driven by
//! line-oriented text commands.
//!
//! ## Features
//!
//! - **Half-step motor control**: 8-phase coil sequencing for 4-coil unipolar motors
//! - **Timed signal cycle**: RED → GREEN → YELLOW with per-phase durations
//! - **Manual overrides**: Single colors, raw lamp patterns, blocking flash effects
//! - **Text commands**: `f100`, `r50`, `s5`, `traffic`, `timing5000,2000,4000`, ...
//! - **Composite show**: The `loop` sequence steps the motor while circulating the lamps
//!
//! ## Architecture
//!
//! The crate is structured to allow testing on desktop without hardware:
//!
//! - `traits` - Coil, lamp, clock, delay and display abstractions
//! - `sequencer` - The half-step coil table and phase arithmetic
//! - `motor` / `signal` - The two device controllers
//! - `commands` - Text parsing into typed commands, and command outcomes
//! - `controller` - Dispatcher that ties motor, signal and display together
//! - `scheduler` - The cooperative main loop
//! - `hal` - Concrete implementations (mocks, `embedded-hal` pins, `std` clock)
//!
//! Everything runs on one thread. Blocking commands (moves, flashes, the
//! loop sequence) hold the scheduler until they finish, and the signal
//! cycle is only advanced between commands.
//!
//! ## Example
//!
//! ```rust
//! use stepper_signal::{Controller, SignalColor};
//! use stepper_signal::config::ControllerConfig;
//! use stepper_signal::hal::{MockClock, MockCoils, MockDisplay, MockLamps};
//! use stepper_signal::traits::Clock;
//!
//! let mut controller = Controller::new(
//!     MockCoils::new(),
//!     MockLamps::new(),
//!     MockDisplay::new(),
//!     ControllerConfig::default(),
//! );
//! let mut clock = MockClock::new();
//!
//! // Move, then start the signal cycle
//! controller.execute("f100", &mut clock).unwrap();
//! controller.execute("traffic", &mut clock).unwrap();
//!
//! // Poll in your main loop
//! let transition = controller.poll_signal(clock.now_ms() + 10_000);
//! assert_eq!(transition.map(|t| t.to), Some(SignalColor::Green));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

/// Lamp circulation used by the loop sequence.
pub mod circulation;
/// Command parsing, help table and command outcomes.
pub mod commands;
/// Constants and builder-style configuration.
pub mod config;
/// Dispatcher that coordinates the motor, the signal and the display.
pub mod controller;
/// Error types for rejected commands.
pub mod error;
/// Hardware abstraction layer with mock implementations for testing.
pub mod hal;
/// Line assembly and the command input seam.
pub mod input;
/// Stepper motor controller.
pub mod motor;
/// Cooperative main loop.
pub mod scheduler;
/// Half-step coil sequencing.
pub mod sequencer;
/// Traffic signal controller.
pub mod signal;
/// Core traits for hardware abstraction and display feedback.
pub mod traits;

// Re-exports for convenience
pub use circulation::LightCirculation;
pub use commands::{Command, CommandGroup, CommandHelp, Outcome, HELP};
pub use controller::{Controller, SystemStatus};
pub use error::{ControlError, InvalidArgument};
pub use input::{CommandInput, CommandLine, LineAssembler};
pub use motor::{MotorController, MotorState};
pub use scheduler::{Scheduler, TickReport};
pub use sequencer::{StepSequencer, PHASE_TABLE};
pub use signal::{FlashPattern, SignalColor, SignalController, SignalState, SignalTiming, Transition};
pub use traits::{
    // Hardware
    Clock,
    CoilDriver,
    CoilPattern,
    Delay,
    Direction,
    LampState,
    SignalLamps,
    Timer,
    // Display
    LoopProgress,
    StatusDisplay,
};

// Config re-exports
pub use config::{ControllerConfig, LoopConfig, MotorConfig, SignalConfig};
