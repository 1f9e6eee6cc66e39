//! Trait definitions for hardware abstraction and display feedback.
//!
//! This module defines the seams that allow the controller to:
//! - Run on a microcontroller or on a desktop with mocks
//! - Block for step and flash timing without a real wall clock in tests
//! - Report to whatever display is attached
//!
//! # Submodules
//!
//! - `hardware`: Coil and lamp outputs, clock, delay
//! - `display`: Status display collaborator
//!
//! # Hardware Abstraction
//!
//! - [`CoilDriver`]: Four-coil stepper output
//! - [`SignalLamps`]: Red/yellow/green lamp output
//! - [`Clock`]: Monotonic time source
//! - [`Delay`]: Blocking delay
//! - [`Timer`]: Anything that is both a [`Clock`] and a [`Delay`]

pub mod display;
pub mod hardware;

pub use display::*;
pub use hardware::*;
