//! Hardware Abstraction Layer implementations.
//!
//! This module contains concrete implementations of the traits
//! defined in [`crate::traits`] for various platforms.
//!
//! # Available Implementations
//!
//! - `mock`: Test implementations for desktop development
//! - `gpio`: `embedded-hal` 1.0 pin and delay adapters (requires `gpio` feature)
//! - `system`: Wall clock and log-backed display (requires `std` feature)

pub mod mock;

#[cfg(feature = "gpio")]
pub mod gpio;

#[cfg(feature = "std")]
pub mod system;

pub use mock::*;

#[cfg(feature = "gpio")]
pub use gpio::*;

#[cfg(feature = "std")]
pub use system::*;
