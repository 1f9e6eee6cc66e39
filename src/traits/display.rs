//! Display abstraction for controller status.
//!
//! The display is an external collaborator. The controller only decides
//! *when* to call it; rendering belongs to the implementor. Calls are
//! synchronous and may block for a bounded time (an LCD that holds an
//! error message for two seconds, for example), which counts against the
//! blocking budget of whatever command triggered them.

use crate::signal::SignalColor;
use crate::SystemStatus;

/// Progress snapshot of the `loop` show sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoopProgress {
    /// Lamp currently lit by the circulation.
    pub color: SignalColor,
    /// Steps already taken.
    pub step: u32,
    /// Steps the sequence will take in total.
    pub total: u32,
}

impl LoopProgress {
    /// Completion in tenths of a percent (0..=1000).
    pub fn permille(&self) -> u32 {
        if self.total == 0 {
            return 1000;
        }
        ((self.step as u64 * 1000) / self.total as u64) as u32
    }
}

/// Display trait for controller feedback.
///
/// # Example
///
/// ```ignore
/// use stepper_signal::traits::StatusDisplay;
/// use stepper_signal::SystemStatus;
///
/// struct MyLcd { /* ... */ }
///
/// impl StatusDisplay for MyLcd {
///     type Error = ();
///
///     fn show_status(&mut self, status: &SystemStatus) -> Result<(), ()> { Ok(()) }
///     fn show_command(&mut self, text: &str) -> Result<(), ()> { Ok(()) }
///     fn show_error(&mut self, text: &str) -> Result<(), ()> { Ok(()) }
/// }
/// ```
pub trait StatusDisplay {
    /// Error type for display operations.
    type Error: core::fmt::Debug;

    /// Renders the motor and signal summary.
    ///
    /// Called after signal transitions and commands while automatic
    /// updates are enabled.
    fn show_status(&mut self, status: &SystemStatus) -> Result<(), Self::Error>;

    /// Echoes an accepted command (`FWD 100`, `SPD 5`, `STOP`, ...).
    fn show_command(&mut self, text: &str) -> Result<(), Self::Error>;

    /// Shows a short diagnostic for a rejected command.
    fn show_error(&mut self, text: &str) -> Result<(), Self::Error>;

    /// Shows a signal event label (`STARTED`, `FLASHING`, `EMRG DONE`, ...).
    ///
    /// Defaults to [`show_command`](Self::show_command).
    fn show_signal(&mut self, label: &str) -> Result<(), Self::Error> {
        self.show_command(label)
    }

    /// Redraws loop sequence progress. Defaults to doing nothing.
    fn show_loop_progress(&mut self, _progress: &LoopProgress) -> Result<(), Self::Error> {
        Ok(())
    }
}
