//! Error types for command parsing and controller operations.
//!
//! No error here is fatal. The operation that detects one aborts before
//! touching motor or signal state, reports it to the display, and the
//! scheduler carries on with its next iteration.

use crate::config::{MAX_STEP_COUNT, MAX_STEP_DELAY_MS, MIN_STEP_DELAY_MS, MIN_TIMING_MS};

/// Maximum characters of offending input kept in [`ControlError::UnknownCommand`].
pub const MAX_ECHO_LEN: usize = 32;

/// Truncated copy of the input that could not be resolved.
pub type EchoString = heapless::String<MAX_ECHO_LEN>;

/// Why an argument was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvalidArgument {
    /// Step count outside `1..=MAX_STEP_COUNT`.
    #[error("invalid step count {0} (expected 1..={max})", max = MAX_STEP_COUNT)]
    StepCount(i64),

    /// Step delay outside the accepted speed range.
    #[error("speed must be between {min} and {max}, got {0}", min = MIN_STEP_DELAY_MS, max = MAX_STEP_DELAY_MS)]
    Speed(i64),

    /// At least one signal duration below the minimum.
    #[error("all timing values must be at least {}ms", MIN_TIMING_MS)]
    TimingTooShort,

    /// Timing text is not a `red,yellow,green` triple.
    #[error("invalid timing format, use: timing5000,2000,4000")]
    TimingFormat,

    /// A numeric argument was expected.
    #[error("expected a number")]
    NotANumber,

    /// The command takes no argument but one was given.
    #[error("command takes no argument")]
    UnexpectedArgument,
}

/// Error returned by the dispatcher.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ControlError {
    /// The command was recognised but its argument was refused.
    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgument),

    /// No command matches the input.
    #[error("unknown command: {0}")]
    UnknownCommand(EchoString),
}

impl ControlError {
    /// Build an [`UnknownCommand`](Self::UnknownCommand), truncating long input.
    pub fn unknown(input: &str) -> Self {
        let mut echo = EchoString::new();
        for c in input.chars() {
            if echo.push(c).is_err() {
                break;
            }
        }
        ControlError::UnknownCommand(echo)
    }

    /// Short label for the display's error line.
    pub const fn label(&self) -> &'static str {
        match self {
            ControlError::InvalidArgument(arg) => arg.label(),
            ControlError::UnknownCommand(_) => "Unknown cmd",
        }
    }
}

impl InvalidArgument {
    /// Short label for the display's error line.
    pub const fn label(&self) -> &'static str {
        match self {
            InvalidArgument::StepCount(_) => "Invalid steps",
            InvalidArgument::Speed(_) => "Invalid speed",
            InvalidArgument::TimingTooShort | InvalidArgument::TimingFormat => "Invalid timing",
            InvalidArgument::NotANumber => "Not a number",
            InvalidArgument::UnexpectedArgument => "Extra argument",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn unknown_truncates_long_input() {
        let long = "x".repeat(100);
        match ControlError::unknown(&long) {
            ControlError::UnknownCommand(echo) => assert_eq!(echo.len(), MAX_ECHO_LEN),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn messages_name_the_limits() {
        assert_eq!(
            InvalidArgument::Speed(25).to_string(),
            "speed must be between 1 and 20, got 25"
        );
        assert_eq!(
            InvalidArgument::StepCount(0).to_string(),
            "invalid step count 0 (expected 1..=100000)"
        );
        assert_eq!(
            InvalidArgument::TimingTooShort.to_string(),
            "all timing values must be at least 1000ms"
        );
        assert_eq!(
            ControlError::unknown("xyz").to_string(),
            "unknown command: xyz"
        );
    }

    #[test]
    fn labels() {
        assert_eq!(ControlError::from(InvalidArgument::StepCount(0)).label(), "Invalid steps");
        assert_eq!(ControlError::from(InvalidArgument::TimingFormat).label(), "Invalid timing");
        assert_eq!(ControlError::unknown("q").label(), "Unknown cmd");
    }
}
