//! Serial command language.
//!
//! A command line is a lowercase token optionally followed by an argument
//! with no separator: `f100`, `s5`, `timing5000,2000,4000`, `traffic`.
//! [`Command::parse`] is pure: it turns a line into a [`Command`] value and
//! touches no state. The [`Controller`] then runs it through one exhaustive
//! `match`.
//!
//! # Token resolution
//!
//! The line is split into its leading run of letters (the token) and the
//! rest (the argument), and the token must match a command name exactly.
//! Because of that `stop` is never read as `s` + `top`, nor `flash` as
//! `f` + `lash`, regardless of the order of [`HELP`].
//!
//! ```rust
//! use stepper_signal::{Command, Direction, SignalColor};
//!
//! assert_eq!(
//!     Command::parse("f100"),
//!     Ok(Command::Move { direction: Direction::Clockwise, steps: 100 })
//! );
//! assert_eq!(Command::parse("  STOP "), Ok(Command::Stop));
//! assert_eq!(Command::parse("red"), Ok(Command::SetColor(SignalColor::Red)));
//! assert!(Command::parse("xyz").is_err());
//! ```
//!
//! Range checks (step count, speed, timing minimum) are not the parser's
//! job; they happen in the motor and signal controllers so that calling
//! those directly is just as safe.
//!
//! [`Controller`]: crate::Controller

use core::fmt;

use crate::error::{ControlError, InvalidArgument};
use crate::signal::{SignalColor, SignalTiming};
use crate::traits::Direction;

// ============================================================================
// Commands
// ============================================================================

/// A parsed serial command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// `f<n>` / `r<n>`: move `steps` in `direction` (blocking).
    Move {
        /// Direction of travel.
        direction: Direction,
        /// Requested step count, validated at dispatch.
        steps: i64,
    },
    /// `s<n>`: set the step delay in milliseconds.
    SetSpeed(i64),
    /// `stop`: de-energize the coils.
    Stop,
    /// `demo`: run the motor demonstration (blocking).
    Demo,
    /// `traffic`: start or stop the automatic cycle.
    ToggleCycle,
    /// `red` / `yellow` / `green`: light one lamp.
    SetColor(SignalColor),
    /// `alloff`: every lamp dark.
    AllOff,
    /// `allon`: every lamp lit.
    AllOn,
    /// `flash`: blink every lamp (blocking).
    Flash,
    /// `emergency`: blink red (blocking).
    Emergency,
    /// `timing<r>,<y>,<g>`: replace the phase durations.
    SetTiming(SignalTiming),
    /// `loop`: long move with circulating lamps (blocking).
    Loop,
    /// `help`: list commands.
    Help,
}

impl Command {
    /// Parse one command line.
    ///
    /// Input is trimmed and matched case-insensitively.
    pub fn parse(input: &str) -> Result<Self, ControlError> {
        let line = input.trim();
        let split = line
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(line.len());
        let (token, arg) = line.split_at(split);
        let arg = arg.trim();

        let is = |name: &str| token.eq_ignore_ascii_case(name);

        let command = if is("f") {
            Command::Move {
                direction: Direction::Clockwise,
                steps: number(arg)?,
            }
        } else if is("r") {
            Command::Move {
                direction: Direction::CounterClockwise,
                steps: number(arg)?,
            }
        } else if is("s") {
            Command::SetSpeed(number(arg)?)
        } else if is("timing") {
            Command::SetTiming(SignalTiming::parse(arg)?)
        } else {
            let command = match_bare(token).ok_or_else(|| ControlError::unknown(line))?;
            if !arg.is_empty() {
                return Err(InvalidArgument::UnexpectedArgument.into());
            }
            command
        };

        Ok(command)
    }

    /// Whether the command occupies the loop for a noticeable time.
    pub const fn is_blocking(&self) -> bool {
        matches!(
            self,
            Command::Move { .. } | Command::Demo | Command::Flash | Command::Emergency | Command::Loop
        )
    }
}

fn match_bare(token: &str) -> Option<Command> {
    const BARE: [(&str, Command); 12] = [
        ("stop", Command::Stop),
        ("demo", Command::Demo),
        ("traffic", Command::ToggleCycle),
        ("red", Command::SetColor(SignalColor::Red)),
        ("yellow", Command::SetColor(SignalColor::Yellow)),
        ("green", Command::SetColor(SignalColor::Green)),
        ("alloff", Command::AllOff),
        ("allon", Command::AllOn),
        ("flash", Command::Flash),
        ("emergency", Command::Emergency),
        ("loop", Command::Loop),
        ("help", Command::Help),
    ];

    BARE.iter()
        .find(|(name, _)| token.eq_ignore_ascii_case(name))
        .map(|(_, command)| *command)
}

fn number(arg: &str) -> Result<i64, InvalidArgument> {
    arg.parse().map_err(|_| InvalidArgument::NotANumber)
}

// ============================================================================
// Help Table
// ============================================================================

/// Section of the help listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandGroup {
    /// Stepper motor commands.
    Motor,
    /// Signal light commands.
    Signal,
    /// Everything else.
    Other,
}

impl CommandGroup {
    /// Heading printed above the group.
    pub const fn heading(&self) -> &'static str {
        match self {
            CommandGroup::Motor => "=== MOTOR COMMANDS ===",
            CommandGroup::Signal => "=== TRAFFIC LIGHT COMMANDS ===",
            CommandGroup::Other => "=== OTHER COMMANDS ===",
        }
    }
}

/// One line of the help listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommandHelp {
    /// Command token.
    pub token: &'static str,
    /// Usage and description.
    pub usage: &'static str,
    /// Listing section.
    pub group: CommandGroup,
}

const fn help(token: &'static str, usage: &'static str, group: CommandGroup) -> CommandHelp {
    CommandHelp { token, usage, group }
}

/// Every command, in listing order.
pub const HELP: [CommandHelp; 16] = [
    help("f", "'f' + number - Move forward (e.g., f100)", CommandGroup::Motor),
    help("r", "'r' + number - Move reverse (e.g., r100)", CommandGroup::Motor),
    help("s", "'s' + number - Set speed (1-20, lower = faster)", CommandGroup::Motor),
    help("stop", "'stop' - Stop motor", CommandGroup::Motor),
    help("demo", "'demo' - Run motor demonstration", CommandGroup::Motor),
    help("traffic", "'traffic' - Start/Stop automatic traffic light cycle", CommandGroup::Signal),
    help("red", "'red' - Turn on RED light only", CommandGroup::Signal),
    help("yellow", "'yellow' - Turn on YELLOW light only", CommandGroup::Signal),
    help("green", "'green' - Turn on GREEN light only", CommandGroup::Signal),
    help("alloff", "'alloff' - Turn off all traffic lights", CommandGroup::Signal),
    help("allon", "'allon' - Turn on all traffic lights", CommandGroup::Signal),
    help("flash", "'flash' - Flash all lights", CommandGroup::Signal),
    help("emergency", "'emergency' - Emergency flashing red", CommandGroup::Signal),
    help("timing", "'timing' + r,y,g - Set timing (e.g., timing5000,2000,4000)", CommandGroup::Signal),
    help("loop", "'loop' - Long forward move with circulating lights", CommandGroup::Signal),
    help("help", "'help' - Show this help message", CommandGroup::Other),
];

// ============================================================================
// Outcomes
// ============================================================================

/// What a successfully dispatched command did.
///
/// `Display` renders the line printed back on the serial console.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Motor moved.
    Moved {
        /// Direction of travel.
        direction: Direction,
        /// Steps taken.
        steps: u32,
    },
    /// Step delay changed.
    SpeedSet(u32),
    /// Coils released.
    MotorStopped,
    /// Demo choreography finished.
    DemoComplete,
    /// Automatic cycle switched on or off.
    CycleToggled {
        /// Whether the cycle now runs.
        running: bool,
    },
    /// One lamp lit manually.
    ColorSet(SignalColor),
    /// Every lamp switched off.
    AllOff,
    /// Every lamp switched on.
    AllOn,
    /// All-lamp flash finished.
    Flashed,
    /// Red emergency flash finished.
    EmergencyFlashed,
    /// Phase durations replaced.
    TimingSet(SignalTiming),
    /// Loop sequence finished.
    LoopComplete {
        /// Steps taken.
        steps: u32,
        /// Wall time from start to finish, holds included.
        elapsed_ms: u64,
    },
    /// Help requested; carries the timing printed after the listing.
    Help(SignalTiming),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Moved { direction, steps } => {
                let dir = match direction {
                    Direction::Clockwise => "forward",
                    Direction::CounterClockwise => "reverse",
                };
                write!(f, "Moved {} {} steps", dir, steps)
            }
            Outcome::SpeedSet(ms) => write!(f, "Speed set to {}", ms),
            Outcome::MotorStopped => f.write_str("Motor stopped"),
            Outcome::DemoComplete => f.write_str("Motor demo complete!"),
            Outcome::CycleToggled { running: true } => f.write_str("Traffic light cycle STARTED"),
            Outcome::CycleToggled { running: false } => f.write_str("Traffic light cycle STOPPED"),
            Outcome::ColorSet(color) => write!(f, "{} light ON", color),
            Outcome::AllOff => f.write_str("All traffic lights OFF"),
            Outcome::AllOn => f.write_str("All traffic lights ON"),
            Outcome::Flashed => f.write_str("Flash complete"),
            Outcome::EmergencyFlashed => f.write_str("Emergency flash complete"),
            Outcome::TimingSet(timing) => write!(f, "Traffic timing updated: {}", timing),
            Outcome::LoopComplete { steps, elapsed_ms } => write!(
                f,
                "Loop sequence completed! {} steps, total time: {}.{:03} seconds",
                steps,
                elapsed_ms / 1000,
                elapsed_ms % 1000
            ),
            Outcome::Help(timing) => {
                f.write_str("=== STEPPER MOTOR AND TRAFFIC LIGHT CONTROLLER ===")?;
                for group in [CommandGroup::Motor, CommandGroup::Signal, CommandGroup::Other] {
                    write!(f, "\n{}", group.heading())?;
                    for entry in HELP.iter().filter(|h| h.group == group) {
                        write!(f, "\n{}", entry.usage)?;
                    }
                }
                write!(f, "\nTraffic timing: {}", timing)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Motor Commands
    // =========================================================================

    #[test]
    fn parse_forward_and_reverse() {
        assert_eq!(
            Command::parse("f100"),
            Ok(Command::Move {
                direction: Direction::Clockwise,
                steps: 100
            })
        );
        assert_eq!(
            Command::parse("r50"),
            Ok(Command::Move {
                direction: Direction::CounterClockwise,
                steps: 50
            })
        );
    }

    #[test]
    fn parse_keeps_out_of_range_values_for_dispatch() {
        assert_eq!(
            Command::parse("f-5"),
            Ok(Command::Move {
                direction: Direction::Clockwise,
                steps: -5
            })
        );
        assert_eq!(Command::parse("s25"), Ok(Command::SetSpeed(25)));
    }

    #[test]
    fn parse_motor_without_number() {
        assert_eq!(
            Command::parse("f"),
            Err(ControlError::InvalidArgument(InvalidArgument::NotANumber))
        );
        assert_eq!(
            Command::parse("s5x"),
            Err(ControlError::InvalidArgument(InvalidArgument::NotANumber))
        );
    }

    // =========================================================================
    // Token Resolution
    // =========================================================================

    #[test]
    fn long_tokens_are_not_shadowed_by_letters() {
        assert_eq!(Command::parse("stop"), Ok(Command::Stop));
        assert_eq!(Command::parse("flash"), Ok(Command::Flash));
        assert_eq!(Command::parse("red"), Ok(Command::SetColor(SignalColor::Red)));
        assert_eq!(Command::parse("s5"), Ok(Command::SetSpeed(5)));
    }

    #[test]
    fn parse_is_trimmed_and_case_insensitive() {
        assert_eq!(Command::parse("  Traffic\r\n"), Ok(Command::ToggleCycle));
        assert_eq!(Command::parse("ALLON"), Ok(Command::AllOn));
        assert_eq!(Command::parse("F20"), Command::parse("f20"));
    }

    #[test]
    fn parse_all_bare_commands() {
        for entry in HELP.iter() {
            if matches!(entry.token, "f" | "r" | "s" | "timing") {
                continue;
            }
            assert!(Command::parse(entry.token).is_ok(), "{}", entry.token);
        }
    }

    #[test]
    fn bare_command_rejects_argument() {
        assert_eq!(
            Command::parse("stop5"),
            Err(ControlError::InvalidArgument(InvalidArgument::UnexpectedArgument))
        );
    }

    #[test]
    fn unknown_token() {
        assert!(matches!(
            Command::parse("xyz"),
            Err(ControlError::UnknownCommand(_))
        ));
        assert!(matches!(
            Command::parse("stopp"),
            Err(ControlError::UnknownCommand(_))
        ));
        assert!(matches!(Command::parse(""), Err(ControlError::UnknownCommand(_))));
    }

    // =========================================================================
    // Timing
    // =========================================================================

    #[test]
    fn parse_timing_triple() {
        assert_eq!(
            Command::parse("timing5000,2000,4000"),
            Ok(Command::SetTiming(SignalTiming::new(5000, 2000, 4000)))
        );
    }

    #[test]
    fn parse_timing_pair_is_format_error() {
        assert_eq!(
            Command::parse("timing5000,2000"),
            Err(ControlError::InvalidArgument(InvalidArgument::TimingFormat))
        );
    }

    // =========================================================================
    // Outcome Display
    // =========================================================================

    #[test]
    fn outcome_lines() {
        let moved = Outcome::Moved {
            direction: Direction::CounterClockwise,
            steps: 7,
        };
        assert_eq!(format!("{}", moved), "Moved reverse 7 steps");
        assert_eq!(format!("{}", Outcome::ColorSet(SignalColor::Yellow)), "YELLOW light ON");
        assert_eq!(
            format!("{}", Outcome::LoopComplete { steps: 10, elapsed_ms: 12_345 }),
            "Loop sequence completed! 10 steps, total time: 12.345 seconds"
        );
    }

    #[test]
    fn help_lists_every_command_once() {
        let text = format!("{}", Outcome::Help(SignalTiming::default()));
        for entry in HELP.iter() {
            assert_eq!(text.matches(entry.usage).count(), 1, "{}", entry.token);
        }
        assert!(text.ends_with("Traffic timing: RED: 10s, YELLOW: 1s, GREEN: 10s"));
    }

    #[test]
    fn blocking_commands() {
        assert!(Command::Loop.is_blocking());
        assert!(Command::Flash.is_blocking());
        assert!(!Command::ToggleCycle.is_blocking());
        assert!(!Command::SetSpeed(3).is_blocking());
    }
}
