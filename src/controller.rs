//! Command dispatcher that ties the motor, the signal, and the display
//! together.
//!
//! This module provides [`Controller`], which owns the
//! [`MotorController`], the [`SignalController`], and the display
//! collaborator, and executes [`Command`]s against them.
//!
//! # Overview
//!
//! The controller:
//! - Resolves text lines into commands and runs them
//! - Reports accepted commands and errors to the display
//! - Polls the signal cycle on behalf of the scheduler
//! - Runs the composite `loop` sequence
//!
//! Every command runs to completion before `dispatch` returns. Blocking
//! commands take a [`Timer`] so they can wait (and, in the loop sequence,
//! keep their own time) without a real clock in tests.
//!
//! # Example
//!
//! ```rust
//! use stepper_signal::{Controller, Outcome};
//! use stepper_signal::config::ControllerConfig;
//! use stepper_signal::hal::{MockClock, MockCoils, MockDisplay, MockLamps};
//!
//! let mut controller = Controller::new(
//!     MockCoils::new(),
//!     MockLamps::new(),
//!     MockDisplay::new(),
//!     ControllerConfig::default(),
//! );
//! let mut clock = MockClock::new();
//!
//! assert_eq!(controller.execute("s5", &mut clock), Ok(Outcome::SpeedSet(5)));
//! assert!(controller.execute("s25", &mut clock).is_err());
//! assert_eq!(controller.status().motor.step_delay_ms, 5);
//! ```

use crate::circulation::LightCirculation;
use crate::commands::{Command, Outcome};
use crate::config::{ControllerConfig, LoopConfig};
use crate::error::ControlError;
use crate::motor::{MotorController, MotorState};
use crate::signal::{SignalColor, SignalController, SignalState, Transition};
use crate::traits::{CoilDriver, Direction, LoopProgress, SignalLamps, StatusDisplay, Timer};

/// Maximum length of a display command echo such as `FWD 100000`.
const ECHO_LEN: usize = 16;

type Echo = heapless::String<ECHO_LEN>;

fn echo(args: core::fmt::Arguments<'_>) -> Echo {
    let mut text = Echo::new();
    let _ = core::fmt::write(&mut text, args);
    text
}

/// Log and drop display failures; the display never aborts a command.
macro_rules! show {
    ($display:expr, $call:ident($($arg:expr),*)) => {
        if let Err(e) = $display.$call($($arg),*) {
            log::warn!("display {} failed: {:?}", stringify!($call), e);
        }
    };
}

/// Command dispatcher.
///
/// # Type Parameters
///
/// - `C`: Coil output ([`CoilDriver`])
/// - `L`: Lamp output ([`SignalLamps`])
/// - `D`: Display collaborator ([`StatusDisplay`])
///
/// # Thread Safety
///
/// There is one logical actor. The controller is owned by the
/// [`Scheduler`](crate::Scheduler) and must not be re-entered; every
/// operation completes before the next scheduler iteration begins.
pub struct Controller<C: CoilDriver, L: SignalLamps, D: StatusDisplay> {
    motor: MotorController<C>,
    signal: SignalController<L>,
    display: D,
    config: ControllerConfig,
    auto_display: bool,
}

impl<C, L, D> Controller<C, L, D>
where
    C: CoilDriver,
    L: SignalLamps,
    D: StatusDisplay,
{
    /// Create a controller with the motor released and every lamp dark.
    pub fn new(coils: C, lamps: L, display: D, config: ControllerConfig) -> Self {
        Self {
            motor: MotorController::new(coils, &config.motor),
            signal: SignalController::new(lamps, &config.signal),
            display,
            config,
            auto_display: true,
        }
    }

    /// Parse and run one command line.
    ///
    /// Errors are reported to the display, followed by a status refresh,
    /// before being returned; state is left exactly as it was.
    pub fn execute<T: Timer>(&mut self, line: &str, timer: &mut T) -> Result<Outcome, ControlError> {
        match Command::parse(line) {
            Ok(command) => self.dispatch(command, timer),
            Err(e) => {
                self.report_error(&e);
                Err(e)
            }
        }
    }

    /// Run a parsed command.
    pub fn dispatch<T: Timer>(&mut self, command: Command, timer: &mut T) -> Result<Outcome, ControlError> {
        let result = self.run(command, timer);

        match &result {
            Ok(outcome) => {
                log::info!("{}", outcome);
                self.refresh_status();
            }
            Err(e) => self.report_error(e),
        }

        result
    }

    fn run<T: Timer>(&mut self, command: Command, timer: &mut T) -> Result<Outcome, ControlError> {
        let outcome = match command {
            Command::Move { direction, steps } => {
                let count = MotorController::<C>::validate_step_count(steps)?;
                let label = match direction {
                    Direction::Clockwise => "FWD",
                    Direction::CounterClockwise => "REV",
                };
                show!(self.display, show_command(&echo(format_args!("{} {}", label, count))));
                let steps = self.motor.move_steps(steps, direction, timer)?;
                Outcome::Moved { direction, steps }
            }

            Command::SetSpeed(delay_ms) => {
                let ms = self.motor.set_speed(delay_ms)?;
                show!(self.display, show_command(&echo(format_args!("SPD {}", ms))));
                Outcome::SpeedSet(ms)
            }

            Command::Stop => {
                self.motor.stop();
                show!(self.display, show_command("STOP"));
                Outcome::MotorStopped
            }

            Command::Demo => {
                show!(self.display, show_command("DEMO"));
                self.motor.run_demo(timer);
                Outcome::DemoComplete
            }

            Command::ToggleCycle => {
                let running = self.signal.toggle_cycle(timer.now_ms());
                show!(self.display, show_signal(if running { "STARTED" } else { "STOPPED" }));
                Outcome::CycleToggled { running }
            }

            Command::SetColor(color) => {
                self.signal.set_color(color);
                Outcome::ColorSet(color)
            }

            Command::AllOff => {
                self.signal.set_raw(false, false, false);
                Outcome::AllOff
            }

            Command::AllOn => {
                self.signal.set_raw(true, true, true);
                Outcome::AllOn
            }

            Command::Flash => {
                show!(self.display, show_signal("FLASHING"));
                let pattern = self.config.signal.flash;
                self.signal.flash(&pattern, timer);
                show!(self.display, show_signal("FLASH DONE"));
                Outcome::Flashed
            }

            Command::Emergency => {
                show!(self.display, show_signal("EMERGENCY"));
                let pattern = self.config.signal.emergency;
                self.signal.emergency_flash(&pattern, timer);
                show!(self.display, show_signal("EMRG DONE"));
                Outcome::EmergencyFlashed
            }

            Command::SetTiming(timing) => {
                let timing = self
                    .signal
                    .set_timing(timing.red_ms, timing.yellow_ms, timing.green_ms)?;
                Outcome::TimingSet(timing)
            }

            Command::Loop => self.run_loop_sequence(timer),

            Command::Help => Outcome::Help(self.signal.timing()),
        };

        Ok(outcome)
    }

    /// The `loop` show sequence.
    ///
    /// Runs `steps` clockwise steps back to back while a
    /// [`LightCirculation`] rotates the lamps on its own interval. The
    /// scheduler is blocked throughout, so the circulation check is done
    /// here, between steps. Automatic display updates are suspended for the
    /// duration and the signal cycle is preempted.
    fn run_loop_sequence<T: Timer>(&mut self, timer: &mut T) -> Outcome {
        let LoopConfig {
            steps,
            circulation_ms,
            start_hold_ms,
            finish_hold_ms,
            progress_every,
        } = self.config.loop_sequence;

        log::info!(
            "Starting loop sequence: {} steps forward with circulating lights",
            steps
        );
        let started = timer.now_ms();

        show!(self.display, show_command("LOOP START"));
        timer.delay_ms(start_hold_ms);

        self.auto_display = false;
        self.signal.set_raw(false, false, false);

        let mut circulation = LightCirculation::new(SignalColor::Red, circulation_ms, timer.now_ms());
        self.signal.set_color(circulation.color());
        self.motor.set_running(true);

        let mut last_drawn: Option<(SignalColor, u32)> = None;
        for step in 0..steps {
            if let Some(color) = circulation.update(timer.now_ms()) {
                self.signal.set_color(color);
                log::info!("Switching to {} light - steps completed: {}", color, step);
            }

            let color = circulation.color();
            let redraw = match last_drawn {
                None => true,
                Some((drawn_color, drawn_step)) => {
                    drawn_color != color
                        || (progress_every > 0 && step - drawn_step >= progress_every)
                }
            };
            if redraw {
                let progress = LoopProgress {
                    color,
                    step,
                    total: steps,
                };
                show!(self.display, show_loop_progress(&progress));
                last_drawn = Some((color, step));
            }

            self.motor.step(Direction::Clockwise, timer);
        }

        self.signal.set_raw(false, false, false);
        self.motor.stop();
        self.auto_display = true;

        show!(self.display, show_command("LOOP DONE"));
        timer.delay_ms(finish_hold_ms);

        Outcome::LoopComplete {
            steps,
            elapsed_ms: timer.now_ms().saturating_sub(started),
        }
    }

    /// Poll the automatic signal cycle.
    ///
    /// Called by the scheduler once per iteration, before any command.
    pub fn poll_signal(&mut self, now_ms: u64) -> Option<Transition> {
        let transition = self.signal.advance_cycle(now_ms);
        if let Some(t) = transition {
            if t.overdue_ms > 0 {
                log::debug!("{} phase overran by {}ms", t.from, t.overdue_ms);
            }
            self.refresh_status();
        }
        transition
    }

    fn refresh_status(&mut self) {
        if self.auto_display {
            let status = self.status();
            show!(self.display, show_status(&status));
        }
    }

    fn report_error(&mut self, error: &ControlError) {
        log::warn!("{}", error);
        show!(self.display, show_error(error.label()));
        self.refresh_status();
    }

    /// Full state snapshot.
    pub fn status(&self) -> SystemStatus {
        SystemStatus {
            motor: self.motor.state(),
            signal: self.signal.state(),
            auto_display: self.auto_display,
        }
    }

    /// Whether status is pushed to the display automatically.
    pub fn auto_display(&self) -> bool {
        self.auto_display
    }

    /// Borrow the motor controller.
    pub fn motor(&self) -> &MotorController<C> {
        &self.motor
    }

    /// Borrow the signal controller.
    pub fn signal(&self) -> &SignalController<L> {
        &self.signal
    }

    /// Borrow the display.
    pub fn display(&self) -> &D {
        &self.display
    }

    /// Active configuration.
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }
}

/// Full state snapshot for display and console.
///
/// # Example
///
/// ```rust
/// use stepper_signal::Controller;
/// use stepper_signal::config::ControllerConfig;
/// use stepper_signal::hal::{MockCoils, MockDisplay, MockLamps};
///
/// let controller = Controller::new(
///     MockCoils::new(),
///     MockLamps::new(),
///     MockDisplay::new(),
///     ControllerConfig::default(),
/// );
///
/// let status = controller.status();
/// assert_eq!(status.motor.step_delay_ms, 2);
/// assert!(!status.signal.is_running);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SystemStatus {
    /// Motor state.
    pub motor: MotorState,
    /// Signal state.
    pub signal: SignalState,
    /// Whether status is pushed to the display automatically.
    pub auto_display: bool,
}
