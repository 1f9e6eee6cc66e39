//! Cooperative main loop.
//!
//! [`Scheduler`] owns the [`Controller`] and the time source and runs one
//! iteration per [`tick`](Scheduler::tick):
//!
//! 1. Poll the signal cycle at the current time.
//! 2. Take at most one command line from the input and run it to completion.
//!
//! Nothing preempts a running command. A `f100000` at 20 ms per step holds
//! the loop for 2000 s, and the signal stays in whatever phase it was in
//! until the next tick polls it.
//!
//! # Example
//!
//! ```rust
//! use stepper_signal::{Controller, Scheduler, SignalColor};
//! use stepper_signal::config::ControllerConfig;
//! use stepper_signal::hal::{MockClock, MockCoils, MockDisplay, MockInput, MockLamps};
//!
//! let controller = Controller::new(
//!     MockCoils::new(),
//!     MockLamps::new(),
//!     MockDisplay::new(),
//!     ControllerConfig::default(),
//! );
//! let mut scheduler = Scheduler::new(controller, MockClock::new());
//! let mut input = MockInput::new();
//!
//! input.queue_line("traffic");
//! scheduler.tick(&mut input);
//!
//! scheduler.timer_mut().set(10_000);
//! let report = scheduler.tick(&mut input);
//! assert_eq!(report.transition.map(|t| t.to), Some(SignalColor::Green));
//! ```

use crate::commands::Outcome;
use crate::controller::Controller;
use crate::error::ControlError;
use crate::input::CommandInput;
use crate::signal::Transition;
use crate::traits::{CoilDriver, SignalLamps, StatusDisplay, Timer};

/// What happened during one [`Scheduler::tick`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Signal transition performed by the poll, if any.
    pub transition: Option<Transition>,
    /// Result of the command dispatched this tick, if a line was read.
    pub command: Option<Result<Outcome, ControlError>>,
}

impl TickReport {
    /// True when neither the signal nor a command did anything.
    pub fn is_idle(&self) -> bool {
        self.transition.is_none() && self.command.is_none()
    }
}

/// Single-threaded scheduler.
pub struct Scheduler<C, L, D, T>
where
    C: CoilDriver,
    L: SignalLamps,
    D: StatusDisplay,
    T: Timer,
{
    controller: Controller<C, L, D>,
    timer: T,
    ticks: u64,
}

impl<C, L, D, T> Scheduler<C, L, D, T>
where
    C: CoilDriver,
    L: SignalLamps,
    D: StatusDisplay,
    T: Timer,
{
    /// Wrap a controller and its time source.
    pub fn new(controller: Controller<C, L, D>, timer: T) -> Self {
        Self {
            controller,
            timer,
            ticks: 0,
        }
    }

    /// Run one iteration: signal poll first, then at most one command.
    ///
    /// Blank lines are read and ignored.
    pub fn tick<I: CommandInput>(&mut self, input: &mut I) -> TickReport {
        self.ticks += 1;

        let transition = self.controller.poll_signal(self.timer.now_ms());

        let command = input.poll_line().and_then(|line| {
            let line = line.trim();
            if line.is_empty() {
                return None;
            }
            log::debug!("tick {}: dispatching {:?}", self.ticks, line);
            Some(self.controller.execute(line, &mut self.timer))
        });

        TickReport {
            transition,
            command,
        }
    }

    /// Iterations run so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Borrow the controller.
    pub fn controller(&self) -> &Controller<C, L, D> {
        &self.controller
    }

    /// Borrow the time source.
    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// Mutably borrow the time source (simulated time in tests).
    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }
}
