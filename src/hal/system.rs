//! Host implementations backed by `std`.

use std::time::{Duration, Instant};

use crate::traits::{Clock, Delay, LoopProgress, StatusDisplay};
use crate::SystemStatus;

/// Monotonic wall clock. Time zero is the moment of construction.
///
/// # Example
///
/// ```rust
/// use stepper_signal::hal::SystemClock;
/// use stepper_signal::traits::{Clock, Delay};
///
/// let mut clock = SystemClock::new();
/// clock.delay_ms(5);
/// assert!(clock.now_ms() >= 5);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    /// Start counting from now.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

impl Delay for SystemClock {
    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(ms as u64));
    }
}

/// Display that writes everything to the log at `info`.
///
/// Stands in for an LCD when running on a desktop.
#[derive(Debug, Default)]
pub struct LogDisplay {
    last_status: Option<SystemStatus>,
}

impl LogDisplay {
    /// Creates a log-backed display.
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatusDisplay for LogDisplay {
    type Error = core::convert::Infallible;

    fn show_status(&mut self, status: &SystemStatus) -> Result<(), Self::Error> {
        // the LCD only redraws on change
        if self.last_status.as_ref() == Some(status) {
            return Ok(());
        }
        self.last_status = Some(*status);

        let lamps = status.signal.lamps;
        log::info!(
            "[display] motor phase {} delay {}ms{} | signal {} R{} Y{} G{}",
            status.motor.current_phase,
            status.motor.step_delay_ms,
            if status.motor.is_running { " RUN" } else { "" },
            if status.signal.is_running { "AUTO" } else { "MANUAL" },
            lamps.red as u8,
            lamps.yellow as u8,
            lamps.green as u8,
        );
        Ok(())
    }

    fn show_command(&mut self, text: &str) -> Result<(), Self::Error> {
        log::info!("[display] CMD: {}", text);
        Ok(())
    }

    fn show_error(&mut self, text: &str) -> Result<(), Self::Error> {
        log::info!("[display] ERROR: {}", text);
        Ok(())
    }

    fn show_signal(&mut self, label: &str) -> Result<(), Self::Error> {
        log::info!("[display] TRAFFIC: {}", label);
        Ok(())
    }

    fn show_loop_progress(&mut self, progress: &LoopProgress) -> Result<(), Self::Error> {
        let permille = progress.permille();
        log::info!(
            "[display] LOOP {} {}/{} ({}.{}%)",
            progress.color,
            progress.step,
            progress.total,
            permille / 10,
            permille % 10
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ControllerConfig;
    use crate::hal::{MockCoils, MockLamps};
    use crate::Controller;

    #[test]
    fn system_clock_is_monotonic() {
        let mut clock = SystemClock::new();
        let a = clock.now_ms();
        clock.delay_ms(2);
        assert!(clock.now_ms() >= a + 2);
    }

    #[test]
    fn log_display_skips_unchanged_status() {
        let controller = Controller::new(
            MockCoils::new(),
            MockLamps::new(),
            LogDisplay::new(),
            ControllerConfig::default(),
        );
        let status = controller.status();

        let mut display = LogDisplay::new();
        display.show_status(&status).unwrap();
        assert_eq!(display.last_status, Some(status));
        display.show_status(&status).unwrap();
        assert_eq!(display.last_status, Some(status));
    }
}
