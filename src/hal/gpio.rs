//! `embedded-hal` 1.0 adapters for real pins.
//!
//! Wraps any HAL's output pins and delay provider so the controller can
//! drive a ULN2003 stepper board and three lamp outputs directly.
//!
//! Pin writes can fail on some HALs (I/O expanders, mostly). The output
//! traits are infallible, so a failed write is logged at `warn` and the
//! operation carries on with the remaining pins.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, PinState};

use crate::traits::{CoilDriver, CoilPattern, Delay, LampState, SignalLamps};

fn drive<P: OutputPin>(pin: &mut P, on: bool, name: &str) {
    if let Err(e) = pin.set_state(PinState::from(on)) {
        log::warn!("{} pin write failed: {:?}", name, e);
    }
}

/// Four stepper coil outputs, IN1..IN4 on the driver board.
pub struct GpioCoils<A, B, C, D> {
    in1: A,
    in2: B,
    in3: C,
    in4: D,
}

impl<A, B, C, D> GpioCoils<A, B, C, D>
where
    A: OutputPin,
    B: OutputPin,
    C: OutputPin,
    D: OutputPin,
{
    /// Wrap four output pins. The pins are not touched until the first
    /// write; `MotorController::new` releases them straight away.
    pub fn new(in1: A, in2: B, in3: C, in4: D) -> Self {
        Self { in1, in2, in3, in4 }
    }

    /// Give the pins back.
    pub fn release_pins(self) -> (A, B, C, D) {
        (self.in1, self.in2, self.in3, self.in4)
    }
}

impl<A, B, C, D> CoilDriver for GpioCoils<A, B, C, D>
where
    A: OutputPin,
    B: OutputPin,
    C: OutputPin,
    D: OutputPin,
{
    fn energize(&mut self, pattern: CoilPattern) {
        drive(&mut self.in1, pattern[0], "IN1");
        drive(&mut self.in2, pattern[1], "IN2");
        drive(&mut self.in3, pattern[2], "IN3");
        drive(&mut self.in4, pattern[3], "IN4");
    }
}

/// Red, yellow and green lamp outputs (active high).
pub struct GpioLamps<R, Y, G> {
    red: R,
    yellow: Y,
    green: G,
}

impl<R, Y, G> GpioLamps<R, Y, G>
where
    R: OutputPin,
    Y: OutputPin,
    G: OutputPin,
{
    /// Wrap three output pins.
    pub fn new(red: R, yellow: Y, green: G) -> Self {
        Self { red, yellow, green }
    }

    /// Give the pins back.
    pub fn release_pins(self) -> (R, Y, G) {
        (self.red, self.yellow, self.green)
    }
}

impl<R, Y, G> SignalLamps for GpioLamps<R, Y, G>
where
    R: OutputPin,
    Y: OutputPin,
    G: OutputPin,
{
    fn set_lamps(&mut self, lamps: LampState) {
        drive(&mut self.red, lamps.red, "red lamp");
        drive(&mut self.yellow, lamps.yellow, "yellow lamp");
        drive(&mut self.green, lamps.green, "green lamp");
    }
}

/// Adapter from a HAL delay provider to [`Delay`].
pub struct HalDelay<D>(pub D);

impl<D: DelayNs> Delay for HalDelay<D> {
    fn delay_ms(&mut self, ms: u32) {
        self.0.delay_ms(ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use embedded_hal::digital::{ErrorKind, ErrorType};

    use crate::sequencer::PHASE_TABLE;
    use crate::signal::SignalColor;

    struct TestPin<'a> {
        level: &'a Cell<bool>,
        broken: bool,
    }

    impl<'a> TestPin<'a> {
        fn new(level: &'a Cell<bool>) -> Self {
            Self { level, broken: false }
        }
    }

    impl ErrorType for TestPin<'_> {
        type Error = ErrorKind;
    }

    impl OutputPin for TestPin<'_> {
        fn set_low(&mut self) -> Result<(), ErrorKind> {
            if self.broken {
                return Err(ErrorKind::Other);
            }
            self.level.set(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), ErrorKind> {
            if self.broken {
                return Err(ErrorKind::Other);
            }
            self.level.set(true);
            Ok(())
        }
    }

    struct TestDelay {
        total_ns: u64,
    }

    impl DelayNs for TestDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ns += ns as u64;
        }
    }

    #[test]
    fn coils_follow_pattern() {
        let levels: [Cell<bool>; 4] = Default::default();
        let mut coils = GpioCoils::new(
            TestPin::new(&levels[0]),
            TestPin::new(&levels[1]),
            TestPin::new(&levels[2]),
            TestPin::new(&levels[3]),
        );

        coils.energize(PHASE_TABLE[7]);
        let read: [bool; 4] = core::array::from_fn(|i| levels[i].get());
        assert_eq!(read, PHASE_TABLE[7]);

        coils.release();
        assert!(levels.iter().all(|l| !l.get()));
    }

    #[test]
    fn broken_pin_does_not_stop_others() {
        let levels: [Cell<bool>; 4] = Default::default();
        let mut first = TestPin::new(&levels[0]);
        first.broken = true;
        let mut coils = GpioCoils::new(
            first,
            TestPin::new(&levels[1]),
            TestPin::new(&levels[2]),
            TestPin::new(&levels[3]),
        );

        coils.energize([true, true, true, true]);

        assert!(!levels[0].get());
        assert!(levels[1].get() && levels[2].get() && levels[3].get());
    }

    #[test]
    fn lamps_follow_state() {
        let (r, y, g) = (Cell::new(false), Cell::new(false), Cell::new(false));
        let mut lamps = GpioLamps::new(TestPin::new(&r), TestPin::new(&y), TestPin::new(&g));

        lamps.set_lamps(SignalColor::Yellow.lamps());

        assert_eq!((r.get(), y.get(), g.get()), (false, true, false));
    }

    #[test]
    fn hal_delay_forwards_milliseconds() {
        let mut delay = HalDelay(TestDelay { total_ns: 0 });
        Delay::delay_ms(&mut delay, 3);
        assert_eq!(delay.0.total_ns, 3_000_000);
    }
}
