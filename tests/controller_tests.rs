//! Integration tests for the command dispatcher

use stepper_signal::{
    hal::{MockClock, MockCoils, MockDisplay, MockLamps},
    traits::Clock,
    ControlError, Controller, ControllerConfig, Direction, InvalidArgument, LampState, Outcome,
    SignalColor, SignalTiming,
};

type TestController = Controller<MockCoils, MockLamps, MockDisplay>;

fn controller() -> TestController {
    Controller::new(
        MockCoils::new(),
        MockLamps::new(),
        MockDisplay::new(),
        ControllerConfig::default(),
    )
}

#[test]
fn speed_command_accepts_and_rejects() {
    let mut c = controller();
    let mut clock = MockClock::new();

    let err = c.execute("s25", &mut clock).unwrap_err();
    assert_eq!(err, ControlError::InvalidArgument(InvalidArgument::Speed(25)));
    assert_eq!(c.status().motor.step_delay_ms, 2);

    assert_eq!(c.execute("s5", &mut clock), Ok(Outcome::SpeedSet(5)));
    assert_eq!(c.status().motor.step_delay_ms, 5);
}

#[test]
fn unknown_command_changes_nothing() {
    let mut c = controller();
    let mut clock = MockClock::new();
    c.execute("f3", &mut clock).unwrap();
    let before = c.status();
    let lamp_writes = c.signal().lamps().history.len();
    let coil_writes = c.motor().coils().writes;

    let err = c.execute("xyz", &mut clock).unwrap_err();

    assert!(matches!(err, ControlError::UnknownCommand(ref echo) if echo == "xyz"));
    assert_eq!(c.status(), before);
    assert_eq!(c.signal().lamps().history.len(), lamp_writes);
    assert_eq!(c.motor().coils().writes, coil_writes);
}

#[test]
fn forward_then_reverse_returns_to_phase() {
    let mut c = controller();
    let mut clock = MockClock::new();

    c.execute("f13", &mut clock).unwrap();
    assert_eq!(c.status().motor.current_phase, 5);

    assert_eq!(
        c.execute("r13", &mut clock),
        Ok(Outcome::Moved {
            direction: Direction::CounterClockwise,
            steps: 13
        })
    );
    assert_eq!(c.status().motor.current_phase, 0);
    assert_eq!(clock.now_ms(), 26 * 2);
}

#[test]
fn move_uses_current_speed() {
    let mut c = controller();
    let mut clock = MockClock::new();

    c.execute("s20", &mut clock).unwrap();
    c.execute("f50", &mut clock).unwrap();

    assert_eq!(clock.now_ms(), 1000);
}

#[test]
fn stop_releases_coils() {
    let mut c = controller();
    let mut clock = MockClock::new();
    c.execute("f5", &mut clock).unwrap();

    assert_eq!(c.execute("stop", &mut clock), Ok(Outcome::MotorStopped));

    assert_eq!(c.motor().coils().energized(), 0);
    assert_eq!(c.status().motor.current_phase, 5);
}

#[test]
fn demo_runs_out_and_back() {
    let mut c = controller();
    let mut clock = MockClock::new();

    assert_eq!(c.execute("demo", &mut clock), Ok(Outcome::DemoComplete));

    assert_eq!(c.status().motor.current_phase, 0);
    assert_eq!(clock.now_ms(), 512 * 2 * 2 + 1000);
    assert_eq!(c.display().commands().collect::<Vec<_>>(), ["DEMO"]);
}

#[test]
fn default_signal_cycle() {
    let mut c = controller();
    let mut clock = MockClock::new();
    c.execute("traffic", &mut clock).unwrap();

    assert_eq!(c.poll_signal(9_999), None);
    assert_eq!(c.poll_signal(10_000).map(|t| t.to), Some(SignalColor::Green));
    assert_eq!(c.poll_signal(20_000).map(|t| t.to), Some(SignalColor::Yellow));
    assert_eq!(c.poll_signal(21_499), None);
    assert_eq!(c.poll_signal(21_500).map(|t| t.to), Some(SignalColor::Red));
}

#[test]
fn traffic_toggles_off_and_darkens() {
    let mut c = controller();
    let mut clock = MockClock::new();
    c.execute("traffic", &mut clock).unwrap();

    assert_eq!(
        c.execute("traffic", &mut clock),
        Ok(Outcome::CycleToggled { running: false })
    );
    assert_eq!(c.status().signal.lamps, LampState::OFF);
    assert_eq!(c.display().signals().collect::<Vec<_>>(), ["STARTED", "STOPPED"]);
}

#[test]
fn short_timing_is_rejected_whole() {
    let mut c = controller();
    let mut clock = MockClock::new();

    let err = c.execute("timing500,2000,2000", &mut clock).unwrap_err();

    assert_eq!(err, ControlError::InvalidArgument(InvalidArgument::TimingTooShort));
    assert_eq!(c.status().signal.timing, SignalTiming::default());
    assert_eq!(c.display().errors().collect::<Vec<_>>(), ["Invalid timing"]);
}

#[test]
fn timing_applies_and_drives_cycle() {
    let mut c = controller();
    let mut clock = MockClock::new();

    assert_eq!(
        c.execute("timing5000,2000,4000", &mut clock),
        Ok(Outcome::TimingSet(SignalTiming::new(5000, 2000, 4000)))
    );
    assert!(c.execute("timing5000,2000", &mut clock).is_err());
    assert_eq!(c.status().signal.timing, SignalTiming::new(5000, 2000, 4000));

    c.execute("traffic", &mut clock).unwrap();
    assert_eq!(c.poll_signal(5_000).map(|t| t.to), Some(SignalColor::Green));
    assert_eq!(c.poll_signal(9_000).map(|t| t.to), Some(SignalColor::Yellow));
    assert_eq!(c.poll_signal(11_000).map(|t| t.to), Some(SignalColor::Red));
}

#[test]
fn allon_and_alloff() {
    let mut c = controller();
    let mut clock = MockClock::new();

    assert_eq!(c.execute("allon", &mut clock), Ok(Outcome::AllOn));
    assert_eq!(c.status().signal.lamps, LampState::ALL);

    assert_eq!(c.execute("alloff", &mut clock), Ok(Outcome::AllOff));
    assert_eq!(c.status().signal.lamps, LampState::OFF);
}

#[test]
fn emergency_blocks_for_ten_seconds() {
    let mut c = controller();
    let mut clock = MockClock::new();
    c.execute("traffic", &mut clock).unwrap();

    assert_eq!(c.execute("emergency", &mut clock), Ok(Outcome::EmergencyFlashed));

    assert_eq!(clock.now_ms(), 10 * 1000);
    assert!(!c.status().signal.is_running);
    assert!(c
        .signal()
        .lamps()
        .history
        .iter()
        .all(|l| !l.yellow && !l.green));
    assert_eq!(c.display().signals().collect::<Vec<_>>(), ["STARTED", "EMERGENCY", "EMRG DONE"]);
}

#[test]
fn failing_display_does_not_abort_commands() {
    let mut c = Controller::new(
        MockCoils::new(),
        MockLamps::new(),
        MockDisplay::failing(),
        ControllerConfig::default(),
    );
    let mut clock = MockClock::new();

    assert!(c.execute("f8", &mut clock).is_ok());
    assert_eq!(clock.now_ms(), 16);
    assert!(c.execute("bogus", &mut clock).is_err());
    assert!(!c.display().events.is_empty());
}

#[test]
fn commands_are_case_insensitive() {
    let mut c = controller();
    let mut clock = MockClock::new();

    assert_eq!(c.execute("  GREEN  ", &mut clock), Ok(Outcome::ColorSet(SignalColor::Green)));
    assert_eq!(c.execute("F2", &mut clock).map(|_| ()), Ok(()));
}
