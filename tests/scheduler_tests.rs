//! Integration tests for the cooperative main loop

use stepper_signal::{
    hal::{MockClock, MockCoils, MockDisplay, MockInput, MockLamps},
    traits::Clock,
    Controller, ControllerConfig, LampState, LoopConfig, Outcome, Scheduler, SignalColor,
};

type TestScheduler = Scheduler<MockCoils, MockLamps, MockDisplay, MockClock>;

fn scheduler_with(config: ControllerConfig) -> TestScheduler {
    let controller = Controller::new(MockCoils::new(), MockLamps::new(), MockDisplay::new(), config);
    Scheduler::new(controller, MockClock::new())
}

fn scheduler() -> TestScheduler {
    scheduler_with(ControllerConfig::default())
}

/// Tick with no input until `until_ms`, advancing simulated time by `step_ms`.
fn run_idle(s: &mut TestScheduler, input: &mut MockInput, until_ms: u64, step_ms: u64) -> Vec<SignalColor> {
    let mut seen = Vec::new();
    while s.timer().now_ms() < until_ms {
        s.timer_mut().advance(step_ms);
        if let Some(t) = s.tick(input).transition {
            seen.push(t.to);
        }
    }
    seen
}

#[test]
fn idle_cycle_follows_timing() {
    let mut s = scheduler();
    let mut input = MockInput::new();
    input.queue_line("traffic");
    s.tick(&mut input);

    let seen = run_idle(&mut s, &mut input, 43_000, 20);

    // 10000 + 10000 + 1500 = 21500 per cycle
    assert_eq!(
        seen,
        [
            SignalColor::Green,
            SignalColor::Yellow,
            SignalColor::Red,
            SignalColor::Green,
            SignalColor::Yellow,
            SignalColor::Red,
        ]
    );
}

#[test]
fn long_move_holds_signal_phase() {
    let mut s = scheduler();
    let mut input = MockInput::new();
    input.queue_line("traffic");
    s.tick(&mut input);

    // 20ms * 100000 steps = 2000s of blocking
    input.queue_line("s20");
    s.tick(&mut input);
    input.queue_line("f100000");
    let report = s.tick(&mut input);

    assert!(matches!(report.command, Some(Ok(Outcome::Moved { steps: 100_000, .. }))));
    assert_eq!(s.timer().now_ms(), 2_000_000);
    assert_eq!(s.controller().status().signal.lamps, SignalColor::Red.lamps());

    // the next poll performs exactly one transition
    let report = s.tick(&mut input);
    let t = report.transition.unwrap();
    assert_eq!((t.from, t.to), (SignalColor::Red, SignalColor::Green));
    assert_eq!(t.overdue_ms, 2_000_000 - 10_000);
    assert!(s.tick(&mut input).transition.is_none());
}

#[test]
fn rejected_command_keeps_loop_running() {
    let mut s = scheduler();
    let mut input = MockInput::new();
    input.queue_line("traffic");
    input.queue_line("timing5000,2000");
    input.queue_line("f0");
    input.queue_line("nonsense");

    s.tick(&mut input);
    for _ in 0..3 {
        assert!(matches!(s.tick(&mut input).command, Some(Err(_))));
    }

    assert!(s.controller().status().signal.is_running);
    assert_eq!(
        s.controller().display().errors().collect::<Vec<_>>(),
        ["Invalid timing", "Invalid steps", "Unknown cmd"]
    );
}

#[test]
fn loop_sequence_through_scheduler() {
    let config = ControllerConfig::default().with_loop(
        LoopConfig::default()
            .with_steps(2_000)
            .with_circulation_ms(1_000)
            .with_holds(2_000, 30_000),
    );
    let mut s = scheduler_with(config);
    let mut input = MockInput::new();
    input.queue_line("traffic");
    s.tick(&mut input);
    input.queue_line("loop");

    let report = s.tick(&mut input);

    assert_eq!(
        report.command,
        Some(Ok(Outcome::LoopComplete {
            steps: 2_000,
            elapsed_ms: 2_000 + 4_000 + 30_000
        }))
    );

    let status = s.controller().status();
    assert!(!status.signal.is_running);
    assert_eq!(status.signal.lamps, LampState::OFF);
    assert_eq!(status.motor.current_phase, 2_000 % 8);

    // 4000ms of stepping at a 1000ms interval: three changes after RED,
    // the last step starts just before a fourth would be due
    let colors: Vec<_> = s.controller().display().progress().map(|p| p.color).collect();
    assert_eq!(colors.first(), Some(&SignalColor::Red));
    let changes: Vec<_> = colors.windows(2).filter(|w| w[0] != w[1]).map(|w| w[1]).collect();
    assert_eq!(changes, [SignalColor::Yellow, SignalColor::Green, SignalColor::Red]);

    // nothing left to poll once the loop has preempted the cycle
    s.timer_mut().advance(100_000);
    assert!(s.tick(&mut input).transition.is_none());
}

#[test]
fn manual_color_between_polls() {
    let mut s = scheduler();
    let mut input = MockInput::new();
    input.queue_line("traffic");
    s.tick(&mut input);

    s.timer_mut().set(3_000);
    input.queue_line("red");
    s.tick(&mut input);

    let seen = run_idle(&mut s, &mut input, 60_000, 100);
    assert!(seen.is_empty());
    assert_eq!(s.controller().status().signal.lamps, SignalColor::Red.lamps());
}
