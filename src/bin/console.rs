//! Desktop console for the stepper and signal controller.
//!
//! Reads commands from stdin the way the board reads its serial line and
//! runs them against mock coils and lamps. Display output goes to the log.
//!
//! ```bash
//! cargo run --features console --bin console -- --red 5000 --yellow 2000 --green 4000
//! ```
//!
//! Type `help` for the command list. Ctrl-D exits.

use std::io::Read;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use stepper_signal::hal::{LogDisplay, MockCoils, MockLamps, SystemClock};
use stepper_signal::{
    CommandInput, CommandLine, Controller, ControllerConfig, LineAssembler, LoopConfig,
    MotorConfig, MotorController, Scheduler, SignalConfig, SignalTiming,
};

/// Stepper + traffic signal console
#[derive(Parser, Debug)]
#[command(name = "console")]
#[command(about = "Drive the stepper and traffic signal controller from stdin", long_about = None)]
#[command(version)]
struct Args {
    /// Delay after each motor step in milliseconds (1-20)
    #[arg(long, value_name = "MS", default_value_t = 2)]
    step_delay: u32,

    /// Red phase duration in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 10_000)]
    red: u64,

    /// Yellow phase duration in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 1_500)]
    yellow: u64,

    /// Green phase duration in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 10_000)]
    green: u64,

    /// Steps taken by the `loop` sequence
    #[arg(long, value_name = "COUNT", default_value_t = 10_000)]
    loop_steps: u32,

    /// Scheduler interval in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 20)]
    tick: u64,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    /// Refuse flags the config builders would otherwise clamp.
    fn validate(&self) -> Result<()> {
        MotorController::<MockCoils>::validate_speed(self.step_delay.into())
            .context("--step-delay must be between 1 and 20 ms")?;
        SignalTiming::new(self.red, self.yellow, self.green)
            .validate()
            .context("phase durations must be at least 1000 ms")?;
        Ok(())
    }

    fn config(&self) -> ControllerConfig {
        ControllerConfig::default()
            .with_motor(MotorConfig::default().with_step_delay_ms(self.step_delay))
            .with_signal(
                SignalConfig::default()
                    .with_timing(SignalTiming::new(self.red, self.yellow, self.green)),
            )
            .with_loop(LoopConfig::default().with_steps(self.loop_steps))
    }
}

/// Lines assembled from stdin on a reader thread.
struct StdinInput {
    lines: Receiver<CommandLine>,
    closed: bool,
}

impl StdinInput {
    fn spawn() -> Result<Self> {
        let (tx, rx) = mpsc::channel();

        thread::Builder::new()
            .name("stdin".into())
            .spawn(move || {
                let mut assembler = LineAssembler::new();
                for byte in std::io::stdin().lock().bytes() {
                    let Ok(byte) = byte else { break };
                    if let Some(line) = assembler.push_byte(byte) {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                }
            })
            .context("failed to start stdin reader")?;

        Ok(Self {
            lines: rx,
            closed: false,
        })
    }
}

impl CommandInput for StdinInput {
    fn poll_line(&mut self) -> Option<CommandLine> {
        match self.lines.try_recv() {
            Ok(line) => Some(line),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.closed = true;
                None
            }
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    args.validate()?;
    let config = args.config();

    log::info!("stepper-signal console v{}", env!("CARGO_PKG_VERSION"));

    let controller = Controller::new(MockCoils::new(), MockLamps::new(), LogDisplay::new(), config);
    let mut scheduler = Scheduler::new(controller, SystemClock::new());
    let mut input = StdinInput::spawn()?;

    println!("Stepper Motor & Traffic Light Controller Ready!");
    println!("Type 'help' for available commands");

    while !input.closed {
        let report = scheduler.tick(&mut input);

        if let Some(t) = report.transition {
            println!("Traffic: {} -> {}", t.from, t.to);
        }
        match report.command {
            Some(Ok(outcome)) => println!("{}", outcome),
            Some(Err(e)) => println!("{}", e),
            None => {}
        }

        thread::sleep(Duration::from_millis(args.tick));
    }

    log::info!("input closed after {} ticks", scheduler.ticks());
    Ok(())
}

/// Initialize logging based on verbosity level. `RUST_LOG` still wins.
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::{Builder, Env};
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .parse_env(Env::default())
        .format(|buf, record| writeln!(buf, "[{} {}] {}", record.level(), record.target(), record.args()))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["console"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn defaults_are_valid() {
        assert!(args(&[]).validate().is_ok());
    }

    #[test]
    fn step_delay_out_of_range_is_refused() {
        assert!(args(&["--step-delay", "0"]).validate().is_err());
        assert!(args(&["--step-delay", "21"]).validate().is_err());
        assert!(args(&["--step-delay", "20"]).validate().is_ok());
    }

    #[test]
    fn short_phase_is_refused() {
        let err = args(&["--yellow", "999"]).validate().unwrap_err();
        assert_eq!(err.to_string(), "phase durations must be at least 1000 ms");
    }
}
