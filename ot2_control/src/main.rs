//! # OT-2 Control
//!
//! Runs the PID position controller against the kinematic pipette
//! simulator.
//!
//! # Usage
//!
//! ```bash
//! # Five random targets with 1 mm accuracy (defaults)
//! ot2_control batch
//!
//! # 10 mm accuracy, 20 trials, reproducible targets, JSON report
//! ot2_control --config config/ot2.toml batch -n 20 --tolerance 0.01 --seed 7 --format json
//!
//! # Single target
//! ot2_control move 0.1 0.0 0.2
//!
//! # Probe the working envelope and print it as a markdown table
//! ot2_control probe
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use ot2_common::types::Vec3;
use ot2_control::batch::{BatchDriver, BatchSummary};
use ot2_control::config::{Ot2Config, load_config};
use ot2_control::control::system::ControllerSystem;
use ot2_control::envelope::{
    DEFAULT_PROBE_SPEED, DEFAULT_PROBE_STEPS, envelope_markdown, probe_envelope,
};
use ot2_control::observer::{NoopObserver, TracingObserver};
use ot2_control::run::ControllerRun;
use ot2_sim::KinematicSimulator;
use std::path::PathBuf;
use std::process;
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;

/// OT-2 Control: PID pipette positioning against a kinematic simulator
#[derive(Parser, Debug)]
#[command(name = "ot2_control")]
#[command(version)]
#[command(about = "PID position control for the OT-2 pipette")]
struct Args {
    /// Path to configuration TOML. Built-in defaults are used when omitted.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Move to random targets and report per-axis error statistics.
    Batch {
        /// Number of random targets.
        #[arg(short = 'n', long)]
        trials: Option<usize>,

        /// Per-axis tolerance [m].
        #[arg(short, long)]
        tolerance: Option<f64>,

        /// Iteration budget per target.
        #[arg(long)]
        max_steps: Option<u32>,

        /// RNG seed for reproducible targets.
        #[arg(long)]
        seed: Option<u64>,

        /// Reset the simulator to its start position before every trial.
        #[arg(long)]
        home: bool,

        /// Report format.
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Move to a single target.
    Move {
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
        #[arg(allow_negative_numbers = true)]
        z: f64,

        /// Per-axis tolerance [m].
        #[arg(short, long)]
        tolerance: Option<f64>,

        /// Report format.
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Drive into every workspace corner and print the reachable envelope.
    Probe {
        /// Steps per corner.
        #[arg(long, default_value_t = DEFAULT_PROBE_STEPS)]
        steps: u32,

        /// Probe speed per axis [m/s].
        #[arg(long, default_value_t = DEFAULT_PROBE_SPEED)]
        speed: f64,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match load_config(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("FATAL: failed to load {}: {e}", path.display());
                process::exit(1);
            }
        },
        None => Ot2Config::default(),
    };

    setup_tracing(&args, &config);
    info!(
        "OT-2 Control v{} starting ({})",
        env!("CARGO_PKG_VERSION"),
        config.shared.service_name
    );

    if let Err(e) = run(args, config) {
        error!("FATAL: {e}");
        process::exit(1);
    }
}

fn run(args: Args, mut config: Ot2Config) -> Result<(), Box<dyn std::error::Error>> {
    let envelope = config.envelope;
    let sim = KinematicSimulator::new(config.simulator.clone(), Some(envelope))?;

    match args.command {
        Command::Batch {
            trials,
            tolerance,
            max_steps,
            seed,
            home,
            format,
        } => {
            if let Some(n) = trials {
                config.batch.trials = n;
            }
            if let Some(tol) = tolerance {
                config.controller.tolerance = tol;
            }
            if let Some(max) = max_steps {
                config.controller.max_steps = max;
            }
            if seed.is_some() {
                config.batch.seed = seed;
            }
            config.batch.home_between_trials |= home;
            config.validate()?;

            let mut controller =
                ControllerSystem::from_config(sim, &config.controller, &envelope)?;
            let mut driver = BatchDriver::from_config(&config);
            let summary = if args.verbose {
                driver.run(&mut controller, &mut TracingObserver)?
            } else {
                driver.run(&mut controller, &mut NoopObserver)?
            };
            print_summary(&summary, format)?;
        }
        Command::Move {
            x,
            y,
            z,
            tolerance,
            format,
        } => {
            let tolerance = tolerance.unwrap_or(config.controller.tolerance);
            let mut controller =
                ControllerSystem::from_config(sim, &config.controller, &envelope)?;
            let target: Vec3 = [x, y, z];
            let run = controller.move_to_observed(
                target,
                tolerance,
                config.controller.max_steps,
                &mut TracingObserver,
            )?;
            print_run(None, &run, format)?;
        }
        Command::Probe { steps, speed } => {
            let mut sim = sim;
            let home = config.simulator.start_position.unwrap_or(envelope.center());
            let probe = probe_envelope(&mut sim, home, speed, steps)?;
            for (i, corner) in probe.corners.iter().enumerate() {
                println!("Corner {} pipette position: {:?}", i + 1, corner);
            }
            println!();
            print!("{}", envelope_markdown(&probe.bounds));
        }
    }

    Ok(())
}

fn print_run(trial: Option<usize>, run: &ControllerRun, format: Format) -> serde_json::Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(run)?),
        Format::Text => {
            match trial {
                Some(n) => println!("\n[TEST {n}] Target = {:?}", run.target),
                None => println!("\nTarget = {:?}", run.target),
            }
            println!("  Reached target: {}", run.success);
            println!("  Final position: {:?}", run.final_position);
            println!("  Final position error: {:?} m", run.error);
            println!("  Worst axis error: {:.6} m", run.max_error());
            println!("  Distance to target: {:.6} m", run.distance());
            println!("  Steps: {}", run.steps);
            println!("  Time taken: {:.2?}", run.elapsed);
        }
    }
    Ok(())
}

fn print_summary(summary: &BatchSummary, format: Format) -> serde_json::Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(summary)?),
        Format::Text => {
            for (i, run) in summary.runs.iter().enumerate() {
                print_run(Some(i + 1), run, Format::Text)?;
            }
            println!("\n=== Final Error Summary ===");
            println!("Reached: {}/{}", summary.successes, summary.trials);
            println!("Mean Error (X, Y, Z): {:?} m", summary.mean_error);
            println!("Max Error (X, Y, Z): {:?} m", summary.max_error);
        }
    }
    Ok(())
}

/// Setup tracing subscriber from CLI arguments and `[shared] log_level`.
fn setup_tracing(args: &Args, config: &Ot2Config) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        config.shared.log_level.as_tracing_level()
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}
