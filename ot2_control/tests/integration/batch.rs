//! Batch runs over the default working envelope.

use ot2_common::bounds::Bounds;
use ot2_control::config::{Ot2Config, parse_config};
use ot2_control::observer::{NoopObserver, TrajectoryRecorder};
use ot2_control::{BatchDriver, BatchSummary, ControllerSystem};
use ot2_sim::KinematicSimulator;

fn default_system(config: &Ot2Config) -> ControllerSystem<KinematicSimulator> {
    let sim = KinematicSimulator::new(config.simulator.clone(), Some(config.envelope)).unwrap();
    ControllerSystem::from_config(sim, &config.controller, &config.envelope).unwrap()
}

#[test]
fn seeded_batch_reaches_every_target() {
    let config = parse_config("[batch]\ntrials = 10\nseed = 42\n").unwrap();
    let mut controller = default_system(&config);
    let mut driver = BatchDriver::from_config(&config);

    let summary = driver.run(&mut controller, &mut NoopObserver).unwrap();

    assert_eq!(summary.trials, 10);
    assert_eq!(summary.runs.len(), 10);
    assert_eq!(summary.successes, 10);
    assert_eq!(summary.success_rate(), 1.0);
    for i in 0..3 {
        assert!(summary.mean_error[i] <= summary.max_error[i]);
        assert!(summary.max_error[i] <= 0.001);
    }
    let bounds = Bounds::default();
    for run in &summary.runs {
        assert!(bounds.contains(&run.target), "{:?}", run.target);
        assert!(run.steps < 500);
    }
}

#[test]
fn same_seed_same_targets() {
    let config = parse_config("[batch]\ntrials = 4\nseed = 7\n").unwrap();

    let a = BatchDriver::from_config(&config)
        .run(&mut default_system(&config), &mut NoopObserver)
        .unwrap();
    let b = BatchDriver::from_config(&config)
        .run(&mut default_system(&config), &mut NoopObserver)
        .unwrap();

    let targets = |s: &BatchSummary| s.runs.iter().map(|r| r.target).collect::<Vec<_>>();
    assert_eq!(targets(&a), targets(&b));
    assert_eq!(a.mean_error, b.mean_error);
}

#[test]
fn coarse_tolerance_batch() {
    let config = parse_config(
        "[controller]\ntolerance = 0.01\n\n[batch]\ntrials = 5\nseed = 3\n",
    )
    .unwrap();
    let mut controller = default_system(&config);
    let summary = BatchDriver::from_config(&config)
        .run(&mut controller, &mut NoopObserver)
        .unwrap();

    assert_eq!(summary.successes, 5);
    assert!(summary.max_error.iter().all(|e| *e <= 0.01));
}

#[test]
fn homing_resets_between_trials() {
    let config =
        parse_config("[batch]\ntrials = 3\nseed = 11\nhome_between_trials = true\n").unwrap();
    let mut controller = default_system(&config);
    let mut recorder = TrajectoryRecorder::new();

    BatchDriver::from_config(&config)
        .run(&mut controller, &mut recorder)
        .unwrap();

    let center = Bounds::default().center();
    let firsts: Vec<_> = recorder.samples.iter().filter(|s| s.step == 0).collect();
    assert_eq!(firsts.len(), 3);
    for sample in firsts {
        assert_eq!(sample.position, center);
    }
}

#[test]
fn sample_bounds_override_envelope() {
    let config = parse_config(
        r#"
[batch]
trials = 5
seed = 5
sample_bounds = { low = [0.0, 0.0, 0.2], high = [0.05, 0.05, 0.25] }
"#,
    )
    .unwrap();
    let mut controller = default_system(&config);
    let summary = BatchDriver::from_config(&config)
        .run(&mut controller, &mut NoopObserver)
        .unwrap();

    let inner = Bounds::new([0.0, 0.0, 0.2], [0.05, 0.05, 0.25]);
    assert!(summary.runs.iter().all(|r| inner.contains(&r.target)));
}

#[test]
fn zero_trials_gives_empty_summary() {
    let config = Ot2Config::default();
    let mut controller = default_system(&config);
    let summary = BatchDriver::new(0, config.envelope, 0.001, 500, 1)
        .run(&mut controller, &mut NoopObserver)
        .unwrap();

    assert_eq!(summary.trials, 0);
    assert_eq!(summary.mean_error, [0.0; 3]);
    assert_eq!(controller.simulator().run_calls(), 0);
}

#[test]
fn summary_serializes_to_json() {
    let config = parse_config("[batch]\ntrials = 2\nseed = 1\n").unwrap();
    let summary = BatchDriver::from_config(&config)
        .run(&mut default_system(&config), &mut NoopObserver)
        .unwrap();

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["trials"], 2);
    assert_eq!(json["runs"].as_array().unwrap().len(), 2);
    assert!(json["mean_error"].is_array());
}
