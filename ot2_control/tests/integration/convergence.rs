//! Closed-loop convergence against the kinematic plant.
//!
//! With the tuned gains, dt = 0.01 s and a 0.01 s simulator step, a move
//! from the origin to (0.1, 0.0, 0.2) settles within 1 mm in under 200
//! iterations.

use ot2_common::bounds::Bounds;
use ot2_common::simulator::Simulator;
use ot2_common::types::Vec3;
use ot2_control::config::ControllerConfig;
use ot2_control::observer::TrajectoryRecorder;
use ot2_control::{ControlError, ControllerSystem, PidGains};
use ot2_sim::KinematicSimulator;

const TARGET: Vec3 = [0.1, 0.0, 0.2];

fn tuned_gains() -> [PidGains; 3] {
    [
        PidGains::new(2.0, 0.1, 0.05),
        PidGains::new(2.0, 0.1, 0.05),
        PidGains::new(2.5, 0.1, 0.05),
    ]
}

fn controller_at(start: Vec3) -> ControllerSystem<KinematicSimulator> {
    let sim = KinematicSimulator::unbounded(0.01, start).unwrap();
    ControllerSystem::new(sim, tuned_gains(), 0.01).unwrap()
}

#[test]
fn reaches_reference_target_within_budget() {
    let mut controller = controller_at([0.0; 3]);
    let run = controller.move_to(TARGET, 0.001, 500).unwrap();

    assert!(run.success, "not converged: {run:?}");
    assert!(run.steps < 500);
    assert!(run.error.iter().all(|e| *e <= 0.001), "error {:?}", run.error);
    for i in 0..3 {
        assert!((run.final_position[i] - TARGET[i]).abs() <= 0.001);
    }
}

#[test]
fn one_simulator_step_per_iteration() {
    let mut controller = controller_at([0.0; 3]);
    let run = controller.move_to(TARGET, 0.001, 500).unwrap();

    let sim = controller.simulator();
    assert_eq!(sim.run_calls(), u64::from(run.steps));
    assert_eq!(sim.steps(), u64::from(run.steps));
}

#[test]
fn identical_runs_are_deterministic() {
    let a = controller_at([0.0; 3]).move_to(TARGET, 0.001, 500).unwrap();
    let b = controller_at([0.0; 3]).move_to(TARGET, 0.001, 500).unwrap();

    assert_eq!(a.steps, b.steps);
    assert_eq!(a.final_position, b.final_position);
    assert_eq!(a.error, b.error);
}

#[test]
fn zero_budget_never_steps_simulator() {
    let mut controller = controller_at([0.0; 3]);
    let run = controller.move_to(TARGET, 0.001, 0).unwrap();

    assert!(!run.success);
    assert_eq!(run.steps, 0);
    assert_eq!(run.final_position, [0.0; 3]);
    assert_eq!(run.error, [0.1, 0.0, 0.2]);
    assert_eq!(controller.simulator().run_calls(), 0);
}

#[test]
fn tight_budget_reports_failure_with_progress() {
    let mut controller = controller_at([0.0; 3]);
    let run = controller.move_to(TARGET, 0.001, 20).unwrap();

    assert!(!run.success);
    assert_eq!(run.steps, 20);
    // Moving towards the target: error shrank on the moving axes.
    assert!(run.error[0] < 0.1);
    assert!(run.error[2] < 0.2);
}

#[test]
fn consecutive_moves_start_from_previous_position() {
    let mut controller = controller_at([0.0; 3]);
    let first = controller.move_to(TARGET, 0.001, 500).unwrap();
    assert!(first.success);

    let back = controller.move_to([0.0, 0.05, 0.2], 0.001, 500).unwrap();
    assert!(back.success);
    assert_eq!(controller.current_position().unwrap(), back.final_position);
}

#[test]
fn recorder_sees_every_iteration() {
    let mut controller = controller_at([0.0; 3]);
    let mut recorder = TrajectoryRecorder::new();
    let run = controller
        .move_to_observed(TARGET, 0.001, 500, &mut recorder)
        .unwrap();

    assert_eq!(recorder.starts, 1);
    assert_eq!(recorder.samples.len(), run.steps as usize);
    assert_eq!(recorder.runs.len(), 1);
    assert_eq!(recorder.runs[0], run);

    let first = &recorder.samples[0];
    assert_eq!(first.step, 0);
    assert_eq!(first.position, [0.0; 3]);
    assert_eq!(first.error, TARGET);
    assert_eq!(first.action.aux, 0.0);
}

#[test]
fn looser_tolerance_converges_sooner() {
    let fine = controller_at([0.0; 3]).move_to(TARGET, 0.001, 500).unwrap();
    let coarse = controller_at([0.0; 3]).move_to(TARGET, 0.01, 500).unwrap();

    assert!(coarse.success);
    assert!(coarse.steps < fine.steps);
}

#[test]
fn enforced_envelope_rejects_outside_target() {
    let sim = KinematicSimulator::unbounded(0.01, [0.0, 0.0, 0.2]).unwrap();
    let config = ControllerConfig {
        enforce_envelope: true,
        ..ControllerConfig::default()
    };
    let mut controller = ControllerSystem::from_config(sim, &config, &Bounds::default()).unwrap();

    let err = controller.move_to([1.0, 0.0, 0.2], 0.001, 500).unwrap_err();
    assert!(matches!(err, ControlError::TargetOutOfEnvelope { .. }));
    assert_eq!(controller.simulator().run_calls(), 0);
}

#[test]
fn reset_restores_simulator_start() {
    let mut controller = controller_at([0.0; 3]);
    controller.move_to(TARGET, 0.001, 500).unwrap();
    controller.simulator_mut().reset().unwrap();
    assert_eq!(controller.current_position().unwrap(), [0.0; 3]);
}

#[test]
fn repeated_run_on_same_controller_matches() {
    let mut controller = controller_at([0.0; 3]);
    let first = controller.move_to(TARGET, 0.001, 500).unwrap();

    controller.simulator_mut().reset().unwrap();
    let second = controller.move_to(TARGET, 0.001, 500).unwrap();

    assert_eq!(first.steps, second.steps);
    assert_eq!(first.error, second.error);
}

#[test]
fn settled_follow_up_move_records_empty_trajectory() {
    let mut controller = controller_at([0.0; 3]);
    let mut recorder = TrajectoryRecorder::new();
    let first = controller
        .move_to_observed(TARGET, 0.001, 500, &mut recorder)
        .unwrap();
    assert!(!recorder.last_run_samples().is_empty());

    let second = controller
        .move_to_observed(first.final_position, 0.001, 500, &mut recorder)
        .unwrap();

    assert!(second.success);
    assert_eq!(second.steps, 0);
    assert!(recorder.last_run_samples().is_empty());
    assert_eq!(recorder.samples.len(), first.steps as usize);
    assert_eq!(recorder.starts, 2);
}
