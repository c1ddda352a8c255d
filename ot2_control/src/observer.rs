//! Control-loop observers.
//!
//! An observer is handed to
//! [`move_to_observed`](crate::control::system::ControllerSystem::move_to_observed)
//! and receives callbacks at run start, once per issued action, and at run
//! end. Trajectory capture and progress output hook in here.

use ot2_common::types::{Action, Vec3};
use tracing::{info, trace, warn};

use crate::run::ControllerRun;

/// Snapshot of one control iteration that issued an action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepSample {
    /// Zero-based iteration index.
    pub step: u32,
    /// Pipette position read at the start of the iteration [m].
    pub position: Vec3,
    /// Signed error `target - position` [m].
    pub error: Vec3,
    /// Action sent to the simulator.
    pub action: Action,
}

/// Callbacks from the control loop. All methods default to no-ops.
pub trait ControlObserver {
    /// A run towards `target` is starting.
    fn on_run_start(&mut self, _target: &Vec3, _tolerance: f64, _max_steps: u32) {}

    /// An action is about to be sent to the simulator.
    fn on_step(&mut self, _sample: &StepSample) {}

    /// The run finished (converged or budget exhausted).
    fn on_run_end(&mut self, _run: &ControllerRun) {}
}

/// Observer that ignores every callback.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ControlObserver for NoopObserver {}

/// Observer that forwards callbacks to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ControlObserver for TracingObserver {
    fn on_run_start(&mut self, target: &Vec3, tolerance: f64, max_steps: u32) {
        info!(
            "Moving to [{:.4}, {:.4}, {:.4}] (tol={}, max_steps={})",
            target[0], target[1], target[2], tolerance, max_steps
        );
    }

    fn on_step(&mut self, s: &StepSample) {
        trace!(
            step = s.step,
            ex = s.error[0],
            ey = s.error[1],
            ez = s.error[2],
            vx = s.action.velocity[0],
            vy = s.action.velocity[1],
            vz = s.action.velocity[2],
            "control step"
        );
    }

    fn on_run_end(&mut self, run: &ControllerRun) {
        if run.success {
            info!(
                "Reached target in {} steps, error=[{:.6}, {:.6}, {:.6}]",
                run.steps, run.error[0], run.error[1], run.error[2]
            );
        } else {
            warn!(
                "Target not reached after {} steps, error=[{:.6}, {:.6}, {:.6}]",
                run.steps, run.error[0], run.error[1], run.error[2]
            );
        }
    }
}

/// Observer that keeps every step sample and finished run in memory.
#[derive(Debug, Default, Clone)]
pub struct TrajectoryRecorder {
    /// Step samples across all observed runs, in order.
    pub samples: Vec<StepSample>,
    /// Finished runs, in order.
    pub runs: Vec<ControllerRun>,
    /// Number of `on_run_start` callbacks.
    pub starts: usize,
    /// Index into `samples` where the most recent run begins.
    run_offset: usize,
}

impl TrajectoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Samples of the most recent run.
    pub fn last_run_samples(&self) -> &[StepSample] {
        &self.samples[self.run_offset.min(self.samples.len())..]
    }
}

impl ControlObserver for TrajectoryRecorder {
    fn on_run_start(&mut self, _target: &Vec3, _tolerance: f64, _max_steps: u32) {
        self.starts += 1;
        self.run_offset = self.samples.len();
    }

    fn on_step(&mut self, sample: &StepSample) {
        self.samples.push(*sample);
    }

    fn on_run_end(&mut self, run: &ControllerRun) {
        self.runs.push(run.clone());
    }
}

/// Fan a callback out to two observers.
impl<A: ControlObserver, B: ControlObserver> ControlObserver for (A, B) {
    fn on_run_start(&mut self, target: &Vec3, tolerance: f64, max_steps: u32) {
        self.0.on_run_start(target, tolerance, max_steps);
        self.1.on_run_start(target, tolerance, max_steps);
    }

    fn on_step(&mut self, sample: &StepSample) {
        self.0.on_step(sample);
        self.1.on_step(sample);
    }

    fn on_run_end(&mut self, run: &ControllerRun) {
        self.0.on_run_end(run);
        self.1.on_run_end(run);
    }
}
