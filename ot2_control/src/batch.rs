//! Batch test driver.
//!
//! Samples random targets uniformly inside a bounding box, runs one
//! `move_to` per target and aggregates per-axis mean / max absolute error.
//! A trial that fails to converge is not retried; the next trial simply
//! draws a new target.

use ot2_common::bounds::Bounds;
use ot2_common::config::ConfigError;
use ot2_common::consts::AXIS_COUNT;
use ot2_common::simulator::Simulator;
use ot2_common::types::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::Ot2Config;
use crate::control::system::ControllerSystem;
use crate::error::ControlError;
use crate::observer::ControlObserver;
use crate::run::ControllerRun;

/// Draw a target uniformly from `bounds` (inclusive on every axis).
pub fn sample_target<R: Rng>(rng: &mut R, bounds: &Bounds) -> Vec3 {
    std::array::from_fn(|i| rng.gen_range(bounds.low[i]..=bounds.high[i]))
}

/// Aggregate of a batch of runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    /// Number of runs.
    pub trials: usize,
    /// Runs that converged.
    pub successes: usize,
    /// Mean absolute error per axis [m]. Zero for an empty batch.
    pub mean_error: Vec3,
    /// Max absolute error per axis [m]. Zero for an empty batch.
    pub max_error: Vec3,
    /// Individual runs, in trial order.
    pub runs: Vec<ControllerRun>,
}

impl BatchSummary {
    pub fn from_runs(runs: Vec<ControllerRun>) -> Self {
        let mut sum = [0.0; AXIS_COUNT];
        let mut max_error = [0.0; AXIS_COUNT];
        for run in &runs {
            for i in 0..AXIS_COUNT {
                sum[i] += run.error[i];
                max_error[i] = f64::max(max_error[i], run.error[i]);
            }
        }
        let mean_error = if runs.is_empty() {
            [0.0; AXIS_COUNT]
        } else {
            sum.map(|s| s / runs.len() as f64)
        };

        Self {
            trials: runs.len(),
            successes: runs.iter().filter(|r| r.success).count(),
            mean_error,
            max_error,
            runs,
        }
    }

    /// Fraction of converged runs in `[0, 1]`. Zero for an empty batch.
    pub fn success_rate(&self) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            self.successes as f64 / self.trials as f64
        }
    }
}

/// Runs `trials` random-target moves against one controller.
#[derive(Debug)]
pub struct BatchDriver {
    trials: usize,
    bounds: Bounds,
    tolerance: f64,
    max_steps: u32,
    home_between_trials: bool,
    rng: StdRng,
}

impl BatchDriver {
    /// Driver sampling from `bounds` with a fixed RNG seed.
    pub fn new(trials: usize, bounds: Bounds, tolerance: f64, max_steps: u32, seed: u64) -> Self {
        Self {
            trials,
            bounds,
            tolerance,
            max_steps,
            home_between_trials: false,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Driver built from the `[batch]` and `[controller]` sections.
    pub fn from_config(config: &Ot2Config) -> Self {
        let rng = match config.batch.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            trials: config.batch.trials,
            bounds: config.sample_bounds(),
            tolerance: config.controller.tolerance,
            max_steps: config.controller.max_steps,
            home_between_trials: config.batch.home_between_trials,
            rng,
        }
    }

    /// Reset the simulator to its start position before every trial.
    pub fn with_homing(mut self, home: bool) -> Self {
        self.home_between_trials = home;
        self
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Draw the next target.
    pub fn next_target(&mut self) -> Vec3 {
        sample_target(&mut self.rng, &self.bounds)
    }

    /// Execute every trial and summarise.
    ///
    /// # Errors
    /// Malformed input or simulator failures abort the batch; non-convergence
    /// does not.
    pub fn run<S: Simulator>(
        &mut self,
        controller: &mut ControllerSystem<S>,
        observer: &mut dyn ControlObserver,
    ) -> Result<BatchSummary, ControlError> {
        self.bounds
            .validate()
            .map_err(|e| ControlError::Config(ConfigError::ValidationError(e)))?;

        info!(
            "Batch: {} trial(s), tol={} m, max_steps={}",
            self.trials, self.tolerance, self.max_steps
        );

        let mut runs = Vec::with_capacity(self.trials);
        for trial in 1..=self.trials {
            if self.home_between_trials {
                controller.simulator_mut().reset()?;
            }
            let target = self.next_target();
            debug!("[trial {trial}] target = {:?}", target);

            let run =
                controller.move_to_observed(target, self.tolerance, self.max_steps, observer)?;
            if run.success {
                info!(
                    "[trial {trial}] reached in {} steps ({:.2?}), error = [{:.6}, {:.6}, {:.6}] m",
                    run.steps, run.elapsed, run.error[0], run.error[1], run.error[2]
                );
            } else {
                warn!(
                    "[trial {trial}] not reached after {} steps, worst axis error = {:.6} m",
                    run.steps,
                    run.max_error()
                );
            }
            runs.push(run);
        }

        let summary = BatchSummary::from_runs(runs);
        info!(
            "Batch done: {}/{} reached, mean error = {:?} m, max error = {:?} m",
            summary.successes, summary.trials, summary.mean_error, summary.max_error
        );
        Ok(summary)
    }
}
