//! Multi-axis convergence loop.
//!
//! `ControllerSystem` owns one [`AxisPid`] per spatial axis and a simulator.
//! Each iteration of [`ControllerSystem::move_to`]:
//!
//! 1. reads the pipette position from the simulator,
//! 2. computes the absolute error on every axis,
//! 3. stops with success if all three errors are within tolerance,
//! 4. otherwise sends `velocity_scale * pid.update(..)` per axis as one
//!    action and advances the simulator by exactly one step.
//!
//! Convergence is checked before a new command is computed, so nothing is
//! sent after the iteration that detected success.

use std::time::Instant;

use ot2_common::bounds::Bounds;
use ot2_common::consts::AXIS_COUNT;
use ot2_common::simulator::{Simulator, first_pipette_position};
use ot2_common::types::{Action, Axis, Vec3, abs_error, is_finite};
use tracing::{debug, trace};

use crate::config::ControllerConfig;
use crate::control::pid::{AxisPid, PidGains};
use crate::error::ControlError;
use crate::observer::{ControlObserver, NoopObserver, StepSample};
use crate::run::ControllerRun;

/// Three-axis PID position controller bound to a simulator.
#[derive(Debug)]
pub struct ControllerSystem<S> {
    sim: S,
    axes: [AxisPid; AXIS_COUNT],
    dt: f64,
    velocity_scale: f64,
    envelope: Option<Bounds>,
    actions: Vec<Action>,
}

impl<S: Simulator> ControllerSystem<S> {
    /// Create a controller with unit velocity scale and no envelope check.
    ///
    /// # Errors
    /// `ControlError::InvalidTimeStep` if `dt` is not finite and positive.
    pub fn new(sim: S, gains: [PidGains; AXIS_COUNT], dt: f64) -> Result<Self, ControlError> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(ControlError::InvalidTimeStep(dt));
        }
        Ok(Self {
            sim,
            axes: gains.map(AxisPid::new),
            dt,
            velocity_scale: 1.0,
            envelope: None,
            actions: Vec::with_capacity(1),
        })
    }

    /// Create a controller from the `[controller]` section.
    ///
    /// `envelope` is enforced only when `enforce_envelope` is set.
    pub fn from_config(
        sim: S,
        config: &ControllerConfig,
        envelope: &Bounds,
    ) -> Result<Self, ControlError> {
        let system = Self::new(sim, config.gains.to_array(), config.dt)?
            .with_velocity_scale(config.velocity_scale)?;
        Ok(if config.enforce_envelope {
            system.with_envelope(*envelope)
        } else {
            system
        })
    }

    /// Set the multiplier applied to PID output before it is sent as velocity.
    pub fn with_velocity_scale(mut self, scale: f64) -> Result<Self, ControlError> {
        if !scale.is_finite() {
            return Err(ControlError::InvalidVelocityScale(scale));
        }
        self.velocity_scale = scale;
        Ok(self)
    }

    /// Reject targets outside `envelope`.
    pub fn with_envelope(mut self, envelope: Bounds) -> Self {
        self.envelope = Some(envelope);
        self
    }

    pub fn axis(&self, axis: Axis) -> &AxisPid {
        &self.axes[axis.index()]
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn velocity_scale(&self) -> f64 {
        self.velocity_scale
    }

    pub fn envelope(&self) -> Option<&Bounds> {
        self.envelope.as_ref()
    }

    pub fn simulator(&self) -> &S {
        &self.sim
    }

    pub fn simulator_mut(&mut self) -> &mut S {
        &mut self.sim
    }

    pub fn into_simulator(self) -> S {
        self.sim
    }

    /// Clear integral and derivative memory on every axis.
    pub fn reset(&mut self) {
        for pid in &mut self.axes {
            pid.reset();
        }
    }

    /// Current pipette position of the controlled robot.
    pub fn current_position(&self) -> Result<Vec3, ControlError> {
        let states = self.sim.get_states()?;
        Ok(first_pipette_position(&states)?)
    }

    /// Drive the pipette to `target`.
    ///
    /// Returns `Ok` whether or not the target was reached; check
    /// [`ControllerRun::success`]. With `max_steps == 0` the initial position
    /// is reported and the simulator is never stepped.
    pub fn move_to(
        &mut self,
        target: Vec3,
        tolerance: f64,
        max_steps: u32,
    ) -> Result<ControllerRun, ControlError> {
        self.move_to_observed(target, tolerance, max_steps, &mut NoopObserver)
    }

    /// [`move_to`](Self::move_to) with observer callbacks.
    pub fn move_to_observed(
        &mut self,
        target: Vec3,
        tolerance: f64,
        max_steps: u32,
        observer: &mut dyn ControlObserver,
    ) -> Result<ControllerRun, ControlError> {
        self.validate_request(&target, tolerance)?;

        self.reset();
        observer.on_run_start(&target, tolerance, max_steps);
        debug!(
            "move_to [{:.4}, {:.4}, {:.4}] tol={} max_steps={}",
            target[0], target[1], target[2], tolerance, max_steps
        );

        let started = Instant::now();
        let mut steps = 0u32;
        let mut converged = None;

        for step in 0..max_steps {
            let states = self.sim.get_states()?;
            let position = first_pipette_position(&states)?;
            let error = abs_error(&target, &position);

            if error.iter().all(|e| *e <= tolerance) {
                converged = Some((position, error));
                break;
            }

            let mut velocity = [0.0; AXIS_COUNT];
            for axis in Axis::ALL {
                let i = axis.index();
                velocity[i] =
                    self.velocity_scale * self.axes[i].update(target[i], position[i], self.dt);
            }
            let action = Action::velocity(velocity);

            observer.on_step(&StepSample {
                step,
                position,
                error: [
                    target[0] - position[0],
                    target[1] - position[1],
                    target[2] - position[2],
                ],
                action,
            });
            trace!(
                "step {step}: err=[{:.6}, {:.6}, {:.6}] v=[{:.5}, {:.5}, {:.5}]",
                error[0], error[1], error[2], velocity[0], velocity[1], velocity[2]
            );

            // The first robot is controlled; any others hold still.
            self.actions.clear();
            self.actions.push(action);
            self.actions
                .extend(std::iter::repeat_n(Action::idle(), states.len().saturating_sub(1)));
            self.sim.run(&self.actions, 1)?;
            steps += 1;
        }

        let (success, final_position, error) = match converged {
            Some((position, error)) => (true, position, error),
            None => {
                let position = self.current_position()?;
                (false, position, abs_error(&target, &position))
            }
        };

        let run = ControllerRun {
            target,
            tolerance,
            max_steps,
            final_position,
            error,
            success,
            steps,
            elapsed: started.elapsed(),
        };
        debug!(
            "move_to finished: success={} steps={} error=[{:.6}, {:.6}, {:.6}]",
            run.success, run.steps, run.error[0], run.error[1], run.error[2]
        );
        observer.on_run_end(&run);
        Ok(run)
    }

    fn validate_request(&self, target: &Vec3, tolerance: f64) -> Result<(), ControlError> {
        if !(tolerance.is_finite() && tolerance >= 0.0) {
            return Err(ControlError::InvalidTolerance(tolerance));
        }
        if !is_finite(target) {
            return Err(ControlError::InvalidTarget(*target));
        }
        if let Some(envelope) = &self.envelope {
            if !envelope.contains(target) {
                return Err(ControlError::TargetOutOfEnvelope {
                    target: *target,
                    envelope: *envelope,
                });
            }
        }
        Ok(())
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
