//! Kinematic pipette simulator.
//!
//! Each robot's pipette integrates its commanded velocity exactly:
//! `position += velocity * time_step`. There is no inertia, so a command is
//! fully realised within one step. Optional per-axis speed limiting and
//! envelope clamping emulate the gantry's end stops.

use ot2_common::bounds::Bounds;
use ot2_common::simulator::{RobotState, RobotStates, SimError, Simulator};
use ot2_common::types::{Action, Vec3, is_finite};
use tracing::{debug, info, trace};

use crate::config::SimulatorConfig;

/// One simulated pipette.
#[derive(Debug, Clone)]
struct PipetteBody {
    id: String,
    position: Vec3,
    velocity: Vec3,
}

/// Deterministic [`Simulator`] with a linear velocity response.
#[derive(Debug, Clone)]
pub struct KinematicSimulator {
    config: SimulatorConfig,
    envelope: Option<Bounds>,
    start_position: Vec3,
    bodies: Vec<PipetteBody>,
    steps: u64,
    run_calls: u64,
}

impl KinematicSimulator {
    /// Create a simulator.
    ///
    /// `envelope` is used for clamping when `config.clamp_to_envelope` is
    /// set, and as the source of the default start position (its center).
    pub fn new(config: SimulatorConfig, envelope: Option<Bounds>) -> Result<Self, SimError> {
        config.validate().map_err(SimError::InvalidConfig)?;
        if let Some(b) = &envelope {
            b.validate().map_err(SimError::InvalidConfig)?;
        }

        let clamp_envelope = if config.clamp_to_envelope { envelope } else { None };
        let start = config
            .start_position
            .or_else(|| envelope.map(|b| b.center()))
            .unwrap_or([0.0; 3]);
        let start = clamp_envelope.map_or(start, |b| b.clamp(&start));

        let bodies = (1..=config.num_agents)
            .map(|n| PipetteBody {
                id: format!("robotId_{n}"),
                position: start,
                velocity: [0.0; 3],
            })
            .collect();

        info!(
            "Kinematic simulator: {} robot(s), dt={}s, start={:?}, clamp={}",
            config.num_agents,
            config.time_step,
            start,
            clamp_envelope.is_some()
        );

        Ok(Self {
            config,
            envelope: clamp_envelope,
            start_position: start,
            bodies,
            steps: 0,
            run_calls: 0,
        })
    }

    /// Unclamped single-robot simulator starting at `start`.
    pub fn unbounded(time_step: f64, start: Vec3) -> Result<Self, SimError> {
        let config = SimulatorConfig {
            time_step,
            start_position: Some(start),
            clamp_to_envelope: false,
            ..SimulatorConfig::default()
        };
        Self::new(config, None)
    }

    /// Total simulation steps executed since construction or `reset`.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Number of `run` calls since construction or `reset`.
    pub fn run_calls(&self) -> u64 {
        self.run_calls
    }

    /// Envelope enforced by clamping, if any.
    pub fn envelope(&self) -> Option<&Bounds> {
        self.envelope.as_ref()
    }

    fn limit_speed(&self, v: Vec3) -> Vec3 {
        match self.config.max_speed {
            Some(limit) => [
                v[0].clamp(-limit, limit),
                v[1].clamp(-limit, limit),
                v[2].clamp(-limit, limit),
            ],
            None => v,
        }
    }

    fn step_body(body: &mut PipetteBody, velocity: Vec3, dt: f64, envelope: Option<&Bounds>) {
        let mut next = [
            body.position[0] + velocity[0] * dt,
            body.position[1] + velocity[1] * dt,
            body.position[2] + velocity[2] * dt,
        ];
        body.velocity = velocity;

        if let Some(b) = envelope {
            let clamped = b.clamp(&next);
            for i in 0..3 {
                // End stop: motion into the wall is absorbed.
                if clamped[i] != next[i] {
                    body.velocity[i] = 0.0;
                }
            }
            next = clamped;
        }
        body.position = next;
    }

    fn snapshot(&self) -> RobotStates {
        self.bodies
            .iter()
            .map(|b| {
                (
                    b.id.clone(),
                    RobotState {
                        pipette_position: b.position,
                    },
                )
            })
            .collect()
    }
}

impl Simulator for KinematicSimulator {
    fn get_states(&self) -> Result<RobotStates, SimError> {
        Ok(self.snapshot())
    }

    fn run(&mut self, actions: &[Action], num_steps: u32) -> Result<RobotStates, SimError> {
        if actions.len() != self.bodies.len() {
            return Err(SimError::ActionCount {
                expected: self.bodies.len(),
                got: actions.len(),
            });
        }
        if actions
            .iter()
            .any(|a| !is_finite(&a.velocity) || !a.aux.is_finite())
        {
            return Err(SimError::NonFinite("action"));
        }

        self.run_calls += 1;
        let dt = self.config.time_step;
        let velocities: Vec<Vec3> = actions.iter().map(|a| self.limit_speed(a.velocity)).collect();

        for _ in 0..num_steps {
            for (body, v) in self.bodies.iter_mut().zip(&velocities) {
                Self::step_body(body, *v, dt, self.envelope.as_ref());
            }
            self.steps += 1;
        }

        if let Some(body) = self.bodies.first() {
            trace!(
                "sim step {}: pos=[{:.5}, {:.5}, {:.5}] vel=[{:.4}, {:.4}, {:.4}]",
                self.steps,
                body.position[0],
                body.position[1],
                body.position[2],
                body.velocity[0],
                body.velocity[1],
                body.velocity[2]
            );
        }

        Ok(self.snapshot())
    }

    fn set_start_position(&mut self, position: Vec3) -> Result<(), SimError> {
        if !is_finite(&position) {
            return Err(SimError::NonFinite("start position"));
        }
        let position = self.envelope.map_or(position, |b| b.clamp(&position));
        for body in &mut self.bodies {
            body.position = position;
            body.velocity = [0.0; 3];
        }
        debug!("Start position set to {:?}", position);
        Ok(())
    }

    fn reset(&mut self) -> Result<(), SimError> {
        let start = self.start_position;
        for body in &mut self.bodies {
            body.position = start;
            body.velocity = [0.0; 3];
        }
        self.steps = 0;
        self.run_calls = 0;
        debug!("Simulator reset to {:?}", start);
        Ok(())
    }

    fn time_step(&self) -> Option<f64> {
        Some(self.config.time_step)
    }
}
