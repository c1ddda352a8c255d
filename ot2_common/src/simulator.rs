//! Simulator trait and error types.
//!
//! This module defines:
//! - `Simulator` trait - Interface to the pipette-robot simulation
//! - `SimError` enum - Error types for simulator operations
//! - `RobotState` / `RobotStates` - State snapshot returned by the simulator

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::types::{Action, Vec3};

/// Error types for simulator operations.
#[derive(Debug, Clone, Error)]
pub enum SimError {
    /// The state snapshot contained no robots.
    #[error("Simulator reported no robots")]
    NoRobots,

    /// A robot referenced by id is not part of the simulation.
    #[error("Unknown robot: {0}")]
    UnknownRobot(String),

    /// Action vector count does not match the number of robots.
    #[error("Expected {expected} action(s), got {got}")]
    ActionCount {
        /// Number of robots in the simulation.
        expected: usize,
        /// Number of actions supplied.
        got: usize,
    },

    /// An action or position contained NaN / Inf.
    #[error("Non-finite value in {0}")]
    NonFinite(&'static str),

    /// Simulator configuration rejected.
    #[error("Invalid simulator configuration: {0}")]
    InvalidConfig(String),

    /// Backend-specific failure.
    #[error("Simulation backend error: {0}")]
    Backend(String),
}

/// State of one robot as reported by the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RobotState {
    /// Pipette tip position [m].
    pub pipette_position: Vec3,
}

/// Snapshot of every robot, keyed by robot identifier.
pub type RobotStates = BTreeMap<String, RobotState>;

/// Pipette position of the first robot in the snapshot.
///
/// Single-agent simulations expose exactly one robot; map order makes the
/// choice deterministic when there are more.
pub fn first_pipette_position(states: &RobotStates) -> Result<Vec3, SimError> {
    states
        .values()
        .next()
        .map(|s| s.pipette_position)
        .ok_or(SimError::NoRobots)
}

/// Interface to the external liquid-handling robot simulation.
///
/// The controller only ever reads state and advances the simulation; it
/// never inspects physics internals.
///
/// # Lifecycle
///
/// 1. `set_start_position()` / `reset()` - place the pipette
/// 2. `get_states()` - read positions
/// 3. `run()` - apply one action per robot for `num_steps` steps
pub trait Simulator {
    /// Current state of every robot.
    fn get_states(&self) -> Result<RobotStates, SimError>;

    /// Apply `actions` (one per robot) for `num_steps` simulation steps and
    /// return the resulting state.
    fn run(&mut self, actions: &[Action], num_steps: u32) -> Result<RobotStates, SimError>;

    /// Teleport every robot's pipette to `position` with zero velocity.
    fn set_start_position(&mut self, position: Vec3) -> Result<(), SimError>;

    /// Return the simulation to its initial state.
    fn reset(&mut self) -> Result<(), SimError>;

    /// Simulated time advanced by one step [s], if the backend knows it.
    fn time_step(&self) -> Option<f64> {
        None
    }
}

impl<S: Simulator + ?Sized> Simulator for &mut S {
    fn get_states(&self) -> Result<RobotStates, SimError> {
        (**self).get_states()
    }

    fn run(&mut self, actions: &[Action], num_steps: u32) -> Result<RobotStates, SimError> {
        (**self).run(actions, num_steps)
    }

    fn set_start_position(&mut self, position: Vec3) -> Result<(), SimError> {
        (**self).set_start_position(position)
    }

    fn reset(&mut self) -> Result<(), SimError> {
        (**self).reset()
    }

    fn time_step(&self) -> Option<f64> {
        (**self).time_step()
    }
}
