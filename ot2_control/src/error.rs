//! Controller error types.
//!
//! Failing to converge is not an error: it is reported through
//! [`ControllerRun::success`](crate::run::ControllerRun::success). Errors here
//! cover malformed input rejected at the boundary and simulator failures.

use ot2_common::bounds::Bounds;
use ot2_common::config::ConfigError;
use ot2_common::simulator::SimError;
use ot2_common::types::Vec3;
use thiserror::Error;

/// Errors raised by the controller and the batch driver.
#[derive(Debug, Clone, Error)]
pub enum ControlError {
    /// PID time step must be finite and positive.
    #[error("Invalid time step: {0} (must be > 0)")]
    InvalidTimeStep(f64),

    /// Velocity multiplier must be finite.
    #[error("Invalid velocity scale: {0}")]
    InvalidVelocityScale(f64),

    /// Convergence tolerance must be finite and non-negative.
    #[error("Invalid tolerance: {0} (must be >= 0)")]
    InvalidTolerance(f64),

    /// Target contains NaN / Inf.
    #[error("Invalid target: {0:?}")]
    InvalidTarget(Vec3),

    /// Target lies outside the enforced working envelope.
    #[error("Target {target:?} outside envelope {envelope:?}")]
    TargetOutOfEnvelope {
        /// Requested target.
        target: Vec3,
        /// Enforced envelope.
        envelope: Bounds,
    },

    /// Envelope probe parameters rejected.
    #[error("Invalid envelope probe: {0}")]
    InvalidProbe(String),

    /// Simulator call failed.
    #[error("Simulator error: {0}")]
    Simulator(#[from] SimError),

    /// Configuration could not be loaded or validated.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
