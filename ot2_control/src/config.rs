//! TOML configuration loader with validation.
//!
//! One file drives the whole binary:
//!
//! ```toml
//! [shared]
//! log_level = "info"
//! service_name = "ot2-control"
//!
//! [controller]
//! dt = 0.01
//! velocity_scale = 1.0
//! tolerance = 0.001
//! max_steps = 500
//!
//! [controller.gains]
//! x = { kp = 2.0, ki = 0.1, kd = 0.05 }
//! y = { kp = 2.0, ki = 0.1, kd = 0.05 }
//! z = { kp = 2.5, ki = 0.1, kd = 0.05 }
//!
//! [envelope]
//! low = [-0.187, -0.1705, 0.1695]
//! high = [0.253, 0.2195, 0.2908]
//!
//! [batch]
//! trials = 5
//! seed = 42
//!
//! [simulator]
//! time_step = 0.01
//! ```
//!
//! Every section and field has a default, so an empty file is valid.

use std::path::Path;

use ot2_common::bounds::Bounds;
use ot2_common::config::{ConfigError, ConfigLoader, SharedConfig};
use ot2_common::consts::{
    AXIS_COUNT, DEFAULT_BATCH_TRIALS, DEFAULT_DT, DEFAULT_GAINS_X, DEFAULT_GAINS_Y,
    DEFAULT_GAINS_Z, DEFAULT_MAX_STEPS, DEFAULT_TOLERANCE, DEFAULT_VELOCITY_SCALE,
};
use ot2_common::types::Axis;
use ot2_sim::SimulatorConfig;
use serde::{Deserialize, Serialize};

use crate::control::pid::PidGains;

// ─── Controller ─────────────────────────────────────────────────────

/// Per-axis gain table (`[controller.gains]`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AxisGains {
    #[serde(default = "default_gains_x")]
    pub x: PidGains,
    #[serde(default = "default_gains_y")]
    pub y: PidGains,
    #[serde(default = "default_gains_z")]
    pub z: PidGains,
}

fn default_gains_x() -> PidGains {
    PidGains::from_tuple(DEFAULT_GAINS_X)
}
fn default_gains_y() -> PidGains {
    PidGains::from_tuple(DEFAULT_GAINS_Y)
}
fn default_gains_z() -> PidGains {
    PidGains::from_tuple(DEFAULT_GAINS_Z)
}

impl Default for AxisGains {
    fn default() -> Self {
        Self {
            x: default_gains_x(),
            y: default_gains_y(),
            z: default_gains_z(),
        }
    }
}

impl AxisGains {
    /// Gains for one axis.
    pub fn get(&self, axis: Axis) -> &PidGains {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }

    /// Gains in axis array order.
    pub fn to_array(&self) -> [PidGains; AXIS_COUNT] {
        [self.x, self.y, self.z]
    }
}

/// `[controller]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ControllerConfig {
    /// PID update period passed to every axis [s].
    #[serde(default = "default_dt")]
    pub dt: f64,

    /// Multiplier from PID output to commanded velocity.
    #[serde(default = "default_velocity_scale")]
    pub velocity_scale: f64,

    /// Per-axis convergence tolerance [m].
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Iteration budget per move.
    #[serde(default = "default_max_steps")]
    pub max_steps: u32,

    /// Reject targets outside `[envelope]`.
    #[serde(default)]
    pub enforce_envelope: bool,

    #[serde(default)]
    pub gains: AxisGains,
}

fn default_dt() -> f64 {
    DEFAULT_DT
}
fn default_velocity_scale() -> f64 {
    DEFAULT_VELOCITY_SCALE
}
fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}
fn default_max_steps() -> u32 {
    DEFAULT_MAX_STEPS
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            dt: default_dt(),
            velocity_scale: default_velocity_scale(),
            tolerance: default_tolerance(),
            max_steps: default_max_steps(),
            enforce_envelope: false,
            gains: AxisGains::default(),
        }
    }
}

impl ControllerConfig {
    /// Validate parameter bounds.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(format!("dt {} must be > 0", self.dt));
        }
        if !self.velocity_scale.is_finite() {
            return Err(format!("velocity_scale {} not finite", self.velocity_scale));
        }
        if !(self.tolerance.is_finite() && self.tolerance >= 0.0) {
            return Err(format!("tolerance {} must be >= 0", self.tolerance));
        }
        for axis in Axis::ALL {
            if !self.gains.get(axis).is_finite() {
                return Err(format!("gains for axis {axis} not finite"));
            }
        }
        Ok(())
    }
}

// ─── Batch ──────────────────────────────────────────────────────────

/// `[batch]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatchConfig {
    /// Number of random targets.
    #[serde(default = "default_trials")]
    pub trials: usize,

    /// RNG seed. `None` = seeded from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Teleport the pipette to the simulator start position before each trial.
    #[serde(default)]
    pub home_between_trials: bool,

    /// Target sampling box. `None` = `[envelope]`.
    #[serde(default)]
    pub sample_bounds: Option<Bounds>,
}

fn default_trials() -> usize {
    DEFAULT_BATCH_TRIALS
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            trials: default_trials(),
            seed: None,
            home_between_trials: false,
            sample_bounds: None,
        }
    }
}

// ─── Bundle ─────────────────────────────────────────────────────────

/// Complete configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Ot2Config {
    #[serde(default)]
    pub shared: SharedConfig,
    #[serde(default)]
    pub controller: ControllerConfig,
    #[serde(default)]
    pub envelope: Bounds,
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub simulator: SimulatorConfig,
}

impl Ot2Config {
    /// Run every section's validation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        self.controller
            .validate()
            .map_err(|e| ConfigError::ValidationError(format!("controller: {e}")))?;
        self.envelope
            .validate()
            .map_err(|e| ConfigError::ValidationError(format!("envelope: {e}")))?;
        if let Some(b) = &self.batch.sample_bounds {
            b.validate()
                .map_err(|e| ConfigError::ValidationError(format!("batch.sample_bounds: {e}")))?;
        }
        self.simulator
            .validate()
            .map_err(|e| ConfigError::ValidationError(format!("simulator: {e}")))?;
        Ok(())
    }

    /// Box targets are sampled from.
    pub fn sample_bounds(&self) -> Bounds {
        self.batch.sample_bounds.unwrap_or(self.envelope)
    }
}

/// Load and validate a configuration file.
pub fn load_config(path: &Path) -> Result<Ot2Config, ConfigError> {
    let config = Ot2Config::load(path)?;
    config.validate()?;
    Ok(config)
}

/// Parse and validate configuration from a TOML string.
pub fn parse_config(content: &str) -> Result<Ot2Config, ConfigError> {
    let config = Ot2Config::from_toml(content)?;
    config.validate()?;
    Ok(config)
}
