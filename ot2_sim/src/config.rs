//! Simulator configuration.

use ot2_common::consts::DEFAULT_SIM_TIME_STEP;
use ot2_common::types::{Vec3, is_finite};
use serde::{Deserialize, Serialize};

/// `[simulator]` section.
///
/// # TOML Example
///
/// ```toml
/// [simulator]
/// time_step = 0.01
/// num_agents = 1
/// start_position = [0.0, 0.0, 0.2]
/// clamp_to_envelope = true
/// max_speed = 0.5
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulatorConfig {
    /// Simulated time per step [s].
    #[serde(default = "default_time_step")]
    pub time_step: f64,

    /// Number of robots (`robotId_1` .. `robotId_N`).
    #[serde(default = "default_num_agents")]
    pub num_agents: usize,

    /// Initial pipette position. Defaults to the envelope center, or the
    /// origin when the simulator has no envelope.
    #[serde(default)]
    pub start_position: Option<Vec3>,

    /// Keep the pipette inside the working envelope.
    #[serde(default = "default_clamp")]
    pub clamp_to_envelope: bool,

    /// Per-axis speed limit [m/s]. `None` = unlimited.
    #[serde(default)]
    pub max_speed: Option<f64>,
}

fn default_time_step() -> f64 {
    DEFAULT_SIM_TIME_STEP
}
fn default_num_agents() -> usize {
    1
}
fn default_clamp() -> bool {
    true
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            time_step: default_time_step(),
            num_agents: default_num_agents(),
            start_position: None,
            clamp_to_envelope: default_clamp(),
            max_speed: None,
        }
    }
}

impl SimulatorConfig {
    /// Validate parameter bounds.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.time_step.is_finite() && self.time_step > 0.0) {
            return Err(format!("time_step {} must be > 0", self.time_step));
        }
        if self.num_agents == 0 {
            return Err("num_agents must be at least 1".to_string());
        }
        if let Some(start) = &self.start_position {
            if !is_finite(start) {
                return Err(format!("start_position {start:?} not finite"));
            }
        }
        if let Some(limit) = self.max_speed {
            if !(limit.is_finite() && limit > 0.0) {
                return Err(format!("max_speed {limit} must be > 0"));
            }
        }
        Ok(())
    }
}
