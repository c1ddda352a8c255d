//! Single-axis PID with forward-rectangle integration and raw
//! (unfiltered) error derivative.
//!
//! ```text
//! error      = target - current
//! integral  += error * dt
//! derivative = (error - prev_error) / dt
//! output     = kp*error + ki*integral + kd*derivative
//! ```
//!
//! The integral is unclamped; it is cleared before every new target.

use serde::{Deserialize, Serialize};

/// PID gains for one axis.
///
/// # TOML Example
///
/// ```toml
/// x = { kp = 2.0, ki = 0.1, kd = 0.05 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PidGains {
    /// Proportional gain.
    pub kp: f64,
    /// Integral gain (0 = disabled).
    #[serde(default)]
    pub ki: f64,
    /// Derivative gain (0 = disabled).
    #[serde(default)]
    pub kd: f64,
}

impl PidGains {
    pub const fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self { kp, ki, kd }
    }

    /// Gains from a `(kp, ki, kd)` tuple.
    pub const fn from_tuple(g: (f64, f64, f64)) -> Self {
        Self::new(g.0, g.1, g.2)
    }

    /// Returns true if all gains are finite.
    pub fn is_finite(&self) -> bool {
        self.kp.is_finite() && self.ki.is_finite() && self.kd.is_finite()
    }
}

/// Stateful single-axis PID.
///
/// Integral accumulator and previous error carry feedback memory between
/// updates of one control run. Call [`AxisPid::reset`] before pursuing a new
/// target.
#[derive(Debug, Clone)]
pub struct AxisPid {
    gains: PidGains,
    integral: f64,
    prev_error: f64,
}

impl AxisPid {
    pub fn new(gains: PidGains) -> Self {
        Self {
            gains,
            integral: 0.0,
            prev_error: 0.0,
        }
    }

    /// Compute one control output.
    ///
    /// `dt` must be positive and constant across a run; callers validate it
    /// once at their boundary.
    #[inline]
    pub fn update(&mut self, target: f64, current: f64, dt: f64) -> f64 {
        debug_assert!(dt > 0.0, "PID time step must be positive, got {dt}");

        let error = target - current;
        self.integral += error * dt;
        let derivative = (error - self.prev_error) / dt;
        self.prev_error = error;

        self.gains.kp * error + self.gains.ki * self.integral + self.gains.kd * derivative
    }

    /// Zero the integral accumulator and previous error.
    #[inline]
    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.prev_error = 0.0;
    }

    #[inline]
    pub fn gains(&self) -> &PidGains {
        &self.gains
    }

    #[inline]
    pub fn integral(&self) -> f64 {
        self.integral
    }

    #[inline]
    pub fn prev_error(&self) -> f64 {
        self.prev_error
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
