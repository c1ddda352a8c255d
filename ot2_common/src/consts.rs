//! Workspace-wide constants.
//!
//! Single source of truth for default control parameters and the
//! measured working envelope of the pipette. Units are metres and seconds.

use crate::types::Vec3;

/// Number of controlled spatial axes.
pub const AXIS_COUNT: usize = 3;

/// Default PID update period [s].
pub const DEFAULT_DT: f64 = 0.01;

/// Default per-axis convergence tolerance [m] (1 mm).
pub const DEFAULT_TOLERANCE: f64 = 0.001;

/// Default iteration budget for a single move.
pub const DEFAULT_MAX_STEPS: u32 = 500;

/// Default multiplier applied to PID output before it is sent as velocity.
pub const DEFAULT_VELOCITY_SCALE: f64 = 1.0;

/// Lower corner of the measured pipette working envelope [m].
pub const ENVELOPE_LOW: Vec3 = [-0.187, -0.1705, 0.1695];

/// Upper corner of the measured pipette working envelope [m].
pub const ENVELOPE_HIGH: Vec3 = [0.253, 0.2195, 0.2908];

/// Default simulator step [s].
pub const DEFAULT_SIM_TIME_STEP: f64 = 0.01;

/// Default number of random targets in a batch test.
pub const DEFAULT_BATCH_TRIALS: usize = 5;

/// Tuned gains `(kp, ki, kd)` for the X axis.
pub const DEFAULT_GAINS_X: (f64, f64, f64) = (2.0, 0.1, 0.05);

/// Tuned gains `(kp, ki, kd)` for the Y axis.
pub const DEFAULT_GAINS_Y: (f64, f64, f64) = (2.0, 0.1, 0.05);

/// Tuned gains `(kp, ki, kd)` for the Z axis.
pub const DEFAULT_GAINS_Z: (f64, f64, f64) = (2.5, 0.1, 0.05);
