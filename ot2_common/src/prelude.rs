//! Prelude module for common re-exports.
//!
//! ```rust
//! use ot2_common::prelude::*;
//! ```

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, LogLevel, SharedConfig};

// ─── Constants ──────────────────────────────────────────────────────
pub use crate::consts::{
    AXIS_COUNT, DEFAULT_DT, DEFAULT_MAX_STEPS, DEFAULT_TOLERANCE, ENVELOPE_HIGH, ENVELOPE_LOW,
};

// ─── Geometry ───────────────────────────────────────────────────────
pub use crate::bounds::Bounds;
pub use crate::types::{Action, Axis, Vec3, abs_error};

// ─── Simulator ──────────────────────────────────────────────────────
pub use crate::simulator::{RobotState, RobotStates, SimError, Simulator, first_pipette_position};
