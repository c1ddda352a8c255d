//! Record of a single move-to-target attempt.

use ot2_common::types::Vec3;
use serde::Serialize;
use std::time::Duration;

/// Outcome of one [`move_to`](crate::control::system::ControllerSystem::move_to) call.
///
/// Created per trial and handed back to the caller; the controller keeps no
/// reference to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControllerRun {
    /// Requested pipette position [m].
    pub target: Vec3,
    /// Per-axis convergence tolerance [m].
    pub tolerance: f64,
    /// Iteration budget.
    pub max_steps: u32,
    /// Position at convergence, or the final snapshot after the budget ran out.
    ///
    /// On exhaustion this is read after the last action was applied, not the
    /// position the last iteration started from.
    pub final_position: Vec3,
    /// `|target - final_position|` per axis [m].
    pub error: Vec3,
    /// All three axis errors were within tolerance before the budget ran out.
    pub success: bool,
    /// Actions sent to the simulator.
    pub steps: u32,
    /// Wall-clock duration of the run.
    pub elapsed: Duration,
}

impl ControllerRun {
    /// Largest per-axis error [m].
    pub fn max_error(&self) -> f64 {
        self.error.iter().copied().fold(0.0, f64::max)
    }

    /// Euclidean distance between target and final position [m].
    pub fn distance(&self) -> f64 {
        self.error.iter().map(|e| e * e).sum::<f64>().sqrt()
    }
}
