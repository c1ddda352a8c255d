//! Working-envelope probe.
//!
//! Drives the pipette from a home position towards each of the eight
//! corners of the workspace (every `±speed` sign combination on X/Y/Z) for a
//! fixed number of steps. The gantry's end stops halt it at the reachable
//! corner; the enclosing box of the eight corners is the working envelope.

use std::fmt::Write as _;

use ot2_common::bounds::Bounds;
use ot2_common::simulator::{Simulator, first_pipette_position};
use ot2_common::types::{Action, Axis, Vec3};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::ControlError;

/// Default probe speed per axis [m/s].
pub const DEFAULT_PROBE_SPEED: f64 = 0.9;

/// Default simulator steps spent driving towards each corner.
pub const DEFAULT_PROBE_STEPS: u32 = 130;

/// Result of an envelope probe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvelopeProbe {
    /// Reached pipette position per corner direction, in probe order.
    pub corners: Vec<Vec3>,
    /// Enclosing box of `corners`.
    pub bounds: Bounds,
}

/// Velocity direction for corner `index` (bit `i` set = positive on axis `i`).
///
/// Index 0 is `[-, -, -]`, index 1 `[+, -, -]`, ..., index 7 `[+, +, +]`.
pub fn corner_direction(index: usize, speed: f64) -> Vec3 {
    std::array::from_fn(|axis| if (index >> axis) & 1 == 1 { speed } else { -speed })
}

/// Probe the reachable workspace.
///
/// Before each corner the pipette is teleported to `home`. Every robot in
/// the simulation receives the same corner action; the first robot's
/// position is recorded.
pub fn probe_envelope<S: Simulator + ?Sized>(
    sim: &mut S,
    home: Vec3,
    speed: f64,
    steps: u32,
) -> Result<EnvelopeProbe, ControlError> {
    if !(speed.is_finite() && speed > 0.0) {
        return Err(ControlError::InvalidProbe(format!("speed {speed} must be > 0")));
    }
    if steps == 0 {
        return Err(ControlError::InvalidProbe("steps must be > 0".to_string()));
    }

    let robots = sim.get_states()?.len();
    let mut corners = Vec::with_capacity(8);

    for index in 0..8 {
        sim.set_start_position(home)?;
        let action = Action::velocity(corner_direction(index, speed));
        let actions = vec![action; robots.max(1)];

        let states = sim.run(&actions, steps)?;
        let reached = first_pipette_position(&states)?;
        debug!(
            "Corner {} v={:?} reached [{:.4}, {:.4}, {:.4}]",
            index + 1,
            action.velocity,
            reached[0],
            reached[1],
            reached[2]
        );
        corners.push(reached);
    }

    let bounds = Bounds::enclosing(&corners)
        .ok_or_else(|| ControlError::InvalidProbe("no corners recorded".to_string()))?;
    info!(
        "Probed envelope: low={:?} high={:?} extent={:?}",
        bounds.low,
        bounds.high,
        bounds.extent()
    );

    Ok(EnvelopeProbe { corners, bounds })
}

/// Render `bounds` as the "Working Envelope of the Pipette" markdown table.
pub fn envelope_markdown(bounds: &Bounds) -> String {
    let mut out = String::from("## Working Envelope of the Pipette\n\n");
    out.push_str("| Axis | Lower Limit | Upper Limit |\n");
    out.push_str("|------|-------------|-------------|\n");
    for axis in Axis::ALL {
        let i = axis.index();
        let _ = writeln!(out, "| {} | {} | {} |", axis, bounds.low[i], bounds.high[i]);
    }
    out
}
