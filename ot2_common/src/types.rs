//! Core value types shared between the controller and the simulator.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::consts::AXIS_COUNT;

/// Cartesian 3-vector `[x, y, z]` in metres (or m/s for velocities).
pub type Vec3 = [f64; AXIS_COUNT];

/// Spatial axis of the pipette gantry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All axes in array order.
    pub const ALL: [Axis; AXIS_COUNT] = [Axis::X, Axis::Y, Axis::Z];

    /// Index of this axis into a [`Vec3`].
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "X"),
            Axis::Y => write!(f, "Y"),
            Axis::Z => write!(f, "Z"),
        }
    }
}

/// Component-wise absolute difference `|target - position|`.
#[inline]
pub fn abs_error(target: &Vec3, position: &Vec3) -> Vec3 {
    [
        (target[0] - position[0]).abs(),
        (target[1] - position[1]).abs(),
        (target[2] - position[2]).abs(),
    ]
}

/// Returns true if every component is finite (not NaN, not Inf).
#[inline]
pub fn is_finite(v: &Vec3) -> bool {
    v.iter().all(|c| c.is_finite())
}

/// One actuator command for a single robot.
///
/// The simulator consumes 4-element actions: three Cartesian velocities
/// followed by an auxiliary channel driving the drop / gripper actuator.
/// Position control never touches the auxiliary channel, so [`Action::velocity`]
/// always sets it to `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Commanded velocity per axis [m/s].
    pub velocity: Vec3,
    /// Auxiliary actuator value (drop / gripper). Zero for motion-only commands.
    pub aux: f64,
}

impl Action {
    /// Motion-only action with the auxiliary channel held at zero.
    #[inline]
    pub const fn velocity(velocity: Vec3) -> Self {
        Self { velocity, aux: 0.0 }
    }

    /// Zero-velocity, zero-aux action.
    #[inline]
    pub const fn idle() -> Self {
        Self::velocity([0.0; AXIS_COUNT])
    }

    /// Flatten into the simulator's `[vx, vy, vz, aux]` layout.
    #[inline]
    pub fn to_array(&self) -> [f64; 4] {
        [self.velocity[0], self.velocity[1], self.velocity[2], self.aux]
    }
}

impl Default for Action {
    fn default() -> Self {
        Self::idle()
    }
}
