//! Working-envelope bounding box.

use serde::{Deserialize, Serialize};

use crate::consts::{AXIS_COUNT, ENVELOPE_HIGH, ENVELOPE_LOW};
use crate::types::Vec3;

/// Axis-aligned box `[low, high]` of reachable pipette positions.
///
/// # TOML Example
///
/// ```toml
/// [envelope]
/// low = [-0.187, -0.1705, 0.1695]
/// high = [0.253, 0.2195, 0.2908]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Lower corner.
    pub low: Vec3,
    /// Upper corner.
    pub high: Vec3,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            low: ENVELOPE_LOW,
            high: ENVELOPE_HIGH,
        }
    }
}

impl Bounds {
    pub const fn new(low: Vec3, high: Vec3) -> Self {
        Self { low, high }
    }

    /// Smallest box containing every point. `None` for an empty slice.
    pub fn enclosing(points: &[Vec3]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut low = *first;
        let mut high = *first;
        for p in rest {
            for i in 0..AXIS_COUNT {
                low[i] = low[i].min(p[i]);
                high[i] = high[i].max(p[i]);
            }
        }
        Some(Self { low, high })
    }

    /// Validate that both corners are finite and `low <= high` on every axis.
    pub fn validate(&self) -> Result<(), String> {
        for i in 0..AXIS_COUNT {
            let (lo, hi) = (self.low[i], self.high[i]);
            if !lo.is_finite() || !hi.is_finite() {
                return Err(format!("bounds axis {i} not finite: [{lo}, {hi}]"));
            }
            if lo > hi {
                return Err(format!("bounds axis {i} inverted: low {lo} > high {hi}"));
            }
        }
        Ok(())
    }

    /// Inclusive containment test.
    #[inline]
    pub fn contains(&self, p: &Vec3) -> bool {
        (0..AXIS_COUNT).all(|i| p[i] >= self.low[i] && p[i] <= self.high[i])
    }

    /// Project a point onto the box.
    #[inline]
    pub fn clamp(&self, p: &Vec3) -> Vec3 {
        [
            p[0].clamp(self.low[0], self.high[0]),
            p[1].clamp(self.low[1], self.high[1]),
            p[2].clamp(self.low[2], self.high[2]),
        ]
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        [
            0.5 * (self.low[0] + self.high[0]),
            0.5 * (self.low[1] + self.high[1]),
            0.5 * (self.low[2] + self.high[2]),
        ]
    }

    /// Edge length per axis.
    #[inline]
    pub fn extent(&self) -> Vec3 {
        [
            self.high[0] - self.low[0],
            self.high[1] - self.low[1],
            self.high[2] - self.low[2],
        ]
    }
}
