//! Control engine root.
//!
//! Three homogeneous single-axis PIDs ([`pid`]) driven by a convergence
//! loop that steps the simulator ([`system`]).

pub mod pid;
pub mod system;
