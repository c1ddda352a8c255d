//! # OT-2 Control Library
//!
//! Closed-loop position control for the pipette of a simulated OT-2
//! liquid-handling robot. A 3-axis PID turns the position error into
//! per-axis velocity commands and steps the simulator until every axis is
//! within tolerance or the iteration budget runs out.
//!
//! ## Layers
//!
//! 1. **AxisPid**: stateful single-axis PID ([`control::pid`])
//! 2. **ControllerSystem**: three PIDs + convergence loop ([`control::system`])
//! 3. **BatchDriver**: random-target trials and error statistics ([`batch`])
//!
//! Supporting modules: [`observer`] (loop callbacks), [`envelope`]
//! (working-envelope probe), [`config`] (TOML loading), [`error`].
//!
//! ```rust
//! use ot2_control::control::pid::PidGains;
//! use ot2_control::control::system::ControllerSystem;
//! use ot2_sim::KinematicSimulator;
//!
//! let sim = KinematicSimulator::unbounded(0.01, [0.0, 0.0, 0.0]).unwrap();
//! let gains = [
//!     PidGains::new(2.0, 0.1, 0.05),
//!     PidGains::new(2.0, 0.1, 0.05),
//!     PidGains::new(2.5, 0.1, 0.05),
//! ];
//! let mut controller = ControllerSystem::new(sim, gains, 0.01).unwrap();
//! let run = controller.move_to([0.1, 0.0, 0.2], 0.001, 500).unwrap();
//! assert!(run.success);
//! ```

pub mod batch;
pub mod config;
pub mod control;
pub mod envelope;
pub mod error;
pub mod observer;
pub mod run;

pub use crate::batch::{BatchDriver, BatchSummary};
pub use crate::control::pid::{AxisPid, PidGains};
pub use crate::control::system::ControllerSystem;
pub use crate::error::ControlError;
pub use crate::observer::{ControlObserver, NoopObserver, TracingObserver, TrajectoryRecorder};
pub use crate::run::ControllerRun;
