//! # OT-2 Simulation Library
//!
//! Deterministic kinematic simulation of the OT-2 pipette gantry.
//!
//! The real liquid-handling simulator is an external physics engine; this
//! crate provides a stand-in implementing the same
//! [`Simulator`](ot2_common::simulator::Simulator) interface with a linear
//! velocity response, so controllers can be developed and tested without it.
//!
//! # Module Structure
//!
//! - [`config`] - Simulator configuration (`[simulator]` TOML section)
//! - [`kinematic`] - `KinematicSimulator`, the `Simulator` implementation
//!
//! # Model
//!
//! ```text
//!   action.velocity ──► clamp(±max_speed) ──► pos += v·dt ──► clamp(envelope)
//! ```

#![deny(missing_docs)]

pub mod config;
pub mod kinematic;

pub use crate::config::SimulatorConfig;
pub use crate::kinematic::KinematicSimulator;
