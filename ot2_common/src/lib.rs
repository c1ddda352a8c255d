//! OT-2 Common Library
//!
//! Shared types, constants and configuration loading utilities for all
//! OT-2 workspace crates.
//!
//! # Module Structure
//!
//! - [`consts`] - Workspace-wide defaults (time step, tolerance, envelope)
//! - [`types`] - Axis indexing, 3-vectors and actuator actions
//! - [`bounds`] - Working-envelope bounding box
//! - [`config`] - Configuration loading traits and types
//! - [`simulator`] - Interface to the external pipette simulator
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use ot2_common::prelude::*;
//!
//! let action = Action::velocity([0.1, 0.0, -0.1]);
//! assert_eq!(action.to_array(), [0.1, 0.0, -0.1, 0.0]);
//! ```

pub mod bounds;
pub mod config;
pub mod consts;
pub mod prelude;
pub mod simulator;
pub mod types;
