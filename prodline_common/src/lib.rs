//! Production Line Common Library
//!
//! Shared types used by every crate of the production line workspace.
//!
//! # Module Structure
//!
//! - [`config`] - Line configuration, TOML loading, process-wide instance
//! - [`consts`] - Defaults and fixed limits
//! - [`state`] - `MachineState` enumeration
//! - [`metrics`] - Metrics snapshot and append-only history
//! - [`observer`] - Observer capability consumed by visualization/logging
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use prodline_common::prelude::*;
//!
//! let config = LineConfig::default();
//! assert_eq!(config.sensor_count, 4);
//! assert_eq!(MachineState::default(), MachineState::Idle);
//! ```

pub mod config;
pub mod consts;
pub mod metrics;
pub mod observer;
pub mod prelude;
pub mod state;
