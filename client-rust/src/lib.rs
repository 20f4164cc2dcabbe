//! # client
//!
//! Client core for the single-qubit state visualizer.
//!
//! The remote state engine owns the simulation; this crate keeps the
//! last-known amplitude pair in sync with it, dispatches gate commands,
//! validates the angle field for parameterized gates, and manages the angle
//! popover with its outside-click dismissal. Rendering stops at a text or TeX
//! expression; typesetting belongs to the host shell.

pub mod net;
pub mod state;
pub mod util;

pub use net::config::{ConfigError, EngineConfig, EngineTimeouts};
pub use net::engine::{HttpEngine, StateEngine};
pub use net::types::EngineError;
pub use state::session::{QubitSession, SessionView};
