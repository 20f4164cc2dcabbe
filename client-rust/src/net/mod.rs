//! Network layer for talking to the remote state engine.
//!
//! DESIGN
//! ======
//! `StateEngine` is the seam between client state and transport. The HTTP
//! implementation lives in `engine`; tests substitute in-memory engines.

pub mod config;
pub mod engine;
pub mod types;
