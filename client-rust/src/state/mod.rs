//! Client-side state modules.
//!
//! DESIGN
//! ======
//! State is split by concern (`amplitudes`, `dispatch`, `angle`, `panel`) so
//! each piece can be tested alone; `session` wires them into one visualizer
//! session.
//!
//! All engine traffic goes through `AmplitudeStore` sequence numbers: each
//! request takes the next number when issued, and a reply is written only if
//! no newer reply has been written first.

pub mod amplitudes;
pub mod angle;
pub mod dispatch;
pub mod panel;
pub mod session;

#[cfg(test)]
pub(crate) mod test_engine;
