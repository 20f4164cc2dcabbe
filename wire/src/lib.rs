//! Shared wire model for the qubit state engine HTTP contract.
//!
//! This crate owns the JSON representation used by both the client core and
//! the CLI: the amplitude payload returned by `GET /api/amps` and
//! `POST /api/gate`, the gate request body, and the gate vocabulary. It does
//! no I/O.
//!
//! DESIGN
//! ======
//! Gates come in two families. `FixedGate` takes no argument; `AngleGate`
//! depends on a real-valued angle. `GateCommand` is a tagged variant over the
//! two so an angle can only travel with a gate that uses it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned by the wire codec and gate-name parsing.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The gate name is not part of the engine vocabulary.
    #[error("unknown gate: {0}")]
    UnknownGate(String),
    /// A JSON body did not match the expected shape.
    #[error("invalid amplitude payload: {0}")]
    Decode(#[from] serde_json::Error),
}

// =============================================================================
// COMPLEX AMPLITUDES
// =============================================================================

/// A complex number in rectangular form.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub const ZERO: Self = Self { re: 0.0, im: 0.0 };
    pub const ONE: Self = Self { re: 1.0, im: 0.0 };

    #[must_use]
    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// Squared magnitude `re² + im²`.
    #[must_use]
    pub fn norm_sqr(self) -> f64 {
        self.re.mul_add(self.re, self.im * self.im)
    }
}

/// The two coefficients of a single-qubit state over the `|0⟩`, `|1⟩` basis.
///
/// The engine keeps `|alpha|² + |beta|² ≈ 1`; the client trusts it and only
/// checks normalization for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AmplitudePair {
    pub alpha: Complex,
    pub beta: Complex,
}

impl AmplitudePair {
    /// The canonical initial state `|0⟩` the engine returns after `reset`.
    pub const GROUND: Self = Self { alpha: Complex::ONE, beta: Complex::ZERO };

    #[must_use]
    pub const fn new(alpha: Complex, beta: Complex) -> Self {
        Self { alpha, beta }
    }

    /// Total probability `|alpha|² + |beta|²`.
    #[must_use]
    pub fn norm_sqr(&self) -> f64 {
        self.alpha.norm_sqr() + self.beta.norm_sqr()
    }

    #[must_use]
    pub fn is_normalized(&self, tolerance: f64) -> bool {
        (self.norm_sqr() - 1.0).abs() <= tolerance
    }
}

/// JSON body of every successful engine response.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AmplitudePayload {
    pub alpha_real: f64,
    pub alpha_imag: f64,
    pub beta_real: f64,
    pub beta_imag: f64,
}

impl From<AmplitudePayload> for AmplitudePair {
    fn from(p: AmplitudePayload) -> Self {
        Self {
            alpha: Complex::new(p.alpha_real, p.alpha_imag),
            beta: Complex::new(p.beta_real, p.beta_imag),
        }
    }
}

impl From<AmplitudePair> for AmplitudePayload {
    fn from(pair: AmplitudePair) -> Self {
        Self {
            alpha_real: pair.alpha.re,
            alpha_imag: pair.alpha.im,
            beta_real: pair.beta.re,
            beta_imag: pair.beta.im,
        }
    }
}

// =============================================================================
// GATES
// =============================================================================

/// Gates that take no argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FixedGate {
    H,
    X,
    Y,
    Z,
    S,
    T,
    /// Return the qubit to `|0⟩`.
    Reset,
}

impl FixedGate {
    /// Wire name sent as `gate_name`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::H => "h",
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
            Self::S => "s",
            Self::T => "t",
            Self::Reset => "reset",
        }
    }
}

/// Gates whose effect depends on an angle in radians.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AngleGate {
    /// Phase shift.
    P,
    /// Rotation about the X axis.
    Rx,
    /// Rotation about the Y axis.
    Ry,
}

impl AngleGate {
    /// Wire name sent as `gate_name`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::P => "p",
            Self::Rx => "r_x",
            Self::Ry => "r_y",
        }
    }
}

/// Any name in the engine's gate vocabulary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GateName {
    Fixed(FixedGate),
    Angle(AngleGate),
}

impl GateName {
    /// The full vocabulary in display order.
    pub const ALL: [Self; 10] = [
        Self::Fixed(FixedGate::H),
        Self::Fixed(FixedGate::X),
        Self::Fixed(FixedGate::Y),
        Self::Fixed(FixedGate::Z),
        Self::Fixed(FixedGate::S),
        Self::Fixed(FixedGate::T),
        Self::Angle(AngleGate::P),
        Self::Angle(AngleGate::Rx),
        Self::Angle(AngleGate::Ry),
        Self::Fixed(FixedGate::Reset),
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fixed(gate) => gate.as_str(),
            Self::Angle(gate) => gate.as_str(),
        }
    }

    /// Whether this gate carries an angle.
    #[must_use]
    pub fn is_parametric(self) -> bool {
        matches!(self, Self::Angle(_))
    }
}

impl fmt::Display for GateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GateName {
    type Err = WireError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|gate| gate.as_str() == s)
            .ok_or_else(|| WireError::UnknownGate(s.to_owned()))
    }
}

/// A requested gate application, built at the moment of a user action and
/// consumed once by the dispatcher.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GateCommand {
    NonParametric(FixedGate),
    Parametric(AngleGate, f64),
}

impl GateCommand {
    /// Build a command for `name`.
    ///
    /// The angle is ignored for fixed gates. For angle gates a missing or
    /// non-finite angle becomes `0.0`.
    #[must_use]
    pub fn new(name: GateName, angle: Option<f64>) -> Self {
        match name {
            GateName::Fixed(gate) => Self::NonParametric(gate),
            GateName::Angle(gate) => {
                let angle = angle.filter(|a| a.is_finite()).unwrap_or(0.0);
                Self::Parametric(gate, angle)
            }
        }
    }

    #[must_use]
    pub fn name(&self) -> GateName {
        match self {
            Self::NonParametric(gate) => GateName::Fixed(*gate),
            Self::Parametric(gate, _) => GateName::Angle(*gate),
        }
    }

    #[must_use]
    pub fn angle(&self) -> Option<f64> {
        match self {
            Self::NonParametric(_) => None,
            Self::Parametric(_, angle) => Some(*angle),
        }
    }

    /// Request body for `POST /api/gate`.
    ///
    /// `phase` is always present: the angle for parametric gates, `0` for the
    /// rest. The reference engine rejects bodies without it.
    #[must_use]
    pub fn to_request(&self) -> GateRequest {
        GateRequest {
            gate_name: self.name().as_str().to_owned(),
            phase: Some(self.angle().unwrap_or(0.0)),
        }
    }
}

/// JSON body of `POST /api/gate`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GateRequest {
    pub gate_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<f64>,
}

// =============================================================================
// CODEC
// =============================================================================

/// Decode an engine response body into an amplitude pair.
///
/// # Errors
///
/// Returns [`WireError::Decode`] when the body is not JSON or lacks one of
/// the four numeric fields.
pub fn decode_amplitudes(body: &str) -> Result<AmplitudePair, WireError> {
    let payload = serde_json::from_str::<AmplitudePayload>(body)?;
    Ok(payload.into())
}

/// Encode a gate request as a JSON string.
///
/// # Errors
///
/// Returns [`WireError::Decode`] if serialization fails.
pub fn encode_request(request: &GateRequest) -> Result<String, WireError> {
    Ok(serde_json::to_string(request)?)
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
