//! Text rendering of the amplitude pair.
//!
//! `format_ket` produces the TeX source handed to the external typesetter
//! (`\ket{\psi}=(α)\ket{0}+(β)\ket{1}`); `format_plain` is the terminal form.
//! Coefficients print with two decimals and values that round to zero print
//! as `0.00`, never `-0.00`.

#[cfg(test)]
#[path = "format_test.rs"]
mod format_test;

use wire::{AmplitudePair, Complex};

/// Output flavor for rendered state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderFormat {
    #[default]
    Plain,
    Tex,
}

/// Render `pair` in the requested flavor.
#[must_use]
pub fn render(pair: &AmplitudePair, format: RenderFormat) -> String {
    match format {
        RenderFormat::Plain => format_plain(pair),
        RenderFormat::Tex => format_ket(pair),
    }
}

/// `(a.bb+c.ddi)` with the imaginary sign folded into the operator.
#[must_use]
pub fn format_amplitude(c: Complex) -> String {
    let re = round2(c.re);
    let im = round2(c.im);
    let sign = if im < 0.0 { '-' } else { '+' };
    format!("({re:.2}{sign}{:.2}i)", im.abs())
}

/// Both basis terms in TeX, without the `\ket{\psi}=` prefix.
#[must_use]
pub fn format_state(pair: &AmplitudePair) -> String {
    format!(
        "{}\\ket{{0}}+{}\\ket{{1}}",
        format_amplitude(pair.alpha),
        format_amplitude(pair.beta)
    )
}

#[must_use]
pub fn format_ket(pair: &AmplitudePair) -> String {
    format!("\\ket{{\\psi}}={}", format_state(pair))
}

#[must_use]
pub fn format_plain(pair: &AmplitudePair) -> String {
    format!(
        "|ψ⟩ = {}|0⟩ + {}|1⟩",
        format_amplitude(pair.alpha),
        format_amplitude(pair.beta)
    )
}

fn round2(v: f64) -> f64 {
    let rounded = (v * 100.0).round() / 100.0;
    if rounded.abs() < f64::EPSILON { 0.0 } else { rounded }
}
