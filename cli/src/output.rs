use clap::ValueEnum;
use client::SessionView;
use client::util::format::{RenderFormat, render};
use serde::Serialize;
use wire::{AmplitudePair, GateName};

use crate::CliError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Status lines and `|ψ⟩ = (α)|0⟩ + (β)|1⟩`.
    #[default]
    Plain,
    /// TeX source only; errors go to stderr.
    Tex,
    /// The full session snapshot as JSON.
    Json,
}

pub fn print_view(view: &SessionView, format: OutputFormat) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => print_json(view),
        OutputFormat::Plain => {
            for line in view.lines() {
                println!("{line}");
            }
            Ok(())
        }
        OutputFormat::Tex => {
            if let Some(err) = &view.load_error {
                eprintln!("Error loading state: {err}");
            }
            if let Some(err) = &view.dispatch_error {
                eprintln!("Gate failed: {err}");
            }
            if let Some(amps) = view.amplitudes {
                println!("{}", render(&AmplitudePair::from(amps), RenderFormat::Tex));
            }
            Ok(())
        }
    }
}

#[derive(Serialize)]
struct GateInfo {
    name: &'static str,
    parametric: bool,
}

pub fn print_gates(format: OutputFormat) -> Result<(), CliError> {
    if format == OutputFormat::Json {
        let gates: Vec<GateInfo> = GateName::ALL
            .iter()
            .map(|g| GateInfo { name: g.as_str(), parametric: g.is_parametric() })
            .collect();
        return print_json(&gates);
    }
    for gate in GateName::ALL {
        if gate.is_parametric() {
            println!("{gate} <angle>");
        } else {
            println!("{gate}");
        }
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
