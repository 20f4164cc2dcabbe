//! One visualizer session: store, dispatcher, angle field and panel wired
//! together.
//!
//! In a graphical shell each field would back a reactive signal; here they
//! are plain values and `view` produces a snapshot for rendering.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::Arc;

use serde::Serialize;
use wire::{AmplitudePayload, FixedGate, GateCommand, GateName};

use super::amplitudes::{self, AmplitudeStore, Operation, SharedStore, Synced};
use super::angle::ValidatedAngleInput;
use super::dispatch::GateDispatcher;
use super::panel::{DisclosurePanel, PanelState};
use crate::net::engine::StateEngine;
use crate::net::types::EngineError;
use crate::util::format;
use crate::util::pointer::{PointerHub, Region};

pub struct QubitSession {
    dispatcher: GateDispatcher,
    angle: ValidatedAngleInput,
    panel: DisclosurePanel,
}

impl QubitSession {
    /// A session with an empty store. Call [`QubitSession::mount`] to seed it.
    pub fn new(engine: Arc<dyn StateEngine>, hub: &PointerHub, panel_region: Region) -> Self {
        Self {
            dispatcher: GateDispatcher::new(engine, AmplitudeStore::shared()),
            angle: ValidatedAngleInput::new(),
            panel: DisclosurePanel::new(hub, panel_region),
        }
    }

    #[must_use]
    pub fn store(&self) -> &SharedStore {
        self.dispatcher.store()
    }

    #[must_use]
    pub fn dispatcher(&self) -> &GateDispatcher {
        &self.dispatcher
    }

    /// Initial read. Failures land in the `Load` error slot.
    ///
    /// # Errors
    ///
    /// Returns the engine error after recording it.
    pub async fn mount(&self) -> Result<Synced, EngineError> {
        amplitudes::load(self.dispatcher.engine().as_ref(), self.store()).await
    }

    /// Manual re-read of the engine state.
    ///
    /// # Errors
    ///
    /// Returns the engine error after recording it.
    pub async fn refresh(&self) -> Result<Synced, EngineError> {
        self.mount().await
    }

    /// The command a click on `gate` would send right now. Angle gates take
    /// the current field value, or `0` when the field is empty.
    #[must_use]
    pub fn command_for(&self, gate: GateName) -> GateCommand {
        GateCommand::new(gate, self.angle.angle())
    }

    /// Apply `gate`.
    ///
    /// # Errors
    ///
    /// Returns the engine error after recording it in the `Dispatch` slot.
    pub async fn apply_gate(&self, gate: GateName) -> Result<Synced, EngineError> {
        self.dispatcher.dispatch(self.command_for(gate)).await
    }

    /// Return the qubit to `|0⟩`.
    ///
    /// # Errors
    ///
    /// Returns the engine error after recording it in the `Dispatch` slot.
    pub async fn reset(&self) -> Result<Synced, EngineError> {
        self.apply_gate(GateName::Fixed(FixedGate::Reset)).await
    }

    /// Clear both error lines. The stored state is untouched.
    pub async fn dismiss_errors(&self) {
        let mut store = self.store().lock().await;
        store.clear_error(Operation::Load);
        store.clear_error(Operation::Dispatch);
    }

    #[must_use]
    pub fn angle_input(&self) -> &ValidatedAngleInput {
        &self.angle
    }

    pub fn angle_input_mut(&mut self) -> &mut ValidatedAngleInput {
        &mut self.angle
    }

    #[must_use]
    pub fn panel(&self) -> &DisclosurePanel {
        &self.panel
    }

    /// Snapshot of everything a shell needs to draw.
    pub async fn view(&self) -> SessionView {
        let store = self.store().lock().await;
        let current = store.current();
        SessionView {
            loading: store.loading(),
            amplitudes: current.map(AmplitudePayload::from),
            expression: current.as_ref().map(format::format_ket),
            plain: current.as_ref().map(format::format_plain),
            load_error: store.error(Operation::Load).map(|e| e.message.clone()),
            dispatch_error: store.error(Operation::Dispatch).map(|e| e.message.clone()),
            panel: self.panel.state(),
            angle: self.angle.value().to_owned(),
        }
    }
}

/// Render-ready snapshot of a session.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SessionView {
    pub loading: bool,
    pub amplitudes: Option<AmplitudePayload>,
    /// TeX source for the external typesetter.
    pub expression: Option<String>,
    pub plain: Option<String>,
    pub load_error: Option<String>,
    pub dispatch_error: Option<String>,
    pub panel: PanelState,
    pub angle: String,
}

impl SessionView {
    /// Status lines for a text shell. Errors show alongside the state, never
    /// in place of it.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if self.loading {
            lines.push("Loading...".to_owned());
        }
        if let Some(err) = &self.load_error {
            lines.push(format!("Error loading state: {err}"));
        }
        if let Some(err) = &self.dispatch_error {
            lines.push(format!("Gate failed: {err}"));
        }
        if let Some(plain) = &self.plain {
            lines.push(plain.clone());
        }
        if self.panel == PanelState::Open {
            lines.push(format!("angle: [{}]", self.angle));
        }
        lines
    }
}
