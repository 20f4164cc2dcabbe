#[cfg(test)]
#[path = "dispatch_test.rs"]
mod dispatch_test;

use std::sync::Arc;

use wire::GateCommand;

use super::amplitudes::{Operation, SharedStore, Synced};
use crate::net::engine::StateEngine;
use crate::net::types::EngineError;

/// Sends gate commands to the engine and writes the replies into the store.
///
/// Dispatches are never cancelled or retried. Several may be in flight at
/// once; the store's sequence check keeps only the newest reply.
#[derive(Clone)]
pub struct GateDispatcher {
    engine: Arc<dyn StateEngine>,
    store: SharedStore,
}

impl GateDispatcher {
    pub fn new(engine: Arc<dyn StateEngine>, store: SharedStore) -> Self {
        Self { engine, store }
    }

    #[must_use]
    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    #[must_use]
    pub fn engine(&self) -> &Arc<dyn StateEngine> {
        &self.engine
    }

    /// Apply `command` on the engine.
    ///
    /// On success the reply replaces the stored state unless a newer reply
    /// has already landed (`WriteOutcome::Stale`). On failure the store is
    /// left untouched apart from the `Dispatch` error slot.
    ///
    /// # Errors
    ///
    /// Returns the engine error after recording it.
    pub async fn dispatch(&self, command: GateCommand) -> Result<Synced, EngineError> {
        let seq = self.store.lock().await.begin_request(Operation::Dispatch);
        let gate = command.name();
        tracing::debug!(seq, %gate, angle = ?command.angle(), "dispatching gate");

        let result = self.engine.apply_gate(&command).await;
        let outcome = self.store.lock().await.settle(seq, Operation::Dispatch, &result);
        let amplitudes = result?;
        tracing::info!(seq, %gate, ?outcome, "gate response received");
        Ok(Synced { seq, amplitudes, outcome })
    }
}
