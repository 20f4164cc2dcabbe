#[cfg(test)]
#[path = "amplitudes_test.rs"]
mod amplitudes_test;

use std::sync::Arc;

use serde::Serialize;
use wire::AmplitudePair;

use crate::net::engine::StateEngine;
use crate::net::types::EngineError;

/// Monotonic request counter value. `0` means "nothing applied yet".
pub type RequestSeq = u64;

/// Store shared between the session, dispatcher and loader.
///
/// The lock is taken only around bookkeeping, never across a network await.
pub type SharedStore = Arc<tokio::sync::Mutex<AmplitudeStore>>;

/// Which kind of request produced a result or an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Initial read or manual refresh.
    Load,
    /// Gate application.
    Dispatch,
}

/// Last failure observed for one operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ErrorState {
    pub operation: Operation,
    pub seq: RequestSeq,
    pub kind: &'static str,
    /// Short text for display.
    pub message: String,
    /// Full error including any engine diagnostic. For logs, not users.
    #[serde(skip)]
    pub detail: String,
}

impl ErrorState {
    fn from_engine(operation: Operation, seq: RequestSeq, err: &EngineError) -> Self {
        let detail = match err.diagnostic() {
            Some(body) => format!("{err}: {body}"),
            None => err.to_string(),
        };
        Self { operation, seq, kind: err.kind(), message: err.user_message(), detail }
    }
}

/// Result of offering a response to the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteOutcome {
    Applied,
    /// A newer response was already applied; this one was discarded.
    Stale,
}

/// A response that reached the store, applied or not.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Synced {
    pub seq: RequestSeq,
    pub amplitudes: AmplitudePair,
    pub outcome: WriteOutcome,
}

/// Last-known qubit state plus request bookkeeping.
///
/// Every request takes a sequence number from `begin_request`. A response
/// is applied only if its number is above the highest applied so far, so a
/// slow early response can never overwrite a newer one.
#[derive(Debug)]
pub struct AmplitudeStore {
    current: Option<AmplitudePair>,
    loading: bool,
    load_error: Option<ErrorState>,
    dispatch_error: Option<ErrorState>,
    issued: RequestSeq,
    applied: RequestSeq,
}

impl Default for AmplitudeStore {
    fn default() -> Self {
        Self {
            current: None,
            loading: true,
            load_error: None,
            dispatch_error: None,
            issued: 0,
            applied: 0,
        }
    }
}

impl AmplitudeStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn shared() -> SharedStore {
        Arc::new(tokio::sync::Mutex::new(Self::new()))
    }

    /// `None` means there is nothing to render yet, not an error.
    #[must_use]
    pub fn current(&self) -> Option<AmplitudePair> {
        self.current
    }

    #[must_use]
    pub fn loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn last_issued(&self) -> RequestSeq {
        self.issued
    }

    #[must_use]
    pub fn last_applied(&self) -> RequestSeq {
        self.applied
    }

    /// Allocate the next sequence number.
    pub fn begin_request(&mut self, operation: Operation) -> RequestSeq {
        self.issued += 1;
        if operation == Operation::Load && self.current.is_none() {
            self.loading = true;
        }
        self.issued
    }

    /// Offer a successful response. Applied responses clear every error
    /// recorded by an older request.
    pub fn apply(&mut self, seq: RequestSeq, operation: Operation, pair: AmplitudePair) -> WriteOutcome {
        if seq <= self.applied {
            tracing::info!(seq, applied = self.applied, ?operation, "discarding stale engine response");
            return WriteOutcome::Stale;
        }
        self.current = Some(pair);
        self.applied = seq;
        self.loading = false;
        for slot in [&mut self.load_error, &mut self.dispatch_error] {
            if slot.as_ref().is_some_and(|e| e.seq < seq) {
                *slot = None;
            }
        }
        WriteOutcome::Applied
    }

    /// Record a failed request. Failures older than the applied state are
    /// dropped: the state they would annotate has already been superseded.
    pub fn fail(&mut self, seq: RequestSeq, operation: Operation, err: &EngineError) -> WriteOutcome {
        if seq <= self.applied {
            tracing::info!(seq, applied = self.applied, ?operation, error = %err, "discarding stale engine failure");
            return WriteOutcome::Stale;
        }
        if operation == Operation::Load {
            self.loading = false;
        }
        let state = ErrorState::from_engine(operation, seq, err);
        tracing::warn!(seq, ?operation, kind = state.kind, detail = %state.detail, "engine request failed");
        *self.slot_mut(operation) = Some(state);
        WriteOutcome::Applied
    }

    /// Route a request result to `apply` or `fail`.
    pub fn settle(
        &mut self,
        seq: RequestSeq,
        operation: Operation,
        result: &Result<AmplitudePair, EngineError>,
    ) -> WriteOutcome {
        match result {
            Ok(pair) => self.apply(seq, operation, *pair),
            Err(err) => self.fail(seq, operation, err),
        }
    }

    #[must_use]
    pub fn error(&self, operation: Operation) -> Option<&ErrorState> {
        match operation {
            Operation::Load => self.load_error.as_ref(),
            Operation::Dispatch => self.dispatch_error.as_ref(),
        }
    }

    /// The most recently recorded error across both operations.
    #[must_use]
    pub fn latest_error(&self) -> Option<&ErrorState> {
        [self.load_error.as_ref(), self.dispatch_error.as_ref()]
            .into_iter()
            .flatten()
            .max_by_key(|e| e.seq)
    }

    pub fn clear_error(&mut self, operation: Operation) {
        *self.slot_mut(operation) = None;
    }

    fn slot_mut(&mut self, operation: Operation) -> &mut Option<ErrorState> {
        match operation {
            Operation::Load => &mut self.load_error,
            Operation::Dispatch => &mut self.dispatch_error,
        }
    }
}

/// Read the engine state into `store`.
///
/// Used for the initial read on mount and for manual refresh. The read is
/// sequenced like a gate dispatch, so a late reply cannot overwrite a newer
/// gate result. There is no automatic retry.
///
/// # Errors
///
/// Returns the engine error after recording it in the `Load` slot.
pub async fn load(engine: &dyn StateEngine, store: &SharedStore) -> Result<Synced, EngineError> {
    let seq = store.lock().await.begin_request(Operation::Load);
    let result = engine.read_amplitudes().await;
    let outcome = store.lock().await.settle(seq, Operation::Load, &result);
    let amplitudes = result?;
    tracing::info!(seq, ?outcome, "amplitudes loaded");
    Ok(Synced { seq, amplitudes, outcome })
}
