//! State engine client.
//!
//! `HttpEngine` is a thin wrapper over `GET {read_path}` and
//! `POST /api/gate`. Body parsing lives in `parse_amplitudes` so it can be
//! tested without a server.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;

use wire::{AmplitudePair, GateCommand};

use super::config::EngineConfig;
use super::types::EngineError;

/// The authoritative owner of the qubit state.
#[async_trait::async_trait]
pub trait StateEngine: Send + Sync {
    /// Read the current amplitude pair.
    async fn read_amplitudes(&self) -> Result<AmplitudePair, EngineError>;

    /// Apply a gate and return the post-gate amplitude pair.
    async fn apply_gate(&self, command: &GateCommand) -> Result<AmplitudePair, EngineError>;
}

// =============================================================================
// HTTP
// =============================================================================

pub struct HttpEngine {
    http: reqwest::Client,
    read_url: String,
    gate_url: String,
}

impl HttpEngine {
    /// Build an engine client from config.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::HttpClientBuild`] if the TLS backend cannot be
    /// initialized.
    pub fn new(config: &EngineConfig) -> Result<Self, EngineError> {
        let mut builder = reqwest::Client::builder();
        if config.timeouts.request_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeouts.request_secs));
        }
        if config.timeouts.connect_secs > 0 {
            builder = builder.connect_timeout(Duration::from_secs(config.timeouts.connect_secs));
        }
        let http = builder
            .build()
            .map_err(|e| EngineError::HttpClientBuild(e.to_string()))?;

        Ok(Self { http, read_url: config.read_url(), gate_url: config.gate_url() })
    }

    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<AmplitudePair, EngineError> {
        let response = request
            .send()
            .await
            .map_err(|e| EngineError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| EngineError::Transport(e.to_string()))?;

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), body = %text, "engine rejected request");
            return Err(EngineError::Protocol { status: status.as_u16(), body: text });
        }

        parse_amplitudes(&text)
    }
}

#[async_trait::async_trait]
impl StateEngine for HttpEngine {
    async fn read_amplitudes(&self) -> Result<AmplitudePair, EngineError> {
        tracing::debug!(url = %self.read_url, "reading amplitudes");
        self.execute(self.http.get(&self.read_url)).await
    }

    async fn apply_gate(&self, command: &GateCommand) -> Result<AmplitudePair, EngineError> {
        let request = command.to_request();
        let body = wire::encode_request(&request)?;
        tracing::debug!(url = %self.gate_url, gate = %request.gate_name, phase = ?request.phase, "posting gate");
        self.execute(self.http.post(&self.gate_url).header(CONTENT_TYPE, "application/json").body(body))
            .await
    }
}

/// Parse an engine response body.
///
/// # Errors
///
/// Returns [`EngineError::Decode`] for anything but the four-field
/// amplitude object.
pub fn parse_amplitudes(body: &str) -> Result<AmplitudePair, EngineError> {
    let pair = wire::decode_amplitudes(body)?;
    if !pair.is_normalized(1e-5) {
        tracing::warn!(norm = pair.norm_sqr(), "engine returned a non-normalized state");
    }
    Ok(pair)
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;
