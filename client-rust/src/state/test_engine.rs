//! In-memory engines for state tests.

use std::collections::{HashMap, VecDeque};
use std::f64::consts::FRAC_1_SQRT_2;
use std::sync::{Arc, Mutex};

use tokio::sync::{mpsc, oneshot};
use wire::{AmplitudePair, Complex, FixedGate, GateCommand};

use crate::net::engine::StateEngine;
use crate::net::types::EngineError;

pub type Reply = Result<AmplitudePair, EngineError>;

pub fn pair(ar: f64, ai: f64, br: f64, bi: f64) -> AmplitudePair {
    AmplitudePair::new(Complex::new(ar, ai), Complex::new(br, bi))
}

pub fn one() -> AmplitudePair {
    pair(0.0, 0.0, 1.0, 0.0)
}

pub fn plus() -> AmplitudePair {
    pair(FRAC_1_SQRT_2, 0.0, FRAC_1_SQRT_2, 0.0)
}

pub fn transport_error() -> EngineError {
    EngineError::Transport("connection refused".into())
}

/// Replies from fixed queues and records every command.
#[derive(Default)]
pub struct ScriptedEngine {
    reads: Mutex<VecDeque<Reply>>,
    gates: Mutex<VecDeque<Reply>>,
    pub seen: Mutex<Vec<GateCommand>>,
}

impl ScriptedEngine {
    pub fn new(reads: Vec<Reply>, gates: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            reads: Mutex::new(reads.into()),
            gates: Mutex::new(gates.into()),
            seen: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait::async_trait]
impl StateEngine for ScriptedEngine {
    async fn read_amplitudes(&self) -> Reply {
        self.reads.lock().unwrap().pop_front().expect("scripted read")
    }

    async fn apply_gate(&self, command: &GateCommand) -> Reply {
        self.seen.lock().unwrap().push(*command);
        self.gates.lock().unwrap().pop_front().expect("scripted gate reply")
    }
}

/// Holds each request until the test releases it, so tests control the
/// order in which replies arrive.
pub struct GatedEngine {
    pending: Mutex<HashMap<&'static str, oneshot::Receiver<Reply>>>,
    arrived: mpsc::UnboundedSender<&'static str>,
}

impl GatedEngine {
    /// Returns the engine and a receiver that yields each request key
    /// (`"read"` or the gate wire name) as the request reaches the engine.
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<&'static str>) {
        let (arrived, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { pending: Mutex::new(HashMap::new()), arrived }), rx)
    }

    /// Register a held reply for `key`.
    pub fn hold(&self, key: &'static str) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.pending.lock().unwrap().insert(key, rx);
        tx
    }

    async fn wait(&self, key: &'static str) -> Reply {
        let rx = self.pending.lock().unwrap().remove(key).expect("held reply registered");
        self.arrived.send(key).expect("arrival receiver open");
        rx.await.expect("reply sender kept alive")
    }
}

#[async_trait::async_trait]
impl StateEngine for GatedEngine {
    async fn read_amplitudes(&self) -> Reply {
        self.wait("read").await
    }

    async fn apply_gate(&self, command: &GateCommand) -> Reply {
        self.wait(command.name().as_str()).await
    }
}

/// A tiny real-valued simulator for the fixed gates used in tests.
pub struct SimEngine {
    state: Mutex<AmplitudePair>,
}

impl SimEngine {
    pub fn starting_at(state: AmplitudePair) -> Arc<Self> {
        Arc::new(Self { state: Mutex::new(state) })
    }
}

#[async_trait::async_trait]
impl StateEngine for SimEngine {
    async fn read_amplitudes(&self) -> Reply {
        Ok(*self.state.lock().unwrap())
    }

    async fn apply_gate(&self, command: &GateCommand) -> Reply {
        let mut state = self.state.lock().unwrap();
        let AmplitudePair { alpha: a, beta: b } = *state;
        *state = match command {
            GateCommand::NonParametric(FixedGate::Reset) => AmplitudePair::GROUND,
            GateCommand::NonParametric(FixedGate::X) => AmplitudePair::new(b, a),
            GateCommand::NonParametric(FixedGate::Z) => {
                AmplitudePair::new(a, Complex::new(-b.re, -b.im))
            }
            GateCommand::NonParametric(FixedGate::H) => AmplitudePair::new(
                Complex::new((a.re + b.re) * FRAC_1_SQRT_2, (a.im + b.im) * FRAC_1_SQRT_2),
                Complex::new((a.re - b.re) * FRAC_1_SQRT_2, (a.im - b.im) * FRAC_1_SQRT_2),
            ),
            other => {
                return Err(EngineError::Protocol {
                    status: 400,
                    body: format!("unsupported gate {}", other.name()),
                });
            }
        };
        Ok(*state)
    }
}
