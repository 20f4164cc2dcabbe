use wire::{AmplitudePair, AngleGate};

use super::*;
use crate::state::test_engine::{ScriptedEngine, SimEngine, one, transport_error};
use crate::util::pointer::PointerEvent;

const PANEL: Region = Region::new(10.0, 10.0, 100.0, 30.0);

fn session_with(engine: Arc<dyn StateEngine>) -> (QubitSession, PointerHub) {
    let hub = PointerHub::new();
    (QubitSession::new(engine, &hub, PANEL), hub)
}

// =============================================================
// Mount and render
// =============================================================

#[tokio::test]
async fn view_before_mount_is_loading_without_state() {
    let (session, _) = session_with(ScriptedEngine::new(vec![], vec![]));
    let view = session.view().await;
    assert!(view.loading);
    assert!(view.expression.is_none());
    assert_eq!(view.lines(), vec!["Loading...".to_owned()]);
}

#[tokio::test]
async fn mounted_ground_state_renders_both_coefficients() {
    let (session, _) = session_with(ScriptedEngine::new(vec![Ok(AmplitudePair::GROUND)], vec![]));
    session.mount().await.unwrap();

    let view = session.view().await;
    assert!(!view.loading);
    let expr = view.expression.expect("expression");
    assert!(expr.contains("(1.00+0.00i)"));
    assert!(expr.contains("(0.00+0.00i)"));
    assert_eq!(view.plain.as_deref(), Some("|ψ⟩ = (1.00+0.00i)|0⟩ + (0.00+0.00i)|1⟩"));
}

#[tokio::test]
async fn failed_mount_shows_load_error_without_state() {
    let (session, _) = session_with(ScriptedEngine::new(vec![Err(transport_error())], vec![]));
    session.mount().await.unwrap_err();

    let view = session.view().await;
    assert!(!view.loading);
    assert!(view.plain.is_none());
    assert_eq!(
        view.lines(),
        vec!["Error loading state: Network response was not ok: engine unreachable".to_owned()]
    );
}

#[tokio::test]
async fn refresh_recovers_from_failed_mount() {
    let engine = ScriptedEngine::new(vec![Err(transport_error()), Ok(AmplitudePair::GROUND)], vec![]);
    let (session, _) = session_with(engine);
    session.mount().await.unwrap_err();
    session.refresh().await.unwrap();

    let view = session.view().await;
    assert!(view.load_error.is_none());
    assert!(view.plain.is_some());
}

#[tokio::test]
async fn gate_error_is_shown_alongside_state() {
    let engine = ScriptedEngine::new(vec![Ok(AmplitudePair::GROUND)], vec![Err(transport_error())]);
    let (session, _) = session_with(engine);
    session.mount().await.unwrap();
    session.apply_gate(GateName::Fixed(FixedGate::H)).await.unwrap_err();

    let view = session.view().await;
    assert!(view.load_error.is_none());
    assert!(view.dispatch_error.is_some());
    let lines = view.lines();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("Gate failed: "));
    assert!(lines[1].starts_with("|ψ⟩ = (1.00+0.00i)"));
}

#[tokio::test]
async fn dismiss_clears_error_lines_and_keeps_state() {
    let engine = ScriptedEngine::new(vec![Ok(AmplitudePair::GROUND)], vec![Err(transport_error())]);
    let (session, _) = session_with(engine);
    session.mount().await.unwrap();
    session.apply_gate(GateName::Fixed(FixedGate::H)).await.unwrap_err();
    assert!(session.view().await.dispatch_error.is_some());

    session.dismiss_errors().await;
    let view = session.view().await;
    assert!(view.dispatch_error.is_none());
    assert!(view.load_error.is_none());
    assert_eq!(view.lines(), vec!["|ψ⟩ = (1.00+0.00i)|0⟩ + (0.00+0.00i)|1⟩".to_owned()]);
}

// =============================================================
// Commands
// =============================================================

#[tokio::test]
async fn angle_gate_uses_field_value() {
    let engine = ScriptedEngine::new(vec![], vec![Ok(one())]);
    let (mut session, _) = session_with(engine.clone());
    assert!(session.angle_input_mut().set_candidate("1.5"));

    session.apply_gate(GateName::Angle(AngleGate::P)).await.unwrap();
    assert_eq!(engine.seen.lock().unwrap()[0], GateCommand::Parametric(AngleGate::P, 1.5));
}

#[test]
fn angle_gate_with_empty_field_defaults_to_zero() {
    let (session, _) = session_with(ScriptedEngine::new(vec![], vec![]));
    assert_eq!(
        session.command_for(GateName::Angle(AngleGate::Rx)),
        GateCommand::Parametric(AngleGate::Rx, 0.0)
    );
}

#[test]
fn fixed_gate_ignores_field_value() {
    let (mut session, _) = session_with(ScriptedEngine::new(vec![], vec![]));
    session.angle_input_mut().set_candidate("2");
    assert_eq!(
        session.command_for(GateName::Fixed(FixedGate::Z)),
        GateCommand::NonParametric(FixedGate::Z)
    );
}

#[tokio::test]
async fn reset_returns_to_ground() {
    let engine = SimEngine::starting_at(AmplitudePair::GROUND);
    let (session, _) = session_with(engine);
    session.mount().await.unwrap();
    session.apply_gate(GateName::Fixed(FixedGate::X)).await.unwrap();
    assert_eq!(session.store().lock().await.current(), Some(one()));

    session.reset().await.unwrap();
    assert_eq!(session.store().lock().await.current(), Some(AmplitudePair::GROUND));
}

// =============================================================
// Panel
// =============================================================

#[tokio::test]
async fn open_panel_shows_angle_line() {
    let (mut session, _) = session_with(ScriptedEngine::new(vec![], vec![]));
    session.panel().toggle();
    session.angle_input_mut().set_candidate("0.5");

    let view = session.view().await;
    assert_eq!(view.panel, PanelState::Open);
    assert_eq!(view.lines().last().map(String::as_str), Some("angle: [0.5]"));
}

#[test]
fn outside_click_closes_session_panel() {
    let (session, hub) = session_with(ScriptedEngine::new(vec![], vec![]));
    session.panel().toggle();
    hub.emit(&PointerEvent::down(300.0, 300.0));
    assert!(!session.panel().is_open());
}

#[test]
fn dropping_session_with_open_panel_releases_listener() {
    let (session, hub) = session_with(ScriptedEngine::new(vec![], vec![]));
    session.panel().toggle();
    assert_eq!(hub.listener_count(), 1);
    drop(session);
    assert_eq!(hub.listener_count(), 0);
}

#[tokio::test]
async fn view_serializes_for_json_output() {
    let (session, _) = session_with(ScriptedEngine::new(vec![Ok(AmplitudePair::GROUND)], vec![]));
    session.mount().await.unwrap();
    let json = serde_json::to_value(session.view().await).unwrap();
    assert_eq!(json["panel"], "closed");
    assert_eq!(json["amplitudes"]["alpha_real"], 1.0);
}
