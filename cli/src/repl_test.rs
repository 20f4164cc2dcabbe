use super::*;
use wire::{AngleGate, FixedGate};

// =============================================================
// Gate words
// =============================================================

#[test]
fn gate_words_parse_case_insensitively() {
    assert_eq!(parse_line("h"), Ok(ReplCommand::Gate(GateName::Fixed(FixedGate::H))));
    assert_eq!(parse_line("  R_X "), Ok(ReplCommand::Gate(GateName::Angle(AngleGate::Rx))));
    assert_eq!(parse_line("Reset"), Ok(ReplCommand::Gate(GateName::Fixed(FixedGate::Reset))));
}

#[test]
fn unknown_word_is_reported() {
    assert_eq!(parse_line("cnot 0 1"), Err(ParseError::Unknown("cnot".to_owned())));
}

#[test]
fn blank_line_is_empty() {
    assert_eq!(parse_line(""), Ok(ReplCommand::Empty));
    assert_eq!(parse_line("   \t"), Ok(ReplCommand::Empty));
}

// =============================================================
// Panel and angle field
// =============================================================

#[test]
fn type_keeps_argument_text() {
    assert_eq!(parse_line("type 1.5"), Ok(ReplCommand::Type("1.5".to_owned())));
    assert_eq!(parse_line("  TYPE -0.5"), Ok(ReplCommand::Type("-0.5".to_owned())));
}

#[test]
fn type_keeps_surrounding_whitespace_as_typed() {
    assert_eq!(parse_line("type  1 "), Ok(ReplCommand::Type(" 1 ".to_owned())));
    assert_eq!(parse_line("type 2\t"), Ok(ReplCommand::Type("2\t".to_owned())));
}

#[test]
fn typed_whitespace_reaches_the_angle_field() {
    let Ok(ReplCommand::Type(text)) = parse_line("type  1 ") else {
        panic!("expected a type command");
    };
    let mut input = client::state::angle::ValidatedAngleInput::new();
    assert!(input.set_candidate(&text));
    assert_eq!(input.value(), " 1 ");
    assert_eq!(input.angle(), Some(1.0));
}

#[test]
fn bare_type_clears() {
    assert_eq!(parse_line("type"), Ok(ReplCommand::Type(String::new())));
}

#[test]
fn angle_and_housekeeping_words() {
    assert_eq!(parse_line("angle"), Ok(ReplCommand::Angle));
    assert_eq!(parse_line("refresh"), Ok(ReplCommand::Refresh));
    assert_eq!(parse_line("show"), Ok(ReplCommand::Show));
    assert_eq!(parse_line("dismiss "), Ok(ReplCommand::Dismiss));
    assert_eq!(parse_line("?"), Ok(ReplCommand::Help));
    assert_eq!(parse_line("exit"), Ok(ReplCommand::Quit));
}

// =============================================================
// Pointer
// =============================================================

#[test]
fn click_takes_two_coordinates() {
    assert_eq!(parse_line("click 120 4.5"), Ok(ReplCommand::Click { x: 120.0, y: 4.5 }));
}

#[test]
fn click_rejects_bad_arity_and_non_numbers() {
    assert_eq!(parse_line("click"), Err(ParseError::ClickUsage));
    assert_eq!(parse_line("click 1"), Err(ParseError::ClickUsage));
    assert_eq!(parse_line("click 1 2 3"), Err(ParseError::ClickUsage));
    assert_eq!(parse_line("click a 2"), Err(ParseError::ClickUsage));
    assert_eq!(parse_line("click inf 2"), Err(ParseError::ClickUsage));
}
