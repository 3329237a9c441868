//! Integration tests for UCI protocol implementation

use arrocco::search::SearchParams;
use arrocco::uci::{process_uci_line, UciEngine, UciState};
use arrocco::{Color, Move};

#[test]
fn test_uci_engine_lifecycle() {
    let mut engine = UciEngine::default();

    // Test initial state
    assert_eq!(*engine.state(), UciState::Init);

    // Test UCI handshake
    let responses = process_uci_line("uci", &mut engine);
    assert_eq!(responses.len(), 3);
    assert!(responses[0].starts_with("id name arrocco"));
    assert!(responses[1].starts_with("id author"));
    assert_eq!(responses[2], "uciok");
    assert_eq!(*engine.state(), UciState::Ready);

    process_uci_line("quit", &mut engine);
    assert!(!engine.is_running());
}

#[test]
fn test_basic_commands() {
    let mut engine = UciEngine::default();

    let responses = process_uci_line("isready", &mut engine);
    assert_eq!(responses, vec!["readyok".to_string()]);

    assert!(process_uci_line("stop", &mut engine).is_empty());
    let responses = process_uci_line("flip", &mut engine);
    assert_eq!(responses, vec!["info string unknown command: flip".to_string()]);
}

#[test]
fn test_go_command() {
    let mut engine = UciEngine::default();

    process_uci_line("position startpos moves e2e4", &mut engine);
    assert_eq!(engine.game().side(), Color::Black);

    let responses = process_uci_line("go depth 2", &mut engine);
    assert_eq!(responses.len(), 2);
    assert!(responses[0].starts_with("info depth 2 score cp "));
    let best = responses[1].strip_prefix("bestmove ").expect("bestmove line");
    let mv = Move::from_uci(best).unwrap();
    assert!(engine.game().legal_moves(mv.from).contains(&mv));
    assert_eq!(*engine.state(), UciState::Ready);
}

#[test]
fn test_go_uses_configured_default_depth() {
    let mut engine = UciEngine::new(SearchParams::new().depth(1));
    let responses = process_uci_line("go", &mut engine);
    assert!(responses[0].starts_with("info depth 1 "));
}

#[test]
fn test_go_depth_zero_still_moves() {
    let mut engine = UciEngine::default();
    process_uci_line("position startpos", &mut engine);
    let responses = process_uci_line("go depth 0", &mut engine);
    assert_eq!(responses.len(), 2);
    assert!(responses[0].starts_with("info depth 1 "));
    let best = responses[1].strip_prefix("bestmove ").expect("bestmove line");
    let mv = Move::from_uci(best).unwrap();
    assert!(engine.game().legal_moves(mv.from).contains(&mv));

    let mut engine = UciEngine::new(SearchParams::new().depth(0));
    let responses = process_uci_line("go", &mut engine);
    assert!(responses[0].starts_with("info depth 1 "));
    assert_ne!(responses.last().map(String::as_str), Some("bestmove (none)"));
}

#[test]
fn test_go_on_terminal_position() {
    let mut engine = UciEngine::default();
    process_uci_line("position fen R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1", &mut engine);
    let responses = process_uci_line("go depth 2", &mut engine);
    assert_eq!(responses.last().map(String::as_str), Some("bestmove (none)"));
    assert!(responses.iter().any(|r| r.starts_with("info string")));
}

#[test]
fn test_invalid_position_keeps_previous_one() {
    let mut engine = UciEngine::default();
    process_uci_line("position startpos moves e2e4", &mut engine);

    let responses = process_uci_line("position startpos moves e2e5", &mut engine);
    assert_eq!(responses.len(), 1);
    assert!(responses[0].starts_with("info string invalid move e2e5"));
    assert_eq!(engine.game().side(), Color::Black);

    let responses = process_uci_line("position fen not/a/fen w - - 0 1", &mut engine);
    assert!(responses[0].starts_with("info string"));
    assert_eq!(engine.game().side(), Color::Black);

    process_uci_line("ucinewgame", &mut engine);
    assert_eq!(engine.game().side(), Color::White);
}
