use arrocco::board::{Board, Color, Move, PieceKind, START_FEN};
use arrocco::eval::{evaluate, PAWN_VALUE, QUEEN_VALUE};
use arrocco::search::{best_move, Search, SearchParams, MATE};

fn board(fen: &str) -> (Board, Color) {
    Board::from_fen(fen).expect("Invalid FEN")
}

fn mating_search(fen: &str, depth: u8) -> (Option<String>, i32) {
    let (board, side) = board(fen);
    let params = SearchParams::new().depth(depth).score_mates(true);
    let mut search = Search::new(params);
    let result = search.search(&board, side);
    println!(
        "depth {} on {}: {:?} score {} ({} nodes)",
        depth,
        fen,
        result.mv.map(|m| m.to_string()),
        result.score,
        search.stats().nodes
    );
    (result.mv.map(|m| m.to_string()), result.score)
}

#[test]
fn search_is_deterministic() {
    let (board, side) = board(START_FEN);
    let first = best_move(&board, side, 3);
    let second = best_move(&board, side, 3);
    assert_eq!(first, second);
    assert!(first.mv.is_some());
}

#[test]
fn mate_in_one_keeps_its_distance_at_any_depth() {
    let fen = "6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1";
    let (mv2, score2) = mating_search(fen, 2);
    let (mv3, score3) = mating_search(fen, 3);
    assert_eq!(score2, MATE - 1);
    assert_eq!(score3, MATE - 1);
    assert_eq!(mv2.as_deref(), Some("a1a8"));
    assert_eq!(mv3.as_deref(), Some("a1a8"));
}

#[test]
fn black_mate_is_negative() {
    let (mv, score) = mating_search("r5k1/8/8/8/8/8/5PPP/6K1 b - - 0 1", 2);
    assert_eq!(score, -(MATE - 1));
    assert_eq!(mv.as_deref(), Some("a8a1"));
}

#[test]
fn default_search_scores_a_mated_side_statically() {
    let (board, side) = board("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1");
    let result = Search::new(SearchParams::new()).search(&board, side);
    assert_eq!(result.mv, None);
    assert_eq!(result.score, evaluate(&board));
    assert!(!result.is_mate());
}

#[test]
fn promotion_is_worth_about_a_queen() {
    let (board, side) = board("8/P6k/8/8/8/8/8/K7 w - - 0 1");
    let before = evaluate(&board);
    let result = best_move(&board, side, 1);
    let mv = result.mv.expect("a move");
    assert_eq!(mv, Move::from_uci("a7a8q").unwrap());
    assert_eq!(mv.promotion, Some(PieceKind::Queen));
    assert!(result.score - before >= QUEEN_VALUE - 2 * PAWN_VALUE);
}

#[test]
fn starting_position_is_balanced() {
    let (board, side) = board(START_FEN);
    let mut search = Search::new(SearchParams::new().depth(2));
    let result = search.search(&board, side);
    assert!(
        result.score > -100 && result.score < 100,
        "Startpos score {} outside reasonable range",
        result.score
    );
    assert!(search.stats().nodes > 20);
    assert!(search.stats().evaluations > 0);
}
