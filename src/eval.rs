//! Modulo di valutazione - materiale + Piece-Square Tables (PSQT)
//!
//! Il punteggio è sempre dal punto di vista del BIANCO: positivo = meglio
//! per il Bianco. Ogni pezzo contribuisce valore materiale + bonus di
//! posizione, con segno dato dal colore.

use crate::board::{Board, Color, PieceKind};

// ============================================================================
// VALORI MATERIALI (in centipawn)
// ============================================================================
pub const PAWN_VALUE: i32 = 100;
pub const KNIGHT_VALUE: i32 = 320;
pub const BISHOP_VALUE: i32 = 330;
pub const ROOK_VALUE: i32 = 500;
pub const QUEEN_VALUE: i32 = 900;
pub const KING_VALUE: i32 = 20000;

// ============================================================================
// PIECE-SQUARE TABLES (dal punto di vista del BIANCO)
// ============================================================================
// Indici: [rank][file] con rank 0 = ottava traversa, come la griglia della
// scacchiera. Per il Nero si specchia verticalmente: rank -> 7 - rank.

/// PSQT per i pedoni
/// Incentiva:
/// - Pedoni centrali avanzati
/// - Pedoni alla settima traversa (vicini alla promozione)
/// Penalizza leggermente i pedoni centrali fermi davanti al re arroccato.
const PAWN_PSQT: [[i32; 8]; 8] = [
    [0, 0, 0, 0, 0, 0, 0, 0],
    [50, 50, 50, 50, 50, 50, 50, 50],
    [10, 10, 20, 30, 30, 20, 10, 10],
    [5, 5, 10, 25, 25, 10, 5, 5],
    [0, 0, 0, 20, 20, 0, 0, 0],
    [5, -5, -10, 0, 0, -10, -5, 5],
    [5, 10, 10, -20, -20, 10, 10, 5],
    [0, 0, 0, 0, 0, 0, 0, 0],
];

// Nessuna tabella calibrata per gli altri pezzi
const FLAT_PSQT: [[i32; 8]; 8] = [[0; 8]; 8];

pub fn piece_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => PAWN_VALUE,
        PieceKind::Knight => KNIGHT_VALUE,
        PieceKind::Bishop => BISHOP_VALUE,
        PieceKind::Rook => ROOK_VALUE,
        PieceKind::Queen => QUEEN_VALUE,
        PieceKind::King => KING_VALUE,
    }
}

fn psqt(kind: PieceKind) -> &'static [[i32; 8]; 8] {
    match kind {
        PieceKind::Pawn => &PAWN_PSQT,
        PieceKind::Knight
        | PieceKind::Bishop
        | PieceKind::Rook
        | PieceKind::Queen
        | PieceKind::King => &FLAT_PSQT,
    }
}

/// Static score of `board`, signed from white's perspective.
pub fn evaluate(board: &Board) -> i32 {
    board
        .pieces()
        .map(|(sq, piece)| {
            let row = match piece.color {
                Color::White => sq.rank,
                Color::Black => 7 - sq.rank,
            };
            let value =
                piece_value(piece.kind) + psqt(piece.kind)[row as usize][sq.file as usize];
            match piece.color {
                Color::White => value,
                Color::Black => -value,
            }
        })
        .sum()
}

// ============================================================================
// TESTS
// ============================================================================
