//! Pseudo-legal move generation and the attack oracle.
//!
//! `generate` answers "where can the piece on this square go" without
//! looking at whether its own king ends up attacked. With `attack_mode`
//! set it instead answers "which squares does this piece threaten": pawns
//! report both diagonals regardless of occupancy, kings skip castling and
//! the not-attacked filter (which would otherwise recurse forever through
//! `is_square_attacked`).

use crate::board::{Board, Color, Piece, PieceKind, Square};

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

const ROOK_DIRS: [(i8, i8); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];
const BISHOP_DIRS: [(i8, i8); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];

/// Destinations of the piece on `from`; empty when the square is empty.
pub fn generate(board: &Board, from: Square, attack_mode: bool) -> Vec<Square> {
    let piece = match board.piece_at(from) {
        Some(p) => p,
        None => return Vec::new(),
    };

    let mut out = Vec::with_capacity(28);
    match piece.kind {
        PieceKind::Pawn => pawn_moves(board, from, piece, attack_mode, &mut out),
        PieceKind::Knight => step_moves(board, from, piece.color, &KNIGHT_OFFSETS, &mut out),
        PieceKind::Bishop => slide_moves(board, from, piece.color, &BISHOP_DIRS, &mut out),
        PieceKind::Rook => slide_moves(board, from, piece.color, &ROOK_DIRS, &mut out),
        PieceKind::Queen => {
            slide_moves(board, from, piece.color, &ROOK_DIRS, &mut out);
            slide_moves(board, from, piece.color, &BISHOP_DIRS, &mut out);
        }
        PieceKind::King => {
            step_moves(board, from, piece.color, &KING_OFFSETS, &mut out);
            if !attack_mode {
                out.retain(|&to| !is_square_attacked(board, to, piece.color));
                castling_moves(board, from, piece, &mut out);
            }
        }
    }
    out
}

/// True when any piece of the color opposing `defender` threatens `target`.
pub fn is_square_attacked(board: &Board, target: Square, defender: Color) -> bool {
    let attacker = defender.opposite();
    board
        .pieces()
        .filter(|(_, p)| p.color == attacker)
        .any(|(sq, _)| generate(board, sq, true).contains(&target))
}

fn is_enemy(board: &Board, sq: Square, color: Color) -> bool {
    board.piece_at(sq).map_or(false, |p| p.color != color)
}

fn pawn_moves(board: &Board, from: Square, pawn: Piece, attack_mode: bool, out: &mut Vec<Square>) {
    let dir = pawn.color.forward();

    for df in [-1, 1] {
        if let Some(to) = from.offset(df, dir) {
            if attack_mode || is_enemy(board, to, pawn.color) {
                out.push(to);
            }
        }
    }
    if attack_mode {
        return;
    }

    // Spinta singola, poi doppia se il pedone non si è mai mosso
    if let Some(one) = from.offset(0, dir) {
        if board.is_empty(one) {
            out.push(one);
            if !pawn.has_moved {
                if let Some(two) = one.offset(0, dir) {
                    if board.is_empty(two) {
                        out.push(two);
                    }
                }
            }
        }
    }
}

fn step_moves(
    board: &Board,
    from: Square,
    color: Color,
    offsets: &[(i8, i8)],
    out: &mut Vec<Square>,
) {
    for &(df, dr) in offsets {
        if let Some(to) = from.offset(df, dr) {
            match board.piece_at(to) {
                Some(p) if p.color == color => {}
                _ => out.push(to),
            }
        }
    }
}

fn slide_moves(board: &Board, from: Square, color: Color, dirs: &[(i8, i8)], out: &mut Vec<Square>) {
    for &(df, dr) in dirs {
        let mut cur = from;
        while let Some(to) = cur.offset(df, dr) {
            match board.piece_at(to) {
                None => out.push(to),
                Some(p) => {
                    if p.color != color {
                        out.push(to);
                    }
                    break;
                }
            }
            cur = to;
        }
    }
}

fn unmoved_rook(board: &Board, sq: Square, color: Color) -> bool {
    matches!(
        board.piece_at(sq),
        Some(Piece { kind: PieceKind::Rook, color: c, has_moved: false }) if c == color
    )
}

// King square, transit square and destination must all be unattacked.
// The b-file square on the long side only has to be empty.
fn castling_moves(board: &Board, from: Square, king: Piece, out: &mut Vec<Square>) {
    if king.has_moved || from.file != 4 {
        return;
    }
    let rank = from.rank;
    let at = |file: u8| Square::new(file, rank);
    let safe = |file: u8| !is_square_attacked(board, at(file), king.color);

    if unmoved_rook(board, at(7), king.color)
        && board.is_empty(at(5))
        && board.is_empty(at(6))
        && safe(4)
        && safe(5)
        && safe(6)
    {
        out.push(at(6));
    }

    if unmoved_rook(board, at(0), king.color)
        && board.is_empty(at(1))
        && board.is_empty(at(2))
        && board.is_empty(at(3))
        && safe(4)
        && safe(3)
        && safe(2)
    {
        out.push(at(2));
    }
}
