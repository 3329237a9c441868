// Coordinate della griglia: board[rank][file]
// rank 0 = ottava traversa (casa del Nero), rank 7 = prima traversa (casa del Bianco)
// file 0 = colonna "a". In notazione algebrica la traversa vale 8 - rank.

use std::fmt;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    pub fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row delta of a single pawn step.
    pub fn forward(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// Back rank where king and rooks start.
    pub fn home_rank(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    pub fn pawn_rank(self) -> u8 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }

    pub fn promotion_rank(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    pub fn fen_char(self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl PieceKind {
    /// Promotion choices, in the order the legality filter emits them.
    pub const PROMOTIONS: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];

    /// Lowercase letter used by FEN and UCI promotion suffixes.
    pub fn to_char(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    pub fn from_char(ch: char) -> Option<PieceKind> {
        match ch.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }
}

/// A piece is a plain value stored in a board slot; `has_moved` is the only
/// history the board keeps (pawn double step, castling).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub has_moved: bool,
}

impl Piece {
    pub fn new(kind: PieceKind, color: Color) -> Self {
        Self {
            kind,
            color,
            has_moved: false,
        }
    }

    /// Same piece after it has been moved at least once.
    pub fn moved(self) -> Self {
        Self {
            has_moved: true,
            ..self
        }
    }

    pub fn fen_char(self) -> char {
        let ch = self.kind.to_char();
        match self.color {
            Color::White => ch.to_ascii_uppercase(),
            Color::Black => ch,
        }
    }

    fn from_fen_char(ch: char) -> Option<Piece> {
        let kind = PieceKind::from_char(ch)?;
        let color = if ch.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some(Piece::new(kind, color))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    pub file: u8,
    pub rank: u8,
}

impl Square {
    /// Coordinates must be on the board; use `offset` or `from_algebraic`
    /// when they come from arithmetic or user input.
    pub const fn new(file: u8, rank: u8) -> Self {
        debug_assert!(file < 8 && rank < 8, "square off the board");
        Self { file, rank }
    }

    /// Square displaced by (df, dr), or None when it falls off the board.
    pub fn offset(self, df: i8, dr: i8) -> Option<Square> {
        let file = self.file as i8 + df;
        let rank = self.rank as i8 + dr;
        if (0..8).contains(&file) && (0..8).contains(&rank) {
            Some(Square::new(file as u8, rank as u8))
        } else {
            None
        }
    }

    /// All 64 squares, rank-major then file.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..8u8).flat_map(|rank| (0..8u8).map(move |file| Square::new(file, rank)))
    }

    /// Parse "e2"-style notation.
    pub fn from_algebraic(text: &str) -> Result<Square> {
        let bytes = text.as_bytes();
        if bytes.len() != 2 {
            return Err(Error::InvalidNotation(text.to_string()));
        }
        let (file, digit) = (bytes[0], bytes[1]);
        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&digit) {
            return Err(Error::InvalidNotation(text.to_string()));
        }
        Ok(Square::new(file - b'a', 8 - (digit - b'0')))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file) as char, 8 - self.rank)
    }
}

/// Candidate transformation of a board. Castling is a two-file king move;
/// `promotion` is only meaningful for a pawn reaching the last rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    pub fn with_promotion(from: Square, to: Square, kind: PieceKind) -> Self {
        Self {
            from,
            to,
            promotion: Some(kind),
        }
    }

    /// Parse UCI long algebraic notation ("e2e4", "e7e8q").
    pub fn from_uci(text: &str) -> Result<Move> {
        if !text.is_ascii() || !(4..=5).contains(&text.len()) {
            return Err(Error::InvalidNotation(text.to_string()));
        }
        let from = Square::from_algebraic(&text[0..2])?;
        let to = Square::from_algebraic(&text[2..4])?;
        let promotion = match text[4..].chars().next() {
            None => None,
            Some(ch) => match PieceKind::from_char(ch) {
                Some(kind) if PieceKind::PROMOTIONS.contains(&kind) && ch.is_ascii_lowercase() => {
                    Some(kind)
                }
                _ => return Err(Error::InvalidNotation(text.to_string())),
            },
        };
        Ok(Move {
            from,
            to,
            promotion,
        })
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(kind) = self.promotion {
            write!(f, "{}", kind.to_char())?;
        }
        Ok(())
    }
}

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

const BACK_ROW: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// 8x8 grid of optional pieces. Treated as a value: every move produces a
/// new board and the original stays untouched.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}

impl Board {
    pub fn empty() -> Self {
        Self {
            squares: [[None; 8]; 8],
        }
    }

    /// Standard starting arrangement, every piece unmoved.
    pub fn initial() -> Self {
        let mut board = Self::empty();
        for (file, &kind) in BACK_ROW.iter().enumerate() {
            let file = file as u8;
            for color in [Color::White, Color::Black] {
                board.set(
                    Square::new(file, color.home_rank()),
                    Some(Piece::new(kind, color)),
                );
                board.set(
                    Square::new(file, color.pawn_rank()),
                    Some(Piece::new(PieceKind::Pawn, color)),
                );
            }
        }
        board
    }

    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.rank as usize][sq.file as usize]
    }

    // Scrive direttamente lo slot; usato da setup e dall'applicatore di mosse
    pub fn set(&mut self, sq: Square, piece: Option<Piece>) {
        self.squares[sq.rank as usize][sq.file as usize] = piece;
    }

    fn take(&mut self, sq: Square) -> Option<Piece> {
        self.squares[sq.rank as usize][sq.file as usize].take()
    }

    pub fn is_empty(&self, sq: Square) -> bool {
        self.piece_at(sq).is_none()
    }

    /// Occupied squares in rank-major, file-minor order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| self.piece_at(sq).map(|p| (sq, p)))
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces()
            .find(|(_, p)| p.kind == PieceKind::King && p.color == color)
            .map(|(sq, _)| sq)
    }

    /// Apply a move after checking it against the legal set of its source
    /// square. A promotion left unspecified matches the queen promotion.
    pub fn apply(&self, mv: Move) -> Result<Board> {
        let legal = crate::rules::legal_moves(self, mv.from);
        let accepted = legal.iter().any(|m| {
            m.to == mv.to
                && (m.promotion == mv.promotion
                    || (mv.promotion.is_none() && m.promotion == Some(PieceKind::Queen)))
        });
        if !accepted {
            return Err(Error::IllegalMove(mv));
        }
        Ok(self.apply_unchecked(mv))
    }

    /// Apply a move without validation. Caller must have taken `mv` from the
    /// legality filter (or be simulating one of its candidates).
    pub fn apply_unchecked(&self, mv: Move) -> Board {
        let mut next = self.clone();
        let piece = match next.take(mv.from) {
            Some(p) => p,
            None => return next,
        };

        let mut placed = piece.moved();
        if piece.kind == PieceKind::Pawn && mv.to.rank == piece.color.promotion_rank() {
            placed.kind = mv.promotion.unwrap_or(PieceKind::Queen);
        }
        next.set(mv.to, Some(placed));

        // Arrocco riconosciuto a posteriori dallo spostamento di due colonne del re
        if piece.kind == PieceKind::King && mv.from.file.abs_diff(mv.to.file) == 2 {
            let (rook_file, rook_dest) = if mv.to.file > mv.from.file {
                (7, mv.to.file - 1)
            } else {
                (0, mv.to.file + 1)
            };
            let rank = mv.from.rank;
            if let Some(rook) = next.take(Square::new(rook_file, rank)) {
                next.set(Square::new(rook_dest, rank), Some(rook.moved()));
            }
        }
        next
    }

    /// Parse a FEN record. Only the placement field is required; side to
    /// move defaults to white. `has_moved` is reconstructed: pawns off their
    /// starting rank are moved, kings and rooks keep their castling potential
    /// only when the castling field grants it (or when it is absent).
    pub fn from_fen(fen: &str) -> Result<(Board, Color)> {
        let mut parts = fen.split_whitespace();
        let placement = parts
            .next()
            .ok_or_else(|| Error::InvalidFen("missing piece placement".to_string()))?;
        let side = match parts.next() {
            None | Some("w") => Color::White,
            Some("b") => Color::Black,
            Some(other) => return Err(Error::InvalidFen(format!("invalid side '{}'", other))),
        };
        let castling = parts.next();
        if let Some(field) = castling {
            if field != "-" && !field.chars().all(|c| "KQkq".contains(c)) {
                return Err(Error::InvalidFen(format!("invalid castling '{}'", field)));
            }
        }

        let rows: Vec<&str> = placement.split('/').collect();
        if rows.len() != 8 {
            return Err(Error::InvalidFen(format!(
                "expected 8 ranks, found {}",
                rows.len()
            )));
        }

        let mut board = Board::empty();
        for (rank, row) in rows.iter().enumerate() {
            let mut file = 0u8;
            for ch in row.chars() {
                if let Some(skip) = ch.to_digit(10) {
                    if skip == 0 || skip > 8 {
                        return Err(Error::InvalidFen(format!("bad empty count '{}'", ch)));
                    }
                    file += skip as u8;
                } else {
                    let piece = Piece::from_fen_char(ch)
                        .ok_or_else(|| Error::InvalidFen(format!("invalid piece char '{}'", ch)))?;
                    if file >= 8 {
                        return Err(Error::InvalidFen(format!("rank {} too long", 8 - rank)));
                    }
                    board.set(Square::new(file, rank as u8), Some(piece));
                    file += 1;
                }
                if file > 8 {
                    return Err(Error::InvalidFen(format!("rank {} too long", 8 - rank)));
                }
            }
            if file != 8 {
                return Err(Error::InvalidFen(format!("rank {} too short", 8 - rank)));
            }
        }

        for color in [Color::White, Color::Black] {
            let kings = board
                .pieces()
                .filter(|(_, p)| p.kind == PieceKind::King && p.color == color)
                .count();
            if kings > 1 {
                return Err(Error::InvalidFen(format!("{:?} has {} kings", color, kings)));
            }
        }

        let grants = |right: char| castling.map_or(true, |field| field.contains(right));
        let snapshot: Vec<(Square, Piece)> = board.pieces().collect();
        for (sq, piece) in snapshot {
            let home = piece.color.home_rank();
            let (king_side, queen_side) = match piece.color {
                Color::White => ('K', 'Q'),
                Color::Black => ('k', 'q'),
            };
            let unmoved = match piece.kind {
                PieceKind::Pawn => sq.rank == piece.color.pawn_rank(),
                PieceKind::King => {
                    sq == Square::new(4, home) && (grants(king_side) || grants(queen_side))
                }
                PieceKind::Rook if sq == Square::new(7, home) => grants(king_side),
                PieceKind::Rook if sq == Square::new(0, home) => grants(queen_side),
                PieceKind::Rook => false,
                _ => true,
            };
            if !unmoved {
                board.set(sq, Some(piece.moved()));
            }
        }

        Ok((board, side))
    }

    /// FEN as sent to external engines: castling and en passant are not
    /// tracked here and are always emitted as absent.
    pub fn to_fen(&self, side: Color) -> String {
        let mut fen = String::with_capacity(64);
        for rank in 0..8u8 {
            let mut empty = 0;
            for file in 0..8u8 {
                match self.piece_at(Square::new(file, rank)) {
                    Some(piece) => {
                        if empty > 0 {
                            fen.push_str(&empty.to_string());
                            empty = 0;
                        }
                        fen.push(piece.fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                fen.push_str(&empty.to_string());
            }
            if rank < 7 {
                fen.push('/');
            }
        }
        format!("{} {} - - 0 1", fen, side.fen_char())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({})", self.to_fen(Color::White))
    }
}

// Rendering testuale, ottava traversa in alto
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in 0..8u8 {
            write!(f, "{} ", 8 - rank)?;
            for file in 0..8u8 {
                match self.piece_at(Square::new(file, rank)) {
                    Some(piece) => write!(f, "{} ", piece.fen_char())?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f)?;
        }
        writeln!(f, "  a b c d e f g h")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(text: &str) -> Square {
        Square::from_algebraic(text).unwrap()
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "square off the board")]
    fn square_outside_the_board_is_rejected() {
        let _ = Square::new(8, 0);
    }

    #[test]
    fn algebraic_mapping_follows_row_inversion() {
        assert_eq!(sq("a8"), Square::new(0, 0));
        assert_eq!(sq("h1"), Square::new(7, 7));
        assert_eq!(sq("e2"), Square::new(4, 6));
        assert_eq!(Square::new(3, 4).to_string(), "d4");
        assert!(Square::from_algebraic("i1").is_err());
        assert!(Square::from_algebraic("a9").is_err());
    }

    #[test]
    fn uci_move_parsing() {
        let mv = Move::from_uci("e7e8q").unwrap();
        assert_eq!(mv.from, sq("e7"));
        assert_eq!(mv.to, sq("e8"));
        assert_eq!(mv.promotion, Some(PieceKind::Queen));
        assert_eq!(mv.to_string(), "e7e8q");
        assert!(Move::from_uci("e7e8k").is_err());
        assert!(Move::from_uci("e7").is_err());
        assert!(Move::from_uci("(none)").is_err());
    }

    #[test]
    fn initial_position_fen() {
        let board = Board::initial();
        assert_eq!(
            board.to_fen(Color::White),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1"
        );
        let (parsed, side) = Board::from_fen(START_FEN).unwrap();
        assert_eq!(side, Color::White);
        assert_eq!(parsed, board);
    }

    #[test]
    fn fen_reconstructs_has_moved() {
        let (board, side) = Board::from_fen("r3k2r/8/8/8/4P3/8/P7/R3K2R b Kq - 0 1").unwrap();
        assert_eq!(side, Color::Black);
        assert!(!board.piece_at(sq("h1")).unwrap().has_moved);
        assert!(board.piece_at(sq("a1")).unwrap().has_moved);
        assert!(!board.piece_at(sq("e1")).unwrap().has_moved);
        assert!(!board.piece_at(sq("a8")).unwrap().has_moved);
        assert!(board.piece_at(sq("h8")).unwrap().has_moved);
        assert!(!board.piece_at(sq("a2")).unwrap().has_moved);
        assert!(board.piece_at(sq("e4")).unwrap().has_moved);
    }

    #[test]
    fn fen_rejects_malformed_input() {
        assert!(Board::from_fen("").is_err());
        assert!(Board::from_fen("8/8/8/8/8/8/8 w - - 0 1").is_err());
        assert!(Board::from_fen("9/8/8/8/8/8/8/8 w - - 0 1").is_err());
        assert!(Board::from_fen("8/8/8/8/8/8/8/7x w - - 0 1").is_err());
        assert!(Board::from_fen("8/8/8/8/8/8/8/8 x - - 0 1").is_err());
        assert!(Board::from_fen("k7/8/8/8/8/8/8/KK6 w - - 0 1").is_err());
    }

    #[test]
    fn apply_leaves_source_board_untouched() {
        let board = Board::initial();
        let next = board.apply(Move::from_uci("e2e4").unwrap()).unwrap();
        assert!(board.piece_at(sq("e4")).is_none());
        assert!(board.piece_at(sq("e2")).is_some());
        let pawn = next.piece_at(sq("e4")).unwrap();
        assert_eq!(pawn.kind, PieceKind::Pawn);
        assert!(pawn.has_moved);
        assert!(next.is_empty(sq("e2")));
    }

    #[test]
    fn apply_rejects_moves_outside_legal_set() {
        let board = Board::initial();
        let mv = Move::from_uci("e2e5").unwrap();
        assert_eq!(board.apply(mv), Err(Error::IllegalMove(mv)));
        let from_empty = Move::from_uci("e4e5").unwrap();
        assert!(board.apply(from_empty).is_err());
    }

    #[test]
    fn castling_relocates_rook() {
        let (board, _) = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let short = board.apply(Move::from_uci("e1g1").unwrap()).unwrap();
        assert_eq!(short.piece_at(sq("g1")).unwrap().kind, PieceKind::King);
        let rook = short.piece_at(sq("f1")).unwrap();
        assert_eq!(rook.kind, PieceKind::Rook);
        assert!(rook.has_moved);
        assert!(short.is_empty(sq("h1")));

        let long = board.apply(Move::from_uci("e8c8").unwrap()).unwrap();
        assert_eq!(long.piece_at(sq("c8")).unwrap().kind, PieceKind::King);
        assert_eq!(long.piece_at(sq("d8")).unwrap().kind, PieceKind::Rook);
        assert!(long.is_empty(sq("a8")));
    }

    #[test]
    fn promotion_defaults_to_queen() {
        let (board, _) = Board::from_fen("8/P6k/8/8/8/8/8/K7 w - - 0 1").unwrap();
        let queen = board.apply(Move::from_uci("a7a8").unwrap()).unwrap();
        let piece = queen.piece_at(sq("a8")).unwrap();
        assert_eq!(piece.kind, PieceKind::Queen);
        assert_eq!(piece.color, Color::White);
        assert!(piece.has_moved);

        let knight = board.apply(Move::from_uci("a7a8n").unwrap()).unwrap();
        assert_eq!(knight.piece_at(sq("a8")).unwrap().kind, PieceKind::Knight);
    }
}
