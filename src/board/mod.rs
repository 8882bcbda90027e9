//! Implements `Board` -- the chess state at one ply.

pub mod geometry;
pub mod zobrist;
mod generator;

use std::fmt;
use bitsets::*;
use castling_rights::*;
use files::file;
use moves::*;
use ranks::*;
use squares::*;

pub use self::generator::MoveGenType;
pub use self::geometry::BoardGeometry;
pub use self::zobrist::ZobristArrays;

/// A set of squares, one bit per square.
pub type Bitboard = u64;

/// A square number from 0 (A1) to 63 (H8), or `SQUARE_NULL`.
pub type Square = usize;

/// `WHITE` or `BLACK`.
pub type Color = usize;

pub const WHITE: Color = 0;
pub const BLACK: Color = 1;

/// `PAWN`, `KNIGHT`, `BISHOP`, `ROOK`, `QUEEN`, `KING`, or
/// `PIECE_NONE`.
pub type PieceType = usize;

pub const PAWN: PieceType = 0;
pub const KNIGHT: PieceType = 1;
pub const BISHOP: PieceType = 2;
pub const ROOK: PieceType = 3;
pub const QUEEN: PieceType = 4;
pub const KING: PieceType = 5;
pub const PIECE_NONE: PieceType = 6;

/// Evaluation value in centipawns, positive when white is ahead.
pub type Value = i16;

/// Search depth in half-moves.
pub type Depth = i16;

/// Maps `WHITE` to `+1` and `BLACK` to `-1`.
pub const COLOR_MULTIPLIER: [Value; 2] = [1, -1];

/// Piece values in tenths of a pawn, used by MVV-LVA capture
/// ordering.
pub const PIECE_VALUES: [Value; 6] = [10, 30, 31, 50, 90, 1000];

/// Piece values in tenths of a pawn, used by the static exchange
/// evaluator. `PIECE_NONE` maps to zero.
pub const SEE_VALUES: [Value; 7] = [10, 30, 30, 50, 90, 1000, 0];

/// Piece values in centipawns, used for the incrementally maintained
/// material score. Kings carry no material.
pub const MATERIAL_VALUES: [i32; 6] = [100, 300, 310, 500, 900, 0];

/// Game-phase weight of each piece type.
pub const PHASE_WEIGHTS: [i16; 6] = [0, 1, 1, 2, 4, 0];

/// The phase value of the full starting material.
pub const PHASE_TOTAL: i16 = 24;

/// An error signalling that a FEN string could not be understood.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FenError;

// The pawn-push sub-type index into `PAWN_MOVE_SHIFTS`.
const PAWN_PUSH: usize = 0;

/// Constants used for the generation of pawn moves (by bit shifting)
/// -- one for each color and pawn move sub-type.
pub static PAWN_MOVE_SHIFTS: [[isize; 4]; 2] = [[8, 16, 7, 9], [-8, -16, -9, -7]];

// Home squares of the castling rooks, indexed by side and color.
const ROOK_HOME_SQUARES: [[Square; 2]; 2] = [[A1, A8], [H1, H8]];

/// Holds a chess position and its incrementally maintained
/// aggregates.
///
/// A `Board` is a plain value: `make_move` returns the successor
/// board and leaves the original untouched. Undoing a move is
/// dropping the successor.
#[derive(Clone, Debug)]
pub struct Board {
    /// The placement of the pieces -- one bitboard for every (piece,
    /// color) pair.
    pieces: [[Bitboard; 2]; 6],

    /// The set of occupied squares for each color.
    color: [Bitboard; 2],

    /// The piece type on every square (`PIECE_NONE` when empty).
    mailbox: [PieceType; 64],

    /// The side to move.
    to_move: Color,

    /// The castling rights for both players.
    castling_rights: CastlingRights,

    /// The en-passant target square, or `SQUARE_NULL`.
    enpassant_square: Square,

    /// The number of half-moves since the last capture or pawn
    /// advance.
    halfmove_clock: u8,

    /// The number of the full move, starting at 1 and incremented
    /// after black's move.
    fullmove_number: u16,

    /// The Zobrist hash of the position.
    hash: u64,

    /// The material balance in centipawns (white minus black).
    material: i32,

    /// The game phase, stored unclamped (`phase()` clamps at zero).
    phase: i16,

    /// All enemy pieces that attack the king of the side to move.
    checkers: Bitboard,
}

impl Board {
    /// Creates a new instance from a Forsyth-Edwards Notation (FEN)
    /// string.
    ///
    /// Parsing is best-effort: a string whose fields cannot be
    /// understood yields the standard starting position. Missing
    /// trailing fields default to `- 0 1`, and the fullmove number is
    /// clamped to be at least 1.
    pub fn from_fen(fen: &str) -> Board {
        Board::try_from_fen(fen).unwrap_or_default()
    }

    /// Creates a new instance from a FEN string, reporting failure.
    pub fn try_from_fen(fen: &str) -> Result<Board, FenError> {
        let fields: Vec<_> = fen.split_whitespace().collect();
        if fields.len() < 2 {
            return Err(FenError);
        }
        let mut board = Board::empty();
        board.parse_placement(fields[0])?;
        board.to_move = match fields[1] {
            "w" => WHITE,
            "b" => BLACK,
            _ => return Err(FenError),
        };
        board.parse_castling(fields.get(2).cloned().unwrap_or("-"))?;
        board.parse_enpassant(fields.get(3).cloned().unwrap_or("-"))?;
        board.halfmove_clock = match fields.get(4) {
            Some(s) => s.parse().map_err(|_| FenError)?,
            None => 0,
        };
        board.fullmove_number = match fields.get(5) {
            Some(s) => s.parse().map_err(|_| FenError)?,
            None => 1,
        };
        board.fullmove_number = ::std::cmp::max(board.fullmove_number, 1);

        // One king per color, and the side that is not to move may
        // not be in check.
        for color in 0..2 {
            if pop_count(board.pieces[KING][color]) != 1 {
                return Err(FenError);
            }
        }
        if board.attackers(board.king_square(1 ^ board.to_move),
                           board.occupancy(),
                           board.to_move) != 0 {
            return Err(FenError);
        }

        // Finish the hash: side to move and en-passant file.
        if board.to_move == BLACK {
            board.hash ^= ZobristArrays::get().to_move;
        }
        if board.enpassant_square != SQUARE_NULL {
            board.hash ^= ZobristArrays::get().enpassant_file[file(board.enpassant_square)];
        }

        board.update_checkers();
        debug_assert!(board.is_valid());
        Ok(board)
    }

    /// Returns the canonical FEN string for the position.
    pub fn to_fen(&self) -> String {
        let mut fen = String::with_capacity(90);

        for rank in (0..8).rev() {
            let mut space = 0;
            for file in 0..8 {
                let sq = square(file, rank);
                match self.mailbox[sq] {
                    PIECE_NONE => space += 1,
                    piece => {
                        if space > 0 {
                            fen.push_str(&space.to_string());
                            space = 0;
                        }
                        fen.push(piece_to_char(piece, self.color_at(sq)));
                    }
                }
            }
            if space > 0 {
                fen.push_str(&space.to_string());
            }
            fen.push(if rank > 0 { '/' } else { ' ' });
        }

        fen.push_str(if self.to_move == WHITE { "w " } else { "b " });

        let mut any_rights = false;
        for &color in &[WHITE, BLACK] {
            for &side in &[KINGSIDE, QUEENSIDE] {
                if self.castling_rights.can_castle(color, side) {
                    any_rights = true;
                    let c = if side == KINGSIDE { 'k' } else { 'q' };
                    fen.push(if color == WHITE { c.to_ascii_uppercase() } else { c });
                }
            }
        }
        fen.push_str(if any_rights { " " } else { "- " });

        if self.enpassant_square == SQUARE_NULL {
            fen.push_str("- ");
        } else {
            fen.push_str(square_notation(self.enpassant_square));
            fen.push(' ');
        }

        fen.push_str(&format!("{} {}", self.halfmove_clock, self.fullmove_number));
        fen
    }

    /// Plays a move and returns the successor board.
    ///
    /// The move must be legal in the current position (use `legal` or
    /// one of the generators). Passing an illegal move is a contract
    /// violation -- debug builds will catch it with `is_valid`.
    pub fn make_move(&self, m: Move) -> Board {
        debug_assert!(self.legal(m));
        let mut result = self.clone();
        let us = self.to_move;
        let them = 1 ^ us;
        let up = PAWN_MOVE_SHIFTS[us][PAWN_PUSH];
        let orig_square = m.orig_square();
        let dest_square = m.dest_square();
        let piece = self.mailbox[orig_square];

        // Clocks: the fullmove number grows after black's move, the
        // halfmove clock resets on any pawn move or capture.
        result.fullmove_number += us as u16;
        if piece == PAWN || m.is_capture() {
            result.halfmove_clock = 0;
        } else {
            result.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }

        result.enpassant_square = SQUARE_NULL;

        // Castling rights lost by the moving side.
        if piece == KING {
            result.clear_castling(KINGSIDE, us);
            result.clear_castling(QUEENSIDE, us);
        } else if piece == ROOK {
            if orig_square == ROOK_HOME_SQUARES[KINGSIDE][us] {
                result.clear_castling(KINGSIDE, us);
            }
            if orig_square == ROOK_HOME_SQUARES[QUEENSIDE][us] {
                result.clear_castling(QUEENSIDE, us);
            }
        }

        if m.is_capture() {
            // The captured square differs from the destination for
            // en-passant captures.
            let target = if m.is_ep_capture() {
                (dest_square as isize - up) as Square
            } else {
                dest_square
            };
            let captured = result.mailbox[target];
            result.pop_piece(captured, them, target);

            // Castling rights lost by the opponent when a rook is
            // captured on its home square.
            if dest_square == ROOK_HOME_SQUARES[KINGSIDE][them] {
                result.clear_castling(KINGSIDE, them);
            }
            if dest_square == ROOK_HOME_SQUARES[QUEENSIDE][them] {
                result.clear_castling(QUEENSIDE, them);
            }
        } else if m.is_double_pawn_push() {
            result.enpassant_square = (dest_square as isize - up) as Square;
            result.hash ^= ZobristArrays::get().enpassant_file[file(dest_square)];
        } else if m.is_castle() {
            // The rook's path is derived from the king's: the rook
            // starts at the corner past the king's destination and
            // ends on the square the king crossed.
            let (rook_from, rook_to) = if dest_square > orig_square {
                (dest_square + 1, dest_square - 1)
            } else {
                (dest_square - 2, dest_square + 1)
            };
            result.move_piece(ROOK, us, rook_from, rook_to);
        }

        if m.is_promotion() {
            result.pop_piece(PAWN, us, orig_square);
            result.set_piece(m.promo_piece(), us, dest_square);
        } else {
            result.move_piece(piece, us, orig_square, dest_square);
        }

        result.to_move = them;
        result.hash ^= ZobristArrays::get().to_move;

        // The previous en-passant file leaves the hash.
        if self.enpassant_square != SQUARE_NULL {
            result.hash ^= ZobristArrays::get().enpassant_file[file(self.enpassant_square)];
        }

        result.update_checkers();
        debug_assert!(result.is_valid());
        result
    }

    /// Swaps the side to move without playing a move.
    ///
    /// Used by null-move pruning. The side to move must not be in
    /// check.
    pub fn make_null_move(&self) -> Board {
        debug_assert!(!self.in_check());
        let mut result = self.clone();
        result.enpassant_square = SQUARE_NULL;
        if self.enpassant_square != SQUARE_NULL {
            result.hash ^= ZobristArrays::get().enpassant_file[file(self.enpassant_square)];
        }
        result.to_move = 1 ^ self.to_move;
        result.hash ^= ZobristArrays::get().to_move;
        result.update_checkers();
        debug_assert!(result.is_valid());
        result
    }

    /// Performs a full legality verification for a candidate move.
    ///
    /// Any 16-bit value can be passed here -- transposition table
    /// moves, killers and countermoves included. The move is legal
    /// only if playing it on the current board is possible and does
    /// not leave our own king in check.
    pub fn legal(&self, m: Move) -> bool {
        let orig_square = m.orig_square();
        let dest_square = m.dest_square();
        if orig_square == dest_square {
            return false;
        }

        let move_type = m.move_type();
        if move_type == MOVE_INVALID_1 || move_type == MOVE_INVALID_2 {
            return false;
        }

        if m.is_ep_capture() &&
           (self.enpassant_square == SQUARE_NULL || dest_square != self.enpassant_square) {
            return false;
        }

        let us = self.to_move;
        let them = 1 ^ us;
        let our_pieces = self.color[us];
        if our_pieces & (1 << orig_square) == 0 || our_pieces & (1 << dest_square) != 0 {
            return false;
        }

        // The capture tag must agree with what stands on the
        // destination square (the en-passant square counts as an
        // enemy pawn for a properly flagged en-passant capture).
        let piece = self.mailbox[orig_square];
        let mut enemy_pieces = self.color[them];
        if m.is_ep_capture() && piece == PAWN {
            enemy_pieces |= 1 << self.enpassant_square;
        }
        if (enemy_pieces & (1 << dest_square) != 0) != m.is_capture() {
            return false;
        }

        // Pawn-only flags on non-pawns, castle flags on non-kings.
        if piece != PAWN &&
           (m.is_double_pawn_push() || m.is_ep_capture() || m.is_promotion()) {
            return false;
        }
        if piece != KING && m.is_castle() {
            return false;
        }

        match piece {
            PAWN => self.legal_pawn(m),
            KNIGHT..=QUEEN => self.legal_piece(piece, m),
            KING => self.legal_king(m),
            _ => false,
        }
    }

    /// Returns the set of pieces of a given color that attack a given
    /// square, assuming the given occupancy.
    ///
    /// The occupancy may differ from the board's own -- the static
    /// exchange evaluator passes reduced occupancies to look through
    /// pieces that have already been traded off.
    #[inline]
    pub fn attackers(&self, square: Square, occupancy: Bitboard, by: Color) -> Bitboard {
        debug_assert!(square <= 63);
        debug_assert!(by <= 1);
        let g = BoardGeometry::get();
        let queens = self.pieces[QUEEN][by];
        (g.attacks_from(ROOK, square, occupancy) & (self.pieces[ROOK][by] | queens)) |
        (g.attacks_from(BISHOP, square, occupancy) & (self.pieces[BISHOP][by] | queens)) |
        (g.attacks_from(KNIGHT, square, occupancy) & self.pieces[KNIGHT][by]) |
        (g.attacks_from(KING, square, occupancy) & self.pieces[KING][by]) |
        (g.pawn_attacks[1 ^ by][square] & self.pieces[PAWN][by])
    }

    /// Statically evaluates the exchange a capture starts.
    ///
    /// Returns the expected material gain in centipawns for the side
    /// playing `m`, assuming both sides keep capturing on the
    /// destination square with their least valuable attacker, and
    /// either side may stop when it is ahead. `threshold` (also in
    /// centipawns) is subtracted from the initial gain, so
    /// `see(m, t) >= 0` asks "does this exchange win at least `t`".
    ///
    /// The exchange is abandoned early once the side to move is
    /// already ahead -- the returned magnitude is then a lower bound,
    /// but the sign is exact.
    pub fn see(&self, m: Move, threshold: Value) -> Value {
        let target = m.dest_square();

        // The initial capture.
        let mut last_attacker = self.mailbox[m.orig_square()];
        let victim = if m.is_ep_capture() {
            PAWN
        } else {
            self.mailbox[target]
        };
        let mut gain = SEE_VALUES[victim] - threshold / 10;
        let mut occupancy = self.occupancy() ^ (1 << m.orig_square());
        let mut side = 1 ^ self.to_move;
        let mut color_mult: Value = -1;

        let mut attackers = self.attackers(target, occupancy, side) & occupancy;
        while attackers != 0 {
            // The side to move may stop a sequence it is already
            // winning, so the remaining captures cannot change the
            // outcome.
            if color_mult * gain > 0 {
                return 10 * gain;
            }

            let attacker = self.least_valuable(attackers);
            gain += color_mult * SEE_VALUES[last_attacker];
            last_attacker = self.mailbox[attacker];
            occupancy ^= 1 << attacker;
            side = 1 ^ side;
            color_mult = -color_mult;

            attackers = self.attackers(target, occupancy, side) & occupancy;
        }

        10 * gain
    }

    /// Verifies all board invariants.
    ///
    /// This is the oracle the debug assertions and the test suite
    /// use. A `false` result always signals a bug.
    pub fn is_valid(&self) -> bool {
        // Exactly one king per color.
        if pop_count(self.pieces[KING][WHITE]) != 1 ||
           pop_count(self.pieces[KING][BLACK]) != 1 {
            return false;
        }

        // Piece bitboards are pairwise disjoint and their union is
        // the occupancy.
        let mut occupancy: Bitboard = 0;
        let mut color: [Bitboard; 2] = [0, 0];
        for piece in PAWN..KING + 1 {
            for c in 0..2 {
                if self.pieces[piece][c] & occupancy != 0 {
                    return false;
                }
                occupancy |= self.pieces[piece][c];
                color[c] |= self.pieces[piece][c];
            }
        }
        if color != self.color || occupancy != self.occupancy() {
            return false;
        }

        // The mailbox agrees with the bitboards on every square.
        for sq in 0..64 {
            match self.mailbox[sq] {
                PIECE_NONE => {
                    if occupancy & (1 << sq) != 0 {
                        return false;
                    }
                }
                piece => {
                    if (self.pieces[piece][WHITE] | self.pieces[piece][BLACK]) & (1 << sq) == 0 {
                        return false;
                    }
                }
            }
        }

        // The incremental hash matches a from-scratch recomputation.
        if self.hash != self.generate_hash() {
            return false;
        }

        // Material and phase match a from-scratch recomputation.
        let mut material: i32 = 0;
        let mut phase = PHASE_TOTAL;
        for piece in PAWN..KING + 1 {
            for c in 0..2 {
                let count = pop_count(self.pieces[piece][c]);
                material += MATERIAL_VALUES[piece] * count as i32 * COLOR_MULTIPLIER[c] as i32;
                phase -= PHASE_WEIGHTS[piece] * count as i16;
            }
        }
        if material != self.material || phase != self.phase {
            return false;
        }

        // The side that just moved may not be in check.
        let us = self.to_move;
        let them = 1 ^ us;
        if self.attackers(self.king_square(them), occupancy, us) != 0 {
            return false;
        }

        // The checkers mask is the set of enemy pieces attacking our
        // king.
        if self.checkers != self.attackers(self.king_square(us), occupancy, them) {
            return false;
        }

        // A castling right implies its king and rook never moved.
        for side in 0..2 {
            for c in 0..2 {
                if self.castling_rights.can_castle(c, side) &&
                   (self.pieces[KING][c] & (1 << [E1, E8][c]) == 0 ||
                    self.pieces[ROOK][c] & (1 << ROOK_HOME_SQUARES[side][c]) == 0) {
                    return false;
                }
            }
        }

        // En-passant square consistency.
        if self.enpassant_square != SQUARE_NULL {
            let ep = self.enpassant_square;
            let expected_rank = if us == BLACK { RANK_3 } else { RANK_6 };
            if rank(ep) != expected_rank {
                return false;
            }
            let pushed = (ep as isize - PAWN_MOVE_SHIFTS[us][PAWN_PUSH]) as Square;
            if occupancy & (1 << ep) != 0 || self.pieces[PAWN][them] & (1 << pushed) == 0 {
                return false;
            }
        }

        true
    }

    /// Recomputes the Zobrist hash from scratch.
    pub fn generate_hash(&self) -> u64 {
        let zobrist = ZobristArrays::get();
        let mut hash = 0;

        for piece in PAWN..KING + 1 {
            for color in 0..2 {
                let mut bb = self.pieces[piece][color];
                while bb != 0 {
                    hash ^= zobrist.piece(piece, color, bsf_reset(&mut bb));
                }
            }
        }

        if self.to_move == BLACK {
            hash ^= zobrist.to_move;
        }

        if self.enpassant_square != SQUARE_NULL {
            hash ^= zobrist.enpassant_file[file(self.enpassant_square)];
        }

        for side in 0..2 {
            for color in 0..2 {
                if self.castling_rights.can_castle(color, side) {
                    hash ^= zobrist.castling_right(side, color);
                }
            }
        }

        hash
    }

    /// Returns the side to move.
    #[inline(always)]
    pub fn turn(&self) -> Color {
        self.to_move
    }

    /// Returns all enemy pieces that attack the king of the side to
    /// move.
    #[inline(always)]
    pub fn checkers(&self) -> Bitboard {
        self.checkers
    }

    /// Returns if the side to move is in check.
    #[inline(always)]
    pub fn in_check(&self) -> bool {
        self.checkers != 0
    }

    /// Returns the Zobrist hash of the position.
    #[inline(always)]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Returns the number of half-moves since the last capture or
    /// pawn advance.
    #[inline(always)]
    pub fn halfmove_clock(&self) -> u8 {
        self.halfmove_clock
    }

    /// Returns the fullmove number.
    #[inline(always)]
    pub fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    /// Returns the en-passant target square, or `SQUARE_NULL`.
    #[inline(always)]
    pub fn enpassant_square(&self) -> Square {
        self.enpassant_square
    }

    /// Returns the castling rights.
    #[inline(always)]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    /// Returns the piece type on a given square (`PIECE_NONE` when
    /// empty).
    #[inline(always)]
    pub fn piece_at(&self, square: Square) -> PieceType {
        debug_assert!(square <= 63);
        self.mailbox[square]
    }

    /// Returns the set of all occupied squares.
    #[inline(always)]
    pub fn occupancy(&self) -> Bitboard {
        self.color[WHITE] | self.color[BLACK]
    }

    /// Returns the set of squares occupied by a given color.
    #[inline(always)]
    pub fn pieces(&self, color: Color) -> Bitboard {
        debug_assert!(color <= 1);
        self.color[color]
    }

    /// Returns the set of squares occupied by a given (color, piece)
    /// pair.
    #[inline(always)]
    pub fn pieces_of(&self, color: Color, piece: PieceType) -> Bitboard {
        debug_assert!(color <= 1);
        debug_assert!(piece <= KING);
        self.pieces[piece][color]
    }

    /// Returns the square occupied by the king of a given color.
    #[inline(always)]
    pub fn king_square(&self, color: Color) -> Square {
        debug_assert!(color <= 1);
        bsf(self.pieces[KING][color])
    }

    /// Returns the material balance in centipawns (white minus
    /// black).
    #[inline(always)]
    pub fn material(&self) -> i32 {
        self.material
    }

    /// Returns the game phase: `PHASE_TOTAL` with no pieces left,
    /// zero (or clamped to zero) with the full set on the board.
    #[inline(always)]
    pub fn phase(&self) -> u8 {
        ::std::cmp::max(0, self.phase) as u8
    }

    /// Returns all knights, bishops, rooks and queens of both colors.
    pub fn non_pawn_material(&self) -> Bitboard {
        let mut bb = 0;
        for piece in KNIGHT..KING {
            bb |= self.pieces[piece][WHITE] | self.pieces[piece][BLACK];
        }
        bb
    }

    // ---------------------------------------------------------------
    // Private helpers.

    fn empty() -> Board {
        Board {
            pieces: [[0; 2]; 6],
            color: [0; 2],
            mailbox: [PIECE_NONE; 64],
            to_move: WHITE,
            castling_rights: CastlingRights::none(),
            enpassant_square: SQUARE_NULL,
            halfmove_clock: 0,
            fullmove_number: 1,
            hash: 0,
            material: 0,
            phase: PHASE_TOTAL,
            checkers: 0,
        }
    }

    /// Puts a piece on an empty square, maintaining hash, material
    /// and phase.
    #[inline]
    fn set_piece(&mut self, piece: PieceType, color: Color, square: Square) {
        debug_assert!(piece < PIECE_NONE);
        debug_assert!(self.mailbox[square] == PIECE_NONE);
        let bb = 1 << square;
        self.pieces[piece][color] |= bb;
        self.color[color] |= bb;
        self.mailbox[square] = piece;
        self.hash ^= ZobristArrays::get().piece(piece, color, square);
        self.material += MATERIAL_VALUES[piece] * COLOR_MULTIPLIER[color] as i32;
        self.phase -= PHASE_WEIGHTS[piece];
    }

    /// Removes a piece from a square, maintaining hash, material and
    /// phase.
    #[inline]
    fn pop_piece(&mut self, piece: PieceType, color: Color, square: Square) {
        debug_assert!(self.mailbox[square] == piece);
        debug_assert!(self.pieces[piece][color] & (1 << square) != 0);
        let bb = 1 << square;
        self.pieces[piece][color] &= !bb;
        self.color[color] &= !bb;
        self.mailbox[square] = PIECE_NONE;
        self.hash ^= ZobristArrays::get().piece(piece, color, square);
        self.material -= MATERIAL_VALUES[piece] * COLOR_MULTIPLIER[color] as i32;
        self.phase += PHASE_WEIGHTS[piece];
    }

    /// Moves a piece between two squares, maintaining the hash.
    #[inline]
    fn move_piece(&mut self, piece: PieceType, color: Color, from: Square, to: Square) {
        debug_assert!(self.mailbox[from] == piece);
        debug_assert!(self.mailbox[to] == PIECE_NONE);
        let mask = (1 << from) | (1 << to);
        self.pieces[piece][color] ^= mask;
        self.color[color] ^= mask;
        self.mailbox[from] = PIECE_NONE;
        self.mailbox[to] = piece;
        let zobrist = ZobristArrays::get();
        self.hash ^= zobrist.piece(piece, color, from) ^ zobrist.piece(piece, color, to);
    }

    /// Revokes a castling right, maintaining the hash.
    #[inline]
    fn clear_castling(&mut self, side: CastlingSide, color: Color) {
        if self.castling_rights.revoke(color, side) {
            self.hash ^= ZobristArrays::get().castling_right(side, color);
        }
    }

    /// Grants a castling right, maintaining the hash.
    #[inline]
    fn grant_castling(&mut self, side: CastlingSide, color: Color) {
        if self.castling_rights.grant(color, side) {
            self.hash ^= ZobristArrays::get().castling_right(side, color);
        }
    }

    /// Recomputes the checkers mask for the side to move.
    #[inline]
    fn update_checkers(&mut self) {
        self.checkers = self.attackers(self.king_square(self.to_move),
                                       self.occupancy(),
                                       1 ^ self.to_move);
    }

    /// Returns the square of the least valuable piece in a set.
    #[inline]
    fn least_valuable(&self, set: Bitboard) -> Square {
        debug_assert!(set != 0);
        for piece in PAWN..KING + 1 {
            let subset = (self.pieces[piece][WHITE] | self.pieces[piece][BLACK]) & set;
            if subset != 0 {
                return bsf(subset);
            }
        }
        SQUARE_NULL
    }

    /// Returns the color of the piece on an occupied square.
    #[inline]
    fn color_at(&self, square: Square) -> Color {
        debug_assert!(self.occupancy() & (1 << square) != 0);
        if self.color[WHITE] & (1 << square) != 0 {
            WHITE
        } else {
            BLACK
        }
    }

    /// Returns the en-passant target as a bitboard (empty when there
    /// is none).
    #[inline]
    pub(crate) fn enpassant_bb(&self) -> Bitboard {
        if self.enpassant_square == SQUARE_NULL {
            0
        } else {
            1 << self.enpassant_square
        }
    }

    /// Returns if our king is safe after playing a move with a
    /// non-king piece.
    ///
    /// Builds the post-move occupancy (the composite two-pawn removal
    /// for en-passant included) and asks whether any surviving enemy
    /// piece attacks our king through it.
    fn king_safe_after(&self, m: Move) -> bool {
        let us = self.to_move;
        let them = 1 ^ us;
        let from_bb = 1u64 << m.orig_square();
        let to_bb = 1u64 << m.dest_square();
        let mut occupancy = self.occupancy() ^ from_bb | to_bb;
        let mut captured_bb = 0;
        if m.is_ep_capture() {
            captured_bb = gen_shift(to_bb, -PAWN_MOVE_SHIFTS[us][PAWN_PUSH]);
            occupancy ^= captured_bb;
        } else if m.is_capture() {
            captured_bb = to_bb;
        }
        let king_square = self.king_square(us);
        self.attackers(king_square, occupancy, them) & !captured_bb == 0
    }

    /// Geometry and king-safety verification for a pawn move. The
    /// common prefix of `legal` has already been checked.
    fn legal_pawn(&self, m: Move) -> bool {
        let us = self.to_move;
        let up = PAWN_MOVE_SHIFTS[us][PAWN_PUSH];
        let orig_square = m.orig_square();
        let dest_square = m.dest_square();
        let dest_bb = 1u64 << dest_square;
        let occupancy = self.occupancy();

        // Moves to the promotion ranks must carry a promotion tag,
        // and only they may.
        if (dest_bb & BB_PROMOTION_RANKS != 0) != m.is_promotion() {
            return false;
        }

        let geometry_ok = if m.is_double_pawn_push() {
            let middle = (orig_square as isize + up) as Square;
            let start_rank = if us == WHITE { RANK_2 } else { RANK_7 };
            rank(orig_square) == start_rank &&
            dest_square as isize == orig_square as isize + 2 * up &&
            occupancy & (1 << middle | dest_bb) == 0
        } else if m.is_capture() {
            // Plain, promotion, and en-passant captures share the
            // same geometry (the target checks were done already).
            BoardGeometry::get().pawn_attacks[us][orig_square] & dest_bb != 0
        } else {
            dest_square as isize == orig_square as isize + up && occupancy & dest_bb == 0
        };

        geometry_ok && self.king_safe_after(m)
    }

    /// Geometry and king-safety verification for a knight, bishop,
    /// rook or queen move.
    fn legal_piece(&self, piece: PieceType, m: Move) -> bool {
        let reachable = BoardGeometry::get()
            .attacks_from(piece, m.orig_square(), self.occupancy());
        reachable & (1 << m.dest_square()) != 0 && self.king_safe_after(m)
    }

    /// Geometry and king-safety verification for a king move.
    fn legal_king(&self, m: Move) -> bool {
        let them = 1 ^ self.to_move;
        let orig_square = m.orig_square();
        let dest_square = m.dest_square();

        if m.is_castle() {
            return self.castle_legal(m);
        }
        if BoardGeometry::get().attacks_from(KING, orig_square, self.occupancy()) &
           (1 << dest_square) == 0 {
            return false;
        }

        // The king must not step onto an attacked square; its own
        // origin square must not shadow an attacker behind it.
        let occupancy = self.occupancy() & !(1u64 << orig_square);
        self.attackers(dest_square, occupancy, them) == 0
    }

    /// Full verification for a castling move: rights present, all
    /// squares between king and rook empty, king not in check, and
    /// the king neither crossing nor landing on an attacked square.
    fn castle_legal(&self, m: Move) -> bool {
        const KING_DESTS: [[Square; 2]; 2] = [[C1, C8], [G1, G8]];
        const PASSING: [[Square; 2]; 2] = [[D1, D8], [F1, F8]];
        const BETWEEN: [[Bitboard; 2]; 2] =
            [[1 << B1 | 1 << C1 | 1 << D1, 1 << F1 | 1 << G1],
             [1 << B8 | 1 << C8 | 1 << D8, 1 << F8 | 1 << G8]];

        let us = self.to_move;
        let them = 1 ^ us;
        let side = if m.move_type() == MOVE_KING_CASTLE {
            KINGSIDE
        } else {
            QUEENSIDE
        };

        if m.orig_square() != self.king_square(us) ||
           m.dest_square() != KING_DESTS[side][us] {
            return false;
        }
        if !self.castling_rights.can_castle(us, side) {
            return false;
        }
        if self.occupancy() & BETWEEN[us][side] != 0 {
            return false;
        }
        if self.in_check() {
            return false;
        }
        if self.attackers(PASSING[side][us], self.occupancy(), them) != 0 {
            return false;
        }
        let occupancy = self.occupancy() & !(1u64 << m.orig_square());
        self.attackers(m.dest_square(), occupancy, them) == 0
    }

    fn parse_placement(&mut self, s: &str) -> Result<(), FenError> {
        let mut file = 0;
        let mut rank = RANK_8;
        for c in s.chars() {
            match c {
                '/' => {
                    if file != 8 || rank == 0 {
                        return Err(FenError);
                    }
                    file = 0;
                    rank -= 1;
                }
                n @ '1'..='8' => {
                    file += n.to_digit(9).unwrap() as usize;
                    if file > 8 {
                        return Err(FenError);
                    }
                }
                _ => {
                    let piece = match c.to_ascii_lowercase() {
                        'p' => PAWN,
                        'n' => KNIGHT,
                        'b' => BISHOP,
                        'r' => ROOK,
                        'q' => QUEEN,
                        'k' => KING,
                        _ => return Err(FenError),
                    };
                    if file > 7 {
                        return Err(FenError);
                    }
                    let color = if c.is_uppercase() { WHITE } else { BLACK };
                    self.set_piece(piece, color, square(file, rank));
                    file += 1;
                }
            }
        }
        if file != 8 || rank != 0 {
            return Err(FenError);
        }
        Ok(())
    }

    fn parse_castling(&mut self, s: &str) -> Result<(), FenError> {
        if s == "-" {
            return Ok(());
        }
        for c in s.chars() {
            let (color, side) = match c {
                'K' => (WHITE, KINGSIDE),
                'Q' => (WHITE, QUEENSIDE),
                'k' => (BLACK, KINGSIDE),
                'q' => (BLACK, QUEENSIDE),
                _ => return Err(FenError),
            };
            // A right whose king or rook has left its home square is
            // unusable and is silently dropped.
            let king_home = [E1, E8][color];
            let rook_home = ROOK_HOME_SQUARES[side][color];
            if self.pieces[KING][color] & (1 << king_home) != 0 &&
               self.pieces[ROOK][color] & (1 << rook_home) != 0 {
                self.grant_castling(side, color);
            }
        }
        Ok(())
    }

    fn parse_enpassant(&mut self, s: &str) -> Result<(), FenError> {
        use notation::parse_square;
        if s == "-" {
            return Ok(());
        }
        let ep = parse_square(s).ok_or(FenError)?;
        let expected_rank = if self.to_move == WHITE { RANK_6 } else { RANK_3 };
        let pushed = (ep as isize - PAWN_MOVE_SHIFTS[self.to_move][PAWN_PUSH]) as Square;

        // Some FEN emitters record the square even when no pawn is in
        // place; a target that cannot possibly be captured is simply
        // dropped.
        if rank(ep) == expected_rank &&
           self.occupancy() & (1 << ep) == 0 &&
           self.pieces[PAWN][1 ^ self.to_move] & (1 << pushed) != 0 {
            self.enpassant_square = ep;
        }
        Ok(())
    }
}

impl Default for Board {
    /// Returns the standard starting position.
    fn default() -> Board {
        Board::try_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap()
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Board) -> bool {
        self.hash == other.hash && self.to_move == other.to_move &&
        self.enpassant_square == other.enpassant_square &&
        self.castling_rights == other.castling_rights &&
        self.pieces == other.pieces
    }
}

impl Eq for Board {}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "   +------------------------+")?;
        for rank in (0..8).rev() {
            write!(f, " {} |", rank + 1)?;
            for file in 0..8 {
                let sq = square(file, rank);
                match self.mailbox[sq] {
                    PIECE_NONE => write!(f, " . ")?,
                    piece => write!(f, " {} ", piece_to_char(piece, self.color_at(sq)))?,
                }
            }
            writeln!(f, "|")?;
        }
        writeln!(f, "   +------------------------+")?;
        writeln!(f, "     A  B  C  D  E  F  G  H")?;
        writeln!(f, "")?;
        writeln!(f, "FEN: {}", self.to_fen())?;
        write!(f, "Hash: {:016x}", self.hash)
    }
}

fn piece_to_char(piece: PieceType, color: Color) -> char {
    let c = ['p', 'n', 'b', 'r', 'q', 'k'][piece];
    if color == WHITE {
        c.to_ascii_uppercase()
    } else {
        c
    }
}
