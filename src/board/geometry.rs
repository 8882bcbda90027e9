//! Implements `BoardGeometry` -- the precomputed attack tables.

use bitsets::*;
use board::{Bitboard, PieceType, Square, KNIGHT, KING, WHITE, BLACK};
use files::file;
use ranks::rank;

/// Tables and methods useful for move generation and attack
/// calculation.
///
/// All tables are calculated once, at the first use, and never change
/// afterwards.
pub struct BoardGeometry {
    /// Attack sets for each non-pawn piece type on each square, on an
    /// otherwise empty board.
    ///
    /// Example:
    ///
    /// ```text
    /// g.attacks[QUEEN][D4]
    /// . . . 1 . . . 1
    /// 1 . . 1 . . 1 .
    /// . 1 . 1 . 1 . .
    /// . . 1 1 1 . . .
    /// 1 1 1 Q 1 1 1 1
    /// . . 1 1 1 . . .
    /// . 1 . 1 . 1 . .
    /// 1 . . 1 . . 1 .
    /// ```
    pub attacks: [[Bitboard; 64]; 6],

    /// The subset of `attacks` on which a piece standing there would
    /// block at least one more distant attacked square.
    ///
    /// ```text
    /// g.blockers_and_beyond[QUEEN][D4]
    /// . . . . . . . .
    /// . . . 1 . . 1 .
    /// . 1 . 1 . 1 . .
    /// . . 1 1 1 . . .
    /// . 1 1 Q 1 1 1 .
    /// . . 1 1 1 . . .
    /// . 1 . 1 . 1 . .
    /// . . . . . . . .
    /// ```
    pub blockers_and_beyond: [[Bitboard; 64]; 6],

    /// Pawn attack sets for each color on each square.
    pub pawn_attacks: [[Bitboard; 64]; 2],

    /// For an attacker on square `a` and a blocker on square `b`
    /// lying on a straight line: all squares between them, including
    /// `a` and `b` themselves. Empty when no line connects them.
    pub squares_between_including: [[Bitboard; 64]; 64],

    /// For an attacker on square `a` and a blocker on square `b`: all
    /// squares hidden behind the blocker from the attacker's point of
    /// view.
    pub squares_behind_blocker: [[Bitboard; 64]; 64],

    /// All squares lying on the line determined by two squares (the
    /// whole rank, file, or diagonal). Empty when no line connects
    /// them.
    pub squares_at_line: [[Bitboard; 64]; 64],

    /// A 10x12 grid of square numbers with out-of-board guard cells,
    /// used only while the other tables are being filled.
    grid: [u8; 120],
}

lazy_static! {
    static ref GEOMETRY: BoardGeometry = BoardGeometry::new();
}

impl BoardGeometry {
    /// Returns a reference to the initialized tables.
    ///
    /// The tables are built during the first call; all subsequent
    /// calls return the same instance.
    #[inline]
    pub fn get() -> &'static BoardGeometry {
        &GEOMETRY
    }

    fn new() -> BoardGeometry {
        // We use a 10x12 grid (8x8 with guarding markers, 2 rows at
        // top and bottom, 1 column at the sides), so that we can
        // detect out-of-board movements. Each cell in the grid
        // contains the corresponding square number (from 0 to 63) or
        // 0xff (the guarding marker).
        let mut grid = [0xffu8; 120];
        for i in 0..64 {
            grid[grid_index(i)] = i as u8;
        }

        let mut bg = BoardGeometry {
            attacks: [[0; 64]; 6],
            blockers_and_beyond: [[0; 64]; 6],
            pawn_attacks: [[0; 64]; 2],
            squares_between_including: [[0; 64]; 64],
            squares_behind_blocker: [[0; 64]; 64],
            squares_at_line: [[0; 64]; 64],
            grid: grid,
        };
        bg.fill_attacks_and_blockers();
        bg.fill_pawn_attacks();
        bg.fill_line_tables();
        bg
    }

    /// Returns the set of squares attacked by a piece (not a pawn)
    /// from a given square, on a board occupied according to the
    /// `occupied` bitboard.
    #[inline]
    pub fn attacks_from(&self,
                        piece: PieceType,
                        square: Square,
                        occupied: Bitboard)
                        -> Bitboard {
        debug_assert!(piece >= KNIGHT && piece <= KING);
        debug_assert!(square <= 63);
        let behind = &self.squares_behind_blocker[square];
        let mut attacks = self.attacks[piece][square];
        let mut blockers = occupied & self.blockers_and_beyond[piece][square];
        while blockers != 0 {
            attacks &= !behind[bsf_reset(&mut blockers)];
        }
        attacks
    }

    fn fill_attacks_and_blockers(&mut self) {
        // "deltas" is the change in the grid-index when sliding a
        // particular piece by one square in a particular direction.
        // Pawns are handled separately.
        let deltas: [[i8; 8]; 6] = [[0; 8], // pawn (unused)
                                    [-21, -19, -12, -8, 8, 12, 19, 21], // knight
                                    [-11, -9, 9, 11, 0, 0, 0, 0], // bishop
                                    [-10, -1, 1, 10, 0, 0, 0, 0], // rook
                                    [-11, -10, -9, -1, 1, 9, 10, 11], // queen
                                    [-11, -10, -9, -1, 1, 9, 10, 11]]; // king
        let longrange = [false, false, true, true, true, false];

        for piece in KNIGHT..KING + 1 {
            for square in 0..64 {
                let mut attack = 0u64;
                let mut blockers = 0u64;
                for &delta in deltas[piece].iter() {
                    if delta != 0 {
                        let mut last_mask = 0u64;
                        let mut curr_grid_index = grid_index(square);
                        loop {
                            curr_grid_index = (curr_grid_index as i16 + delta as i16) as usize;
                            let curr_square = self.grid[curr_grid_index];
                            if curr_square != 0xff {
                                last_mask = 1 << curr_square;
                                attack |= last_mask;
                                blockers |= last_mask;
                                if longrange[piece] {
                                    continue;
                                }
                            }
                            blockers &= !last_mask;
                            break;
                        }
                    }
                }
                self.attacks[piece][square] = attack;
                self.blockers_and_beyond[piece][square] = blockers;
            }
        }
    }

    fn fill_pawn_attacks(&mut self) {
        for square in 0..64 {
            let bb = 1u64 << square;
            self.pawn_attacks[WHITE][square] = (bb & !BB_FILE_A) << 7 | (bb & !BB_FILE_H) << 9;
            self.pawn_attacks[BLACK][square] = (bb & !BB_FILE_A) >> 9 | (bb & !BB_FILE_H) >> 7;
        }
    }

    fn fill_line_tables(&mut self) {
        for attacker in 0..64 {
            for blocker in 0..64 {
                // Try to find a grid-index increment (delta) that
                // generates all squares at the line. If the attacker
                // and the blocker do not lie on a straight line, we
                // simply proceed to the next pair.
                let rank_diff = rank(blocker) as i8 - rank(attacker) as i8;
                let file_diff = file(blocker) as i8 - file(attacker) as i8;
                let delta = match (rank_diff, file_diff) {
                    (0, 0) => continue,
                    (0, f) => f.signum(),
                    (r, 0) => 10 * r.signum(),
                    (r, f) if r == f => 10 * r.signum() + r.signum(),
                    (r, f) if r == -f => 10 * r.signum() - r.signum(),
                    _ => continue,
                };

                // Starting from the attacker's square update
                // `squares_between_including` until the blocker's
                // square is encountered, then switch to updating
                // `squares_behind_blocker` until the end of the board
                // is reached.
                let mut between_including = 0u64;
                let mut behind_blocker = 0u64;
                let mut curr_grid_index = grid_index(attacker);
                let mut blocker_encountered = false;
                loop {
                    let curr_square = self.grid[curr_grid_index];
                    match curr_square {
                        0xff => break,
                        x if x as Square == blocker => {
                            between_including |= 1 << curr_square;
                            blocker_encountered = true;
                        }
                        _ => {
                            if blocker_encountered {
                                behind_blocker |= 1 << curr_square;
                            } else {
                                between_including |= 1 << curr_square;
                            }
                        }
                    }
                    curr_grid_index = (curr_grid_index as i16 + delta as i16) as usize;
                }
                debug_assert!(blocker_encountered);
                self.squares_between_including[attacker][blocker] = between_including;
                self.squares_behind_blocker[attacker][blocker] = behind_blocker;
            }
        }
        for a in 0..64 {
            for b in 0..64 {
                self.squares_at_line[a][b] = self.squares_between_including[a][b] |
                                             self.squares_behind_blocker[a][b] |
                                             self.squares_behind_blocker[b][a];
            }
        }
    }
}

#[inline(always)]
fn grid_index(square: Square) -> usize {
    (square / 8) * 10 + (square % 8) + 21
}

#[cfg(test)]
mod tests {
    use super::*;
    use board::*;
    use squares::*;

    #[test]
    fn attack_sets() {
        let g = BoardGeometry::get();
        assert_eq!(g.attacks[KING][A1], 0b11 << 8 | 0b10);
        assert_eq!(g.blockers_and_beyond[KING][A1], 0);
        assert_eq!(g.attacks[ROOK][A1],
                   0b11111110 | 1 << 8 | 1 << 16 | 1 << 24 | 1 << 32 | 1 << 40 | 1 << 48 |
                   1 << 56);
        assert_eq!(g.blockers_and_beyond[ROOK][A1],
                   0b01111110 | 1 << 8 | 1 << 16 | 1 << 24 | 1 << 32 | 1 << 40 | 1 << 48);
        assert_eq!(g.attacks[KING][D4], g.attacks[KING][E4] >> 1);
        assert_eq!(g.attacks[KNIGHT][D4], g.attacks[KNIGHT][D5] >> 8);
        assert_eq!(g.attacks[ROOK][D4] | g.attacks[BISHOP][D4],
                   g.attacks[QUEEN][D4]);
        assert_eq!(g.attacks[ROOK][D4] & g.attacks[BISHOP][D4], 0);
        assert_eq!(g.attacks[KING][D4] & g.attacks[QUEEN][D4],
                   g.attacks[KING][D4]);
    }

    #[test]
    fn pawn_attack_sets() {
        let g = BoardGeometry::get();
        assert_eq!(g.pawn_attacks[WHITE][E2], 1 << D3 | 1 << F3);
        assert_eq!(g.pawn_attacks[WHITE][A2], 1 << B3);
        assert_eq!(g.pawn_attacks[WHITE][H2], 1 << G3);
        assert_eq!(g.pawn_attacks[BLACK][E7], 1 << D6 | 1 << F6);
        assert_eq!(g.pawn_attacks[BLACK][A7], 1 << B6);
        assert_eq!(g.pawn_attacks[BLACK][H7], 1 << G6);
    }

    #[test]
    fn line_sets() {
        let g = BoardGeometry::get();
        assert_eq!(g.squares_at_line[B1][G1], 0b11111111);
        assert_eq!(g.squares_between_including[B1][G1], 0b01111110);
        assert_eq!(g.squares_behind_blocker[B1][G1], 1 << H1);
        assert_eq!(g.squares_behind_blocker[A1][G7], 1 << H8);
        assert_eq!(g.squares_behind_blocker[D7][D7], 0);
        assert_eq!(g.squares_behind_blocker[D7][F8], 0);
        assert_eq!(g.squares_between_including[A1][A4] | g.squares_behind_blocker[A1][A4],
                   g.squares_at_line[A1][A4]);
    }

    #[test]
    fn attacks_from_occupied_board() {
        let g = BoardGeometry::get();
        let occupied = 1 << D4 | 1 << G7;
        assert_eq!(g.attacks_from(BISHOP, A1, occupied),
                   1 << B2 | 1 << C3 | 1 << D4);
        assert_eq!(g.attacks_from(KNIGHT, A1, occupied), 1 << B3 | 1 << C2);
        assert_eq!(g.attacks_from(ROOK, A4, occupied),
                   1 << A1 | 1 << A2 | 1 << A3 | 1 << A5 | 1 << A6 | 1 << A7 | 1 << A8 |
                   1 << B4 | 1 << C4 | 1 << D4);
    }
}
