//! Implements square-notation parsing and UCI move lookup.

use regex::Regex;
use board::*;
use moves::*;
use position::Position;
use ranks::square;

/// Parses a square's algebraic notation (lowercase only).
pub fn parse_square(s: &str) -> Option<Square> {
    lazy_static! {
        static ref RE: Regex = Regex::new(r"^[a-h][1-8]$").unwrap();
    }
    if RE.is_match(s) {
        let mut chars = s.chars();
        let file = (chars.next().unwrap().to_digit(18).unwrap() - 10) as usize;
        let rank = (chars.next().unwrap().to_digit(9).unwrap() - 1) as usize;
        Some(square(file, rank))
    } else {
        None
    }
}

/// Finds the legal move a UCI move string describes.
///
/// The string is matched against the legal moves of the current
/// position, so the move-type tag (castle, en-passant, double push,
/// promotion piece) is recovered unambiguously. Returns `MOVE_NULL`
/// when the string matches no legal move; callers must check.
pub fn move_from_uci(pos: &Position, s: &str) -> Move {
    let list = pos.generate_moves(MoveGenType::Legal);
    for m in list.iter() {
        if m.to_uci() == s {
            return *m;
        }
    }
    MOVE_NULL
}

#[cfg(test)]
mod tests {
    use super::*;
    use board::*;
    use moves::*;
    use position::Position;
    use squares::*;

    #[test]
    fn squares() {
        assert_eq!(parse_square("a1"), Some(A1));
        assert_eq!(parse_square("e4"), Some(E4));
        assert_eq!(parse_square("h8"), Some(H8));
        assert_eq!(parse_square("i1"), None);
        assert_eq!(parse_square("a9"), None);
        assert_eq!(parse_square("A1"), None);
        assert_eq!(parse_square("e44"), None);
        assert_eq!(parse_square(""), None);
    }

    #[test]
    fn uci_moves_recover_their_tags() {
        let pos = Position::default();
        let m = move_from_uci(&pos, "e2e4");
        assert!(m.is_double_pawn_push());
        let m = move_from_uci(&pos, "g1f3");
        assert_eq!(m.move_type(), MOVE_QUIET);
        assert_eq!(move_from_uci(&pos, "e2e5"), MOVE_NULL);
        assert_eq!(move_from_uci(&pos, "nonsense"), MOVE_NULL);

        let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let m = move_from_uci(&pos, "e1g1");
        assert_eq!(m.move_type(), MOVE_KING_CASTLE);
        let m = move_from_uci(&pos, "e1c1");
        assert_eq!(m.move_type(), MOVE_QUEEN_CASTLE);

        let pos = Position::from_fen("5n2/4P3/8/8/8/1k6/8/4K3 w - - 0 1");
        let m = move_from_uci(&pos, "e7e8q");
        assert!(m.is_promotion());
        assert_eq!(m.promo_piece(), QUEEN);
        let m = move_from_uci(&pos, "e7f8n");
        assert!(m.is_promotion() && m.is_capture());
        assert_eq!(m.promo_piece(), KNIGHT);
        // A promotion without its piece letter matches nothing.
        assert_eq!(move_from_uci(&pos, "e7e8"), MOVE_NULL);
    }
}
