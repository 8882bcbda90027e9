//! Property tests for the board, the move pipeline, and the orderer.

extern crate skewer;

use skewer::*;
use skewer::perft::test_suite;

/// A few additional positions covering the special-move corners.
fn extra_positions() -> Vec<&'static str> {
    vec!["r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1",
         "r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1",
         "8/8/8/KPp4r/8/8/8/4k3 w - c6 0 1",
         "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
         "5n2/4P3/8/8/8/1k6/8/4K3 w - - 0 1",
         "4k3/8/8/8/4q3/8/3P1P2/4K3 w - - 0 1",
         "4k3/8/8/8/4r3/2b5/8/4K3 w - - 0 1"]
}

fn all_positions() -> Vec<&'static str> {
    let mut fens: Vec<_> = test_suite().iter().map(|&(fen, _, _)| fen).collect();
    fens.extend(extra_positions());
    fens
}

/// FEN round-trips exactly, hashes included.
#[test]
fn fen_round_trip() {
    for fen in all_positions() {
        let board = Board::from_fen(fen);
        let reparsed = Board::from_fen(&board.to_fen());
        assert_eq!(reparsed, board, "{}", fen);
        assert_eq!(reparsed.hash(), board.hash(), "{}", fen);
        assert_eq!(reparsed.to_fen(), board.to_fen(), "{}", fen);
    }
}

/// The incrementally maintained hash always equals a from-scratch
/// recomputation.
#[test]
fn hash_incrementality() {
    for fen in all_positions() {
        let board = Board::from_fen(fen);
        assert_eq!(board.hash(), board.generate_hash(), "{}", fen);
        let mut list = MoveList::new();
        board.generate_moves(&mut list, MoveGenType::Legal);
        for m in list.iter() {
            let next = board.make_move(*m);
            assert_eq!(next.hash(), next.generate_hash(), "{} after {}", fen, m);
            assert!(next.is_valid(), "{} after {}", fen, m);
        }
    }
}

/// Making and unmaking a move restores the prior board exactly.
#[test]
fn make_unmake_symmetry() {
    for fen in all_positions() {
        let mut pos = Position::from_fen(fen);
        let root = pos.board().clone();
        let list = pos.generate_moves(MoveGenType::Legal);
        for m in list.iter() {
            pos.make_move(*m, false);
            assert!(*pos.board() != root, "{} after {}", fen, m);
            pos.unmake_move();
            assert_eq!(*pos.board(), root, "{} after {}", fen, m);
            assert_eq!(pos.board().hash(), root.hash(), "{} after {}", fen, m);
        }
        if !pos.in_check() {
            pos.make_null_move();
            pos.unmake_null_move();
            assert_eq!(*pos.board(), root, "{} after null move", fen);
        }
    }
}

/// `legal` accepts exactly the moves `generate(Legal)` produces,
/// over the entire 16-bit move space.
#[test]
fn legality_matches_generation() {
    for fen in all_positions() {
        let board = Board::from_fen(fen);
        let mut generated = MoveList::new();
        board.generate_moves(&mut generated, MoveGenType::Legal);

        let mut accepted = Vec::new();
        for raw in 0..0x10000u32 {
            let m = Move::new((raw >> 12) as usize & 0xf,
                              (raw >> 6) as usize & 0x3f,
                              raw as usize & 0x3f);
            if board.legal(m) {
                accepted.push(m);
            }
        }

        assert_eq!(accepted.len(), generated.len(), "{}", fen);
        for m in accepted.iter() {
            assert!(generated.contains(*m), "{} missing {}", fen, m);
        }
    }
}

/// SEE thresholds shift the verdict consistently.
#[test]
fn see_threshold_consistency() {
    let capture_positions =
        [("4k3/8/8/4p3/3P4/8/8/4K3 w - - 0 1", Move::new(MOVE_CAPTURE, 27, 36)),
         ("4k3/8/5p2/4p3/3P4/8/8/4K3 w - - 0 1", Move::new(MOVE_CAPTURE, 27, 36)),
         ("4k3/8/5p2/4p3/8/8/8/4RK2 w - - 0 1", Move::new(MOVE_CAPTURE, 4, 36)),
         ("4k3/8/8/4q3/3P4/8/8/4K3 w - - 0 1", Move::new(MOVE_CAPTURE, 27, 36))];
    for &(fen, m) in capture_positions.iter() {
        let board = Board::from_fen(fen);
        assert!(board.legal(m), "{}", fen);
        let base = board.see(m, 0);
        let mut threshold = -200;
        while threshold <= 200 {
            assert_eq!(board.see(m, threshold) >= 0,
                       base >= threshold,
                       "{} threshold {}",
                       fen,
                       threshold);
            threshold += 10;
        }
    }
}

/// Three identical positions are a draw, two are not.
#[test]
fn repetition_rule() {
    let mut pos = Position::default();
    let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8"];
    for _ in 0..2 {
        for s in shuffle.iter() {
            let m = move_from_uci(&pos, s);
            assert!(m != MOVE_NULL);
            pos.make_move(m, false);
        }
    }
    // Three occurrences of the starting position are on the stack.
    assert!(pos.is_draw(false));
    pos.unmake_move();
    assert!(!pos.is_draw(false));
}

/// The orderer never yields a move twice, and everything it
/// yields is legal.
#[test]
fn orderer_uniqueness_and_legality() {
    let histories = Histories::new();
    for fen in all_positions() {
        let pos = Position::from_fen(fen);
        let legal = pos.generate_moves(MoveGenType::Legal);
        // Seed the hash move with a legal move to exercise the
        // deduplication path.
        let hash_move = if legal.len() > 0 {
            legal.as_slice()[0]
        } else {
            MOVE_NULL
        };
        let mut order = MoveOrder::new(0, 4, hash_move, MOVE_NULL, false);
        let mut yielded: Vec<Move> = Vec::new();
        loop {
            let m = order.next_move(&pos, &histories);
            if m == MOVE_NULL {
                break;
            }
            assert!(pos.board().legal(m), "{} yielded illegal {}", fen, m);
            assert!(!yielded.contains(&m), "{} yielded {} twice", fen, m);
            yielded.push(m);
        }
    }
}

/// Outside quiescence the orderer yields exactly the legal move
/// set.
#[test]
fn orderer_completeness() {
    let histories = Histories::new();
    for fen in all_positions() {
        let pos = Position::from_fen(fen);
        let legal = pos.generate_moves(MoveGenType::Legal);
        let mut order = MoveOrder::new(0, 4, MOVE_NULL, MOVE_NULL, false);
        let mut yielded: Vec<Move> = Vec::new();
        loop {
            let m = order.next_move(&pos, &histories);
            if m == MOVE_NULL {
                break;
            }
            yielded.push(m);
        }
        assert_eq!(yielded.len(), legal.len(), "{}", fen);
        for m in legal.iter() {
            assert!(yielded.contains(m), "{} never yielded {}", fen, m);
        }
    }
}
