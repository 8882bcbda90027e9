//! Implements `Position` -- the history of boards along a line of
//! play.

use std::cmp::min;
use board::*;
use moves::*;

/// The deepest search line the engine supports, in plies.
pub const NUM_MAX_DEPTH: usize = 128;

/// A played move and whether the search extended the line for it.
#[derive(Clone, Copy)]
struct MoveInfo {
    played: Move,
    extended: bool,
}

/// An ordered sequence of boards: the game history plus the moves of
/// the search line currently being explored.
///
/// Keeping every board of the line is what makes draw detection
/// possible -- a repetition can only be recognized by comparing the
/// current hash against earlier frames. `ply()` is counted from the
/// search root, which `set_init_ply` re-bases onto the current frame
/// without discarding the history needed for repetition checks.
#[derive(Clone)]
pub struct Position {
    boards: Vec<Board>,
    moves: Vec<MoveInfo>,
    extensions: usize,
    ply: usize,
}

impl Position {
    /// Creates a new instance from a FEN string.
    ///
    /// Like `Board::from_fen`, parsing is best-effort and falls back
    /// to the starting position.
    pub fn from_fen(fen: &str) -> Position {
        Position::from_board(Board::from_fen(fen))
    }

    /// Creates a new instance from a board.
    pub fn from_board(board: Board) -> Position {
        let mut boards = Vec::with_capacity(NUM_MAX_DEPTH);
        boards.push(board);
        Position {
            boards: boards,
            moves: Vec::with_capacity(NUM_MAX_DEPTH),
            extensions: 0,
            ply: 0,
        }
    }

    /// Returns the current board.
    #[inline(always)]
    pub fn board(&self) -> &Board {
        self.boards.last().unwrap()
    }

    /// Generates moves of the requested category for the current
    /// board.
    pub fn generate_moves(&self, gen_type: MoveGenType) -> MoveList {
        let mut list = MoveList::new();
        self.board().generate_moves(&mut list, gen_type);
        list
    }

    /// Plays a move, pushing the successor board onto the history.
    ///
    /// `extension` marks the ply as a search extension; the running
    /// count is available through `num_extensions` so the search can
    /// limit how far a line gets extended.
    pub fn make_move(&mut self, m: Move, extension: bool) {
        let next = self.board().make_move(m);
        self.boards.push(next);
        self.moves.push(MoveInfo {
            played: m,
            extended: extension,
        });
        self.ply += 1;
        if extension {
            self.extensions += 1;
        }
    }

    /// Takes back the last played move.
    pub fn unmake_move(&mut self) {
        debug_assert!(self.boards.len() > 1);
        self.boards.pop();
        self.ply -= 1;
        let info = self.moves.pop().unwrap();
        if info.extended {
            self.extensions -= 1;
        }
    }

    /// Swaps the side to move without playing a move.
    pub fn make_null_move(&mut self) {
        let next = self.board().make_null_move();
        self.boards.push(next);
        self.moves.push(MoveInfo {
            played: MOVE_NULL,
            extended: false,
        });
        self.ply += 1;
    }

    /// Takes back a null move.
    pub fn unmake_null_move(&mut self) {
        debug_assert!(self.boards.len() > 1);
        debug_assert!(self.moves.last().unwrap().played == MOVE_NULL);
        self.boards.pop();
        self.moves.pop();
        self.ply -= 1;
    }

    /// Returns if the current position is drawn by the fifty-move
    /// rule or by repetition.
    ///
    /// With `unique == true` a single earlier frame with the same
    /// hash suffices; otherwise two earlier occurrences are required
    /// (three in total). Only frames reachable without crossing an
    /// irreversible move are considered -- the halfmove clock bounds
    /// the walk.
    pub fn is_draw(&self, unique: bool) -> bool {
        if self.board().halfmove_clock() >= 100 {
            return true;
        }

        let cur = self.boards.len() - 1;
        let reachable = min(cur + 1, self.board().halfmove_clock() as usize + 1);
        let min_pos = (cur + 1 - reachable) as isize;
        if reachable >= 8 {
            let hash = self.board().hash();
            let mut pos1 = cur as isize - 4;
            while pos1 >= min_pos {
                if self.boards[pos1 as usize].hash() == hash {
                    if unique {
                        return true;
                    }
                    let mut pos2 = pos1 - 4;
                    while pos2 >= min_pos {
                        if self.boards[pos2 as usize].hash() == hash {
                            return true;
                        }
                        pos2 -= 2;
                    }
                }
                pos1 -= 2;
            }
        }

        false
    }

    /// Returns if the side to move is in check.
    #[inline(always)]
    pub fn in_check(&self) -> bool {
        self.board().in_check()
    }

    /// Returns the side to move.
    #[inline(always)]
    pub fn turn(&self) -> Color {
        self.board().turn()
    }

    /// Returns the hash of the current board.
    #[inline(always)]
    pub fn hash(&self) -> u64 {
        self.board().hash()
    }

    /// Returns the number of plies from the search root.
    #[inline(always)]
    pub fn ply(&self) -> Depth {
        self.ply as Depth
    }

    /// Returns the number of extended plies on the current line.
    #[inline(always)]
    pub fn num_extensions(&self) -> usize {
        self.extensions
    }

    /// Returns the last played move (`MOVE_NULL` at the root and
    /// after a null move).
    #[inline]
    pub fn last_move(&self) -> Move {
        match self.moves.last() {
            Some(info) => info.played,
            None => MOVE_NULL,
        }
    }

    /// Re-bases `ply()` onto the current frame.
    ///
    /// Called when a new search starts: the game history stays on the
    /// stack (repetition checks still need it), but depth accounting
    /// restarts from here.
    pub fn set_init_ply(&mut self) {
        self.ply = 0;
    }
}

impl Default for Position {
    /// Returns the standard starting position.
    fn default() -> Position {
        Position::from_board(Board::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use board::*;
    use moves::*;
    use squares::*;

    #[test]
    fn make_and_unmake() {
        let mut pos = Position::default();
        let root = pos.board().clone();
        pos.make_move(Move::new(MOVE_DOUBLE_PUSH, E2, E4), false);
        assert_eq!(pos.ply(), 1);
        assert!(pos.board().hash() != root.hash());
        pos.make_move(Move::new(MOVE_QUIET, G8, F6), false);
        assert_eq!(pos.ply(), 2);
        pos.unmake_move();
        pos.unmake_move();
        assert_eq!(pos.ply(), 0);
        assert_eq!(*pos.board(), root);
        assert_eq!(pos.board().hash(), root.hash());
    }

    #[test]
    fn null_moves() {
        let mut pos = Position::from_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1");
        let root = pos.board().clone();
        pos.make_null_move();
        assert_eq!(pos.turn(), BLACK);
        assert_eq!(pos.last_move(), MOVE_NULL);
        pos.unmake_null_move();
        assert_eq!(*pos.board(), root);
    }

    #[test]
    fn extensions_are_counted() {
        let mut pos = Position::default();
        pos.make_move(Move::new(MOVE_DOUBLE_PUSH, E2, E4), false);
        pos.make_move(Move::new(MOVE_DOUBLE_PUSH, E7, E5), true);
        pos.make_move(Move::new(MOVE_QUIET, G1, F3), true);
        assert_eq!(pos.num_extensions(), 2);
        pos.unmake_move();
        assert_eq!(pos.num_extensions(), 1);
        pos.unmake_move();
        pos.unmake_move();
        assert_eq!(pos.num_extensions(), 0);
    }

    #[test]
    fn fifty_move_rule() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 99 80");
        assert!(!pos.is_draw(false));
        let pos = Position::from_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 100 80");
        assert!(pos.is_draw(false));
        assert!(pos.is_draw(true));
    }

    #[test]
    fn repetition_detection() {
        let mut pos = Position::default();
        let shuffle = [Move::new(MOVE_QUIET, G1, F3),
                       Move::new(MOVE_QUIET, G8, F6),
                       Move::new(MOVE_QUIET, F3, G1),
                       Move::new(MOVE_QUIET, F6, G8)];

        // Second occurrence of the starting position: not yet a draw
        // in either mode (the window is still too short).
        for m in shuffle.iter() {
            pos.make_move(*m, false);
        }
        assert!(!pos.is_draw(true));
        assert!(!pos.is_draw(false));

        // Third occurrence: a single earlier match is in the window,
        // two are needed for the strict mode.
        for m in shuffle.iter() {
            pos.make_move(*m, false);
        }
        assert!(pos.is_draw(true));
        assert!(pos.is_draw(false));

        // Unwinding clears the verdict.
        pos.unmake_move();
        assert!(!pos.is_draw(false));
    }

    #[test]
    fn irreversible_move_clears_the_window() {
        let mut pos = Position::default();
        let shuffle = [Move::new(MOVE_QUIET, G1, F3),
                       Move::new(MOVE_QUIET, G8, F6),
                       Move::new(MOVE_QUIET, F3, G1),
                       Move::new(MOVE_QUIET, F6, G8)];
        for m in shuffle.iter() {
            pos.make_move(*m, false);
        }
        // A pawn push resets the clock; the repetitions before it no
        // longer count.
        pos.make_move(Move::new(MOVE_DOUBLE_PUSH, E2, E4), false);
        pos.make_move(Move::new(MOVE_DOUBLE_PUSH, E7, E5), false);
        for m in shuffle.iter() {
            pos.make_move(*m, false);
        }
        assert!(!pos.is_draw(true));
        assert!(!pos.is_draw(false));
    }

    #[test]
    fn set_init_ply_keeps_history() {
        let mut pos = Position::default();
        let shuffle = [Move::new(MOVE_QUIET, G1, F3),
                       Move::new(MOVE_QUIET, G8, F6),
                       Move::new(MOVE_QUIET, F3, G1),
                       Move::new(MOVE_QUIET, F6, G8)];
        for m in shuffle.iter() {
            pos.make_move(*m, false);
        }
        pos.set_init_ply();
        assert_eq!(pos.ply(), 0);
        // The game history is still visible to repetition detection.
        for m in shuffle.iter() {
            pos.make_move(*m, false);
        }
        assert_eq!(pos.ply(), 4);
        assert!(pos.is_draw(true));
    }
}
