//! This crate implements the core of a bitboard chess engine: position
//! representation, move generation, the make/unmake pipeline, and the
//! staged move orderer that an alpha-beta search drives.
//!
//! # Design
//!
//! The [`Board`] type is a self-contained value describing the chess
//! state at one ply: piece placement, side to move, castling rights,
//! en-passant square, clocks, and a handful of incrementally maintained
//! aggregates (Zobrist hash, material, game phase, checkers mask).
//! Playing a move produces a *new* board -- nothing is mutated in
//! place, and taking a move back is simply dropping the successor.
//!
//! [`Position`] stacks boards along the current line of play. Keeping
//! the whole history around is what makes repetition detection possible:
//! a single board cannot know how many times it has occurred before.
//!
//! [`MoveOrder`] produces moves lazily, in stages, so that a search
//! which cuts off early never pays for generating and scoring the moves
//! it will not look at.
//!
//! Correctness of all of the above is established by
//! [`perft`](perft::perft) -- exhaustive node counting checked
//! against published values -- which the test suite runs in several
//! independent configurations.
//!
//! # Example
//!
//! ```rust
//! use skewer::{Position, MoveGenType};
//!
//! let mut pos = Position::default();
//! let moves = pos.generate_moves(MoveGenType::Legal);
//! assert_eq!(moves.len(), 20);
//! ```

#[macro_use]
extern crate lazy_static;
extern crate rand;
extern crate regex;

pub mod bitsets;
pub mod squares;
pub mod files;
pub mod ranks;
mod castling_rights;
mod moves;
mod board;
mod position;
mod move_order;
mod notation;
pub mod perft;

pub use castling_rights::*;
pub use moves::*;
pub use board::*;
pub use position::*;
pub use move_order::*;
pub use notation::*;
