//! A thin interactive driver for the engine core.
//!
//! Speaks just enough of the UCI dialect to load positions and run
//! perft -- there is no search and no threading here. Commands:
//!
//! * `uci`, `isready`, `ucinewgame`, `quit` -- the usual handshake;
//! * `position startpos|fen <fen> [moves <m1> <m2> ...]`;
//! * `go perft <depth>`;
//! * `board` -- print the current board;
//! * `test` -- run the perft suite in all configurations.

extern crate skewer;

use std::collections::HashMap;
use std::io::{self, BufRead};
use std::str::SplitWhitespace;
use skewer::*;
use skewer::perft::{perft, perft_cached, perft_leaf_counting, perft_ordered, test_suite};

fn main() {
    let stdin = io::stdin();
    let mut pos = Position::default();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(_) => break,
        };
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("uci") => {
                println!("id name skewer");
                println!("id author skewer developers");
                println!("uciok");
            }
            Some("isready") => println!("readyok"),
            Some("ucinewgame") => pos = Position::default(),
            Some("position") => position_command(&mut pos, &mut tokens),
            Some("go") => go_command(&mut pos, &mut tokens),
            Some("board") => println!("{}", pos.board()),
            Some("test") => run_test_suite(),
            Some("quit") => break,
            _ => {}
        }
    }
}

fn position_command(pos: &mut Position, tokens: &mut SplitWhitespace) {
    match tokens.next() {
        Some("startpos") => {
            *pos = Position::default();
            // Consume the "moves" token, if passed.
            while let Some(token) = tokens.next() {
                if token == "moves" {
                    break;
                }
            }
        }
        Some("fen") => {
            let mut fen = String::new();
            while let Some(token) = tokens.next() {
                if token == "moves" {
                    break;
                }
                fen.push_str(token);
                fen.push(' ');
            }
            *pos = Position::from_fen(&fen);
        }
        _ => return,
    }

    for token in tokens {
        let m = move_from_uci(pos, token);
        if m == MOVE_NULL {
            break;
        }
        pos.make_move(m, false);
        pos.set_init_ply();
    }
}

fn go_command(pos: &mut Position, tokens: &mut SplitWhitespace) {
    let mut perft_depth = 0;
    while let Some(token) = tokens.next() {
        if token == "perft" {
            if let Some(depth) = tokens.next().and_then(|s| s.parse().ok()) {
                perft_depth = depth;
            }
        }
    }
    if perft_depth > 0 {
        let nodes = perft(pos, perft_depth);
        println!("");
        println!("Nodes searched: {}", nodes);
    } else {
        println!("info string this build only supports 'go perft <depth>'");
    }
}

/// Runs every suite position through every perft configuration, one
/// ply short of the published depth to keep the run interactive.
fn run_test_suite() {
    let mut failed = 0;
    let mut total = 0;
    for &(fen, depth, _) in test_suite().iter() {
        total += 1;
        let mut pos = Position::from_fen(fen);
        let base = perft(&mut pos, depth - 1);
        let ordered = perft_ordered(&mut pos, depth - 1);
        let cached = perft_cached(&mut pos, depth - 1, &mut HashMap::new());
        let leaf = perft_leaf_counting(&mut pos, depth - 1);
        if ordered == base && cached == base && leaf == base {
            println!("[ OK ] {} ({})", fen, base);
        } else {
            println!("[FAIL] {} (base {}, ordered {}, tt {}, legality {})",
                     fen,
                     base,
                     ordered,
                     cached,
                     leaf);
            failed += 1;
        }
    }
    println!("");
    println!("Failed/total tests: {}/{}", failed, total);
}
