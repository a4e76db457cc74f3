//! A minimal UCI-style command loop: enough of the protocol for a GUI to drive the search core
//! (`uci`, `isready`, `ucinewgame`, `position`, `go`, `stop`, `quit`), plus `d`/`perft` for
//! manual debugging. Full option negotiation and pondering are out of scope.
//!
//! `go` blocks the thread running this loop for the duration of the search, so a second thread
//! owns stdin: it reads every line, reacts to `stop`/`quit` immediately by flipping the shared
//! stop flag, and forwards everything else over a channel this loop drains between searches. That
//! second thread never touches search-owned state, matching the controller/search split the
//! cancellation model assumes.

use std::io::{self, BufRead};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::board::fen;
use crate::engine::{format_info, Engine, TimeControl};
use crate::search::game_time::GameTime;
use crate::types::pieces::Color;

fn spawn_stdin_reader(stop_flag: Arc<AtomicBool>) -> Receiver<String> {
    let (tx, rx) = std::sync::mpsc::channel();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { return };
            let trimmed = line.trim();
            if trimmed == "stop" || trimmed == "quit" {
                stop_flag.store(true, Ordering::Relaxed);
            }
            if tx.send(line).is_err() {
                return;
            }
        }
    });
    rx
}

pub fn main_loop(hash_mb: usize, fixed_depth: Option<i32>) -> ! {
    let mut engine = Engine::new(hash_mb);
    if let Some(depth) = fixed_depth {
        engine.set_max_depth(depth);
    }
    let lines = spawn_stdin_reader(engine.stop_flag());

    for line in &lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();

        match tokens.first().copied() {
            Some("uci") => {
                println!("id name Corvid");
                println!("id author the corvid authors");
                println!("uciok");
            }
            Some("isready") => println!("readyok"),
            Some("ucinewgame") => engine.new_game(),
            Some("position") => handle_position(&mut engine, &tokens),
            Some("go") => handle_go(&mut engine, &tokens),
            Some("stop") => engine.stop(),
            Some("quit") => break,
            Some("d") => println!("{}", engine.board()),
            Some("perft") => handle_perft(&mut engine, &tokens),
            Some(other) => log::info!("unhandled command: {other}"),
            None => {}
        }
    }

    std::process::exit(0);
}

fn handle_position(engine: &mut Engine, tokens: &[&str]) {
    let moves_idx = tokens.iter().position(|&t| t == "moves");
    let moves: Vec<&str> = moves_idx.map(|i| tokens[i + 1..].to_vec()).unwrap_or_default();

    let result = if tokens.get(1) == Some(&"fen") {
        let end = moves_idx.unwrap_or(tokens.len());
        let fen_str = tokens[2..end].join(" ");
        engine.set_position(&fen_str, &moves)
    } else {
        engine.set_position(fen::STARTING_FEN, &moves)
    };

    if let Err(e) = result {
        log::error!("failed to set position: {e}");
    }
}

fn handle_perft(engine: &mut Engine, tokens: &[&str]) {
    let Some(depth) = tokens.get(1).and_then(|d| d.parse::<i32>().ok()) else {
        log::warn!("perft requires a depth argument");
        return;
    };
    crate::engine::perft::divided_perft(engine.board_mut(), depth);
}

fn handle_go(engine: &mut Engine, tokens: &[&str]) {
    if tokens.contains(&"perft") {
        if let Some(depth) =
            tokens.iter().position(|&t| t == "perft").and_then(|i| tokens.get(i + 1)).and_then(|d| d.parse().ok())
        {
            crate::engine::perft::divided_perft(engine.board_mut(), depth);
        }
        return;
    }

    let time_control = parse_go(tokens);
    let stm = engine.board().to_move();
    let (best_move, _score) = engine.search(time_control, |progress| {
        println!("{}", format_info(&progress, stm));
    });
    println!("bestmove {}", best_move.to_lan());
}

fn parse_go(tokens: &[&str]) -> TimeControl {
    let mut depth = None;
    let mut movetime = None;
    let mut gt = GameTime::default();
    let mut has_clock = false;

    let mut iter = tokens.iter().skip(1);
    while let Some(&key) = iter.next() {
        let Some(&value) = iter.next() else { break };
        match key {
            "depth" => depth = value.parse::<i32>().ok(),
            "movetime" => movetime = value.parse::<u64>().ok().map(Duration::from_millis),
            "wtime" => {
                if let Ok(ms) = value.parse::<u64>() {
                    gt.time_remaining[Color::White.idx()] = Duration::from_millis(ms);
                    has_clock = true;
                }
            }
            "btime" => {
                if let Ok(ms) = value.parse::<u64>() {
                    gt.time_remaining[Color::Black.idx()] = Duration::from_millis(ms);
                    has_clock = true;
                }
            }
            "winc" => {
                if let Ok(ms) = value.parse::<u64>() {
                    gt.time_inc[Color::White.idx()] = Duration::from_millis(ms);
                }
            }
            "binc" => {
                if let Ok(ms) = value.parse::<u64>() {
                    gt.time_inc[Color::Black.idx()] = Duration::from_millis(ms);
                }
            }
            "movestogo" => gt.movestogo = value.parse().unwrap_or(0),
            "infinite" => return TimeControl::Infinite,
            _ => {}
        }
    }

    if let Some(d) = depth {
        TimeControl::Depth(d)
    } else if let Some(mt) = movetime {
        TimeControl::MoveTime(mt)
    } else if has_clock {
        TimeControl::GameTime(gt)
    } else {
        TimeControl::Infinite
    }
}
