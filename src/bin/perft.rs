//! Perft driver: `perft <depth> [--divide] [--timeout <secs>] [fen...]`.
//!
//! Counts leaf positions from the start position or the given FEN. Set
//! `RUST_LOG=debug` to see setup and cancellation diagnostics.

use std::env;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use chess_core::{Position, StopFlag};

fn usage() -> ExitCode {
    eprintln!("usage: perft <depth> [--divide] [--timeout <secs>] [fen...]");
    ExitCode::FAILURE
}

fn main() -> ExitCode {
    env_logger::init();

    let mut args = env::args().skip(1);
    let Some(depth) = args.next().and_then(|d| d.parse::<usize>().ok()) else {
        return usage();
    };

    let mut divide = false;
    let mut timeout = None;
    let mut fen_parts = Vec::new();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--divide" => divide = true,
            "--timeout" => match args.next().and_then(|s| s.parse::<f64>().ok()) {
                Some(secs) if secs > 0.0 => timeout = Some(Duration::from_secs_f64(secs)),
                _ => return usage(),
            },
            _ => fen_parts.push(arg),
        }
    }

    let mut position = if fen_parts.is_empty() {
        Position::new()
    } else {
        match Position::try_from_fen(&fen_parts.join(" ")) {
            Ok(position) => position,
            Err(err) => {
                eprintln!("invalid FEN: {err}");
                return ExitCode::FAILURE;
            }
        }
    };

    println!("{position}");
    let stop = StopFlag::new();
    let start = Instant::now();
    if let Some(limit) = timeout {
        // the timer thread is left to finish on its own
        let _ = stop.stop_after(limit);
    }
    let nodes = if divide {
        let mut total = 0;
        for (mv, count) in position.perft_divide_with_stop(depth, &stop) {
            println!("{mv}: {count}");
            total += count;
        }
        total
    } else {
        position.perft_with_stop(depth, &stop)
    };
    let elapsed = start.elapsed();
    if stop.is_stopped() {
        println!("stopped early");
    }

    let nps = nodes as f64 / elapsed.as_secs_f64().max(1e-9);
    println!("perft({depth}) = {nodes}");
    println!("time: {:.3}s ({:.0} nodes/s)", elapsed.as_secs_f64(), nps);
    ExitCode::SUCCESS
}
