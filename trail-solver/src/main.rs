//! Visit-once piece game solver
//!
//! Solves one starting position with alpha-beta search, falling back to
//! Monte Carlo playouts past the depth horizon.

use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use log::{info, warn, LevelFilter};
use serde::Serialize;
use trail_core::Setup;
use trail_solver::config::{DEFAULT_TRIALS, MAX_DEPTH};
use trail_solver::{SearchConfig, SearchResult, SearchStats, Solver, SolverError};

#[derive(Parser, Debug)]
#[command(name = "solver", about = "Solve the visit-once piece game on a small board")]
struct Args {
    /// Board height (1-8)
    height: u8,
    /// Board width (1-8)
    width: u8,
    /// Starting row of the piece
    initial_row: u8,
    /// Starting column of the piece
    initial_col: u8,
    /// rook, king, queen or knight
    piece_type: String,

    /// Depth at which playouts replace search
    #[arg(long, default_value_t = MAX_DEPTH)]
    max_depth: u32,

    /// Random games per playout estimate
    #[arg(long, default_value_t = DEFAULT_TRIALS)]
    trials: u32,

    /// Try moves far from the center first
    #[arg(long)]
    heuristic: bool,

    /// Merge symmetric moves near the root
    #[arg(long)]
    symmetry: bool,

    /// Search every child with the full window
    #[arg(long)]
    no_prune: bool,

    /// Seed for playouts
    #[arg(long)]
    seed: Option<u64>,

    /// Give up after this many nodes
    #[arg(long)]
    node_limit: Option<u64>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// More output (-v debug, -vv per-node trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Explicit log level, overrides -v
    #[arg(long)]
    log_level: Option<LevelFilter>,

    /// Also write debug-level logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Serialize)]
struct Report<'a> {
    setup: &'a Setup,
    config: &'a SearchConfig,
    result: &'a SearchResult,
    stats: &'a SearchStats,
    table_size: usize,
    elapsed_secs: f64,
}

fn setup_logger(level: LevelFilter, log_file: Option<&PathBuf>) -> Result<(), fern::InitError> {
    let mut dispatcher = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.level(),
                message
            ))
        })
        .chain(fern::Dispatch::new().level(level).chain(io::stderr()));

    if let Some(path) = log_file {
        dispatcher = dispatcher.chain(
            fern::Dispatch::new()
                .level(level.max(LevelFilter::Debug))
                .chain(fern::log_file(path)?),
        );
    }

    dispatcher.apply()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = args.log_level.unwrap_or(match args.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    });
    setup_logger(level, args.log_file.as_ref()).context("failed to set up logging")?;

    let setup = Setup {
        rows: args.height,
        cols: args.width,
        row: args.initial_row,
        col: args.initial_col,
        piece: args.piece_type.clone(),
    };
    let mut board = setup.board()?;

    let config = SearchConfig {
        max_depth: args.max_depth,
        trials: args.trials,
        heuristic: args.heuristic,
        symmetry: args.symmetry,
        prune: !args.no_prune,
        seed: args.seed,
        node_limit: args.node_limit,
        ..SearchConfig::default()
    };

    // Set up SIGINT handler so the search unwinds cleanly
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .context("error setting Ctrl-C handler")?;

    let mut solver = Solver::new(config)?.with_interrupt(running);

    if !args.json {
        println!("{} on a {}x{} board", board.archetype(), args.height, args.width);
        println!("{board}");
    }
    info!(
        "Mode: {}{}{}",
        if solver.config().prune { "alpha-beta" } else { "full minimax" },
        if args.heuristic { ", heuristic ordering" } else { "" },
        if args.symmetry { ", symmetry pruning" } else { "" },
    );

    let start = Instant::now();
    let result = match solver.solve(&mut board) {
        Ok(result) => result,
        Err(err @ (SolverError::Interrupted { .. } | SolverError::NodeLimit { .. })) => {
            warn!("{err}");
            eprintln!("Search stopped before completion.\n{}", solver.stats());
            return Err(err.into());
        }
        Err(err) => return Err(err.into()),
    };
    let elapsed = start.elapsed().as_secs_f64();

    if args.json {
        let report = Report {
            setup: &setup,
            config: solver.config(),
            result: &result,
            stats: solver.stats(),
            table_size: solver.table().len(),
            elapsed_secs: elapsed,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let verdict = match result.winner() {
        trail_core::Player::One => "First player wins",
        trail_core::Player::Two => "Second player wins",
    };
    println!(
        "{verdict} (first player win probability {:.2}%{})",
        result.first_player_win_probability * 100.0,
        if result.exact { "" } else { ", estimated" }
    );
    println!("Nodes searched: {}", result.nodes_searched);
    println!("Time: {elapsed:.2}s");
    info!("Table size: {}\n{}", solver.table().len(), solver.stats());

    Ok(())
}
