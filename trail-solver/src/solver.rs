//! Recursive alpha-beta search with memoization and a playout horizon.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use log::{debug, log_enabled, trace, Level};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use trail_core::{Board, MoveList, Player};

use crate::movegen::ordered_moves;
use crate::playout;
use crate::stats::SearchStats;
use crate::table::{Bound, Entry, Key, Provenance, TranspositionTable};
use crate::{SearchConfig, SolverError};

/// How often (in nodes) the progress timer is consulted.
const LOG_CHECK_MASK: u64 = 0xFFF;

/// Outcome of one top-level search.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Probability in `[0, 1]` that the first player wins.
    pub first_player_win_probability: f64,
    /// Nodes searched by this call; positions answered from the table count 0.
    pub nodes_searched: u64,
    /// False when any playout estimate contributed to the value.
    pub exact: bool,
}

impl SearchResult {
    pub fn winner(&self) -> Player {
        if self.first_player_win_probability > 0.5 {
            Player::One
        } else {
            Player::Two
        }
    }
}

/// Value of a subtree and how it was obtained.
#[derive(Clone, Copy, Debug)]
struct Eval {
    value: f64,
    nodes: u64,
    estimated: bool,
}

/// Alpha-beta solver. Owns its transposition table, which persists across
/// searches until [`reset`](Self::reset).
pub struct Solver {
    config: SearchConfig,
    table: TranspositionTable,
    stats: SearchStats,
    rng: StdRng,
    running: Option<Arc<AtomicBool>>,
}

impl Solver {
    pub fn new(config: SearchConfig) -> Result<Self, SolverError> {
        config.validate()?;
        let rng = Self::make_rng(&config);
        Ok(Self {
            config,
            table: TranspositionTable::new(),
            stats: SearchStats::new(),
            rng,
            running: None,
        })
    }

    /// Abort the search with [`SolverError::Interrupted`] once `running` is cleared.
    pub fn with_interrupt(mut self, running: Arc<AtomicBool>) -> Self {
        self.running = Some(running);
        self
    }

    fn make_rng(config: &SearchConfig) -> StdRng {
        match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn table(&self) -> &TranspositionTable {
        &self.table
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Forget every memoized position and statistic. A seeded generator restarts
    /// from its seed.
    pub fn reset(&mut self) {
        self.table.clear();
        self.stats = SearchStats::new();
        self.rng = Self::make_rng(&self.config);
    }

    /// Solve from the initial position, first player to move.
    pub fn solve(&mut self, board: &mut Board) -> Result<SearchResult, SolverError> {
        self.search(board, 0, Player::One)
    }

    /// Search `board` with `to_move` on move, `depth` plies below the root.
    ///
    /// On error the board is left exactly as it was passed in.
    pub fn search(
        &mut self,
        board: &mut Board,
        depth: u32,
        to_move: Player,
    ) -> Result<SearchResult, SolverError> {
        let start = Instant::now();
        let eval = self.alpha_beta(board, depth, to_move, 0.0, 1.0)?;

        debug!(
            "{} player to move: value={:.4} nodes={} table={} exact={} in {:.3}s",
            to_move.name(),
            eval.value,
            eval.nodes,
            self.table.len(),
            !eval.estimated,
            start.elapsed().as_secs_f64()
        );

        Ok(SearchResult {
            first_player_win_probability: eval.value,
            nodes_searched: eval.nodes,
            exact: !eval.estimated,
        })
    }

    fn check_budget(&self) -> Result<(), SolverError> {
        if let Some(running) = &self.running {
            if !running.load(Ordering::Relaxed) {
                return Err(SolverError::Interrupted {
                    nodes: self.stats.nodes,
                });
            }
        }
        if let Some(limit) = self.config.node_limit {
            if self.stats.nodes >= limit {
                return Err(SolverError::NodeLimit { limit });
            }
        }
        Ok(())
    }

    fn alpha_beta(
        &mut self,
        board: &mut Board,
        depth: u32,
        to_move: Player,
        mut alpha: f64,
        mut beta: f64,
    ) -> Result<Eval, SolverError> {
        self.check_budget()?;

        let key = Key {
            state: board.canonical(),
            to_move,
        };
        let budget = self.config.max_depth.saturating_sub(depth);

        if let Some(entry) = self.table.probe(&key, alpha, beta, budget) {
            self.stats.cache_hits += 1;
            return Ok(Eval {
                value: entry.value,
                nodes: 0,
                estimated: entry.provenance == Provenance::Estimated,
            });
        }

        self.stats.nodes += 1;
        self.stats.max_depth = self.stats.max_depth.max(depth as u64);
        if self.stats.nodes & LOG_CHECK_MASK == 0
            && self.stats.should_log(self.config.log_interval_secs)
        {
            self.stats.log_progress(self.table.len());
        }

        // Horizon: estimate, never memoize
        if depth >= self.config.max_depth {
            let value = playout::estimate(board, to_move, self.config.trials, &mut self.rng);
            self.stats.record_playout(self.config.trials);
            return Ok(Eval {
                value,
                nodes: 1,
                estimated: true,
            });
        }

        if board.available_moves().is_empty() {
            let value = match to_move {
                Player::One => 0.0,
                Player::Two => 1.0,
            };
            self.stats.record_terminal(to_move.opponent());
            self.table.store(
                key,
                Entry {
                    value,
                    bound: Bound::Exact,
                    provenance: Provenance::Solved,
                    budget,
                },
            );
            return Ok(Eval {
                value,
                nodes: 1,
                estimated: false,
            });
        }

        let (moves, skipped) = ordered_moves(board, depth, &self.config);
        self.stats.symmetry_skips += skipped as u64;

        let indent = depth as usize * 2;
        if log_enabled!(Level::Trace) {
            trace!(
                "{:indent$}depth={}, player={}, available={:?}",
                "",
                depth,
                to_move.name(),
                move_cells(board, &moves)
            );
        }

        let maximizing = to_move == Player::One;
        let (alpha0, beta0) = (alpha, beta);
        let mut best = if maximizing { 0.0 } else { 1.0 };
        let mut nodes = 1;
        let mut estimated = false;

        for (i, mov) in moves.iter().enumerate() {
            trace!(
                "{:indent$}{} player chose {:?}",
                "",
                to_move.name(),
                board.geometry().row_col(mov)
            );
            let child = {
                let mut guard = board.play(mov);
                self.alpha_beta(&mut guard, depth + 1, to_move.opponent(), alpha, beta)?
            };
            nodes += child.nodes;
            estimated |= child.estimated;

            let improves = if maximizing {
                child.value > best
            } else {
                child.value < best
            };
            if improves {
                best = child.value;
            }

            if !self.config.prune {
                continue;
            }
            if maximizing {
                alpha = alpha.max(best);
            } else {
                beta = beta.min(best);
            }
            if alpha >= beta {
                self.stats.branches_pruned += (moves.len() - i - 1) as u64;
                break;
            }
        }

        let bound = if !self.config.prune {
            Bound::Exact
        } else if best <= alpha0 {
            Bound::Upper
        } else if best >= beta0 {
            Bound::Lower
        } else {
            Bound::Exact
        };
        let provenance = if estimated {
            Provenance::Estimated
        } else {
            Provenance::Solved
        };
        self.table.store(
            key,
            Entry {
                value: best,
                bound,
                provenance,
                budget,
            },
        );

        Ok(Eval {
            value: best,
            nodes,
            estimated,
        })
    }
}

/// `(row, col)` of each move, in search order.
fn move_cells(board: &Board, moves: &MoveList) -> Vec<(u8, u8)> {
    moves.iter().map(|cell| board.geometry().row_col(cell)).collect()
}
