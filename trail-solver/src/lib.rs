//! Game-tree search for the visit-once piece game.
//!
//! [`Solver`] runs alpha-beta minimax over [`trail_core::Board`] states,
//! memoizing results under their canonical form, and falls back to Monte Carlo
//! playouts once the search passes a depth budget.

pub mod config;
pub mod error;
pub mod movegen;
pub mod playout;
pub mod solver;
pub mod stats;
pub mod table;

pub use config::SearchConfig;
pub use error::SolverError;
pub use solver::{SearchResult, Solver};
pub use stats::SearchStats;
