//! Heuristic Sudoku solver built on simulated annealing.
//!
//! Solves a partially filled 9x9 grid by stochastic local search rather
//! than constraint propagation or backtracking:
//!
//! - **Initialization**: every 3x3 block is filled so it holds each digit
//!   at most once, with the puzzle's given cells kept in place.
//! - **Moves**: a neighbor swaps two free cells inside one random block,
//!   so block validity holds for the entire run and only row and column
//!   conflicts are scored.
//! - **Acceptance**: Metropolis criterion, with the starting temperature
//!   estimated from a short random walk, geometric cooling, and an
//!   additive reheat after a run of non-improving epochs.
//!
//! The search terminates only on a zero-conflict grid. Simulated
//! annealing offers no completeness guarantee: an unsolvable or unlucky
//! run does not halt unless an epoch budget ([`AnnealConfig::max_epochs`])
//! or a cancellation token ([`AnnealRunner::run_with_cancel`]) bounds it.
//!
//! # Examples
//!
//! ```no_run
//! use sudoku_anneal::solve;
//!
//! let puzzle = [
//!     [5, 3, 0, 0, 7, 0, 0, 0, 0],
//!     [6, 0, 0, 1, 9, 5, 0, 0, 0],
//!     [0, 9, 8, 0, 0, 0, 0, 6, 0],
//!     [8, 0, 0, 0, 6, 0, 0, 0, 3],
//!     [4, 0, 0, 8, 0, 3, 0, 0, 1],
//!     [7, 0, 0, 0, 2, 0, 0, 0, 6],
//!     [0, 6, 0, 0, 0, 0, 2, 8, 0],
//!     [0, 0, 0, 4, 1, 9, 0, 0, 5],
//!     [0, 0, 0, 0, 8, 0, 0, 7, 9],
//! ];
//! let solution = solve(puzzle, 0.99)?;
//! println!("{solution}");
//! # Ok::<(), sudoku_anneal::SolveError>(())
//! ```
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Cerny (1985), "Thermodynamical Approach to the Travelling Salesman Problem"

pub mod anneal;
pub mod grid;

pub use anneal::{random_fill, swap_within_block, AnnealConfig, AnnealResult, AnnealRunner};
pub use grid::{block_cells, Grid, Puzzle, PuzzleError};

use thiserror::Error;

/// Failure surfaced by the [`solve`] boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    #[error(transparent)]
    InvalidPuzzle(#[from] PuzzleError),

    /// The epoch budget ran out before a zero-conflict grid was found.
    #[error("no solution found within {epochs} epochs (score {best_score})")]
    DidNotConverge { epochs: usize, best_score: u32 },
}

/// Solves `rows` with default parameters and the given cooling rate.
///
/// Runs unbounded: returns a solution when one is found, or
/// [`SolveError::InvalidPuzzle`] immediately when the input is malformed.
/// Callers needing bounded execution use [`solve_with`] and a non-zero
/// [`AnnealConfig::max_epochs`], or [`AnnealRunner::run_with_cancel`].
pub fn solve(rows: [[u8; 9]; 9], cooling_rate: f64) -> Result<Grid, SolveError> {
    solve_with(rows, AnnealConfig::default().with_cooling_rate(cooling_rate))
}

/// Solves `rows` under an explicit configuration.
///
/// A bounded run that exhausts its epoch budget yields
/// [`SolveError::DidNotConverge`] with the final score.
pub fn solve_with(rows: [[u8; 9]; 9], config: AnnealConfig) -> Result<Grid, SolveError> {
    let puzzle = Puzzle::new(rows)?;
    let result = AnnealRunner::run(&puzzle, &config);
    if result.solved {
        Ok(result.grid)
    } else {
        Err(SolveError::DidNotConverge {
            epochs: result.epochs,
            best_score: result.score,
        })
    }
}
