//! Annealing execution loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, trace};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::config::AnnealConfig;
use super::moves::{random_fill, swap_within_block};
use crate::grid::{Grid, Puzzle};

/// Number of probe moves used to estimate the starting temperature.
const TEMPERATURE_PROBE_STEPS: usize = 10;

/// Result of an annealing run.
#[derive(Debug, Clone)]
pub struct AnnealResult {
    /// Final working grid. A valid solution when `solved` is true.
    pub grid: Grid,

    /// Conflict count of `grid`; 0 means solved.
    pub score: u32,

    /// Whether the run reached a zero-conflict grid.
    pub solved: bool,

    /// Epochs (outer iterations) executed.
    pub epochs: usize,

    /// Total neighbor evaluations.
    pub trials: usize,

    /// Number of accepted moves (including improvements).
    pub accepted_moves: usize,

    /// Number of improving moves.
    pub improving_moves: usize,

    /// Number of reheat events.
    pub reheats: usize,

    /// Temperature when the run stopped.
    pub final_temperature: f64,

    /// Whether cancelled externally.
    pub cancelled: bool,

    /// Score at the end of each epoch.
    pub score_history: Vec<u32>,
}

/// Working state threaded through the search.
struct SearchState {
    grid: Grid,
    score: u32,
    temperature: f64,
}

/// Executes the annealing search.
pub struct AnnealRunner;

impl AnnealRunner {
    /// Runs the search until the grid has no conflicts, or the epoch
    /// budget (if any) runs out.
    pub fn run(puzzle: &Puzzle, config: &AnnealConfig) -> AnnealResult {
        Self::run_with_cancel(puzzle, config, None)
    }

    /// Runs the search with an optional cancellation token.
    ///
    /// With `max_epochs == 0` the loop is unbounded; the token is then the
    /// only way to stop a run that fails to converge.
    pub fn run_with_cancel(
        puzzle: &Puzzle,
        config: &AnnealConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> AnnealResult {
        config.validate().expect("invalid AnnealConfig");

        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };

        // Initialize, then estimate the starting temperature. The probe
        // walk advances the working grid; the loop starts from the state
        // it leaves behind.
        let grid = random_fill(puzzle, &mut rng);
        let score = grid.conflict_count();
        let mut state = SearchState {
            grid,
            score,
            temperature: 0.0,
        };
        state.temperature = initial_temperature(&mut state, puzzle, &mut rng);

        let limit = puzzle.empty_cells();
        debug!(
            "annealing start: temperature {:.3}, score {}, {} trials per epoch",
            state.temperature, state.score, limit
        );

        let mut epochs = 0usize;
        let mut trials = 0usize;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;
        let mut reheats = 0usize;
        let mut stale_epochs = 0usize;
        let mut cancelled = false;
        let mut score_history = Vec::new();

        let solved = loop {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break false;
                }
            }
            if state.grid.conflict_count() == 0 {
                break true;
            }
            if config.max_epochs > 0 && epochs >= config.max_epochs {
                break false;
            }

            let previous_score = state.score;
            for _ in 0..limit {
                let neighbor = swap_within_block(&state.grid, puzzle, &mut rng);
                let neighbor_score = neighbor.conflict_count();
                if neighbor_score < state.score {
                    improving_moves += 1;
                }

                // Metropolis criterion: improving moves give p >= 1 and are
                // always accepted, worsening moves pass with probability
                // exp(-delta / T).
                let probability = ((f64::from(state.score) - f64::from(neighbor_score))
                    / state.temperature)
                    .exp();
                if rng.random_range(0.0..1.0) < probability {
                    state.grid = neighbor;
                    state.score = neighbor_score;
                    accepted_moves += 1;
                }

                trials += 1;
                if state.score == 0 {
                    break;
                }
            }

            epochs += 1;
            score_history.push(state.score);
            if state.score == 0 {
                break true;
            }

            if state.score >= previous_score {
                stale_epochs += 1;
            } else {
                stale_epochs = 0;
            }

            state.temperature *= config.cooling_rate;
            if stale_epochs > config.reheat_patience {
                state.temperature += config.reheat_boost;
                stale_epochs = 0;
                reheats += 1;
                debug!(
                    "reheat {}: temperature {:.3}, score {}",
                    reheats, state.temperature, state.score
                );
            }
            trace!(
                "epoch {}: score {}, temperature {:.4}",
                epochs,
                state.score,
                state.temperature
            );
        };

        AnnealResult {
            grid: state.grid,
            score: state.score,
            solved,
            epochs,
            trials,
            accepted_moves,
            improving_moves,
            reheats,
            final_temperature: state.temperature,
            cancelled,
            score_history,
        }
    }
}

/// Estimates the starting temperature as the population standard deviation
/// of the scores along a short random walk.
///
/// Each probe move is applied to the running grid, so consecutive
/// neighbors chain off one another; the walk deliberately leaves `state`
/// at its final step rather than rewinding to the initial fill.
fn initial_temperature<R: Rng>(state: &mut SearchState, puzzle: &Puzzle, rng: &mut R) -> f64 {
    let mut samples = [0u32; TEMPERATURE_PROBE_STEPS];
    for sample in &mut samples {
        let neighbor = swap_within_block(&state.grid, puzzle, rng);
        let neighbor_score = neighbor.conflict_count();
        *sample = neighbor_score;
        state.grid = neighbor;
        state.score = neighbor_score;
    }
    population_std(&samples)
}

fn population_std(samples: &[u32]) -> f64 {
    let n = samples.len() as f64;
    let mean = samples.iter().map(|&s| f64::from(s)).sum::<f64>() / n;
    let variance = samples
        .iter()
        .map(|&s| {
            let d = f64::from(s) - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solved_rows() -> [[u8; 9]; 9] {
        std::array::from_fn(|r| std::array::from_fn(|c| ((r * 3 + r / 3 + c) % 9 + 1) as u8))
    }

    fn easy_rows() -> [[u8; 9]; 9] {
        let mut rows = solved_rows();
        for &(r, c) in &[
            (0, 0),
            (0, 5),
            (1, 3),
            (2, 7),
            (3, 1),
            (4, 4),
            (4, 8),
            (5, 2),
            (6, 6),
            (7, 0),
            (8, 4),
            (8, 8),
        ] {
            rows[r][c] = 0;
        }
        rows
    }

    #[test]
    fn test_population_std() {
        assert!(population_std(&[4, 4, 4, 4]).abs() < 1e-12);
        // Two-point sample {0, 2}: mean 1, variance 1.
        assert!((population_std(&[0, 2]) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_complete_grid_returns_immediately() {
        let puzzle = Puzzle::new(solved_rows()).unwrap();
        let config = AnnealConfig::default().with_seed(42);
        let result = AnnealRunner::run(&puzzle, &config);

        assert!(result.solved);
        assert_eq!(result.score, 0);
        assert_eq!(result.epochs, 0);
        assert_eq!(result.trials, 0);
        assert_eq!(result.grid.rows(), &solved_rows());
    }

    #[test]
    fn test_single_empty_cell_converges_to_forced_digit() {
        let mut rows = solved_rows();
        let forced = rows[4][4];
        rows[4][4] = 0;
        let puzzle = Puzzle::new(rows).unwrap();
        let config = AnnealConfig::default().with_seed(42);
        let result = AnnealRunner::run(&puzzle, &config);

        assert!(result.solved);
        assert_eq!(result.grid.get(4, 4), forced);
    }

    #[test]
    fn test_solves_easy_puzzle_and_keeps_givens() {
        let rows = easy_rows();
        let puzzle = Puzzle::new(rows).unwrap();
        let config = AnnealConfig::default()
            .with_seed(42)
            .with_max_epochs(200_000);
        let result = AnnealRunner::run(&puzzle, &config);

        assert!(result.solved, "stopped at score {}", result.score);
        assert_eq!(result.grid.conflict_count(), 0);
        for r in 0..9 {
            for c in 0..9 {
                if puzzle.is_given(r, c) {
                    assert_eq!(result.grid.get(r, c), rows[r][c]);
                }
            }
        }
    }

    #[test]
    fn test_epoch_budget_reports_unsolved() {
        // Row 0 forces (0, 0) to be 1, but column 0 already holds a 1:
        // valid givens, no solution.
        let mut rows = [[0u8; 9]; 9];
        rows[0] = [0, 2, 3, 4, 5, 6, 7, 8, 9];
        rows[3][0] = 1;
        let puzzle = Puzzle::new(rows).unwrap();
        let config = AnnealConfig::default().with_seed(42).with_max_epochs(50);
        let result = AnnealRunner::run(&puzzle, &config);

        assert!(!result.solved);
        assert!(!result.cancelled);
        assert_eq!(result.epochs, 50);
        assert!(result.score > 0);
        assert_eq!(result.score_history.len(), 50);
    }

    #[test]
    fn test_cancellation() {
        let puzzle = Puzzle::new(easy_rows()).unwrap();
        let config = AnnealConfig::default().with_seed(42);

        // Set the flag before running, so cancellation is deterministic
        // no matter how fast the solver converges.
        let cancel = Arc::new(AtomicBool::new(true));
        let result = AnnealRunner::run_with_cancel(&puzzle, &config, Some(cancel));

        assert!(result.cancelled);
        assert!(!result.solved);
        assert_eq!(result.trials, 0);
    }

    #[test]
    fn test_same_seed_reproduces_run() {
        let puzzle = Puzzle::new(easy_rows()).unwrap();
        let config = AnnealConfig::default()
            .with_seed(7)
            .with_max_epochs(200_000);

        let a = AnnealRunner::run(&puzzle, &config);
        let b = AnnealRunner::run(&puzzle, &config);

        assert_eq!(a.grid.rows(), b.grid.rows());
        assert_eq!(a.epochs, b.epochs);
        assert_eq!(a.trials, b.trials);
        assert_eq!(a.accepted_moves, b.accepted_moves);
        assert_eq!(a.score_history, b.score_history);
    }
}
