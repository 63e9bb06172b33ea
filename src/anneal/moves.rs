//! Move generation: block-constrained fill and swap.
//!
//! Both moves work at block granularity. The fill establishes the
//! invariant that every block holds distinct digits; the swap exchanges
//! two free cells inside a single block and therefore preserves it. Row
//! and column conflicts are the only violations the search ever has to
//! repair.

use rand::seq::{index, SliceRandom};
use rand::Rng;

use crate::grid::{block_cells, Grid, Puzzle};

/// Fills every empty cell of the puzzle so that each block holds each of
/// 1-9 at most once. Given cells keep their values.
///
/// Per block, the candidates are 1-9 minus the block's given digits,
/// shuffled uniformly and assigned in order to the block's empty cells.
/// Should the candidates run out (a block whose givens conflict), the
/// remaining cells stay 0; `Puzzle::new` rejects such inputs, so a
/// validated puzzle always comes out fully filled.
pub fn random_fill<R: Rng>(puzzle: &Puzzle, rng: &mut R) -> Grid {
    let mut grid = *puzzle.givens();
    for block in 0..9 {
        let cells = block_cells(block);
        let mut candidates: Vec<u8> = (1..=9).collect();
        for &(r, c) in &cells {
            let given = puzzle.givens().get(r, c);
            if given != 0 {
                candidates.retain(|&v| v != given);
            }
        }
        candidates.shuffle(rng);
        let mut next = candidates.into_iter();
        for &(r, c) in &cells {
            if grid.get(r, c) == 0 {
                if let Some(value) = next.next() {
                    grid.set(r, c, value);
                }
            }
        }
    }
    grid
}

/// Produces a neighbor grid by swapping two free (non-given) cells within
/// one uniformly chosen block.
///
/// When the chosen block has fewer than two free cells the grid is
/// returned unchanged; such draws are wasted trials, not errors. The swap
/// keeps each block's multiset of values intact, so block validity
/// established by [`random_fill`] holds for the lifetime of the search.
pub fn swap_within_block<R: Rng>(grid: &Grid, puzzle: &Puzzle, rng: &mut R) -> Grid {
    let mut result = *grid;
    let block = rng.random_range(0..9);
    let free: Vec<(usize, usize)> = block_cells(block)
        .into_iter()
        .filter(|&(r, c)| !puzzle.is_given(r, c))
        .collect();
    if free.len() < 2 {
        return result;
    }

    let picked = index::sample(rng, free.len(), 2);
    let (r1, c1) = free[picked.index(0)];
    let (r2, c2) = free[picked.index(1)];
    let v1 = result.get(r1, c1);
    result.set(r1, c1, result.get(r2, c2));
    result.set(r2, c2, v1);
    result
}
