//! Geometry of the nine 3x3 blocks.

/// Coordinates of the 9 cells of `block`, row-major within the block.
///
/// Blocks are numbered band-major: block 0 is the top-left 3x3 region,
/// block 2 the top-right, block 8 the bottom-right. Together the nine
/// blocks partition the 81 cells of the grid.
pub fn block_cells(block: usize) -> [(usize, usize); 9] {
    debug_assert!(block < 9, "block index out of range: {block}");
    let row0 = 3 * (block / 3);
    let col0 = 3 * (block % 3);
    let mut cells = [(0usize, 0usize); 9];
    for (k, cell) in cells.iter_mut().enumerate() {
        *cell = (row0 + k / 3, col0 + k % 3);
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_blocks_partition_the_grid() {
        let mut seen = HashSet::new();
        for block in 0..9 {
            for cell in block_cells(block) {
                assert!(seen.insert(cell), "cell {cell:?} covered twice");
            }
        }
        assert_eq!(seen.len(), 81);
    }

    #[test]
    fn test_blocks_are_contiguous_3x3_regions() {
        for block in 0..9 {
            let cells = block_cells(block);
            let row0 = cells.iter().map(|&(r, _)| r).min().unwrap();
            let col0 = cells.iter().map(|&(_, c)| c).min().unwrap();
            assert_eq!(row0 % 3, 0);
            assert_eq!(col0 % 3, 0);
            for k in 0..3 {
                for l in 0..3 {
                    assert!(cells.contains(&(row0 + k, col0 + l)));
                }
            }
        }
    }

    #[test]
    fn test_block_ordering_is_band_major() {
        assert_eq!(block_cells(0)[0], (0, 0));
        assert_eq!(block_cells(2)[0], (0, 6));
        assert_eq!(block_cells(3)[0], (3, 0));
        assert_eq!(block_cells(8)[8], (8, 8));
    }
}
