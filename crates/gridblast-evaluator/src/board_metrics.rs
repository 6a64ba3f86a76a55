//! Lazily computed board measurements used by the scoring heuristic.

use std::cell::OnceCell;

use gridblast_engine::Board;

/// Per-board measurements, computed on first access and cached.
///
/// The scoring heuristic only reads the metrics its weights make relevant, so
/// each measurement is behind its own `OnceCell`.
#[derive(Debug)]
pub struct BoardMetrics {
    board: Board,
    num_holes: OnceCell<usize>,
    num_empty_regions: OnceCell<usize>,
}

impl BoardMetrics {
    #[must_use]
    pub fn from_board(board: &Board) -> Self {
        Self {
            board: board.clone(),
            num_holes: OnceCell::new(),
            num_empty_regions: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn filled_cells(&self) -> usize {
        self.board.filled_cells()
    }

    #[must_use]
    pub fn empty_cells(&self) -> usize {
        self.board.width() * self.board.height() - self.filled_cells()
    }

    /// Number of isolated empty cells: empty cells whose four orthogonal
    /// neighbours are all filled, with board edges counting as filled. Such
    /// cells can only be reached by a 1×1 piece, so they are heavily penalized.
    #[must_use]
    pub fn num_holes(&self) -> usize {
        *self.num_holes.get_or_init(|| {
            let (width, height) = (self.board.width(), self.board.height());
            let blocked = |row: Option<usize>, col: Option<usize>| match (row, col) {
                (Some(row), Some(col)) if row < height && col < width => {
                    self.board.occupied(row, col)
                }
                _ => true,
            };
            let mut holes = 0;
            for row in 0..height {
                for col in 0..width {
                    if !self.board.occupied(row, col)
                        && blocked(row.checked_sub(1), Some(col))
                        && blocked(Some(row + 1), Some(col))
                        && blocked(Some(row), col.checked_sub(1))
                        && blocked(Some(row), Some(col + 1))
                    {
                        holes += 1;
                    }
                }
            }
            holes
        })
    }

    /// Number of 4-connected regions of empty cells. A board whose free space
    /// is split into many small pockets accepts fewer shapes than one with the
    /// same free space in a single region.
    #[must_use]
    pub fn num_empty_regions(&self) -> usize {
        *self.num_empty_regions.get_or_init(|| {
            let (width, height) = (self.board.width(), self.board.height());
            let mut visited = [0u16; gridblast_engine::MAX_BOARD_HEIGHT];
            let mut regions = 0;
            let mut stack = Vec::new();
            for row in 0..height {
                for col in 0..width {
                    if self.board.occupied(row, col) || (visited[row] >> col) & 1 == 1 {
                        continue;
                    }
                    regions += 1;
                    stack.push((row, col));
                    visited[row] |= 1 << col;
                    while let Some((r, c)) = stack.pop() {
                        let neighbours = [
                            (r.wrapping_sub(1), c),
                            (r + 1, c),
                            (r, c.wrapping_sub(1)),
                            (r, c + 1),
                        ];
                        for (nr, nc) in neighbours {
                            if nr < height
                                && nc < width
                                && !self.board.occupied(nr, nc)
                                && (visited[nr] >> nc) & 1 == 0
                            {
                                visited[nr] |= 1 << nc;
                                stack.push((nr, nc));
                            }
                        }
                    }
                }
            }
            regions
        })
    }
}
