//! Terminal search results and their analysis.

use arrayvec::ArrayVec;
use gridblast_engine::{Board, Placement};

use crate::board_metrics::BoardMetrics;

/// Largest piece batch the search accepts.
pub const MAX_PIECES: usize = 4;

/// A terminal search branch: every piece of the batch placed.
///
/// Holds the final board (after all clears), the ordered placements that
/// reached it and the cumulative number of lines cleared along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    board: Board,
    placements: ArrayVec<Placement, MAX_PIECES>,
    cleared_lines: usize,
}

impl Outcome {
    pub(crate) fn new(
        board: Board,
        placements: ArrayVec<Placement, MAX_PIECES>,
        cleared_lines: usize,
    ) -> Self {
        Self {
            board,
            placements,
            cleared_lines,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Placements in the order they were committed.
    #[must_use]
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Total rows and columns cleared across all placement steps.
    #[must_use]
    pub fn cleared_lines(&self) -> usize {
        self.cleared_lines
    }
}

/// Everything the scoring heuristic needs about one outcome: the cleared-line
/// tally, the caller-supplied combo streak and the final board's metrics.
#[derive(Debug)]
pub struct OutcomeAnalysis {
    cleared_lines: usize,
    combo_streak: u32,
    metrics: BoardMetrics,
}

impl OutcomeAnalysis {
    #[must_use]
    pub fn from_outcome(outcome: &Outcome, combo_streak: u32) -> Self {
        Self {
            cleared_lines: outcome.cleared_lines(),
            combo_streak,
            metrics: BoardMetrics::from_board(outcome.board()),
        }
    }

    #[must_use]
    pub fn cleared_lines(&self) -> usize {
        self.cleared_lines
    }

    #[must_use]
    pub fn combo_streak(&self) -> u32 {
        self.combo_streak
    }

    #[must_use]
    pub fn metrics(&self) -> &BoardMetrics {
        &self.metrics
    }
}
