//! Outcome scoring: assigning a scalar score to a terminal board state.
//!
//! The score is a weighted combination of the branch's cleared-line tally
//! (amplified by the caller's combo streak) and measurements of the final
//! board:
//!
//! ```text
//! score = lines * lines_cleared_weight * combo_multiplier^combo_streak
//!       + filled_cells * fullness_weight
//!       - holes * hole_penalty_weight
//!       - (empty_regions - 1) * fragmentation_penalty_weight
//! ```
//!
//! Every term is monotonic, so tuning the weights changes preferences but
//! never inverts them: clearing more lines always helps, opening more holes
//! always hurts.

use std::fmt;

use crate::{outcome::OutcomeAnalysis, weights::ScoreWeights};

/// Scores a terminal search outcome; higher is better.
///
/// The search owns a boxed evaluator, so alternative heuristics can be swapped
/// in without touching the enumeration.
pub trait OutcomeEvaluator: fmt::Debug + Send + Sync {
    fn evaluate_outcome(&self, analysis: &OutcomeAnalysis) -> f32;
}

/// The standard weighted-sum heuristic over [`ScoreWeights`].
#[derive(Debug, Clone, Default)]
pub struct WeightedOutcomeEvaluator {
    weights: ScoreWeights,
}

impl WeightedOutcomeEvaluator {
    #[must_use]
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    #[must_use]
    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }
}

impl OutcomeEvaluator for WeightedOutcomeEvaluator {
    #[expect(clippy::cast_precision_loss)]
    fn evaluate_outcome(&self, analysis: &OutcomeAnalysis) -> f32 {
        let w = &self.weights;
        let metrics = analysis.metrics();
        let combo_factor = w
            .combo_multiplier
            .powi(i32::try_from(analysis.combo_streak()).unwrap_or(i32::MAX));
        analysis.cleared_lines() as f32 * w.lines_cleared_weight * combo_factor
            + metrics.filled_cells() as f32 * w.fullness_weight
            - metrics.num_holes() as f32 * w.hole_penalty_weight
            - metrics.num_empty_regions().saturating_sub(1) as f32
                * w.fragmentation_penalty_weight
    }
}

#[cfg(test)]
mod tests {
    use arrayvec::ArrayVec;
    use gridblast_engine::Board;

    use super::*;
    use crate::outcome::Outcome;

    fn analysis(board_art: &str, cleared_lines: usize, combo_streak: u32) -> OutcomeAnalysis {
        let board: Board = board_art.parse().unwrap();
        let outcome = Outcome::new(board, ArrayVec::new(), cleared_lines);
        OutcomeAnalysis::from_outcome(&outcome, combo_streak)
    }

    fn score(board_art: &str, cleared_lines: usize, combo_streak: u32) -> f32 {
        WeightedOutcomeEvaluator::default()
            .evaluate_outcome(&analysis(board_art, cleared_lines, combo_streak))
    }

    const BOARD: &str = "
        ##......
        ........
        ........
        ........
        ........
        ........
        ........
        ........
    ";

    #[test]
    fn test_more_lines_cleared_scores_strictly_higher() {
        assert!(score(BOARD, 1, 0) > score(BOARD, 0, 0));
        assert!(score(BOARD, 2, 0) > score(BOARD, 1, 0));
    }

    #[test]
    fn test_more_holes_scores_strictly_lower() {
        // Same fill count, second board has an isolated empty cell at (0, 0).
        let open = "
            .###....
            ........
            ........
            ........
        ";
        let holed = "
            .#.#....
            #.......
            ........
            ........
        ";
        assert!(score(holed, 0, 0) < score(open, 0, 0));
    }

    #[test]
    fn test_combo_streak_amplifies_line_term() {
        let base = score(BOARD, 1, 0);
        let streak = score(BOARD, 1, 2);
        let weights = ScoreWeights::default();
        let expected_gain =
            weights.lines_cleared_weight * (weights.combo_multiplier.powi(2) - 1.0);
        assert!((streak - base - expected_gain).abs() < 1e-4);
    }

    #[test]
    fn test_combo_streak_without_clears_changes_nothing() {
        assert_eq!(score(BOARD, 0, 0), score(BOARD, 0, 3));
    }

    #[test]
    fn test_fragmentation_penalty() {
        let split = "
            ..#.
            ..#.
            ..#.
            ..#.
        ";
        let joined = "
            .##.
            ..#.
            ..#.
            ....
        ";
        // Same fill count and no holes; the split board has two empty regions.
        assert!(score(split, 0, 0) < score(joined, 0, 0));
    }
}
