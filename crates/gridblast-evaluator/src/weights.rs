//! Tunable weights for the scoring heuristic.

use serde::{Deserialize, Serialize};

/// Named weights of the outcome scoring heuristic.
///
/// The values are a tuned heuristic, not a model of any game's internal
/// scoring. The monotonicity contract holds for any configuration with
/// non-negative weights, `lines_cleared_weight > 0`, `hole_penalty_weight > 0`
/// and `combo_multiplier >= 1`: more cleared lines strictly increase the
/// score and more holes strictly decrease it, all else equal.
///
/// Serde-loadable so alternative tunings can be supplied as JSON; missing
/// fields fall back to the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    /// Reward per cleared line (row or column). The dominant term.
    pub lines_cleared_weight: f32,
    /// Per-streak-step multiplier applied to the cleared-lines term:
    /// `lines * lines_cleared_weight * combo_multiplier^combo_streak`.
    pub combo_multiplier: f32,
    /// Reward per filled cell. Keeping the board fuller means pending rows and
    /// columns are closer to completion.
    pub fullness_weight: f32,
    /// Penalty per isolated empty cell.
    pub hole_penalty_weight: f32,
    /// Penalty per empty region beyond the first.
    pub fragmentation_penalty_weight: f32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            lines_cleared_weight: 10.0,
            combo_multiplier: 1.5,
            fullness_weight: 0.25,
            hole_penalty_weight: 2.0,
            fragmentation_penalty_weight: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let weights: ScoreWeights =
            serde_json::from_str(r#"{"hole_penalty_weight": 5.0}"#).unwrap();
        assert_eq!(weights.hole_penalty_weight, 5.0);
        assert_eq!(
            weights.lines_cleared_weight,
            ScoreWeights::default().lines_cleared_weight,
        );
    }

    #[test]
    fn test_round_trip() {
        let weights = ScoreWeights {
            lines_cleared_weight: 7.0,
            ..ScoreWeights::default()
        };
        let json = serde_json::to_string(&weights).unwrap();
        let back: ScoreWeights = serde_json::from_str(&json).unwrap();
        assert_eq!(back, weights);
    }
}
