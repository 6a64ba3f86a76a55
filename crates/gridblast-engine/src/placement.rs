use serde::{Deserialize, Serialize};

/// Board coordinate of a piece's top-left cell when placed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display,
)]
#[display("(row {row}, column {col})")]
pub struct Anchor {
    pub row: usize,
    pub col: usize,
}

/// One committed placement: which piece of the batch went where.
///
/// `piece` indexes into the piece batch handed to the search, so the same
/// list of placements can be replayed against the original input.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display,
)]
#[display("piece {piece} at {anchor}")]
pub struct Placement {
    pub piece: usize,
    pub anchor: Anchor,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let placement = Placement {
            piece: 2,
            anchor: Anchor { row: 0, col: 7 },
        };
        assert_eq!(placement.to_string(), "piece 2 at (row 0, column 7)");
        assert_eq!(placement.anchor.to_string(), "(row 0, column 7)");
    }

    #[test]
    fn test_serde_round_trip() {
        let placement = Placement {
            piece: 1,
            anchor: Anchor { row: 3, col: 4 },
        };
        let json = serde_json::to_string(&placement).unwrap();
        let back: Placement = serde_json::from_str(&json).unwrap();
        assert_eq!(back, placement);
    }
}
