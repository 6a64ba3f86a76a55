use std::{
    fmt::{self, Write as _},
    str::FromStr,
};

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::board::{MAX_BOARD_HEIGHT, MAX_BOARD_WIDTH, lower_bits, parse_cell_lines};

/// An immutable piece shape: a boolean occupancy matrix of arbitrary height
/// and width (bounded by the board dimensions).
///
/// Like the board, each shape row is a `u16` bitmask with bit `c` for column
/// `c`. Pieces compare by shape only; where a shape came from (detection,
/// fixture, manual entry) is irrelevant. Shapes are taken as given - no
/// connectedness or plausibility check - except that a shape with zero filled
/// cells is rejected at parse time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    width: usize,
    rows: ArrayVec<u16, MAX_BOARD_HEIGHT>,
}

impl Piece {
    /// Returns (height, width) of the shape matrix.
    #[must_use]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows.len(), self.width)
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Lazily yields the (row offset, column offset) of every filled cell,
    /// row-major.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows.iter().enumerate().flat_map(move |(row, mask)| {
            (0..self.width)
                .filter(move |col| (mask >> col) & 1 == 1)
                .map(move |col| (row, col))
        })
    }

    /// Returns the number of filled cells in the shape.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.rows.iter().map(|row| row.count_ones() as usize).sum()
    }

    pub(crate) fn row_masks(&self) -> &[u16] {
        &self.rows
    }
}

/// Renders the shape as ASCII art in the same format boards use.
impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for col in 0..self.width {
                let ch = if (row >> col) & 1 == 1 { '#' } else { '.' };
                write!(f, "{ch}")?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParsePieceError {
    #[display("{_0}")]
    Grid(crate::board::ParseBoardError),
    #[display("piece has no filled cells")]
    NoFilledCells,
}

impl FromStr for Piece {
    type Err = ParsePieceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cells = parse_cell_lines(s).map_err(ParsePieceError::Grid)?;
        let width = cells[0].len();
        if width > MAX_BOARD_WIDTH || cells.len() > MAX_BOARD_HEIGHT {
            return Err(ParsePieceError::Grid(crate::board::ParseBoardError::TooLarge));
        }
        let mut rows = ArrayVec::new();
        for line in &cells {
            let mut mask = 0u16;
            for (col, &filled) in line.iter().enumerate() {
                if filled {
                    mask |= 1 << col;
                }
            }
            rows.push(mask);
        }
        if rows.iter().all(|mask| *mask == 0) {
            return Err(ParsePieceError::NoFilledCells);
        }
        Ok(Self { width, rows })
    }
}

impl Serialize for Piece {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Same compact format as boards: "2x2:0003,0003"
        let mut s = String::with_capacity(8 + self.rows.len() * 5);
        write!(&mut s, "{}x{}:", self.width, self.rows.len()).unwrap();
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                s.push(',');
            }
            write!(&mut s, "{row:04x}").unwrap();
        }
        serializer.serialize_str(&s)
    }
}

impl<'de> Deserialize<'de> for Piece {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;

        let s = String::deserialize(deserializer)?;
        let (width, rows) =
            crate::board::parse_hex_grid::<D>(&s, MAX_BOARD_WIDTH, MAX_BOARD_HEIGHT)?;
        if rows.iter().all(|mask| mask & lower_bits(width) == 0) {
            return Err(D::Error::custom("piece has no filled cells"));
        }
        Ok(Self { width, rows })
    }
}
