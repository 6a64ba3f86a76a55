use std::{
    fmt::{self, Write as _},
    str::FromStr,
};

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::{InvalidPlacementError, piece::Piece, placement::Anchor};

/// Widest board the bit-row representation supports.
pub const MAX_BOARD_WIDTH: usize = 16;
/// Tallest board the bit-row representation supports.
pub const MAX_BOARD_HEIGHT: usize = 16;

/// Occupancy grid for the puzzle board.
///
/// Each row is stored as a `u16` bitmask where bit `c` is the cell in column
/// `c`, so collision checks and line detection are single mask operations.
/// The default board is 8×8; anything up to 16×16 is supported.
///
/// Dimensions are fixed for the lifetime of the board. Cells change only
/// through [`Board::place`] (which returns a new board) and
/// [`Board::clear_full_lines`]; there is no direct cell mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    rows: ArrayVec<u16, MAX_BOARD_HEIGHT>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(8, 8)
    }
}

impl Board {
    /// Creates an empty board with the given dimensions.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero or exceeds
    /// [`MAX_BOARD_WIDTH`]/[`MAX_BOARD_HEIGHT`].
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        assert!(
            (1..=MAX_BOARD_WIDTH).contains(&width) && (1..=MAX_BOARD_HEIGHT).contains(&height),
            "board dimensions must be within 1x1..={MAX_BOARD_WIDTH}x{MAX_BOARD_HEIGHT}, got {width}x{height}",
        );
        let mut rows = ArrayVec::new();
        for _ in 0..height {
            rows.push(0);
        }
        Self { width, rows }
    }

    /// Creates a board by evaluating `f(row, col)` for every cell.
    #[must_use]
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> bool,
    {
        let mut board = Self::new(width, height);
        for row in 0..height {
            for col in 0..width {
                if f(row, col) {
                    board.rows[row] |= 1 << col;
                }
            }
        }
        board
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Checks whether the cell at (`row`, `col`) is filled.
    ///
    /// # Panics
    ///
    /// Panics if (`row`, `col`) is outside the board.
    #[must_use]
    pub fn occupied(&self, row: usize, col: usize) -> bool {
        assert!(
            row < self.height() && col < self.width,
            "cell ({row}, {col}) outside {}x{} board",
            self.width,
            self.height(),
        );
        (self.rows[row] >> col) & 1 == 1
    }

    /// Returns the number of filled cells on the board.
    #[must_use]
    pub fn filled_cells(&self) -> usize {
        self.rows.iter().map(|row| row.count_ones() as usize).sum()
    }

    /// Checks whether the piece fits at `anchor` without overlap or overhang.
    #[must_use]
    pub fn can_place(&self, piece: &Piece, anchor: Anchor) -> bool {
        let (piece_height, piece_width) = piece.dimensions();
        anchor.row + piece_height <= self.height()
            && anchor.col + piece_width <= self.width
            && self.is_collision_free(piece, anchor)
    }

    /// Overlap check only; the caller guarantees the piece is within bounds.
    fn is_collision_free(&self, piece: &Piece, anchor: Anchor) -> bool {
        piece
            .row_masks()
            .iter()
            .zip(&self.rows[anchor.row..])
            .all(|(mask, row)| (mask << anchor.col) & row == 0)
    }

    /// Enumerates every anchor at which the piece can be placed, in row-major
    /// order. Cost is O(board area × piece area); boards and pieces are small
    /// enough that this never matters.
    pub fn valid_anchors<'a>(&'a self, piece: &'a Piece) -> impl Iterator<Item = Anchor> + 'a {
        let (piece_height, piece_width) = piece.dimensions();
        let anchor_rows = (self.height() + 1).saturating_sub(piece_height);
        let anchor_cols = (self.width + 1).saturating_sub(piece_width);
        (0..anchor_rows)
            .flat_map(move |row| (0..anchor_cols).map(move |col| Anchor { row, col }))
            .filter(move |anchor| self.is_collision_free(piece, *anchor))
    }

    /// Returns a new board with the piece's cells marked filled.
    pub fn place(&self, piece: &Piece, anchor: Anchor) -> Result<Self, InvalidPlacementError> {
        if !self.can_place(piece, anchor) {
            return Err(InvalidPlacementError { anchor });
        }
        let mut board = self.clone();
        for (mask, row) in piece.row_masks().iter().zip(&mut board.rows[anchor.row..]) {
            *row |= mask << anchor.col;
        }
        Ok(board)
    }

    /// Clears every full row and full column and returns how many were cleared.
    ///
    /// Full lines are detected from the board state before any of the clears
    /// are applied, so a row and a column that are simultaneously full both
    /// count even though their shared cell is emptied once. There is no
    /// cascading within a single step.
    pub fn clear_full_lines(&mut self) -> usize {
        let full_mask = self.full_row_mask();
        let full_cols = self.rows.iter().fold(full_mask, |acc, row| acc & row);
        let mut cleared = full_cols.count_ones() as usize;
        for row in &mut self.rows {
            if *row == full_mask {
                cleared += 1;
                *row = 0;
            } else {
                *row &= !full_cols;
            }
        }
        cleared
    }

    fn full_row_mask(&self) -> u16 {
        lower_bits(self.width)
    }
}

/// Renders the board as ASCII art: `'#'` filled, `'.'` empty, one line per row.
impl fmt::Display for Board {
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
pub enum ParseBoardError {
    #[display("board has no rows")]
    Empty,
    #[display("board exceeds {MAX_BOARD_WIDTH}x{MAX_BOARD_HEIGHT}")]
    TooLarge,
    #[display("row {row} has width {found}, expected {expected}")]
    WidthMismatch {
        row: usize,
        found: usize,
        expected: usize,
    },
    #[display("invalid cell character {ch:?}, expected '#' or '.'")]
    InvalidCell { ch: char },
}

/// Parses ASCII art in the [`fmt::Display`] format. Blank lines and
/// surrounding whitespace are ignored.
impl FromStr for Board {
    type Err = ParseBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cells = parse_cell_lines(s)?;
        let width = cells[0].len();
        if width > MAX_BOARD_WIDTH || cells.len() > MAX_BOARD_HEIGHT {
            return Err(ParseBoardError::TooLarge);
        }
        Ok(Self::from_fn(width, cells.len(), |row, col| {
            cells[row][col]
        }))
    }
}

/// Shared line parser for boards and pieces: returns one `Vec<bool>` per
/// non-blank line, rejecting ragged widths and unknown characters.
pub(crate) fn parse_cell_lines(s: &str) -> Result<Vec<Vec<bool>>, ParseBoardError> {
    let mut cells: Vec<Vec<bool>> = Vec::new();
    for line in s.lines().map(str::trim).filter(|line| !line.is_empty()) {
        let mut row = Vec::with_capacity(line.len());
        for ch in line.chars() {
            match ch {
                '#' => row.push(true),
                '.' => row.push(false),
                _ => return Err(ParseBoardError::InvalidCell { ch }),
            }
        }
        if let Some(first) = cells.first() {
            let expected = first.len();
            if row.len() != expected {
                return Err(ParseBoardError::WidthMismatch {
                    row: cells.len(),
                    found: row.len(),
                    expected,
                });
            }
        }
        cells.push(row);
    }
    if cells.is_empty() {
        return Err(ParseBoardError::Empty);
    }
    Ok(cells)
}

impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: "8x8:00ff,0001,..." (dimensions, then hex row masks)
        let mut s = String::with_capacity(8 + self.height() * 5);
        write!(&mut s, "{}x{}:", self.width, self.height()).unwrap();
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                s.push(',');
            }
            write!(&mut s, "{row:04x}").unwrap();
        }
        serializer.serialize_str(&s)
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let (width, rows) = parse_hex_grid::<D>(&s, MAX_BOARD_WIDTH, MAX_BOARD_HEIGHT)?;
        Ok(Self { width, rows })
    }
}

/// Parses the `"WxH:hex,hex,..."` serde format shared by boards and pieces.
pub(crate) fn parse_hex_grid<'de, D>(
    s: &str,
    max_width: usize,
    max_height: usize,
) -> Result<(usize, ArrayVec<u16, MAX_BOARD_HEIGHT>), D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    let (dims, masks) = s
        .split_once(':')
        .ok_or_else(|| D::Error::custom(format!("expected format 'WxH:hex,...', got '{s}'")))?;
    let (width_str, height_str) = dims
        .split_once('x')
        .ok_or_else(|| D::Error::custom(format!("invalid dimensions '{dims}'")))?;
    let width: usize = width_str
        .parse()
        .map_err(|e| D::Error::custom(format!("invalid width '{width_str}' ({e})")))?;
    let height: usize = height_str
        .parse()
        .map_err(|e| D::Error::custom(format!("invalid height '{height_str}' ({e})")))?;
    if !(1..=max_width).contains(&width) || !(1..=max_height).contains(&height) {
        return Err(D::Error::custom(format!(
            "dimensions {width}x{height} out of range 1x1..={max_width}x{max_height}"
        )));
    }

    let mut rows = ArrayVec::new();
    for part in masks.split(',') {
        let bits = u16::from_str_radix(part, 16)
            .map_err(|e| D::Error::custom(format!("invalid hex row '{part}' ({e})")))?;
        if bits & !lower_bits(width) != 0 {
            return Err(D::Error::custom(format!(
                "row '{part}' has bits outside width {width}"
            )));
        }
        if rows.len() == height {
            return Err(D::Error::custom(format!("more than {height} rows")));
        }
        rows.push(bits);
    }
    if rows.len() != height {
        return Err(D::Error::custom(format!(
            "expected {height} rows, got {}",
            rows.len()
        )));
    }
    Ok((width, rows))
}

pub(crate) fn lower_bits(width: usize) -> u16 {
    u16::try_from((1u32 << width) - 1).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(art: &str) -> Board {
        art.parse().unwrap()
    }

    fn piece(art: &str) -> Piece {
        art.parse().unwrap()
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::default();
        assert_eq!(board.width(), 8);
        assert_eq!(board.height(), 8);
        assert_eq!(board.filled_cells(), 0);
        for row in 0..8 {
            for col in 0..8 {
                assert!(!board.occupied(row, col));
            }
        }
    }

    #[test]
    fn test_parse_and_display_round_trip() {
        let art = "#.......\n\
                   .#......\n\
                   ........\n\
                   ........\n\
                   ........\n\
                   ........\n\
                   ........\n\
                   ......##";
        let board = board(art);
        assert!(board.occupied(0, 0));
        assert!(board.occupied(1, 1));
        assert!(board.occupied(7, 6));
        assert!(board.occupied(7, 7));
        assert_eq!(board.filled_cells(), 4);
        assert_eq!(board.to_string(), art);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!("".parse::<Board>(), Err(ParseBoardError::Empty));
        assert_eq!(
            "..\n...".parse::<Board>(),
            Err(ParseBoardError::WidthMismatch {
                row: 1,
                found: 3,
                expected: 2,
            }),
        );
        assert_eq!(
            ".x.".parse::<Board>(),
            Err(ParseBoardError::InvalidCell { ch: 'x' }),
        );
        let too_wide = ".".repeat(MAX_BOARD_WIDTH + 1);
        assert_eq!(too_wide.parse::<Board>(), Err(ParseBoardError::TooLarge));
    }

    #[test]
    #[should_panic(expected = "outside 8x8 board")]
    fn test_occupied_rejects_out_of_range_column() {
        // Columns between the board width and the mask width must not read as
        // empty cells.
        let _ = Board::default().occupied(0, 8);
    }

    #[test]
    #[should_panic(expected = "outside 8x8 board")]
    fn test_occupied_rejects_out_of_range_row() {
        let _ = Board::default().occupied(8, 0);
    }

    #[test]
    fn test_place_returns_independent_copy() {
        let original = Board::default();
        let placed = original
            .place(&piece("##\n##"), Anchor { row: 3, col: 4 })
            .unwrap();
        assert_eq!(original.filled_cells(), 0);
        assert_eq!(placed.filled_cells(), 4);
        assert!(placed.occupied(3, 4));
        assert!(placed.occupied(4, 5));
    }

    #[test]
    fn test_place_rejects_overlap_and_overhang() {
        let board = board(
            "
            ##......
            ........
            ........
            ........
            ........
            ........
            ........
            ........
            ",
        );
        let square = piece("##\n##");
        assert!(board.place(&square, Anchor { row: 0, col: 0 }).is_err());
        assert!(board.place(&square, Anchor { row: 0, col: 7 }).is_err());
        assert!(board.place(&square, Anchor { row: 7, col: 0 }).is_err());
        assert!(board.place(&square, Anchor { row: 0, col: 2 }).is_ok());
    }

    #[test]
    fn test_valid_anchors_full_board_for_unit_piece() {
        let board = Board::default();
        let unit = piece("#");
        let anchors: Vec<_> = board.valid_anchors(&unit).collect();
        assert_eq!(anchors.len(), 64);
        // Row-major order
        assert_eq!(anchors[0], Anchor { row: 0, col: 0 });
        assert_eq!(anchors[1], Anchor { row: 0, col: 1 });
        assert_eq!(anchors[8], Anchor { row: 1, col: 0 });
        assert_eq!(anchors[63], Anchor { row: 7, col: 7 });
    }

    #[test]
    fn test_valid_anchors_respect_occupancy_and_shape() {
        let board = board(
            "
            #..
            ...
            ..#
            ",
        );
        let bar = piece("##");
        let anchors: Vec<_> = board.valid_anchors(&bar).collect();
        assert_eq!(
            anchors,
            vec![
                Anchor { row: 0, col: 1 },
                Anchor { row: 1, col: 0 },
                Anchor { row: 1, col: 1 },
                Anchor { row: 2, col: 0 },
            ],
        );
    }

    #[test]
    fn test_valid_anchors_empty_for_oversized_piece() {
        let board = board("..\n..");
        let bar = piece("###");
        assert_eq!(board.valid_anchors(&bar).count(), 0);
    }

    #[test]
    fn test_all_valid_anchors_place_without_error() {
        let board = board(
            "
            #.#.#.#.
            ........
            ###.....
            ...#####
            ........
            .#.#.#.#
            ........
            #######.
            ",
        );
        for shape in ["#", "##", "#\n#", "##\n##", ".#\n##", "###"] {
            let piece = piece(shape);
            for anchor in board.valid_anchors(&piece) {
                assert!(board.place(&piece, anchor).is_ok(), "{shape} at {anchor}");
            }
        }
    }

    #[test]
    fn test_clear_full_lines_is_idempotent_when_nothing_full() {
        let mut board = board(
            "
            #######.
            #.......
            ........
            ........
            ........
            ........
            ........
            ........
            ",
        );
        let before = board.clone();
        assert_eq!(board.clear_full_lines(), 0);
        assert_eq!(board, before);
    }

    #[test]
    fn test_clear_completed_row() {
        let mut board = board(
            "
            #######.
            ........
            ........
            ........
            ........
            ........
            ........
            ........
            ",
        );
        board = board.place(&piece("#"), Anchor { row: 0, col: 7 }).unwrap();
        assert_eq!(board.clear_full_lines(), 1);
        for col in 0..8 {
            assert!(!board.occupied(0, col));
        }
        assert_eq!(board.filled_cells(), 0);
    }

    #[test]
    fn test_clear_full_column() {
        let mut board = Board::from_fn(8, 8, |_, col| col == 3);
        assert_eq!(board.clear_full_lines(), 1);
        assert_eq!(board.filled_cells(), 0);
    }

    #[test]
    fn test_simultaneous_row_and_column_clear() {
        // Row 0 and column 0 are both full; the shared corner cell is cleared
        // once but both lines count.
        let mut board = Board::from_fn(8, 8, |row, col| row == 0 || col == 0);
        assert_eq!(board.filled_cells(), 15);
        assert_eq!(board.clear_full_lines(), 2);
        assert_eq!(board.filled_cells(), 0);
    }

    #[test]
    fn test_clear_detection_uses_pre_clear_state() {
        // Column 0 is full, column 1 has a gap at row 3. Clearing column 0
        // must not cascade into re-evaluating column 1 within the same step.
        let mut board = Board::from_fn(8, 8, |row, col| col == 0 || (col == 1 && row != 3));
        assert_eq!(board.clear_full_lines(), 1);
        assert_eq!(board.filled_cells(), 7);
    }

    #[test]
    fn test_serde_round_trip() {
        let board = board(
            "
            ##......
            ........
            ...#....
            ........
            ........
            ........
            ........
            .......#
            ",
        );
        let json = serde_json::to_string(&board).unwrap();
        assert!(json.starts_with("\"8x8:"));
        let back: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(back, board);
    }

    #[test]
    fn test_serde_rejects_malformed_input() {
        for bad in [
            "\"8x8\"",
            "\"0x8:\"",
            "\"2x1:ffff\"",
            "\"8x2:0001\"",
            "\"8x1:zz\"",
        ] {
            assert!(serde_json::from_str::<Board>(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn test_non_square_board() {
        let board = board("...\n...\n...\n...");
        assert_eq!(board.width(), 3);
        assert_eq!(board.height(), 4);
        let anchors: Vec<_> = board.valid_anchors(&piece("##\n##")).collect();
        assert_eq!(anchors.len(), 6);
    }
}
