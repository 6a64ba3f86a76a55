//! Textual puzzle input: a board followed by the piece batch.
//!
//! The format is ASCII art blocks separated by blank lines. The first block is
//! the board, each following block one piece:
//!
//! ```text
//! #######.
//! ........
//! (six more board rows)
//!
//! ##
//! ##
//!
//! #
//! ```

use std::str::FromStr;

use gridblast_engine::{Board, ParseBoardError, ParsePieceError, Piece};

#[derive(Debug, Clone, PartialEq)]
pub struct Puzzle {
    pub board: Board,
    pub pieces: Vec<Piece>,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ParsePuzzleError {
    #[display("puzzle has no board section")]
    MissingBoard,
    #[display("puzzle lists no pieces after the board")]
    NoPieces,
    #[display("invalid board: {_0}")]
    Board(ParseBoardError),
    #[display("invalid piece {index}: {source}")]
    Piece {
        index: usize,
        source: ParsePieceError,
    },
}

impl FromStr for Puzzle {
    type Err = ParsePuzzleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut blocks: Vec<String> = Vec::new();
        let mut current = String::new();
        for line in s.lines() {
            if line.trim().is_empty() {
                if !current.is_empty() {
                    blocks.push(std::mem::take(&mut current));
                }
            } else {
                current.push_str(line);
                current.push('\n');
            }
        }
        if !current.is_empty() {
            blocks.push(current);
        }

        let mut blocks = blocks.into_iter();
        let board = blocks
            .next()
            .ok_or(ParsePuzzleError::MissingBoard)?
            .parse()
            .map_err(ParsePuzzleError::Board)?;
        let pieces = blocks
            .enumerate()
            .map(|(index, block)| {
                block
                    .parse()
                    .map_err(|source| ParsePuzzleError::Piece { index, source })
            })
            .collect::<Result<Vec<Piece>, _>>()?;
        if pieces.is_empty() {
            return Err(ParsePuzzleError::NoPieces);
        }
        Ok(Self { board, pieces })
    }
}
