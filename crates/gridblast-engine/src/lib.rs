//! Core data model for the gridblast placement engine.
//!
//! This crate provides the puzzle primitives shared by the solver and the CLI:
//!
//! - [`Board`] - N×M occupancy grid with bit-row storage, placement and
//!   simultaneous row/column clearing
//! - [`Piece`] - immutable piece shape as a boolean occupancy matrix
//! - [`Anchor`] / [`Placement`] - where a piece's top-left cell lands on the board
//!
//! Boards are value types: placing a piece returns a fresh board, so every search
//! branch owns its own copy and siblings never observe each other's mutations.

pub use self::{board::*, piece::*, placement::*};

pub mod board;
pub mod piece;
pub mod placement;

/// A piece was placed over an occupied cell or beyond the board edge.
///
/// The placement search only commits anchors it has already validated, so
/// observing this error from inside the search indicates a bug in the
/// validator/enumerator pairing, not a recoverable condition.
#[derive(Debug, Clone, Copy, derive_more::Display, derive_more::Error)]
#[display("piece cannot be placed at {anchor}: cell occupied or out of bounds")]
pub struct InvalidPlacementError {
    pub anchor: Anchor,
}
