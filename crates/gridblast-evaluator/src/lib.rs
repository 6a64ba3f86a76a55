//! Placement search and scoring for gridblast.
//!
//! This crate turns a board state and a batch of pieces into the best combined
//! placement. It is organized in three layers:
//!
//! 1. **Outcome scoring** ([`outcome_evaluator`]) - assigns a scalar score to a
//!    terminal board state using the tunable [`weights::ScoreWeights`] and the
//!    lazy [`board_metrics::BoardMetrics`] (fullness, holes, fragmentation).
//!
//! 2. **Combined-placement search** ([`solver`]) - enumerates every way to place
//!    the batch in sequence, simulating row/column clears between placements,
//!    over branch-local board copies.
//!
//! 3. **Best-move selection** ([`solver::Solver::solve`]) - scores each terminal
//!    [`outcome::Outcome`] as it is emitted and keeps the maximum, breaking ties
//!    by first-seen order for determinism.
//!
//! The search is a pure function of (board, pieces, combo streak): no state is
//! shared between branches and repeated runs return the identical best move.
//! An empty outcome set - no ordering of the batch fits at all - is reported as
//! `None`, distinct from any numeric score.

pub mod board_metrics;
pub mod outcome;
pub mod outcome_evaluator;
pub mod solver;
pub mod weights;
