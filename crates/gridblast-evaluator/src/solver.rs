//! Combined-placement search: enumerate, simulate, keep the best.
//!
//! Given a board and a batch of up to [`MAX_PIECES`] pieces, the solver walks
//! every branch of the placement tree: pick the next piece, try each valid
//! anchor, apply the placement, clear full lines, recurse. The walk uses an
//! explicit frame stack instead of recursion, and each frame owns its own
//! board copy, so sibling branches never observe each other's mutations.
//!
//! Branches where the next piece has no valid anchor are pruned silently;
//! that is normal, not an error. Terminal branches are scored as they are
//! emitted and only the best one is retained.
//!
//! Worst-case cost is O(A₁ · A₂ · … · Aₖ) where Aᵢ is the anchor count at
//! step i - exponential in the batch size, acceptable because k ≤ 4 and
//! boards are small. [`SearchLimits::max_branches`] caps the number of
//! terminal outcomes scored as a safety valve for pathological inputs.
//!
//! Pieces are placed in input order by default. Different orders can reach
//! different boards when a clear in between frees cells, so
//! [`SearchLimits::permute_piece_order`] opts into exploring every ordering.

use arrayvec::ArrayVec;
use gridblast_engine::{Board, Piece, Placement};

use crate::{
    outcome::{MAX_PIECES, Outcome, OutcomeAnalysis},
    outcome_evaluator::OutcomeEvaluator,
};

/// Caller-supplied bounds on the search.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchLimits {
    /// Stop after scoring this many terminal outcomes, returning the best seen
    /// so far. `None` means unbounded.
    pub max_branches: Option<usize>,
    /// Explore every ordering of the piece batch instead of input order only.
    pub permute_piece_order: bool,
}

/// The winning outcome and its score.
#[derive(Debug, Clone, PartialEq)]
pub struct BestMove {
    score: f32,
    outcome: Outcome,
}

impl BestMove {
    #[must_use]
    pub fn score(&self) -> f32 {
        self.score
    }

    #[must_use]
    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    #[must_use]
    pub fn into_outcome(self) -> Outcome {
        self.outcome
    }
}

/// One node of the search: a branch-local board plus the path that reached it.
#[derive(Debug)]
struct Frame {
    board: Board,
    placements: ArrayVec<Placement, MAX_PIECES>,
    cleared_lines: usize,
}

/// Best-move search over combined placements.
#[derive(Debug)]
pub struct Solver {
    evaluator: Box<dyn OutcomeEvaluator>,
    limits: SearchLimits,
}

impl Solver {
    #[must_use]
    pub fn new(evaluator: Box<dyn OutcomeEvaluator>) -> Self {
        Self::with_limits(evaluator, SearchLimits::default())
    }

    #[must_use]
    pub fn with_limits(evaluator: Box<dyn OutcomeEvaluator>, limits: SearchLimits) -> Self {
        Self { evaluator, limits }
    }

    /// Finds the highest-scoring way to place the whole batch.
    ///
    /// Returns `None` when no ordering of the batch can be fully placed - the
    /// distinguished "no solution" result, which callers must not conflate
    /// with a zero score. Ties are broken by first-seen order, so repeated
    /// runs on identical inputs return the identical best move.
    ///
    /// # Panics
    ///
    /// Panics if the batch holds more than [`MAX_PIECES`] pieces, or on an
    /// internal invariant breach (a validated anchor rejected by the board).
    #[must_use]
    pub fn solve(&self, board: &Board, pieces: &[Piece], combo_streak: u32) -> Option<BestMove> {
        assert!(
            pieces.len() <= MAX_PIECES,
            "piece batch of {} exceeds the maximum of {MAX_PIECES}",
            pieces.len(),
        );

        let mut stack = vec![Frame {
            board: board.clone(),
            placements: ArrayVec::new(),
            cleared_lines: 0,
        }];
        let mut best: Option<BestMove> = None;
        let mut terminal_branches = 0_usize;

        while let Some(frame) = stack.pop() {
            if frame.placements.len() == pieces.len() {
                if self
                    .limits
                    .max_branches
                    .is_some_and(|max| terminal_branches >= max)
                {
                    break;
                }
                terminal_branches += 1;
                let outcome = Outcome::new(frame.board, frame.placements, frame.cleared_lines);
                let analysis = OutcomeAnalysis::from_outcome(&outcome, combo_streak);
                let score = self.evaluator.evaluate_outcome(&analysis);
                if best.as_ref().is_none_or(|b| score > b.score) {
                    best = Some(BestMove { score, outcome });
                }
                continue;
            }

            // Children are pushed in reverse so the stack pops them in
            // enumeration order (next piece, then row-major anchors), keeping
            // the first-seen tie-break meaningful.
            let mut children = Vec::new();
            for piece_index in next_piece_candidates(&frame, pieces.len(), &self.limits) {
                let piece = &pieces[piece_index];
                for anchor in frame.board.valid_anchors(piece) {
                    let mut board = match frame.board.place(piece, anchor) {
                        Ok(board) => board,
                        Err(err) => panic!("search placed piece at validated anchor: {err}"),
                    };
                    let cleared = board.clear_full_lines();
                    let mut placements = frame.placements.clone();
                    placements.push(Placement {
                        piece: piece_index,
                        anchor,
                    });
                    children.push(Frame {
                        board,
                        placements,
                        cleared_lines: frame.cleared_lines + cleared,
                    });
                }
            }
            stack.extend(children.into_iter().rev());
        }

        best
    }
}

fn next_piece_candidates(
    frame: &Frame,
    piece_count: usize,
    limits: &SearchLimits,
) -> ArrayVec<usize, MAX_PIECES> {
    let mut candidates = ArrayVec::new();
    if limits.permute_piece_order {
        for index in 0..piece_count {
            if !frame.placements.iter().any(|p| p.piece == index) {
                candidates.push(index);
            }
        }
    } else {
        candidates.push(frame.placements.len());
    }
    candidates
}
