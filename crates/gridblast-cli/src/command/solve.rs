use std::{
    fs,
    io::{self, Read as _},
    path::{Path, PathBuf},
};

use anyhow::{Context as _, ensure};
use gridblast_engine::{Board, Placement};
use gridblast_evaluator::{
    outcome::MAX_PIECES,
    outcome_evaluator::WeightedOutcomeEvaluator,
    solver::{BestMove, SearchLimits, Solver},
    weights::ScoreWeights,
};
use serde::Serialize;

use crate::{puzzle::Puzzle, util};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SolveArg {
    /// Puzzle file: board and pieces as ASCII art blocks ('-' for stdin)
    puzzle: PathBuf,
    /// Scoring weights JSON file (defaults to the built-in tuning)
    #[arg(long)]
    weights: Option<PathBuf>,
    /// Consecutive clearing moves already in progress
    #[arg(long, default_value_t = 0)]
    combo_streak: u32,
    /// Cap on the number of terminal branches scored
    #[arg(long)]
    max_branches: Option<usize>,
    /// Explore every piece ordering instead of input order only
    #[arg(long)]
    permute: bool,
    /// Emit the best outcome as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct SolveReport<'a> {
    score: f32,
    cleared_lines: usize,
    placements: &'a [Placement],
    board: &'a Board,
}

pub(crate) fn run(arg: &SolveArg) -> anyhow::Result<()> {
    let input = read_puzzle_text(&arg.puzzle)?;
    let puzzle: Puzzle = input
        .parse()
        .with_context(|| format!("Failed to parse puzzle: {}", arg.puzzle.display()))?;
    ensure!(
        puzzle.pieces.len() <= MAX_PIECES,
        "a puzzle may list at most {MAX_PIECES} pieces, got {}",
        puzzle.pieces.len(),
    );

    let weights = match &arg.weights {
        Some(path) => util::read_json_file("weights", path)?,
        None => ScoreWeights::default(),
    };
    let limits = SearchLimits {
        max_branches: arg.max_branches,
        permute_piece_order: arg.permute,
    };
    let solver = Solver::with_limits(Box::new(WeightedOutcomeEvaluator::new(weights)), limits);

    let Some(best) = solver.solve(&puzzle.board, &puzzle.pieces, arg.combo_streak) else {
        println!("no valid combined placement found");
        return Ok(());
    };

    if arg.json {
        let report = SolveReport {
            score: best.score(),
            cleared_lines: best.outcome().cleared_lines(),
            placements: best.outcome().placements(),
            board: best.outcome().board(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_text_report(&puzzle, &best);
    }
    Ok(())
}

fn read_puzzle_text(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read puzzle from stdin")?;
        Ok(buf)
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read puzzle file: {}", path.display()))
    }
}

/// Overlays the chosen placements as letters on the pre-placement board, in
/// the order the pieces were listed, then spells out the anchors to use.
fn print_text_report(puzzle: &Puzzle, best: &BestMove) {
    let board = &puzzle.board;
    let mut grid: Vec<Vec<char>> = (0..board.height())
        .map(|row| {
            (0..board.width())
                .map(|col| if board.occupied(row, col) { '#' } else { '.' })
                .collect()
        })
        .collect();
    for placement in best.outcome().placements() {
        let letter = piece_letter(placement.piece);
        for (dr, dc) in puzzle.pieces[placement.piece].cells() {
            grid[placement.anchor.row + dr][placement.anchor.col + dc] = letter;
        }
    }

    println!("Best placement:");
    for row in &grid {
        println!("{}", row.iter().collect::<String>());
    }
    println!();
    println!("Instructions:");
    for placement in best.outcome().placements() {
        println!(
            "  place piece {} at {}",
            piece_letter(placement.piece),
            placement.anchor,
        );
    }
    println!();
    println!("Lines cleared: {}", best.outcome().cleared_lines());
    println!("Score: {:.2}", best.score());
}

fn piece_letter(index: usize) -> char {
    // The batch is capped at MAX_PIECES, so this never leaves the alphabet.
    char::from(b'A' + u8::try_from(index).unwrap_or(25))
}
