use std::{io::Write as _, path::PathBuf};

use anyhow::ensure;
use gridblast_engine::{Board, MAX_BOARD_HEIGHT, MAX_BOARD_WIDTH};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;

use crate::util::Output;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct GenerateBoardArg {
    /// Board width in columns
    #[arg(long, default_value_t = 8)]
    width: usize,
    /// Board height in rows
    #[arg(long, default_value_t = 8)]
    height: usize,
    /// Probability that each cell starts occupied
    #[arg(long, default_value_t = 0.3)]
    fill: f64,
    /// RNG seed (random when omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &GenerateBoardArg) -> anyhow::Result<()> {
    ensure!(
        (1..=MAX_BOARD_WIDTH).contains(&arg.width),
        "board width must be between 1 and {MAX_BOARD_WIDTH}, got {}",
        arg.width,
    );
    ensure!(
        (1..=MAX_BOARD_HEIGHT).contains(&arg.height),
        "board height must be between 1 and {MAX_BOARD_HEIGHT}, got {}",
        arg.height,
    );
    ensure!(
        (0.0..=1.0).contains(&arg.fill),
        "fill probability must be between 0.0 and 1.0, got {}",
        arg.fill,
    );

    let seed = arg.seed.unwrap_or_else(|| rand::rng().random());
    let mut rng = Pcg32::seed_from_u64(seed);
    let board = Board::from_fn(arg.width, arg.height, |_, _| rng.random_bool(arg.fill));

    let mut output = Output::from_output_path(arg.output.clone())?;
    writeln!(output, "{board}")?;
    eprintln!("Board written to {} (seed {seed})", output.display_path());
    Ok(())
}
