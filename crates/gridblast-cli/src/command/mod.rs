use clap::{Parser, Subcommand};

use self::{generate_board::GenerateBoardArg, solve::SolveArg};

mod generate_board;
mod solve;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Find the best combined placement for a puzzle
    Solve(#[clap(flatten)] SolveArg),
    /// Generate a random board fixture
    GenerateBoard(#[clap(flatten)] GenerateBoardArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.command {
        Command::Solve(arg) => solve::run(&arg)?,
        Command::GenerateBoard(arg) => generate_board::run(&arg)?,
    }
    Ok(())
}
