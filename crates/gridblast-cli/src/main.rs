mod command;
mod puzzle;
mod util;

fn main() -> anyhow::Result<()> {
    command::run()
}
