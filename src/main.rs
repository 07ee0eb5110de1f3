use clap::Parser;
use lcz_analyzer::cli::{run, Cli};
use lcz_analyzer::error::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}
