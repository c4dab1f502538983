mod cli;
mod run;

use anyhow::Result;
use cli::Command;

fn main() -> Result<()> {
    let cli = cli::parse();
    run::initialise_tracing();

    match cli.command {
        Some(Command::Params) => run::print_parameters(),
        Some(Command::Validate) => run::validate(&cli.run),
        None => run::run(&cli.run),
    }
}
