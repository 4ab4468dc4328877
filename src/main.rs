use clap::Parser;
use miette::Result;
use resimg::cli::{Cli, Commands};
use resimg::output::Printer;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let printer = Printer::new();

    match cli.command {
        Commands::Generate(args) => resimg::cli::generate::run(args, &printer)?,
        Commands::Check(args) => resimg::cli::check::run(args, &printer)?,
        Commands::Rename(args) => resimg::cli::rename::run(args, &printer)?,
        Commands::Init(args) => resimg::cli::init::run(args, &printer)?,
        Commands::Completions(args) => resimg::cli::completions::run(args)?,
    }

    Ok(())
}
