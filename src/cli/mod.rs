pub mod check;
pub mod completions;
pub mod generate;
pub mod init;
pub mod rename;

use std::path::Path;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::Result;

/// resimg - Responsive image snippet generator
#[derive(Parser, Debug)]
#[command(name = "resimg")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate <picture> snippets from layer documents
    Generate(generate::GenerateArgs),

    /// Scan layer documents and report what was found
    Check(check::CheckArgs),

    /// Print (and optionally apply) canonical layer names
    Rename(rename::RenameArgs),

    /// Write a default resimg.yaml
    Init(init::InitArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Load the config named by `--config`, or resimg.yaml from the working
/// directory when present.
pub(crate) fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None => Ok(Config::discover(Path::new("."))?.0),
    }
}
