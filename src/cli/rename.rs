//! Rename command implementation.
//!
//! Prints `old -> new` for every layer whose name would change, and with
//! `--write` saves the renamed document.

use std::path::PathBuf;

use clap::Args;

use crate::document::{discover_documents, LayerDocument};
use crate::error::{ResimgError, Result};
use crate::output::{display_path, plural, Printer};

/// Print (and optionally apply) canonical layer names
#[derive(Args, Debug, Default)]
pub struct RenameArgs {
    /// Layer documents, or directories containing them
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Config file (default: ./resimg.yaml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Canonicalize tokens (breakpoints, densities, extensions)
    #[arg(long)]
    pub compress: bool,

    /// Use this name for every asset instead of its own
    #[arg(long)]
    pub base_name: Option<String>,

    /// Save the renamed layers back into each document
    #[arg(long)]
    pub write: bool,
}

pub fn run(args: RenameArgs, printer: &Printer) -> Result<()> {
    let mut config = super::load_config(args.config.as_deref())?;
    config.compress |= args.compress;
    if let Some(base_name) = &args.base_name {
        config.base_name = Some(base_name.clone());
    }
    let options = config.rename_options();

    let documents = discover_documents(&args.inputs);
    if documents.is_empty() {
        return Err(ResimgError::Input {
            message: "No layer documents found".to_string(),
            help: Some("Pass a .layers.yaml or .layers.txt file, or a directory containing them".to_string()),
        });
    }

    for path in &documents {
        let display = display_path(path);
        let (mut document, format) = LayerDocument::load(path)?;
        let renamed = document.rename_layers(&options);

        if renamed.is_empty() {
            printer.info("Unchanged", &display);
            continue;
        }

        for (old, new) in &renamed {
            println!("{} -> {}", old, new);
        }

        if args.write {
            document.save(path, format)?;
            printer.status(
                "Renamed",
                &format!("{} in {}", plural(renamed.len(), "layer", "layers"), display),
            );
        } else {
            printer.info(
                "Would rename",
                &format!("{} in {}", plural(renamed.len(), "layer", "layers"), display),
            );
        }
    }

    Ok(())
}
