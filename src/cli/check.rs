//! Check command implementation.
//!
//! Scans layer documents without generating anything and reports the
//! breakpoint buckets and any problems found.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::diagnostic::print_diagnostics;
use crate::document::{discover_documents, LayerDocument};
use crate::error::{ResimgError, Result};
use crate::output::{display_path, plural, Printer};
use crate::scan::{scan_layers, ScanOptions, ScanResult};

/// Scan layer documents and report what was found
#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    /// Layer documents, or directories containing them
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Config file (default: ./resimg.yaml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Canonicalize declarations while scanning
    #[arg(long)]
    pub compress: bool,

    /// Print the scan as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

/// One scanned document.
#[derive(Debug, Serialize)]
pub struct DocumentReport {
    pub path: PathBuf,
    pub document: String,
    #[serde(flatten)]
    pub scan: ScanResult,
}

pub fn run(args: CheckArgs, printer: &Printer) -> Result<()> {
    let mut config = super::load_config(args.config.as_deref())?;
    config.compress |= args.compress;

    let reports = scan_documents(&args.inputs, &config.scan_options())?;

    if args.json {
        let json = serde_json::to_string_pretty(&reports).map_err(|e| ResimgError::Input {
            message: format!("Failed to serialize scan: {}", e),
            help: None,
        })?;
        println!("{}", json);
        return Ok(());
    }

    for report in &reports {
        print_report(report, printer);
    }

    let warnings: usize = reports.iter().map(|r| r.scan.diagnostics.len()).sum();
    let declarations: usize = reports.iter().map(|r| r.scan.declarations.len()).sum();
    printer.status(
        "Checked",
        &format!(
            "{}, {} ({})",
            plural(reports.len(), "document", "documents"),
            plural(declarations, "declaration", "declarations"),
            plural(warnings, "warning", "warnings")
        ),
    );

    Ok(())
}

/// Load and scan every input document.
pub fn scan_documents(inputs: &[PathBuf], options: &ScanOptions) -> Result<Vec<DocumentReport>> {
    let documents = discover_documents(inputs);
    if documents.is_empty() {
        return Err(ResimgError::Input {
            message: "No layer documents found".to_string(),
            help: Some("Pass a .layers.yaml or .layers.txt file, or a directory containing them".to_string()),
        });
    }

    documents
        .into_iter()
        .map(|path| -> Result<DocumentReport> {
            let (document, _) = LayerDocument::load(&path)?;
            let scan = scan_layers(&document, options);
            Ok(DocumentReport {
                path,
                document: document.name,
                scan,
            })
        })
        .collect()
}

fn print_report(report: &DocumentReport, printer: &Printer) {
    let display = display_path(&report.path);

    if report.scan.is_empty() {
        printer.warning("Empty", &format!("{} (no asset declarations)", display));
    } else {
        printer.info("Checking", &printer.cyan(&display));
        for (breakpoint, assets) in report.scan.assets.iter() {
            let files: Vec<String> = assets
                .iter()
                .map(|a| {
                    format!(
                        "{} {}",
                        a.declaration.file_name,
                        printer.dim(&format!("{}x", a.density))
                    )
                })
                .collect();
            printer.info(breakpoint.code(), &files.join(", "));
        }
    }

    print_diagnostics(&report.scan.diagnostics);
}
