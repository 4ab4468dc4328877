//! Generate command implementation.
//!
//! Scans each layer document, writes its snippet to
//! `{output}/{doc}-assets/{file_name}.html`, and optionally writes the
//! canonical layer names back into the document.

use std::fs;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use clap::Args;
use notify::{RecursiveMode, Watcher};

use crate::config::Config;
use crate::diagnostic::print_diagnostics;
use crate::document::{discover_documents, is_layer_document, LayerDocument};
use crate::error::{ResimgError, Result};
use crate::host::WriteSink;
use crate::markup::{self, Element, GenerateOptions};
use crate::output::{display_path, plural, Printer};
use crate::scan::scan_layers;

/// Generate <picture> snippets from layer documents
#[derive(Args, Debug, Clone, Default)]
pub struct GenerateArgs {
    /// Layer documents, or directories containing *.layers.yaml / *.layers.txt
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Config file (default: ./resimg.yaml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Root directory for `{doc}-assets/` (default: next to each document)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Snippet file name, without `.html`
    #[arg(long)]
    pub name: Option<String>,

    /// Directory prefix for asset URLs
    #[arg(long)]
    pub src_dir: Option<String>,

    /// Alt text for the <img>
    #[arg(long)]
    pub alt: Option<String>,

    /// Use this name for every asset instead of its own
    #[arg(long)]
    pub base_name: Option<String>,

    /// Canonicalize declarations before generating
    #[arg(long)]
    pub compress: bool,

    /// Write canonical layer names back into the document
    #[arg(long)]
    pub rename: bool,

    /// Override a breakpoint's max width, e.g. `l=1280` (repeatable)
    #[arg(long = "max-width", value_name = "BREAKPOINT=WIDTH")]
    pub max_widths: Vec<String>,

    /// Print snippets to stdout instead of writing files
    #[arg(long)]
    pub stdout: bool,

    /// Regenerate whenever an input changes
    #[arg(long)]
    pub watch: bool,
}

pub fn run(args: GenerateArgs, printer: &Printer) -> Result<()> {
    let config = resolve_config(&args)?;

    let result = generate_all(&args, &config, printer);
    if !args.watch {
        return result.map(|_| ());
    }
    if let Err(e) = result {
        printer.error("Error", &e.to_string());
    }

    watch(&args, &config, printer)
}

/// Loaded config with command-line flags applied on top.
fn resolve_config(args: &GenerateArgs) -> Result<Config> {
    let mut config = super::load_config(args.config.as_deref())?;

    if let Some(name) = &args.name {
        config.file_name = name.clone();
    }
    if let Some(src_dir) = &args.src_dir {
        config.src_dir = src_dir.clone();
    }
    if let Some(alt) = &args.alt {
        config.alt_text = Some(alt.clone());
    }
    if let Some(base_name) = &args.base_name {
        config.base_name = Some(base_name.clone());
    }
    if let Some(output) = &args.output {
        config.output = Some(output.clone());
    }
    config.compress |= args.compress;
    config.rename |= args.rename;
    for assignment in &args.max_widths {
        config.set_max_width(assignment)?;
    }

    Ok(config)
}

/// Generate every input document. Returns how many snippets were produced.
fn generate_all(args: &GenerateArgs, config: &Config, printer: &Printer) -> Result<usize> {
    let documents = discover_documents(&args.inputs);
    if documents.is_empty() {
        return Err(ResimgError::Input {
            message: "No layer documents found".to_string(),
            help: Some("Pass a .layers.yaml or .layers.txt file, or a directory containing them".to_string()),
        });
    }

    let (options, diagnostics) = config.generate_options();
    print_diagnostics(&diagnostics);

    let mut generated = 0;
    for path in &documents {
        if generate_document(path, config, &options, args.stdout, printer)? {
            generated += 1;
        }
    }

    if generated == 0 {
        return Err(ResimgError::EmptyAssetSet);
    }

    if documents.len() > 1 {
        printer.status(
            "Finished",
            &format!(
                "{} from {}",
                plural(generated, "snippet", "snippets"),
                plural(documents.len(), "document", "documents")
            ),
        );
    }

    Ok(generated)
}

/// Returns `false` when the document has no declarations and was skipped.
fn generate_document(
    path: &Path,
    config: &Config,
    options: &GenerateOptions,
    to_stdout: bool,
    printer: &Printer,
) -> Result<bool> {
    let display = display_path(path);
    let (mut document, format) = LayerDocument::load(path)?;

    let scan = scan_layers(&document, &config.scan_options());
    print_diagnostics(&scan.diagnostics);

    if scan.is_empty() {
        printer.warning("Skipping", &format!("{} (no asset declarations)", display));
        return Ok(false);
    }

    printer.info(
        "Scanned",
        &format!(
            "{} ({} in {})",
            display,
            plural(scan.declarations.len(), "declaration", "declarations"),
            plural(scan.assets.sorted_breakpoints().len(), "breakpoint", "breakpoints")
        ),
    );

    let snippet = markup::build(&scan.assets, options)?;

    if to_stdout {
        let mut sink = WriteSink::new(io::stdout().lock());
        snippet.render(0, &mut sink)?;
        sink.into_inner()?;
    } else {
        let root = match &config.output {
            Some(output) => output.clone(),
            None => path.parent().map(Path::to_path_buf).unwrap_or_default(),
        };
        let target = document.asset_path(&root, &config.file_name);
        write_snippet(&target, &snippet)?;
        printer.status("Generated", &printer.cyan(&display_path(&target)));
    }

    if config.rename {
        let renamed = document.rename_layers(&config.rename_options());
        if !renamed.is_empty() {
            document.save(path, format)?;
            printer.status(
                "Renamed",
                &format!("{} in {}", plural(renamed.len(), "layer", "layers"), display),
            );
        }
    }

    Ok(true)
}

/// Write a snippet file, replacing any existing one.
fn write_snippet(target: &Path, snippet: &Element) -> Result<()> {
    let io_error = |e: io::Error| ResimgError::Io {
        path: target.to_path_buf(),
        message: format!("Failed to write snippet: {}", e),
    };

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    if target.exists() {
        fs::remove_file(target).map_err(io_error)?;
    }

    let file = fs::File::create(target).map_err(io_error)?;
    let mut sink = WriteSink::new(BufWriter::new(file));
    snippet.render(0, &mut sink).map_err(io_error)?;
    sink.into_inner().map_err(io_error)?;
    Ok(())
}

fn watch(args: &GenerateArgs, config: &Config, printer: &Printer) -> Result<()> {
    let watch_error = |e: notify::Error| ResimgError::Input {
        message: format!("Failed to watch inputs: {}", e),
        help: None,
    };

    let (tx, rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(tx).map_err(watch_error)?;
    for input in &args.inputs {
        watcher
            .watch(input, RecursiveMode::Recursive)
            .map_err(watch_error)?;
    }

    // Explicit file inputs need not follow the *.layers.* naming.
    let explicit: Vec<PathBuf> = args
        .inputs
        .iter()
        .filter(|p| p.is_file())
        .filter_map(|p| p.canonicalize().ok())
        .collect();

    printer.info(
        "Watching",
        &format!("{} for changes", plural(args.inputs.len(), "input", "inputs")),
    );

    for event in rx {
        match event {
            Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                let Some(changed) = event
                    .paths
                    .iter()
                    .find(|p| is_layer_document(p) || explicit.contains(*p))
                else {
                    continue;
                };
                printer.info("Changed", &display_path(changed));
                if let Err(e) = generate_all(args, config, printer) {
                    printer.error("Error", &e.to_string());
                }
            }
            Ok(_) => {}
            Err(e) => printer.warning("Watch", &e.to_string()),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    const POSTER: &str = "\
name: poster.psd
layers:
  - name: hero-s.png
  - name: Desktop
    layers:
      - name: hero-l.png
";

    fn args_for(dir: &Path, input: PathBuf) -> GenerateArgs {
        let config = dir.join("resimg.yaml");
        if !config.exists() {
            fs::write(&config, "").unwrap();
        }
        GenerateArgs {
            inputs: vec![input],
            config: Some(config),
            ..GenerateArgs::default()
        }
    }

    #[test]
    fn test_generate_writes_snippet_next_to_document() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("poster.layers.yaml");
        fs::write(&input, POSTER).unwrap();

        run(args_for(dir.path(), input), &Printer::plain()).unwrap();

        let snippet = fs::read_to_string(
            dir.path().join("poster-assets/responsive-image-snippet.html"),
        )
        .unwrap();
        assert_eq!(
            snippet,
            "\
<picture>
  <source
    media=\"(min-width: 30.0625em)\"
    srcset=\"
      /images/hero-l.png 1x
    \"
  />
  <img
    src=\"/images/hero-s.png\"
  />
</picture>
"
        );
    }

    #[test]
    fn test_flags_override_config() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("poster.layers.yaml");
        fs::write(&input, POSTER).unwrap();
        fs::write(dir.path().join("resimg.yaml"), "src_dir: /static\n").unwrap();

        let out = dir.path().join("dist");
        let args = GenerateArgs {
            name: Some("hero".to_string()),
            alt: Some("Hero".to_string()),
            output: Some(out.clone()),
            max_widths: vec!["small=800".to_string()],
            ..args_for(dir.path(), input)
        };
        run(args, &Printer::plain()).unwrap();

        let snippet = fs::read_to_string(out.join("poster-assets/hero.html")).unwrap();
        assert!(snippet.contains("(min-width: 50.0625em)"));
        assert!(snippet.contains("alt=\"Hero\""));
        assert!(snippet.contains("src=\"/static/hero-s.png\""));
    }

    #[test]
    fn test_empty_document_is_an_error() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("plain.layers.txt");
        fs::write(&input, "Background\nLayer 1\n").unwrap();

        let err = run(args_for(dir.path(), input), &Printer::plain()).unwrap_err();
        assert!(matches!(err, ResimgError::EmptyAssetSet));
        assert!(!dir.path().join("plain-assets").exists());
    }

    #[test]
    fn test_existing_snippet_is_replaced() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("poster.layers.yaml");
        fs::write(&input, POSTER).unwrap();
        let target = dir.path().join("poster-assets/responsive-image-snippet.html");
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        fs::write(&target, "stale").unwrap();

        run(args_for(dir.path(), input), &Printer::plain()).unwrap();

        let snippet = fs::read_to_string(&target).unwrap();
        assert!(snippet.starts_with("<picture>"));
    }

    #[test]
    fn test_rename_writes_document_back() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("banner.layers.txt");
        fs::write(&input, "Group\n  Banner-Large-@2.JPEG\n").unwrap();

        let args = GenerateArgs {
            compress: true,
            rename: true,
            ..args_for(dir.path(), input.clone())
        };
        run(args, &Printer::plain()).unwrap();

        assert_eq!(
            fs::read_to_string(&input).unwrap(),
            "Group\n  Banner-l-2x.jpg\n"
        );
        let snippet = fs::read_to_string(
            dir.path().join("banner-assets/responsive-image-snippet.html"),
        )
        .unwrap();
        assert!(snippet.contains("/images/Banner-l-2x.jpg"));
    }

    #[test]
    fn test_directory_input_skips_empty_documents() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.layers.txt"), "a-m.png\n").unwrap();
        fs::write(dir.path().join("b.layers.txt"), "Background\n").unwrap();

        let args = args_for(dir.path(), dir.path().to_path_buf());
        run(args, &Printer::plain()).unwrap();

        assert!(dir.path().join("a-assets/responsive-image-snippet.html").exists());
        assert!(!dir.path().join("b-assets").exists());
    }

    #[test]
    fn test_no_documents_is_an_error() {
        let dir = tempdir().unwrap();
        let args = args_for(dir.path(), dir.path().to_path_buf());
        let err = run(args, &Printer::plain()).unwrap_err();
        assert!(matches!(err, ResimgError::Input { .. }));
    }
}
