//! resimg - Responsive image snippet generator
//!
//! Reads asset declarations out of layer names (`hero-l-@2x.png`), groups
//! them by breakpoint and pixel density, and writes the matching
//! `<picture>` / `<img>` markup.
//!
//! ```
//! use resimg::{generate, scan_candidates, GenerateOptions, ScanOptions};
//!
//! let scan = scan_candidates(["hero-s.png", "hero-l.png"], &ScanOptions::default());
//! let html = generate(&scan.assets, &GenerateOptions::default()).unwrap();
//! assert!(html.contains("(min-width: 30.0625em)"));
//! ```

pub mod aggregate;
pub mod breakpoint;
pub mod canonical;
pub mod cli;
pub mod config;
pub mod diagnostic;
pub mod document;
pub mod error;
pub mod host;
pub mod markup;
pub mod output;
pub mod parser;
pub mod scan;
pub mod serialize;

pub use aggregate::{aggregate, Asset, AssetSet, AssetSetBuilder, DuplicatePolicy};
pub use breakpoint::{Breakpoint, MaxWidths};
pub use canonical::{canonicalize, compose_file_name};
pub use config::Config;
pub use diagnostic::{print_diagnostics, Diagnostic, Diagnostics};
pub use document::{Layer, LayerDocument};
pub use error::{ResimgError, Result};
pub use host::{LayerSource, TextSink, WriteSink};
pub use markup::{generate, GenerateOptions, MarkupPolicy, MediaBoundary};
pub use parser::{parse_declaration, AssetDeclaration, DeclarationError};
pub use scan::{scan_candidates, scan_layers, ScanOptions, ScanResult};
pub use serialize::{rename_layer, serialize, RenameOptions};
