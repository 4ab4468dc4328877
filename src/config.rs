//! Project configuration (resimg.yaml).
//!
//! Every field is optional; a missing file means all defaults. CLI flags
//! are applied on top of whatever was loaded.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::aggregate::DuplicatePolicy;
use crate::breakpoint::{Breakpoint, MaxWidths};
use crate::diagnostic::{Diagnostic, Diagnostics};
use crate::error::{ResimgError, Result};
use crate::markup::{GenerateOptions, MarkupPolicy, MediaBoundary, DEFAULT_SRC_DIR};
use crate::scan::ScanOptions;
use crate::serialize::RenameOptions;

/// Config file looked up in the working directory.
pub const CONFIG_FILENAME: &str = "resimg.yaml";

/// Default name of the generated snippet file (without `.html`).
pub const DEFAULT_FILE_NAME: &str = "responsive-image-snippet";

/// Project configuration loaded from resimg.yaml.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Snippet file name, without extension.
    pub file_name: String,

    /// Directory prefix for asset URLs.
    pub src_dir: String,

    /// `alt` text for the `<img>`.
    pub alt_text: Option<String>,

    /// Replaces every declaration's own name in URLs and renamed layers.
    pub base_name: Option<String>,

    /// Max width per breakpoint, keyed by any breakpoint synonym.
    /// Values are numbers or text like `480px`.
    pub max_widths: BTreeMap<String, serde_yaml::Value>,

    /// Canonicalize declarations while scanning.
    pub compress: bool,

    /// Write canonical names back into the layer document.
    pub rename: bool,

    /// Root directory for `{doc}-assets/`; defaults to the document's own
    /// directory.
    pub output: Option<PathBuf>,

    pub policy: PolicyConfig,
}

/// Behaviour switches under `policy:`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub duplicates: DuplicatePolicy,
    pub media_boundary: MediaBoundary,
    pub source_one_x_descriptor: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        let markup = MarkupPolicy::default();
        Self {
            duplicates: DuplicatePolicy::default(),
            media_boundary: markup.media_boundary,
            source_one_x_descriptor: markup.source_one_x_descriptor,
        }
    }
}

impl PolicyConfig {
    pub fn markup(&self) -> MarkupPolicy {
        MarkupPolicy {
            media_boundary: self.media_boundary,
            source_one_x_descriptor: self.source_one_x_descriptor,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_FILE_NAME.to_string(),
            src_dir: DEFAULT_SRC_DIR.to_string(),
            alt_text: None,
            base_name: None,
            max_widths: BTreeMap::new(),
            compress: false,
            rename: false,
            output: None,
            policy: PolicyConfig::default(),
        }
    }
}

impl Config {
    /// Load config from a resimg.yaml file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ResimgError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read config: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse config from a YAML string. An empty document is all defaults.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| ResimgError::Config {
            message: format!("Invalid config: {}", e),
            help: Some(format!("Check {} syntax", CONFIG_FILENAME)),
        })
    }

    /// Load `dir/resimg.yaml` if it exists, defaults otherwise.
    ///
    /// Returns the path that was loaded, if any.
    pub fn discover(dir: &Path) -> Result<(Self, Option<PathBuf>)> {
        let path = dir.join(CONFIG_FILENAME);
        if path.is_file() {
            Ok((Self::load(&path)?, Some(path)))
        } else {
            Ok((Self::default(), None))
        }
    }

    /// Set a max width from `key=value` text, e.g. `l=1280`.
    pub fn set_max_width(&mut self, assignment: &str) -> Result<()> {
        let (key, value) = assignment.split_once('=').ok_or_else(|| ResimgError::Config {
            message: format!("Invalid max width '{}'", assignment),
            help: Some("Use BREAKPOINT=WIDTH, e.g. l=1280".to_string()),
        })?;
        self.max_widths.insert(
            key.trim().to_string(),
            serde_yaml::Value::String(value.trim().to_string()),
        );
        Ok(())
    }

    /// Resolve `max_widths` into per-breakpoint widths.
    ///
    /// Unknown breakpoint keys and non-numeric values are reported and
    /// ignored.
    pub fn resolve_max_widths(&self) -> (MaxWidths, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let mut raw: Vec<(Breakpoint, String)> = Vec::new();

        for (key, value) in &self.max_widths {
            let Some(breakpoint) = Breakpoint::parse_synonym(key) else {
                diagnostics.push(
                    Diagnostic::warning(
                        "resimg::config::unknown-breakpoint",
                        format!("Unknown breakpoint '{}' in max_widths", key),
                    )
                    .with_help("Use xs, s, m, l or xl (or a synonym like small)"),
                );
                continue;
            };
            let text = match value {
                serde_yaml::Value::Number(n) => n.to_string(),
                serde_yaml::Value::String(s) => s.clone(),
                other => format!("{:?}", other),
            };
            raw.push((breakpoint, text));
        }

        let (widths, resolved) =
            MaxWidths::resolve(raw.iter().map(|(bp, text)| (*bp, text.as_str())));
        diagnostics.merge(resolved);
        (widths, diagnostics)
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            compress: self.compress,
            duplicates: self.policy.duplicates,
        }
    }

    pub fn rename_options(&self) -> RenameOptions {
        RenameOptions {
            compress: self.compress,
            base_name: self.base_name.clone(),
        }
    }

    /// Markup options, plus any problems found resolving max widths.
    pub fn generate_options(&self) -> (GenerateOptions, Diagnostics) {
        let (max_widths, diagnostics) = self.resolve_max_widths();
        let options = GenerateOptions {
            alt_text: self.alt_text.clone().filter(|alt| !alt.is_empty()),
            src_dir: self.src_dir.clone(),
            base_name: self.base_name.clone(),
            max_widths,
            policy: self.policy.markup(),
        };
        (options, diagnostics)
    }

    /// Contents written by `resimg init`.
    pub fn stock_yaml() -> String {
        let mut yaml = String::new();
        yaml.push_str(&format!("file_name: {}\n", DEFAULT_FILE_NAME));
        yaml.push_str(&format!("src_dir: {}\n", DEFAULT_SRC_DIR));
        yaml.push_str("alt_text: \"\"\n");
        yaml.push_str("compress: false\n");
        yaml.push_str("rename: false\n");
        yaml.push_str("max_widths:\n");
        for breakpoint in Breakpoint::ALL {
            yaml.push_str(&format!(
                "  {}: {}\n",
                breakpoint.code(),
                breakpoint.default_max_width()
            ));
        }
        yaml.push_str("policy:\n");
        yaml.push_str("  duplicates: last-wins\n");
        yaml.push_str("  media_boundary: next-smaller\n");
        yaml.push_str("  source_one_x_descriptor: true\n");
        yaml
    }
}
