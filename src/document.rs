//! Layer documents read by the CLI.
//!
//! A layer document stands in for an image editor's layer tree. It is
//! either YAML:
//!
//! ```yaml
//! name: poster.psd
//! layers:
//!   - name: hero-l.png, hero-l-@2x.png
//!   - name: Mobile
//!     layers:
//!       - name: hero-s.png
//! ```
//!
//! or plain text with one layer name per line, nested by two spaces:
//!
//! ```text
//! hero-l.png, hero-l-@2x.png
//! Mobile
//!   hero-s.png
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::error::{ResimgError, Result};
use crate::host::LayerSource;
use crate::serialize::{rename_layer, RenameOptions};

/// File suffixes recognised when scanning a directory for documents.
pub const DOCUMENT_SUFFIXES: &[&str] = &[".layers.yaml", ".layers.yml", ".layers.txt"];

/// One layer; groups carry child layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layers: Option<Vec<Layer>>,
}

impl Layer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            layers: None,
        }
    }

    pub fn group(name: impl Into<String>, layers: Vec<Layer>) -> Self {
        Self {
            name: name.into(),
            layers: Some(layers),
        }
    }
}

/// How a document was written on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Text,
}

/// A named layer tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerDocument {
    /// Document name, e.g. `poster.psd`.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub layers: Vec<Layer>,
}

impl LayerDocument {
    /// Load a document, picking the format from the file extension.
    pub fn load(path: &Path) -> Result<(Self, DocumentFormat)> {
        let content = fs::read_to_string(path).map_err(|e| ResimgError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read layer document: {}", e),
        })?;

        let format = detect_format(path);
        let mut document = match format {
            DocumentFormat::Yaml => Self::parse_yaml(&content)?,
            DocumentFormat::Text => Self::parse_text(&content),
        };

        if document.name.is_empty() {
            document.name = default_document_name(path);
        }

        Ok((document, format))
    }

    /// Write the document back in `format`.
    pub fn save(&self, path: &Path, format: DocumentFormat) -> Result<()> {
        let content = match format {
            DocumentFormat::Yaml => self.to_yaml()?,
            DocumentFormat::Text => self.to_text(),
        };
        fs::write(path, content).map_err(|e| ResimgError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to write layer document: {}", e),
        })
    }

    /// Parse the YAML form.
    pub fn parse_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| ResimgError::Input {
            message: format!("Invalid layer document: {}", e),
            help: Some("Expected `name:` and a `layers:` list of `- name: ...` entries".to_string()),
        })
    }

    /// Parse the indented text form. Two spaces or one tab make a level.
    /// Blank lines are ignored.
    pub fn parse_text(content: &str) -> Self {
        let lines: Vec<(usize, String)> = content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| (indent_level(line), line.trim().to_string()))
            .collect();

        let mut pos = 0;
        let mut layers = Vec::new();
        while pos < lines.len() {
            layers.extend(build_level(&lines, &mut pos, 0));
        }

        Self {
            name: String::new(),
            layers,
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| ResimgError::Input {
            message: format!("Failed to serialize layer document: {}", e),
            help: None,
        })
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        write_text(&self.layers, 0, &mut out);
        out
    }

    /// Document name without its file extension (`poster.psd` → `poster`).
    pub fn stem(&self) -> &str {
        strip_extension(&self.name)
    }

    /// Where the snippet for this document goes:
    /// `{root}/{stem}-assets/{file_name}.html`.
    pub fn asset_path(&self, root: &Path, file_name: &str) -> PathBuf {
        root.join(format!("{}-assets", self.stem()))
            .join(format!("{}.html", file_name))
    }

    /// Rename every layer whose name carries asset declarations.
    ///
    /// Returns `(old, new)` pairs for the layers that changed.
    pub fn rename_layers(&mut self, options: &RenameOptions) -> Vec<(String, String)> {
        let mut renamed = Vec::new();
        rename_all(&mut self.layers, options, &mut renamed);
        renamed
    }

    fn node(&self, path: &[usize]) -> Option<&Layer> {
        let (first, rest) = path.split_first()?;
        let mut layer = self.layers.get(*first)?;
        for &i in rest {
            layer = layer.layers.as_ref()?.get(i)?;
        }
        Some(layer)
    }
}

impl LayerSource for LayerDocument {
    /// Index path from the document root.
    type Node = Vec<usize>;

    fn roots(&self) -> Vec<Vec<usize>> {
        (0..self.layers.len()).map(|i| vec![i]).collect()
    }

    fn name_of(&self, node: &Vec<usize>) -> String {
        self.node(node).map(|l| l.name.clone()).unwrap_or_default()
    }

    fn children_of(&self, node: &Vec<usize>) -> Option<Vec<Vec<usize>>> {
        let children = self.node(node)?.layers.as_ref()?;
        Some(
            (0..children.len())
                .map(|i| {
                    let mut path = node.clone();
                    path.push(i);
                    path
                })
                .collect(),
        )
    }
}

fn indent_level(line: &str) -> usize {
    let width: usize = line
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .map(|c| if c == '\t' { 2 } else { 1 })
        .sum();
    width / 2
}

fn build_level(lines: &[(usize, String)], pos: &mut usize, level: usize) -> Vec<Layer> {
    let mut layers = Vec::new();

    while *pos < lines.len() {
        let (depth, name) = &lines[*pos];
        if *depth < level {
            break;
        }
        *pos += 1;

        let mut layer = Layer::new(name.clone());
        if *pos < lines.len() && lines[*pos].0 > *depth {
            layer.layers = Some(build_level(lines, pos, depth + 1));
        }
        layers.push(layer);
    }

    layers
}

fn write_text(layers: &[Layer], depth: usize, out: &mut String) {
    for layer in layers {
        out.push_str(&"  ".repeat(depth));
        out.push_str(&layer.name);
        out.push('\n');
        if let Some(children) = &layer.layers {
            write_text(children, depth + 1, out);
        }
    }
}

fn rename_all(layers: &mut [Layer], options: &RenameOptions, renamed: &mut Vec<(String, String)>) {
    for layer in layers {
        if let Some(new_name) = rename_layer(&layer.name, options) {
            let old = std::mem::replace(&mut layer.name, new_name.clone());
            renamed.push((old, new_name));
        }
        if let Some(children) = &mut layer.layers {
            rename_all(children, options, renamed);
        }
    }
}

/// Strip a 3–4 letter extension (`.psd`, `.tiff`), if present.
fn strip_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, ext))
            if (3..=4).contains(&ext.len()) && ext.chars().all(|c| c.is_ascii_alphabetic()) =>
        {
            stem
        }
        _ => name,
    }
}

fn detect_format(path: &Path) -> DocumentFormat {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
            DocumentFormat::Yaml
        }
        _ => DocumentFormat::Text,
    }
}

/// Document name implied by a file name: `poster.layers.yaml` → `poster`.
fn default_document_name(path: &Path) -> String {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("document");

    for suffix in DOCUMENT_SUFFIXES {
        if let Some(stem) = file_name.strip_suffix(suffix) {
            return stem.to_string();
        }
    }

    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document")
        .to_string()
}

/// Does `path` look like a layer document?
pub fn is_layer_document(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| DOCUMENT_SUFFIXES.iter().any(|s| n.ends_with(s)))
        .unwrap_or(false)
}

/// Expand inputs: files are taken as given, directories are walked for
/// layer documents.
pub fn discover_documents(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut documents = Vec::new();

    for input in inputs {
        if input.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(input)
                .follow_links(true)
                .into_iter()
                .filter_map(|e| e.ok())
                .map(|e| e.into_path())
                .filter(|p| p.is_file() && is_layer_document(p))
                .collect();
            found.sort();
            documents.extend(found);
        } else {
            documents.push(input.clone());
        }
    }

    documents
}
