//! Scanning layer names for asset declarations.
//!
//! A scan walks layer names in document order, splits each on commas, and
//! parses every segment that mentions an image extension. Segments that
//! fail to parse are reported as diagnostics and skipped; they never stop
//! the scan.

use serde::Serialize;

use crate::aggregate::{AssetSet, AssetSetBuilder, DuplicatePolicy};
use crate::canonical::canonicalize;
use crate::diagnostic::Diagnostics;
use crate::host::LayerSource;
use crate::parser::{has_asset_extension, parse_declaration, split_declarations, AssetDeclaration};

/// Options for a scan.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOptions {
    /// Canonicalize declarations as they are parsed.
    pub compress: bool,
    /// How to resolve two declarations for the same breakpoint and density.
    pub duplicates: DuplicatePolicy,
}

/// A declaration together with where it was found.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScannedDeclaration {
    /// Index of the layer name in scan order.
    pub layer: usize,
    /// Index of the comma segment within the layer name.
    pub segment: usize,
    pub declaration: AssetDeclaration,
}

/// Everything a scan produced.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanResult {
    /// Layer names in scan order.
    pub layers: Vec<String>,
    /// Parsed declarations in scan order.
    pub declarations: Vec<ScannedDeclaration>,
    /// Aggregated assets.
    pub assets: AssetSet,
    /// Problems with individual segments.
    pub diagnostics: Diagnostics,
}

impl ScanResult {
    /// True when no declaration survived; generation should not run.
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

/// Parse and aggregate the declarations in an ordered list of layer names.
pub fn scan_candidates<I, S>(names: I, options: &ScanOptions) -> ScanResult
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut result = ScanResult::default();
    let mut builder = AssetSetBuilder::with_policy(options.duplicates);

    for (layer, name) in names.into_iter().enumerate() {
        let name = name.as_ref();
        result.layers.push(name.to_string());
        scan_layer_name(layer, name, options, &mut builder, &mut result);
    }

    result.assets = builder.build();
    result
}

fn scan_layer_name(
    layer: usize,
    name: &str,
    options: &ScanOptions,
    builder: &mut AssetSetBuilder,
    result: &mut ScanResult,
) {
    if !has_asset_extension(name) {
        return;
    }

    for (segment, raw) in split_declarations(name).enumerate() {
        if !has_asset_extension(raw) {
            continue;
        }

        match parse_declaration(raw) {
            Ok(declaration) => {
                let declaration = if options.compress {
                    canonicalize(&declaration)
                } else {
                    declaration
                };
                builder.insert(declaration.clone());
                result.declarations.push(ScannedDeclaration {
                    layer,
                    segment,
                    declaration,
                });
            }
            Err(e) => result.diagnostics.push(e.to_diagnostic()),
        }
    }
}

/// Walk a layer tree depth-first and scan every layer name.
///
/// A group's own name is scanned before its children.
pub fn scan_layers<L: LayerSource>(source: &L, options: &ScanOptions) -> ScanResult {
    scan_candidates(collect_layer_names(source), options)
}

/// Every layer name in depth-first, pre-order document order.
pub fn collect_layer_names<L: LayerSource>(source: &L) -> Vec<String> {
    let mut names = Vec::new();
    for root in source.roots() {
        collect_into(source, &root, &mut names);
    }
    names
}

fn collect_into<L: LayerSource>(source: &L, node: &L::Node, names: &mut Vec<String>) {
    names.push(source.name_of(node));
    if let Some(children) = source.children_of(node) {
        for child in &children {
            collect_into(source, child, names);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breakpoint::Breakpoint;

    /// Minimal in-memory tree: (name, children).
    struct Tree(Vec<(String, Option<Vec<usize>>)>, Vec<usize>);

    impl LayerSource for Tree {
        type Node = usize;

        fn roots(&self) -> Vec<usize> {
            self.1.clone()
        }

        fn name_of(&self, node: &usize) -> String {
            self.0[*node].0.clone()
        }

        fn children_of(&self, node: &usize) -> Option<Vec<usize>> {
            self.0[*node].1.clone()
        }
    }

    #[test]
    fn test_scan_candidates_in_order() {
        let result = scan_candidates(
            ["Background", "hero-l.png, hero-l-@2x.png", "hero.png"],
            &ScanOptions::default(),
        );

        assert_eq!(result.layers.len(), 3);
        assert_eq!(result.declarations.len(), 3);
        assert_eq!(result.declarations[1].layer, 1);
        assert_eq!(result.declarations[1].segment, 1);
        assert_eq!(
            result.assets.sorted_breakpoints(),
            vec![Breakpoint::Xs, Breakpoint::L]
        );
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_bad_segment_does_not_stop_siblings() {
        let result = scan_candidates(["lg.png, hero-lg.png, x.png copy"], &ScanOptions::default());

        assert_eq!(result.declarations.len(), 1);
        assert_eq!(result.declarations[0].declaration.name, "hero");
        assert_eq!(result.diagnostics.len(), 2);
    }

    #[test]
    fn test_compress_canonicalizes() {
        let options = ScanOptions {
            compress: true,
            ..ScanOptions::default()
        };
        let result = scan_candidates(["Mona Lisa-SML-@2x.JPEG"], &options);
        assert_eq!(result.declarations[0].declaration.file_name, "Mona Lisa-s-2x.jpg");
    }

    #[test]
    fn test_no_extension_bearing_names_is_empty() {
        let result = scan_candidates(["Background", "Layer 1", "Group"], &ScanOptions::default());
        assert!(result.is_empty());
        assert!(result.assets.is_empty());
    }

    #[test]
    fn test_scan_layers_depth_first() {
        let tree = Tree(
            vec![
                ("group-l.png".to_string(), Some(vec![1, 2])),
                ("inner-l-@2x.png".to_string(), None),
                ("Folder".to_string(), Some(vec![3])),
                ("deep-s.png".to_string(), None),
                ("last.png".to_string(), None),
            ],
            vec![0, 4],
        );

        assert_eq!(
            collect_layer_names(&tree),
            vec!["group-l.png", "inner-l-@2x.png", "Folder", "deep-s.png", "last.png"]
        );

        let result = scan_layers(&tree, &ScanOptions::default());
        assert_eq!(result.declarations.len(), 4);
        assert_eq!(
            result.assets.sorted_breakpoints(),
            vec![Breakpoint::Xs, Breakpoint::S, Breakpoint::L]
        );
    }
}
