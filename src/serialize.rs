//! Declaration serialization and layer renaming.
//!
//! `serialize` is the inverse of `parse_declaration`: it writes the fields
//! back as `[dimension ][name][-breakpoint][-density]extension[quality]`.
//! For any declaration `d`, `parse(serialize(canonicalize(d)))` yields
//! `canonicalize(d)` again.

use crate::canonical::{canonicalize, compose_file_name};
use crate::parser::{has_asset_extension, parse_declaration, split_declarations, AssetDeclaration};

/// Write a declaration back as text.
///
/// Without `base_name` the declaration's `file_name` is written as is, so
/// raw separators survive. With one, the file name is rebuilt around it.
pub fn serialize(declaration: &AssetDeclaration, base_name: Option<&str>) -> String {
    let mut out = String::new();
    if let Some(dimension) = &declaration.dimension {
        out.push_str(dimension);
        out.push(' ');
    }
    match base_name {
        None if !declaration.file_name.is_empty() => out.push_str(&declaration.file_name),
        _ => out.push_str(&compose_file_name(declaration, base_name)),
    }
    if let Some(quality) = &declaration.quality {
        out.push_str(quality);
    }
    out
}

/// Options for rewriting layer names.
#[derive(Debug, Clone, Default)]
pub struct RenameOptions {
    /// Canonicalize tokens before writing them back.
    pub compress: bool,
    /// Replace every declaration's name with this one.
    pub base_name: Option<String>,
}

/// Compute the replacement for a layer name.
///
/// Each asset segment is re-serialized; other segments are kept as they
/// are. Segments are joined with `", "`. Returns `None` when the layer has
/// no parseable asset segment or the name would not change.
pub fn rename_layer(layer_name: &str, options: &RenameOptions) -> Option<String> {
    let mut touched = false;

    let segments: Vec<String> = split_declarations(layer_name)
        .map(|segment| {
            if !has_asset_extension(segment) {
                return segment.trim().to_string();
            }
            match parse_declaration(segment) {
                Ok(declaration) => {
                    touched = true;
                    let declaration = if options.compress {
                        canonicalize(&declaration)
                    } else {
                        declaration
                    };
                    serialize(&declaration, options.base_name.as_deref())
                }
                Err(_) => segment.trim().to_string(),
            }
        })
        .collect();

    let renamed = segments.join(", ");
    if touched && renamed != layer_name {
        Some(renamed)
    } else {
        None
    }
}
