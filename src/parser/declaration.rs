//! Asset declaration parsing.
//!
//! Parses one comma-separated segment of a layer name into an
//! `AssetDeclaration`.

use serde::Serialize;
use thiserror::Error;

use crate::diagnostic::Diagnostic;

use super::grammar::{self, Field};

/// The parsed form of one asset declaration.
///
/// Tokens are kept exactly as written; see `canonical::canonicalize` for
/// the normalized spellings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AssetDeclaration {
    /// Size/scale prefix such as `50%` or `800x600`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension: Option<String>,
    /// Compression quality written after the extension (`80%`, `8`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
    /// Image extension including its dot (`.png`).
    pub extension: String,
    /// Pixel density token (`@2x`, `1.5x`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub density: Option<String>,
    /// Breakpoint synonym (`lg`, `x-small`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakpoint: Option<String>,
    /// Base file name; may contain spaces.
    pub name: String,
    /// File name on disk: everything between the dimension and quality.
    pub file_name: String,
}

/// Why a segment could not be read as a declaration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeclarationError {
    #[error("'{0}' does not end in an image extension (gif, jpg, jpeg, png)")]
    NotAnAssetDeclaration(String),

    #[error("'{raw}' is malformed: {reason}")]
    Malformed { raw: String, reason: String },
}

impl DeclarationError {
    /// Diagnostic code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            DeclarationError::NotAnAssetDeclaration(_) => "resimg::parse::not-an-asset",
            DeclarationError::Malformed { .. } => "resimg::parse::malformed",
        }
    }

    /// Convert into a non-fatal diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let help = match self {
            DeclarationError::NotAnAssetDeclaration(_) => {
                "Put the extension last, optionally followed by a quality like 80%"
            }
            DeclarationError::Malformed { .. } => {
                "Start the declaration with a file name, e.g. hero-lg-@2x.png"
            }
        };
        Diagnostic::warning(self.code(), self.to_string()).with_help(help)
    }
}

/// Split a layer name into its comma-separated declaration segments.
pub fn split_declarations(layer_name: &str) -> impl Iterator<Item = &str> {
    layer_name.split(',')
}

/// Parse a single declaration.
///
/// Callers are expected to pre-filter with `has_asset_extension`; segments
/// that mention an extension somewhere other than the end still fail with
/// `NotAnAssetDeclaration`.
pub fn parse_declaration(raw: &str) -> Result<AssetDeclaration, DeclarationError> {
    let mut remaining = raw.trim();
    let mut declaration = AssetDeclaration::default();
    let mut extension = None;

    for rule in grammar::rules() {
        if rule.field == Field::Extension {
            declaration.file_name = remaining.to_string();
        }

        let Some((token, rest)) = rule.extract(remaining) else {
            continue;
        };
        remaining = rest;

        let token = Some(token.to_string());
        match rule.field {
            Field::Dimension => declaration.dimension = token,
            Field::Quality => declaration.quality = token,
            Field::Extension => extension = token,
            Field::Density => declaration.density = token,
            Field::Breakpoint => declaration.breakpoint = token,
        }
    }

    declaration.extension =
        extension.ok_or_else(|| DeclarationError::NotAnAssetDeclaration(raw.trim().to_string()))?;

    let name = remaining.trim();
    if name.is_empty() {
        return Err(DeclarationError::Malformed {
            raw: raw.trim().to_string(),
            reason: "no file name is left once its tokens are removed".to_string(),
        });
    }
    declaration.name = name.to_string();

    Ok(declaration)
}
