//! Responsive image markup generation.
//!
//! Turns an `AssetSet` into an HTML snippet. A set spanning several
//! breakpoints becomes a `<picture>`: breakpoints are walked from largest to
//! smallest, every breakpoint but the smallest contributes a `<source>` with
//! a `min-width` media query, and the smallest one becomes the trailing
//! `<img>`. A set with a single breakpoint becomes a bare `<img>`.
//!
//! The `min-width` of a `<source>` is one pixel above the max width of the
//! next smaller breakpoint, converted to `em` at a 16px base, so each source
//! takes over exactly where the smaller range ends:
//!
//! ```text
//! s (480px) + l  →  <source media="(min-width: 30.0625em)" ...>  for l
//!                   <img ...>                                    for s
//! ```

mod element;

pub use element::{escape_attr, AttrValue, Element};

use serde::{Deserialize, Serialize};

use crate::aggregate::{Asset, AssetSet};
use crate::breakpoint::{Breakpoint, MaxWidths};
use crate::canonical::{compose_file_name, format_multiplier};
use crate::error::{ResimgError, Result};
use crate::host::TextSink;

/// Default directory assets are referenced from.
pub const DEFAULT_SRC_DIR: &str = "/images";

/// Which breakpoint's max width bounds a `<source>` media query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MediaBoundary {
    /// One pixel above the next smaller breakpoint's max width.
    #[default]
    NextSmaller,
    /// One pixel above the breakpoint's own max width.
    Current,
}

/// Output choices that older snippet formats made differently.
///
/// Configured through the `policy:` block of `resimg.yaml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkupPolicy {
    pub media_boundary: MediaBoundary,
    /// Write the `1x` descriptor inside `<source>` srcset lists.
    pub source_one_x_descriptor: bool,
}

impl Default for MarkupPolicy {
    fn default() -> Self {
        Self {
            media_boundary: MediaBoundary::NextSmaller,
            source_one_x_descriptor: true,
        }
    }
}

/// Presentation options for `generate`.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateOptions {
    /// `alt` text; omitted when `None` or empty.
    pub alt_text: Option<String>,
    /// Directory prefix for every URL.
    pub src_dir: String,
    /// Replaces each asset's parsed name in its file name.
    pub base_name: Option<String>,
    pub max_widths: MaxWidths,
    pub policy: MarkupPolicy,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            alt_text: None,
            src_dir: DEFAULT_SRC_DIR.to_string(),
            base_name: None,
            max_widths: MaxWidths::default(),
            policy: MarkupPolicy::default(),
        }
    }
}

/// Generate the snippet as a string.
pub fn generate(assets: &AssetSet, options: &GenerateOptions) -> Result<String> {
    let mut out = String::new();
    emit(assets, options, &mut out)?;
    Ok(out)
}

/// Generate the snippet line by line into `sink`.
///
/// Fails with `EmptyAssetSet` before writing anything when there is
/// nothing to describe.
pub fn emit(assets: &AssetSet, options: &GenerateOptions, sink: &mut dyn TextSink) -> Result<()> {
    let root = build(assets, options)?;
    root.render(0, sink)?;
    Ok(())
}

/// Build the element tree for an asset set.
pub fn build(assets: &AssetSet, options: &GenerateOptions) -> Result<Element> {
    let breakpoints = assets.sorted_breakpoints();
    let Some(&smallest) = breakpoints.first() else {
        return Err(ResimgError::EmptyAssetSet);
    };

    if !assets.has_multiple_breakpoints() {
        return Ok(img(bucket(assets, smallest), options));
    }

    let mut picture = Element::new("picture");
    for (i, &breakpoint) in breakpoints.iter().enumerate().rev() {
        let contextual = bucket(assets, breakpoint);
        picture = if i == 0 {
            picture.child(img(contextual, options))
        } else {
            let boundary = match options.policy.media_boundary {
                MediaBoundary::NextSmaller => breakpoints[i - 1],
                MediaBoundary::Current => breakpoint,
            };
            picture.child(source(contextual, boundary, options))
        };
    }

    Ok(picture)
}

fn bucket(assets: &AssetSet, breakpoint: Breakpoint) -> &[Asset] {
    assets.get(breakpoint).unwrap_or_default()
}

fn img(assets: &[Asset], options: &GenerateOptions) -> Element {
    let mut img = Element::new("img");

    if let Some(alt) = options.alt_text.as_deref().filter(|a| !a.is_empty()) {
        img = img.attr("alt", alt);
    }

    if let Some((first, rest)) = assets.split_first() {
        img = img.attr("src", asset_url(first, options));
        if !rest.is_empty() {
            let entries = rest.iter().map(|a| srcset_entry(a, options, true)).collect();
            img = img.list_attr("srcset", entries);
        }
    }

    img
}

fn source(assets: &[Asset], boundary: Breakpoint, options: &GenerateOptions) -> Element {
    let width = options.max_widths.get(boundary);
    let entries = assets
        .iter()
        .map(|a| srcset_entry(a, options, options.policy.source_one_x_descriptor))
        .collect();

    Element::new("source")
        .attr("media", media_query(width))
        .list_attr("srcset", entries)
}

/// `(min-width: Wem)` for a range starting one pixel above `max_width`.
pub fn media_query(max_width: f64) -> String {
    format!("(min-width: {}em)", format_multiplier((max_width + 1.0) / 16.0))
}

fn srcset_entry(asset: &Asset, options: &GenerateOptions, one_x_descriptor: bool) -> String {
    let url = asset_url(asset, options);
    if asset.density == 1.0 && !one_x_descriptor {
        url
    } else {
        format!("{} {}x", url, format_multiplier(asset.density))
    }
}

/// The URL of an asset under the configured source directory.
pub fn asset_url(asset: &Asset, options: &GenerateOptions) -> String {
    let file_name = match options.base_name.as_deref() {
        Some(base) => compose_file_name(&asset.declaration, Some(base)),
        None => asset.declaration.file_name.clone(),
    };
    join_url(&options.src_dir, &file_name)
}

/// Join a directory and a file name into a URL.
///
/// The directory is trimmed, repeated slashes are collapsed and any
/// trailing slash is dropped. Whitespace becomes `%20`.
///
/// ```
/// use resimg::markup::join_url;
///
/// assert_eq!(join_url("/images/", "mona lisa.jpg"), "/images/mona%20lisa.jpg");
/// assert_eq!(join_url("//cdn//img", "a.png"), "/cdn/img/a.png");
/// assert_eq!(join_url("", "a.png"), "a.png");
/// assert_eq!(join_url("/", "a.png"), "/a.png");
/// ```
pub fn join_url(dir: &str, file_name: &str) -> String {
    let dir = dir.trim();
    let mut normalized = String::with_capacity(dir.len());
    for c in dir.chars() {
        if c == '/' && normalized.ends_with('/') {
            continue;
        }
        normalized.push(c);
    }
    let normalized = normalized.trim_end_matches('/');

    let url = if !normalized.is_empty() {
        format!("{}/{}", normalized, file_name)
    } else if dir.starts_with('/') {
        format!("/{}", file_name)
    } else {
        file_name.to_string()
    };

    encode_whitespace(&url)
}

fn encode_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c.is_whitespace() {
            out.push_str("%20");
        } else {
            out.push(c);
        }
    }
    out
}
