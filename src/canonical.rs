//! Canonical token spellings.
//!
//! Canonicalization rewrites a declaration's raw tokens into one fixed,
//! compressed spelling:
//!
//! - breakpoint `Large` → `l`
//! - density `@2` → `2x`, `@1.50x` → `1.5x`
//! - quality `80%` → `80`, `100%` → none
//! - extension `.JPEG` → `.jpg`
//! - dimension `800px x 600px` → `800x600`
//!
//! Every rule is idempotent, so canonicalizing twice is a no-op.

use std::sync::OnceLock;

use regex::Regex;

use crate::breakpoint::Breakpoint;
use crate::parser::AssetDeclaration;

/// Return the canonical form of `declaration`.
pub fn canonicalize(declaration: &AssetDeclaration) -> AssetDeclaration {
    let mut canonical = AssetDeclaration {
        dimension: declaration.dimension.as_deref().map(canonical_dimension),
        quality: declaration.quality.as_deref().and_then(canonical_quality),
        extension: canonical_extension(&declaration.extension),
        density: declaration.density.as_deref().map(canonical_density),
        breakpoint: declaration
            .breakpoint
            .as_deref()
            .map(|b| Breakpoint::from_synonym(b).code().to_string()),
        name: declaration.name.clone(),
        file_name: String::new(),
    };
    canonical.file_name = compose_file_name(&canonical, None);
    canonical
}

/// Build `name[-breakpoint][-density]extension` from a declaration's
/// fields, optionally substituting `base_name` for the parsed name.
///
/// A name ending in an `x`/`extra` word is joined to the breakpoint with
/// `_`, since `shot-x-s` reads back as the breakpoint `x-s`.
pub fn compose_file_name(declaration: &AssetDeclaration, base_name: Option<&str>) -> String {
    let mut file_name = base_name.unwrap_or(&declaration.name).to_string();
    if let Some(breakpoint) = &declaration.breakpoint {
        file_name.push(breakpoint_separator(&file_name));
        file_name.push_str(breakpoint);
    }
    if let Some(density) = &declaration.density {
        file_name.push('-');
        file_name.push_str(density);
    }
    file_name.push_str(&declaration.extension);
    file_name
}

/// Numeric multiplier of a density token; `1.0` when absent or unreadable.
///
/// ```
/// use resimg::canonical::density_multiplier;
///
/// assert_eq!(density_multiplier(Some("@1.5x")), 1.5);
/// assert_eq!(density_multiplier(None), 1.0);
/// ```
pub fn density_multiplier(token: Option<&str>) -> f64 {
    token
        .and_then(|t| number_regex().find(t))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(1.0)
}

/// Format a multiplier the way it is written in file names and
/// descriptors: `2` rather than `2.0`.
pub fn format_multiplier(multiplier: f64) -> String {
    format!("{}", multiplier)
}

fn breakpoint_separator(name: &str) -> char {
    static EXTRA_WORD: OnceLock<Regex> = OnceLock::new();
    let extra_word =
        EXTRA_WORD.get_or_init(|| Regex::new(r"(?i)^(?:e?x(?:tra)?)+$").expect("valid extra regex"));

    let last_word = name
        .rsplit(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .next()
        .unwrap_or(name);
    if extra_word.is_match(last_word) {
        '_'
    } else {
        '-'
    }
}

/// The density's own digits with an `x` suffix. Fractional trailing zeros
/// are dropped; the value is never round-tripped through a float.
fn canonical_density(token: &str) -> String {
    let Some(number) = number_regex().find(token) else {
        return "1x".to_string();
    };
    let mut digits = number.as_str();
    if digits.contains('.') {
        digits = digits.trim_end_matches('0').trim_end_matches('.');
    }
    format!("{}x", digits)
}

fn canonical_quality(token: &str) -> Option<String> {
    let value = token.trim_end_matches('%');
    if value == "100" {
        None
    } else {
        Some(value.to_string())
    }
}

fn canonical_extension(extension: &str) -> String {
    let lower = extension.to_ascii_lowercase();
    if lower == ".jpeg" {
        ".jpg".to_string()
    } else {
        lower
    }
}

fn canonical_dimension(dimension: &str) -> String {
    static UNIT: OnceLock<Regex> = OnceLock::new();
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    let unit = UNIT.get_or_init(|| Regex::new(r"(?i)px").expect("valid unit regex"));
    let separator =
        SEPARATOR.get_or_init(|| Regex::new(r"(?i)\s*x\s*").expect("valid separator regex"));

    let without_units = unit.replace_all(dimension.trim(), "");
    separator.replace_all(&without_units, "x").into_owned()
}

fn number_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+(?:\.\d+)?").expect("valid number regex"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_declaration;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_canonicalize_scenario() {
        let d = canonicalize(&parse_declaration("mona lisa-sml-@2x.jpeg").unwrap());

        assert_eq!(d.breakpoint.as_deref(), Some("s"));
        assert_eq!(d.density.as_deref(), Some("2x"));
        assert_eq!(d.extension, ".jpg");
        assert_eq!(d.name, "mona lisa");
        assert_eq!(d.file_name, "mona lisa-s-2x.jpg");
    }

    #[test]
    fn test_large_synonyms_canonicalize_to_l() {
        for synonym in ["Large", "LARGE", "l", "lg"] {
            let d = parse_declaration(&format!("hero-{}.png", synonym)).unwrap();
            assert_eq!(canonicalize(&d).breakpoint.as_deref(), Some("l"), "{}", synonym);
        }
    }

    #[test]
    fn test_canonical_density() {
        assert_eq!(canonical_density("@2"), "2x");
        assert_eq!(canonical_density("@1.50x"), "1.5x");
        assert_eq!(canonical_density("3"), "3x");
        assert_eq!(canonical_density("2X"), "2x");
        assert_eq!(canonical_density("@1.0x"), "1x");
    }

    #[test]
    fn test_canonical_density_keeps_long_fractions() {
        assert_eq!(canonical_density("9.99999999999999999x"), "9.99999999999999999x");
        assert_eq!(canonical_density("@1.2500000000000000001"), "1.2500000000000000001x");

        let d = canonicalize(&parse_declaration("hero-9.99999999999999999x.png").unwrap());
        assert_eq!(d.file_name, "hero-9.99999999999999999x.png");
        assert_eq!(parse_declaration(&d.file_name).unwrap(), d);
    }

    #[test]
    fn test_breakpoint_after_extra_word_uses_underscore() {
        let d = canonicalize(&parse_declaration("shot-x_s.png").unwrap());
        assert_eq!(d.name, "shot-x");
        assert_eq!(d.file_name, "shot-x_s.png");

        let reparsed = parse_declaration(&d.file_name).unwrap();
        assert_eq!(reparsed.name, "shot-x");
        assert_eq!(reparsed.breakpoint.as_deref(), Some("s"));

        assert_eq!(breakpoint_separator("hero-extra"), '_');
        assert_eq!(breakpoint_separator("Ex"), '_');
        assert_eq!(breakpoint_separator("box"), '-');
        assert_eq!(breakpoint_separator("mona lisa"), '-');
    }

    #[test]
    fn test_canonical_quality() {
        assert_eq!(canonical_quality("80%"), Some("80".to_string()));
        assert_eq!(canonical_quality("8"), Some("8".to_string()));
        assert_eq!(canonical_quality("100%"), None);
        assert_eq!(canonical_quality("100"), None);
    }

    #[test]
    fn test_canonical_extension() {
        assert_eq!(canonical_extension(".JPEG"), ".jpg");
        assert_eq!(canonical_extension(".Png"), ".png");
        assert_eq!(canonical_extension(".jpg"), ".jpg");
    }

    #[test]
    fn test_canonical_dimension() {
        assert_eq!(canonical_dimension("800px x 600px"), "800x600");
        assert_eq!(canonical_dimension("800 X 600"), "800x600");
        assert_eq!(canonical_dimension("10cm x 5cm"), "10cmx5cm");
        assert_eq!(canonical_dimension("50%"), "50%");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "mona lisa-sml-@2x.jpeg",
            "50% banner_large_1.5x.jpg80%",
            "800px x 600px poster-Extra-Large-@3.PNG100%",
            "icon@2x.gif",
            "plain.png",
            "shot-x_s.png",
            "hero-extra_large.png",
        ];
        for input in inputs {
            let once = canonicalize(&parse_declaration(input).unwrap());
            let twice = canonicalize(&once);
            assert_eq!(once, twice, "{}", input);
        }
    }

    #[test]
    fn test_density_multiplier() {
        assert_eq!(density_multiplier(Some("@2x")), 2.0);
        assert_eq!(density_multiplier(Some("1.5x")), 1.5);
        assert_eq!(density_multiplier(Some("@")), 1.0);
        assert_eq!(density_multiplier(None), 1.0);
    }

    #[test]
    fn test_compose_file_name_with_base() {
        let d = canonicalize(&parse_declaration("mona lisa-sml-@2x.jpeg").unwrap());
        assert_eq!(compose_file_name(&d, Some("portrait")), "portrait-s-2x.jpg");
        assert_eq!(compose_file_name(&d, None), "mona lisa-s-2x.jpg");
    }
}
