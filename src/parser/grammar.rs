//! The asset declaration micro-grammar.
//!
//! A declaration like `50% hero-lg-@2x.png80%` is read by an ordered table of
//! rules. Each rule matches one field at the start or the end of whatever is
//! left of the string, takes its token, and strips it together with the
//! separators (`-`, `_`, whitespace) next to it. Because every rule only sees
//! the remainder, a suffix consumed by an earlier rule can never be matched
//! again by a later one.
//!
//! | Field      | Anchor | Example token        |
//! |------------|--------|----------------------|
//! | dimension  | prefix | `50%`, `800px x 600` |
//! | quality    | suffix | `80%`, `8`           |
//! | extension  | suffix | `.png`, `.JPEG`      |
//! | density    | suffix | `@2x`, `1.5x`, `2`   |
//! | breakpoint | suffix | `lg`, `x-small`      |

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::breakpoint::SYNONYM_PATTERN;

/// Capture groups that may hold a rule's token, tried in order.
const TOKEN_GROUPS: [&str; 2] = ["tok", "glued"];

/// The declaration field a rule extracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Dimension,
    Quality,
    Extension,
    Density,
    Breakpoint,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Dimension => "dimension",
            Field::Quality => "quality",
            Field::Extension => "extension",
            Field::Density => "density",
            Field::Breakpoint => "breakpoint",
        };
        write!(f, "{}", name)
    }
}

/// Which end of the remaining text a rule reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Prefix,
    Suffix,
}

/// One row of the grammar table.
#[derive(Debug)]
pub struct Rule {
    pub field: Field,
    pub anchor: Anchor,
    regex: Regex,
}

impl Rule {
    fn new(field: Field, anchor: Anchor, pattern: &str) -> Self {
        Self {
            field,
            anchor,
            regex: Regex::new(pattern).expect("valid grammar regex"),
        }
    }

    /// Match this rule against `remaining`.
    ///
    /// On a match, returns the token and the text left once the token and
    /// its adjacent separators are removed.
    pub fn extract<'a>(&self, remaining: &'a str) -> Option<(&'a str, &'a str)> {
        let caps = self.regex.captures(remaining)?;
        let token = TOKEN_GROUPS.iter().find_map(|g| caps.name(g))?;

        let rest = match self.anchor {
            Anchor::Prefix => trim_separators_start(&remaining[token.end()..]),
            Anchor::Suffix => trim_separators_end(&remaining[..token.start()]),
        };

        Some((token.as_str(), rest))
    }
}

/// The grammar rules in application order.
pub fn rules() -> &'static [Rule] {
    static RULES: OnceLock<Vec<Rule>> = OnceLock::new();
    RULES.get_or_init(|| {
        vec![
            Rule::new(
                Field::Dimension,
                Anchor::Prefix,
                r"(?i)^(?P<tok>\d{1,5}(?:(?:\.\d{1,3})?%|(?:[cm]m|in|px)?\s*x\s*\d{1,5}(?:[cm]m|in|px)?))",
            ),
            Rule::new(
                Field::Quality,
                Anchor::Suffix,
                r"(?i)\.(?:gif|jpe?g|png)(?P<tok>(?:100|[1-9]\d?)%?)$",
            ),
            Rule::new(
                Field::Extension,
                Anchor::Suffix,
                r"(?i)(?P<tok>\.(?:gif|jpe?g|png))$",
            ),
            Rule::new(
                Field::Density,
                Anchor::Suffix,
                r"(?i)(?:(?:^|[-_\s])(?P<tok>@?[1-9](?:\.\d+)?x?)|(?P<glued>@[1-9](?:\.\d+)?x?))$",
            ),
            Rule::new(
                Field::Breakpoint,
                Anchor::Suffix,
                &format!(r"(?i)(?:^|[-_\s])(?P<tok>{})$", SYNONYM_PATTERN),
            ),
        ]
    })
}

/// Cheap pre-filter: does `s` mention an image extension anywhere?
pub fn has_asset_extension(s: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\.(?:gif|jpe?g|png)").expect("valid extension regex"))
        .is_match(s)
}

fn is_separator(c: char) -> bool {
    c == '-' || c == '_' || c.is_whitespace()
}

fn trim_separators_start(s: &str) -> &str {
    s.trim_start_matches(is_separator)
}

fn trim_separators_end(s: &str) -> &str {
    s.trim_end_matches(is_separator)
}
