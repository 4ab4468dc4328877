//! Responsive breakpoints.
//!
//! Breakpoints form a fixed total order `xs < s < m < l < xl`. Each one has a
//! default maximum viewport width that the markup generator falls back to
//! when no override is configured.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::diagnostic::{Diagnostic, Diagnostics};

/// A named responsive tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    Xs,
    S,
    M,
    L,
    Xl,
}

impl Breakpoint {
    /// Every breakpoint, smallest first.
    pub const ALL: [Breakpoint; 5] = [
        Breakpoint::Xs,
        Breakpoint::S,
        Breakpoint::M,
        Breakpoint::L,
        Breakpoint::Xl,
    ];

    /// Position in the total order (0 for `xs`).
    pub fn order(self) -> usize {
        self as usize
    }

    /// The canonical short code (`xs`, `s`, `m`, `l`, `xl`).
    pub fn code(self) -> &'static str {
        match self {
            Breakpoint::Xs => "xs",
            Breakpoint::S => "s",
            Breakpoint::M => "m",
            Breakpoint::L => "l",
            Breakpoint::Xl => "xl",
        }
    }

    /// Default maximum width in pixels.
    pub fn default_max_width(self) -> f64 {
        match self {
            Breakpoint::Xs => 320.0,
            Breakpoint::S => 480.0,
            Breakpoint::M => 768.0,
            Breakpoint::L => 1280.0,
            Breakpoint::Xl => 1920.0,
        }
    }

    /// The next smaller breakpoint, if any.
    pub fn smaller(self) -> Option<Breakpoint> {
        self.order().checked_sub(1).map(|i| Self::ALL[i])
    }

    /// Map a free-text synonym to a breakpoint.
    ///
    /// Matching is case-insensitive:
    /// - `"s"`, `"sm"`, `"sml"`, `"small"` → `s`
    /// - `"m"`, `"med"`, `"medium"` → `m`
    /// - `"l"`, `"lg"`, `"lge"`, `"large"` → `l`
    /// - an `x`/`ex`/`extra` prefix (repeatable, dashes allowed) promotes
    ///   small to `xs` and large to `xl`: `"xxl"`, `"extra-large"`, `"x-small"`
    ///
    /// Returns `None` for anything else, including the empty string.
    pub fn parse_synonym(s: &str) -> Option<Breakpoint> {
        let caps = synonym_regex().captures(s.trim())?;
        let extra = caps.name("extra").is_some();

        if caps.name("medium").is_some() {
            Some(Breakpoint::M)
        } else if caps.name("small").is_some() {
            Some(if extra { Breakpoint::Xs } else { Breakpoint::S })
        } else if caps.name("large").is_some() {
            Some(if extra { Breakpoint::Xl } else { Breakpoint::L })
        } else {
            None
        }
    }

    /// Total form of [`Breakpoint::parse_synonym`]: unmatched input falls
    /// into the smallest breakpoint.
    pub fn from_synonym(s: &str) -> Breakpoint {
        Self::parse_synonym(s).unwrap_or(Breakpoint::Xs)
    }
}

/// Regex source for a breakpoint synonym, without anchors.
///
/// Shared with the declaration grammar so both agree on what a breakpoint
/// token looks like.
pub(crate) const SYNONYM_PATTERN: &str =
    r"m(?:ed(?:ium)?)?|(?:(?:e?x(?:tra)?)-*)*(?:s(?:m(?:al)?l|m)?|l(?:arge|ge|g)?)";

fn synonym_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)^(?:(?P<medium>m(?:ed(?:ium)?)?)|(?P<extra>(?:e?x(?:tra)?-*)+)?(?:(?P<small>s(?:m(?:al)?l|m)?)|(?P<large>l(?:arge|ge|g)?)))$",
        )
        .expect("valid breakpoint regex")
    })
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Breakpoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Breakpoint::parse_synonym(s).ok_or_else(|| format!("unknown breakpoint '{}'", s))
    }
}

/// Resolved maximum widths, one per breakpoint.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MaxWidths {
    overrides: BTreeMap<Breakpoint, f64>,
}

impl MaxWidths {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an explicit width for a breakpoint.
    pub fn set(&mut self, breakpoint: Breakpoint, width: f64) {
        self.overrides.insert(breakpoint, width);
    }

    /// Builder-style [`MaxWidths::set`].
    pub fn with(mut self, breakpoint: Breakpoint, width: f64) -> Self {
        self.set(breakpoint, width);
        self
    }

    /// The override for `breakpoint`, or its default width.
    pub fn get(&self, breakpoint: Breakpoint) -> f64 {
        self.overrides
            .get(&breakpoint)
            .copied()
            .unwrap_or_else(|| breakpoint.default_max_width())
    }

    /// Resolve user-supplied override text (`"480"`, `"480px"`, `"1280.5"`).
    ///
    /// Values without a leading number are dropped with an
    /// `UnresolvedBreakpointOverride` warning; that breakpoint keeps its
    /// default width.
    pub fn resolve<'a, I>(raw: I) -> (Self, Diagnostics)
    where
        I: IntoIterator<Item = (Breakpoint, &'a str)>,
    {
        let mut widths = Self::new();
        let mut diagnostics = Diagnostics::new();

        for (breakpoint, text) in raw {
            match parse_width(text) {
                Some(width) => widths.set(breakpoint, width),
                None => diagnostics.push(
                    Diagnostic::warning(
                        "resimg::config::unresolved-breakpoint-override",
                        format!(
                            "Max width '{}' for breakpoint '{}' is not a number; using {}px",
                            text,
                            breakpoint,
                            breakpoint.default_max_width()
                        ),
                    )
                    .with_help("Use a pixel value such as 768 or 768px"),
                ),
            }
        }

        (widths, diagnostics)
    }
}

/// Extract the first number in `text` (`"480px"` → 480).
pub fn parse_width(text: &str) -> Option<f64> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\d+(?:\.\d+)?").expect("valid width regex"));
    re.find(text).and_then(|m| m.as_str().parse().ok())
}
