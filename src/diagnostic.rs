//! Diagnostics collected while scanning layer names.
//!
//! Problems with individual declarations never abort a scan. They are
//! recorded here as warnings and reported alongside whatever did parse.
//! Failures that stop a command are `ResimgError`s instead.

use serde::Serialize;

/// A single warning.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    /// Machine-readable code (e.g. "resimg::parse::malformed").
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Optional help text suggesting how to fix the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

impl Diagnostic {
    /// Create a warning diagnostic.
    pub fn warning(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            help: None,
        }
    }

    /// Add help text to this diagnostic.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

/// An ordered list of diagnostics.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    diagnostics: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Add a warning diagnostic.
    pub fn warning(&mut self, code: impl Into<String>, message: impl Into<String>) {
        self.push(Diagnostic::warning(code, message));
    }

    /// Check if there are no diagnostics at all.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Number of diagnostics.
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Append another list to this one.
    pub fn merge(&mut self, other: Diagnostics) {
        self.diagnostics.extend(other.diagnostics);
    }

    /// Iterate over diagnostics.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }
}

/// Print diagnostics to stderr.
pub fn print_diagnostics(diagnostics: &Diagnostics) {
    for d in diagnostics.iter() {
        eprintln!("  warning[{}]: {}", d.code, d.message);
        if let Some(help) = &d.help {
            eprintln!("    help: {}", help);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_list() {
        let diagnostics = Diagnostics::new();
        assert!(diagnostics.is_empty());
        assert_eq!(diagnostics.len(), 0);
    }

    #[test]
    fn test_warning_diagnostic() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.warning("resimg::test", "something looks off");

        assert!(!diagnostics.is_empty());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.iter().next().unwrap().code, "resimg::test");
    }

    #[test]
    fn test_merge() {
        let mut a = Diagnostics::new();
        a.push(Diagnostic::warning("resimg::a", "warning a").with_help("help a"));

        let mut b = Diagnostics::new();
        b.warning("resimg::b", "warning b");

        a.merge(b);
        assert_eq!(a.len(), 2);
        let codes: Vec<&str> = a.iter().map(|d| d.code.as_str()).collect();
        assert_eq!(codes, vec!["resimg::a", "resimg::b"]);
    }

    #[test]
    fn test_diagnostic_with_help() {
        let d = Diagnostic::warning("resimg::test", "empty name")
            .with_help("Put a file name before the extension");
        assert_eq!(d.help.as_deref(), Some("Put a file name before the extension"));
    }

    #[test]
    fn test_serializes_as_list() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.warning("resimg::test", "odd");

        let json = serde_json::to_value(&diagnostics).unwrap();
        assert_eq!(json[0]["code"], "resimg::test");
        assert_eq!(json[0]["message"], "odd");
        assert!(json[0].get("help").is_none());
    }
}
