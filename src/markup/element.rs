//! A tiny element tree and its pretty printer.
//!
//! Elements are printed one attribute per line. List attributes (`srcset`)
//! put each entry on its own line, comma-separated:
//!
//! ```text
//! <img
//!   src="/images/a.png"
//!   srcset="
//!     /images/a-2x.png 2x
//!   "
//! />
//! ```

use std::io;

use crate::host::TextSink;

/// Elements written as `<tag ... />` with no closing tag.
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "link", "meta", "source", "wbr"];

const INDENT: &str = "  ";

/// An attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Inline(String),
    List(Vec<String>),
}

/// An HTML element.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: &'static str,
    pub attrs: Vec<(&'static str, AttrValue)>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, AttrValue::Inline(value.into())));
        self
    }

    pub fn list_attr(mut self, name: &'static str, entries: Vec<String>) -> Self {
        self.attrs.push((name, AttrValue::List(entries)));
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn is_void(&self) -> bool {
        VOID_ELEMENTS.contains(&self.tag)
    }

    /// Write this element and its children, starting at `depth`.
    pub fn render(&self, depth: usize, sink: &mut dyn TextSink) -> io::Result<()> {
        let indent = INDENT.repeat(depth);

        if self.attrs.is_empty() {
            if self.is_void() {
                return sink.write_line(&format!("{indent}<{} />", self.tag));
            }
            sink.write_line(&format!("{indent}<{}>", self.tag))?;
        } else {
            sink.write_line(&format!("{indent}<{}", self.tag))?;
            for (name, value) in &self.attrs {
                self.render_attr(&indent, name, value, sink)?;
            }
            if self.is_void() {
                return sink.write_line(&format!("{indent}/>"));
            }
            sink.write_line(&format!("{indent}>"))?;
        }

        for child in &self.children {
            child.render(depth + 1, sink)?;
        }
        sink.write_line(&format!("{indent}</{}>", self.tag))
    }

    fn render_attr(
        &self,
        indent: &str,
        name: &str,
        value: &AttrValue,
        sink: &mut dyn TextSink,
    ) -> io::Result<()> {
        match value {
            AttrValue::Inline(value) => {
                sink.write_line(&format!("{indent}{INDENT}{name}=\"{}\"", escape_attr(value)))
            }
            AttrValue::List(entries) => {
                sink.write_line(&format!("{indent}{INDENT}{name}=\""))?;
                let last = entries.len().saturating_sub(1);
                for (i, entry) in entries.iter().enumerate() {
                    let comma = if i < last { "," } else { "" };
                    sink.write_line(&format!(
                        "{indent}{INDENT}{INDENT}{}{comma}",
                        escape_attr(entry)
                    ))?;
                }
                sink.write_line(&format!("{indent}{INDENT}\""))
            }
        }
    }
}

/// Escape text for use inside a double-quoted attribute.
pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
