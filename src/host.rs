//! Capabilities the core needs from its host.
//!
//! The core never touches a concrete document or file type. A host hands it
//! a `LayerSource` to walk and a `TextSink` to write markup into.

use std::io::{self, Write};

/// A tree of named layers, walked depth-first.
pub trait LayerSource {
    /// Handle to one layer.
    type Node;

    /// Top-level layers in document order.
    fn roots(&self) -> Vec<Self::Node>;

    /// The layer's name.
    fn name_of(&self, node: &Self::Node) -> String;

    /// Child layers of a group, or `None` for a plain layer.
    fn children_of(&self, node: &Self::Node) -> Option<Vec<Self::Node>>;
}

/// Line-oriented text output.
pub trait TextSink {
    fn write_line(&mut self, line: &str) -> io::Result<()>;
}

impl TextSink for String {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.push_str(line);
        self.push('\n');
        Ok(())
    }
}

impl TextSink for Vec<String> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.push(line.to_string());
        Ok(())
    }
}

/// Adapts any `io::Write` (a file, stdout) into a `TextSink`.
pub struct WriteSink<W: Write> {
    inner: W,
}

impl<W: Write> WriteSink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Flush and return the wrapped writer.
    pub fn into_inner(mut self) -> io::Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

impl<W: Write> TextSink for WriteSink<W> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.inner, "{}", line)
    }
}
