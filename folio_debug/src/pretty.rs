// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable layout output.
//!
//! [`PrettyPrintHandler`] implements [`ContentHandler`] and writes indented,
//! XML-like markup to a [`Write`](std::io::Write) destination (default:
//! stderr). Elements without children are written in their self-closing
//! form.

use std::io::Write;

use folio_core::sink::{Attributes, ContentHandler, SinkError};

/// Writes indented markup to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintHandler<W: Write = Box<dyn Write>> {
    writer: W,
    depth: usize,
    /// Start tag written up to its closing `>`, held back until we know
    /// whether the element has children.
    pending: Option<String>,
}

impl<W: Write> std::fmt::Debug for PrettyPrintHandler<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintHandler")
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintHandler {
    /// Creates a handler that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::with_writer(Box::new(std::io::stderr()))
    }
}

impl<W: Write> PrettyPrintHandler<W> {
    /// Creates a handler that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            depth: 0,
            pending: None,
        }
    }

    /// Returns the destination.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn flush_pending(&mut self) -> std::io::Result<()> {
        match self.pending.take() {
            Some(tag) => writeln!(self.writer, "{tag}>"),
            None => Ok(()),
        }
    }
}

impl<W: Write> ContentHandler for PrettyPrintHandler<W> {
    fn end_document(&mut self) -> Result<(), SinkError> {
        self.flush_pending()?;
        self.writer.flush()?;
        Ok(())
    }

    fn start_element(&mut self, name: &str, attributes: &Attributes) -> Result<(), SinkError> {
        self.flush_pending()?;
        let mut tag = format!("{:indent$}<{name}", "", indent = self.depth * 2);
        for (key, value) in attributes.iter() {
            tag.push_str(&format!(" {key}=\"{}\"", escape(value)));
        }
        self.pending = Some(tag);
        self.depth += 1;
        Ok(())
    }

    fn end_element(&mut self, name: &str) -> Result<(), SinkError> {
        self.depth = self.depth.saturating_sub(1);
        match self.pending.take() {
            Some(tag) => writeln!(self.writer, "{tag}/>")?,
            None => writeln!(
                self.writer,
                "{:indent$}</{name}>",
                "",
                indent = self.depth * 2
            )?,
        }
        Ok(())
    }
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::config::LayoutConfig;
    use folio_core::layout::UserLayout;
    use folio_core::node::{NodeDescription, NodeId};
    use folio_core::serialize::Markings;

    fn render(layout: &UserLayout, markings: &Markings) -> String {
        let mut handler = PrettyPrintHandler::with_writer(Vec::new());
        let result = layout.write(&LayoutConfig::standard(), markings, &mut handler);
        assert!(result.is_ok(), "write failed: {result:?}");
        String::from_utf8(handler.into_inner()).unwrap_or_default()
    }

    #[test]
    fn nests_and_self_closes() -> folio_core::Result<()> {
        let mut layout = UserLayout::new(2);
        let tab = layout.insert(NodeId::ROOT, None, NodeDescription::folder("Tab & Co"))?;
        layout.insert(tab, None, NodeDescription::channel("News", "news"))?;

        let text = render(&layout, &Markings::default());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "<layout ID=\"2\">");
        assert!(lines[1].starts_with("  <folder ID=\"root\""));
        assert!(lines[2].contains("name=\"Tab &amp; Co\""));
        assert!(lines[3].starts_with("      <channel "));
        assert!(lines[3].ends_with("/>"));
        assert_eq!(lines[4], "    </folder>");
        assert_eq!(lines[6], "</layout>");
        Ok(())
    }

    #[test]
    fn stderr_handler_writes_a_layout() {
        let mut handler = PrettyPrintHandler::stderr();
        let result = UserLayout::new(2).write(
            &LayoutConfig::standard(),
            &Markings::default(),
            &mut handler,
        );
        assert!(result.is_ok(), "write failed: {result:?}");
    }

    #[test]
    fn markers_render_as_empty_elements() {
        let layout = UserLayout::new(2);
        let markings = Markings {
            add: Some(NodeDescription::folder("new")),
            move_node: None,
        };
        let text = render(&layout, &markings);
        assert!(text.contains("    <addTarget parentID=\"root\"/>"));
    }
}
