// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structured-event output.
//!
//! Layouts are written out as a stream of element events into a
//! [`ContentHandler`], the way a streaming XML consumer receives a document.
//! Document boundaries default to no-ops, so a handler only has to deal with
//! elements.
//!
//! `Vec<ContentEvent>` implements [`ContentHandler`] and records everything it
//! receives, which is what tests and the `folio_debug` exporters consume.
//! [`NoopHandler`] discards everything.

use std::error::Error;

/// A boxed error returned by a [`ContentHandler`].
pub type SinkError = Box<dyn Error + Send + Sync + 'static>;

/// Ordered `name = value` attribute pairs of one element.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Attributes {
    pairs: Vec<(&'static str, String)>,
}

impl Attributes {
    /// Creates an empty attribute list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an attribute.
    pub fn push(&mut self, name: &'static str, value: impl Into<String>) {
        self.pairs.push((name, value.into()));
    }

    /// Appends an attribute, builder style.
    #[must_use]
    pub fn with(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.push(name, value);
        self
    }

    /// Returns the value of the first attribute called `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the attributes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.pairs.iter().map(|(n, v)| (*n, v.as_str()))
    }

    /// Returns the number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns whether there are no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Receives a layout as a sequence of structured events.
///
/// Any error aborts the output and is reported to the caller as
/// [`LayoutError::Sink`](crate::error::LayoutError::Sink).
pub trait ContentHandler {
    /// Called once before any element.
    fn start_document(&mut self) -> Result<(), SinkError> {
        Ok(())
    }

    /// Called once after the last element.
    fn end_document(&mut self) -> Result<(), SinkError> {
        Ok(())
    }

    /// Called when an element opens.
    fn start_element(&mut self, name: &str, attributes: &Attributes) -> Result<(), SinkError>;

    /// Called when an element closes.
    fn end_element(&mut self, name: &str) -> Result<(), SinkError>;
}

/// One recorded [`ContentHandler`] call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContentEvent {
    /// [`ContentHandler::start_document`].
    StartDocument,
    /// [`ContentHandler::end_document`].
    EndDocument,
    /// [`ContentHandler::start_element`].
    StartElement {
        /// Element name.
        name: String,
        /// Element attributes.
        attributes: Attributes,
    },
    /// [`ContentHandler::end_element`].
    EndElement {
        /// Element name.
        name: String,
    },
}

impl ContentEvent {
    /// Returns the element name for element events.
    #[must_use]
    pub fn element_name(&self) -> Option<&str> {
        match self {
            Self::StartElement { name, .. } | Self::EndElement { name } => Some(name),
            Self::StartDocument | Self::EndDocument => None,
        }
    }

    /// Returns the attributes of a start-element event.
    #[must_use]
    pub fn attributes(&self) -> Option<&Attributes> {
        match self {
            Self::StartElement { attributes, .. } => Some(attributes),
            _ => None,
        }
    }
}

impl ContentHandler for Vec<ContentEvent> {
    fn start_document(&mut self) -> Result<(), SinkError> {
        self.push(ContentEvent::StartDocument);
        Ok(())
    }

    fn end_document(&mut self) -> Result<(), SinkError> {
        self.push(ContentEvent::EndDocument);
        Ok(())
    }

    fn start_element(&mut self, name: &str, attributes: &Attributes) -> Result<(), SinkError> {
        self.push(ContentEvent::StartElement {
            name: name.to_owned(),
            attributes: attributes.clone(),
        });
        Ok(())
    }

    fn end_element(&mut self, name: &str) -> Result<(), SinkError> {
        self.push(ContentEvent::EndElement {
            name: name.to_owned(),
        });
        Ok(())
    }
}

/// A [`ContentHandler`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopHandler;

impl ContentHandler for NoopHandler {
    fn start_element(&mut self, name: &str, attributes: &Attributes) -> Result<(), SinkError> {
        _ = (name, attributes);
        Ok(())
    }

    fn end_element(&mut self, name: &str) -> Result<(), SinkError> {
        _ = name;
        Ok(())
    }
}
