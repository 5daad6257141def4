// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON storage for layouts.
//!
//! A stand-in for a persistence collaborator: layouts are stored as their
//! nested [`LayoutDocument`] form.

use thiserror::Error;

use folio_core::LayoutError;
use folio_core::layout::{LayoutDocument, UserLayout};

/// Errors reported when loading a stored layout.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The text is not a well-formed layout document.
    #[error("layout document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The document describes an invalid layout.
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Serializes a layout document as pretty JSON.
pub fn to_json(document: &LayoutDocument) -> serde_json::Result<String> {
    serde_json::to_string_pretty(document)
}

/// Parses a layout document.
pub fn from_json(text: &str) -> serde_json::Result<LayoutDocument> {
    serde_json::from_str(text)
}

/// Stores a layout as JSON.
pub fn save(layout: &UserLayout) -> serde_json::Result<String> {
    to_json(&layout.to_document())
}

/// Loads and validates a layout stored by [`save`].
pub fn load(text: &str) -> Result<UserLayout, DocumentError> {
    let document = from_json(text)?;
    let layout = UserLayout::from_document(&document)?;
    log::debug!(
        "loaded layout {} with {} nodes",
        layout.layout_id(),
        layout.node_count()
    );
    Ok(layout)
}
