// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON export of recorded layout output.
//!
//! [`export`] takes the events recorded by a `Vec<ContentEvent>` handler and
//! writes them as a nested JSON element tree:
//!
//! ```json
//! [{ "name": "layout", "attributes": { "ID": "1" }, "children": [ ... ] }]
//! ```

use std::io::{self, Write};

use serde_json::{Map, Value, json};

use folio_core::sink::ContentEvent;

/// Builds the element tree for the recorded events.
///
/// Document boundaries are dropped. Unbalanced end events are ignored, and
/// elements still open at the end are closed implicitly.
#[must_use]
pub fn to_value(events: &[ContentEvent]) -> Value {
    let mut roots: Vec<Value> = Vec::new();
    let mut open: Vec<Value> = Vec::new();

    for event in events {
        match event {
            ContentEvent::StartElement { name, attributes } => {
                let attributes: Map<String, Value> = attributes
                    .iter()
                    .map(|(k, v)| (k.to_owned(), Value::from(v)))
                    .collect();
                open.push(json!({
                    "name": name,
                    "attributes": attributes,
                    "children": [],
                }));
            }
            ContentEvent::EndElement { .. } => {
                if let Some(element) = open.pop() {
                    attach(&mut open, &mut roots, element);
                }
            }
            ContentEvent::StartDocument | ContentEvent::EndDocument => {}
        }
    }
    while let Some(element) = open.pop() {
        attach(&mut open, &mut roots, element);
    }

    Value::Array(roots)
}

fn attach(open: &mut [Value], roots: &mut Vec<Value>, element: Value) {
    match open
        .last_mut()
        .and_then(|parent| parent.get_mut("children"))
        .and_then(Value::as_array_mut)
    {
        Some(children) => children.push(element),
        None => roots.push(element),
    }
}

/// Writes the element tree for the recorded events as pretty JSON.
pub fn export(events: &[ContentEvent], writer: &mut dyn Write) -> io::Result<()> {
    serde_json::to_writer_pretty(writer, &to_value(events))?;
    Ok(())
}
