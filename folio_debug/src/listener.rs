// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A listener that logs layout events.

use log::Level;

use folio_core::listener::{LayoutEventListener, NodeDeleteEvent, NodeEvent, NodeMoveEvent};

/// Logs every layout event through the `log` facade.
#[derive(Clone, Copy, Debug)]
pub struct LogListener {
    level: Level,
}

impl Default for LogListener {
    fn default() -> Self {
        Self::new(Level::Info)
    }
}

impl LogListener {
    /// Creates a listener logging at `level`.
    #[must_use]
    pub const fn new(level: Level) -> Self {
        Self { level }
    }

    /// Returns the level events are logged at.
    #[must_use]
    pub const fn level(&self) -> Level {
        self.level
    }
}

impl LayoutEventListener for LogListener {
    fn node_added(&self, e: &NodeEvent) {
        log::log!(
            self.level,
            "[added] {} {} {:?} under {}",
            e.node_type(),
            e.node_id,
            e.description.name,
            e.parent_id.map_or_else(|| "-".to_owned(), |p| p.to_string()),
        );
    }

    fn node_moved(&self, e: &NodeMoveEvent) {
        log::log!(
            self.level,
            "[moved] {} {} {:?} from {} to {}",
            e.node_type(),
            e.node_id,
            e.description.name,
            e.old_parent_id,
            e.parent_id,
        );
    }

    fn node_updated(&self, e: &NodeEvent) {
        log::log!(
            self.level,
            "[updated] {} {} {:?}",
            e.node_type(),
            e.node_id,
            e.description.name,
        );
    }

    fn node_deleted(&self, e: &NodeDeleteEvent) {
        log::log!(
            self.level,
            "[deleted] {} {} {:?} from {} ({} nodes)",
            e.node_type(),
            e.node_id,
            e.description.name,
            e.old_parent_id,
            e.removed,
        );
    }

    fn layout_loaded(&self, layout_id: u32) {
        log::log!(self.level, "[loaded] layout {layout_id}");
    }
}
