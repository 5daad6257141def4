// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change collection.
//!
//! Collection drains each dirty channel in turn:
//!
//! 1. **STRUCTURE**: slots whose child list changed, plus newly inserted
//!    slots.
//! 2. **DESCRIPTION**: slots whose description was replaced.
//!
//! The lifecycle lists (`added`, `removed`) are swapped out of the layout so
//! the next collection starts empty.
//!
//! [`LayoutChanges`] uses raw slot indices (`u32`) rather than [`NodeId`]
//! handles; a removed slot may already have been reused by the time the
//! changes are read.
//!
//! [`UserLayout::fingerprint`] condenses the current composition into one
//! hash, so a consumer can tell two trees apart without diffing them.
//!
//! [`NodeId`]: crate::node::NodeId

use core::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

use crate::dirty;
use crate::node::NodeId;

use super::store::UserLayout;
use super::traverse::Descendants;

/// The set of changes produced by a single [`UserLayout::collect_changes`]
/// call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LayoutChanges {
    /// Slots whose child list changed.
    pub restructured: Vec<u32>,
    /// Slots whose description was replaced.
    pub redescribed: Vec<u32>,
    /// Slots allocated since the last collection.
    pub added: Vec<u32>,
    /// Slots released since the last collection.
    pub removed: Vec<u32>,
}

impl LayoutChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.restructured.clear();
        self.redescribed.clear();
        self.added.clear();
        self.removed.clear();
    }

    /// Returns whether nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.restructured.is_empty()
            && self.redescribed.is_empty()
            && self.added.is_empty()
            && self.removed.is_empty()
    }
}

impl UserLayout {
    /// Drains the dirty channels and returns everything that changed since
    /// the previous call.
    pub fn collect_changes(&mut self) -> LayoutChanges {
        let mut changes = LayoutChanges::default();
        self.collect_changes_into(&mut changes);
        changes
    }

    /// Like [`collect_changes`](Self::collect_changes), but reuses a
    /// caller-provided buffer.
    pub fn collect_changes_into(&mut self, changes: &mut LayoutChanges) {
        changes.clear();

        changes.restructured = self
            .dirty
            .drain(dirty::STRUCTURE)
            .deterministic()
            .run()
            .collect();

        changes.redescribed = self
            .dirty
            .drain(dirty::DESCRIPTION)
            .deterministic()
            .run()
            .collect();

        core::mem::swap(&mut self.pending_added, &mut changes.added);
        core::mem::swap(&mut self.pending_removed, &mut changes.removed);
    }

    /// Hashes the tree's composition: every live node in pre-order, with its
    /// id, its parent slot and its description.
    ///
    /// Equal fingerprints mean the same nodes under the same ids in the same
    /// places, up to hash collisions. The value is stable across processes.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = FxHasher::default();
        for id in Descendants::new(self, NodeId::ROOT.idx) {
            id.hash(&mut hasher);
            self.parent[id.idx as usize].hash(&mut hasher);
            self.description[id.idx as usize].hash(&mut hasher);
        }
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::error::Result;
    use crate::layout::UserLayout;
    use crate::node::{NodeDescription, NodeId};

    #[test]
    fn insert_reports_parent_and_child() -> Result<()> {
        let mut layout = UserLayout::new(1);
        let _ = layout.collect_changes();

        let tab = layout.insert(NodeId::ROOT, None, NodeDescription::folder("tab"))?;
        let changes = layout.collect_changes();
        assert!(changes.restructured.contains(&NodeId::ROOT.index()));
        assert!(changes.restructured.contains(&tab.index()));
        assert_eq!(changes.added, vec![tab.index()]);
        Ok(())
    }

    #[test]
    fn collection_drains() -> Result<()> {
        let mut layout = UserLayout::new(1);
        layout.insert(NodeId::ROOT, None, NodeDescription::folder("tab"))?;
        assert!(!layout.collect_changes().is_empty());
        assert!(layout.collect_changes().is_empty());
        Ok(())
    }

    #[test]
    fn update_reports_description() -> Result<()> {
        let mut layout = UserLayout::new(1);
        let news = layout.insert(NodeId::ROOT, None, NodeDescription::channel("n", "news"))?;
        let _ = layout.collect_changes();

        layout.update(news, NodeDescription::channel("n", "sports"))?;
        let changes = layout.collect_changes();
        assert_eq!(changes.redescribed, vec![news.index()]);
        assert!(changes.restructured.is_empty());
        Ok(())
    }

    #[test]
    fn remove_reports_released_slots() -> Result<()> {
        let mut layout = UserLayout::new(1);
        let tab = layout.insert(NodeId::ROOT, None, NodeDescription::folder("tab"))?;
        let a = layout.insert(tab, None, NodeDescription::channel("a", "a"))?;
        let _ = layout.collect_changes();

        layout.remove(tab)?;
        let changes = layout.collect_changes();
        assert!(changes.removed.contains(&tab.index()));
        assert!(changes.removed.contains(&a.index()));
        assert!(changes.restructured.contains(&NodeId::ROOT.index()));
        Ok(())
    }

    #[test]
    fn fingerprint_follows_composition() -> Result<()> {
        let build = || -> Result<(UserLayout, NodeId, NodeId)> {
            let mut layout = UserLayout::new(1);
            let tab = layout.insert(NodeId::ROOT, None, NodeDescription::folder("tab"))?;
            let a = layout.insert(tab, None, NodeDescription::channel("a", "a"))?;
            Ok((layout, tab, a))
        };
        let (mut layout, tab, a) = build()?;
        let (twin, _, _) = build()?;
        let empty = UserLayout::new(1);

        let before = layout.fingerprint();
        assert_eq!(twin.fingerprint(), before);
        assert_eq!(layout.clone().fingerprint(), before);
        assert_ne!(empty.fingerprint(), before);

        layout.relocate(a, NodeId::ROOT, Some(tab))?;
        let moved = layout.fingerprint();
        assert_ne!(moved, before);
        layout.relocate(a, tab, None)?;
        assert_eq!(layout.fingerprint(), before);

        layout.update(a, NodeDescription::channel("renamed", "a"))?;
        assert_ne!(layout.fingerprint(), before);
        Ok(())
    }

    #[test]
    fn fingerprint_sees_node_ids() -> Result<()> {
        let mut reused = UserLayout::new(1);
        let first = reused.insert(NodeId::ROOT, None, NodeDescription::channel("a", "a"))?;
        reused.remove(first)?;
        reused.insert(NodeId::ROOT, None, NodeDescription::channel("a", "a"))?;

        let mut fresh = UserLayout::new(1);
        fresh.insert(NodeId::ROOT, None, NodeDescription::channel("a", "a"))?;

        // Same shape, but the output would name the channel differently.
        assert_ne!(reused.fingerprint(), fresh.fingerprint());
        Ok(())
    }
}
