// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree traversal utilities.

use crate::node::{INVALID, NodeId};

use super::store::UserLayout;

/// An iterator over the direct children of a node.
///
/// Created by [`UserLayout::children`].
#[derive(Debug)]
pub struct Children<'a> {
    layout: &'a UserLayout,
    current: u32,
}

impl<'a> Children<'a> {
    pub(crate) fn new(layout: &'a UserLayout, first: u32) -> Self {
        Self {
            layout,
            current: first,
        }
    }
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.current == INVALID {
            return None;
        }
        let idx = self.current;
        self.current = self.layout.next_sibling[idx as usize];
        Some(self.layout.id_at(idx))
    }
}

/// A pre-order iterator over a node and its descendants.
///
/// Created by [`UserLayout::descendants`]. Walks the sibling links directly,
/// so it needs no stack.
#[derive(Debug)]
pub struct Descendants<'a> {
    layout: &'a UserLayout,
    start: u32,
    current: u32,
}

impl<'a> Descendants<'a> {
    pub(crate) fn new(layout: &'a UserLayout, start: u32) -> Self {
        Self {
            layout,
            start,
            current: start,
        }
    }

    /// Returns the pre-order successor of `idx` within the subtree.
    fn successor(&self, idx: u32) -> u32 {
        let layout = self.layout;
        let child = layout.first_child[idx as usize];
        if child != INVALID {
            return child;
        }
        let mut n = idx;
        while n != self.start {
            let next = layout.next_sibling[n as usize];
            if next != INVALID {
                return next;
            }
            n = layout.parent[n as usize];
        }
        INVALID
    }
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.current == INVALID {
            return None;
        }
        let idx = self.current;
        self.current = self.successor(idx);
        Some(self.layout.id_at(idx))
    }
}
