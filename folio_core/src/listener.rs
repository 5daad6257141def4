// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout change notification.
//!
//! A [`LayoutEventListener`] registered with a layout manager is called
//! synchronously after each successful mutation, once the manager's lock has
//! been released. All methods default to no-ops, so implementing only the
//! events you care about is fine.

use crate::node::{NodeDescription, NodeId, NodeType};

/// A node was added or updated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeEvent {
    /// The node concerned.
    pub node_id: NodeId,
    /// Its parent, `None` for the root.
    pub parent_id: Option<NodeId>,
    /// Its description after the change.
    pub description: NodeDescription,
}

/// A node was moved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeMoveEvent {
    /// The node concerned.
    pub node_id: NodeId,
    /// Its parent before the move.
    pub old_parent_id: NodeId,
    /// Its parent after the move.
    pub parent_id: NodeId,
    /// Its description.
    pub description: NodeDescription,
}

/// A node was deleted, along with its subtree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeDeleteEvent {
    /// The deleted node. The id no longer resolves.
    pub node_id: NodeId,
    /// Its former parent.
    pub old_parent_id: NodeId,
    /// Its description at the time of deletion.
    pub description: NodeDescription,
    /// How many nodes were removed, the node itself included.
    pub removed: usize,
}

impl NodeEvent {
    /// Returns the type of the node concerned.
    #[must_use]
    pub const fn node_type(&self) -> NodeType {
        self.description.node_type()
    }
}

impl NodeMoveEvent {
    /// Returns the type of the node concerned.
    #[must_use]
    pub const fn node_type(&self) -> NodeType {
        self.description.node_type()
    }
}

impl NodeDeleteEvent {
    /// Returns the type of the node concerned.
    #[must_use]
    pub const fn node_type(&self) -> NodeType {
        self.description.node_type()
    }
}

/// Observes a layout manager.
///
/// Listeners are shared (`Arc`) and may be called from whichever thread
/// performed the mutation. A listener may call back into the manager.
pub trait LayoutEventListener: Send + Sync {
    /// Called after a node was added.
    fn node_added(&self, event: &NodeEvent) {
        _ = event;
    }

    /// Called after a node was moved.
    fn node_moved(&self, event: &NodeMoveEvent) {
        _ = event;
    }

    /// Called after a node's description was replaced.
    fn node_updated(&self, event: &NodeEvent) {
        _ = event;
    }

    /// Called after a node and its subtree were deleted.
    fn node_deleted(&self, event: &NodeDeleteEvent) {
        _ = event;
    }

    /// Called after the whole layout was replaced.
    fn layout_loaded(&self, layout_id: u32) {
        _ = layout_id;
    }
}

/// One notification, queued while the manager holds its lock and delivered
/// after it is released.
#[derive(Clone, Debug)]
pub(crate) enum Notification {
    Added(NodeEvent),
    Moved(NodeMoveEvent),
    Updated(NodeEvent),
    Deleted(NodeDeleteEvent),
    Loaded(u32),
}

impl Notification {
    pub(crate) fn deliver(&self, listener: &dyn LayoutEventListener) {
        match self {
            Self::Added(e) => listener.node_added(e),
            Self::Moved(e) => listener.node_moved(e),
            Self::Updated(e) => listener.node_updated(e),
            Self::Deleted(e) => listener.node_deleted(e),
            Self::Loaded(id) => listener.layout_loaded(*id),
        }
    }
}
