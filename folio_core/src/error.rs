// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The layout domain error.
//!
//! Every fallible operation in this crate reports a [`LayoutError`]. Permission
//! predicates (`can_*`) never use it for an ordinary denial; they return
//! `Ok(false)` and only fail when a referenced node does not resolve.

use thiserror::Error;

use crate::node::{NodeId, NodeType};
use crate::sink::SinkError;

/// Which validated mutation was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Adding a new node.
    Add,
    /// Moving an existing node.
    Move,
    /// Deleting a node and its subtree.
    Delete,
    /// Replacing a node's description.
    Update,
}

impl core::fmt::Display for Operation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::Add => "add",
            Self::Move => "move",
            Self::Delete => "delete",
            Self::Update => "update",
        })
    }
}

/// Errors reported by layout operations.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// A node id did not resolve to a live node.
    #[error("unknown node {id}")]
    UnknownNode {
        /// The unresolved id.
        id: NodeId,
    },

    /// No channel is subscribed under the functional name.
    #[error("no channel subscribed under fname {fname:?}")]
    UnknownFname {
        /// The functional name that was looked up.
        fname: String,
    },

    /// The node type is not supported in this context.
    #[error("unsupported node type {node_type}")]
    UnsupportedNodeType {
        /// The rejected type, as text.
        node_type: String,
    },

    /// Text could not be parsed as a node id.
    #[error("invalid node id {text:?}")]
    InvalidNodeId {
        /// The rejected text.
        text: String,
    },

    /// A layout failed structural validation.
    #[error("malformed layout: {reason}")]
    MalformedLayout {
        /// What was wrong with it.
        reason: String,
    },

    /// A low-level tree edit referenced an impossible position.
    #[error("cannot place node under {parent}: {reason}")]
    InvalidPlacement {
        /// The intended parent.
        parent: NodeId,
        /// Why the position is impossible.
        reason: &'static str,
    },

    /// A validated mutation was refused by its permission check.
    #[error("{operation} of node {id} is not permitted")]
    NotPermitted {
        /// The refused operation.
        operation: Operation,
        /// The node the operation targeted (the parent, for adds).
        id: NodeId,
    },

    /// The content handler failed while receiving output.
    #[error("content handler failed: {0}")]
    Sink(#[source] SinkError),
}

impl LayoutError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedLayout {
            reason: reason.into(),
        }
    }

    pub(crate) fn unsupported(node_type: NodeType) -> Self {
        Self::UnsupportedNodeType {
            node_type: node_type.to_string(),
        }
    }
}

/// Shorthand for results carrying a [`LayoutError`].
pub type Result<T> = core::result::Result<T, LayoutError>;
