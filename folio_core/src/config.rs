// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout manager configuration.

use serde::{Deserialize, Serialize};

use crate::node::NodeType;

/// Which node types a manager lets users create.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermittedTypes {
    /// Folders may be added.
    pub folders: bool,
    /// Channels may be added.
    pub channels: bool,
}

impl PermittedTypes {
    /// Returns whether `node_type` is permitted.
    #[must_use]
    pub const fn allows(self, node_type: NodeType) -> bool {
        match node_type {
            NodeType::Folder => self.folders,
            NodeType::Channel => self.channels,
        }
    }
}

/// Configuration for a [`SimpleLayoutManager`](crate::manager::SimpleLayoutManager).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Node types that [`create_node_description`] produces and that may be
    /// added to the tree. Existing nodes of other types are unaffected.
    ///
    /// [`create_node_description`]: crate::manager::LayoutManager::create_node_description
    pub permitted_types: PermittedTypes,
    /// Deepest allowed node depth (the root has depth 0), or `None` for no
    /// limit.
    pub max_depth: Option<usize>,
}

impl LayoutConfig {
    /// Folders and channels, no depth limit.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            permitted_types: PermittedTypes {
                folders: true,
                channels: true,
            },
            max_depth: None,
        }
    }

    /// A fixed tab structure: users may add and arrange channels but not
    /// folders.
    #[must_use]
    pub const fn channels_only() -> Self {
        Self {
            permitted_types: PermittedTypes {
                folders: false,
                channels: true,
            },
            max_depth: None,
        }
    }

    /// Returns whether a node whose deepest descendant sits `height` levels
    /// below it may be placed at `depth`.
    #[must_use]
    pub fn fits(&self, depth: usize, height: usize) -> bool {
        self.max_depth.is_none_or(|max| depth + height <= max)
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::standard()
    }
}
