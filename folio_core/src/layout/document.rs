// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Nested, serde-friendly layout form for persistence collaborators.

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};
use crate::node::{INVALID, NodeDescription, NodeId};

use super::store::UserLayout;

/// One node of a [`LayoutDocument`] with its children in order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentNode {
    /// The node's description.
    #[serde(flatten)]
    pub description: NodeDescription,
    /// Child nodes, in order. Must be empty for channels.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DocumentNode>,
}

impl DocumentNode {
    /// Creates a childless node.
    #[must_use]
    pub fn leaf(description: NodeDescription) -> Self {
        Self {
            description,
            children: Vec::new(),
        }
    }
}

/// A whole layout as a nested tree, independent of slot allocation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutDocument {
    /// The layout id.
    pub layout_id: u32,
    /// The root folder.
    pub root: DocumentNode,
}

impl UserLayout {
    /// Builds a layout from its nested form.
    ///
    /// Fails with [`LayoutError::MalformedLayout`] if the root is not a
    /// folder, a channel has children, or any description is invalid.
    pub fn from_document(document: &LayoutDocument) -> Result<Self> {
        let mut layout = Self::with_root(document.layout_id, document.root.description.clone())?;
        document.root.description.check()?;
        let mut stack: Vec<(NodeId, &DocumentNode)> = vec![(NodeId::ROOT, &document.root)];
        while let Some((id, node)) = stack.pop() {
            if !node.children.is_empty() && !node.description.is_folder() {
                return Err(LayoutError::malformed(format!(
                    "channel {:?} has children",
                    node.description.name
                )));
            }
            for child in &node.children {
                let child_id = layout.insert(id, None, child.description.clone())?;
                stack.push((child_id, child));
            }
        }
        let _ = layout.collect_changes();
        Ok(layout)
    }

    /// Returns the nested form of this layout.
    #[must_use]
    pub fn to_document(&self) -> LayoutDocument {
        LayoutDocument {
            layout_id: self.layout_id(),
            root: self.document_node(NodeId::ROOT.idx),
        }
    }

    fn document_node(&self, idx: u32) -> DocumentNode {
        let mut children = Vec::new();
        let mut child = self.first_child[idx as usize];
        while child != INVALID {
            children.push(self.document_node(child));
            child = self.next_sibling[child as usize];
        }
        DocumentNode {
            description: self.description[idx as usize].clone(),
            children,
        }
    }

    /// Checks the invariants every layout must satisfy.
    ///
    /// The root is a folder, only folders have children, every description is
    /// valid, and every live node is reachable from the root with consistent
    /// sibling links.
    pub fn validate(&self) -> Result<()> {
        if !self.description[NodeId::ROOT.idx as usize].is_folder() {
            return Err(LayoutError::malformed("the root node must be a folder"));
        }
        let mut reached = 0_usize;
        for id in self.descendants(NodeId::ROOT)? {
            reached += 1;
            let idx = id.idx as usize;
            let description = &self.description[idx];
            description.check()?;
            let first = self.first_child[idx];
            if first != INVALID {
                if !description.is_folder() {
                    return Err(LayoutError::malformed(format!(
                        "channel {:?} has children",
                        description.name
                    )));
                }
                if self.prev_sibling[first as usize] != INVALID {
                    return Err(LayoutError::malformed(format!(
                        "first child of {id} has a previous sibling"
                    )));
                }
            }
            let next = self.next_sibling[idx];
            if next != INVALID
                && (self.prev_sibling[next as usize] != id.idx
                    || self.parent[next as usize] != self.parent[idx])
            {
                return Err(LayoutError::malformed(format!(
                    "sibling links around {id} are inconsistent"
                )));
            }
        }
        if reached != self.node_count() {
            return Err(LayoutError::malformed(format!(
                "{} nodes are not reachable from the root",
                self.node_count().saturating_sub(reached)
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeType;

    fn sample() -> LayoutDocument {
        LayoutDocument {
            layout_id: 9,
            root: DocumentNode {
                description: NodeDescription::folder("root"),
                children: vec![
                    DocumentNode {
                        description: NodeDescription::folder("home"),
                        children: vec![
                            DocumentNode::leaf(NodeDescription::channel("News", "news")),
                            DocumentNode::leaf(NodeDescription::channel("Mail", "mail")),
                        ],
                    },
                    DocumentNode::leaf(NodeDescription::folder("empty")),
                ],
            },
        }
    }

    #[test]
    fn document_round_trip_preserves_order() -> Result<()> {
        let layout = UserLayout::from_document(&sample())?;
        assert_eq!(layout.layout_id(), 9);
        assert_eq!(layout.node_count(), 5);
        layout.validate()?;
        assert_eq!(layout.to_document(), sample());
        Ok(())
    }

    #[test]
    fn channel_with_children_is_malformed() {
        let mut document = sample();
        document.root.children[0].children[0]
            .children
            .push(DocumentNode::leaf(NodeDescription::channel("x", "x")));
        assert!(matches!(
            UserLayout::from_document(&document),
            Err(LayoutError::MalformedLayout { .. })
        ));
    }

    #[test]
    fn channel_root_is_malformed() {
        let document = LayoutDocument {
            layout_id: 1,
            root: DocumentNode::leaf(NodeDescription::channel("x", "x")),
        };
        assert!(matches!(
            UserLayout::from_document(&document),
            Err(LayoutError::MalformedLayout { .. })
        ));
    }

    #[test]
    fn missing_fname_is_malformed() {
        let mut document = sample();
        document.root.children[1]
            .children
            .push(DocumentNode::leaf(NodeDescription::empty(NodeType::Channel)));
        assert!(matches!(
            UserLayout::from_document(&document),
            Err(LayoutError::MalformedLayout { .. })
        ));
    }
}
