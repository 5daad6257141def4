// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node types and description snapshots.

use core::fmt;
use core::str::FromStr;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;

/// The closed set of node types a layout can hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    /// A grouping node (tab, column, or header/footer region).
    Folder,
    /// A leaf presenting one channel (portlet).
    Channel,
}

impl NodeType {
    /// Returns the lowercase name used in serialized output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Folder => "folder",
            Self::Channel => "channel",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "folder" => Ok(Self::Folder),
            "channel" => Ok(Self::Channel),
            other => Err(LayoutError::UnsupportedNodeType {
                node_type: other.into(),
            }),
        }
    }
}

/// Structural role of a folder.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FolderType {
    /// An ordinary folder.
    #[default]
    Regular,
    /// The page header region.
    Header,
    /// The page footer region.
    Footer,
}

impl FolderType {
    /// Returns the lowercase name used in serialized output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Header => "header",
            Self::Footer => "footer",
        }
    }
}

/// Folder-specific attributes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FolderDescription {
    /// Structural role of the folder.
    pub folder_type: FolderType,
}

/// Channel-specific attributes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelDescription {
    /// Functional name the channel is subscribed under. Must not be empty.
    pub fname: String,
    /// Title shown in the channel chrome.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Render timeout in milliseconds.
    pub timeout_ms: u64,
    /// Whether the channel offers an edit mode.
    pub editable: bool,
    /// Whether the channel offers a help mode.
    pub has_help: bool,
    /// Whether the channel offers an about mode.
    pub has_about: bool,
    /// Whether the channel must be delivered over a secure connection.
    pub secure: bool,
    /// Per-subscription parameters, ordered by name.
    pub parameters: BTreeMap<String, String>,
}

/// The type-specific half of a [`NodeDescription`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeKind {
    /// Folder attributes.
    Folder(FolderDescription),
    /// Channel attributes.
    Channel(ChannelDescription),
}

/// A metadata snapshot describing one node's configurable attributes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeDescription {
    /// Display name.
    pub name: String,
    /// Hidden nodes stay in the tree but are not rendered.
    pub hidden: bool,
    /// Immutable nodes cannot be updated, and immutable folders accept no
    /// structural change to their child list.
    pub immutable: bool,
    /// Unremovable nodes cannot be deleted or moved out of their parent.
    pub unremovable: bool,
    /// Type-specific attributes.
    #[serde(flatten)]
    pub kind: NodeKind,
}

impl NodeDescription {
    /// Creates an empty description for the given node type.
    #[must_use]
    pub fn empty(node_type: NodeType) -> Self {
        let kind = match node_type {
            NodeType::Folder => NodeKind::Folder(FolderDescription::default()),
            NodeType::Channel => NodeKind::Channel(ChannelDescription::default()),
        };
        Self {
            name: String::new(),
            hidden: false,
            immutable: false,
            unremovable: false,
            kind,
        }
    }

    /// Creates a regular folder with the given name.
    #[must_use]
    pub fn folder(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::empty(NodeType::Folder)
        }
    }

    /// Creates a channel with the given name and functional name.
    #[must_use]
    pub fn channel(name: impl Into<String>, fname: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            kind: NodeKind::Channel(ChannelDescription {
                fname: fname.into(),
                title: name.clone(),
                ..ChannelDescription::default()
            }),
            name,
            hidden: false,
            immutable: false,
            unremovable: false,
        }
    }

    /// Returns the node type this description belongs to.
    #[must_use]
    pub const fn node_type(&self) -> NodeType {
        match self.kind {
            NodeKind::Folder(_) => NodeType::Folder,
            NodeKind::Channel(_) => NodeType::Channel,
        }
    }

    /// Returns the channel attributes, if this describes a channel.
    #[must_use]
    pub fn as_channel(&self) -> Option<&ChannelDescription> {
        match &self.kind {
            NodeKind::Channel(channel) => Some(channel),
            NodeKind::Folder(_) => None,
        }
    }

    /// Returns the functional name, if this describes a channel.
    #[must_use]
    pub fn fname(&self) -> Option<&str> {
        self.as_channel().map(|c| c.fname.as_str())
    }

    /// Returns whether this describes a folder.
    #[must_use]
    pub const fn is_folder(&self) -> bool {
        matches!(self.kind, NodeKind::Folder(_))
    }

    /// Checks the description's own invariants.
    ///
    /// Channels must carry a non-empty functional name.
    pub fn check(&self) -> Result<(), LayoutError> {
        match &self.kind {
            NodeKind::Channel(channel) if channel.fname.trim().is_empty() => Err(
                LayoutError::malformed(format!("channel {:?} has no fname", self.name)),
            ),
            _ => Ok(()),
        }
    }

    /// Returns whether [`check`](Self::check) passes.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.check().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_matches_requested_type() {
        assert_eq!(
            NodeDescription::empty(NodeType::Folder).node_type(),
            NodeType::Folder
        );
        assert_eq!(
            NodeDescription::empty(NodeType::Channel).node_type(),
            NodeType::Channel
        );
    }

    #[test]
    fn empty_channel_is_not_valid_until_named() {
        let mut channel = NodeDescription::empty(NodeType::Channel);
        assert!(!channel.is_valid());
        if let NodeKind::Channel(c) = &mut channel.kind {
            c.fname = "weather".into();
        }
        assert!(channel.is_valid());
        assert_eq!(channel.fname(), Some("weather"));
    }

    #[test]
    fn node_type_text_form() {
        assert_eq!("folder".parse::<NodeType>().ok(), Some(NodeType::Folder));
        assert_eq!("channel".parse::<NodeType>().ok(), Some(NodeType::Channel));
        assert!(matches!(
            "fragment".parse::<NodeType>(),
            Err(LayoutError::UnsupportedNodeType { .. })
        ));
    }
}
