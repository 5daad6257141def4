// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Permission rules for layout mutations.
//!
//! Every predicate resolves all referenced ids first and fails with
//! [`LayoutError::UnknownNode`](crate::error::LayoutError::UnknownNode) if any
//! of them is unknown. Once the ids resolve, a denial is `Ok(false)`.
//!
//! The rules:
//!
//! - **add**: the type is permitted, the description is valid, the parent is
//!   a mutable folder, the next sibling (if any) is a child of the parent, and
//!   the depth limit holds.
//! - **move**: the node is not the root, its current parent is mutable, the
//!   target is a mutable folder outside the node's own subtree, the next
//!   sibling (if any) is a child of the target and not the node itself, an
//!   unremovable node stays within its parent, and the depth limit holds.
//! - **delete**: the node is not the root, neither it nor any descendant is
//!   unremovable, and its parent is mutable.
//! - **update**: the node is not immutable, the type is unchanged, and the
//!   new description is valid.

use crate::config::LayoutConfig;
use crate::error::Result;
use crate::layout::UserLayout;
use crate::node::{INVALID, NodeDescription, NodeId};

impl UserLayout {
    /// Returns whether `description` may be added under `parent`, before
    /// `next_sibling` or last when `None`.
    pub fn can_add_node(
        &self,
        config: &LayoutConfig,
        description: &NodeDescription,
        parent: NodeId,
        next_sibling: Option<NodeId>,
    ) -> Result<bool> {
        let p = self.resolve(parent)?;
        let next = self.resolve_opt(next_sibling)?;

        if !config.permitted_types.allows(description.node_type()) || !description.is_valid() {
            return Ok(false);
        }
        if !self.accepts_children_at(p, next) {
            return Ok(false);
        }
        Ok(config.fits(self.depth(parent)? + 1, 0))
    }

    /// Returns whether `id` may be moved under `parent`, before
    /// `next_sibling` or last when `None`.
    pub fn can_move_node(
        &self,
        config: &LayoutConfig,
        id: NodeId,
        parent: NodeId,
        next_sibling: Option<NodeId>,
    ) -> Result<bool> {
        let c = self.resolve(id)?;
        let p = self.resolve(parent)?;
        let next = self.resolve_opt(next_sibling)?;

        if id.is_root() || next == c {
            return Ok(false);
        }
        let current = self.parent[c as usize];
        if self.description[current as usize].immutable {
            return Ok(false);
        }
        if p == c || self.is_ancestor(id, parent)? {
            return Ok(false);
        }
        if self.description[c as usize].unremovable && current != p {
            return Ok(false);
        }
        if !self.accepts_children_at(p, next) {
            return Ok(false);
        }
        Ok(config.fits(self.depth(parent)? + 1, self.height(id)?))
    }

    /// Returns whether `id` (with its subtree) may be deleted.
    pub fn can_delete_node(&self, id: NodeId) -> Result<bool> {
        let c = self.resolve(id)?;
        if id.is_root() {
            return Ok(false);
        }
        let parent = self.parent[c as usize];
        if self.description[parent as usize].immutable {
            return Ok(false);
        }
        let protected = self
            .descendants(id)?
            .any(|d| self.description[d.idx as usize].unremovable);
        Ok(!protected)
    }

    /// Returns whether the description of `id` may be replaced by
    /// `description`.
    pub fn can_update_node(&self, id: NodeId, description: &NodeDescription) -> Result<bool> {
        let current = self.node(id)?;
        Ok(!current.immutable
            && current.node_type() == description.node_type()
            && description.is_valid())
    }

    /// Whether slot `p` is a mutable folder and `next` is [`INVALID`] or one
    /// of its children.
    fn accepts_children_at(&self, p: u32, next: u32) -> bool {
        let folder = &self.description[p as usize];
        folder.is_folder()
            && !folder.immutable
            && (next == INVALID || self.parent[next as usize] == p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LayoutError;
    use crate::node::NodeType;

    struct Fixture {
        layout: UserLayout,
        home: NodeId,
        news: NodeId,
        mail: NodeId,
        locked: NodeId,
        pinned: NodeId,
    }

    /// root
    /// ├── home            (folder)
    /// │   ├── news        (channel)
    /// │   └── mail        (channel)
    /// └── locked          (immutable folder)
    ///     └── pinned      (unremovable channel)
    fn fixture() -> Result<Fixture> {
        let mut layout = UserLayout::new(1);
        let home = layout.insert(NodeId::ROOT, None, NodeDescription::folder("home"))?;
        let news = layout.insert(home, None, NodeDescription::channel("News", "news"))?;
        let mail = layout.insert(home, None, NodeDescription::channel("Mail", "mail"))?;
        let locked = layout.insert(
            NodeId::ROOT,
            None,
            NodeDescription {
                immutable: true,
                ..NodeDescription::folder("locked")
            },
        )?;
        let pinned = layout.insert(
            locked,
            None,
            NodeDescription {
                unremovable: true,
                ..NodeDescription::channel("Pinned", "pinned")
            },
        )?;
        Ok(Fixture {
            layout,
            home,
            news,
            mail,
            locked,
            pinned,
        })
    }

    #[test]
    fn add_rules() -> Result<()> {
        let f = fixture()?;
        let config = LayoutConfig::standard();
        let weather = NodeDescription::channel("Weather", "weather");

        assert!(f.layout.can_add_node(&config, &weather, f.home, None)?);
        assert!(f.layout.can_add_node(&config, &weather, f.home, Some(f.mail))?);
        // Not a folder.
        assert!(!f.layout.can_add_node(&config, &weather, f.news, None)?);
        // Immutable folder.
        assert!(!f.layout.can_add_node(&config, &weather, f.locked, None)?);
        // Next sibling belongs elsewhere.
        assert!(!f.layout.can_add_node(&config, &weather, NodeId::ROOT, Some(f.mail))?);
        // Invalid description.
        let nameless = NodeDescription::empty(NodeType::Channel);
        assert!(!f.layout.can_add_node(&config, &nameless, f.home, None)?);
        Ok(())
    }

    #[test]
    fn add_respects_config() -> Result<()> {
        let f = fixture()?;
        let folder = NodeDescription::folder("extra");
        assert!(
            !f.layout
                .can_add_node(&LayoutConfig::channels_only(), &folder, NodeId::ROOT, None)?
        );

        let shallow = LayoutConfig {
            max_depth: Some(1),
            ..LayoutConfig::standard()
        };
        let weather = NodeDescription::channel("Weather", "weather");
        assert!(f.layout.can_add_node(&shallow, &weather, NodeId::ROOT, None)?);
        assert!(!f.layout.can_add_node(&shallow, &weather, f.home, None)?);
        Ok(())
    }

    #[test]
    fn unknown_ids_are_errors() -> Result<()> {
        let mut f = fixture()?;
        let config = LayoutConfig::standard();
        let gone = f.news;
        f.layout.remove(gone)?;

        let weather = NodeDescription::channel("Weather", "weather");
        assert!(matches!(
            f.layout.can_add_node(&config, &weather, gone, None),
            Err(LayoutError::UnknownNode { .. })
        ));
        assert!(matches!(
            f.layout.can_add_node(&config, &weather, f.home, Some(gone)),
            Err(LayoutError::UnknownNode { .. })
        ));
        assert!(f.layout.can_move_node(&config, gone, f.home, None).is_err());
        assert!(f.layout.can_delete_node(gone).is_err());
        assert!(f.layout.can_update_node(gone, &weather).is_err());
        Ok(())
    }

    #[test]
    fn move_rules() -> Result<()> {
        let f = fixture()?;
        let config = LayoutConfig::standard();

        assert!(f.layout.can_move_node(&config, f.mail, f.home, Some(f.news))?);
        assert!(f.layout.can_move_node(&config, f.news, NodeId::ROOT, None)?);
        assert!(f.layout.can_move_node(&config, f.home, NodeId::ROOT, None)?);
        // Root never moves.
        assert!(!f.layout.can_move_node(&config, NodeId::ROOT, f.home, None)?);
        // Into its own subtree.
        assert!(!f.layout.can_move_node(&config, f.home, f.home, None)?);
        // Before itself.
        assert!(!f.layout.can_move_node(&config, f.news, f.home, Some(f.news))?);
        // Into an immutable folder.
        assert!(!f.layout.can_move_node(&config, f.news, f.locked, None)?);
        // Out of an immutable folder.
        assert!(!f.layout.can_move_node(&config, f.pinned, f.home, None)?);
        // Into a channel.
        assert!(!f.layout.can_move_node(&config, f.news, f.mail, None)?);
        Ok(())
    }

    #[test]
    fn unremovable_nodes_stay_in_their_parent() -> Result<()> {
        let mut layout = UserLayout::new(1);
        let tab = layout.insert(NodeId::ROOT, None, NodeDescription::folder("tab"))?;
        let other = layout.insert(NodeId::ROOT, None, NodeDescription::folder("other"))?;
        let a = layout.insert(tab, None, NodeDescription::channel("a", "a"))?;
        let fixed = layout.insert(
            tab,
            None,
            NodeDescription {
                unremovable: true,
                ..NodeDescription::channel("fixed", "fixed")
            },
        )?;
        let config = LayoutConfig::standard();
        assert!(layout.can_move_node(&config, fixed, tab, Some(a))?);
        assert!(!layout.can_move_node(&config, fixed, other, None)?);
        Ok(())
    }

    #[test]
    fn move_respects_subtree_height() -> Result<()> {
        let f = fixture()?;
        let config = LayoutConfig {
            max_depth: Some(2),
            ..LayoutConfig::standard()
        };
        // `home` has height 1, so under `deep` its channels would sit at depth 3.
        let mut layout = f.layout;
        let deep = layout.insert(NodeId::ROOT, None, NodeDescription::folder("deep"))?;
        assert!(!layout.can_move_node(&config, f.home, deep, None)?);
        assert!(layout.can_move_node(&config, f.news, deep, None)?);
        Ok(())
    }

    #[test]
    fn delete_rules() -> Result<()> {
        let f = fixture()?;
        assert!(!f.layout.can_delete_node(NodeId::ROOT)?);
        assert!(f.layout.can_delete_node(f.news)?);
        assert!(f.layout.can_delete_node(f.home)?);
        // Unremovable, and inside an immutable folder.
        assert!(!f.layout.can_delete_node(f.pinned)?);
        // Holds an unremovable descendant.
        assert!(!f.layout.can_delete_node(f.locked)?);
        Ok(())
    }

    #[test]
    fn update_rules() -> Result<()> {
        let f = fixture()?;
        let renamed = NodeDescription::channel("Headlines", "news");
        assert!(f.layout.can_update_node(f.news, &renamed)?);
        assert!(!f.layout.can_update_node(f.news, &NodeDescription::folder("x"))?);
        assert!(!f.layout.can_update_node(f.locked, &NodeDescription::folder("x"))?);
        assert!(
            !f.layout
                .can_update_node(f.news, &NodeDescription::empty(NodeType::Channel))?
        );
        assert!(f.layout.can_update_node(NodeId::ROOT, &NodeDescription::folder("top"))?);
        Ok(())
    }
}
