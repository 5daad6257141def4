// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays node storage with allocation, topology, and descriptions.

use understory_dirty::{CycleHandling, DirtyTracker};

use crate::dirty;
use crate::error::{LayoutError, Result};
use crate::node::{INVALID, NodeDescription, NodeId, NodeType};

use super::traverse::{Children, Descendants};

/// The layout tree of one user.
///
/// Nodes are addressed by [`NodeId`] handles. Internally, each node occupies
/// a slot in parallel arrays. Deleted nodes are recycled via a free list, and
/// generation counters keep ids of deleted nodes from resolving again.
///
/// Slot 0 always holds the root folder, addressed by [`NodeId::ROOT`]. The
/// root can be re-described but never moved or removed.
///
/// The mutators on this type enforce only structural soundness (a parent is
/// a folder, a sibling belongs to the named parent, no cycles). Permission
/// rules live in [`permission`](crate::permission) and are applied by the
/// layout manager.
#[derive(Debug)]
pub struct UserLayout {
    layout_id: u32,

    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) prev_sibling: Vec<u32>,

    // -- Descriptions --
    pub(crate) description: Vec<NodeDescription>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) alive: Vec<bool>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,

    // -- Lifecycle tracking --
    pub(crate) pending_added: Vec<u32>,
    pub(crate) pending_removed: Vec<u32>,
}

impl Clone for UserLayout {
    /// Snapshots the tree. The copy starts with no pending changes.
    fn clone(&self) -> Self {
        Self {
            layout_id: self.layout_id,
            parent: self.parent.clone(),
            first_child: self.first_child.clone(),
            next_sibling: self.next_sibling.clone(),
            prev_sibling: self.prev_sibling.clone(),
            description: self.description.clone(),
            generation: self.generation.clone(),
            alive: self.alive.clone(),
            free_list: self.free_list.clone(),
            len: self.len,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            pending_added: Vec::new(),
            pending_removed: Vec::new(),
        }
    }
}

impl UserLayout {
    /// Creates a layout holding only a regular root folder named `root`.
    #[must_use]
    pub fn new(layout_id: u32) -> Self {
        let mut layout = Self {
            layout_id,
            parent: Vec::new(),
            first_child: Vec::new(),
            next_sibling: Vec::new(),
            prev_sibling: Vec::new(),
            description: Vec::new(),
            generation: Vec::new(),
            alive: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            pending_added: Vec::new(),
            pending_removed: Vec::new(),
        };
        let root = layout.alloc(NodeDescription::folder(NodeId::ROOT_NAME));
        debug_assert_eq!(root, NodeId::ROOT.idx, "root must occupy slot 0");
        layout
    }

    /// Creates a layout whose root folder carries `root`.
    ///
    /// Fails with [`LayoutError::MalformedLayout`] if `root` is not a folder.
    pub fn with_root(layout_id: u32, root: NodeDescription) -> Result<Self> {
        if !root.is_folder() {
            return Err(LayoutError::malformed("the root node must be a folder"));
        }
        let mut layout = Self::new(layout_id);
        layout.description[NodeId::ROOT.idx as usize] = root;
        Ok(layout)
    }

    // -- Identity --

    /// Returns the id of the layout (not of any node).
    #[must_use]
    pub const fn layout_id(&self) -> u32 {
        self.layout_id
    }

    /// Returns the id of the root folder.
    #[must_use]
    pub const fn root_id(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Returns the number of live nodes, root included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.len as usize - self.free_list.len()
    }

    /// Returns whether the given id refers to a live node.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        (id.idx < self.len)
            && self.alive[id.idx as usize]
            && self.generation[id.idx as usize] == id.generation
    }

    // -- Queries --

    /// Returns the description of a node.
    pub fn node(&self, id: NodeId) -> Result<&NodeDescription> {
        let idx = self.resolve(id)?;
        Ok(&self.description[idx as usize])
    }

    /// Returns the type of a node.
    pub fn node_type(&self, id: NodeId) -> Result<NodeType> {
        self.node(id).map(NodeDescription::node_type)
    }

    /// Returns the parent of a node, or `None` for the root.
    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>> {
        let idx = self.resolve(id)?;
        Ok(self.id_at_opt(self.parent[idx as usize]))
    }

    /// Returns an iterator over the direct children of a node.
    pub fn children(&self, id: NodeId) -> Result<Children<'_>> {
        let idx = self.resolve(id)?;
        Ok(Children::new(self, self.first_child[idx as usize]))
    }

    /// Returns the ids of the direct children of a node, in order.
    pub fn child_ids(&self, id: NodeId) -> Result<Vec<NodeId>> {
        Ok(self.children(id)?.collect())
    }

    /// Returns the next sibling of a node, or `None` for the last child.
    pub fn next_sibling(&self, id: NodeId) -> Result<Option<NodeId>> {
        let idx = self.resolve(id)?;
        Ok(self.id_at_opt(self.next_sibling[idx as usize]))
    }

    /// Returns the previous sibling of a node, or `None` for the first child.
    pub fn previous_sibling(&self, id: NodeId) -> Result<Option<NodeId>> {
        let idx = self.resolve(id)?;
        Ok(self.id_at_opt(self.prev_sibling[idx as usize]))
    }

    /// Returns the number of ancestors of a node. The root has depth 0.
    pub fn depth(&self, id: NodeId) -> Result<usize> {
        let mut idx = self.resolve(id)?;
        let mut depth = 0;
        while self.parent[idx as usize] != INVALID {
            idx = self.parent[idx as usize];
            depth += 1;
        }
        Ok(depth)
    }

    /// Returns the length of the longest downward path from a node. Leaves
    /// have height 0.
    pub fn height(&self, id: NodeId) -> Result<usize> {
        let base = self.depth(id)?;
        let deepest = self
            .descendants(id)?
            .map(|d| self.depth_of(d.idx))
            .max()
            .unwrap_or(base);
        Ok(deepest - base)
    }

    /// Returns a pre-order iterator over a node and all of its descendants.
    pub fn descendants(&self, id: NodeId) -> Result<Descendants<'_>> {
        let idx = self.resolve(id)?;
        Ok(Descendants::new(self, idx))
    }

    /// Returns whether `ancestor` lies strictly above `node`.
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> Result<bool> {
        let a = self.resolve(ancestor)?;
        let mut idx = self.resolve(node)?;
        while self.parent[idx as usize] != INVALID {
            idx = self.parent[idx as usize];
            if idx == a {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Returns the first channel, in pre-order, subscribed under `fname`.
    #[must_use]
    pub fn find_fname(&self, fname: &str) -> Option<NodeId> {
        Descendants::new(self, NodeId::ROOT.idx)
            .find(|&id| self.description[id.idx as usize].fname() == Some(fname))
    }

    // -- Mutation API (auto-marks dirty) --

    /// Inserts a new node under `parent`, before `next_sibling`, or as the
    /// last child when `next_sibling` is `None`.
    pub fn insert(
        &mut self,
        parent: NodeId,
        next_sibling: Option<NodeId>,
        description: NodeDescription,
    ) -> Result<NodeId> {
        let p = self.resolve(parent)?;
        let next = self.resolve_opt(next_sibling)?;
        description.check()?;
        self.check_placement(parent, p, next)?;

        let c = self.alloc(description);
        self.link(c, p, next);
        self.dirty.mark(c, dirty::STRUCTURE);
        Ok(self.id_at(c))
    }

    /// Moves a node (with its subtree) under `parent`, before `next_sibling`,
    /// or to the end when `next_sibling` is `None`.
    pub fn relocate(
        &mut self,
        id: NodeId,
        parent: NodeId,
        next_sibling: Option<NodeId>,
    ) -> Result<()> {
        let c = self.resolve(id)?;
        let p = self.resolve(parent)?;
        let next = self.resolve_opt(next_sibling)?;
        if id.is_root() {
            return Err(LayoutError::InvalidPlacement {
                parent,
                reason: "the root folder cannot be moved",
            });
        }
        if p == c || self.is_ancestor(id, parent)? {
            return Err(LayoutError::InvalidPlacement {
                parent,
                reason: "a node cannot be moved into its own subtree",
            });
        }
        if next == c {
            return Err(LayoutError::InvalidPlacement {
                parent,
                reason: "a node cannot be placed before itself",
            });
        }
        self.check_placement(parent, p, next)?;

        let old_p = self.parent[c as usize];
        self.unlink(c);
        self.dirty.mark(old_p, dirty::STRUCTURE);
        self.link(c, p, next);
        Ok(())
    }

    /// Removes a node and its whole subtree, returning the removed ids in
    /// pre-order.
    pub fn remove(&mut self, id: NodeId) -> Result<Vec<NodeId>> {
        let c = self.resolve(id)?;
        if id.is_root() {
            return Err(LayoutError::InvalidPlacement {
                parent: id,
                reason: "the root folder cannot be removed",
            });
        }
        let removed: Vec<NodeId> = Descendants::new(self, c).collect();
        let p = self.parent[c as usize];
        self.unlink(c);
        self.dirty.mark(p, dirty::STRUCTURE);

        // Children first, so each released slot is already childless.
        for node in removed.iter().rev() {
            self.release(node.idx);
        }
        Ok(removed)
    }

    /// Replaces the description of a node, returning the previous one.
    ///
    /// The node type cannot change.
    pub fn update(&mut self, id: NodeId, description: NodeDescription) -> Result<NodeDescription> {
        let idx = self.resolve(id)?;
        description.check()?;
        let current = self.description[idx as usize].node_type();
        if description.node_type() != current {
            return Err(LayoutError::malformed(format!(
                "node {id} is a {current} and cannot become a {}",
                description.node_type()
            )));
        }
        self.dirty.mark(idx, dirty::DESCRIPTION);
        Ok(core::mem::replace(
            &mut self.description[idx as usize],
            description,
        ))
    }

    // -- Internal helpers --

    /// Resolves a handle to its slot, failing for stale or unknown ids.
    pub(crate) fn resolve(&self, id: NodeId) -> Result<u32> {
        if self.contains(id) {
            Ok(id.idx)
        } else {
            Err(LayoutError::UnknownNode { id })
        }
    }

    /// Resolves an optional handle, mapping `None` to [`INVALID`].
    pub(crate) fn resolve_opt(&self, id: Option<NodeId>) -> Result<u32> {
        id.map_or(Ok(INVALID), |id| self.resolve(id))
    }

    pub(crate) fn id_at(&self, idx: u32) -> NodeId {
        NodeId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    fn id_at_opt(&self, idx: u32) -> Option<NodeId> {
        (idx != INVALID).then(|| self.id_at(idx))
    }

    fn depth_of(&self, mut idx: u32) -> usize {
        let mut depth = 0;
        while self.parent[idx as usize] != INVALID {
            idx = self.parent[idx as usize];
            depth += 1;
        }
        depth
    }

    /// Fails unless `p` is a folder and `next` is [`INVALID`] or a child of `p`.
    fn check_placement(&self, parent: NodeId, p: u32, next: u32) -> Result<()> {
        if !self.description[p as usize].is_folder() {
            return Err(LayoutError::InvalidPlacement {
                parent,
                reason: "only folders can hold children",
            });
        }
        if next != INVALID && self.parent[next as usize] != p {
            return Err(LayoutError::InvalidPlacement {
                parent,
                reason: "the next sibling is not a child of the parent",
            });
        }
        Ok(())
    }

    /// Allocates a detached slot for `description`.
    fn alloc(&mut self, description: NodeDescription) -> u32 {
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot; its generation was bumped on release.
            self.parent[idx as usize] = INVALID;
            self.first_child[idx as usize] = INVALID;
            self.next_sibling[idx as usize] = INVALID;
            self.prev_sibling[idx as usize] = INVALID;
            self.description[idx as usize] = description;
            self.alive[idx as usize] = true;
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.first_child.push(INVALID);
            self.next_sibling.push(INVALID);
            self.prev_sibling.push(INVALID);
            self.description.push(description);
            self.generation.push(0);
            self.alive.push(true);
            idx
        };
        self.pending_added.push(idx);
        idx
    }

    /// Frees a detached, childless slot.
    fn release(&mut self, idx: u32) {
        self.dirty.remove_key(idx);
        // Bump generation so old handles immediately fail to resolve.
        self.generation[idx as usize] += 1;
        self.alive[idx as usize] = false;
        self.parent[idx as usize] = INVALID;
        self.first_child[idx as usize] = INVALID;
        self.next_sibling[idx as usize] = INVALID;
        self.prev_sibling[idx as usize] = INVALID;
        self.free_list.push(idx);
        self.pending_removed.push(idx);
    }

    /// Links detached `c` under `p`, before `next` or last when `next` is
    /// [`INVALID`].
    fn link(&mut self, c: u32, p: u32, next: u32) {
        self.parent[c as usize] = p;
        self.next_sibling[c as usize] = next;

        if next != INVALID {
            let prev = self.prev_sibling[next as usize];
            self.prev_sibling[c as usize] = prev;
            if prev != INVALID {
                self.next_sibling[prev as usize] = c;
            } else {
                // `next` was the first child.
                self.first_child[p as usize] = c;
            }
            self.prev_sibling[next as usize] = c;
        } else if self.first_child[p as usize] == INVALID {
            self.prev_sibling[c as usize] = INVALID;
            self.first_child[p as usize] = c;
        } else {
            // Walk to last child.
            let mut last = self.first_child[p as usize];
            while self.next_sibling[last as usize] != INVALID {
                last = self.next_sibling[last as usize];
            }
            self.next_sibling[last as usize] = c;
            self.prev_sibling[c as usize] = last;
        }

        self.dirty.mark(p, dirty::STRUCTURE);
    }

    /// Removes `idx` from its parent's child list without touching dirty state.
    fn unlink(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        let prev = self.prev_sibling[idx as usize];
        let next = self.next_sibling[idx as usize];

        if prev != INVALID {
            self.next_sibling[prev as usize] = next;
        } else {
            // Was first child.
            self.first_child[p as usize] = next;
        }

        if next != INVALID {
            self.prev_sibling[next as usize] = prev;
        }

        self.parent[idx as usize] = INVALID;
        self.prev_sibling[idx as usize] = INVALID;
        self.next_sibling[idx as usize] = INVALID;
    }
}
