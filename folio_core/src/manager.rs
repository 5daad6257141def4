// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The layout manager contract and its in-memory implementation.
//!
//! A [`LayoutManager`] mediates every read and mutation of one user's
//! layout. [`SimpleLayoutManager`] keeps the tree, the pending target
//! markings, and the tree's fingerprint behind one mutex, so each validated
//! mutation checks its permission and applies the change without another
//! mutation interleaving. Listeners are notified once that lock has been
//! released.
//!
//! ```
//! use folio_core::config::LayoutConfig;
//! use folio_core::layout::UserLayout;
//! use folio_core::manager::{LayoutManager, SimpleLayoutManager};
//! use folio_core::node::{NodeDescription, NodeId};
//!
//! let manager = SimpleLayoutManager::new(UserLayout::new(7), LayoutConfig::standard());
//! let before = manager.cache_key();
//!
//! let tab = manager.add_node(NodeDescription::folder("Home"), NodeId::ROOT, None)?;
//! let news = manager.add_node(NodeDescription::channel("News", "news"), tab, None)?;
//!
//! assert_eq!(manager.subscribe_id("news")?, news);
//! assert_ne!(manager.cache_key(), before);
//! # Ok::<(), folio_core::LayoutError>(())
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, trace, warn};

use crate::cache::CacheEntryTag;
use crate::config::LayoutConfig;
use crate::error::{LayoutError, Operation, Result};
use crate::layout::UserLayout;
use crate::listener::{
    LayoutEventListener, NodeDeleteEvent, NodeEvent, NodeMoveEvent, Notification,
};
use crate::node::{NodeDescription, NodeId, NodeType};
use crate::serialize::{MarkedLayout, Markings};
use crate::sink::ContentHandler;

/// Tag type of the [`CacheEntryTag`] returned by
/// [`SimpleLayoutManager::cache_tag`].
pub const USER_LAYOUT_TAG: &str = "userLayout";

/// Operations over one user's layout tree.
///
/// Unknown node ids are errors everywhere. A `next_sibling` of `None` means
/// "append as the last child". Permission predicates return `Ok(false)` for
/// an ordinary denial.
pub trait LayoutManager: Send + Sync {
    /// Returns a snapshot of the whole tree with the active markings.
    fn user_layout(&self) -> MarkedLayout;

    /// Replaces the whole tree.
    ///
    /// Fails with [`LayoutError::MalformedLayout`] if `layout` does not
    /// validate. Replacing the tree clears all markings.
    fn set_user_layout(&self, layout: UserLayout) -> Result<()>;

    /// Streams the whole tree into `handler`.
    fn write_user_layout(&self, handler: &mut dyn ContentHandler) -> Result<()>;

    /// Streams the subtree rooted at `id` into `handler`.
    fn write_subtree(&self, id: NodeId, handler: &mut dyn ContentHandler) -> Result<()>;

    /// Returns a snapshot of one node's description.
    fn node(&self, id: NodeId) -> Result<NodeDescription>;

    /// Returns whether `description` may be added under `parent`.
    fn can_add_node(
        &self,
        description: &NodeDescription,
        parent: NodeId,
        next_sibling: Option<NodeId>,
    ) -> Result<bool>;

    /// Returns whether `id` may be moved under `parent`.
    fn can_move_node(
        &self,
        id: NodeId,
        parent: NodeId,
        next_sibling: Option<NodeId>,
    ) -> Result<bool>;

    /// Returns whether `id` and its subtree may be deleted.
    fn can_delete_node(&self, id: NodeId) -> Result<bool>;

    /// Returns whether the description of `id` may be replaced.
    fn can_update_node(&self, id: NodeId, description: &NodeDescription) -> Result<bool>;

    /// Returns the active markings.
    fn markings(&self) -> Markings;

    /// Marks every position where `description` could be added, or clears
    /// the add markings when `None`.
    fn mark_add_targets(&self, description: Option<&NodeDescription>);

    /// Marks every position `id` could be moved to, or clears the move
    /// markings when `None`.
    fn mark_move_targets(&self, id: Option<NodeId>) -> Result<()>;

    /// Returns the parent of `id`, `None` for the root.
    fn parent_id(&self, id: NodeId) -> Result<Option<NodeId>>;

    /// Returns the children of `id` in order.
    fn child_ids(&self, id: NodeId) -> Result<Vec<NodeId>>;

    /// Returns the sibling after `id`, `None` for the last child.
    fn next_sibling_id(&self, id: NodeId) -> Result<Option<NodeId>>;

    /// Returns the sibling before `id`, `None` for the first child.
    fn previous_sibling_id(&self, id: NodeId) -> Result<Option<NodeId>>;

    /// Returns the depth of `id`. The root has depth 0.
    fn depth(&self, id: NodeId) -> Result<usize>;

    /// Returns a key derived from the tree's composition and structure.
    ///
    /// Equal keys mean equal output for equal markings, so the key may
    /// address an external cache shared across sessions.
    fn cache_key(&self) -> String;

    /// Registers a listener. Returns `false` if it was already registered.
    fn add_layout_event_listener(&self, listener: Arc<dyn LayoutEventListener>) -> bool;

    /// Unregisters a listener. Returns `false` if it was not registered.
    fn remove_layout_event_listener(&self, listener: &Arc<dyn LayoutEventListener>) -> bool;

    /// Returns the first channel, in pre-order, subscribed under `fname`.
    fn subscribe_id(&self, fname: &str) -> Result<NodeId>;

    /// Returns the id of the root folder.
    fn root_folder_id(&self) -> NodeId;

    /// Returns the id of the layout.
    fn layout_id(&self) -> u32;

    /// Returns an empty description template for `node_type`.
    ///
    /// Fails with [`LayoutError::UnsupportedNodeType`] if the manager does
    /// not permit that type. A channel template needs an fname before it
    /// can be added.
    fn create_node_description(&self, node_type: NodeType) -> Result<NodeDescription>;

    /// Adds a node if [`can_add_node`](Self::can_add_node) allows it.
    fn add_node(
        &self,
        description: NodeDescription,
        parent: NodeId,
        next_sibling: Option<NodeId>,
    ) -> Result<NodeId>;

    /// Moves a node if [`can_move_node`](Self::can_move_node) allows it.
    fn move_node(&self, id: NodeId, parent: NodeId, next_sibling: Option<NodeId>) -> Result<()>;

    /// Deletes a node and its subtree if
    /// [`can_delete_node`](Self::can_delete_node) allows it.
    fn delete_node(&self, id: NodeId) -> Result<()>;

    /// Replaces a description if [`can_update_node`](Self::can_update_node)
    /// allows it.
    fn update_node(&self, id: NodeId, description: NodeDescription) -> Result<()>;
}

#[derive(Debug)]
struct ManagerState {
    layout: UserLayout,
    markings: Markings,
    /// [`UserLayout::fingerprint`] as of the last drained change set.
    fingerprint: u64,
}

/// An in-memory [`LayoutManager`] for one user session.
pub struct SimpleLayoutManager {
    config: LayoutConfig,
    state: Mutex<ManagerState>,
    listeners: Mutex<Vec<Arc<dyn LayoutEventListener>>>,
}

impl core::fmt::Debug for SimpleLayoutManager {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SimpleLayoutManager")
            .field("config", &self.config)
            .field("listeners", &lock(&self.listeners).len())
            .finish_non_exhaustive()
    }
}

impl SimpleLayoutManager {
    /// Creates a manager owning `layout`.
    #[must_use]
    pub fn new(mut layout: UserLayout, config: LayoutConfig) -> Self {
        // Whatever built the layout is not a change the caller has seen a
        // key for.
        let _ = layout.collect_changes();
        let fingerprint = layout.fingerprint();
        Self {
            config,
            state: Mutex::new(ManagerState {
                layout,
                markings: Markings::default(),
                fingerprint,
            }),
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Returns the tag shared by every cache entry derived from this layout.
    #[must_use]
    pub fn cache_tag(&self) -> CacheEntryTag {
        CacheEntryTag::of(USER_LAYOUT_TAG, self.layout_id().to_string())
    }

    fn lock_state(&self) -> MutexGuard<'_, ManagerState> {
        lock(&self.state)
    }

    /// Runs `f` under the state lock, then delivers its notification.
    fn apply<T>(
        &self,
        f: impl FnOnce(&mut ManagerState, &LayoutConfig) -> Result<(T, Notification)>,
    ) -> Result<T> {
        let mut state = self.lock_state();
        let outcome = f(&mut *state, &self.config);
        drop(state);
        let (value, notification) = outcome?;
        self.notify(&notification);
        Ok(value)
    }

    fn notify(&self, notification: &Notification) {
        let listeners = lock(&self.listeners).clone();
        for listener in &listeners {
            notification.deliver(listener.as_ref());
        }
    }
}

impl LayoutManager for SimpleLayoutManager {
    fn user_layout(&self) -> MarkedLayout {
        let state = self.lock_state();
        MarkedLayout {
            layout: state.layout.clone(),
            markings: state.markings.clone(),
        }
    }

    fn set_user_layout(&self, mut layout: UserLayout) -> Result<()> {
        layout.validate()?;
        let _ = layout.collect_changes();
        let layout_id = layout.layout_id();
        let fingerprint = layout.fingerprint();
        {
            let mut state = self.lock_state();
            state.layout = layout;
            state.markings = Markings::default();
            state.fingerprint = fingerprint;
            debug!(
                "loaded layout {layout_id} ({} nodes)",
                state.layout.node_count()
            );
        }
        self.notify(&Notification::Loaded(layout_id));
        Ok(())
    }

    // Writes run the handler on a snapshot so it may call back into the
    // manager.
    fn write_user_layout(&self, handler: &mut dyn ContentHandler) -> Result<()> {
        self.user_layout().write(&self.config, handler)
    }

    fn write_subtree(&self, id: NodeId, handler: &mut dyn ContentHandler) -> Result<()> {
        self.user_layout().write_subtree(id, &self.config, handler)
    }

    fn node(&self, id: NodeId) -> Result<NodeDescription> {
        self.lock_state().layout.node(id).cloned()
    }

    fn can_add_node(
        &self,
        description: &NodeDescription,
        parent: NodeId,
        next_sibling: Option<NodeId>,
    ) -> Result<bool> {
        self.lock_state()
            .layout
            .can_add_node(&self.config, description, parent, next_sibling)
    }

    fn can_move_node(
        &self,
        id: NodeId,
        parent: NodeId,
        next_sibling: Option<NodeId>,
    ) -> Result<bool> {
        self.lock_state()
            .layout
            .can_move_node(&self.config, id, parent, next_sibling)
    }

    fn can_delete_node(&self, id: NodeId) -> Result<bool> {
        self.lock_state().layout.can_delete_node(id)
    }

    fn can_update_node(&self, id: NodeId, description: &NodeDescription) -> Result<bool> {
        self.lock_state().layout.can_update_node(id, description)
    }

    fn markings(&self) -> Markings {
        self.lock_state().markings.clone()
    }

    fn mark_add_targets(&self, description: Option<&NodeDescription>) {
        trace!(
            "add targets {}",
            if description.is_some() { "marked" } else { "cleared" }
        );
        self.lock_state().markings.add = description.cloned();
    }

    fn mark_move_targets(&self, id: Option<NodeId>) -> Result<()> {
        let mut state = self.lock_state();
        if let Some(id) = id {
            state.layout.resolve(id)?;
        }
        match id {
            Some(id) => trace!("move targets marked for {id}"),
            None => trace!("move targets cleared"),
        }
        state.markings.move_node = id;
        Ok(())
    }

    fn parent_id(&self, id: NodeId) -> Result<Option<NodeId>> {
        self.lock_state().layout.parent(id)
    }

    fn child_ids(&self, id: NodeId) -> Result<Vec<NodeId>> {
        self.lock_state().layout.child_ids(id)
    }

    fn next_sibling_id(&self, id: NodeId) -> Result<Option<NodeId>> {
        self.lock_state().layout.next_sibling(id)
    }

    fn previous_sibling_id(&self, id: NodeId) -> Result<Option<NodeId>> {
        self.lock_state().layout.previous_sibling(id)
    }

    fn depth(&self, id: NodeId) -> Result<usize> {
        self.lock_state().layout.depth(id)
    }

    fn cache_key(&self) -> String {
        let mut state = self.lock_state();
        let changes = state.layout.collect_changes();
        if !changes.is_empty() {
            state.fingerprint = state.layout.fingerprint();
            trace!(
                "layout {} rekeyed ({} added, {} removed, {} restructured, {} redescribed)",
                state.layout.layout_id(),
                changes.added.len(),
                changes.removed.len(),
                changes.restructured.len(),
                changes.redescribed.len(),
            );
        }
        format!("{}:{:016x}", state.layout.layout_id(), state.fingerprint)
    }

    fn add_layout_event_listener(&self, listener: Arc<dyn LayoutEventListener>) -> bool {
        let mut listeners = lock(&self.listeners);
        if listeners.iter().any(|l| Arc::ptr_eq(l, &listener)) {
            return false;
        }
        listeners.push(listener);
        true
    }

    fn remove_layout_event_listener(&self, listener: &Arc<dyn LayoutEventListener>) -> bool {
        let mut listeners = lock(&self.listeners);
        let Some(pos) = listeners.iter().position(|l| Arc::ptr_eq(l, listener)) else {
            return false;
        };
        listeners.remove(pos);
        true
    }

    fn subscribe_id(&self, fname: &str) -> Result<NodeId> {
        self.lock_state()
            .layout
            .find_fname(fname)
            .ok_or_else(|| LayoutError::UnknownFname {
                fname: fname.to_owned(),
            })
    }

    fn root_folder_id(&self) -> NodeId {
        NodeId::ROOT
    }

    fn layout_id(&self) -> u32 {
        self.lock_state().layout.layout_id()
    }

    fn create_node_description(&self, node_type: NodeType) -> Result<NodeDescription> {
        if !self.config.permitted_types.allows(node_type) {
            return Err(LayoutError::unsupported(node_type));
        }
        Ok(NodeDescription::empty(node_type))
    }

    fn add_node(
        &self,
        description: NodeDescription,
        parent: NodeId,
        next_sibling: Option<NodeId>,
    ) -> Result<NodeId> {
        self.apply(|state, config| {
            if !state
                .layout
                .can_add_node(config, &description, parent, next_sibling)?
            {
                return Err(denied(Operation::Add, parent));
            }
            let id = state
                .layout
                .insert(parent, next_sibling, description.clone())?;
            debug!("added {} {id} under {parent}", description.node_type());
            let event = NodeEvent {
                node_id: id,
                parent_id: Some(parent),
                description,
            };
            Ok((id, Notification::Added(event)))
        })
    }

    fn move_node(&self, id: NodeId, parent: NodeId, next_sibling: Option<NodeId>) -> Result<()> {
        self.apply(|state, config| {
            if !state
                .layout
                .can_move_node(config, id, parent, next_sibling)?
            {
                return Err(denied(Operation::Move, id));
            }
            let Some(old_parent_id) = state.layout.parent(id)? else {
                return Err(denied(Operation::Move, id));
            };
            state.layout.relocate(id, parent, next_sibling)?;
            debug!("moved {id} from {old_parent_id} to {parent}");
            let event = NodeMoveEvent {
                node_id: id,
                old_parent_id,
                parent_id: parent,
                description: state.layout.node(id)?.clone(),
            };
            Ok(((), Notification::Moved(event)))
        })
    }

    fn delete_node(&self, id: NodeId) -> Result<()> {
        self.apply(|state, _| {
            if !state.layout.can_delete_node(id)? {
                return Err(denied(Operation::Delete, id));
            }
            let Some(old_parent_id) = state.layout.parent(id)? else {
                return Err(denied(Operation::Delete, id));
            };
            let description = state.layout.node(id)?.clone();
            let removed = state.layout.remove(id)?;
            if state
                .markings
                .move_node
                .is_some_and(|marked| removed.contains(&marked))
            {
                state.markings.move_node = None;
            }
            debug!("deleted {id} and {} descendants", removed.len() - 1);
            let event = NodeDeleteEvent {
                node_id: id,
                old_parent_id,
                description,
                removed: removed.len(),
            };
            Ok(((), Notification::Deleted(event)))
        })
    }

    fn update_node(&self, id: NodeId, description: NodeDescription) -> Result<()> {
        self.apply(|state, _| {
            if !state.layout.can_update_node(id, &description)? {
                return Err(denied(Operation::Update, id));
            }
            state.layout.update(id, description.clone())?;
            debug!("updated {id}");
            let event = NodeEvent {
                node_id: id,
                parent_id: state.layout.parent(id)?,
                description,
            };
            Ok(((), Notification::Updated(event)))
        })
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn denied(operation: Operation, id: NodeId) -> LayoutError {
    warn!("{operation} of {id} refused");
    LayoutError::NotPermitted { operation, id }
}
