// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-user portal layout trees and the manager that mediates them.
//!
//! `folio_core` models a user's portal layout as an ordered tree of folders
//! and channels, stored struct-of-arrays with generational handles. A layout
//! manager wraps one tree per user session: it answers structural queries,
//! evaluates permissions, marks drop targets for pending gestures, streams
//! the tree to a content handler, and derives a cache key from the tree's
//! composition.
//!
//! # Architecture
//!
//! ```text
//!   persistence ──► LayoutDocument ──► UserLayout::from_document()
//!                                            │
//!                                            ▼
//!   caller ──► LayoutManager::add_node() ──► can_add_node() ──► UserLayout::insert()
//!                     │                                               │
//!                     │                            dirty channels ◄───┘
//!                     ▼                                   │
//!   LayoutEventListener::node_added()        cache_key() ◄┘
//!
//!   LayoutManager::write_user_layout() ──► ContentHandler (start/end element)
//! ```
//!
//! **[`node`]**: node identity ([`NodeId`](node::NodeId), with the reserved
//! [`NodeId::ROOT`](node::NodeId::ROOT)), node types, and descriptions.
//!
//! **[`layout`]**: the [`UserLayout`](layout::UserLayout) tree store,
//! traversal, change collection, and the nested document form used by
//! persistence.
//!
//! **[`dirty`]**: dirty channels marked by tree mutations via
//! `understory_dirty`.
//!
//! **[`permission`]**: the add, move, delete, and update rules.
//!
//! **[`serialize`]** and **[`sink`]**: the element vocabulary and the
//! [`ContentHandler`](sink::ContentHandler) it is written into.
//!
//! **[`manager`]**: the [`LayoutManager`](manager::LayoutManager) contract
//! and [`SimpleLayoutManager`](manager::SimpleLayoutManager).
//!
//! **[`listener`]**: change notification.
//!
//! **[`cache`]**: [`CacheEntryTag`](cache::CacheEntryTag), an immutable
//! cache key component.
//!
//! **[`config`]**: [`LayoutConfig`](config::LayoutConfig).

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod cache;
pub mod config;
pub mod dirty;
pub mod error;
pub mod layout;
pub mod listener;
pub mod manager;
pub mod node;
pub mod permission;
pub mod serialize;
pub mod sink;

pub use error::{LayoutError, Result};
