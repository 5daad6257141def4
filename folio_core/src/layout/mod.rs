// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout tree data model.
//!
//! A [`UserLayout`] is the whole tree of one user. Each node has:
//!
//! - An identity ([`NodeId`]), a generational handle that stops resolving
//!   once the node is deleted.
//! - Topology: parent, first-child, and sibling links forming an ordered
//!   tree. Only folders have children.
//! - A [`NodeDescription`] snapshot of its configurable attributes.
//!
//! Nodes are stored in struct-of-arrays layout with index-based handles.
//!
//! # Dirty tracking
//!
//! Mutations automatically mark the corresponding dirty channel (see
//! [`dirty`](crate::dirty)), and [`UserLayout::collect_changes`] drains them
//! into a [`LayoutChanges`].
//!
//! [`NodeId`]: crate::node::NodeId
//! [`NodeDescription`]: crate::node::NodeDescription

mod changes;
mod document;
mod store;
mod traverse;

pub use changes::LayoutChanges;
pub use document::{DocumentNode, LayoutDocument};
pub use store::UserLayout;
pub use traverse::{Children, Descendants};
