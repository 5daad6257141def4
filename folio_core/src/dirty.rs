// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! Layout mutations mark the affected node on one of two channels (via
//! [`understory_dirty`]). Neither channel propagates: a change is recorded on
//! the node whose child list or description actually changed.
//!
//! - [`STRUCTURE`] is marked on the parent whose child list changed (insert,
//!   relocate, remove) and on newly inserted nodes.
//! - [`DESCRIPTION`] is marked on a node whose description was replaced.
//!
//! [`UserLayout::collect_changes`](crate::layout::UserLayout::collect_changes)
//! drains both channels into a [`LayoutChanges`](crate::layout::LayoutChanges),
//! which the layout manager folds into its cache-key revision.

use understory_dirty::Channel;

/// A child list changed.
pub const STRUCTURE: Channel = Channel::new(0);

/// A node description was replaced.
pub const DESCRIPTION: Channel = Channel::new(1);
