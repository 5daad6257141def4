// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node identity.

use core::fmt;
use core::str::FromStr;

use crate::error::LayoutError;

/// Sentinel value indicating "no node" in index fields.
pub(crate) const INVALID: u32 = u32::MAX;

/// A handle to a node in a [`UserLayout`](crate::layout::UserLayout).
///
/// Contains both a slot index and a generation counter so that ids of deleted
/// nodes stop resolving once their slot is reused.
///
/// The text form is `root` for [`NodeId::ROOT`], `n<slot>` for generation zero
/// and `n<slot>.<generation>` otherwise. [`FromStr`] accepts the same forms.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId {
    /// Slot index into the store's arrays.
    pub(crate) idx: u32,
    /// Generation counter; must match the store's generation for this slot.
    pub(crate) generation: u32,
}

impl NodeId {
    /// The reserved id of every layout's root folder.
    pub const ROOT: Self = Self {
        idx: 0,
        generation: 0,
    };

    /// Text form of [`NodeId::ROOT`].
    pub const ROOT_NAME: &'static str = "root";

    /// Returns the raw slot index (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }

    /// Returns whether this is the root id.
    #[inline]
    #[must_use]
    pub const fn is_root(self) -> bool {
        self.idx == Self::ROOT.idx && self.generation == Self::ROOT.generation
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({}@gen{})", self.idx, self.generation)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            f.write_str(Self::ROOT_NAME)
        } else if self.generation == 0 {
            write!(f, "n{}", self.idx)
        } else {
            write!(f, "n{}.{}", self.idx, self.generation)
        }
    }
}

impl FromStr for NodeId {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == Self::ROOT_NAME {
            return Ok(Self::ROOT);
        }
        let invalid = || LayoutError::InvalidNodeId { text: s.to_owned() };
        let body = s.strip_prefix('n').ok_or_else(invalid)?;
        let (idx, generation) = match body.split_once('.') {
            Some((idx, generation)) => (idx, Some(generation)),
            None => (body, None),
        };
        let idx: u32 = idx.parse().map_err(|_| invalid())?;
        let generation: u32 = match generation {
            Some(g) => g.parse().map_err(|_| invalid())?,
            None => 0,
        };
        // Slot 0 only ever holds the root, and `n0` would alias it.
        if idx == 0 || idx == INVALID {
            return Err(invalid());
        }
        Ok(Self { idx, generation })
    }
}
