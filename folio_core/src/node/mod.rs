// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node identity, types, and descriptions.

mod description;
mod id;

pub use description::{
    ChannelDescription, FolderDescription, FolderType, NodeDescription, NodeKind, NodeType,
};
pub(crate) use id::INVALID;
pub use id::NodeId;
