// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing, JSON export, logging, and storage for folio layouts.
//!
//! This crate provides stand-ins for the collaborators around a layout
//! manager, for development and tests:
//!
//! - [`pretty::PrettyPrintHandler`]: a
//!   [`ContentHandler`](folio_core::sink::ContentHandler) writing indented
//!   markup.
//! - [`json::export`]: writes recorded output as a JSON element tree.
//! - [`document`]: JSON storage of whole layouts.
//! - [`listener::LogListener`]: logs every layout event.

pub mod document;
pub mod json;
pub mod listener;
pub mod pretty;
