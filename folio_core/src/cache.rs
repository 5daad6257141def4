// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cache entry tags.
//!
//! A [`CacheEntryTag`] is one component of a compound cache key: a
//! `(type, value)` pair, either half of which may be absent. Tags compare by
//! value and carry a hash code fixed at construction, so a tag can be used as
//! a map key across threads and processes that agree on the hashing scheme.

use core::fmt;
use core::hash::{Hash, Hasher};

/// An immutable `(tag_type, tag_value)` pair.
///
/// Two tags are equal iff both halves are equal, with an absent half equal
/// only to another absent half. The hash code is computed once as
/// `31 * (31 + h(tag_type)) + h(tag_value)`, where `h` is
/// [`string_hash_code`] and `h(None) = 0`.
#[derive(Clone)]
pub struct CacheEntryTag {
    tag_type: Option<String>,
    tag_value: Option<String>,
    hash: i32,
}

impl CacheEntryTag {
    /// Creates a tag. Either half may be absent.
    #[must_use]
    pub fn new(tag_type: Option<String>, tag_value: Option<String>) -> Self {
        const PRIME: i32 = 31;
        let h = |s: &Option<String>| s.as_deref().map_or(0, string_hash_code);
        let hash = PRIME
            .wrapping_mul(PRIME.wrapping_add(h(&tag_type)))
            .wrapping_add(h(&tag_value));
        Self {
            tag_type,
            tag_value,
            hash,
        }
    }

    /// Creates a tag with both halves present.
    #[must_use]
    pub fn of(tag_type: impl Into<String>, tag_value: impl Into<String>) -> Self {
        Self::new(Some(tag_type.into()), Some(tag_value.into()))
    }

    /// Returns the tag type.
    #[must_use]
    pub fn tag_type(&self) -> Option<&str> {
        self.tag_type.as_deref()
    }

    /// Returns the tag value.
    #[must_use]
    pub fn tag_value(&self) -> Option<&str> {
        self.tag_value.as_deref()
    }

    /// Returns the hash code fixed at construction.
    #[must_use]
    pub const fn hash_code(&self) -> i32 {
        self.hash
    }
}

impl PartialEq for CacheEntryTag {
    fn eq(&self, other: &Self) -> bool {
        // The cached hash is a cheap early out; equality is decided by the fields.
        self.hash == other.hash
            && self.tag_type == other.tag_type
            && self.tag_value == other.tag_value
    }
}

impl Eq for CacheEntryTag {}

impl Hash for CacheEntryTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_i32(self.hash);
    }
}

impl fmt::Debug for CacheEntryTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheEntryTag")
            .field("tag_type", &self.tag_type)
            .field("tag_value", &self.tag_value)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for CacheEntryTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CacheEntryTag [tagType={}, tagValue={}]",
            self.tag_type.as_deref().unwrap_or("null"),
            self.tag_value.as_deref().unwrap_or("null"),
        )
    }
}

/// The conventional 32-bit string hash: `s[0]*31^(n-1) + ... + s[n-1]` over
/// UTF-16 code units, with wrapping arithmetic.
#[must_use]
pub fn string_hash_code(s: &str) -> i32 {
    s.encode_utf16()
        .fold(0_i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
}
