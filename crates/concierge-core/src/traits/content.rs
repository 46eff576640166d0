// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Content source trait for localized catalogs.

use crate::types::RawBundle;

/// Supplier of raw per-language content.
///
/// Loading must be pure: given the same tag, `load` returns the same
/// content for the whole process lifetime, so callers may memoize what
/// they build from it.
pub trait ContentSource: Send + Sync {
    /// Tags of every loaded language.
    fn languages(&self) -> Vec<String>;

    /// Raw content for one language, or `None` if the tag is not loaded.
    fn load(&self, tag: &str) -> Option<RawBundle>;
}
