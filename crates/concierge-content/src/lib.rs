// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Localized content for the Concierge support agent.
//!
//! A [`LanguageResolver`] maps users to language tags (explicit selection,
//! locale-hint prefix, configured default, in that order) and serves
//! memoized [`ContentBundle`]s built from a [`concierge_core::ContentSource`].
//! The built-in [`StaticCatalog`] ships Russian and English bundles.

pub mod bundle;
pub mod catalog;
pub mod resolver;

pub use bundle::{labels, templates, ContentBundle};
pub use catalog::StaticCatalog;
pub use resolver::LanguageResolver;
