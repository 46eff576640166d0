// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Language resolution and memoized bundle cache.
//!
//! Raw content is read from the [`ContentSource`] once at construction;
//! built bundles are memoized on first access and never invalidated, which
//! is safe because building is pure.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use concierge_core::{ConciergeError, ContentSource, RawBundle};
use dashmap::DashMap;
use tracing::debug;

use crate::bundle::ContentBundle;

/// Maps users to languages and language tags to built content bundles.
#[derive(Debug)]
pub struct LanguageResolver {
    default_tag: String,
    raws: HashMap<String, RawBundle>,
    /// `(tag, native name)` for every loaded language, sorted by tag so
    /// menus come out deterministic.
    names: Vec<(String, String)>,
    /// Lowercased cancel phrases across all loaded languages.
    cancel_phrases: Vec<String>,
    selected: DashMap<i64, String>,
    bundles: Mutex<HashMap<String, Arc<ContentBundle>>>,
}

impl LanguageResolver {
    /// Reads every language from the source. Fails if the configured
    /// default language is not among them.
    pub fn new(source: &dyn ContentSource, default_tag: &str) -> Result<Self, ConciergeError> {
        let mut raws = HashMap::new();
        for tag in source.languages() {
            if let Some(raw) = source.load(&tag) {
                raws.insert(tag, raw);
            }
        }

        if !raws.contains_key(default_tag) {
            return Err(ConciergeError::Config(format!(
                "content.default_language `{default_tag}` has no loaded content"
            )));
        }

        let mut names: Vec<(String, String)> = raws
            .values()
            .map(|raw| (raw.tag.clone(), raw.native_name.clone()))
            .collect();
        names.sort();

        let cancel_phrases: Vec<String> = raws
            .values()
            .flat_map(|raw| raw.cancel_phrases.iter())
            .map(|phrase| phrase.to_lowercase())
            .collect();

        Ok(Self {
            default_tag: default_tag.to_string(),
            raws,
            names,
            cancel_phrases,
            selected: DashMap::new(),
            bundles: Mutex::new(HashMap::new()),
        })
    }

    /// Tags of all loaded languages, sorted.
    pub fn languages(&self) -> Vec<String> {
        self.names.iter().map(|(tag, _)| tag.clone()).collect()
    }

    pub fn default_tag(&self) -> &str {
        &self.default_tag
    }

    /// Resolves the language for a user: explicit selection first, then a
    /// short-prefix match of the locale hint, then the default.
    pub fn resolve(&self, user_id: i64, hint: Option<&str>) -> String {
        if let Some(tag) = self.selected.get(&user_id) {
            return tag.clone();
        }

        if let Some(hint) = hint {
            let prefix: String = hint
                .split(['-', '_'])
                .next()
                .unwrap_or(hint)
                .to_lowercase();
            if self.raws.contains_key(&prefix) {
                return prefix;
            }
        }

        self.default_tag.clone()
    }

    /// Records an explicit per-user selection. Unknown tags are ignored.
    pub fn set_language(&self, user_id: i64, tag: &str) -> bool {
        if self.raws.contains_key(tag) {
            self.selected.insert(user_id, tag.to_string());
            true
        } else {
            false
        }
    }

    /// Drops the user's explicit selection, if any.
    pub fn reset_language(&self, user_id: i64) {
        self.selected.remove(&user_id);
    }

    /// The built bundle for a tag, building and memoizing on first access.
    /// Unknown tags fall back to the default language's bundle.
    pub fn bundle(&self, tag: &str) -> Arc<ContentBundle> {
        let tag = if self.raws.contains_key(tag) {
            tag
        } else {
            &self.default_tag
        };

        let mut bundles = self.bundles.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(bundle) = bundles.get(tag) {
            return bundle.clone();
        }

        debug!(tag, "building content bundle");
        let raw = &self.raws[tag];
        let bundle = Arc::new(ContentBundle::build(raw, &self.names));
        bundles.insert(tag.to_string(), bundle.clone());
        bundle
    }

    /// Whether `text` matches a cancel phrase of any loaded language,
    /// case-insensitively. Tolerates language-detection mismatches by
    /// design: the cancel word of any supported language always works.
    pub fn is_cancel_phrase(&self, text: &str) -> bool {
        let needle = text.trim().to_lowercase();
        self.cancel_phrases.iter().any(|phrase| *phrase == needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalog;

    fn resolver() -> LanguageResolver {
        let catalog = StaticCatalog::builtin("media");
        LanguageResolver::new(&catalog, "ru").unwrap()
    }

    #[test]
    fn missing_default_language_is_a_config_error() {
        let catalog = StaticCatalog::builtin("media");
        let err = LanguageResolver::new(&catalog, "de").unwrap_err();
        assert!(matches!(err, ConciergeError::Config(_)));
    }

    #[test]
    fn explicit_selection_beats_hint() {
        let resolver = resolver();
        assert!(resolver.set_language(7, "en"));
        assert_eq!(resolver.resolve(7, Some("ru-RU")), "en");
    }

    #[test]
    fn hint_prefix_matches_loaded_language() {
        let resolver = resolver();
        assert_eq!(resolver.resolve(1, Some("en-US")), "en");
        assert_eq!(resolver.resolve(1, Some("en_GB")), "en");
        assert_eq!(resolver.resolve(1, Some("EN")), "en");
    }

    #[test]
    fn unknown_hint_falls_back_to_default() {
        let resolver = resolver();
        assert_eq!(resolver.resolve(1, Some("de-DE")), "ru");
        assert_eq!(resolver.resolve(1, None), "ru");
    }

    #[test]
    fn reset_returns_user_to_hint_resolution() {
        let resolver = resolver();
        resolver.set_language(7, "en");
        resolver.reset_language(7);
        assert_eq!(resolver.resolve(7, None), "ru");
    }

    #[test]
    fn selecting_unknown_language_is_ignored() {
        let resolver = resolver();
        assert!(!resolver.set_language(7, "de"));
        assert_eq!(resolver.resolve(7, None), "ru");
    }

    #[test]
    fn bundles_are_memoized() {
        let resolver = resolver();
        let first = resolver.bundle("en");
        let second = resolver.bundle("en");
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn unknown_tag_bundles_fall_back_to_default() {
        let resolver = resolver();
        let bundle = resolver.bundle("de");
        assert_eq!(bundle.tag, "ru");
    }

    #[test]
    fn cancel_phrases_union_across_languages() {
        let resolver = resolver();
        assert!(resolver.is_cancel_phrase("Cancel"));
        assert!(resolver.is_cancel_phrase("ОТМЕНА"));
        assert!(resolver.is_cancel_phrase("  cancel  "));
        assert!(!resolver.is_cancel_phrase("stop"));
    }
}
