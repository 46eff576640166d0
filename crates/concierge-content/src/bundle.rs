// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fully-built, immutable content bundles.
//!
//! A [`ContentBundle`] is built once from a [`RawBundle`] and then shared;
//! building is pure given the raw content, so the resolver memoizes bundles
//! for the whole process lifetime.

use std::collections::HashMap;

use concierge_core::types::actions;
use concierge_core::{CannedAnswer, Menu, MenuButton, RawBundle};

/// Names of the message templates a bundle is expected to carry.
pub mod templates {
    pub const GREETING: &str = "greeting";
    pub const CHOOSE_PLATFORM: &str = "choose_platform";
    pub const SUPPORT_PROMPT: &str = "support.prompt";
    pub const SUPPORT_TEXT_ONLY: &str = "support.text_only";
    pub const SUPPORT_CANCELLED: &str = "support.cancelled";
    pub const SUPPORT_SUBMITTED: &str = "support.submitted";
    pub const SUPPORT_RESOLVED: &str = "support.resolved";
    pub const SUPPORT_REMINDER: &str = "support.reminder";
    pub const FALLBACK: &str = "fallback";
    pub const ADMIN_ONLY: &str = "admin_only";
    pub const STATS_TITLE: &str = "stats.title";
    pub const STATS_EVENTS: &str = "stats.events";
    pub const STATS_USERS: &str = "stats.users";
    pub const STATS_BY_EVENT: &str = "stats.by_event";
    pub const STATS_TOP_FAQ: &str = "stats.top_faq";
    pub const STATS_TOP_INSTALL: &str = "stats.top_install";
    pub const STATS_FEEDBACK: &str = "stats.feedback";
}

/// Names of the button labels a bundle is expected to carry.
pub mod labels {
    pub const MAIN_KEYS: &str = "main.keys";
    pub const MAIN_INSTALL: &str = "main.install";
    pub const MAIN_RENEW: &str = "main.renew";
    pub const MAIN_INVITE: &str = "main.invite";
    pub const MAIN_SUPPORT: &str = "main.support";
    pub const INSTALL_IOS: &str = "install.ios";
    pub const INSTALL_ANDROID: &str = "install.android";
    pub const INSTALL_WINDOWS: &str = "install.windows";
    pub const INSTALL_MACOS: &str = "install.macos";
    pub const INSTALL_LINUX: &str = "install.linux";
    pub const INSTALL_BACK: &str = "install.back";
    pub const INSTALL_SUPPORT: &str = "install.support";
    pub const SUPPORT_CANCEL: &str = "support.cancel";
    pub const SUPPORT_RESOLVED: &str = "support.resolved";
    pub const ANSWER_HELPFUL: &str = "answer.helpful";
    pub const ANSWER_UNHELPFUL: &str = "answer.unhelpful";
    pub const ANSWER_MAIN_MENU: &str = "answer.main_menu";
}

/// One language's menus, canned answers, templates and report labels.
#[derive(Debug, Clone)]
pub struct ContentBundle {
    pub tag: String,
    pub main_menu: Menu,
    pub install_menu: Menu,
    pub support_menu: Menu,
    pub reminder_menu: Menu,
    /// Menu left on an answer after feedback: just the way back.
    pub answer_menu_base: Menu,
    pub answers: HashMap<String, CannedAnswer>,
    pub install_answers: HashMap<String, CannedAnswer>,
    templates: HashMap<String, String>,
    labels: HashMap<String, String>,
    subject_labels: HashMap<String, String>,
}

impl ContentBundle {
    /// Builds a bundle from raw content.
    ///
    /// `languages` is the full `(tag, native name)` list of loaded
    /// languages; when more than one is loaded the main menu gets a
    /// selection row. Pure: same inputs, same bundle.
    pub fn build(raw: &RawBundle, languages: &[(String, String)]) -> Self {
        let label = |name: &str| {
            raw.labels
                .get(name)
                .cloned()
                .unwrap_or_else(|| name.to_string())
        };

        let mut main_rows = vec![
            vec![MenuButton::new(label(labels::MAIN_KEYS), actions::MAIN_KEYS)],
            vec![MenuButton::new(
                label(labels::MAIN_INSTALL),
                actions::MAIN_INSTALL,
            )],
            vec![MenuButton::new(
                label(labels::MAIN_RENEW),
                actions::MAIN_RENEW,
            )],
            vec![MenuButton::new(
                label(labels::MAIN_INVITE),
                actions::MAIN_INVITE,
            )],
            vec![MenuButton::new(
                label(labels::MAIN_SUPPORT),
                actions::SUPPORT_START,
            )],
        ];
        if languages.len() > 1 {
            main_rows.push(
                languages
                    .iter()
                    .map(|(tag, name)| {
                        MenuButton::new(name.clone(), format!("{}{tag}", actions::LANGUAGE_PREFIX))
                    })
                    .collect(),
            );
        }

        let install_menu = Menu::new(vec![
            vec![
                MenuButton::new(label(labels::INSTALL_IOS), "install:ios"),
                MenuButton::new(label(labels::INSTALL_ANDROID), "install:android"),
            ],
            vec![
                MenuButton::new(label(labels::INSTALL_WINDOWS), "install:windows"),
                MenuButton::new(label(labels::INSTALL_MACOS), "install:macos"),
            ],
            vec![MenuButton::new(label(labels::INSTALL_LINUX), "install:linux")],
            vec![MenuButton::new(
                label(labels::INSTALL_BACK),
                actions::INSTALL_BACK,
            )],
            vec![MenuButton::new(
                label(labels::INSTALL_SUPPORT),
                actions::SUPPORT_START,
            )],
        ]);

        let support_menu = Menu::single(label(labels::SUPPORT_CANCEL), actions::SUPPORT_CANCEL);

        let reminder_menu = Menu::new(vec![
            vec![MenuButton::new(
                label(labels::SUPPORT_RESOLVED),
                actions::SUPPORT_RESOLVED,
            )],
            vec![MenuButton::new(
                label(labels::SUPPORT_CANCEL),
                actions::SUPPORT_CANCEL,
            )],
        ]);

        let answer_menu_base =
            Menu::single(label(labels::ANSWER_MAIN_MENU), actions::MAIN_MENU_OPEN);

        Self {
            tag: raw.tag.clone(),
            main_menu: Menu::new(main_rows),
            install_menu,
            support_menu,
            reminder_menu,
            answer_menu_base,
            answers: raw.answers.clone(),
            install_answers: raw.install_answers.clone(),
            templates: raw.templates.clone(),
            labels: raw.labels.clone(),
            subject_labels: raw.subject_labels.clone(),
        }
    }

    /// The menu attached to a freshly-sent answer: feedback row plus the
    /// way back to the main menu.
    pub fn answer_menu(&self, subject: &str) -> Menu {
        let mut rows = vec![vec![
            MenuButton::new(
                self.label(labels::ANSWER_HELPFUL),
                format!("{}{subject}", actions::FEEDBACK_HELPFUL_PREFIX),
            ),
            MenuButton::new(
                self.label(labels::ANSWER_UNHELPFUL),
                format!("{}{subject}", actions::FEEDBACK_UNHELPFUL_PREFIX),
            ),
        ]];
        rows.extend(self.answer_menu_base.rows.clone());
        Menu::new(rows)
    }

    /// A message template by name; falls back to the name itself so a
    /// missing template is visible rather than fatal.
    pub fn template(&self, name: &str) -> String {
        self.templates
            .get(name)
            .cloned()
            .unwrap_or_else(|| name.to_string())
    }

    /// The human label for a reporting subject, falling back to the raw
    /// subject value.
    pub fn subject_label(&self, subject: &str) -> String {
        self.subject_labels
            .get(subject)
            .cloned()
            .unwrap_or_else(|| subject.to_string())
    }

    fn label(&self, name: &str) -> String {
        self.labels
            .get(name)
            .cloned()
            .unwrap_or_else(|| name.to_string())
    }
}
