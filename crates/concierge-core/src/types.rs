// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across the Concierge workspace.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Identity of one conversation: a user within a chat.
///
/// Stable for the process lifetime; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionKey {
    pub chat_id: i64,
    pub user_id: i64,
}

impl SessionKey {
    pub fn new(chat_id: i64, user_id: i64) -> Self {
        Self { chat_id, user_id }
    }
}

/// Identifier of a message assigned by the messaging gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub i64);

/// The sender of an inbound event, as reported by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRef {
    pub id: i64,
    pub username: Option<String>,
    pub full_name: Option<String>,
}

/// Envelope shared by every inbound event.
#[derive(Debug, Clone)]
pub struct InboundMeta {
    pub chat_id: i64,
    pub user: Option<UserRef>,
    /// Locale hint from the transport (e.g. an IETF language code).
    pub language_hint: Option<String>,
}

impl InboundMeta {
    /// The session this event belongs to, when the sender is known.
    pub fn session_key(&self) -> Option<SessionKey> {
        self.user
            .as_ref()
            .map(|u| SessionKey::new(self.chat_id, u.id))
    }
}

/// An inbound event delivered by the messaging gateway.
#[derive(Debug, Clone)]
pub enum InboundEvent {
    /// A slash command, name given without the leading `/`.
    Command { meta: InboundMeta, name: String },
    /// A button press carrying its callback payload.
    Callback { meta: InboundMeta, data: String },
    /// A plain text message.
    Text { meta: InboundMeta, body: String },
    /// Any non-text message; `kind` names the content type.
    NonText { meta: InboundMeta, kind: String },
}

impl InboundEvent {
    pub fn meta(&self) -> &InboundMeta {
        match self {
            InboundEvent::Command { meta, .. }
            | InboundEvent::Callback { meta, .. }
            | InboundEvent::Text { meta, .. }
            | InboundEvent::NonText { meta, .. } => meta,
        }
    }
}

/// A single inline button: visible label plus the callback payload it emits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuButton {
    pub label: String,
    pub action: String,
}

impl MenuButton {
    pub fn new(label: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: action.into(),
        }
    }
}

/// An inline menu as rows of buttons.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Menu {
    pub rows: Vec<Vec<MenuButton>>,
}

impl Menu {
    pub fn new(rows: Vec<Vec<MenuButton>>) -> Self {
        Self { rows }
    }

    /// A one-row, one-button menu.
    pub fn single(label: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            rows: vec![vec![MenuButton::new(label, action)]],
        }
    }
}

/// Kind of media attached to a canned answer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Photo,
    Video,
}

/// Reference to a media file shipped alongside the content catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRef {
    pub path: PathBuf,
    pub kind: MediaKind,
}

/// A canned answer: text plus an optional media attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CannedAnswer {
    pub text: String,
    pub media: Option<MediaRef>,
}

impl CannedAnswer {
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            media: None,
        }
    }
}

/// Raw, per-language content as produced by a [`crate::ContentSource`].
///
/// Everything a built bundle needs: message templates keyed by name, canned
/// answers keyed by callback action, button labels keyed by action, human
/// subject labels for reporting, and the cancel trigger phrases.
#[derive(Debug, Clone, Default)]
pub struct RawBundle {
    pub tag: String,
    /// The language's own name, used to label its selection button.
    pub native_name: String,
    pub templates: HashMap<String, String>,
    pub answers: HashMap<String, CannedAnswer>,
    pub install_answers: HashMap<String, CannedAnswer>,
    pub labels: HashMap<String, String>,
    pub subject_labels: HashMap<String, String>,
    pub cancel_phrases: Vec<String>,
}

/// Callback action identifiers shared between the engine and the content
/// catalog. Button payloads on the wire are exactly these strings.
pub mod actions {
    pub const MAIN_KEYS: &str = "main:keys";
    pub const MAIN_INSTALL: &str = "main:install";
    pub const MAIN_RENEW: &str = "main:renew";
    pub const MAIN_INVITE: &str = "main:invite";
    pub const MAIN_MENU_OPEN: &str = "main:menu";
    pub const SUPPORT_START: &str = "support:start";
    pub const SUPPORT_CANCEL: &str = "support:cancel";
    pub const SUPPORT_RESOLVED: &str = "support:resolved";
    pub const INSTALL_BACK: &str = "install:back";
    pub const FEEDBACK_HELPFUL_PREFIX: &str = "feedback:yes:";
    pub const FEEDBACK_UNHELPFUL_PREFIX: &str = "feedback:no:";
    pub const LANGUAGE_PREFIX: &str = "lang:";
}
