// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Best-effort single-active-message discipline per chat.
//!
//! Before every send the previous bot message is deleted, so a chat never
//! accumulates stale menus. Deletion and delivery failures are logged and
//! otherwise ignored: a stale message is preferable to a failed interaction.

use std::sync::Arc;

use concierge_core::{CannedAnswer, MessagingGateway, Menu, MessageId};
use dashmap::DashMap;
use tracing::{debug, warn};

/// Tracks the last bot message per chat and replaces it on every send.
pub struct MessageLifecycle {
    gateway: Arc<dyn MessagingGateway>,
    last: DashMap<i64, MessageId>,
}

impl MessageLifecycle {
    pub fn new(gateway: Arc<dyn MessagingGateway>) -> Self {
        Self {
            gateway,
            last: DashMap::new(),
        }
    }

    /// The tracked reference for a chat, if any.
    pub fn last_message(&self, chat_id: i64) -> Option<MessageId> {
        self.last.get(&chat_id).map(|id| *id)
    }

    /// Deletes the tracked message for this chat, if any. The reference is
    /// cleared whether or not the delete succeeds.
    async fn cleanup_previous(&self, chat_id: i64) {
        let Some((_, message_id)) = self.last.remove(&chat_id) else {
            return;
        };
        if let Err(e) = self.gateway.delete(chat_id, message_id).await {
            warn!(
                error = %e,
                chat_id,
                message_id = message_id.0,
                "failed to delete previous message"
            );
        }
    }

    /// Sends a text message, replacing the chat's previous bot message.
    ///
    /// The new message becomes the tracked reference. A failed send leaves
    /// the chat with no tracked message.
    pub async fn send_replacing(&self, chat_id: i64, text: &str, menu: Option<&Menu>) {
        self.cleanup_previous(chat_id).await;
        match self.gateway.send(chat_id, text, menu).await {
            Ok(id) => {
                self.last.insert(chat_id, id);
            }
            Err(e) => warn!(error = %e, chat_id, "failed to send message"),
        }
    }

    /// Sends a canned answer, replacing the previous bot message.
    ///
    /// Media is attached when the referenced file exists; a missing file or
    /// a failed media send degrades to plain text.
    pub async fn send_answer_replacing(&self, chat_id: i64, answer: &CannedAnswer, menu: &Menu) {
        self.cleanup_previous(chat_id).await;

        if let Some(media) = &answer.media {
            if media.path.exists() {
                match self
                    .gateway
                    .send_media(chat_id, media, &answer.text, Some(menu))
                    .await
                {
                    Ok(id) => {
                        self.last.insert(chat_id, id);
                        return;
                    }
                    Err(e) => {
                        warn!(error = %e, chat_id, "media send failed, falling back to text");
                    }
                }
            } else {
                warn!(path = %media.path.display(), "answer media file not found");
            }
        }

        match self.gateway.send(chat_id, &answer.text, Some(menu)).await {
            Ok(id) => {
                self.last.insert(chat_id, id);
            }
            Err(e) => warn!(error = %e, chat_id, "failed to send message"),
        }
    }

    /// Replaces the menu of the chat's current bot message in place.
    ///
    /// Bypasses delete/resend: the message text stays, only its controls
    /// change. On failure the old menu remains displayed.
    pub async fn edit_last_menu(&self, chat_id: i64, menu: &Menu) {
        let Some(message_id) = self.last_message(chat_id) else {
            debug!(chat_id, "no tracked message to edit");
            return;
        };
        if let Err(e) = self.gateway.edit_menu(chat_id, message_id, menu).await {
            warn!(error = %e, chat_id, "failed to update message menu");
        }
    }
}
