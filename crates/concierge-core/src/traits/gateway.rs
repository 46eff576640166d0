// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Messaging gateway trait for chat transport integrations.

use async_trait::async_trait;

use crate::error::ConciergeError;
use crate::types::{MediaRef, Menu, MessageId};

/// Outbound side of the chat transport.
///
/// All operations are best-effort from the engine's point of view: callers
/// log delivery failures and carry on rather than failing the interaction.
#[async_trait]
pub trait MessagingGateway: Send + Sync {
    /// Sends a text message, optionally with an inline menu.
    async fn send(
        &self,
        chat_id: i64,
        text: &str,
        menu: Option<&Menu>,
    ) -> Result<MessageId, ConciergeError>;

    /// Sends a media message with a caption and an optional inline menu.
    async fn send_media(
        &self,
        chat_id: i64,
        media: &MediaRef,
        caption: &str,
        menu: Option<&Menu>,
    ) -> Result<MessageId, ConciergeError>;

    /// Deletes a previously sent message.
    async fn delete(&self, chat_id: i64, message_id: MessageId) -> Result<(), ConciergeError>;

    /// Replaces the inline menu of an existing message, leaving its text intact.
    async fn edit_menu(
        &self,
        chat_id: i64,
        message_id: MessageId,
        menu: &Menu,
    ) -> Result<(), ConciergeError>;

    /// Delivers an escalation payload to the operator chat.
    async fn forward(&self, chat_id: i64, text: &str) -> Result<(), ConciergeError>;
}
