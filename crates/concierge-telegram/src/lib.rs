// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram gateway for the Concierge support agent.
//!
//! Implements [`MessagingGateway`] over the Bot API via teloxide and runs
//! the long-polling dispatcher that feeds inbound updates to the engine.
//! Every callback query is acknowledged after dispatch, so unrecognized
//! button presses resolve silently on the client.

pub mod handler;

use std::sync::Arc;

use async_trait::async_trait;
use concierge_core::{ConciergeError, MediaKind, MediaRef, MessagingGateway, Menu, MessageId};
use concierge_engine::SupportEngine;
use teloxide::prelude::*;
use teloxide::types::{ChatId, InputFile};
use tracing::{debug, info};

/// [`MessagingGateway`] backed by the Telegram Bot API.
pub struct TelegramGateway {
    bot: Bot,
}

impl TelegramGateway {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

/// Telegram message ids are 32-bit; reject anything that cannot round-trip.
fn telegram_message_id(id: MessageId) -> Result<teloxide::types::MessageId, ConciergeError> {
    i32::try_from(id.0)
        .map(teloxide::types::MessageId)
        .map_err(|_| ConciergeError::Gateway {
            message: format!("message id {} out of range for Telegram", id.0),
            source: None,
        })
}

fn request_err(op: &str, e: teloxide::RequestError) -> ConciergeError {
    ConciergeError::Gateway {
        message: format!("{op} failed: {e}"),
        source: Some(Box::new(e)),
    }
}

#[async_trait]
impl MessagingGateway for TelegramGateway {
    async fn send(
        &self,
        chat_id: i64,
        text: &str,
        menu: Option<&Menu>,
    ) -> Result<MessageId, ConciergeError> {
        let mut request = self.bot.send_message(ChatId(chat_id), text);
        if let Some(menu) = menu {
            request = request.reply_markup(handler::menu_markup(menu));
        }
        let sent = request.await.map_err(|e| request_err("send", e))?;
        Ok(MessageId(i64::from(sent.id.0)))
    }

    async fn send_media(
        &self,
        chat_id: i64,
        media: &MediaRef,
        caption: &str,
        menu: Option<&Menu>,
    ) -> Result<MessageId, ConciergeError> {
        let input = InputFile::file(media.path.clone());
        let markup = menu.map(handler::menu_markup);

        let sent = match media.kind {
            MediaKind::Photo => {
                let mut request = self
                    .bot
                    .send_photo(ChatId(chat_id), input)
                    .caption(caption.to_string());
                if let Some(markup) = markup {
                    request = request.reply_markup(markup);
                }
                request.await.map_err(|e| request_err("send_photo", e))?
            }
            MediaKind::Video => {
                let mut request = self
                    .bot
                    .send_video(ChatId(chat_id), input)
                    .caption(caption.to_string());
                if let Some(markup) = markup {
                    request = request.reply_markup(markup);
                }
                request.await.map_err(|e| request_err("send_video", e))?
            }
        };

        Ok(MessageId(i64::from(sent.id.0)))
    }

    async fn delete(&self, chat_id: i64, message_id: MessageId) -> Result<(), ConciergeError> {
        let msg_id = telegram_message_id(message_id)?;
        self.bot
            .delete_message(ChatId(chat_id), msg_id)
            .await
            .map_err(|e| request_err("delete", e))?;
        Ok(())
    }

    async fn edit_menu(
        &self,
        chat_id: i64,
        message_id: MessageId,
        menu: &Menu,
    ) -> Result<(), ConciergeError> {
        let msg_id = telegram_message_id(message_id)?;
        self.bot
            .edit_message_reply_markup(ChatId(chat_id), msg_id)
            .reply_markup(handler::menu_markup(menu))
            .await
            .map_err(|e| request_err("edit_menu", e))?;
        Ok(())
    }

    async fn forward(&self, chat_id: i64, text: &str) -> Result<(), ConciergeError> {
        self.bot
            .send_message(ChatId(chat_id), text)
            .await
            .map_err(|e| request_err("forward", e))?;
        Ok(())
    }
}

/// Runs the long-polling dispatcher until the process shuts down.
///
/// Messages and callback queries are mapped to engine events; all other
/// update kinds are ignored.
pub async fn run_polling(bot: Bot, engine: Arc<SupportEngine>) {
    info!("starting Telegram long polling");

    let message_engine = engine.clone();
    let callback_engine = engine;

    let message_branch = Update::filter_message().endpoint(move |msg: Message| {
        let engine = message_engine.clone();
        async move {
            engine.handle(handler::message_to_event(&msg)).await;
            respond(())
        }
    });

    let callback_branch =
        Update::filter_callback_query().endpoint(move |bot: Bot, query: CallbackQuery| {
            let engine = callback_engine.clone();
            async move {
                if let Some(event) = handler::callback_to_event(&query) {
                    engine.handle(event).await;
                }
                // Always acknowledge so the client stops its spinner, even
                // for presses the engine answered with silence.
                if let Err(e) = bot.answer_callback_query(query.id).await {
                    debug!(error = %e, "failed to answer callback query");
                }
                respond(())
            }
        });

    Dispatcher::builder(
        bot,
        teloxide::dptree::entry()
            .branch(message_branch)
            .branch(callback_branch),
    )
    .default_handler(|_| async {}) // Silently ignore other update kinds
    .build()
    .dispatch()
    .await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_id_round_trips_within_i32() {
        let id = telegram_message_id(MessageId(42)).unwrap();
        assert_eq!(id.0, 42);
    }

    #[test]
    fn out_of_range_message_id_is_rejected() {
        let err = telegram_message_id(MessageId(i64::MAX)).unwrap_err();
        assert!(matches!(err, ConciergeError::Gateway { .. }));
    }
}
