// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping between Telegram updates and engine events.
//!
//! Converts incoming messages and callback queries into the
//! channel-agnostic [`InboundEvent`] model, and engine menus into inline
//! keyboards.

use concierge_core::{InboundEvent, InboundMeta, Menu, UserRef};
use teloxide::types::{
    CallbackQuery, InlineKeyboardButton, InlineKeyboardMarkup, Message, User,
};

/// Slash commands the engine understands; anything else stays plain text,
/// so a command-looking message typed mid-escalation is forwarded verbatim.
const KNOWN_COMMANDS: [&str; 2] = ["start", "stats"];

fn user_ref(user: &User) -> UserRef {
    UserRef {
        id: user.id.0 as i64,
        username: user.username.clone(),
        full_name: Some(user.full_name()),
    }
}

fn meta_from_message(msg: &Message) -> InboundMeta {
    InboundMeta {
        chat_id: msg.chat.id.0,
        user: msg.from.as_ref().map(user_ref),
        language_hint: msg
            .from
            .as_ref()
            .and_then(|u| u.language_code.clone()),
    }
}

/// Parses `/name` or `/name@bot` into a known command name.
fn parse_command(text: &str) -> Option<String> {
    let first = text.split_whitespace().next()?;
    let name = first.strip_prefix('/')?;
    let name = name.split('@').next().unwrap_or(name).to_lowercase();
    KNOWN_COMMANDS.contains(&name.as_str()).then_some(name)
}

/// Names the content type of a non-text message.
fn content_kind(msg: &Message) -> &'static str {
    if msg.photo().is_some() {
        "photo"
    } else if msg.video().is_some() {
        "video"
    } else if msg.voice().is_some() {
        "voice"
    } else if msg.audio().is_some() {
        "audio"
    } else if msg.document().is_some() {
        "document"
    } else if msg.sticker().is_some() {
        "sticker"
    } else if msg.location().is_some() {
        "location"
    } else {
        "other"
    }
}

/// Converts a Telegram message into an engine event.
pub fn message_to_event(msg: &Message) -> InboundEvent {
    let meta = meta_from_message(msg);

    if let Some(text) = msg.text() {
        if let Some(name) = parse_command(text) {
            return InboundEvent::Command { meta, name };
        }
        return InboundEvent::Text {
            meta,
            body: text.to_string(),
        };
    }

    InboundEvent::NonText {
        meta,
        kind: content_kind(msg).to_string(),
    }
}

/// Converts a callback query into an engine event.
///
/// Returns `None` when the query carries no payload or no originating
/// message (nothing to route a reply to).
pub fn callback_to_event(query: &CallbackQuery) -> Option<InboundEvent> {
    let data = query.data.clone()?;
    let message = query.message.as_ref()?;

    let meta = InboundMeta {
        chat_id: message.chat().id.0,
        user: Some(user_ref(&query.from)),
        language_hint: query.from.language_code.clone(),
    };

    Some(InboundEvent::Callback { meta, data })
}

/// Renders an engine menu as a Telegram inline keyboard.
pub fn menu_markup(menu: &Menu) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(menu.rows.iter().map(|row| {
        row.iter()
            .map(|button| {
                InlineKeyboardButton::callback(button.label.clone(), button.action.clone())
            })
            .collect::<Vec<_>>()
    }))
}
