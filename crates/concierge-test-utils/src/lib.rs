// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test doubles for the Concierge engine.
//!
//! [`MockGateway`] records every outbound call and can be scripted to fail
//! individual operations, so tests can assert delivery behavior and
//! degraded-path handling without a live transport.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use concierge_core::{
    ConciergeError, InboundEvent, InboundMeta, MediaRef, MessagingGateway, Menu, MessageId,
    UserRef,
};

/// One recorded outbound gateway call.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayCall {
    Send {
        chat_id: i64,
        text: String,
        menu: Option<Menu>,
    },
    SendMedia {
        chat_id: i64,
        path: String,
        caption: String,
    },
    Delete {
        chat_id: i64,
        message_id: MessageId,
    },
    EditMenu {
        chat_id: i64,
        message_id: MessageId,
        menu: Menu,
    },
    Forward {
        chat_id: i64,
        text: String,
    },
}

/// In-memory [`MessagingGateway`] that records calls and hands out
/// sequential message ids.
#[derive(Default)]
pub struct MockGateway {
    calls: Mutex<Vec<GatewayCall>>,
    next_id: AtomicI64,
    fail_send: AtomicBool,
    fail_delete: AtomicBool,
    fail_edit: AtomicBool,
    fail_forward: AtomicBool,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every call made so far, in order.
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn sends(&self) -> Vec<GatewayCall> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, GatewayCall::Send { .. } | GatewayCall::SendMedia { .. }))
            .collect()
    }

    pub fn deletes(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, GatewayCall::Delete { .. }))
            .count()
    }

    pub fn forwards(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                GatewayCall::Forward { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    /// Text of the most recent send, if any.
    pub fn last_text(&self) -> Option<String> {
        self.calls().into_iter().rev().find_map(|c| match c {
            GatewayCall::Send { text, .. } => Some(text),
            GatewayCall::SendMedia { caption, .. } => Some(caption),
            _ => None,
        })
    }

    pub fn set_fail_send(&self, fail: bool) {
        self.fail_send.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_delete(&self, fail: bool) {
        self.fail_delete.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_edit(&self, fail: bool) {
        self.fail_edit.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_forward(&self, fail: bool) {
        self.fail_forward.store(fail, Ordering::SeqCst);
    }

    fn record(&self, call: GatewayCall) {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).push(call);
    }

    fn fresh_id(&self) -> MessageId {
        MessageId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn gateway_err(op: &str) -> ConciergeError {
        ConciergeError::Gateway {
            message: format!("mock {op} failure"),
            source: None,
        }
    }
}

#[async_trait]
impl MessagingGateway for MockGateway {
    async fn send(
        &self,
        chat_id: i64,
        text: &str,
        menu: Option<&Menu>,
    ) -> Result<MessageId, ConciergeError> {
        if self.fail_send.load(Ordering::SeqCst) {
            return Err(Self::gateway_err("send"));
        }
        self.record(GatewayCall::Send {
            chat_id,
            text: text.to_string(),
            menu: menu.cloned(),
        });
        Ok(self.fresh_id())
    }

    async fn send_media(
        &self,
        chat_id: i64,
        media: &MediaRef,
        caption: &str,
        _menu: Option<&Menu>,
    ) -> Result<MessageId, ConciergeError> {
        if self.fail_send.load(Ordering::SeqCst) {
            return Err(Self::gateway_err("send_media"));
        }
        self.record(GatewayCall::SendMedia {
            chat_id,
            path: media.path.display().to_string(),
            caption: caption.to_string(),
        });
        Ok(self.fresh_id())
    }

    async fn delete(&self, chat_id: i64, message_id: MessageId) -> Result<(), ConciergeError> {
        self.record(GatewayCall::Delete {
            chat_id,
            message_id,
        });
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(Self::gateway_err("delete"));
        }
        Ok(())
    }

    async fn edit_menu(
        &self,
        chat_id: i64,
        message_id: MessageId,
        menu: &Menu,
    ) -> Result<(), ConciergeError> {
        self.record(GatewayCall::EditMenu {
            chat_id,
            message_id,
            menu: menu.clone(),
        });
        if self.fail_edit.load(Ordering::SeqCst) {
            return Err(Self::gateway_err("edit_menu"));
        }
        Ok(())
    }

    async fn forward(&self, chat_id: i64, text: &str) -> Result<(), ConciergeError> {
        if self.fail_forward.load(Ordering::SeqCst) {
            return Err(Self::gateway_err("forward"));
        }
        self.record(GatewayCall::Forward {
            chat_id,
            text: text.to_string(),
        });
        Ok(())
    }
}

/// Inbound envelope for a user in a chat, with a `ru` locale hint.
pub fn meta(chat_id: i64, user_id: i64) -> InboundMeta {
    InboundMeta {
        chat_id,
        user: Some(UserRef {
            id: user_id,
            username: Some(format!("user{user_id}")),
            full_name: Some(format!("User {user_id}")),
        }),
        language_hint: Some("ru".to_string()),
    }
}

pub fn command(chat_id: i64, user_id: i64, name: &str) -> InboundEvent {
    InboundEvent::Command {
        meta: meta(chat_id, user_id),
        name: name.to_string(),
    }
}

pub fn callback(chat_id: i64, user_id: i64, data: &str) -> InboundEvent {
    InboundEvent::Callback {
        meta: meta(chat_id, user_id),
        data: data.to_string(),
    }
}

pub fn text(chat_id: i64, user_id: i64, body: &str) -> InboundEvent {
    InboundEvent::Text {
        meta: meta(chat_id, user_id),
        body: body.to_string(),
    }
}

pub fn non_text(chat_id: i64, user_id: i64, kind: &str) -> InboundEvent {
    InboundEvent::NonText {
        meta: meta(chat_id, user_id),
        kind: kind.to_string(),
    }
}
