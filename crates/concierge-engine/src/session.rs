// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The per-session conversation state machine.
//!
//! Every inbound event is interpreted against the session's current state,
//! produces exactly one analytics event and (except for unrecognized
//! button presses, which the transport merely acknowledges) exactly one
//! outbound message. Events for the same session are processed one at a
//! time in arrival order; unrelated sessions never contend.

use std::sync::Arc;

use concierge_analytics::{kinds, AggregateReport, EventLog, NewEvent};
use concierge_content::{templates, ContentBundle, LanguageResolver};
use concierge_core::types::actions;
use concierge_core::{
    InboundEvent, InboundMeta, MessagingGateway, SessionKey, UserRef,
};
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, error, warn};

use crate::lifecycle::MessageLifecycle;
use crate::scheduler::EscalationScheduler;

/// Longest text excerpt stored in event payloads.
const PREVIEW_CHARS: usize = 200;

/// Conversation state for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    AwaitingSupportMessage,
}

/// Engine knobs taken from configuration.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Chat that receives escalations and may request reports.
    pub admin_chat_id: i64,
    /// Trailing window for the report command.
    pub report_window_days: u32,
}

/// Orchestrates transitions and side effects for all sessions.
pub struct SupportEngine {
    gateway: Arc<dyn MessagingGateway>,
    lifecycle: Arc<MessageLifecycle>,
    scheduler: EscalationScheduler,
    resolver: Arc<LanguageResolver>,
    events: Arc<EventLog>,
    settings: EngineSettings,
    states: DashMap<SessionKey, Arc<Mutex<SessionState>>>,
}

impl SupportEngine {
    pub fn new(
        gateway: Arc<dyn MessagingGateway>,
        lifecycle: Arc<MessageLifecycle>,
        scheduler: EscalationScheduler,
        resolver: Arc<LanguageResolver>,
        events: Arc<EventLog>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            gateway,
            lifecycle,
            scheduler,
            resolver,
            events,
            settings,
            states: DashMap::new(),
        }
    }

    /// Handles one inbound event.
    ///
    /// The session's state lock is held for the whole transition, so state
    /// read, decision, and state write never interleave with another event
    /// for the same key.
    pub async fn handle(&self, event: InboundEvent) {
        let Some(key) = event.meta().session_key() else {
            debug!(chat_id = event.meta().chat_id, "event without sender, ignored");
            return;
        };

        let cell = self
            .states
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(SessionState::Idle)))
            .clone();
        let mut state = cell.lock().await;

        match event {
            InboundEvent::Command { meta, name } => {
                self.on_command(&mut state, key, &meta, &name).await;
            }
            InboundEvent::Callback { meta, data } => {
                self.on_callback(&mut state, key, &meta, &data).await;
            }
            InboundEvent::Text { meta, body } => {
                self.on_text(&mut state, key, &meta, &body).await;
            }
            InboundEvent::NonText { meta, kind } => {
                self.on_non_text(&mut state, key, &meta, &kind).await;
            }
        }
    }

    /// Current state of a session; `Idle` when it was never touched.
    pub async fn state(&self, key: SessionKey) -> SessionState {
        // Clone the cell out so no map shard lock is held across the await.
        let cell = match self.states.get(&key) {
            Some(cell) => cell.clone(),
            None => return SessionState::Idle,
        };
        let state = cell.lock().await;
        *state
    }

    fn bundle_for(&self, meta: &InboundMeta) -> Arc<ContentBundle> {
        let tag = self.language_of(meta);
        self.resolver.bundle(&tag)
    }

    fn language_of(&self, meta: &InboundMeta) -> String {
        let user_id = meta.user.as_ref().map(|u| u.id).unwrap_or_default();
        self.resolver
            .resolve(user_id, meta.language_hint.as_deref())
    }

    fn event(&self, kind: &str, meta: &InboundMeta) -> NewEvent {
        let mut event = NewEvent::now(kind).chat(meta.chat_id);
        if let Some(user) = &meta.user {
            event = event.actor(user);
        }
        event
    }

    async fn on_command(
        &self,
        state: &mut SessionState,
        _key: SessionKey,
        meta: &InboundMeta,
        name: &str,
    ) {
        match name {
            "start" => {
                *state = SessionState::Idle;
                if let Some(user) = &meta.user {
                    self.resolver.reset_language(user.id);
                }
                self.events.record(self.event(kinds::START, meta)).await;
                let bundle = self.bundle_for(meta);
                self.lifecycle
                    .send_replacing(
                        meta.chat_id,
                        &bundle.template(templates::GREETING),
                        Some(&bundle.main_menu),
                    )
                    .await;
            }
            "stats" => {
                self.on_stats(meta).await;
            }
            other => {
                // Unknown commands reach us as plain text in practice; keep
                // a defined response for robustness.
                warn!(command = other, "unrecognized command");
                self.fallback_message(meta, serde_json::json!({ "command": other }))
                    .await;
            }
        }
    }

    async fn on_stats(&self, meta: &InboundMeta) {
        let bundle = self.bundle_for(meta);
        let user_id = meta.user.as_ref().map(|u| u.id).unwrap_or_default();

        if meta.chat_id != self.settings.admin_chat_id
            && user_id != self.settings.admin_chat_id
        {
            self.lifecycle
                .send_replacing(
                    meta.chat_id,
                    &bundle.template(templates::ADMIN_ONLY),
                    Some(&bundle.main_menu),
                )
                .await;
            return;
        }

        let days = self.settings.report_window_days;
        match self.events.query(days).await {
            Ok(report) => {
                self.events
                    .record(
                        self.event(kinds::STATS_REQUEST, meta)
                            .payload(serde_json::json!({ "days": days })),
                    )
                    .await;
                let text = render_report(&report, &bundle);
                self.lifecycle
                    .send_replacing(meta.chat_id, &text, Some(&bundle.main_menu))
                    .await;
            }
            Err(e) => {
                error!(error = %e, "failed to compute aggregate report");
                self.lifecycle
                    .send_replacing(
                        meta.chat_id,
                        &bundle.template(templates::FALLBACK),
                        Some(&bundle.main_menu),
                    )
                    .await;
            }
        }
    }

    async fn on_callback(
        &self,
        state: &mut SessionState,
        key: SessionKey,
        meta: &InboundMeta,
        data: &str,
    ) {
        let bundle = self.bundle_for(meta);

        match data {
            actions::SUPPORT_START => {
                *state = SessionState::AwaitingSupportMessage;
                self.events
                    .record(self.event(kinds::SUPPORT_START, meta))
                    .await;
                self.lifecycle
                    .send_replacing(
                        meta.chat_id,
                        &bundle.template(templates::SUPPORT_PROMPT),
                        Some(&bundle.support_menu),
                    )
                    .await;
                self.scheduler.clear_pending(key);
                self.scheduler.schedule(key, &self.language_of(meta));
            }
            actions::SUPPORT_CANCEL => {
                *state = SessionState::Idle;
                self.events
                    .record(self.event(kinds::SUPPORT_CANCEL, meta))
                    .await;
                self.scheduler.clear_pending(key);
                self.lifecycle
                    .send_replacing(
                        meta.chat_id,
                        &bundle.template(templates::SUPPORT_CANCELLED),
                        Some(&bundle.main_menu),
                    )
                    .await;
            }
            actions::SUPPORT_RESOLVED => {
                *state = SessionState::Idle;
                self.events
                    .record(self.event(kinds::SUPPORT_RESOLVED, meta))
                    .await;
                self.scheduler.clear_pending(key);
                self.lifecycle
                    .send_replacing(
                        meta.chat_id,
                        &bundle.template(templates::SUPPORT_RESOLVED),
                        Some(&bundle.main_menu),
                    )
                    .await;
            }
            actions::MAIN_INSTALL => {
                *state = SessionState::Idle;
                self.events
                    .record(self.event(kinds::INSTALL_MENU, meta))
                    .await;
                self.lifecycle
                    .send_replacing(
                        meta.chat_id,
                        &bundle.template(templates::CHOOSE_PLATFORM),
                        Some(&bundle.install_menu),
                    )
                    .await;
            }
            actions::MAIN_MENU_OPEN | actions::INSTALL_BACK => {
                *state = SessionState::Idle;
                self.events
                    .record(
                        self.event(kinds::MAIN_MENU_OPEN, meta)
                            .payload(serde_json::json!({ "source": data })),
                    )
                    .await;
                self.scheduler.clear_pending(key);
                self.lifecycle
                    .send_replacing(
                        meta.chat_id,
                        &bundle.template(templates::GREETING),
                        Some(&bundle.main_menu),
                    )
                    .await;
            }
            _ => {
                if let Some(tag) = data.strip_prefix(actions::LANGUAGE_PREFIX) {
                    self.on_language_select(state, meta, tag).await;
                } else if let Some(subject) =
                    data.strip_prefix(actions::FEEDBACK_HELPFUL_PREFIX)
                {
                    self.on_feedback(meta, kinds::FEEDBACK_HELPFUL, subject).await;
                } else if let Some(subject) =
                    data.strip_prefix(actions::FEEDBACK_UNHELPFUL_PREFIX)
                {
                    self.on_feedback(meta, kinds::FEEDBACK_UNHELPFUL, subject)
                        .await;
                } else if let Some(answer) = bundle.answers.get(data) {
                    *state = SessionState::Idle;
                    self.events
                        .record(self.event(kinds::FAQ_ANSWER, meta).subject(data))
                        .await;
                    self.lifecycle
                        .send_answer_replacing(meta.chat_id, answer, &bundle.answer_menu(data))
                        .await;
                } else if let Some(answer) = bundle.install_answers.get(data) {
                    *state = SessionState::Idle;
                    self.events
                        .record(self.event(kinds::INSTALL_ANSWER, meta).subject(data))
                        .await;
                    self.lifecycle
                        .send_answer_replacing(meta.chat_id, answer, &bundle.answer_menu(data))
                        .await;
                } else {
                    // The transport acknowledges the press; no new message.
                    self.events
                        .record(
                            self.event(kinds::FALLBACK_CALLBACK, meta)
                                .payload(serde_json::json!({ "callback_data": data })),
                        )
                        .await;
                }
            }
        }
    }

    async fn on_language_select(
        &self,
        state: &mut SessionState,
        meta: &InboundMeta,
        tag: &str,
    ) {
        let Some(user) = &meta.user else { return };
        if self.resolver.set_language(user.id, tag) {
            *state = SessionState::Idle;
            self.events
                .record(self.event(kinds::LANGUAGE_SELECT, meta).subject(tag))
                .await;
            let bundle = self.resolver.bundle(tag);
            self.lifecycle
                .send_replacing(
                    meta.chat_id,
                    &bundle.template(templates::GREETING),
                    Some(&bundle.main_menu),
                )
                .await;
        } else {
            self.events
                .record(
                    self.event(kinds::FALLBACK_CALLBACK, meta)
                        .payload(serde_json::json!({ "callback_data": format!("lang:{tag}") })),
                )
                .await;
        }
    }

    async fn on_feedback(&self, meta: &InboundMeta, kind: &str, subject: &str) {
        self.events
            .record(self.event(kind, meta).subject(subject))
            .await;
        let bundle = self.bundle_for(meta);
        // Strip the feedback row in place; the answer text stays visible.
        self.lifecycle
            .edit_last_menu(meta.chat_id, &bundle.answer_menu_base)
            .await;
    }

    async fn on_text(
        &self,
        state: &mut SessionState,
        key: SessionKey,
        meta: &InboundMeta,
        body: &str,
    ) {
        match *state {
            SessionState::AwaitingSupportMessage => {
                if self.resolver.is_cancel_phrase(body) {
                    *state = SessionState::Idle;
                    self.events
                        .record(self.event(kinds::SUPPORT_CANCEL, meta))
                        .await;
                    self.scheduler.clear_pending(key);
                    let bundle = self.bundle_for(meta);
                    self.lifecycle
                        .send_replacing(
                            meta.chat_id,
                            &bundle.template(templates::SUPPORT_CANCELLED),
                            Some(&bundle.main_menu),
                        )
                        .await;
                } else {
                    *state = SessionState::Idle;
                    self.events
                        .record(self.event(kinds::SUPPORT_SUBMIT, meta).payload(
                            serde_json::json!({
                                "text_len": body.chars().count(),
                                "text_preview": text_preview(body),
                            }),
                        ))
                        .await;
                    self.scheduler.clear_pending(key);

                    let payload = build_support_payload(meta.user.as_ref(), body);
                    if let Err(e) = self
                        .gateway
                        .forward(self.settings.admin_chat_id, &payload)
                        .await
                    {
                        error!(error = %e, "failed to forward escalation to admin chat");
                    }

                    let bundle = self.bundle_for(meta);
                    self.lifecycle
                        .send_replacing(
                            meta.chat_id,
                            &bundle.template(templates::SUPPORT_SUBMITTED),
                            Some(&bundle.main_menu),
                        )
                        .await;
                }
            }
            SessionState::Idle => {
                self.fallback_message(
                    meta,
                    serde_json::json!({
                        "text_len": body.chars().count(),
                        "text_preview": text_preview(body),
                    }),
                )
                .await;
            }
        }
    }

    async fn on_non_text(
        &self,
        state: &mut SessionState,
        key: SessionKey,
        meta: &InboundMeta,
        kind: &str,
    ) {
        match *state {
            SessionState::AwaitingSupportMessage => {
                // State does not advance; the user is re-prompted and the
                // reminder timer starts over.
                self.events
                    .record(
                        self.event(kinds::SUPPORT_NON_TEXT, meta)
                            .payload(serde_json::json!({ "content_type": kind })),
                    )
                    .await;
                let bundle = self.bundle_for(meta);
                self.lifecycle
                    .send_replacing(
                        meta.chat_id,
                        &bundle.template(templates::SUPPORT_TEXT_ONLY),
                        Some(&bundle.support_menu),
                    )
                    .await;
                self.scheduler.schedule(key, &self.language_of(meta));
            }
            SessionState::Idle => {
                self.fallback_message(meta, serde_json::json!({ "content_type": kind }))
                    .await;
            }
        }
    }

    async fn fallback_message(&self, meta: &InboundMeta, payload: serde_json::Value) {
        self.events
            .record(self.event(kinds::FALLBACK_MESSAGE, meta).payload(payload))
            .await;
        let bundle = self.bundle_for(meta);
        self.lifecycle
            .send_replacing(
                meta.chat_id,
                &bundle.template(templates::FALLBACK),
                Some(&bundle.main_menu),
            )
            .await;
    }
}

/// Escalation block forwarded to the admin chat.
fn build_support_payload(user: Option<&UserRef>, body: &str) -> String {
    let id = user.map(|u| u.id.to_string()).unwrap_or_else(|| "?".into());
    let username = user
        .and_then(|u| u.username.as_deref())
        .map(|name| format!("@{name}"))
        .unwrap_or_else(|| "-".to_string());
    let full_name = user
        .and_then(|u| u.full_name.as_deref())
        .unwrap_or("-");

    format!("#SUPREQUEST #USER{id}\nFrom: {username} ({full_name})\nText: {body}")
}

/// Caps a text excerpt at [`PREVIEW_CHARS`] characters.
fn text_preview(text: &str) -> String {
    if text.chars().count() <= PREVIEW_CHARS {
        return text.to_string();
    }
    let cut: String = text.chars().take(PREVIEW_CHARS - 3).collect();
    format!("{cut}...")
}

/// Renders the aggregate report in the requester's language.
fn render_report(report: &AggregateReport, bundle: &ContentBundle) -> String {
    let mut lines = vec![
        bundle
            .template(templates::STATS_TITLE)
            .replace("{days}", &report.window_days.to_string()),
        format!("{}: {}", bundle.template(templates::STATS_EVENTS), report.total),
        format!(
            "{}: {}",
            bundle.template(templates::STATS_USERS),
            report.unique_users
        ),
    ];

    if !report.by_event.is_empty() {
        lines.push(String::new());
        lines.push(bundle.template(templates::STATS_BY_EVENT));
        for (event_type, count) in &report.by_event {
            lines.push(format!("- {event_type}: {count}"));
        }
    }

    if !report.top_faq.is_empty() {
        lines.push(String::new());
        lines.push(bundle.template(templates::STATS_TOP_FAQ));
        for (subject, count) in &report.top_faq {
            lines.push(format!("- {}: {count}", bundle.subject_label(subject)));
        }
    }

    if !report.top_install.is_empty() {
        lines.push(String::new());
        lines.push(bundle.template(templates::STATS_TOP_INSTALL));
        for (subject, count) in &report.top_install {
            lines.push(format!("- {}: {count}", bundle.subject_label(subject)));
        }
    }

    lines.push(String::new());
    lines.push(
        bundle
            .template(templates::STATS_FEEDBACK)
            .replace("{helpful}", &report.helpful.to_string())
            .replace("{unhelpful}", &report.unhelpful.to_string()),
    );

    lines.join("\n")
}
