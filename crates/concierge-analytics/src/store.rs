// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only interaction event log.
//!
//! Events are immutable once written; the store assigns monotonically
//! increasing ids used only for ordering. Recording through [`EventLog::record`]
//! swallows failures so analytics can never abort a user-facing interaction.

use chrono::Utc;
use concierge_core::{ConciergeError, UserRef};
use rusqlite::params;
use tracing::warn;

use crate::database::{map_tr_err, Database};

/// Event type vocabulary written by the engine.
pub mod kinds {
    pub const START: &str = "start";
    pub const FAQ_ANSWER: &str = "faq_answer";
    pub const INSTALL_ANSWER: &str = "install_answer";
    pub const SUPPORT_START: &str = "support_start";
    pub const SUPPORT_CANCEL: &str = "support_cancel";
    pub const SUPPORT_SUBMIT: &str = "support_submit";
    pub const SUPPORT_NON_TEXT: &str = "support_non_text";
    pub const SUPPORT_REMINDER: &str = "support_reminder";
    pub const SUPPORT_RESOLVED: &str = "support_resolved";
    pub const INSTALL_MENU: &str = "install_menu";
    pub const MAIN_MENU_OPEN: &str = "main_menu_open";
    pub const FALLBACK_MESSAGE: &str = "fallback_message";
    pub const FALLBACK_CALLBACK: &str = "fallback_callback";
    pub const STATS_REQUEST: &str = "stats_request";
    pub const FEEDBACK_HELPFUL: &str = "feedback_helpful";
    pub const FEEDBACK_UNHELPFUL: &str = "feedback_unhelpful";
    pub const LANGUAGE_SELECT: &str = "language_select";
}

/// An event waiting to be appended.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub ts: String,
    pub event_type: String,
    pub subject: Option<String>,
    pub user_id: Option<i64>,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub chat_id: Option<i64>,
    pub payload: serde_json::Value,
}

impl NewEvent {
    /// A new event stamped with the current UTC time.
    pub fn now(event_type: &str) -> Self {
        Self {
            ts: Utc::now().to_rfc3339(),
            event_type: event_type.to_string(),
            subject: None,
            user_id: None,
            username: None,
            full_name: None,
            chat_id: None,
            payload: serde_json::json!({}),
        }
    }

    /// Overrides the timestamp; used by tests exercising the window.
    pub fn at(mut self, ts: impl Into<String>) -> Self {
        self.ts = ts.into();
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn chat(mut self, chat_id: i64) -> Self {
        self.chat_id = Some(chat_id);
        self
    }

    pub fn actor(mut self, user: &UserRef) -> Self {
        self.user_id = Some(user.id);
        self.username = user.username.clone();
        self.full_name = user.full_name.clone();
        self
    }

    pub fn payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

/// The append-only event store.
pub struct EventLog {
    pub(crate) db: Database,
}

impl EventLog {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Appends one event. Failures are returned to the caller; the engine
    /// uses [`EventLog::record`] instead.
    pub async fn append(&self, event: NewEvent) -> Result<(), ConciergeError> {
        let payload = event.payload.to_string();
        self.db
            .connection()
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO events (ts, event_type, subject, user_id, username, full_name, chat_id, payload)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                    params![
                        event.ts,
                        event.event_type,
                        event.subject,
                        event.user_id,
                        event.username,
                        event.full_name,
                        event.chat_id,
                        payload,
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    /// Appends one event, logging and swallowing any failure.
    ///
    /// Analytics recording must never abort the user-facing interaction it
    /// is attached to; a failed write is simply lost.
    pub async fn record(&self, event: NewEvent) {
        let event_type = event.event_type.clone();
        if let Err(e) = self.append(event).await {
            warn!(
                error = %e,
                event_type = event_type.as_str(),
                "failed to record analytics event"
            );
        }
    }

    /// Flushes and checkpoints the underlying database.
    pub async fn close(&self) -> Result<(), ConciergeError> {
        self.db.close().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_log() -> (EventLog, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("events.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (EventLog::new(db), dir)
    }

    fn actor(id: i64) -> UserRef {
        UserRef {
            id,
            username: Some(format!("user{id}")),
            full_name: Some(format!("User {id}")),
        }
    }

    #[tokio::test]
    async fn append_then_count_via_query() {
        let (log, _dir) = setup_log().await;

        log.append(
            NewEvent::now(kinds::START)
                .chat(1)
                .actor(&actor(42))
                .payload(serde_json::json!({"source": "test"})),
        )
        .await
        .unwrap();

        let report = log.query(7).await.unwrap();
        assert_eq!(report.total, 1);
        assert_eq!(report.unique_users, 1);
        assert_eq!(report.by_event, vec![(kinds::START.to_string(), 1)]);

        log.close().await.unwrap();
    }

    #[tokio::test]
    async fn events_without_user_do_not_count_as_users() {
        let (log, _dir) = setup_log().await;

        log.append(NewEvent::now(kinds::SUPPORT_REMINDER).chat(1))
            .await
            .unwrap();

        let report = log.query(7).await.unwrap();
        assert_eq!(report.total, 1);
        assert_eq!(report.unique_users, 0);

        log.close().await.unwrap();
    }

    #[tokio::test]
    async fn builder_sets_all_fields() {
        let event = NewEvent::now(kinds::FAQ_ANSWER)
            .subject("main:keys")
            .chat(-100)
            .actor(&actor(7))
            .payload(serde_json::json!({"k": "v"}));

        assert_eq!(event.event_type, kinds::FAQ_ANSWER);
        assert_eq!(event.subject.as_deref(), Some("main:keys"));
        assert_eq!(event.chat_id, Some(-100));
        assert_eq!(event.user_id, Some(7));
        assert_eq!(event.username.as_deref(), Some("user7"));
        assert_eq!(event.payload["k"], "v");
    }
}
