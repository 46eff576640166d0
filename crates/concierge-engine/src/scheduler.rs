// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-session escalation reminder loops.
//!
//! Each pending escalation gets one background task that wakes every
//! reminder interval, nudges the user, and goes silent after the configured
//! number of reminders. At most one timer is live per session at any
//! instant: `schedule` supersedes the previous timer inside the same map
//! entry critical section that installs the new one, so there is no window
//! where zero or two timers run.

use std::sync::Arc;
use std::time::Duration;

use concierge_analytics::{kinds, EventLog, NewEvent};
use concierge_content::templates;
use concierge_content::LanguageResolver;
use concierge_core::SessionKey;
use dashmap::DashMap;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::lifecycle::MessageLifecycle;

/// Pending-escalation bookkeeping for one session.
#[derive(Default)]
struct Entry {
    pending: bool,
    reminder_count: u32,
    language: String,
    timer: Option<CancellationToken>,
}

struct Inner {
    lifecycle: Arc<MessageLifecycle>,
    events: Arc<EventLog>,
    resolver: Arc<LanguageResolver>,
    interval: Duration,
    max_reminders: u32,
    entries: DashMap<SessionKey, Entry>,
}

/// Arms, supersedes, and cancels reminder loops keyed by session.
#[derive(Clone)]
pub struct EscalationScheduler {
    inner: Arc<Inner>,
}

impl EscalationScheduler {
    pub fn new(
        lifecycle: Arc<MessageLifecycle>,
        events: Arc<EventLog>,
        resolver: Arc<LanguageResolver>,
        interval: Duration,
        max_reminders: u32,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                lifecycle,
                events,
                resolver,
                interval,
                max_reminders,
                entries: DashMap::new(),
            }),
        }
    }

    /// Marks the session pending and arms its reminder loop.
    ///
    /// Any previously armed loop for the same key is cancelled inside the
    /// same critical section that installs the replacement. Once the
    /// reminder count has hit the cap, the session stays pending but no new
    /// timer is armed.
    pub fn schedule(&self, key: SessionKey, language: &str) {
        let mut entry = self.inner.entries.entry(key).or_default();
        entry.pending = true;
        entry.language = language.to_string();

        if let Some(old) = entry.timer.take() {
            old.cancel();
        }

        if entry.reminder_count >= self.inner.max_reminders {
            debug!(?key, "reminder cap reached, not arming a new timer");
            return;
        }

        let cancel = CancellationToken::new();
        tokio::spawn(run_reminder_loop(self.inner.clone(), key, cancel.clone()));
        entry.timer = Some(cancel);
    }

    /// Stops and removes any armed loop for the key. Idempotent; the
    /// pending flag and reminder count are untouched.
    pub fn cancel(&self, key: SessionKey) {
        if let Some(mut entry) = self.inner.entries.get_mut(&key)
            && let Some(old) = entry.timer.take()
        {
            old.cancel();
        }
    }

    /// Cancels the timer and forgets the session entirely: pending flag
    /// cleared, reminder count reset. Idempotent.
    pub fn clear_pending(&self, key: SessionKey) {
        if let Some((_, mut entry)) = self.inner.entries.remove(&key)
            && let Some(old) = entry.timer.take()
        {
            old.cancel();
        }
    }

    pub fn is_pending(&self, key: SessionKey) -> bool {
        self.inner
            .entries
            .get(&key)
            .map(|entry| entry.pending)
            .unwrap_or(false)
    }

    pub fn reminder_count(&self, key: SessionKey) -> u32 {
        self.inner
            .entries
            .get(&key)
            .map(|entry| entry.reminder_count)
            .unwrap_or(0)
    }
}

enum Tick {
    Stop,
    Remind { count: u32, language: String },
}

async fn run_reminder_loop(inner: Arc<Inner>, key: SessionKey, cancel: CancellationToken) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(inner.interval) => {}
        }

        // Decide under the entry lock. Supersession happens under the same
        // lock, so an uncancelled token here means the slot is still ours.
        let tick = match inner.entries.get_mut(&key) {
            None => Tick::Stop,
            Some(mut entry) => {
                if cancel.is_cancelled() {
                    Tick::Stop
                } else if !entry.pending || entry.reminder_count >= inner.max_reminders {
                    entry.timer = None;
                    Tick::Stop
                } else {
                    entry.reminder_count += 1;
                    Tick::Remind {
                        count: entry.reminder_count,
                        language: entry.language.clone(),
                    }
                }
            }
        };

        match tick {
            Tick::Stop => return,
            Tick::Remind { count, language } => {
                inner
                    .events
                    .record(
                        NewEvent::now(kinds::SUPPORT_REMINDER)
                            .chat(key.chat_id)
                            .payload(serde_json::json!({
                                "user_id": key.user_id,
                                "count": count,
                            })),
                    )
                    .await;

                if cancel.is_cancelled() {
                    return;
                }

                let bundle = inner.resolver.bundle(&language);
                // Send failures are logged inside the lifecycle; the loop
                // sleeps again rather than ending the reminder series.
                inner
                    .lifecycle
                    .send_replacing(
                        key.chat_id,
                        &bundle.template(templates::SUPPORT_REMINDER),
                        Some(&bundle.reminder_menu),
                    )
                    .await;
            }
        }
    }
}
