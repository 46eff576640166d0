// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end scenarios for the session/escalation engine.
//!
//! Each test builds an isolated harness with a temp SQLite event log and a
//! mock gateway. Tests are independent and order-insensitive.

use std::sync::Arc;
use std::time::Duration;

use concierge_analytics::{kinds, Database, EventLog};
use concierge_content::{LanguageResolver, StaticCatalog};
use concierge_core::types::actions;
use concierge_core::SessionKey;
use concierge_engine::{
    EngineSettings, EscalationScheduler, MessageLifecycle, SessionState, SupportEngine,
};
use concierge_test_utils::{callback, command, non_text, text, GatewayCall, MockGateway};

const CHAT: i64 = 100;
const USER: i64 = 200;
const ADMIN: i64 = 999;
// Short real interval for the reminder scenario; everything else uses an
// interval far beyond test runtime so timers never interfere.
const SHORT_INTERVAL: Duration = Duration::from_millis(200);
const LONG_INTERVAL: Duration = Duration::from_secs(600);

struct Harness {
    gateway: Arc<MockGateway>,
    events: Arc<EventLog>,
    scheduler: EscalationScheduler,
    engine: SupportEngine,
    _dir: tempfile::TempDir,
}

async fn harness() -> Harness {
    harness_with(LONG_INTERVAL).await
}

async fn harness_with(interval: Duration) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("events.db");
    let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
    let events = Arc::new(EventLog::new(db));

    let gateway = Arc::new(MockGateway::new());
    let lifecycle = Arc::new(MessageLifecycle::new(gateway.clone()));
    let catalog = StaticCatalog::builtin("media");
    let resolver = Arc::new(LanguageResolver::new(&catalog, "ru").unwrap());

    let scheduler = EscalationScheduler::new(
        lifecycle.clone(),
        events.clone(),
        resolver.clone(),
        interval,
        3,
    );

    let engine = SupportEngine::new(
        gateway.clone(),
        lifecycle,
        scheduler.clone(),
        resolver,
        events.clone(),
        EngineSettings {
            admin_chat_id: ADMIN,
            report_window_days: 7,
        },
    );

    Harness {
        gateway,
        events,
        scheduler,
        engine,
        _dir: dir,
    }
}

fn key() -> SessionKey {
    SessionKey::new(CHAT, USER)
}

fn event_count(report: &concierge_analytics::AggregateReport, kind: &str) -> i64 {
    report
        .by_event
        .iter()
        .find(|(event_type, _)| event_type == kind)
        .map(|(_, count)| *count)
        .unwrap_or(0)
}

#[tokio::test]
async fn support_start_always_yields_awaiting_state() {
    let h = harness().await;
    h.engine.handle(callback(CHAT, USER, actions::SUPPORT_START)).await;

    assert_eq!(h.engine.state(key()).await, SessionState::AwaitingSupportMessage);
    assert!(h.scheduler.is_pending(key()));
    assert_eq!(h.gateway.sends().len(), 1);

    let report = h.events.query(7).await.unwrap();
    assert_eq!(event_count(&report, kinds::SUPPORT_START), 1);
}

#[tokio::test]
async fn text_submission_returns_to_idle_with_exactly_one_forward() {
    let h = harness().await;
    h.engine.handle(callback(CHAT, USER, actions::SUPPORT_START)).await;
    h.engine.handle(text(CHAT, USER, "my keys stopped working")).await;

    assert_eq!(h.engine.state(key()).await, SessionState::Idle);
    assert!(!h.scheduler.is_pending(key()));

    let forwards = h.gateway.forwards();
    assert_eq!(forwards.len(), 1);
    assert!(forwards[0].starts_with("#SUPREQUEST #USER200"));
    assert!(forwards[0].ends_with("my keys stopped working"));

    let report = h.events.query(7).await.unwrap();
    assert_eq!(event_count(&report, kinds::SUPPORT_SUBMIT), 1);
}

#[tokio::test]
async fn forward_failure_still_confirms_to_the_user() {
    let h = harness().await;
    h.engine.handle(callback(CHAT, USER, actions::SUPPORT_START)).await;
    h.gateway.set_fail_forward(true);
    h.engine.handle(text(CHAT, USER, "help")).await;

    assert_eq!(h.engine.state(key()).await, SessionState::Idle);
    // Confirmation still went out despite the lost escalation.
    assert_eq!(h.gateway.sends().len(), 2);
    let report = h.events.query(7).await.unwrap();
    assert_eq!(event_count(&report, kinds::SUPPORT_SUBMIT), 1);
}

#[tokio::test]
async fn cancel_phrase_of_any_language_cancels() {
    let h = harness().await;

    // Session resolves to Russian; the English cancel word still works.
    h.engine.handle(callback(CHAT, USER, actions::SUPPORT_START)).await;
    h.engine.handle(text(CHAT, USER, "CANCEL")).await;

    assert_eq!(h.engine.state(key()).await, SessionState::Idle);
    assert!(!h.scheduler.is_pending(key()));
    assert!(h.gateway.forwards().is_empty());

    let report = h.events.query(7).await.unwrap();
    assert_eq!(event_count(&report, kinds::SUPPORT_CANCEL), 1);
}

#[tokio::test]
async fn cancel_button_clears_pending() {
    let h = harness().await;
    h.engine.handle(callback(CHAT, USER, actions::SUPPORT_START)).await;
    h.engine.handle(callback(CHAT, USER, actions::SUPPORT_CANCEL)).await;

    assert_eq!(h.engine.state(key()).await, SessionState::Idle);
    assert!(!h.scheduler.is_pending(key()));
}

#[tokio::test]
async fn resolved_trigger_thanks_and_clears() {
    let h = harness().await;
    h.engine.handle(callback(CHAT, USER, actions::SUPPORT_START)).await;
    h.engine.handle(callback(CHAT, USER, actions::SUPPORT_RESOLVED)).await;

    assert_eq!(h.engine.state(key()).await, SessionState::Idle);
    assert!(!h.scheduler.is_pending(key()));

    let report = h.events.query(7).await.unwrap();
    assert_eq!(event_count(&report, kinds::SUPPORT_RESOLVED), 1);
}

#[tokio::test]
async fn non_text_reprompts_without_advancing_state() {
    let h = harness().await;
    h.engine.handle(callback(CHAT, USER, actions::SUPPORT_START)).await;
    h.engine.handle(non_text(CHAT, USER, "photo")).await;

    assert_eq!(h.engine.state(key()).await, SessionState::AwaitingSupportMessage);
    assert!(h.scheduler.is_pending(key()));

    let report = h.events.query(7).await.unwrap();
    assert_eq!(event_count(&report, kinds::SUPPORT_NON_TEXT), 1);
}

#[tokio::test]
async fn unrecognized_callback_is_recorded_but_silent() {
    let h = harness().await;
    h.engine.handle(callback(CHAT, USER, "no:such:action")).await;

    assert!(h.gateway.sends().is_empty());
    let report = h.events.query(7).await.unwrap();
    assert_eq!(event_count(&report, kinds::FALLBACK_CALLBACK), 1);
}

#[tokio::test]
async fn idle_text_gets_fallback_prompt() {
    let h = harness().await;
    h.engine.handle(text(CHAT, USER, "are you a human?")).await;

    assert_eq!(h.gateway.sends().len(), 1);
    assert_eq!(
        h.gateway.last_text().unwrap(),
        "Пожалуйста, выберите пункт из меню."
    );
    let report = h.events.query(7).await.unwrap();
    assert_eq!(event_count(&report, kinds::FALLBACK_MESSAGE), 1);
}

#[tokio::test]
async fn feedback_scenario_lands_in_the_report() {
    let h = harness().await;

    h.engine.handle(command(CHAT, USER, "start")).await;
    h.engine.handle(callback(CHAT, USER, actions::MAIN_KEYS)).await;
    h.engine
        .handle(callback(CHAT, USER, "feedback:no:main:keys"))
        .await;

    let report = h.events.query(7).await.unwrap();
    assert_eq!(report.unhelpful, 1);
    assert_eq!(report.helpful, 0);
    assert_eq!(report.top_faq, vec![("main:keys".to_string(), 1)]);
    assert_eq!(event_count(&report, kinds::FAQ_ANSWER), 1);

    // Feedback edits the answer's menu in place -- no new message.
    let calls = h.gateway.calls();
    assert!(calls
        .iter()
        .any(|c| matches!(c, GatewayCall::EditMenu { .. })));
    assert_eq!(h.gateway.sends().len(), 2);
}

#[tokio::test]
async fn install_flow_records_subjects() {
    let h = harness().await;
    h.engine.handle(callback(CHAT, USER, actions::MAIN_INSTALL)).await;
    h.engine.handle(callback(CHAT, USER, "install:linux")).await;

    let report = h.events.query(7).await.unwrap();
    assert_eq!(event_count(&report, kinds::INSTALL_MENU), 1);
    assert_eq!(report.top_install, vec![("install:linux".to_string(), 1)]);
}

#[tokio::test]
async fn stats_is_gated_to_the_admin_identity() {
    let h = harness().await;

    h.engine.handle(command(CHAT, USER, "stats")).await;
    let report = h.events.query(7).await.unwrap();
    assert_eq!(event_count(&report, kinds::STATS_REQUEST), 0);
    assert_eq!(
        h.gateway.last_text().unwrap(),
        "Команда доступна только администратору."
    );

    h.engine.handle(command(ADMIN, USER, "stats")).await;
    let report = h.events.query(7).await.unwrap();
    assert_eq!(event_count(&report, kinds::STATS_REQUEST), 1);
    assert!(h.gateway.last_text().unwrap().contains("7"));
}

#[tokio::test]
async fn language_selection_switches_and_start_resets() {
    let h = harness().await;

    h.engine.handle(callback(CHAT, USER, "lang:en")).await;
    assert_eq!(
        h.gateway.last_text().unwrap(),
        "Hello! We are happy to answer any question. If the menu does not cover it, leave a request and we will pass it to support."
    );

    // Explicit selection sticks for later interactions.
    h.engine.handle(text(CHAT, USER, "gibberish")).await;
    assert_eq!(
        h.gateway.last_text().unwrap(),
        "Please pick an item from the menu."
    );

    // /start drops the selection; the ru hint applies again.
    h.engine.handle(command(CHAT, USER, "start")).await;
    assert!(h.gateway.last_text().unwrap().starts_with("Здравствуйте"));
}

#[tokio::test]
async fn selecting_unknown_language_falls_back_silently() {
    let h = harness().await;
    h.engine.handle(callback(CHAT, USER, "lang:de")).await;

    assert!(h.gateway.sends().is_empty());
    let report = h.events.query(7).await.unwrap();
    assert_eq!(event_count(&report, kinds::FALLBACK_CALLBACK), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn one_reminder_between_two_spaced_non_text_messages() {
    let h = harness_with(SHORT_INTERVAL).await;

    h.engine.handle(callback(CHAT, USER, actions::SUPPORT_START)).await;
    h.engine.handle(non_text(CHAT, USER, "photo")).await;
    let sends_before = h.gateway.sends().len();

    // One reminder interval passes before the second non-text message.
    for _ in 0..500 {
        if h.scheduler.reminder_count(key()) == 1
            && h.gateway.sends().len() == sends_before + 1
        {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(h.scheduler.reminder_count(key()), 1);
    assert_eq!(h.gateway.sends().len(), sends_before + 1);

    h.engine.handle(non_text(CHAT, USER, "voice")).await;
    // Disarm before querying so counts are stable.
    h.scheduler.cancel(key());

    let report = h.events.query(7).await.unwrap();
    assert_eq!(event_count(&report, kinds::SUPPORT_REMINDER), 1);
    assert_eq!(event_count(&report, kinds::SUPPORT_NON_TEXT), 2);
}

#[tokio::test]
async fn sessions_are_isolated_between_users() {
    let h = harness().await;
    h.engine.handle(callback(CHAT, USER, actions::SUPPORT_START)).await;
    h.engine.handle(text(CHAT, 201, "hello from someone else")).await;

    // The second user's text hit the idle fallback, not the escalation.
    assert_eq!(h.engine.state(key()).await, SessionState::AwaitingSupportMessage);
    assert_eq!(h.engine.state(SessionKey::new(CHAT, 201)).await, SessionState::Idle);
    assert!(h.gateway.forwards().is_empty());
}
