// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rolling-window aggregate queries over the event log.

use chrono::{TimeDelta, Utc};
use concierge_core::ConciergeError;
use rusqlite::params;

use crate::database::map_tr_err;
use crate::store::{kinds, EventLog};

/// How many subjects the top-subject rankings keep.
const TOP_SUBJECTS: u32 = 5;

/// Counts over a trailing window `[now - N days, now]`.
///
/// Derived, never stored. Ranking ties fall back to insertion order, which
/// is SQLite's natural scan order here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateReport {
    /// Inclusive lower bound of the window, RFC 3339.
    pub since: String,
    pub window_days: u32,
    pub total: i64,
    pub unique_users: i64,
    /// Per-event-type counts, descending.
    pub by_event: Vec<(String, i64)>,
    /// Top FAQ-answer subjects by count, descending.
    pub top_faq: Vec<(String, i64)>,
    /// Top install-answer subjects by count, descending.
    pub top_install: Vec<(String, i64)>,
    pub helpful: i64,
    pub unhelpful: i64,
}

impl EventLog {
    /// Computes the aggregate report for the trailing `window_days` days.
    pub async fn query(&self, window_days: u32) -> Result<AggregateReport, ConciergeError> {
        let since = (Utc::now() - TimeDelta::days(i64::from(window_days))).to_rfc3339();
        let since_param = since.clone();

        let report = self
            .db
            .connection()
            .call(move |conn| {
                let total: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM events WHERE ts >= ?1",
                    params![since_param],
                    |row| row.get(0),
                )?;

                let unique_users: i64 = conn.query_row(
                    "SELECT COUNT(DISTINCT user_id) FROM events
                     WHERE ts >= ?1 AND user_id IS NOT NULL",
                    params![since_param],
                    |row| row.get(0),
                )?;

                let mut by_event = Vec::new();
                {
                    let mut stmt = conn.prepare(
                        "SELECT event_type, COUNT(*) FROM events
                         WHERE ts >= ?1
                         GROUP BY event_type
                         ORDER BY COUNT(*) DESC",
                    )?;
                    let rows = stmt
                        .query_map(params![since_param], |row| Ok((row.get(0)?, row.get(1)?)))?;
                    for row in rows {
                        by_event.push(row?);
                    }
                }

                let top_faq = top_subjects(conn, kinds::FAQ_ANSWER, &since_param)?;
                let top_install = top_subjects(conn, kinds::INSTALL_ANSWER, &since_param)?;

                let helpful = count_of_type(conn, kinds::FEEDBACK_HELPFUL, &since_param)?;
                let unhelpful = count_of_type(conn, kinds::FEEDBACK_UNHELPFUL, &since_param)?;

                Ok((total, unique_users, by_event, top_faq, top_install, helpful, unhelpful))
            })
            .await
            .map_err(map_tr_err)?;

        let (total, unique_users, by_event, top_faq, top_install, helpful, unhelpful) = report;

        Ok(AggregateReport {
            since,
            window_days,
            total,
            unique_users,
            by_event,
            top_faq,
            top_install,
            helpful,
            unhelpful,
        })
    }
}

fn top_subjects(
    conn: &rusqlite::Connection,
    event_type: &str,
    since: &str,
) -> Result<Vec<(String, i64)>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT subject, COUNT(*) FROM events
         WHERE event_type = ?1 AND ts >= ?2 AND subject IS NOT NULL
         GROUP BY subject
         ORDER BY COUNT(*) DESC
         LIMIT ?3",
    )?;
    let rows = stmt.query_map(params![event_type, since, TOP_SUBJECTS], |row| {
        Ok((row.get(0)?, row.get(1)?))
    })?;
    let mut subjects = Vec::new();
    for row in rows {
        subjects.push(row?);
    }
    Ok(subjects)
}

fn count_of_type(
    conn: &rusqlite::Connection,
    event_type: &str,
    since: &str,
) -> Result<i64, rusqlite::Error> {
    conn.query_row(
        "SELECT COUNT(*) FROM events WHERE event_type = ?1 AND ts >= ?2",
        params![event_type, since],
        |row| row.get(0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;
    use crate::store::NewEvent;
    use tempfile::tempdir;

    async fn setup_log() -> (EventLog, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("events.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (EventLog::new(db), dir)
    }

    fn user(id: i64) -> concierge_core::UserRef {
        concierge_core::UserRef {
            id,
            username: None,
            full_name: None,
        }
    }

    #[tokio::test]
    async fn subject_round_trips_into_rankings() {
        let (log, _dir) = setup_log().await;

        log.append(
            NewEvent::now(kinds::FAQ_ANSWER)
                .subject("main:keys")
                .actor(&user(1)),
        )
        .await
        .unwrap();

        let report = log.query(7).await.unwrap();
        assert_eq!(report.top_faq, vec![("main:keys".to_string(), 1)]);
        assert!(report.top_install.is_empty());
        assert_eq!(
            report.by_event,
            vec![(kinds::FAQ_ANSWER.to_string(), 1)]
        );

        log.close().await.unwrap();
    }

    #[tokio::test]
    async fn events_outside_window_are_excluded() {
        let (log, _dir) = setup_log().await;

        log.append(
            NewEvent::now(kinds::START)
                .at("2020-01-01T00:00:00+00:00")
                .actor(&user(1)),
        )
        .await
        .unwrap();
        log.append(NewEvent::now(kinds::START).actor(&user(2)))
            .await
            .unwrap();

        let report = log.query(7).await.unwrap();
        assert_eq!(report.total, 1);
        assert_eq!(report.unique_users, 1);

        log.close().await.unwrap();
    }

    #[tokio::test]
    async fn by_event_is_sorted_descending() {
        let (log, _dir) = setup_log().await;

        for _ in 0..3 {
            log.append(NewEvent::now(kinds::FAQ_ANSWER).subject("main:keys"))
                .await
                .unwrap();
        }
        log.append(NewEvent::now(kinds::START)).await.unwrap();

        let report = log.query(7).await.unwrap();
        assert_eq!(report.by_event[0], (kinds::FAQ_ANSWER.to_string(), 3));
        assert_eq!(report.by_event[1], (kinds::START.to_string(), 1));

        log.close().await.unwrap();
    }

    #[tokio::test]
    async fn top_subjects_keeps_five() {
        let (log, _dir) = setup_log().await;

        for platform in ["ios", "android", "windows", "macos", "linux", "bsd"] {
            log.append(
                NewEvent::now(kinds::INSTALL_ANSWER).subject(format!("install:{platform}")),
            )
            .await
            .unwrap();
        }

        let report = log.query(7).await.unwrap();
        assert_eq!(report.top_install.len(), 5);

        log.close().await.unwrap();
    }

    #[tokio::test]
    async fn feedback_tallies_count_separately() {
        let (log, _dir) = setup_log().await;

        log.append(NewEvent::now(kinds::FEEDBACK_UNHELPFUL).subject("main:keys"))
            .await
            .unwrap();

        let report = log.query(7).await.unwrap();
        assert_eq!(report.unhelpful, 1);
        assert_eq!(report.helpful, 0);

        log.close().await.unwrap();
    }
}
