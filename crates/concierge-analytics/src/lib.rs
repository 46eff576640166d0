// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite analytics layer for the Concierge support agent.
//!
//! Provides a WAL-mode, single-writer (via `tokio-rusqlite`) append-only
//! event log and rolling-window aggregate queries. Recording is best-effort
//! by design: a failed write is logged and lost, never surfaced to the
//! user-facing interaction.

pub mod database;
pub mod report;
pub mod store;

pub use database::Database;
pub use report::AggregateReport;
pub use store::{kinds, EventLog, NewEvent};
