// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The Concierge session/escalation engine.
//!
//! Three cooperating pieces:
//! - [`session::SupportEngine`] -- the per-session state machine driving
//!   transitions and side effects, serialized per session key.
//! - [`scheduler::EscalationScheduler`] -- cancellable, rate-limited
//!   background reminder loops, at most one per session.
//! - [`lifecycle::MessageLifecycle`] -- the at-most-one-live-bot-message
//!   discipline per chat.
//!
//! All gateway and analytics failures are local and silent to the end
//! user: the engine logs and degrades rather than failing an interaction.

pub mod lifecycle;
pub mod scheduler;
pub mod session;

pub use lifecycle::MessageLifecycle;
pub use scheduler::EscalationScheduler;
pub use session::{EngineSettings, SessionState, SupportEngine};
