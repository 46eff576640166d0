// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Traits for the engine's external collaborators.
//!
//! The engine only ever talks to the outside world through these two seams:
//! a [`MessagingGateway`] for message delivery and a [`ContentSource`] for
//! localized content.

pub mod content;
pub mod gateway;

pub use content::ContentSource;
pub use gateway::MessagingGateway;
