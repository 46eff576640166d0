// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Concierge support agent.
//!
//! Provides the error type, shared types (session identity, inbound events,
//! menus, raw content model) and the two traits the engine uses to talk to
//! its external collaborators: the messaging gateway and the content source.

pub mod error;
pub mod traits;
pub mod types;

pub use error::ConciergeError;
pub use traits::{ContentSource, MessagingGateway};
pub use types::{
    actions, CannedAnswer, InboundEvent, InboundMeta, MediaKind, MediaRef, Menu, MenuButton,
    MessageId, RawBundle, SessionKey, UserRef,
};
