//! Core domain model for the Palaver messenger simulation.
//!
//! This crate defines the data the session store operates on (users, rooms,
//! messages, call phases) and the boundary abstractions that keep the store
//! deterministic and testable:
//!
//! - [`Environment`]: injected time and randomness, so simulation runs are
//!   reproducible from a seed
//! - [`MediaTracks`] / [`CaptureRequest`]: the media-capture boundary used by
//!   the mocked call view
//! - [`CaptureError`]: the only recoverable user-facing failure in the system
//!
//! No networking, persistence, or cryptography lives here; all state is
//! volatile and local to one process.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod call;
mod error;
mod id;
mod media;
mod message;
mod room;
mod user;

pub mod env;

pub use call::{CallKind, CallPhase};
pub use env::{Environment, SystemEnv};
pub use error::CaptureError;
pub use id::{Author, ChatId, MessageId, RoomId, UserId};
pub use media::{CaptureRequest, MediaTracks, Sound, VideoConstraints};
pub use message::{Message, MessageDraft};
pub use room::{Room, RoomKind};
pub use user::{Presence, User};
