//! Session store for the Palaver messenger simulation.
//!
//! The store is a Sans-IO, action-based state machine: it receives
//! [`SessionEvent`] inputs (named user operations, driver callbacks, time
//! ticks), mutates its state, and returns [`Effect`] instructions for the
//! caller to execute. No I/O happens inside the state machine, which makes
//! every behavior (including the randomized reply delay and the presence
//! "world" simulation) reproducible under a seeded
//! [`Environment`](palaver_core::Environment).
//!
//! # Components
//!
//! - [`Session`]: the state machine owning all domain state
//! - [`SessionCommand`] / [`SessionEvent`]: inputs
//! - [`Effect`]: outputs (render, sounds, media acquire/release)
//! - [`Driver`]: platform I/O abstraction (capture devices, sound, input)
//! - [`Runtime`]: generic orchestration loop wiring a driver to a session

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod driver;
mod event;
mod runtime;
mod seed;
mod session;
mod simulate;
mod state;
mod view;

pub use driver::{Driver, DriverEvent};
pub use event::{Effect, SessionCommand, SessionEvent};
pub use runtime::Runtime;
pub use session::Session;
pub use state::{ActiveChat, BuddyGroups, ModalKind, ModalState};

pub use palaver_core::{Author, CallKind, CallPhase, ChatId, Environment, MessageDraft, Presence};
