//! Deterministic simulation support for the Palaver session core.
//!
//! Everything nondeterministic in the real system (clocks, randomness,
//! capture devices, sound output) has a scripted stand-in here, so tests
//! can replay entire sessions from a seed and assert exact outcomes.
//!
//! # Components
//!
//! - [`SimEnv`]: virtual clock plus seeded RNG implementing
//!   [`Environment`](palaver_core::Environment)
//! - [`SimDriver`]: scripted driver with fake capture streams and recorded
//!   side effects
//! - [`invariants`]: structural checks that must hold after every operation

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod invariants;
mod sim_driver;
mod sim_env;

pub use sim_driver::{FakeStream, RenderSnapshot, SimDriver, SimHandles};
pub use sim_env::{SimEnv, SimInstant};
