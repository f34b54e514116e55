//! Generic runtime for session orchestration.
//!
//! The Runtime drives the application loop, coordinating between:
//! - [`Session`]: the state machine
//! - [`Driver`]: platform-specific I/O
//!
//! It also owns the live capture stream, so a failed call, a stale grant, or
//! a logout can never leak media tracks: every path that drops the stream
//! stops its tracks first.

use std::collections::VecDeque;

use palaver_core::{Environment, MediaTracks};

use crate::driver::{Driver, DriverEvent};
use crate::event::{Effect, SessionEvent};
use crate::session::Session;

/// Generic runtime that orchestrates Session and Driver.
///
/// # Type Parameters
///
/// - `D`: platform-specific I/O driver
/// - `E`: environment providing time and randomness
pub struct Runtime<D, E>
where
    D: Driver<E>,
    E: Environment,
{
    driver: D,
    env: E,
    session: Session<E>,
    local_stream: Option<D::Stream>,
}

impl<D, E> Runtime<D, E>
where
    D: Driver<E>,
    E: Environment,
{
    /// Create a runtime over a fresh session.
    pub fn new(driver: D, env: E) -> Self {
        let session = Session::new(env.clone());
        Self { driver, env, session, local_stream: None }
    }

    /// The session state, for assertions and snapshot consumers.
    pub fn session(&self) -> &Session<E> {
        &self.session
    }

    /// The live local capture stream, if a call holds one.
    ///
    /// This is the handle the call view renders from.
    pub fn local_stream(&self) -> Option<&D::Stream> {
        self.local_stream.as_ref()
    }

    /// Run the main loop until the driver delivers
    /// [`DriverEvent::Shutdown`].
    ///
    /// Each cycle polls the driver for one input, applies it, then ticks the
    /// session so due replies and presence sweeps fire.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails to poll. Render and sound
    /// failures are logged and swallowed.
    pub async fn run(mut self) -> Result<(), D::Error> {
        self.execute(vec![Effect::Render]).await;

        loop {
            match self.driver.poll_event().await? {
                Some(DriverEvent::Shutdown) => break,
                Some(DriverEvent::Session(event)) => self.dispatch(event).await,
                None => {},
            }
            let now = self.env.now();
            self.dispatch(SessionEvent::Tick { now }).await;
        }

        if let Some(mut stream) = self.local_stream.take() {
            stream.stop_all();
        }
        self.driver.stop();
        Ok(())
    }

    /// Feed one event into the session and execute the resulting effects.
    pub async fn dispatch(&mut self, event: SessionEvent<E::Instant>) {
        let effects = self.session.handle(event);
        self.execute(effects).await;
    }

    /// Execute effects, feeding capture outcomes back into the session until
    /// the queue drains.
    async fn execute(&mut self, effects: Vec<Effect>) {
        let mut pending: VecDeque<Effect> = effects.into();

        while let Some(effect) = pending.pop_front() {
            match effect {
                Effect::Render => {
                    if let Err(error) = self.driver.render(&self.session) {
                        tracing::warn!(%error, "render failed");
                    }
                },
                Effect::PlaySound(sound) => {
                    if let Err(error) = self.driver.play_sound(sound) {
                        tracing::warn!(%error, ?sound, "sound playback failed");
                    }
                },
                Effect::AcquireMedia { request } => {
                    let followup = match self.driver.acquire_media(request).await {
                        Ok(stream) => {
                            if let Some(mut old) = self.local_stream.replace(stream) {
                                old.stop_all();
                            }
                            SessionEvent::CaptureGranted
                        },
                        Err(error) => SessionEvent::CaptureDenied { error },
                    };
                    pending.extend(self.session.handle(followup));
                },
                Effect::ReleaseMedia => {
                    if let Some(mut stream) = self.local_stream.take() {
                        stream.stop_all();
                    }
                },
            }
        }
    }
}
