//! Scripted driver for runtime tests.
//!
//! The driver feeds a pre-built script of inputs and clock advances to the
//! runtime, answers capture requests from a plan (grant by default, scripted
//! denials on demand), and records every observable side effect behind
//! cloneable [`SimHandles`] so tests can assert after the runtime consumed
//! the driver.

use std::collections::VecDeque;
use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use palaver_core::{CaptureError, CaptureRequest, MediaTracks, Sound};
use palaver_session::{Driver, DriverEvent, Session, SessionCommand, SessionEvent};

use crate::sim_env::{SimEnv, SimInstant};

/// A counting stand-in for a platform capture stream.
///
/// Tracks are only reclaimed by `stop_all`; a stream dropped without being
/// stopped keeps its tracks live, which is exactly the leak the runtime
/// tests watch for.
#[derive(Debug)]
pub struct FakeStream {
    open: usize,
    live: Arc<AtomicUsize>,
}

impl MediaTracks for FakeStream {
    fn stop_all(&mut self) {
        self.live.fetch_sub(self.open, Ordering::SeqCst);
        self.open = 0;
    }

    fn live_tracks(&self) -> usize {
        self.open
    }
}

/// What the driver saw of the session at its most recent render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSnapshot {
    /// Length of the message log.
    pub message_count: usize,
    /// Whether a call was fully established.
    pub call_is_active: bool,
    /// Whether a user was logged in.
    pub logged_in: bool,
}

/// Cloneable view of everything a [`SimDriver`] observed.
#[derive(Debug, Clone, Default)]
pub struct SimHandles {
    sounds: Arc<Mutex<Vec<Sound>>>,
    live_tracks: Arc<AtomicUsize>,
    renders: Arc<AtomicUsize>,
    last_render: Arc<Mutex<Option<RenderSnapshot>>>,
}

impl SimHandles {
    /// Every sound played, in order.
    pub fn sounds(&self) -> Vec<Sound> {
        lock(&self.sounds).clone()
    }

    /// Tracks currently live across all streams the driver handed out.
    pub fn live_tracks(&self) -> usize {
        self.live_tracks.load(Ordering::SeqCst)
    }

    /// Number of renders requested.
    pub fn renders(&self) -> usize {
        self.renders.load(Ordering::SeqCst)
    }

    /// The most recent render, if any happened.
    pub fn last_render(&self) -> Option<RenderSnapshot> {
        *lock(&self.last_render)
    }
}

#[derive(Debug)]
enum Step {
    Deliver(DriverEvent<SimInstant>),
    Advance(Duration),
}

/// Scripted [`Driver`] implementation over [`SimEnv`].
///
/// Build the script with the chainable constructors, keep a copy of
/// [`handles`](SimDriver::handles), then hand the driver to a
/// [`Runtime`](palaver_session::Runtime). When the script runs dry the
/// driver delivers `Shutdown`.
#[derive(Debug)]
pub struct SimDriver {
    env: SimEnv,
    script: VecDeque<Step>,
    capture_denials: VecDeque<CaptureError>,
    handles: SimHandles,
}

impl SimDriver {
    /// Create a driver with an empty script.
    pub fn new(env: SimEnv) -> Self {
        Self {
            env,
            script: VecDeque::new(),
            capture_denials: VecDeque::new(),
            handles: SimHandles::default(),
        }
    }

    /// Observation handles that outlive the driver.
    pub fn handles(&self) -> SimHandles {
        self.handles.clone()
    }

    /// Append a user operation to the script.
    pub fn command(mut self, command: SessionCommand) -> Self {
        self.script
            .push_back(Step::Deliver(DriverEvent::Session(SessionEvent::Command(command))));
        self
    }

    /// Append a raw session event to the script.
    pub fn event(mut self, event: SessionEvent<SimInstant>) -> Self {
        self.script.push_back(Step::Deliver(DriverEvent::Session(event)));
        self
    }

    /// Append a virtual-time advance to the script.
    pub fn wait(mut self, delta: Duration) -> Self {
        self.script.push_back(Step::Advance(delta));
        self
    }

    /// Make the next capture request fail with the given error.
    pub fn fail_next_capture(mut self, error: CaptureError) -> Self {
        self.capture_denials.push_back(error);
        self
    }
}

impl Driver<SimEnv> for SimDriver {
    type Error = Infallible;
    type Stream = FakeStream;

    fn poll_event(
        &mut self,
    ) -> impl Future<Output = Result<Option<DriverEvent<SimInstant>>, Infallible>> + Send {
        let next = match self.script.pop_front() {
            Some(Step::Deliver(event)) => Some(event),
            Some(Step::Advance(delta)) => {
                self.env.advance(delta);
                None
            },
            None => Some(DriverEvent::Shutdown),
        };
        std::future::ready(Ok(next))
    }

    fn acquire_media(
        &mut self,
        request: CaptureRequest,
    ) -> impl Future<Output = Result<FakeStream, CaptureError>> + Send {
        let outcome = match self.capture_denials.pop_front() {
            Some(error) => Err(error),
            None => {
                let open = request.track_count();
                self.handles.live_tracks.fetch_add(open, Ordering::SeqCst);
                Ok(FakeStream { open, live: Arc::clone(&self.handles.live_tracks) })
            },
        };
        std::future::ready(outcome)
    }

    fn play_sound(&mut self, sound: Sound) -> Result<(), Infallible> {
        lock(&self.handles.sounds).push(sound);
        Ok(())
    }

    fn render(&mut self, session: &Session<SimEnv>) -> Result<(), Infallible> {
        self.handles.renders.fetch_add(1, Ordering::SeqCst);
        *lock(&self.handles.last_render) = Some(RenderSnapshot {
            message_count: session.messages().len(),
            call_is_active: session.call().is_active(),
            logged_in: session.current_user().is_some(),
        });
        Ok(())
    }

    fn stop(&mut self) {}
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
