//! Driver trait for abstracting platform I/O.
//!
//! The [`Driver`] trait decouples the session runtime from specific platform
//! implementations. Each frontend implements the trait to provide capture
//! devices, sound playback, input, and rendering, while the generic
//! [`Runtime`](crate::Runtime) handles all orchestration.

use palaver_core::{CaptureError, CaptureRequest, Environment, MediaTracks, Sound};

use crate::event::SessionEvent;
use crate::session::Session;

/// An input delivered by the driver to the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverEvent<I> {
    /// Feed an event into the session.
    Session(SessionEvent<I>),
    /// Stop the runtime loop.
    Shutdown,
}

/// Abstracts platform I/O for the session runtime.
///
/// Implementations provide platform-specific I/O while the generic
/// [`Runtime`](crate::Runtime) handles orchestration logic, so the same
/// orchestration code runs against a real frontend and in simulation.
///
/// # Implementations
///
/// - **Production**: browser/desktop shell events, real capture devices,
///   audio output
/// - **Simulation**: scripted events, fake streams, recorded sounds
pub trait Driver<E: Environment>: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Capture stream handle produced by this platform.
    type Stream: MediaTracks;

    /// Poll for the next input.
    ///
    /// Returns `None` when no input arrived within the driver's polling
    /// window; the runtime uses that gap to tick the session.
    fn poll_event(
        &mut self,
    ) -> impl Future<Output = Result<Option<DriverEvent<E::Instant>>, Self::Error>> + Send;

    /// Acquire a local capture stream.
    ///
    /// # Errors
    ///
    /// Returns a [`CaptureError`] when the platform refuses or has no
    /// device. The runtime reports the outcome back to the session; a
    /// denial is recoverable and never fatal.
    fn acquire_media(
        &mut self,
        request: CaptureRequest,
    ) -> impl Future<Output = Result<Self::Stream, CaptureError>> + Send;

    /// Play a notification sound.
    ///
    /// # Errors
    ///
    /// Returns an error if playback fails; the runtime logs and swallows it.
    fn play_sound(&mut self, sound: Sound) -> Result<(), Self::Error>;

    /// Render the session state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails; the runtime logs and swallows it.
    fn render(&mut self, session: &Session<E>) -> Result<(), Self::Error>;

    /// Stop the driver and clean up platform resources.
    fn stop(&mut self);
}
