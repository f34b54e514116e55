//! Session inputs and effects.
//!
//! The caller is responsible for:
//! - forwarding user operations as [`SessionCommand`]s
//! - driving time forward via [`SessionEvent::Tick`]
//! - reporting capture-device outcomes and page-visibility changes
//!
//! The session answers with [`Effect`]s for the caller to execute.

use palaver_core::{
    CallKind, CaptureError, CaptureRequest, ChatId, MessageDraft, Presence, Sound, UserId,
};

use crate::state::ModalKind;

/// Named user operations, one per store entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Establish a session as a freshly created identity.
    Login {
        /// Display name.
        name: String,
        /// Email address (informational only).
        email: String,
        /// Self-described gender.
        gender: String,
    },

    /// Tear the session down. Idempotent.
    Logout,

    /// Focus a room or direct conversation.
    SwitchChat {
        /// Target conversation.
        chat: ChatId,
    },

    /// Append a message to a conversation.
    SendMessage {
        /// Message content.
        draft: MessageDraft,
        /// Target conversation.
        chat: ChatId,
    },

    /// Change the current user's own presence.
    ChangeStatus {
        /// New presence, including `Invisible`.
        presence: Presence,
    },

    /// Begin a voice or video call.
    StartCall {
        /// Conversation the call targets.
        chat: ChatId,
        /// Voice or video.
        kind: CallKind,
    },

    /// Hang up. Safe when no call is in progress.
    EndCall,

    /// Flip notification muting for a user.
    ToggleMuteUser {
        /// Target user.
        user: UserId,
    },

    /// Flip blocking for a user.
    ToggleBlockUser {
        /// Target user.
        user: UserId,
    },

    /// Open a detail modal about a user.
    OpenModal {
        /// Which detail view.
        kind: ModalKind,
        /// The user the modal is about.
        subject: UserId,
    },

    /// Close the open modal, if any.
    CloseModal,

    /// Dismiss the transient status notice, if any.
    DismissNotice,
}

/// Events processed by the session state machine.
///
/// Generic over `I` (instant type) to support both production
/// (`std::time::Instant`) and simulated virtual time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent<I = std::time::Instant> {
    /// A named user operation.
    Command(SessionCommand),

    /// The driver acquired the capture device requested by
    /// [`Effect::AcquireMedia`]. The driver holds the stream itself.
    CaptureGranted,

    /// The driver failed to acquire the capture device.
    CaptureDenied {
        /// Why acquisition failed.
        error: CaptureError,
    },

    /// The page moved between foreground and background.
    VisibilityChanged {
        /// Whether the page is now foreground-visible.
        visible: bool,
    },

    /// Time tick for deadline processing.
    ///
    /// The caller should send ticks periodically so the session can fire due
    /// simulated replies and presence sweeps.
    Tick {
        /// Current time from the environment.
        now: I,
    },
}

/// Instructions the session produces for the caller to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Re-render from the current session state.
    Render,

    /// Play a notification sound. Fire-and-forget; failures are logged and
    /// swallowed, never surfaced.
    PlaySound(Sound),

    /// Acquire a local capture stream. The driver must answer with
    /// [`SessionEvent::CaptureGranted`] or [`SessionEvent::CaptureDenied`].
    AcquireMedia {
        /// What to capture.
        request: CaptureRequest,
    },

    /// Stop all tracks of the held capture stream and drop it.
    ReleaseMedia,
}
