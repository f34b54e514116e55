//! Call lifecycle state.

use crate::id::ChatId;

/// Media flavor of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    /// Audio only.
    Voice,
    /// Audio plus camera video.
    Video,
}

/// Where the session's single call currently is in its lifecycle.
///
/// `Idle -> Requesting -> Active -> Idle`. Requesting covers the window
/// between asking the platform for a capture device and its grant or denial;
/// a denial returns to `Idle` without touching any other session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CallPhase {
    /// No call in progress.
    #[default]
    Idle,
    /// Waiting for the capture device.
    Requesting {
        /// Conversation the call targets.
        chat: ChatId,
        /// Voice or video.
        kind: CallKind,
    },
    /// Call established with a live local stream.
    Active {
        /// Conversation the call targets.
        chat: ChatId,
        /// Voice or video.
        kind: CallKind,
    },
}

impl CallPhase {
    /// Whether no call is in progress.
    pub fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Whether a call is fully established.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Active { .. })
    }

    /// The conversation the call targets, if one is in progress.
    pub fn chat(self) -> Option<ChatId> {
        match self {
            Self::Idle => None,
            Self::Requesting { chat, .. } | Self::Active { chat, .. } => Some(chat),
        }
    }

    /// The call kind, if one is in progress.
    pub fn kind(self) -> Option<CallKind> {
        match self {
            Self::Idle => None,
            Self::Requesting { kind, .. } | Self::Active { kind, .. } => Some(kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requesting_is_neither_idle_nor_active() {
        let phase = CallPhase::Requesting { chat: ChatId::Direct(2), kind: CallKind::Voice };
        assert!(!phase.is_idle());
        assert!(!phase.is_active());
        assert_eq!(phase.chat(), Some(ChatId::Direct(2)));
    }
}
