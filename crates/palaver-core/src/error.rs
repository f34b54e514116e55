//! Error types.
//!
//! The only failure a user ever sees is a capture denial; everything else in
//! the system degrades to a silent no-op or a logged warning. The taxonomy is
//! therefore small and strongly typed rather than a catch-all string error.

use thiserror::Error;

/// Errors acquiring a local audio/video capture device.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// The user or platform refused the permission prompt.
    #[error("capture permission denied: {reason}")]
    Denied {
        /// Platform-provided denial reason.
        reason: String,
    },

    /// No microphone or camera is present.
    #[error("no capture device available")]
    NoDevice,

    /// The device exists but acquisition failed.
    #[error("capture failed: {0}")]
    Failed(String),
}

impl CaptureError {
    /// The dismissible message shown to the user when a call cannot start.
    ///
    /// Capture failures are always recoverable: the session stays in its
    /// pre-call state and the user may simply try again.
    pub fn user_notice(&self) -> String {
        match self {
            Self::Denied { .. } | Self::NoDevice => {
                "Could not start call. Please ensure you have given camera and microphone \
                 permissions."
                    .to_owned()
            },
            Self::Failed(reason) => format!("Could not start call: {reason}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn denial_notice_mentions_permissions() {
        let err = CaptureError::Denied { reason: "NotAllowedError".to_owned() };
        assert!(err.user_notice().contains("permissions"));
    }

    #[test]
    fn failure_notice_carries_the_reason() {
        let err = CaptureError::Failed("device busy".to_owned());
        assert!(err.user_notice().contains("device busy"));
    }
}
