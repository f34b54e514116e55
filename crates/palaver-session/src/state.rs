//! Observable session state types.
//!
//! These structures are the "View Model" exposed to the presentation layer:
//! the focused conversation, the single modal slot, and the grouped buddy
//! roster. They carry no behavior of their own; all mutation goes through
//! [`Session`](crate::Session) operations.

use palaver_core::{ChatId, User, UserId};

/// The single conversation currently displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveChat {
    /// Which room or direct conversation is focused.
    pub chat: ChatId,
    /// Display name resolved at switch time ("Unknown Room"/"Unknown User"
    /// when the target is not in the registry).
    pub name: String,
}

/// Which detail view a modal shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    /// Name, email, gender, and status of a user.
    UserDetails,
    /// Enlarged profile photo.
    ProfilePhoto,
}

/// The single open modal, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModalState {
    /// Which detail view is shown.
    pub kind: ModalKind,
    /// The user the modal is about.
    pub subject: UserId,
}

/// The buddy roster split the way the sidebar renders it.
///
/// Friends of the current user, minus blocked users, in directory order.
/// Busy buddies count as online; invisible buddies sort with the offline
/// group.
#[derive(Debug, Clone, Default)]
pub struct BuddyGroups<'a> {
    /// Buddies shown under the "Online" heading.
    pub online: Vec<&'a User>,
    /// Buddies shown under the "Offline" heading.
    pub offline: Vec<&'a User>,
}
