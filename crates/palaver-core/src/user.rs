//! Users and presence.

use std::collections::HashSet;
use std::fmt;

use crate::id::UserId;

/// A user's reported availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Presence {
    /// Available and visible.
    Online,
    /// Visible but marked do-not-disturb.
    Busy,
    /// Online but shown to others as offline.
    Invisible,
    /// Signed off.
    Offline,
}

impl Presence {
    /// Whether the buddy list shows this user in its "online" group.
    ///
    /// Busy users are online-with-a-warning; invisible users deliberately
    /// sort with the offline group.
    pub fn appears_online(self) -> bool {
        matches!(self, Self::Online | Self::Busy)
    }
}

impl fmt::Display for Presence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Online => "Online",
            Self::Busy => "Busy",
            Self::Invisible => "Invisible",
            Self::Offline => "Offline",
        };
        f.write_str(label)
    }
}

/// A registered user.
///
/// Created at login (the session's own identity) or present in the static
/// seed directory (everyone else). Users are never deleted within a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Stable per-session id.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address. Purely informational; no account system exists.
    pub email: String,
    /// Self-described gender.
    pub gender: String,
    /// Avatar image URL.
    pub avatar_url: String,
    /// Current availability.
    pub presence: Presence,
    /// Ids of this user's buddies.
    pub friends: HashSet<UserId>,
}

impl User {
    /// Create a user with a derived avatar and no friends, signed off.
    pub fn new(id: UserId, name: &str, email: &str, gender: &str) -> Self {
        Self {
            id,
            name: name.to_owned(),
            email: email.to_owned(),
            gender: gender.to_owned(),
            avatar_url: format!("https://i.pravatar.cc/150?u={name}"),
            presence: Presence::Offline,
            friends: HashSet::new(),
        }
    }

    /// Set the initial presence.
    pub fn with_presence(mut self, presence: Presence) -> Self {
        self.presence = presence;
        self
    }

    /// Set the friend list.
    pub fn with_friends(mut self, friends: impl IntoIterator<Item = UserId>) -> Self {
        self.friends = friends.into_iter().collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_counts_as_online_invisible_does_not() {
        assert!(Presence::Online.appears_online());
        assert!(Presence::Busy.appears_online());
        assert!(!Presence::Invisible.appears_online());
        assert!(!Presence::Offline.appears_online());
    }

    #[test]
    fn avatar_is_derived_from_name() {
        let user = User::new(1, "Maya", "maya@example.com", "Female");
        assert!(user.avatar_url.ends_with("u=Maya"));
    }
}
