//! Chat rooms.

use std::collections::HashSet;

use crate::id::{RoomId, UserId};

/// Room category, used by the presentation layer for grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomKind {
    /// An ordinary themed room.
    Group,
    /// A featured always-on lobby.
    MainLobby,
}

/// A seeded chat room.
///
/// Membership is a set, so duplicate participants are unrepresentable. The
/// only mutations are the current user auto-joining on first entry and
/// leaving on logout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    /// Room id.
    pub id: RoomId,
    /// Display name.
    pub name: String,
    /// Room category.
    pub kind: RoomKind,
    /// Ids of users currently in the room.
    pub participants: HashSet<UserId>,
}

impl Room {
    /// Create a room with the given initial participants.
    pub fn new(
        id: RoomId,
        name: &str,
        kind: RoomKind,
        participants: impl IntoIterator<Item = UserId>,
    ) -> Self {
        Self { id, name: name.to_owned(), kind, participants: participants.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn participants_deduplicate() {
        let room = Room::new(1, "The Lobby", RoomKind::MainLobby, [2, 2, 3]);
        assert_eq!(room.participants.len(), 2);
    }
}
