//! Identifier types.
//!
//! Rooms and direct conversations historically shared one string id space,
//! which made "is this chat a room or a person" a stringly-typed question.
//! [`ChatId`] makes the distinction structural, and [`Author`] does the same
//! for the reserved bot identity.

use std::fmt;

/// Stable per-session user identifier.
pub type UserId = u64;

/// Room identifier.
pub type RoomId = u64;

/// Message identifier, unique within the session's append-only log.
pub type MessageId = u64;

/// Identifies a conversation: a shared room or a 1:1 chat with a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChatId {
    /// A seeded group room.
    Room(RoomId),
    /// A direct conversation with the given user.
    Direct(UserId),
}

impl ChatId {
    /// The peer of a direct conversation. `None` for rooms.
    pub fn direct_peer(self) -> Option<UserId> {
        match self {
            Self::Direct(user) => Some(user),
            Self::Room(_) => None,
        }
    }

    /// Whether this chat is a 1:1 conversation.
    pub fn is_direct(self) -> bool {
        matches!(self, Self::Direct(_))
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Room(id) => write!(f, "room:{id}"),
            Self::Direct(id) => write!(f, "user:{id}"),
        }
    }
}

/// The author of a message: a registered user or the reserved bot identity
/// that answers in group rooms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Author {
    /// A registered user.
    User(UserId),
    /// The simulated room bot.
    Bot,
}

impl Author {
    /// The user id behind this author. `None` for the bot.
    pub fn user_id(self) -> Option<UserId> {
        match self {
            Self::User(id) => Some(id),
            Self::Bot => None,
        }
    }

    /// Whether this author is the simulated room bot.
    pub fn is_bot(self) -> bool {
        matches!(self, Self::Bot)
    }
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(id) => write!(f, "user:{id}"),
            Self::Bot => f.write_str("bot"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_and_direct_ids_never_collide() {
        assert_ne!(ChatId::Room(7), ChatId::Direct(7));
    }

    #[test]
    fn direct_peer_is_none_for_rooms() {
        assert_eq!(ChatId::Room(1).direct_peer(), None);
        assert_eq!(ChatId::Direct(3).direct_peer(), Some(3));
    }

    #[test]
    fn bot_has_no_user_id() {
        assert_eq!(Author::Bot.user_id(), None);
        assert_eq!(Author::User(9).user_id(), Some(9));
    }
}
