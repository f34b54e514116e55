//! Static seed data.
//!
//! The simulated world ships with a fixed cast of buddies and a fixed room
//! list. Seed users are the presence simulation's population; seed rooms are
//! joinable but never created or deleted at runtime.

use std::collections::BTreeMap;

use palaver_core::{Presence, Room, RoomId, RoomKind, User, UserId};

/// First id handed to a login-created identity. Seed users sit well below.
pub(crate) const FIRST_SESSION_USER_ID: UserId = 100;

/// Buddies every fresh login starts with.
pub(crate) const DEFAULT_FRIENDS: [UserId; 2] = [2, 3];

pub(crate) fn directory() -> BTreeMap<UserId, User> {
    let users = [
        User::new(2, "Priya Sharma", "priya@tittoos.in", "Female")
            .with_presence(Presence::Online)
            .with_friends([3, 4, 5]),
        User::new(3, "Rohan Mehta", "rohan@tittoos.in", "Male")
            .with_presence(Presence::Busy)
            .with_friends([2, 5]),
        User::new(4, "Ananya Iyer", "ananya@tittoos.in", "Female")
            .with_presence(Presence::Offline)
            .with_friends([2, 6]),
        User::new(5, "Vikram Rao", "vikram@tittoos.in", "Male")
            .with_presence(Presence::Online)
            .with_friends([2, 3]),
        User::new(6, "Sneha Patil", "sneha@tittoos.in", "Female")
            .with_presence(Presence::Invisible)
            .with_friends([4]),
    ];
    users.into_iter().map(|user| (user.id, user)).collect()
}

pub(crate) fn rooms() -> BTreeMap<RoomId, Room> {
    let rooms = [
        Room::new(1, "India Lobby", RoomKind::MainLobby, [2, 3, 5]),
        Room::new(2, "Maharashtra", RoomKind::Group, [3, 6]),
        Room::new(3, "Karnataka", RoomKind::Group, [4]),
        Room::new(4, "Hindi", RoomKind::Group, [2, 5]),
        Room::new(5, "Tamil", RoomKind::Group, []),
    ];
    rooms.into_iter().map(|room| (room.id, room)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_friends_exist_in_directory() {
        let directory = directory();
        for id in DEFAULT_FRIENDS {
            assert!(directory.contains_key(&id));
        }
    }

    #[test]
    fn seed_ids_stay_below_session_ids() {
        assert!(directory().keys().all(|&id| id < FIRST_SESSION_USER_ID));
    }

    #[test]
    fn seed_room_participants_are_seed_users() {
        let directory = directory();
        for room in rooms().values() {
            assert!(room.participants.iter().all(|id| directory.contains_key(id)));
        }
    }
}
