//! Derived read-only views.
//!
//! Everything the presentation layer renders is recomputed here from the
//! session's state: the grouped buddy roster, block-filtered conversations,
//! and typing lists. None of these accessors mutate anything.

use std::collections::{BTreeMap, BTreeSet};

use palaver_core::{Author, CallPhase, ChatId, Environment, Message, Room, RoomId, User, UserId};

use crate::session::Session;
use crate::state::{ActiveChat, BuddyGroups, ModalState};

impl<E: Environment> Session<E> {
    /// The logged-in user. `None` pre-login.
    pub fn current_user(&self) -> Option<&User> {
        self.current_user.and_then(|id| self.directory.get(&id))
    }

    /// Every known user, in id order.
    pub fn users(&self) -> &BTreeMap<UserId, User> {
        &self.directory
    }

    /// The seeded room list, in id order.
    pub fn rooms(&self) -> &BTreeMap<RoomId, Room> {
        &self.rooms
    }

    /// The full append-only message log.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The focused conversation. `None` when no chat is open.
    pub fn active_chat(&self) -> Option<&ActiveChat> {
        self.active_chat.as_ref()
    }

    /// Call lifecycle state.
    pub fn call(&self) -> CallPhase {
        self.call
    }

    /// The open modal, if any.
    pub fn modal(&self) -> Option<ModalState> {
        self.modal
    }

    /// The transient user-facing notice, if any.
    pub fn status_notice(&self) -> Option<&str> {
        self.status_notice.as_deref()
    }

    /// Users whose notification sounds are suppressed.
    pub fn muted(&self) -> &BTreeSet<UserId> {
        &self.muted
    }

    /// Users whose chats and messages are suppressed.
    pub fn blocked(&self) -> &BTreeSet<UserId> {
        &self.blocked
    }

    /// Whether the page is foreground-visible.
    pub fn page_visible(&self) -> bool {
        self.page_visible
    }

    /// Whether a simulated reply is scheduled.
    pub fn has_pending_reply(&self) -> bool {
        self.pending_reply.is_some()
    }

    /// Who is currently typing in a conversation, in stable order.
    pub fn typing_in(&self, chat: ChatId) -> Vec<Author> {
        self.typing.get(&chat).map(|authors| authors.iter().copied().collect()).unwrap_or_default()
    }

    /// Every conversation with someone typing in it.
    pub fn typing(&self) -> &BTreeMap<ChatId, BTreeSet<Author>> {
        &self.typing
    }

    /// The buddy roster, grouped the way the sidebar renders it.
    ///
    /// Empty pre-login. Blocked buddies are hidden entirely.
    pub fn buddy_groups(&self) -> BuddyGroups<'_> {
        let Some(me) = self.current_user() else {
            return BuddyGroups::default();
        };

        let mut groups = BuddyGroups::default();
        for user in self.directory.values() {
            if !me.friends.contains(&user.id) || self.blocked.contains(&user.id) {
                continue;
            }
            if user.presence.appears_online() {
                groups.online.push(user);
            } else {
                groups.offline.push(user);
            }
        }
        groups
    }

    /// A conversation's messages with blocked authors filtered out.
    ///
    /// Muting never filters here; it only silences sounds.
    pub fn conversation(&self, chat: ChatId) -> Vec<&Message> {
        self.messages
            .iter()
            .filter(|message| {
                message.chat == chat
                    && !message
                        .author
                        .user_id()
                        .is_some_and(|author| self.blocked.contains(&author))
            })
            .collect()
    }
}
