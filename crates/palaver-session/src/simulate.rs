//! World simulation: delayed replies and presence perturbation.
//!
//! Both mechanisms are deadline fields serviced by
//! [`SessionEvent::Tick`](crate::SessionEvent::Tick) rather than detached
//! timers, so they are cancellable, reschedulable, and fully deterministic
//! under a seeded environment.
//!
//! The pending reply is keyed by its trigger message and re-evaluated against
//! current state when it fires: mute is checked at fire time, a block of the
//! responder cancels it, and a focus change moves it to the newly focused
//! conversation with a fresh randomized delay. The reply therefore always
//! lands in the chat that is active at delay completion, matching the
//! product's observed behavior.

use std::time::Duration;

use palaver_core::{Author, ChatId, Environment, Message, MessageId, Presence, Sound};

use crate::event::Effect;
use crate::session::Session;

/// Minimum simulated reply latency.
pub(crate) const REPLY_DELAY_FLOOR: Duration = Duration::from_millis(1500);

/// Random extra reply latency in `[0, this)` milliseconds.
pub(crate) const REPLY_DELAY_JITTER_MS: u64 = 1000;

/// How often the presence simulation perturbs the world.
pub(crate) const PRESENCE_SWEEP_INTERVAL: Duration = Duration::from_secs(5);

/// Each non-current user flips with probability 1-in-this per sweep.
const PRESENCE_FLIP_ODDS: u64 = 10;

/// A scheduled simulated reply.
///
/// At most one is pending: a newer send supersedes it, a focus change
/// retargets it, and logout or blocking the responder cancels it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingReply<I> {
    /// Conversation the reply will land in.
    pub(crate) chat: ChatId,
    /// Who appears to be typing and will author the reply.
    pub(crate) responder: Author,
    /// The message being replied to.
    pub(crate) trigger: MessageId,
    /// When the reply fires.
    pub(crate) due: I,
}

impl<E: Environment> Session<E> {
    fn reply_due(&self) -> E::Instant {
        let jitter = Duration::from_millis(self.env.random_below(REPLY_DELAY_JITTER_MS));
        self.env.now() + REPLY_DELAY_FLOOR + jitter
    }

    /// Schedule the simulated reply for a just-sent message.
    ///
    /// The responder is derived from the focused conversation: the peer of a
    /// direct chat, the bot for rooms. No reply is scheduled when no chat is
    /// focused, when the peer is blocked, or when the peer is unknown; every
    /// message author must be a registered user or the bot. The responder is
    /// marked typing immediately.
    pub(crate) fn schedule_reply(&mut self, trigger: MessageId) {
        self.cancel_pending_reply();

        let Some(active) = self.active_chat.as_ref() else {
            return;
        };
        let chat = active.chat;
        let responder = match chat {
            ChatId::Direct(peer) => {
                if self.blocked.contains(&peer) || !self.directory.contains_key(&peer) {
                    return;
                }
                Author::User(peer)
            },
            ChatId::Room(_) => Author::Bot,
        };

        self.typing.entry(chat).or_default().insert(responder);
        self.pending_reply =
            Some(PendingReply { chat, responder, trigger, due: self.reply_due() });
    }

    /// Move a pending reply to the newly focused conversation.
    ///
    /// The typing marker follows, and the delay restarts.
    pub(crate) fn retarget_pending_reply(&mut self) {
        let Some(pending) = self.pending_reply.take() else {
            return;
        };
        self.remove_typing(pending.chat, pending.responder);
        self.schedule_reply(pending.trigger);
    }

    /// Drop a pending reply and its typing marker.
    pub(crate) fn cancel_pending_reply(&mut self) {
        if let Some(pending) = self.pending_reply.take() {
            self.remove_typing(pending.chat, pending.responder);
        }
    }

    fn remove_typing(&mut self, chat: ChatId, who: Author) {
        if let Some(entry) = self.typing.get_mut(&chat) {
            entry.remove(&who);
            if entry.is_empty() {
                self.typing.remove(&chat);
            }
        }
    }

    /// Service due deadlines.
    pub(crate) fn on_tick(&mut self, now: E::Instant) -> Vec<Effect> {
        let mut effects = self.fire_due_reply(now);
        effects.extend(self.run_presence_sweeps(now));
        effects
    }

    fn fire_due_reply(&mut self, now: E::Instant) -> Vec<Effect> {
        if !self.pending_reply.as_ref().is_some_and(|pending| now >= pending.due) {
            return Vec::new();
        }
        let Some(pending) = self.pending_reply.take() else {
            return Vec::new();
        };
        self.remove_typing(pending.chat, pending.responder);

        let Some(sender_name) =
            self.current_user.and_then(|id| self.directory.get(&id)).map(|user| user.name.clone())
        else {
            return Vec::new();
        };

        let text = match self.messages.iter().find(|message| message.id == pending.trigger) {
            Some(trigger) if trigger.image_url.is_some() => {
                format!("Hey {sender_name}! I received your image. Looks great!")
            },
            Some(trigger) => {
                format!(
                    "Hey {sender_name}! I got your message: \"{}\". This is a simulated reply.",
                    trigger.text
                )
            },
            None => format!("Hey {sender_name}! This is a simulated reply."),
        };

        let id = self.next_message_id;
        self.next_message_id += 1;
        self.messages.push(Message {
            id,
            author: pending.responder,
            chat: pending.chat,
            text,
            image_url: None,
            sent_at_ms: self.env.unix_millis(),
            read: false,
        });
        tracing::debug!(%pending.chat, responder = %pending.responder, "simulated reply fired");

        let muted =
            pending.responder.user_id().is_some_and(|user| self.muted.contains(&user));
        let mut effects = Vec::new();
        if self.page_visible && !muted {
            effects.push(Effect::PlaySound(Sound::Message));
        }
        effects.push(Effect::Render);
        effects
    }

    fn run_presence_sweeps(&mut self, now: E::Instant) -> Vec<Effect> {
        let mut effects = Vec::new();
        let mut swept = false;
        while let Some(next) = self.next_presence_sweep
            && now >= next
        {
            self.presence_sweep(&mut effects);
            self.next_presence_sweep = Some(next + PRESENCE_SWEEP_INTERVAL);
            swept = true;
        }
        if swept {
            effects.push(Effect::Render);
        }
        effects
    }

    /// One perturbation pass over every non-current user.
    ///
    /// A transition into Online from Offline announces the buddy with the
    /// notification sound unless they are muted; the status itself always
    /// updates.
    fn presence_sweep(&mut self, effects: &mut Vec<Effect>) {
        let env = self.env.clone();
        let current = self.current_user;

        for (&id, user) in &mut self.directory {
            if Some(id) == current {
                continue;
            }
            if env.random_below(PRESENCE_FLIP_ODDS) != 0 {
                continue;
            }
            let next = match env.random_below(3) {
                0 => Presence::Online,
                1 => Presence::Busy,
                _ => Presence::Offline,
            };
            if next == Presence::Online
                && user.presence == Presence::Offline
                && !self.muted.contains(&id)
            {
                effects.push(Effect::PlaySound(Sound::Notification));
            }
            user.presence = next;
        }
    }
}
