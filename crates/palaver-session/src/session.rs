//! Session store state machine.
//!
//! [`Session`] owns every piece of domain state: the user directory, rooms,
//! the append-only message log, the focused chat, call phase, typing markers,
//! mute/block sets, and the modal slot. It is mutated exclusively through
//! the named operations below. Each operation returns the [`Effect`]s the
//! caller must execute.
//!
//! # Responsibilities
//!
//! - Session lifecycle (login, logout, status changes)
//! - Chat navigation with room auto-join and block enforcement
//! - Messaging and the scheduling of simulated replies
//! - The call state machine (`Idle -> Requesting -> Active -> Idle`)
//! - Mute/block bookkeeping and the modal slot
//!
//! Failure handling follows the store's taxonomy: invalid operations degrade
//! to silent no-ops, capture denials surface as a dismissible notice, and
//! nothing here can fail the process.

use std::collections::{BTreeMap, BTreeSet};

use palaver_core::{
    Author, CallKind, CallPhase, CaptureError, CaptureRequest, ChatId, Environment, Message,
    MessageDraft, MessageId, Presence, Room, RoomId, Sound, User, UserId,
};

use crate::event::{Effect, SessionCommand, SessionEvent};
use crate::seed;
use crate::simulate::PendingReply;
use crate::state::{ActiveChat, ModalKind, ModalState};

/// The session store.
///
/// Pure state machine: no I/O, no timers, no platform handles. Time and
/// randomness come from the injected environment, so a seeded environment
/// replays identically.
#[derive(Debug, Clone)]
pub struct Session<E: Environment> {
    /// Injected time and randomness.
    pub(crate) env: E,
    /// Every known user, seeded plus login-created. Ordered for
    /// deterministic presence sweeps.
    pub(crate) directory: BTreeMap<UserId, User>,
    /// Seeded room list.
    pub(crate) rooms: BTreeMap<RoomId, Room>,
    /// Append-only message log; insertion order is chronological order.
    pub(crate) messages: Vec<Message>,
    /// The logged-in identity. `None` pre-login.
    pub(crate) current_user: Option<UserId>,
    /// The focused conversation. `None` when no chat is open.
    pub(crate) active_chat: Option<ActiveChat>,
    /// Call lifecycle state.
    pub(crate) call: CallPhase,
    /// Who is "typing" in which conversation.
    pub(crate) typing: BTreeMap<ChatId, BTreeSet<Author>>,
    /// Users whose notification sounds are suppressed.
    pub(crate) muted: BTreeSet<UserId>,
    /// Users whose chats and messages are suppressed.
    pub(crate) blocked: BTreeSet<UserId>,
    /// The single open modal, if any.
    pub(crate) modal: Option<ModalState>,
    /// Transient user-facing notice (e.g. capture denial).
    pub(crate) status_notice: Option<String>,
    /// Whether the page is foreground-visible. Gates reply sounds.
    pub(crate) page_visible: bool,
    /// The cancellable scheduled reply, if one is pending.
    pub(crate) pending_reply: Option<PendingReply<E::Instant>>,
    /// Deadline of the next presence sweep while logged in.
    pub(crate) next_presence_sweep: Option<E::Instant>,
    /// Next id for login-created users.
    pub(crate) next_user_id: UserId,
    /// Next id for appended messages.
    pub(crate) next_message_id: MessageId,
}

impl<E: Environment> Session<E> {
    /// Create a session over the static seed world.
    pub fn new(env: E) -> Self {
        Self {
            env,
            directory: seed::directory(),
            rooms: seed::rooms(),
            messages: Vec::new(),
            current_user: None,
            active_chat: None,
            call: CallPhase::Idle,
            typing: BTreeMap::new(),
            muted: BTreeSet::new(),
            blocked: BTreeSet::new(),
            modal: None,
            status_notice: None,
            page_visible: true,
            pending_reply: None,
            next_presence_sweep: None,
            next_user_id: seed::FIRST_SESSION_USER_ID,
            next_message_id: 1,
        }
    }

    /// Process an event and return the effects to execute.
    pub fn handle(&mut self, event: SessionEvent<E::Instant>) -> Vec<Effect> {
        match event {
            SessionEvent::Command(command) => self.apply(command),
            SessionEvent::CaptureGranted => self.on_capture_granted(),
            SessionEvent::CaptureDenied { error } => self.on_capture_denied(&error),
            SessionEvent::VisibilityChanged { visible } => {
                self.page_visible = visible;
                Vec::new()
            },
            SessionEvent::Tick { now } => self.on_tick(now),
        }
    }

    /// Apply a named user operation.
    pub fn apply(&mut self, command: SessionCommand) -> Vec<Effect> {
        match command {
            SessionCommand::Login { name, email, gender } => self.login(&name, &email, &gender),
            SessionCommand::Logout => self.logout(),
            SessionCommand::SwitchChat { chat } => self.switch_chat(chat),
            SessionCommand::SendMessage { draft, chat } => self.send_message(draft, chat),
            SessionCommand::ChangeStatus { presence } => self.change_status(presence),
            SessionCommand::StartCall { chat, kind } => self.start_call(chat, kind),
            SessionCommand::EndCall => self.end_call(),
            SessionCommand::ToggleMuteUser { user } => self.toggle_mute_user(user),
            SessionCommand::ToggleBlockUser { user } => self.toggle_block_user(user),
            SessionCommand::OpenModal { kind, subject } => self.open_modal(kind, subject),
            SessionCommand::CloseModal => self.close_modal(),
            SessionCommand::DismissNotice => self.dismiss_notice(),
        }
    }

    /// Establish a session as a freshly created identity.
    ///
    /// Every login mints a new user; there is no account system, so two
    /// logins with the same email are independent identities. A login over an
    /// existing session replaces it; the previous identity stays registered.
    pub fn login(&mut self, name: &str, email: &str, gender: &str) -> Vec<Effect> {
        self.cancel_pending_reply();

        let id = self.next_user_id;
        self.next_user_id += 1;
        let user = User::new(id, name, email, gender)
            .with_presence(Presence::Online)
            .with_friends(seed::DEFAULT_FRIENDS);
        self.directory.insert(id, user);
        self.current_user = Some(id);
        self.next_presence_sweep = Some(self.env.now() + crate::simulate::PRESENCE_SWEEP_INTERVAL);

        tracing::info!(user = id, name, "logged in");
        vec![Effect::PlaySound(Sound::Notification), Effect::Render]
    }

    /// Tear the session down. No-op when already logged out.
    ///
    /// Terminates any call first, marks the departing identity offline in the
    /// shared directory, and removes it from every room.
    pub fn logout(&mut self) -> Vec<Effect> {
        let Some(me) = self.current_user else {
            return Vec::new();
        };

        let mut effects = self.end_call();

        if let Some(user) = self.directory.get_mut(&me) {
            user.presence = Presence::Offline;
        }
        for room in self.rooms.values_mut() {
            room.participants.remove(&me);
        }
        self.current_user = None;
        self.active_chat = None;
        self.cancel_pending_reply();
        self.typing.clear();
        self.next_presence_sweep = None;

        tracing::info!(user = me, "logged out");
        effects.push(Effect::Render);
        effects
    }

    /// Focus a room or direct conversation.
    ///
    /// Requires a session; blocked direct targets are silently refused.
    /// Entering a room the current user is not yet in auto-joins it; the
    /// join is idempotent. A pending simulated reply follows the focus to
    /// the new conversation.
    pub fn switch_chat(&mut self, chat: ChatId) -> Vec<Effect> {
        let Some(me) = self.current_user else {
            return Vec::new();
        };
        if let Some(peer) = chat.direct_peer()
            && self.blocked.contains(&peer)
        {
            return Vec::new();
        }

        let name = match chat {
            ChatId::Room(room_id) => {
                if let Some(room) = self.rooms.get_mut(&room_id) {
                    room.participants.insert(me);
                    room.name.clone()
                } else {
                    "Unknown Room".to_owned()
                }
            },
            ChatId::Direct(user_id) => self
                .directory
                .get(&user_id)
                .map_or_else(|| "Unknown User".to_owned(), |user| user.name.clone()),
        };

        self.active_chat = Some(ActiveChat { chat, name });
        self.retarget_pending_reply();
        vec![Effect::Render]
    }

    /// Append a message to a conversation.
    ///
    /// Rejects (silently) when logged out or when the draft has no content.
    /// Every accepted send plays the message sound and, while a chat is
    /// focused, schedules the simulated reply against it.
    pub fn send_message(&mut self, draft: MessageDraft, chat: ChatId) -> Vec<Effect> {
        let Some(me) = self.current_user else {
            return Vec::new();
        };
        if draft.is_empty() {
            return Vec::new();
        }

        let id = self.next_message_id;
        self.next_message_id += 1;
        self.messages.push(Message {
            id,
            author: Author::User(me),
            chat,
            text: draft.text,
            image_url: draft.image_url,
            sent_at_ms: self.env.unix_millis(),
            read: true,
        });
        self.schedule_reply(id);

        vec![Effect::PlaySound(Sound::Message), Effect::Render]
    }

    /// Change the current user's presence, including `Invisible`.
    pub fn change_status(&mut self, presence: Presence) -> Vec<Effect> {
        let Some(me) = self.current_user else {
            return Vec::new();
        };
        if let Some(user) = self.directory.get_mut(&me) {
            user.presence = presence;
        }
        vec![Effect::Render]
    }

    /// Begin a voice or video call against a conversation.
    ///
    /// Emits [`Effect::AcquireMedia`]; the call becomes active only once the
    /// driver reports the grant. While a call is requesting or active, a new
    /// start is refused with a status notice; there is no call-waiting.
    pub fn start_call(&mut self, chat: ChatId, kind: CallKind) -> Vec<Effect> {
        if self.current_user.is_none() {
            return Vec::new();
        }
        if !self.call.is_idle() {
            tracing::warn!(%chat, "call requested while another is in progress");
            self.status_notice = Some("A call is already in progress.".to_owned());
            return vec![Effect::Render];
        }

        self.call = CallPhase::Requesting { chat, kind };
        vec![Effect::AcquireMedia { request: CaptureRequest::for_call(kind) }, Effect::Render]
    }

    /// Hang up, releasing the capture stream. Safe when already idle.
    pub fn end_call(&mut self) -> Vec<Effect> {
        if self.call.is_idle() {
            return Vec::new();
        }
        self.call = CallPhase::Idle;
        vec![Effect::ReleaseMedia, Effect::Render]
    }

    fn on_capture_granted(&mut self) -> Vec<Effect> {
        match self.call {
            CallPhase::Requesting { chat, kind } => {
                self.call = CallPhase::Active { chat, kind };
                vec![Effect::Render]
            },
            // The call was torn down while the grant was in flight; the
            // stream must not outlive it.
            CallPhase::Idle | CallPhase::Active { .. } => {
                tracing::debug!("capture grant arrived with no call pending");
                vec![Effect::ReleaseMedia]
            },
        }
    }

    fn on_capture_denied(&mut self, error: &CaptureError) -> Vec<Effect> {
        tracing::warn!(%error, "call could not start");
        if matches!(self.call, CallPhase::Requesting { .. }) {
            self.call = CallPhase::Idle;
        }
        self.status_notice = Some(error.user_notice());
        vec![Effect::Render]
    }

    /// Flip notification muting for a user. Mute never hides messages.
    pub fn toggle_mute_user(&mut self, user: UserId) -> Vec<Effect> {
        if !self.muted.remove(&user) {
            self.muted.insert(user);
        }
        vec![Effect::Render]
    }

    /// Flip blocking for a user.
    ///
    /// Blocking the target of the focused chat force-closes it, and a pending
    /// reply from the blocked user is cancelled.
    pub fn toggle_block_user(&mut self, user: UserId) -> Vec<Effect> {
        let now_blocked = if self.blocked.remove(&user) {
            false
        } else {
            self.blocked.insert(user);
            true
        };

        if now_blocked {
            if self.active_chat.as_ref().is_some_and(|active| active.chat == ChatId::Direct(user))
            {
                self.active_chat = None;
            }
            if self.pending_reply.as_ref().is_some_and(|reply| reply.responder == Author::User(user))
            {
                self.cancel_pending_reply();
            }
        }
        vec![Effect::Render]
    }

    /// Open a detail modal about a user. Replaces any open modal.
    pub fn open_modal(&mut self, kind: ModalKind, subject: UserId) -> Vec<Effect> {
        self.modal = Some(ModalState { kind, subject });
        vec![Effect::Render]
    }

    /// Close the open modal, if any.
    pub fn close_modal(&mut self) -> Vec<Effect> {
        self.modal = None;
        vec![Effect::Render]
    }

    /// Dismiss the transient status notice, if any.
    pub fn dismiss_notice(&mut self) -> Vec<Effect> {
        self.status_notice = None;
        vec![Effect::Render]
    }
}

#[cfg(test)]
mod tests {
    use palaver_core::SystemEnv;

    use super::*;

    fn logged_in() -> (Session<SystemEnv>, UserId) {
        let mut session = Session::new(SystemEnv::new());
        let _ = session.login("Alice", "a@x.com", "Other");
        let me = session.current_user.unwrap_or_default();
        (session, me)
    }

    #[test]
    fn login_registers_a_fresh_identity() {
        let mut session = Session::new(SystemEnv::new());
        let effects = session.login("Alice", "a@x.com", "Other");

        assert!(effects.contains(&Effect::PlaySound(Sound::Notification)));
        let me = session.current_user;
        assert!(me.is_some());
        assert_eq!(
            session.current_user.and_then(|id| session.directory.get(&id)).map(|u| u.name.as_str()),
            Some("Alice")
        );
    }

    #[test]
    fn two_logins_are_independent_identities() {
        let mut session = Session::new(SystemEnv::new());
        let _ = session.login("Alice", "same@x.com", "Other");
        let first = session.current_user;
        let _ = session.login("Alice", "same@x.com", "Other");
        let second = session.current_user;

        assert_ne!(first, second);
    }

    #[test]
    fn logout_is_idempotent() {
        let mut session = Session::new(SystemEnv::new());
        assert!(session.logout().is_empty());

        let _ = session.login("Alice", "a@x.com", "Other");
        let _ = session.logout();
        assert!(session.logout().is_empty());
    }

    #[test]
    fn logout_removes_user_from_rooms_and_marks_offline() {
        let (mut session, me) = logged_in();
        let _ = session.switch_chat(ChatId::Room(1));
        assert!(session.rooms.get(&1).is_some_and(|r| r.participants.contains(&me)));

        let _ = session.logout();
        assert!(session.rooms.values().all(|r| !r.participants.contains(&me)));
        assert_eq!(session.directory.get(&me).map(|u| u.presence), Some(Presence::Offline));
        assert_eq!(session.active_chat, None);
        assert_eq!(session.current_user, None);
    }

    #[test]
    fn room_auto_join_is_idempotent() {
        let (mut session, _) = logged_in();
        let before = session.rooms.get(&2).map_or(0, |r| r.participants.len());

        let _ = session.switch_chat(ChatId::Room(2));
        let after_first = session.rooms.get(&2).map_or(0, |r| r.participants.len());
        assert_eq!(after_first, before + 1);

        let _ = session.switch_chat(ChatId::Room(2));
        let after_second = session.rooms.get(&2).map_or(0, |r| r.participants.len());
        assert_eq!(after_second, after_first);
    }

    #[test]
    fn switch_chat_resolves_placeholder_names() {
        let (mut session, _) = logged_in();

        let _ = session.switch_chat(ChatId::Room(999));
        assert_eq!(session.active_chat.as_ref().map(|a| a.name.as_str()), Some("Unknown Room"));

        let _ = session.switch_chat(ChatId::Direct(999));
        assert_eq!(session.active_chat.as_ref().map(|a| a.name.as_str()), Some("Unknown User"));
    }

    #[test]
    fn switching_to_blocked_user_is_refused() {
        let (mut session, _) = logged_in();
        let _ = session.toggle_block_user(2);

        assert!(session.switch_chat(ChatId::Direct(2)).is_empty());
        assert_eq!(session.active_chat, None);
    }

    #[test]
    fn empty_sends_are_rejected() {
        let (mut session, _) = logged_in();
        let _ = session.switch_chat(ChatId::Direct(2));

        assert!(session.send_message(MessageDraft::text(""), ChatId::Direct(2)).is_empty());
        assert!(session.send_message(MessageDraft::text("  \t "), ChatId::Direct(2)).is_empty());
        assert!(session.messages.is_empty());
        assert!(session.pending_reply.is_none());
    }

    #[test]
    fn send_requires_a_session() {
        let mut session = Session::new(SystemEnv::new());
        assert!(session.send_message(MessageDraft::text("hi"), ChatId::Direct(2)).is_empty());
        assert!(session.messages.is_empty());
    }

    #[test]
    fn accepted_send_appends_read_message_and_plays_sound() {
        let (mut session, me) = logged_in();
        let _ = session.switch_chat(ChatId::Direct(2));
        let effects = session.send_message(MessageDraft::text("hi"), ChatId::Direct(2));

        assert!(effects.contains(&Effect::PlaySound(Sound::Message)));
        assert_eq!(session.messages.len(), 1);
        assert_eq!(session.messages[0].author, Author::User(me));
        assert!(session.messages[0].read);
        assert!(session.typing.get(&ChatId::Direct(2)).is_some_and(|t| t.contains(&Author::User(2))));
    }

    #[test]
    fn blocking_active_chat_target_closes_it() {
        let (mut session, _) = logged_in();
        let _ = session.switch_chat(ChatId::Direct(2));
        assert!(session.active_chat.is_some());

        let _ = session.toggle_block_user(2);
        assert_eq!(session.active_chat, None);
        assert!(session.pending_reply.is_none());
    }

    #[test]
    fn blocking_a_non_active_user_keeps_the_chat_open() {
        let (mut session, _) = logged_in();
        let _ = session.switch_chat(ChatId::Direct(2));

        let _ = session.toggle_block_user(3);
        assert!(session.active_chat.is_some());
    }

    #[test]
    fn mute_toggle_flips_membership() {
        let (mut session, _) = logged_in();
        let _ = session.toggle_mute_user(2);
        assert!(session.muted.contains(&2));
        let _ = session.toggle_mute_user(2);
        assert!(!session.muted.contains(&2));
    }

    #[test]
    fn change_status_updates_the_directory() {
        let (mut session, me) = logged_in();
        let _ = session.change_status(Presence::Invisible);
        assert_eq!(session.directory.get(&me).map(|u| u.presence), Some(Presence::Invisible));
    }

    #[test]
    fn start_call_moves_to_requesting_and_asks_for_media() {
        let (mut session, _) = logged_in();
        let effects = session.start_call(ChatId::Direct(2), CallKind::Video);

        assert!(matches!(session.call, CallPhase::Requesting { .. }));
        assert!(effects.iter().any(|e| matches!(
            e,
            Effect::AcquireMedia { request } if request.video.is_some()
        )));
    }

    #[test]
    fn capture_grant_activates_the_call() {
        let (mut session, _) = logged_in();
        let _ = session.start_call(ChatId::Direct(2), CallKind::Voice);
        let _ = session.handle(SessionEvent::CaptureGranted);
        assert!(session.call.is_active());
    }

    #[test]
    fn capture_denial_returns_to_idle_with_a_notice() {
        let (mut session, _) = logged_in();
        let _ = session.start_call(ChatId::Direct(2), CallKind::Voice);
        let _ = session.handle(SessionEvent::CaptureDenied {
            error: CaptureError::Denied { reason: "NotAllowedError".to_owned() },
        });

        assert!(session.call.is_idle());
        assert!(session.status_notice.is_some());
    }

    #[test]
    fn second_call_is_refused_while_one_is_in_progress() {
        let (mut session, _) = logged_in();
        let _ = session.start_call(ChatId::Direct(2), CallKind::Voice);
        let effects = session.start_call(ChatId::Direct(3), CallKind::Voice);

        assert!(!effects.iter().any(|e| matches!(e, Effect::AcquireMedia { .. })));
        assert_eq!(session.call.chat(), Some(ChatId::Direct(2)));
        assert!(session.status_notice.is_some());
    }

    #[test]
    fn stale_grant_is_released() {
        let (mut session, _) = logged_in();
        let _ = session.start_call(ChatId::Direct(2), CallKind::Voice);
        let _ = session.end_call();
        let effects = session.handle(SessionEvent::CaptureGranted);

        assert!(effects.contains(&Effect::ReleaseMedia));
        assert!(session.call.is_idle());
    }

    #[test]
    fn end_call_is_safe_when_idle() {
        let (mut session, _) = logged_in();
        assert!(session.end_call().is_empty());
    }

    #[test]
    fn logout_terminates_an_active_call() {
        let (mut session, _) = logged_in();
        let _ = session.start_call(ChatId::Direct(2), CallKind::Voice);
        let _ = session.handle(SessionEvent::CaptureGranted);
        assert!(session.call.is_active());

        let effects = session.logout();
        assert!(effects.contains(&Effect::ReleaseMedia));
        assert!(session.call.is_idle());
    }

    #[test]
    fn modal_slot_holds_at_most_one() {
        let (mut session, _) = logged_in();
        let _ = session.open_modal(ModalKind::UserDetails, 2);
        let _ = session.open_modal(ModalKind::ProfilePhoto, 3);
        assert_eq!(
            session.modal,
            Some(ModalState { kind: ModalKind::ProfilePhoto, subject: 3 })
        );

        let _ = session.close_modal();
        assert_eq!(session.modal, None);
    }

    #[test]
    fn notice_is_dismissible() {
        let (mut session, _) = logged_in();
        let _ = session.start_call(ChatId::Direct(2), CallKind::Voice);
        let _ = session.handle(SessionEvent::CaptureDenied { error: CaptureError::NoDevice });
        assert!(session.status_notice.is_some());

        let _ = session.dismiss_notice();
        assert_eq!(session.status_notice, None);
    }
}
