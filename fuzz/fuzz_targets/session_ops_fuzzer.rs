//! Fuzz target for the session store.
//!
//! Drives the store with arbitrary interleavings of user operations, capture
//! outcomes, visibility flips, and clock advances.
//!
//! # Invariants
//!
//! - The active chat NEVER targets a blocked user
//! - Every message author is a registered user or the bot
//! - Room participant sets only contain registered users
//! - Typing markers exist only while a reply is scheduled
//! - A logged-out session holds no focus state or pending reply
//! - The message log is strictly append-only

use std::time::Duration;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use palaver_core::{CallKind, CaptureError, ChatId, Environment, MessageDraft, Presence};
use palaver_harness::{SimEnv, invariants};
use palaver_session::{ModalKind, Session, SessionCommand, SessionEvent};

#[derive(Debug, Clone, Arbitrary)]
struct Scenario {
    seed: u64,
    ops: Vec<FuzzOp>,
}

#[derive(Debug, Clone, Arbitrary)]
enum FuzzOp {
    Login { name_pick: u8 },
    Logout,
    SwitchRoom { room: u8 },
    SwitchDirect { user: u8 },
    SendText { text: String, to_room: bool, target: u8 },
    SendImage { target: u8 },
    ChangeStatus { pick: u8 },
    StartVoiceCall { target: u8 },
    StartVideoCall { target: u8 },
    EndCall,
    ToggleMute { user: u8 },
    ToggleBlock { user: u8 },
    OpenModal { subject: u8 },
    CloseModal,
    DismissNotice,
    CaptureGranted,
    CaptureDenied,
    Visibility { visible: bool },
    Advance { millis: u16 },
}

fn small_chat(to_room: bool, target: u8) -> ChatId {
    let id = u64::from(target % 10);
    if to_room { ChatId::Room(id) } else { ChatId::Direct(id) }
}

fuzz_target!(|scenario: Scenario| {
    let env = SimEnv::with_seed(scenario.seed);
    let mut session = Session::new(env.clone());
    let mut log_len = 0usize;

    for op in scenario.ops {
        match op {
            FuzzOp::Login { name_pick } => {
                let name = match name_pick % 3 {
                    0 => "Ada",
                    1 => "Grace",
                    _ => "Edsger",
                };
                let _ = session.apply(SessionCommand::Login {
                    name: name.to_owned(),
                    email: format!("{name}@x.com"),
                    gender: "Other".to_owned(),
                });
            },
            FuzzOp::Logout => {
                let _ = session.apply(SessionCommand::Logout);
            },
            FuzzOp::SwitchRoom { room } => {
                let _ = session
                    .apply(SessionCommand::SwitchChat { chat: ChatId::Room(u64::from(room % 10)) });
            },
            FuzzOp::SwitchDirect { user } => {
                let _ = session.apply(SessionCommand::SwitchChat {
                    chat: ChatId::Direct(u64::from(user % 10)),
                });
            },
            FuzzOp::SendText { text, to_room, target } => {
                let _ = session.apply(SessionCommand::SendMessage {
                    draft: MessageDraft::text(&text),
                    chat: small_chat(to_room, target),
                });
            },
            FuzzOp::SendImage { target } => {
                let _ = session.apply(SessionCommand::SendMessage {
                    draft: MessageDraft::image("", "https://example.com/img.png"),
                    chat: small_chat(false, target),
                });
            },
            FuzzOp::ChangeStatus { pick } => {
                let presence = match pick % 4 {
                    0 => Presence::Online,
                    1 => Presence::Busy,
                    2 => Presence::Invisible,
                    _ => Presence::Offline,
                };
                let _ = session.apply(SessionCommand::ChangeStatus { presence });
            },
            FuzzOp::StartVoiceCall { target } => {
                let _ = session.apply(SessionCommand::StartCall {
                    chat: small_chat(false, target),
                    kind: CallKind::Voice,
                });
            },
            FuzzOp::StartVideoCall { target } => {
                let _ = session.apply(SessionCommand::StartCall {
                    chat: small_chat(false, target),
                    kind: CallKind::Video,
                });
            },
            FuzzOp::EndCall => {
                let _ = session.apply(SessionCommand::EndCall);
            },
            FuzzOp::ToggleMute { user } => {
                let _ = session
                    .apply(SessionCommand::ToggleMuteUser { user: u64::from(user % 10) });
            },
            FuzzOp::ToggleBlock { user } => {
                let _ = session
                    .apply(SessionCommand::ToggleBlockUser { user: u64::from(user % 10) });
            },
            FuzzOp::OpenModal { subject } => {
                let _ = session.apply(SessionCommand::OpenModal {
                    kind: ModalKind::UserDetails,
                    subject: u64::from(subject % 10),
                });
            },
            FuzzOp::CloseModal => {
                let _ = session.apply(SessionCommand::CloseModal);
            },
            FuzzOp::DismissNotice => {
                let _ = session.apply(SessionCommand::DismissNotice);
            },
            FuzzOp::CaptureGranted => {
                let _ = session.handle(SessionEvent::CaptureGranted);
            },
            FuzzOp::CaptureDenied => {
                let _ = session.handle(SessionEvent::CaptureDenied {
                    error: CaptureError::NoDevice,
                });
            },
            FuzzOp::Visibility { visible } => {
                let _ = session.handle(SessionEvent::VisibilityChanged { visible });
            },
            FuzzOp::Advance { millis } => {
                env.advance(Duration::from_millis(u64::from(millis)));
                let _ = session.handle(SessionEvent::Tick { now: env.now() });
            },
        }

        assert!(session.messages().len() >= log_len, "message log shrank");
        log_len = session.messages().len();

        if let Err(violations) = invariants::check_all(&session) {
            panic!("invariant violations: {violations:?}");
        }
    }
});
