//! Structural invariants of the session store.
//!
//! These must hold after every operation, under any interleaving of
//! commands, ticks, and capture outcomes. The property suite and the fuzz
//! target run [`check_all`] after each step.

use palaver_core::Environment;
use palaver_session::Session;

/// The invariant classes [`check_all`] verifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantKind {
    /// The focused chat never targets a blocked user.
    ActiveChatNotBlocked,
    /// Every message author is a registered user or the bot.
    AuthorsRegistered,
    /// Every room participant is a registered user.
    ParticipantsRegistered,
    /// Typing markers exist only while a reply is scheduled, and only in
    /// one conversation at a time.
    TypingMatchesPendingReply,
    /// A logged-out session holds no per-user focus state.
    LoggedOutIsQuiescent,
}

/// A single invariant violation.
#[derive(Debug, Clone)]
pub struct Violation {
    /// Which invariant broke.
    pub invariant: InvariantKind,
    /// Human-readable context.
    pub detail: String,
}

/// Check every invariant against a session.
///
/// # Errors
///
/// Returns all violations found; an empty `Ok(())` means the state is
/// structurally sound.
pub fn check_all<E: Environment>(session: &Session<E>) -> Result<(), Vec<Violation>> {
    let mut violations = Vec::new();

    if let Some(active) = session.active_chat()
        && let Some(peer) = active.chat.direct_peer()
        && session.blocked().contains(&peer)
    {
        violations.push(Violation {
            invariant: InvariantKind::ActiveChatNotBlocked,
            detail: format!("active chat targets blocked user {peer}"),
        });
    }

    for message in session.messages() {
        if let Some(author) = message.author.user_id()
            && !session.users().contains_key(&author)
        {
            violations.push(Violation {
                invariant: InvariantKind::AuthorsRegistered,
                detail: format!("message {} has unknown author {author}", message.id),
            });
        }
    }

    for room in session.rooms().values() {
        for participant in &room.participants {
            if !session.users().contains_key(participant) {
                violations.push(Violation {
                    invariant: InvariantKind::ParticipantsRegistered,
                    detail: format!("room {} lists unknown user {participant}", room.id),
                });
            }
        }
    }

    let typing_chats = session.typing().len();
    if !session.has_pending_reply() && typing_chats > 0 {
        violations.push(Violation {
            invariant: InvariantKind::TypingMatchesPendingReply,
            detail: "typing markers present with no reply scheduled".to_owned(),
        });
    }
    if typing_chats > 1 {
        violations.push(Violation {
            invariant: InvariantKind::TypingMatchesPendingReply,
            detail: format!("{typing_chats} conversations have typing markers"),
        });
    }

    if session.current_user().is_none() {
        if session.active_chat().is_some() {
            violations.push(Violation {
                invariant: InvariantKind::LoggedOutIsQuiescent,
                detail: "active chat survives logout".to_owned(),
            });
        }
        if session.has_pending_reply() {
            violations.push(Violation {
                invariant: InvariantKind::LoggedOutIsQuiescent,
                detail: "pending reply survives logout".to_owned(),
            });
        }
    }

    if violations.is_empty() { Ok(()) } else { Err(violations) }
}
