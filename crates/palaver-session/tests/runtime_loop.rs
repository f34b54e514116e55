//! Runtime orchestration tests over the scripted driver.
//!
//! These exercise the full effect loop: commands become session mutations,
//! capture requests round-trip through the driver, and media streams are
//! provably released on every teardown path.

use std::time::Duration;

use palaver_core::{CallKind, CaptureError, ChatId, MessageDraft, Sound};
use palaver_harness::{SimDriver, SimEnv};
use palaver_session::{Runtime, SessionCommand, SessionEvent};

fn login_command() -> SessionCommand {
    SessionCommand::Login {
        name: "Alice".to_owned(),
        email: "a@x.com".to_owned(),
        gender: "Other".to_owned(),
    }
}

#[tokio::test]
async fn scripted_conversation_runs_to_completion() {
    let env = SimEnv::with_seed(21);
    let driver = SimDriver::new(env.clone())
        .command(login_command())
        .command(SessionCommand::SwitchChat { chat: ChatId::Direct(2) })
        .command(SessionCommand::SendMessage {
            draft: MessageDraft::text("hi"),
            chat: ChatId::Direct(2),
        })
        .wait(Duration::from_millis(2600))
        .command(SessionCommand::Logout);
    let handles = driver.handles();

    let outcome = Runtime::new(driver, env).run().await;
    assert!(outcome.is_ok());

    assert_eq!(handles.sounds(), vec![Sound::Notification, Sound::Message, Sound::Message]);
    let last = handles.last_render();
    assert_eq!(last.map(|r| r.message_count), Some(2));
    assert_eq!(last.map(|r| r.logged_in), Some(false));
    assert_eq!(handles.live_tracks(), 0);
}

#[tokio::test]
async fn call_lifecycle_acquires_and_releases_tracks() {
    let env = SimEnv::with_seed(9);
    let driver = SimDriver::new(env.clone());
    let handles = driver.handles();
    let mut runtime = Runtime::new(driver, env);

    runtime.dispatch(SessionEvent::Command(login_command())).await;
    runtime
        .dispatch(SessionEvent::Command(SessionCommand::StartCall {
            chat: ChatId::Direct(2),
            kind: CallKind::Video,
        }))
        .await;

    assert!(runtime.session().call().is_active());
    assert_eq!(handles.live_tracks(), 2);
    assert!(runtime.local_stream().is_some());

    runtime.dispatch(SessionEvent::Command(SessionCommand::EndCall)).await;

    assert!(runtime.session().call().is_idle());
    assert_eq!(handles.live_tracks(), 0);
    assert!(runtime.local_stream().is_none());
}

#[tokio::test]
async fn denied_capture_leaves_the_call_idle() {
    let env = SimEnv::with_seed(9);
    let driver = SimDriver::new(env.clone())
        .fail_next_capture(CaptureError::Denied { reason: "NotAllowedError".to_owned() });
    let handles = driver.handles();
    let mut runtime = Runtime::new(driver, env);

    runtime.dispatch(SessionEvent::Command(login_command())).await;
    runtime
        .dispatch(SessionEvent::Command(SessionCommand::StartCall {
            chat: ChatId::Direct(2),
            kind: CallKind::Voice,
        }))
        .await;

    assert!(runtime.session().call().is_idle());
    assert!(runtime.session().status_notice().is_some());
    assert_eq!(handles.live_tracks(), 0);
    assert!(runtime.local_stream().is_none());
}

#[tokio::test]
async fn logout_during_an_active_call_releases_the_stream() {
    let env = SimEnv::with_seed(9);
    let driver = SimDriver::new(env.clone());
    let handles = driver.handles();
    let mut runtime = Runtime::new(driver, env);

    runtime.dispatch(SessionEvent::Command(login_command())).await;
    runtime
        .dispatch(SessionEvent::Command(SessionCommand::StartCall {
            chat: ChatId::Direct(2),
            kind: CallKind::Voice,
        }))
        .await;
    assert_eq!(handles.live_tracks(), 1);

    runtime.dispatch(SessionEvent::Command(SessionCommand::Logout)).await;

    assert!(runtime.session().call().is_idle());
    assert!(runtime.session().current_user().is_none());
    assert_eq!(handles.live_tracks(), 0);
    assert!(runtime.local_stream().is_none());
}

#[tokio::test]
async fn second_call_attempt_does_not_disturb_the_first_stream() {
    let env = SimEnv::with_seed(9);
    let driver = SimDriver::new(env.clone());
    let handles = driver.handles();
    let mut runtime = Runtime::new(driver, env);

    runtime.dispatch(SessionEvent::Command(login_command())).await;
    runtime
        .dispatch(SessionEvent::Command(SessionCommand::StartCall {
            chat: ChatId::Direct(2),
            kind: CallKind::Voice,
        }))
        .await;
    runtime
        .dispatch(SessionEvent::Command(SessionCommand::StartCall {
            chat: ChatId::Direct(3),
            kind: CallKind::Video,
        }))
        .await;

    assert_eq!(runtime.session().call().chat(), Some(ChatId::Direct(2)));
    assert_eq!(handles.live_tracks(), 1);
    assert!(runtime.session().status_notice().is_some());
}
