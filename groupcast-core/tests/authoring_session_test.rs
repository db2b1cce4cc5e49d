//! Integration test: only the operator can move an authoring session.

use groupcast_core::authoring::{
    AuthoringEffect, AuthoringEvent, AuthoringSessions, AuthoringState, IncomingContent, Notice,
};
use groupcast_core::models::{LinkButton, UserId};
use std::time::Duration;

const OPERATOR: UserId = UserId(1001);
const STRANGER: UserId = UserId(2002);

fn text(s: &str) -> AuthoringEvent {
    AuthoringEvent::Message(IncomingContent::Text(s.to_string()))
}

fn every_event() -> Vec<AuthoringEvent> {
    vec![
        AuthoringEvent::BroadcastRequested,
        text("hello"),
        AuthoringEvent::Message(IncomingContent::Unsupported),
        AuthoringEvent::AddButtons,
        AuthoringEvent::SkipButtons,
        AuthoringEvent::Cancel,
    ]
}

/// Drive the operator's session into each reachable state.
fn sessions_in_every_state() -> Vec<AuthoringSessions> {
    let idle = AuthoringSessions::new(OPERATOR);

    let content = AuthoringSessions::new(OPERATOR);
    content.handle(OPERATOR, AuthoringEvent::BroadcastRequested, false);

    let choice = AuthoringSessions::new(OPERATOR);
    choice.handle(OPERATOR, AuthoringEvent::BroadcastRequested, false);
    choice.handle(OPERATOR, text("draft"), false);

    let data = AuthoringSessions::new(OPERATOR);
    data.handle(OPERATOR, AuthoringEvent::BroadcastRequested, false);
    data.handle(OPERATOR, text("draft"), false);
    data.handle(OPERATOR, AuthoringEvent::AddButtons, false);

    vec![idle, content, choice, data]
}

#[test]
fn test_foreign_identity_never_transitions() {
    for sessions in sessions_in_every_state() {
        let before = sessions.state(OPERATOR);
        for event in every_event() {
            let effects = sessions.handle(STRANGER, event, false);
            assert!(effects.is_empty());
            assert_eq!(sessions.state(OPERATOR), before);
            assert_eq!(sessions.state(STRANGER), AuthoringState::Idle);
        }
    }
}

#[test]
fn test_full_flow_with_buttons() {
    let sessions = AuthoringSessions::new(OPERATOR);

    sessions.handle(OPERATOR, AuthoringEvent::BroadcastRequested, false);
    sessions.handle(OPERATOR, text("Big news"), false);
    sessions.handle(OPERATOR, AuthoringEvent::AddButtons, false);
    let effects = sessions.handle(
        OPERATOR,
        text("Site - https://example.com\nnot a button\nDocs - http://docs.example.com"),
        false,
    );

    let buttons = vec![
        LinkButton::new("Site", "https://example.com"),
        LinkButton::new("Docs", "http://docs.example.com"),
    ];
    assert_eq!(effects.len(), 2);
    assert_eq!(
        effects[0],
        AuthoringEffect::Notify(Notice::ButtonsAccepted(buttons.clone()))
    );
    match &effects[1] {
        AuthoringEffect::Dispatch(draft) => {
            assert_eq!(draft.payload, "Big news");
            assert_eq!(draft.buttons(), Some(buttons.as_slice()));
        }
        other => panic!("expected dispatch, got {:?}", other),
    }
    assert_eq!(sessions.state(OPERATOR), AuthoringState::Idle);
}

#[test]
fn test_invalid_url_keeps_waiting_for_buttons() {
    let sessions = AuthoringSessions::new(OPERATOR);
    sessions.handle(OPERATOR, AuthoringEvent::BroadcastRequested, false);
    sessions.handle(OPERATOR, text("Big news"), false);
    sessions.handle(OPERATOR, AuthoringEvent::AddButtons, false);

    let effects = sessions.handle(OPERATOR, text("Bad - ftp://x"), false);
    assert_eq!(
        effects,
        vec![AuthoringEffect::Notify(Notice::InvalidButtonUrl {
            url: "ftp://x".into()
        })]
    );
    assert_eq!(sessions.state(OPERATOR).name(), "awaiting_button_data");
    assert_eq!(
        sessions.state(OPERATOR).draft().map(|d| d.payload.as_str()),
        Some("Big news")
    );
}

#[test]
fn test_empty_registry_refuses_to_start() {
    let sessions = AuthoringSessions::new(OPERATOR);
    let effects = sessions.handle(OPERATOR, AuthoringEvent::BroadcastRequested, true);
    assert_eq!(effects, vec![AuthoringEffect::Notify(Notice::NoDestinations)]);
    assert_eq!(sessions.state(OPERATOR), AuthoringState::Idle);
}

#[test]
fn test_idle_sessions_expire() {
    let sessions = AuthoringSessions::new(OPERATOR);
    sessions.handle(OPERATOR, AuthoringEvent::BroadcastRequested, false);

    assert_eq!(sessions.expire_idle(Duration::from_secs(3600)), 0);
    assert_eq!(sessions.state(OPERATOR), AuthoringState::AwaitingContent);

    std::thread::sleep(Duration::from_millis(5));
    assert_eq!(sessions.expire_idle(Duration::ZERO), 1);
    assert_eq!(sessions.state(OPERATOR), AuthoringState::Idle);
}
