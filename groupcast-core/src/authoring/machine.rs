//! Broadcast authoring state machine
//!
//! `transition` is a pure function from (state, event) to (state, effects). The draft
//! lives inside the waiting states, so returning to [`AuthoringState::Idle`] discards it.

use crate::authoring::buttons::{parse_button_lines, ButtonParseError};
use crate::authoring::notice::Notice;
use crate::models::{ContentKind, PendingBroadcast};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthoringState {
    #[default]
    Idle,
    AwaitingContent,
    AwaitingButtonChoice {
        draft: PendingBroadcast,
    },
    AwaitingButtonData {
        draft: PendingBroadcast,
    },
}

impl AuthoringState {
    pub fn name(&self) -> &'static str {
        match self {
            AuthoringState::Idle => "idle",
            AuthoringState::AwaitingContent => "awaiting_content",
            AuthoringState::AwaitingButtonChoice { .. } => "awaiting_button_choice",
            AuthoringState::AwaitingButtonData { .. } => "awaiting_button_data",
        }
    }

    pub fn draft(&self) -> Option<&PendingBroadcast> {
        match self {
            AuthoringState::AwaitingButtonChoice { draft }
            | AuthoringState::AwaitingButtonData { draft } => Some(draft),
            _ => None,
        }
    }
}

/// A message from the operator, already classified by the transport layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncomingContent {
    Text(String),
    Photo {
        file_id: String,
        caption: Option<String>,
    },
    Document {
        file_id: String,
        caption: Option<String>,
    },
    Video {
        file_id: String,
        caption: Option<String>,
    },
    /// Stickers, voice notes, locations, ...
    Unsupported,
}

impl IncomingContent {
    /// Capture the content as a new draft; `None` for unsupported kinds.
    pub fn into_draft(self) -> Option<PendingBroadcast> {
        let (kind, file_id, caption) = match self {
            IncomingContent::Text(text) => return Some(PendingBroadcast::text(text)),
            IncomingContent::Photo { file_id, caption } => (ContentKind::Photo, file_id, caption),
            IncomingContent::Document { file_id, caption } => {
                (ContentKind::Document, file_id, caption)
            }
            IncomingContent::Video { file_id, caption } => (ContentKind::Video, file_id, caption),
            IncomingContent::Unsupported => return None,
        };
        Some(PendingBroadcast::media(
            kind,
            file_id,
            caption.unwrap_or_default(),
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthoringEvent {
    /// Broadcast entry point (console action or `/broadcast`).
    BroadcastRequested,
    Message(IncomingContent),
    AddButtons,
    /// "Skip buttons" action or `/skip`.
    SkipButtons,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthoringEffect {
    Notify(Notice),
    /// Hand the finished draft to the broadcaster.
    Dispatch(PendingBroadcast),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: AuthoringState,
    pub effects: Vec<AuthoringEffect>,
}

impl Transition {
    fn to(state: AuthoringState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }

    fn notify(state: AuthoringState, notice: Notice) -> Self {
        Self {
            state,
            effects: vec![AuthoringEffect::Notify(notice)],
        }
    }

    fn dispatch(notice: Notice, draft: PendingBroadcast) -> Self {
        Self {
            state: AuthoringState::Idle,
            effects: vec![
                AuthoringEffect::Notify(notice),
                AuthoringEffect::Dispatch(draft),
            ],
        }
    }
}

pub fn transition(
    state: AuthoringState,
    event: AuthoringEvent,
    registry_empty: bool,
) -> Transition {
    use AuthoringEvent as E;
    use AuthoringState as S;

    match (state, event) {
        // Entry point, also re-entry from any waiting state.
        (_, E::BroadcastRequested) => {
            if registry_empty {
                Transition::notify(S::Idle, Notice::NoDestinations)
            } else {
                Transition::notify(S::AwaitingContent, Notice::AwaitingContent)
            }
        }

        (S::Idle, E::Cancel) => Transition::notify(S::Idle, Notice::NothingToCancel),
        (S::Idle, _) => Transition::to(S::Idle),

        (S::AwaitingContent, E::Message(content)) => match content.into_draft() {
            Some(draft) => {
                Transition::notify(S::AwaitingButtonChoice { draft }, Notice::ChooseButtons)
            }
            None => Transition::notify(S::AwaitingContent, Notice::UnsupportedContent),
        },
        (S::AwaitingContent, E::Cancel) => Transition::notify(S::Idle, Notice::Cancelled),
        (S::AwaitingContent, E::AddButtons | E::SkipButtons) => {
            Transition::to(S::AwaitingContent)
        }

        (S::AwaitingButtonChoice { draft }, E::AddButtons) => {
            Transition::notify(S::AwaitingButtonData { draft }, Notice::ButtonFormat)
        }
        (S::AwaitingButtonChoice { draft }, E::SkipButtons)
        | (S::AwaitingButtonData { draft }, E::SkipButtons) => {
            Transition::dispatch(Notice::SendingWithoutButtons, draft.without_buttons())
        }
        (S::AwaitingButtonChoice { draft }, E::Message(IncomingContent::Text(text)))
        | (S::AwaitingButtonData { draft }, E::Message(IncomingContent::Text(text))) => {
            apply_button_data(draft, &text)
        }
        (S::AwaitingButtonChoice { draft }, E::Message(_)) => {
            Transition::notify(S::AwaitingButtonChoice { draft }, Notice::ChooseButtons)
        }
        (S::AwaitingButtonData { draft }, E::Message(_) | E::AddButtons) => {
            Transition::notify(S::AwaitingButtonData { draft }, Notice::ButtonFormat)
        }
        (S::AwaitingButtonChoice { .. } | S::AwaitingButtonData { .. }, E::Cancel) => {
            Transition::notify(S::Idle, Notice::Cancelled)
        }
    }
}

fn apply_button_data(draft: PendingBroadcast, text: &str) -> Transition {
    match parse_button_lines(text) {
        Ok(buttons) => Transition::dispatch(
            Notice::ButtonsAccepted(buttons.clone()),
            draft.with_buttons(buttons),
        ),
        Err(ButtonParseError::InvalidUrl { url, .. }) => Transition::notify(
            AuthoringState::AwaitingButtonData { draft },
            Notice::InvalidButtonUrl { url },
        ),
        Err(ButtonParseError::NoButtons) => Transition::notify(
            AuthoringState::AwaitingButtonData { draft },
            Notice::NoValidButtons,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LinkButton;

    fn text_draft() -> PendingBroadcast {
        PendingBroadcast::text("hello groups")
    }

    fn notices(t: &Transition) -> Vec<&Notice> {
        t.effects
            .iter()
            .filter_map(|e| match e {
                AuthoringEffect::Notify(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    fn dispatched(t: &Transition) -> Option<&PendingBroadcast> {
        t.effects.iter().find_map(|e| match e {
            AuthoringEffect::Dispatch(d) => Some(d),
            _ => None,
        })
    }

    #[test]
    fn test_empty_registry_guard() {
        let t = transition(AuthoringState::Idle, AuthoringEvent::BroadcastRequested, true);
        assert_eq!(t.state, AuthoringState::Idle);
        assert_eq!(notices(&t), vec![&Notice::NoDestinations]);
    }

    #[test]
    fn test_entry_point_awaits_content() {
        let t = transition(AuthoringState::Idle, AuthoringEvent::BroadcastRequested, false);
        assert_eq!(t.state, AuthoringState::AwaitingContent);
    }

    #[test]
    fn test_reentry_discards_draft() {
        let state = AuthoringState::AwaitingButtonData { draft: text_draft() };
        let t = transition(state, AuthoringEvent::BroadcastRequested, false);
        assert_eq!(t.state, AuthoringState::AwaitingContent);
    }

    #[test]
    fn test_photo_content_becomes_draft() {
        let t = transition(
            AuthoringState::AwaitingContent,
            AuthoringEvent::Message(IncomingContent::Photo {
                file_id: "AgAD".into(),
                caption: Some("look".into()),
            }),
            false,
        );
        let draft = t.state.draft().unwrap();
        assert_eq!(draft.kind, ContentKind::Photo);
        assert_eq!(draft.payload, "AgAD");
        assert_eq!(draft.caption, "look");
        assert_eq!(notices(&t), vec![&Notice::ChooseButtons]);
    }

    #[test]
    fn test_media_without_caption_has_empty_caption() {
        let t = transition(
            AuthoringState::AwaitingContent,
            AuthoringEvent::Message(IncomingContent::Video {
                file_id: "BAAD".into(),
                caption: None,
            }),
            false,
        );
        assert_eq!(t.state.draft().unwrap().caption, "");
    }

    #[test]
    fn test_unsupported_content_reprompts() {
        let t = transition(
            AuthoringState::AwaitingContent,
            AuthoringEvent::Message(IncomingContent::Unsupported),
            false,
        );
        assert_eq!(t.state, AuthoringState::AwaitingContent);
        assert_eq!(notices(&t), vec![&Notice::UnsupportedContent]);
    }

    #[test]
    fn test_skip_choice_dispatches_without_buttons() {
        let state = AuthoringState::AwaitingButtonChoice { draft: text_draft() };
        let t = transition(state, AuthoringEvent::SkipButtons, false);
        assert_eq!(t.state, AuthoringState::Idle);
        assert_eq!(dispatched(&t), Some(&text_draft()));
    }

    #[test]
    fn test_valid_button_data_dispatches_with_buttons() {
        let state = AuthoringState::AwaitingButtonData { draft: text_draft() };
        let t = transition(
            state,
            AuthoringEvent::Message(IncomingContent::Text("Site - https://x.com".into())),
            false,
        );
        assert_eq!(t.state, AuthoringState::Idle);
        let draft = dispatched(&t).unwrap();
        assert_eq!(
            draft.buttons(),
            Some(&[LinkButton::new("Site", "https://x.com")][..])
        );
    }

    #[test]
    fn test_invalid_button_data_stays_waiting() {
        let state = AuthoringState::AwaitingButtonData { draft: text_draft() };
        let t = transition(
            state.clone(),
            AuthoringEvent::Message(IncomingContent::Text("Site - ftp://x.com".into())),
            false,
        );
        assert_eq!(t.state, state);
        assert!(dispatched(&t).is_none());
        assert_eq!(
            notices(&t),
            vec![&Notice::InvalidButtonUrl {
                url: "ftp://x.com".into()
            }]
        );

        let t = transition(
            state.clone(),
            AuthoringEvent::Message(IncomingContent::Text("no separator".into())),
            false,
        );
        assert_eq!(t.state, state);
        assert_eq!(notices(&t), vec![&Notice::NoValidButtons]);
    }

    #[test]
    fn test_text_during_choice_is_button_data() {
        let state = AuthoringState::AwaitingButtonChoice { draft: text_draft() };
        let t = transition(
            state,
            AuthoringEvent::Message(IncomingContent::Text("A - http://a.com".into())),
            false,
        );
        assert_eq!(t.state, AuthoringState::Idle);
        assert!(dispatched(&t).is_some());
    }

    #[test]
    fn test_cancel_discards_draft_everywhere() {
        for state in [
            AuthoringState::AwaitingContent,
            AuthoringState::AwaitingButtonChoice { draft: text_draft() },
            AuthoringState::AwaitingButtonData { draft: text_draft() },
        ] {
            let t = transition(state, AuthoringEvent::Cancel, false);
            assert_eq!(t.state, AuthoringState::Idle);
            assert_eq!(notices(&t), vec![&Notice::Cancelled]);
            assert!(dispatched(&t).is_none());
        }
    }

    #[test]
    fn test_idle_ignores_stray_events() {
        let t = transition(
            AuthoringState::Idle,
            AuthoringEvent::Message(IncomingContent::Text("hi".into())),
            false,
        );
        assert_eq!(t, Transition::to(AuthoringState::Idle));
    }
}
