//! Operator-driven broadcast authoring: button parsing, state machine, sessions

pub mod buttons;
pub mod machine;
pub mod notice;
pub mod session;

pub use buttons::{parse_button_lines, ButtonParseError};
pub use machine::{
    transition, AuthoringEffect, AuthoringEvent, AuthoringState, IncomingContent, Transition,
};
pub use notice::{Notice, NoticeAction, ACTION_ADD_BUTTONS, ACTION_BROADCAST, ACTION_SKIP_BUTTONS};
pub use session::AuthoringSessions;
