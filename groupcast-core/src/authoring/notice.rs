//! Textual notices sent back to the operator

use crate::models::{ChatId, LinkButton};

/// Callback data carried by operator console actions.
pub const ACTION_BROADCAST: &str = "broadcast";
pub const ACTION_ADD_BUTTONS: &str = "add_buttons";
pub const ACTION_SKIP_BUTTONS: &str = "no_buttons";

/// An inline action offered alongside a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoticeAction {
    pub label: &'static str,
    pub data: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Welcome { tracked: usize },
    DestinationAdded { destination: ChatId, total: usize },
    NoDestinations,
    AwaitingContent,
    UnsupportedContent,
    ChooseButtons,
    ButtonFormat,
    InvalidButtonUrl { url: String },
    NoValidButtons,
    ButtonsAccepted(Vec<LinkButton>),
    SendingWithoutButtons,
    Cancelled,
    NothingToCancel,
}

const BUTTON_FORMAT_HELP: &str = "Button Text - https://example.com";

impl Notice {
    pub fn text(&self) -> String {
        match self {
            Notice::Welcome { tracked } => format!(
                "Welcome to Admin Panel!\nTracked groups: {}\nClick Broadcast to send a message to all groups.",
                tracked
            ),
            Notice::DestinationAdded { destination, total } => format!(
                "✅ Bot added to new group:\nID: {}\nTotal groups: {}",
                destination, total
            ),
            Notice::NoDestinations => {
                "❌ No groups tracked yet. Add the bot to some groups first.".to_string()
            }
            Notice::AwaitingContent => {
                "📢 Broadcast Mode:\nPlease send your message (text, photo, video, or document)\nSend /cancel to abort."
                    .to_string()
            }
            Notice::UnsupportedContent => {
                "❌ Unsupported media type. Please send text, photo, video, or document.".to_string()
            }
            Notice::ChooseButtons => {
                "Would you like to add inline URL buttons to your message?".to_string()
            }
            Notice::ButtonFormat => format!(
                "Please send button data in this format:\n\n{}\nAnother Button - https://another-example.com\n\nYou can add multiple buttons (one per line).\nSend /skip if you don't want to add any buttons.",
                BUTTON_FORMAT_HELP
            ),
            Notice::InvalidButtonUrl { url } => format!(
                "Invalid URL format: {}\nURLs must start with http:// or https://\nPlease send the buttons again or use /skip to skip buttons.",
                url
            ),
            Notice::NoValidButtons => format!(
                "No valid buttons found. Please use the format:\n\n{}\n\nOr send /skip to skip adding buttons.",
                BUTTON_FORMAT_HELP
            ),
            Notice::ButtonsAccepted(buttons) => {
                let mut text = String::from("✅ Buttons added:\n");
                for (i, button) in buttons.iter().enumerate() {
                    text.push_str(&format!("{}. {} - {}\n", i + 1, button.label, button.url));
                }
                text.push_str("\n📤 Sending broadcast...");
                text
            }
            Notice::SendingWithoutButtons => "📤 Sending broadcast without buttons...".to_string(),
            Notice::Cancelled => "❌ Broadcast cancelled.".to_string(),
            Notice::NothingToCancel => "Nothing to cancel.".to_string(),
        }
    }

    /// Inline actions rendered under the notice, one per row.
    pub fn actions(&self) -> &'static [NoticeAction] {
        const WELCOME: &[NoticeAction] = &[NoticeAction {
            label: "📢 Broadcast",
            data: ACTION_BROADCAST,
        }];
        const CHOOSE: &[NoticeAction] = &[
            NoticeAction {
                label: "✅ Add URL Buttons",
                data: ACTION_ADD_BUTTONS,
            },
            NoticeAction {
                label: "➡️ Skip Buttons",
                data: ACTION_SKIP_BUTTONS,
            },
        ];
        match self {
            Notice::Welcome { .. } => WELCOME,
            Notice::ChooseButtons => CHOOSE,
            _ => &[],
        }
    }
}
