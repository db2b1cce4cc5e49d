//! getUpdates payloads and their translation into inbound events

use crate::authoring::IncomingContent;
use crate::models::{ChatId, UserId};
use crate::services::inbound::{BotCommand, InboundEvent};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<TelegramMessage>,
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
    #[serde(default)]
    pub my_chat_member: Option<ChatMemberUpdated>,
}

#[derive(Debug, Deserialize)]
pub struct TelegramMessage {
    pub message_id: i64,
    #[serde(default)]
    pub from: Option<TelegramUser>,
    pub chat: TelegramChat,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub photo: Option<Vec<PhotoSize>>,
    #[serde(default)]
    pub document: Option<FileRef>,
    #[serde(default)]
    pub video: Option<FileRef>,
}

#[derive(Debug, Deserialize)]
pub struct TelegramUser {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct TelegramChat {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
}

impl TelegramChat {
    fn is_group(&self) -> bool {
        matches!(self.kind.as_str(), "group" | "supergroup")
    }
}

#[derive(Debug, Deserialize)]
pub struct PhotoSize {
    pub file_id: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

#[derive(Debug, Deserialize)]
pub struct FileRef {
    pub file_id: String,
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: TelegramUser,
    #[serde(default)]
    pub data: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatMemberUpdated {
    pub chat: TelegramChat,
    pub new_chat_member: ChatMember,
}

#[derive(Debug, Deserialize)]
pub struct ChatMember {
    pub status: String,
}

/// Translate one update into zero or one inbound event.
pub fn decode_update(update: Update) -> Option<InboundEvent> {
    if let Some(query) = update.callback_query {
        return Some(InboundEvent::Action {
            from: UserId(query.from.id),
            query_id: query.id,
            data: query.data.unwrap_or_default(),
        });
    }

    if let Some(member) = update.my_chat_member {
        let joined = matches!(
            member.new_chat_member.status.as_str(),
            "member" | "administrator"
        );
        if joined && (member.chat.is_group() || member.chat.kind == "channel") {
            return Some(InboundEvent::Discovered {
                chat: ChatId(member.chat.id),
            });
        }
        return None;
    }

    let message = update.message?;
    let chat = ChatId(message.chat.id);
    if message.chat.is_group() {
        return Some(InboundEvent::Discovered { chat });
    }
    if message.chat.kind != "private" {
        return None;
    }
    let from = UserId(message.from.as_ref()?.id);

    if let Some(command) = message.text.as_deref().and_then(BotCommand::parse) {
        return Some(InboundEvent::Command {
            from,
            chat,
            command,
        });
    }

    Some(InboundEvent::Message {
        from,
        chat,
        content: classify_content(message),
    })
}

/// Text, largest photo size, document, video; anything else is unsupported.
fn classify_content(message: TelegramMessage) -> IncomingContent {
    if let Some(text) = message.text {
        return IncomingContent::Text(text);
    }
    let caption = message.caption;
    if let Some(largest) = message.photo.and_then(|sizes| {
        sizes
            .into_iter()
            .max_by_key(|p| u64::from(p.width) * u64::from(p.height))
    }) {
        return IncomingContent::Photo {
            file_id: largest.file_id,
            caption,
        };
    }
    if let Some(document) = message.document {
        return IncomingContent::Document {
            file_id: document.file_id,
            caption,
        };
    }
    if let Some(video) = message.video {
        return IncomingContent::Video {
            file_id: video.file_id,
            caption,
        };
    }
    IncomingContent::Unsupported
}
