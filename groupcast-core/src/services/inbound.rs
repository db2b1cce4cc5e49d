//! Inbound events from the messaging provider

use crate::authoring::IncomingContent;
use crate::error::DeliveryError;
use crate::models::{ChatId, UserId};
use async_trait::async_trait;

/// Slash commands understood by the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    Start,
    Help,
    Broadcast,
    Cancel,
    Skip,
    Other(String),
}

impl BotCommand {
    /// Parse `/name`, `/name@botname` or `/name args`. `None` for non-commands.
    pub fn parse(text: &str) -> Option<Self> {
        let word = text.split_whitespace().next()?;
        let name = word.strip_prefix('/')?;
        let name = name.split('@').next().unwrap_or(name).to_ascii_lowercase();
        if name.is_empty() {
            return None;
        }
        Some(match name.as_str() {
            "start" => BotCommand::Start,
            "help" => BotCommand::Help,
            "broadcast" => BotCommand::Broadcast,
            "cancel" => BotCommand::Cancel,
            "skip" => BotCommand::Skip,
            _ => BotCommand::Other(name),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// The bot was seen in, or added to, a group.
    Discovered { chat: ChatId },
    Command {
        from: UserId,
        chat: ChatId,
        command: BotCommand,
    },
    /// An inline action was pressed.
    Action {
        from: UserId,
        query_id: String,
        data: String,
    },
    /// A non-command message in a private chat.
    Message {
        from: UserId,
        chat: ChatId,
        content: IncomingContent,
    },
}

/// Source of inbound events (e.g. Telegram getUpdates long poll).
#[async_trait]
pub trait UpdateSource: Send + Sync {
    /// Wait for the next batch of events; an empty batch is a poll timeout.
    async fn next_batch(&self) -> Result<Vec<InboundEvent>, DeliveryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(BotCommand::parse("/start"), Some(BotCommand::Start));
        assert_eq!(
            BotCommand::parse("/Cancel@groupcast_bot"),
            Some(BotCommand::Cancel)
        );
        assert_eq!(BotCommand::parse("/skip now"), Some(BotCommand::Skip));
        assert_eq!(
            BotCommand::parse("/stats"),
            Some(BotCommand::Other("stats".into()))
        );
        assert_eq!(BotCommand::parse("hello /start"), None);
        assert_eq!(BotCommand::parse("/"), None);
        assert_eq!(BotCommand::parse(""), None);
    }
}
