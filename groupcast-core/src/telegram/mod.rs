//! Telegram provider: Bot API client and update decoding

mod client;
pub mod updates;

pub use client::{action_keyboard, url_keyboard, TelegramBotApi};
