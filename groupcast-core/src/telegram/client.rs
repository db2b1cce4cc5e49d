//! Telegram Bot API client: content sends, operator console, and getUpdates long poll.

use crate::authoring::{Notice, NoticeAction};
use crate::broadcast::DeliveryTransport;
use crate::error::DeliveryError;
use crate::models::{ChatId, LinkButton, MessageRef, TelegramSettings};
use crate::services::{InboundEvent, OperatorConsole, UpdateSource};
use crate::telegram::updates::{decode_update, Update};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

const DEFAULT_API_BASE: &str = "https://api.telegram.org";
const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30;

#[derive(Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    error_code: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct SentMessage {
    message_id: i64,
    chat: SentChat,
}

#[derive(Debug, Deserialize)]
struct SentChat {
    id: i64,
}

/// Bot API client. The token is only ever placed in request URLs, never logged.
pub struct TelegramBotApi {
    token: String,
    api_base: String,
    client: Arc<Client>,
    parse_mode: Option<String>,
    poll_timeout_secs: u64,
    /// Next offset for getUpdates (last_update_id + 1).
    next_offset: AtomicI64,
}

impl TelegramBotApi {
    pub fn new(token: String) -> Self {
        Self {
            token,
            api_base: DEFAULT_API_BASE.to_string(),
            client: Arc::new(Client::new()),
            parse_mode: None,
            poll_timeout_secs: DEFAULT_POLL_TIMEOUT_SECS,
            next_offset: AtomicI64::new(0),
        }
    }

    pub fn from_settings(token: String, settings: &TelegramSettings) -> Self {
        Self {
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            poll_timeout_secs: settings.poll_timeout_seconds,
            ..Self::new(token)
        }
    }

    /// Parse mode applied to broadcast text and captions (e.g. "HTML").
    pub fn with_parse_mode(mut self, parse_mode: Option<&str>) -> Self {
        self.parse_mode = parse_mode.map(str::to_string);
        self
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token, method)
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, body: &Value) -> Result<T, DeliveryError> {
        let res = self
            .client
            .post(self.method_url(method))
            .json(body)
            .send()
            .await
            .map_err(|e| DeliveryError::from(e.without_url()))?;
        let status = res.status();
        let text = res
            .text()
            .await
            .map_err(|e| DeliveryError::from(e.without_url()))?;
        decode_response(method, status, &text)
    }

    async fn send(&self, method: &str, body: Value) -> Result<MessageRef, DeliveryError> {
        let sent: SentMessage = self.call(method, &body).await?;
        Ok(MessageRef {
            chat_id: ChatId(sent.chat.id),
            message_id: sent.message_id,
        })
    }

    fn content_body(
        &self,
        chat: ChatId,
        field: &str,
        value: &str,
        caption: Option<&str>,
        buttons: Option<&[LinkButton]>,
    ) -> Value {
        let mut body = json!({ "chat_id": chat.0 });
        body[field] = json!(value);
        if let Some(caption) = caption {
            body["caption"] = json!(caption);
        }
        if let Some(mode) = &self.parse_mode {
            body["parse_mode"] = json!(mode);
        }
        if let Some(markup) = buttons.and_then(url_keyboard) {
            body["reply_markup"] = markup;
        }
        body
    }
}

/// Unwrap a Bot API envelope: `ok: false` becomes [`DeliveryError::Api`].
fn decode_response<T: DeserializeOwned>(
    method: &str,
    status: StatusCode,
    text: &str,
) -> Result<T, DeliveryError> {
    let parsed: ApiResponse<T> = serde_json::from_str(text).map_err(|e| {
        DeliveryError::Decode(format!("{} returned HTTP {}: {}", method, status, e))
    })?;
    if !parsed.ok {
        return Err(DeliveryError::Api {
            code: parsed.error_code,
            description: parsed
                .description
                .unwrap_or_else(|| format!("{} failed with HTTP {}", method, status)),
        });
    }
    parsed
        .result
        .ok_or_else(|| DeliveryError::Decode(format!("{} returned no result", method)))
}

/// One URL button per row; `None` for an empty list.
pub fn url_keyboard(buttons: &[LinkButton]) -> Option<Value> {
    if buttons.is_empty() {
        return None;
    }
    let rows: Vec<Value> = buttons
        .iter()
        .map(|b| json!([{ "text": b.label, "url": b.url }]))
        .collect();
    Some(json!({ "inline_keyboard": rows }))
}

/// One callback button per row; `None` for an empty list.
pub fn action_keyboard(actions: &[NoticeAction]) -> Option<Value> {
    if actions.is_empty() {
        return None;
    }
    let rows: Vec<Value> = actions
        .iter()
        .map(|a| json!([{ "text": a.label, "callback_data": a.data }]))
        .collect();
    Some(json!({ "inline_keyboard": rows }))
}

#[async_trait]
impl DeliveryTransport for TelegramBotApi {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn send_text(
        &self,
        chat: ChatId,
        text: &str,
        buttons: Option<&[LinkButton]>,
    ) -> Result<MessageRef, DeliveryError> {
        let body = self.content_body(chat, "text", text, None, buttons);
        self.send("sendMessage", body).await
    }

    async fn send_photo(
        &self,
        chat: ChatId,
        photo: &str,
        caption: Option<&str>,
        buttons: Option<&[LinkButton]>,
    ) -> Result<MessageRef, DeliveryError> {
        let body = self.content_body(chat, "photo", photo, caption, buttons);
        self.send("sendPhoto", body).await
    }

    async fn send_document(
        &self,
        chat: ChatId,
        document: &str,
        caption: Option<&str>,
        buttons: Option<&[LinkButton]>,
    ) -> Result<MessageRef, DeliveryError> {
        let body = self.content_body(chat, "document", document, caption, buttons);
        self.send("sendDocument", body).await
    }

    async fn send_video(
        &self,
        chat: ChatId,
        video: &str,
        caption: Option<&str>,
        buttons: Option<&[LinkButton]>,
    ) -> Result<MessageRef, DeliveryError> {
        let body = self.content_body(chat, "video", video, caption, buttons);
        self.send("sendVideo", body).await
    }

    async fn send_plain(&self, chat: ChatId, text: &str) -> Result<MessageRef, DeliveryError> {
        self.send("sendMessage", json!({ "chat_id": chat.0, "text": text }))
            .await
    }

    async fn edit_plain(&self, message: MessageRef, text: &str) -> Result<(), DeliveryError> {
        // editMessageText returns the edited message (or `true` for inline messages).
        let _: Value = self
            .call(
                "editMessageText",
                &json!({
                    "chat_id": message.chat_id.0,
                    "message_id": message.message_id,
                    "text": text,
                }),
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl OperatorConsole for TelegramBotApi {
    async fn notify(&self, chat: ChatId, notice: &Notice) -> Result<(), DeliveryError> {
        let mut body = json!({ "chat_id": chat.0, "text": notice.text() });
        if let Some(markup) = action_keyboard(notice.actions()) {
            body["reply_markup"] = markup;
        }
        self.send("sendMessage", body).await.map(|_| ())
    }

    async fn acknowledge(&self, query_id: &str) -> Result<(), DeliveryError> {
        let _: bool = self
            .call("answerCallbackQuery", &json!({ "callback_query_id": query_id }))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl UpdateSource for TelegramBotApi {
    async fn next_batch(&self) -> Result<Vec<InboundEvent>, DeliveryError> {
        let offset = self.next_offset.load(Ordering::Relaxed);
        let updates: Vec<Update> = self
            .call(
                "getUpdates",
                &json!({
                    "offset": offset,
                    "timeout": self.poll_timeout_secs,
                    "allowed_updates": ["message", "callback_query", "my_chat_member"],
                }),
            )
            .await?;

        let mut events = Vec::with_capacity(updates.len());
        for update in updates {
            self.next_offset
                .fetch_max(update.update_id + 1, Ordering::Relaxed);
            if let Some(event) = decode_update(update) {
                events.push(event);
            }
        }
        Ok(events)
    }
}
