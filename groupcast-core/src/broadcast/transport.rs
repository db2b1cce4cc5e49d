//! Remote send interface used by the broadcaster

use crate::error::DeliveryError;
use crate::models::{ChatId, LinkButton, MessageRef};
use async_trait::async_trait;

/// Outbound delivery to a messaging provider (e.g. Telegram).
///
/// Content sends apply the provider's rich-text parse mode; `send_plain`/`edit_plain`
/// are for operator-facing progress and reports and never do.
#[async_trait]
pub trait DeliveryTransport: Send + Sync {
    /// Provider name for logging (e.g. "telegram").
    fn name(&self) -> &str;

    async fn send_text(
        &self,
        chat: ChatId,
        text: &str,
        buttons: Option<&[LinkButton]>,
    ) -> Result<MessageRef, DeliveryError>;

    async fn send_photo(
        &self,
        chat: ChatId,
        photo: &str,
        caption: Option<&str>,
        buttons: Option<&[LinkButton]>,
    ) -> Result<MessageRef, DeliveryError>;

    async fn send_document(
        &self,
        chat: ChatId,
        document: &str,
        caption: Option<&str>,
        buttons: Option<&[LinkButton]>,
    ) -> Result<MessageRef, DeliveryError>;

    async fn send_video(
        &self,
        chat: ChatId,
        video: &str,
        caption: Option<&str>,
        buttons: Option<&[LinkButton]>,
    ) -> Result<MessageRef, DeliveryError>;

    async fn send_plain(&self, chat: ChatId, text: &str) -> Result<MessageRef, DeliveryError>;

    async fn edit_plain(&self, message: MessageRef, text: &str) -> Result<(), DeliveryError>;
}
