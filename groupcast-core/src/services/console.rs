//! Operator console: notices and action acknowledgements

use crate::authoring::Notice;
use crate::error::DeliveryError;
use crate::models::ChatId;
use async_trait::async_trait;

/// Renders notices (with their inline actions) to the operator's chat.
#[async_trait]
pub trait OperatorConsole: Send + Sync {
    async fn notify(&self, chat: ChatId, notice: &Notice) -> Result<(), DeliveryError>;

    /// Acknowledge a pressed inline action so the client stops its spinner.
    async fn acknowledge(&self, query_id: &str) -> Result<(), DeliveryError>;
}
