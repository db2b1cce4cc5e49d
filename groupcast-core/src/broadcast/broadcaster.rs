//! Sequential fan-out of one payload to every tracked destination

use crate::broadcast::DeliveryTransport;
use crate::error::{DeliveryError, FailureClass};
use crate::models::{
    BroadcastReport, ChatId, ContentKind, DeliveryOutcome, MessageRef, PendingBroadcast,
};
use crate::registry::DestinationRegistry;
use crate::services::logging::log_delivery;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_PROGRESS_EVERY: usize = 5;

/// Delivers a finished broadcast to a snapshot of the registry, one destination at a
/// time. A failure on one destination never stops the run; permanently unreachable
/// destinations are removed from the registry as they are found.
pub struct Broadcaster {
    transport: Arc<dyn DeliveryTransport>,
    registry: Arc<DestinationRegistry>,
    operator_chat: ChatId,
    progress_every: usize,
    delivery_interval: Duration,
}

impl Broadcaster {
    pub fn new(
        transport: Arc<dyn DeliveryTransport>,
        registry: Arc<DestinationRegistry>,
        operator_chat: ChatId,
    ) -> Self {
        Self {
            transport,
            registry,
            operator_chat,
            progress_every: DEFAULT_PROGRESS_EVERY,
            delivery_interval: Duration::ZERO,
        }
    }

    pub fn with_progress_every(mut self, every: usize) -> Self {
        self.progress_every = every.max(1);
        self
    }

    /// Fixed pause between two deliveries.
    pub fn with_delivery_interval(mut self, interval: Duration) -> Self {
        self.delivery_interval = interval;
        self
    }

    pub fn registry(&self) -> &Arc<DestinationRegistry> {
        &self.registry
    }

    /// Run one broadcast. Consumes the payload; nothing is kept for resumption.
    pub async fn broadcast(&self, payload: PendingBroadcast) -> BroadcastReport {
        let targets = self.registry.snapshot();
        let mut report = BroadcastReport::new(targets.len());

        tracing::info!(
            provider = self.transport.name(),
            kind = payload.kind.as_str(),
            targets = targets.len(),
            buttons = payload.buttons().map_or(0, |b| b.len()),
            "broadcast started"
        );

        let progress = self
            .operator_message(&format!(
                "📤 Starting broadcast to {} groups...",
                targets.len()
            ))
            .await;

        for (index, destination) in targets.iter().copied().enumerate() {
            if index > 0 && !self.delivery_interval.is_zero() {
                tokio::time::sleep(self.delivery_interval).await;
            }

            let outcome = match self.deliver(destination, &payload).await {
                Ok(_) => DeliveryOutcome::delivered(destination),
                Err(e) => {
                    if e.classify() == FailureClass::Permanent {
                        self.heal(destination, &e, &mut report);
                    }
                    DeliveryOutcome::failed(destination, e.to_string())
                }
            };
            log_delivery(&outcome);
            report.record(&outcome);

            if report.processed() % self.progress_every == 0 {
                self.edit_progress(progress, &report.progress().render())
                    .await;
            }
        }

        self.edit_progress(progress, &report.render_summary()).await;
        self.operator_message(&report.render()).await;

        tracing::info!(
            succeeded = report.success_count,
            failed = report.failure_count,
            removed = report.removed.len(),
            "broadcast finished"
        );
        report
    }

    async fn deliver(
        &self,
        destination: ChatId,
        payload: &PendingBroadcast,
    ) -> Result<MessageRef, DeliveryError> {
        let buttons = payload.buttons();
        let caption = payload.caption();
        match payload.kind {
            ContentKind::Text => {
                self.transport
                    .send_text(destination, &payload.payload, buttons)
                    .await
            }
            ContentKind::Photo => {
                self.transport
                    .send_photo(destination, &payload.payload, caption, buttons)
                    .await
            }
            ContentKind::Document => {
                self.transport
                    .send_document(destination, &payload.payload, caption, buttons)
                    .await
            }
            ContentKind::Video => {
                self.transport
                    .send_video(destination, &payload.payload, caption, buttons)
                    .await
            }
        }
    }

    /// Drop a permanently unreachable destination from the registry.
    fn heal(&self, destination: ChatId, error: &DeliveryError, report: &mut BroadcastReport) {
        match self.registry.remove(destination) {
            Ok(true) => {
                tracing::info!(
                    destination = %destination,
                    error = %error,
                    "removed restricted group"
                );
                report.removed.push(destination);
            }
            Ok(false) => {}
            Err(e) => tracing::error!(
                destination = %destination,
                error = %e,
                "failed to persist registry after removing group"
            ),
        }
    }

    async fn operator_message(&self, text: &str) -> Option<MessageRef> {
        match self.transport.send_plain(self.operator_chat, text).await {
            Ok(message) => Some(message),
            Err(e) => {
                tracing::warn!(error = %e, "failed to send broadcast status to operator");
                None
            }
        }
    }

    async fn edit_progress(&self, progress: Option<MessageRef>, text: &str) {
        let Some(message) = progress else {
            return;
        };
        if let Err(e) = self.transport.edit_plain(message, text).await {
            tracing::warn!(error = %e, "failed to update broadcast progress");
        }
    }
}
