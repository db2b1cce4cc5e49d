//! Broadcast payload and delivery report structures

use crate::models::ChatId;
use serde::{Deserialize, Serialize};

/// Maximum number of error samples kept in a [`BroadcastReport`].
pub const MAX_SAMPLE_ERRORS: usize = 5;

/// Kind of content carried by a broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Text,
    Photo,
    Document,
    Video,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Text => "text",
            ContentKind::Photo => "photo",
            ContentKind::Document => "document",
            ContentKind::Video => "video",
        }
    }
}

/// Inline URL button attached to a broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkButton {
    pub label: String,
    pub url: String,
}

impl LinkButton {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }
}

/// A broadcast being composed by the operator. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingBroadcast {
    pub kind: ContentKind,
    /// Raw text for [`ContentKind::Text`], otherwise a remote file id.
    pub payload: String,
    /// Empty for plain text messages.
    pub caption: String,
    /// `Some` only with at least one button.
    pub buttons: Option<Vec<LinkButton>>,
}

impl PendingBroadcast {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: ContentKind::Text,
            payload: text.into(),
            caption: String::new(),
            buttons: None,
        }
    }

    pub fn media(kind: ContentKind, file_id: impl Into<String>, caption: impl Into<String>) -> Self {
        Self {
            kind,
            payload: file_id.into(),
            caption: caption.into(),
            buttons: None,
        }
    }

    /// Attach buttons; an empty list is stored as absent.
    pub fn with_buttons(mut self, buttons: Vec<LinkButton>) -> Self {
        self.buttons = if buttons.is_empty() {
            None
        } else {
            Some(buttons)
        };
        self
    }

    pub fn without_buttons(mut self) -> Self {
        self.buttons = None;
        self
    }

    pub fn buttons(&self) -> Option<&[LinkButton]> {
        self.buttons.as_deref()
    }

    pub fn caption(&self) -> Option<&str> {
        if self.caption.is_empty() {
            None
        } else {
            Some(&self.caption)
        }
    }
}

/// Result of one delivery attempt to one destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryOutcome {
    pub destination: ChatId,
    pub succeeded: bool,
    pub error_message: Option<String>,
}

impl DeliveryOutcome {
    pub fn delivered(destination: ChatId) -> Self {
        Self {
            destination,
            succeeded: true,
            error_message: None,
        }
    }

    pub fn failed(destination: ChatId, error_message: impl Into<String>) -> Self {
        Self {
            destination,
            succeeded: false,
            error_message: Some(error_message.into()),
        }
    }
}

/// Incremental progress of a running broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastProgress {
    pub processed: usize,
    pub total: usize,
    pub success_count: usize,
    pub failure_count: usize,
}

impl BroadcastProgress {
    pub fn render(&self) -> String {
        format!(
            "📤 Sent to {}/{} groups...\n✅ {} successful, ❌ {} failed",
            self.processed, self.total, self.success_count, self.failure_count
        )
    }
}

/// Aggregate result of one broadcast run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BroadcastReport {
    pub total_targets: usize,
    pub success_count: usize,
    pub failure_count: usize,
    /// First [`MAX_SAMPLE_ERRORS`] failures, formatted `Group <id>: <error>`.
    pub sample_errors: Vec<String>,
    /// Failures beyond the sampled ones.
    pub overflow_errors: usize,
    /// Destinations dropped from the registry as permanently unreachable.
    pub removed: Vec<ChatId>,
}

impl BroadcastReport {
    pub fn new(total_targets: usize) -> Self {
        Self {
            total_targets,
            ..Self::default()
        }
    }

    /// Fold one outcome into the counters.
    pub fn record(&mut self, outcome: &DeliveryOutcome) {
        if outcome.succeeded {
            self.success_count += 1;
            return;
        }
        self.failure_count += 1;
        if self.sample_errors.len() < MAX_SAMPLE_ERRORS {
            self.sample_errors.push(format!(
                "Group {}: {}",
                outcome.destination,
                outcome.error_message.as_deref().unwrap_or("unknown error")
            ));
        } else {
            self.overflow_errors += 1;
        }
    }

    pub fn processed(&self) -> usize {
        self.success_count + self.failure_count
    }

    pub fn progress(&self) -> BroadcastProgress {
        BroadcastProgress {
            processed: self.processed(),
            total: self.total_targets,
            success_count: self.success_count,
            failure_count: self.failure_count,
        }
    }

    /// One-line completion summary used to finalize the progress message.
    pub fn render_summary(&self) -> String {
        format!(
            "✅ Broadcast completed!\n📊 Sent to {} groups, failed: {}",
            self.success_count, self.failure_count
        )
    }

    /// Detailed report sent to the operator after the run.
    pub fn render(&self) -> String {
        let mut text = format!(
            "📊 Broadcast Report:\n\n✅ Successfully sent: {}\n❌ Failed: {}\n📋 Total groups: {}",
            self.success_count, self.failure_count, self.total_targets
        );
        if !self.removed.is_empty() {
            text.push_str(&format!(
                "\n🧹 Removed unreachable groups: {}",
                self.removed.len()
            ));
        }
        if !self.sample_errors.is_empty() {
            text.push_str("\n\n❌ Errors:\n");
            text.push_str(&self.sample_errors.join("\n"));
            if self.overflow_errors > 0 {
                text.push_str(&format!("\n... and {} more errors", self.overflow_errors));
            }
        }
        text
    }
}
