//! Bulk group creation with per-helper add-and-promote setup

use crate::models::{ChatId, ProvisioningSettings};
use crate::provision::api::{AdminApi, AdminRights, ProvisionedChat};
use crate::retry::{retry_until_success, RetryPolicy};
use std::sync::Arc;
use std::time::Duration;

/// Current "<Month> <Year>", e.g. "August 2025".
pub fn current_title_stem() -> String {
    chrono::Local::now().format("%B %Y").to_string()
}

/// Everything one provisioning run needs.
#[derive(Debug, Clone)]
pub struct ProvisionPlan {
    pub group_count: u32,
    pub title_stem: String,
    pub about: String,
    pub helpers: Vec<String>,
    pub rank: String,
    pub helper_interval: Duration,
    pub group_interval: Duration,
    /// Pause between inviting a helper and promoting it.
    pub settle: Duration,
    pub retry: RetryPolicy,
}

impl ProvisionPlan {
    pub fn from_settings(settings: &ProvisioningSettings) -> Self {
        let mut retry = RetryPolicy::unbounded(Duration::from_secs(settings.retry_interval_seconds));
        retry.max_attempts = settings.max_attempts;
        if let Some(ms) = settings.jitter_ms {
            retry = retry.with_jitter(Duration::from_millis(ms));
        }
        Self {
            group_count: settings.group_count,
            title_stem: settings
                .title_stem
                .clone()
                .unwrap_or_else(current_title_stem),
            about: settings.about.clone(),
            helpers: settings.helpers.clone(),
            rank: settings.admin_rank.clone(),
            helper_interval: Duration::from_secs(settings.helper_interval_seconds),
            group_interval: Duration::from_secs(settings.group_interval_seconds),
            settle: Duration::from_secs(settings.settle_seconds),
            retry,
        }
    }

    /// Title of the group at zero-based `index`.
    pub fn title(&self, index: u32) -> String {
        format!("{} Group {}", self.title_stem, index + 1)
    }
}

/// Result of setting up one helper in one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelperSetup {
    pub chat: ChatId,
    pub helper: String,
    pub attempts: u32,
    /// `false` only when a retry cap was configured and exhausted.
    pub promoted: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ProvisionSummary {
    pub created: Vec<ProvisionedChat>,
    /// Zero-based indices whose creation failed.
    pub failed_indices: Vec<u32>,
    pub helpers: Vec<HelperSetup>,
}

impl ProvisionSummary {
    pub fn exhausted(&self) -> impl Iterator<Item = &HelperSetup> {
        self.helpers.iter().filter(|h| !h.promoted)
    }
}

pub struct ProvisioningLoop {
    api: Arc<dyn AdminApi>,
    plan: ProvisionPlan,
}

impl ProvisioningLoop {
    pub fn new(api: Arc<dyn AdminApi>, plan: ProvisionPlan) -> Self {
        Self { api, plan }
    }

    /// Create `group_count` groups, set up every helper in each, then disconnect.
    pub async fn run(&self) -> ProvisionSummary {
        let mut summary = ProvisionSummary::default();

        for index in 0..self.plan.group_count {
            let title = self.plan.title(index);
            match self
                .api
                .create_destination(&title, &self.plan.about, true)
                .await
            {
                Ok(chat) => {
                    tracing::info!(title = %title, chat = %chat.id, "created private group");
                    for helper in &self.plan.helpers {
                        let setup = self.add_and_promote(&chat, helper).await;
                        summary.helpers.push(setup);
                        tokio::time::sleep(self.plan.helper_interval).await;
                    }
                    summary.created.push(chat);
                }
                Err(e) => {
                    tracing::error!(title = %title, error = %e, "error creating group");
                    summary.failed_indices.push(index);
                }
            }
            tokio::time::sleep(self.plan.group_interval).await;
        }

        if let Err(e) = self.api.disconnect().await {
            tracing::warn!(error = %e, "admin session did not disconnect cleanly");
        }
        tracing::info!(
            created = summary.created.len(),
            failed = summary.failed_indices.len(),
            "finished creating groups"
        );
        summary
    }

    /// Invite then promote `helper`, retrying the pair per the plan's policy.
    async fn add_and_promote(&self, chat: &ProvisionedChat, helper: &str) -> HelperSetup {
        let rights = AdminRights::full();
        let api = &self.api;
        let plan = &self.plan;

        let outcome = retry_until_success(&plan.retry, "add_and_promote", |attempt| async move {
            tracing::debug!(chat = %chat.id, helper = helper, attempt, "adding helper");
            api.invite_member(chat, helper).await?;
            tokio::time::sleep(plan.settle).await;
            api.set_admin_rights(chat, helper, &rights, &plan.rank)
                .await?;
            Ok::<(), crate::error::AdminError>(())
        })
        .await;

        let promoted = outcome.result.is_ok();
        if promoted {
            tracing::info!(chat = %chat.id, helper = helper, "added and made admin");
        }
        HelperSetup {
            chat: chat.id,
            helper: helper.to_string(),
            attempts: outcome.attempts,
            promoted,
        }
    }
}
