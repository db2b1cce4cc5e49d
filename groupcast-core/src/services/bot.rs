//! Bot service: routes inbound events to discovery, the console and authoring sessions

use crate::authoring::{
    AuthoringEffect, AuthoringEvent, AuthoringSessions, Notice, ACTION_ADD_BUTTONS,
    ACTION_BROADCAST, ACTION_SKIP_BUTTONS,
};
use crate::broadcast::Broadcaster;
use crate::models::{BroadcastReport, ChatId, UserId};
use crate::registry::DestinationRegistry;
use crate::services::console::OperatorConsole;
use crate::services::inbound::{BotCommand, InboundEvent, UpdateSource};
use crate::services::logging::{log_error, log_security_event};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Pause after a failed poll before polling again.
const POLL_ERROR_BACKOFF: Duration = Duration::from_secs(3);

pub const DEFAULT_SESSION_TIMEOUT: Duration = Duration::from_secs(30 * 60);

pub struct BotService {
    registry: Arc<DestinationRegistry>,
    sessions: AuthoringSessions,
    broadcaster: Broadcaster,
    console: Arc<dyn OperatorConsole>,
    session_timeout: Duration,
}

impl BotService {
    pub fn new(
        registry: Arc<DestinationRegistry>,
        broadcaster: Broadcaster,
        console: Arc<dyn OperatorConsole>,
        operator: UserId,
    ) -> Self {
        Self {
            registry,
            sessions: AuthoringSessions::new(operator),
            broadcaster,
            console,
            session_timeout: DEFAULT_SESSION_TIMEOUT,
        }
    }

    /// Authoring sessions idle longer than this are abandoned.
    pub fn with_session_timeout(mut self, timeout: Duration) -> Self {
        self.session_timeout = timeout;
        self
    }

    pub fn sessions(&self) -> &AuthoringSessions {
        &self.sessions
    }

    fn operator_chat(&self) -> ChatId {
        self.sessions.operator().private_chat()
    }

    /// Poll `source` and handle events one at a time until Ctrl-C.
    pub async fn run(&self, source: &dyn UpdateSource) -> anyhow::Result<()> {
        self.run_until(source, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log_error(&e.to_string(), Some("listening for shutdown signal"));
            }
        })
        .await
    }

    /// Like [`BotService::run`] but stops when `shutdown` completes. Shutdown is only
    /// observed between batches, never in the middle of a broadcast.
    pub async fn run_until<F>(&self, source: &dyn UpdateSource, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        tracing::info!(
            operator = %self.sessions.operator(),
            destinations = self.registry.len(),
            "bot service running"
        );

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("bot service stopping");
                    return Ok(());
                }
                batch = source.next_batch() => match batch {
                    Ok(events) => {
                        for event in events {
                            self.handle(event).await;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "polling for updates failed");
                        tokio::time::sleep(POLL_ERROR_BACKOFF).await;
                    }
                }
            }
            self.sessions.expire_idle(self.session_timeout);
        }
    }

    /// Handle one event. Returns the report when the event completed a broadcast.
    pub async fn handle(&self, event: InboundEvent) -> Option<BroadcastReport> {
        match event {
            InboundEvent::Discovered { chat } => {
                self.discover(chat).await;
                None
            }
            InboundEvent::Command { from, command, .. } => {
                if !self.authorize(from, "command") {
                    return None;
                }
                match command {
                    BotCommand::Start | BotCommand::Help => {
                        self.notify(Notice::Welcome {
                            tracked: self.registry.len(),
                        })
                        .await;
                        None
                    }
                    BotCommand::Broadcast => {
                        self.author(from, AuthoringEvent::BroadcastRequested).await
                    }
                    BotCommand::Cancel => self.author(from, AuthoringEvent::Cancel).await,
                    BotCommand::Skip => self.author(from, AuthoringEvent::SkipButtons).await,
                    BotCommand::Other(name) => {
                        tracing::debug!(command = %name, "ignoring unknown command");
                        None
                    }
                }
            }
            InboundEvent::Action {
                from,
                query_id,
                data,
            } => {
                if !self.authorize(from, "action") {
                    return None;
                }
                if let Err(e) = self.console.acknowledge(&query_id).await {
                    tracing::warn!(error = %e, "failed to acknowledge action");
                }
                let event = match data.as_str() {
                    ACTION_BROADCAST => AuthoringEvent::BroadcastRequested,
                    ACTION_ADD_BUTTONS => AuthoringEvent::AddButtons,
                    ACTION_SKIP_BUTTONS => AuthoringEvent::SkipButtons,
                    other => {
                        tracing::debug!(data = other, "ignoring unknown action");
                        return None;
                    }
                };
                self.author(from, event).await
            }
            InboundEvent::Message { from, content, .. } => {
                self.author(from, AuthoringEvent::Message(content)).await
            }
        }
    }

    fn authorize(&self, actor: UserId, kind: &str) -> bool {
        if self.sessions.is_authorized(actor) {
            return true;
        }
        log_security_event(
            &format!("unauthorized_{}", kind),
            Some(actor),
            "dropped without reply",
        );
        false
    }

    async fn discover(&self, chat: ChatId) {
        match self.registry.add(chat) {
            Ok(true) => {
                let total = self.registry.len();
                tracing::info!(destination = %chat, total, "new group added");
                self.notify(Notice::DestinationAdded {
                    destination: chat,
                    total,
                })
                .await;
            }
            Ok(false) => {}
            Err(e) => log_error(&e.to_string(), Some("persisting discovered group")),
        }
    }

    async fn author(&self, from: UserId, event: AuthoringEvent) -> Option<BroadcastReport> {
        let effects = self
            .sessions
            .handle(from, event, self.registry.is_empty());

        let mut report = None;
        for effect in effects {
            match effect {
                AuthoringEffect::Notify(notice) => self.notify(notice).await,
                AuthoringEffect::Dispatch(draft) => {
                    report = Some(self.broadcaster.broadcast(draft).await);
                }
            }
        }
        report
    }

    async fn notify(&self, notice: Notice) {
        if let Err(e) = self.console.notify(self.operator_chat(), &notice).await {
            tracing::warn!(error = %e, "failed to notify operator");
        }
    }
}
