//! Per-operator authoring sessions

use crate::authoring::machine::{transition, AuthoringEffect, AuthoringEvent, AuthoringState};
use crate::models::UserId;
use crate::services::logging::log_security_event;
use dashmap::DashMap;
use std::time::{Duration, Instant};

struct Session {
    state: AuthoringState,
    touched: Instant,
}

/// Authoring sessions keyed by operator identity. Only the designated operator may
/// drive a session; events from anyone else are dropped without a reply.
pub struct AuthoringSessions {
    operator: UserId,
    sessions: DashMap<UserId, Session>,
}

impl AuthoringSessions {
    pub fn new(operator: UserId) -> Self {
        Self {
            operator,
            sessions: DashMap::new(),
        }
    }

    pub fn operator(&self) -> UserId {
        self.operator
    }

    pub fn is_authorized(&self, actor: UserId) -> bool {
        actor == self.operator
    }

    /// Apply one event for `actor` and return the effects to execute, in order.
    pub fn handle(
        &self,
        actor: UserId,
        event: AuthoringEvent,
        registry_empty: bool,
    ) -> Vec<AuthoringEffect> {
        if !self.is_authorized(actor) {
            log_security_event(
                "authoring_event_rejected",
                Some(actor),
                "event from non-operator identity dropped",
            );
            return Vec::new();
        }

        let current = self
            .sessions
            .remove(&actor)
            .map(|(_, session)| session.state)
            .unwrap_or_default();
        let from = current.name();
        let next = transition(current, event, registry_empty);

        tracing::debug!(
            operator = %actor,
            from = from,
            to = next.state.name(),
            effects = next.effects.len(),
            "authoring transition"
        );

        if next.state != AuthoringState::Idle {
            self.sessions.insert(
                actor,
                Session {
                    state: next.state,
                    touched: Instant::now(),
                },
            );
        }
        next.effects
    }

    /// Current state for `actor` (Idle when no session exists).
    pub fn state(&self, actor: UserId) -> AuthoringState {
        self.sessions
            .get(&actor)
            .map(|s| s.state.clone())
            .unwrap_or_default()
    }

    /// Drop sessions untouched for longer than `max_idle`, discarding their drafts.
    pub fn expire_idle(&self, max_idle: Duration) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|actor, session| {
            let keep = session.touched.elapsed() <= max_idle;
            if !keep {
                tracing::info!(
                    operator = %actor,
                    state = session.state.name(),
                    "authoring session abandoned"
                );
            }
            keep
        });
        before - self.sessions.len()
    }
}
