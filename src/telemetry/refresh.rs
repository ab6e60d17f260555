use tracing::{Level, event};
use uuid::Uuid;

use crate::errors::Error;

/// Correlates every log line of one token refresh, including callers that
/// join a refresh already in flight. Token values are never logged.
#[derive(Clone, Debug)]
pub struct RefreshTelemetry {
    attempt_id: Uuid,
    context: String,
}

impl RefreshTelemetry {
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            attempt_id: Uuid::new_v4(),
            context: context.into(),
        }
    }

    pub fn attempt_id(&self) -> Uuid {
        self.attempt_id
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn emit_start(&self) {
        event!(
            Level::INFO,
            attempt_id = %self.attempt_id,
            context = %self.context,
            "refresh.start"
        );
    }

    /// A concurrent caller subscribed to this flight instead of starting
    /// its own exchange.
    pub fn emit_joined(&self) {
        event!(
            Level::DEBUG,
            attempt_id = %self.attempt_id,
            context = %self.context,
            "refresh.joined"
        );
    }

    pub fn emit_success(&self, username: &str) {
        event!(
            Level::INFO,
            attempt_id = %self.attempt_id,
            context = %self.context,
            username = %username,
            "refresh.success"
        );
    }

    pub fn emit_failure(&self, error: &Error) {
        event!(
            Level::ERROR,
            attempt_id = %self.attempt_id,
            context = %self.context,
            error = %error,
            "refresh.failure"
        );
    }
}
