use std::time::SystemTime;

use tracing::{Level, event};
use uuid::Uuid;

use crate::errors::Error;

#[derive(Clone, Debug)]
pub enum RefreshOutcome {
    Success,
    Failed,
}

/// Structured events for one refresh attempt, tied together by `attempt_id`.
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

    pub fn emit_start(&self, at: SystemTime) {
        event!(
            Level::INFO,
            attempt_id = %self.attempt_id,
            context = %self.context,
            timestamp = ?at,
            "refresh.start"
        );
    }

    pub fn emit_enqueued(&self, request_id: Uuid, position: usize) {
        event!(
            Level::DEBUG,
            attempt_id = %self.attempt_id,
            context = %self.context,
            request_id = %request_id,
            position,
            "refresh.waiter.enqueued"
        );
    }

    pub fn emit_success(&self, outcome: RefreshOutcome, waiters: usize, at: SystemTime) {
        event!(
            Level::INFO,
            attempt_id = %self.attempt_id,
            context = %self.context,
            timestamp = ?at,
            outcome = ?outcome,
            waiters,
            "refresh.success"
        );
    }

    pub fn emit_failure(&self, error: &Error, waiters: usize, at: SystemTime) {
        event!(
            Level::ERROR,
            attempt_id = %self.attempt_id,
            context = %self.context,
            timestamp = ?at,
            outcome = ?RefreshOutcome::Failed,
            waiters,
            error = %error,
            "refresh.failure"
        );
    }

    pub fn emit_released(&self, request_id: Uuid, position: usize) {
        event!(
            Level::DEBUG,
            attempt_id = %self.attempt_id,
            context = %self.context,
            request_id = %request_id,
            position,
            "refresh.waiter.released"
        );
    }

    pub fn emit_release_dropped(&self, request_id: Uuid) {
        event!(
            Level::DEBUG,
            attempt_id = %self.attempt_id,
            context = %self.context,
            request_id = %request_id,
            "refresh.release.dropped"
        );
    }
}
