use crate::ports::notification_service::{NotificationService as NotificationServiceTrait, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

/// Transient delivery failure simulated by the mock channel
#[derive(Debug, Error)]
#[error("Notification delivery failed (attempt {attempt})")]
pub struct DeliveryFailed {
    pub attempt: usize,
}

/// Mock implementation of NotificationService
///
/// Records delivered messages instead of sending them.
/// Can be scripted to fail the first N attempts, or every attempt.
#[derive(Default)]
pub struct NotificationService {
    delivered: Mutex<Vec<(String, String)>>,
    failures_remaining: AtomicU32,
    attempts: AtomicUsize,
}

impl NotificationService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the first `failures` attempts, then succeed
    pub fn failing_first(failures: u32) -> Self {
        Self {
            failures_remaining: AtomicU32::new(failures),
            ..Self::default()
        }
    }

    /// Fail every attempt
    pub fn always_failing() -> Self {
        Self::failing_first(u32::MAX)
    }

    /// Number of send attempts, successful or not
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Delivered `(user_id, message)` pairs in order
    pub fn delivered(&self) -> Vec<(String, String)> {
        self.delivered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl NotificationServiceTrait for NotificationService {
    async fn send_notification(&self, user_id: &str, message: &str) -> Result<()> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;

        let should_fail = self
            .failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |remaining| {
                remaining.checked_sub(1)
            })
            .is_ok();
        if should_fail {
            return Err(Box::new(DeliveryFailed { attempt }));
        }

        self.delivered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((user_id.to_string(), message.to_string()));
        Ok(())
    }
}
