// Waiting for team replies
//
// Between sending requests and aggregating replies the workflow has to wait
// for humans to answer. No reply signal exists yet, so the shipped
// implementation waits a fixed duration.

use async_trait::async_trait;
use std::time::Duration;

use crate::domain::team::TeamMember;

/// Suspends the workflow until replies are expected to be available
#[async_trait]
pub trait ReplyWait: Send + Sync {
    async fn wait_for_replies(&self, members: &[TeamMember]);
}

/// Waits a fixed duration regardless of roster
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    pub const DEFAULT: Duration = Duration::from_millis(2000);

    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for FixedDelay {
    fn default() -> Self {
        Self::new(Self::DEFAULT)
    }
}

#[async_trait]
impl ReplyWait for FixedDelay {
    async fn wait_for_replies(&self, members: &[TeamMember]) {
        tracing::debug!(
            delay_ms = self.delay.as_millis() as u64,
            members = members.len(),
            "Waiting for team replies"
        );
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}
