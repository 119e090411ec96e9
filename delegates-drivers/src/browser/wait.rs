use std::time::Duration;
use tokio::time::sleep;
use tracing::info;

/// Blind post-navigation wait for a client-side challenge to clear.
///
/// Nothing is polled: once the duration elapses the page is read as it is,
/// whether or not the challenge actually finished.
#[derive(Debug, Clone, Copy)]
pub struct ChallengeWait {
    duration: Duration,
}

impl ChallengeWait {
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub async fn settle(&self) {
        if self.duration.is_zero() {
            return;
        }
        info!(
            target: "browser.wait",
            wait_secs = self.duration.as_secs_f64(),
            "waiting for challenge page to clear"
        );
        sleep(self.duration).await;
    }
}
