//! Fixed-delay request pacing
//!
//! Every outbound request of a run goes through one `Throttle`. The first
//! request is sent immediately; each later one waits until at least
//! `min_delay` has passed since the previous request started.

use std::time::Duration;
use tokio::time::Instant;

/// Enforces a minimum gap between consecutive requests
#[derive(Debug)]
pub struct Throttle {
    min_delay: Duration,
    last_request: Option<Instant>,
}

impl Throttle {
    pub fn new(min_delay: Duration) -> Self {
        Self {
            min_delay,
            last_request: None,
        }
    }

    pub fn from_millis(delay_ms: u64) -> Self {
        Self::new(Duration::from_millis(delay_ms))
    }

    pub fn min_delay(&self) -> Duration {
        self.min_delay
    }

    /// Waits until the next request may be sent, then records it as sent
    pub async fn wait(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.min_delay {
                let pause = self.min_delay - elapsed;
                tracing::trace!("Throttling next request for {:?}", pause);
                tokio::time::sleep(pause).await;
            }
        }
        self.last_request = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_request_is_not_delayed() {
        let mut throttle = Throttle::from_millis(500);
        let start = Instant::now();
        throttle.wait().await;
        assert!(start.elapsed() < Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_second_request_waits_for_delay() {
        let mut throttle = Throttle::from_millis(60);
        let start = Instant::now();
        throttle.wait().await;
        throttle.wait().await;
        throttle.wait().await;
        assert!(start.elapsed() >= Duration::from_millis(120));
    }

    #[tokio::test]
    async fn test_zero_delay_never_sleeps() {
        let mut throttle = Throttle::new(Duration::ZERO);
        let start = Instant::now();
        for _ in 0..5 {
            throttle.wait().await;
        }
        assert!(start.elapsed() < Duration::from_millis(100));
        assert_eq!(throttle.min_delay(), Duration::ZERO);
    }
}
