//! Pauses between upstream calls.

use std::time::Duration;

use rand::Rng;
use tokio::time::sleep;

/// Jittered delay inserted between account fetches to stay under
/// upstream rate limits.
#[derive(Debug, Clone, Copy)]
pub struct Pacer {
    min: Duration,
    max: Duration,
}

impl Pacer {
    pub fn new(min: Duration, max: Duration) -> Self {
        if min > max {
            Self { min: max, max: min }
        } else {
            Self { min, max }
        }
    }

    /// A pacer that never waits.
    pub fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    pub fn next_delay(&self) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        let ms = rand::thread_rng().gen_range(self.min.as_millis()..=self.max.as_millis());
        Duration::from_millis(ms as u64)
    }

    pub async fn pause(&self) {
        let delay = self.next_delay();
        if !delay.is_zero() {
            tracing::debug!("Waiting {} ms before next request", delay.as_millis());
            sleep(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_within_bounds() {
        let pacer = Pacer::new(Duration::from_millis(1000), Duration::from_millis(3000));
        for _ in 0..100 {
            let delay = pacer.next_delay();
            assert!(delay >= Duration::from_millis(1000));
            assert!(delay <= Duration::from_millis(3000));
        }
    }

    #[test]
    fn test_swapped_bounds() {
        let pacer = Pacer::new(Duration::from_millis(50), Duration::from_millis(10));
        let delay = pacer.next_delay();
        assert!(delay >= Duration::from_millis(10) && delay <= Duration::from_millis(50));
    }

    #[test]
    fn test_none_is_zero() {
        assert_eq!(Pacer::none().next_delay(), Duration::ZERO);
        tokio_test::block_on(Pacer::none().pause());
    }
}
