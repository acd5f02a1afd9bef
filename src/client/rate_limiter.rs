//! Rate limiting for API requests

use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// 레이트 리미터
///
/// 가중치 기반 leaky bucket. 요청 하나는 `cost * rate_limit_ms` 만큼의 간격을
/// 소비한다. `rate_limit_ms`가 0이면 대기하지 않는다.
pub struct RateLimiter {
    rate_limit_ms: u64,
    next_slot: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// 새로운 레이트 리미터 생성
    ///
    /// # Arguments
    /// * `rate_limit_ms` - 가중치 1 요청 사이의 최소 간격
    pub fn new(rate_limit_ms: u64) -> Self {
        Self {
            rate_limit_ms,
            next_slot: Mutex::new(None),
        }
    }

    pub fn rate_limit_ms(&self) -> u64 {
        self.rate_limit_ms
    }

    /// 가중치만큼 대기 후 슬롯 확보
    pub async fn throttle(&self, cost: f64) {
        if self.rate_limit_ms == 0 {
            return;
        }
        let interval = Duration::from_secs_f64(self.rate_limit_ms as f64 * cost.max(0.0) / 1000.0);

        let wait_until = {
            let mut next = self.next_slot.lock().await;
            let now = Instant::now();
            let start = match *next {
                Some(slot) if slot > now => slot,
                _ => now,
            };
            *next = Some(start + interval);
            start
        };

        let now = Instant::now();
        if wait_until > now {
            tokio::time::sleep(wait_until - now).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_limiter_does_not_wait() {
        let limiter = RateLimiter::new(0);
        let started = Instant::now();
        for _ in 0..100 {
            limiter.throttle(10.0).await;
        }
        assert!(started.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_weighted_requests_are_spaced() {
        let limiter = RateLimiter::new(20);
        let started = Instant::now();
        limiter.throttle(1.0).await;
        limiter.throttle(3.0).await;
        limiter.throttle(1.0).await;
        // 1 + 3 = 4 slots of 20ms before the third request
        assert!(started.elapsed() >= Duration::from_millis(75));
    }
}
