//! Circuit breaker for calls to external dependencies.
//!
//! Closed → Open after `failure_threshold` consecutive failures. While open,
//! calls are rejected without reaching the dependency until `reset_timeout`
//! has elapsed; the breaker then goes HalfOpen and lets calls through. A
//! success closes it again, a failure reopens it.

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Debug, Error)]
pub enum BreakerError<E> {
    #[error("circuit '{0}' is open")]
    Open(&'static str),

    #[error(transparent)]
    Inner(E),
}

struct BreakerState {
    state: CircuitState,
    failures: u32,
    opened_at: Option<Instant>,
}

pub struct CircuitBreaker {
    name: &'static str,
    failure_threshold: u32,
    reset_timeout: Duration,
    inner: Mutex<BreakerState>,
}

impl CircuitBreaker {
    pub fn new(name: &'static str, failure_threshold: u32, reset_timeout: Duration) -> Self {
        Self {
            name,
            failure_threshold: failure_threshold.max(1),
            reset_timeout,
            inner: Mutex::new(BreakerState {
                state: CircuitState::Closed,
                failures: 0,
                opened_at: None,
            }),
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> CircuitState {
        self.lock().state
    }

    /// Runs `call` under breaker protection.
    pub async fn call<T, E, F, Fut>(&self, call: F) -> Result<T, BreakerError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.admit()?;
        match call().await {
            Ok(value) => {
                self.on_success();
                Ok(value)
            }
            Err(err) => {
                self.on_failure();
                Err(BreakerError::Inner(err))
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BreakerState> {
        // Every critical section leaves the state valid, so poisoning is ignored.
        self.inner.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn admit<E>(&self) -> Result<(), BreakerError<E>> {
        let mut s = self.lock();
        if s.state != CircuitState::Open {
            return Ok(());
        }
        let elapsed = s.opened_at.map(|t| t.elapsed()).unwrap_or_default();
        if elapsed >= self.reset_timeout {
            s.state = CircuitState::HalfOpen;
            info!("Circuit breaker '{}': HALF_OPEN, testing dependency", self.name);
            Ok(())
        } else {
            Err(BreakerError::Open(self.name))
        }
    }

    fn on_success(&self) {
        let mut s = self.lock();
        s.failures = 0;
        if s.state != CircuitState::Closed {
            s.state = CircuitState::Closed;
            s.opened_at = None;
            info!("Circuit breaker '{}': CLOSED, dependency recovered", self.name);
        }
    }

    fn on_failure(&self) {
        let mut s = self.lock();
        s.failures = s.failures.saturating_add(1);
        if s.failures >= self.failure_threshold {
            if s.state != CircuitState::Open {
                error!(
                    "Circuit breaker '{}': OPEN after {} consecutive failures",
                    self.name, s.failures
                );
            }
            s.state = CircuitState::Open;
            s.opened_at = Some(Instant::now());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    async fn fail(breaker: &CircuitBreaker) -> Result<(), BreakerError<&'static str>> {
        breaker.call(|| async { Err::<(), _>("boom") }).await
    }

    async fn succeed(breaker: &CircuitBreaker) -> Result<u8, BreakerError<&'static str>> {
        breaker.call(|| async { Ok::<_, &'static str>(7) }).await
    }

    #[tokio::test]
    async fn test_opens_after_threshold() {
        let breaker = CircuitBreaker::new("test", 3, Duration::from_secs(60));
        for _ in 0..2 {
            assert!(matches!(fail(&breaker).await, Err(BreakerError::Inner("boom"))));
            assert_eq!(breaker.state(), CircuitState::Closed);
        }
        assert!(fail(&breaker).await.is_err());
        assert_eq!(breaker.state(), CircuitState::Open);
    }

    #[tokio::test]
    async fn test_open_rejects_without_calling() {
        let breaker = CircuitBreaker::new("test", 1, Duration::from_secs(60));
        let _ = fail(&breaker).await;

        let calls = AtomicU32::new(0);
        let result: Result<(), BreakerError<&str>> = breaker
            .call(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .await;
        assert!(matches!(result, Err(BreakerError::Open("test"))));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_success_resets_failure_count() {
        let breaker = CircuitBreaker::new("test", 2, Duration::from_secs(60));
        let _ = fail(&breaker).await;
        assert_eq!(succeed(&breaker).await.unwrap(), 7);
        let _ = fail(&breaker).await;
        assert_eq!(breaker.state(), CircuitState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_half_open_success_closes() {
        let breaker = CircuitBreaker::new("test", 1, Duration::from_secs(30));
        let _ = fail(&breaker).await;
        assert!(matches!(succeed(&breaker).await, Err(BreakerError::Open(_))));

        tokio::time::advance(Duration::from_secs(31)).await;
        assert_eq!(succeed(&breaker).await.unwrap(), 7);
        assert_eq!(breaker.state(), CircuitState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_half_open_failure_reopens() {
        let breaker = CircuitBreaker::new("test", 2, Duration::from_secs(30));
        let _ = fail(&breaker).await;
        let _ = fail(&breaker).await;
        assert_eq!(breaker.state(), CircuitState::Open);

        tokio::time::advance(Duration::from_secs(31)).await;
        assert!(matches!(fail(&breaker).await, Err(BreakerError::Inner(_))));
        assert_eq!(breaker.state(), CircuitState::Open);
        assert!(matches!(succeed(&breaker).await, Err(BreakerError::Open(_))));
    }
}
