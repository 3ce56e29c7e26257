//! Retry policy for the default transport.
//!
//! The dispatcher never retries. Retries happen inside [`ReqwestTransport`]
//! (or any custom transport), which sees each attempt's status and decides
//! whether to try again.
//!
//! [`ReqwestTransport`]: crate::ReqwestTransport

use std::time::Duration;

use rand::Rng;

use crate::error::is_retryable_status;

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the first attempt. Zero disables retrying.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Upper bound for any computed delay.
    pub max_delay: Duration,
    /// Backoff strategy to use.
    pub backoff: BackoffStrategy,
    /// Whether a `Retry-After` header overrides the computed delay.
    pub respect_retry_after: bool,
    /// Cap applied to `Retry-After` values.
    pub max_retry_after: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(20),
            backoff: BackoffStrategy::ExponentialWithJitter { factor: 2.0 },
            respect_retry_after: true,
            max_retry_after: Duration::from_secs(60),
        }
    }
}

impl RetryConfig {
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn with_backoff(mut self, backoff: BackoffStrategy) -> Self {
        self.backoff = backoff;
        self
    }

    /// Never retry.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }
}

/// How the delay grows between attempts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackoffStrategy {
    /// Same delay every time.
    Constant,
    /// `initial * factor^retry`.
    Exponential { factor: f64 },
    /// Exponential plus up to one extra base delay of random jitter.
    ExponentialWithJitter { factor: f64 },
}

impl BackoffStrategy {
    /// Delay before retry number `retry` (0-indexed), capped at `max_delay`.
    pub fn delay(&self, retry: u32, initial_delay: Duration, max_delay: Duration) -> Duration {
        let base = |factor: f64| initial_delay.as_secs_f64() * factor.powi(retry as i32);

        let secs = match self {
            BackoffStrategy::Constant => initial_delay.as_secs_f64(),
            BackoffStrategy::Exponential { factor } => base(*factor),
            BackoffStrategy::ExponentialWithJitter { factor } => {
                let base = base(*factor);
                base + rand::rng().random::<f64>() * base
            }
        };

        Duration::from_secs_f64(secs.min(max_delay.as_secs_f64()))
    }
}

/// What a transport should do after an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Hand the outcome back to the caller.
    Stop,
    /// Sleep, then send again.
    RetryAfter(Duration),
}

/// Tracks retries for one logical request.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
    retries: u32,
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self { config, retries: 0 }
    }

    /// Retries performed so far.
    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Decide after an attempt that produced a response with `status`.
    pub fn on_status(&mut self, status: u16, retry_after: Option<Duration>) -> RetryDecision {
        if is_retryable_status(status) {
            self.next(retry_after)
        } else {
            RetryDecision::Stop
        }
    }

    /// Decide after an attempt that failed before a response arrived.
    pub fn on_transport_error(&mut self, retryable: bool) -> RetryDecision {
        if retryable {
            self.next(None)
        } else {
            RetryDecision::Stop
        }
    }

    fn next(&mut self, retry_after: Option<Duration>) -> RetryDecision {
        if self.retries >= self.config.max_retries {
            return RetryDecision::Stop;
        }

        let delay = match retry_after {
            Some(hint) if self.config.respect_retry_after => hint.min(self.config.max_retry_after),
            _ => self.config.backoff.delay(
                self.retries,
                self.config.initial_delay,
                self.config.max_delay,
            ),
        };

        self.retries += 1;
        RetryDecision::RetryAfter(delay)
    }
}
