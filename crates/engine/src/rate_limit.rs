//! Request-rate accounting for the generation quota.
//!
//! Tracks a fixed-window per-minute counter and a process-lifetime daily
//! counter. The minute window resets when at least 60 seconds have passed
//! since the window started; the daily counter never resets. Exceeding
//! either threshold rejects the request without incrementing anything.
//!
//! The limiter carries no lock of its own: it is owned by the context
//! accumulator and only touched inside its critical section.

use chrono::Utc;
use querydeck_core::error::{Error, RateWindow};

/// Maximum requests within one minute window.
pub const REQUESTS_PER_MINUTE: u32 = 15;

/// Maximum requests within the process lifetime "day".
pub const REQUESTS_PER_DAY: u32 = 1_500;

const MINUTE_WINDOW_MS: i64 = 60_000;

/// Rolling request counters protecting the downstream generation quota.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    requests_this_minute: u32,
    requests_today: u32,
    window_start_ms: i64,
}

impl RateLimiter {
    /// Create a limiter whose minute window starts now.
    pub fn new() -> Self {
        Self::starting_at(Utc::now().timestamp_millis())
    }

    /// Create a limiter whose minute window starts at the given timestamp.
    pub fn starting_at(now_ms: i64) -> Self {
        Self {
            requests_this_minute: 0,
            requests_today: 0,
            window_start_ms: now_ms,
        }
    }

    /// Admit one request against the wall clock.
    pub fn check_and_increment(&mut self) -> Result<(), Error> {
        self.check_and_increment_at(Utc::now().timestamp_millis())
    }

    /// Admit one request at the given timestamp.
    ///
    /// On success both counters increment. On rejection neither does, and
    /// the error names the exhausted window.
    pub fn check_and_increment_at(&mut self, now_ms: i64) -> Result<(), Error> {
        // Fixed-window reset: a fresh minute clears the minute counter.
        if now_ms - self.window_start_ms >= MINUTE_WINDOW_MS {
            self.requests_this_minute = 0;
            self.window_start_ms = now_ms;
        }

        if self.requests_this_minute >= REQUESTS_PER_MINUTE {
            return Err(Error::RateLimitExceeded(RateWindow::PerMinute));
        }
        if self.requests_today >= REQUESTS_PER_DAY {
            return Err(Error::RateLimitExceeded(RateWindow::PerDay));
        }

        self.requests_this_minute += 1;
        self.requests_today += 1;
        Ok(())
    }

    /// Requests admitted in the current minute window.
    pub fn requests_this_minute(&self) -> u32 {
        self.requests_this_minute
    }

    /// Requests admitted since process start.
    pub fn requests_today(&self) -> u32 {
        self.requests_today
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use querydeck_core::error::RateWindow;

    #[test]
    fn fifteen_requests_pass_sixteenth_fails() {
        let mut limiter = RateLimiter::starting_at(0);
        for i in 0..15 {
            assert!(limiter.check_and_increment_at(i).is_ok(), "request {i} should pass");
        }
        let err = limiter.check_and_increment_at(15).unwrap_err();
        assert!(matches!(err, Error::RateLimitExceeded(RateWindow::PerMinute)));
    }

    #[test]
    fn rejection_does_not_increment() {
        let mut limiter = RateLimiter::starting_at(0);
        for i in 0..15 {
            limiter.check_and_increment_at(i).unwrap();
        }
        assert_eq!(limiter.requests_today(), 15);
        assert!(limiter.check_and_increment_at(16).is_err());
        assert!(limiter.check_and_increment_at(17).is_err());
        assert_eq!(limiter.requests_this_minute(), 15);
        assert_eq!(limiter.requests_today(), 15);
    }

    #[test]
    fn minute_window_resets_after_sixty_seconds() {
        let mut limiter = RateLimiter::starting_at(0);
        for i in 0..15 {
            limiter.check_and_increment_at(i).unwrap();
        }
        assert!(limiter.check_and_increment_at(59_999).is_err());

        // One window later the minute counter is fresh again.
        assert!(limiter.check_and_increment_at(60_000).is_ok());
        assert_eq!(limiter.requests_this_minute(), 1);
        assert_eq!(limiter.requests_today(), 16);
    }

    #[test]
    fn daily_quota_exhausts_and_never_resets() {
        let mut limiter = RateLimiter::starting_at(0);
        // Drain the daily quota across many minute windows.
        let mut admitted = 0u32;
        let mut now = 0i64;
        while admitted < REQUESTS_PER_DAY {
            for _ in 0..REQUESTS_PER_MINUTE {
                if admitted == REQUESTS_PER_DAY {
                    break;
                }
                limiter.check_and_increment_at(now).unwrap();
                admitted += 1;
            }
            now += MINUTE_WINDOW_MS;
        }

        // A fresh minute window does not help once the day is spent.
        let err = limiter.check_and_increment_at(now + MINUTE_WINDOW_MS).unwrap_err();
        assert!(matches!(err, Error::RateLimitExceeded(RateWindow::PerDay)));
        assert_eq!(limiter.requests_today(), REQUESTS_PER_DAY);
    }
}
