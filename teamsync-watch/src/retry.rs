//! Bounded retry loop.
//!
//! An explicit loop with an attempt count and a fixed delay — never
//! recursion, so stack depth stays constant and the loop can be cut short by
//! plain process termination.

use std::fmt;
use std::time::Duration;

/// Run `op` up to `attempts` times, sleeping `delay` between failures.
/// Returns the first success or the last error.
pub fn with_retry<T, E, F>(attempts: u32, delay: Duration, mut op: F) -> Result<T, E>
where
    E: fmt::Display,
    F: FnMut() -> Result<T, E>,
{
    let attempts = attempts.max(1);
    let mut attempt = 1;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(e) if attempt < attempts => {
                tracing::warn!("attempt {attempt}/{attempts} failed: {e}; retrying in {delay:?}");
                std::thread::sleep(delay);
                attempt += 1;
            }
            Err(e) => {
                tracing::error!("attempt {attempt}/{attempts} failed: {e}; giving up");
                return Err(e);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_success_returns_immediately() {
        let mut calls = 0;
        let result: Result<u32, String> = with_retry(3, Duration::ZERO, || {
            calls += 1;
            Ok(7)
        });
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls, 1);
    }

    #[test]
    fn recovers_after_transient_failures() {
        let mut calls = 0;
        let result: Result<u32, String> = with_retry(3, Duration::ZERO, || {
            calls += 1;
            if calls < 3 {
                Err("transient".to_string())
            } else {
                Ok(42)
            }
        });
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls, 3);
    }

    #[test]
    fn gives_up_after_the_attempt_budget() {
        let mut calls = 0;
        let result: Result<u32, String> = with_retry(4, Duration::ZERO, || {
            calls += 1;
            Err(format!("failure {calls}"))
        });
        assert_eq!(result.unwrap_err(), "failure 4");
        assert_eq!(calls, 4);
    }

    #[test]
    fn zero_attempts_still_runs_once() {
        let mut calls = 0;
        let result: Result<(), String> = with_retry(0, Duration::ZERO, || {
            calls += 1;
            Err("nope".to_string())
        });
        assert!(result.is_err());
        assert_eq!(calls, 1);
    }
}
