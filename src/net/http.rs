//! Small HTTP helper: bounded retries with growing backoff.

use std::error::Error;
use std::thread;
use std::time::Duration;

/// Retries after the first attempt fails.
pub const DEFAULT_RETRIES: u32 = 2;

/// Base backoff; attempt `n` sleeps `n * BACKOFF_MS` before retrying.
pub const BACKOFF_MS: u64 = 500;

/// Per-request timeout.
pub const TIMEOUT_MS: u64 = 5_000;

/// GET `url`, retrying transient failures. Non-2xx statuses count as
/// failures too (ureq reports them as `Error::Status`).
pub fn fetch_with_retry(url: &str) -> Result<ureq::Response, Box<dyn Error>> {
    request_with_retry(|| {
        ureq::get(url)
            .timeout(Duration::from_millis(TIMEOUT_MS))
            .set("User-Agent", "serpent")
            .call()
    })
}

/// Run `send` up to `1 + DEFAULT_RETRIES` times with growing backoff
/// between attempts, returning the last error once the budget is spent.
pub fn request_with_retry<F>(mut send: F) -> Result<ureq::Response, Box<dyn Error>>
where
    F: FnMut() -> Result<ureq::Response, ureq::Error>,
{
    let mut attempt = 0;
    loop {
        match send() {
            Ok(res) => return Ok(res),
            Err(err) => {
                if attempt == DEFAULT_RETRIES {
                    return Err(err.into());
                }
                thread::sleep(Duration::from_millis(BACKOFF_MS * (attempt as u64 + 1)));
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_retry_returns_first_success() {
        let calls = Cell::new(0u32);
        let result = request_with_retry(|| {
            calls.set(calls.get() + 1);
            if calls.get() < 2 {
                Err(ureq::Error::Status(
                    500,
                    ureq::Response::new(500, "Internal Server Error", "boom").unwrap(),
                ))
            } else {
                Ok(ureq::Response::new(200, "OK", "fine").unwrap())
            }
        });

        assert!(result.is_ok());
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_retry_gives_up_after_budget() {
        let calls = Cell::new(0u32);
        let result = request_with_retry(|| {
            calls.set(calls.get() + 1);
            Err(ureq::Error::Status(
                503,
                ureq::Response::new(503, "Service Unavailable", "down").unwrap(),
            ))
        });

        assert!(result.is_err());
        assert_eq!(calls.get(), 1 + DEFAULT_RETRIES);
    }
}
