//! Wall-clock limit for remote work
//!
//! Remote reads can't be cancelled, so on timeout the worker is abandoned and
//! the process exits without waiting for it.

use anyhow::{bail, Result};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

/// Run `work`, failing if it takes longer than `limit`
///
/// With no limit the work runs on the calling thread.
pub fn run_with_deadline<T, F>(limit: Option<Duration>, work: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let Some(limit) = limit else {
        return Ok(work());
    };

    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name("itemscan-worker".to_string())
        .spawn(move || {
            // Receiver is gone after a timeout
            let _ = tx.send(work());
        })?;

    match rx.recv_timeout(limit) {
        Ok(value) => Ok(value),
        Err(RecvTimeoutError::Timeout) => {
            bail!("Timed out after {:.1}s", limit.as_secs_f64())
        }
        Err(RecvTimeoutError::Disconnected) => bail!("Worker thread panicked"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_limit_runs_inline() {
        let caller = thread::current().id();
        let ran_on = run_with_deadline(None, move || thread::current().id()).unwrap();
        assert_eq!(ran_on, caller);
    }

    #[test]
    fn test_result_within_limit() {
        let value = run_with_deadline(Some(Duration::from_secs(5)), || 6 * 7).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_timeout() {
        let err = run_with_deadline(Some(Duration::from_millis(20)), || {
            thread::sleep(Duration::from_secs(2));
        })
        .unwrap_err();
        assert!(err.to_string().starts_with("Timed out"));
    }

    #[test]
    fn test_worker_panic() {
        let err = run_with_deadline(Some(Duration::from_secs(5)), || -> u32 {
            panic!("boom");
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "Worker thread panicked");
    }
}
