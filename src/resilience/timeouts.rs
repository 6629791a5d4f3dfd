//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap codec calls with a deadline
//! - Cancel operations cleanly on timeout
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - An elapsed deadline surfaces as `io::ErrorKind::TimedOut` so callers
//!   handle it like any other I/O failure

use std::future::Future;
use std::io;
use std::time::Duration;

/// Run `fut` with a deadline of `timeout`.
pub async fn with_deadline<T, F>(timeout: Duration, fut: F) -> io::Result<T>
where
    F: Future<Output = io::Result<T>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(io::Error::new(
            io::ErrorKind::TimedOut,
            format!("operation timed out after {:?}", timeout),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn passes_through_result() {
        let ok = with_deadline(Duration::from_secs(1), async { Ok::<_, io::Error>(7) }).await;
        assert_eq!(ok.unwrap(), 7);

        let err = with_deadline(Duration::from_secs(1), async {
            Err::<(), _>(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
        })
        .await;
        assert_eq!(err.unwrap_err().kind(), io::ErrorKind::BrokenPipe);
    }

    #[tokio::test]
    async fn elapsed_is_timed_out() {
        let err = with_deadline(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, io::Error>(())
        })
        .await
        .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::TimedOut);
    }
}
