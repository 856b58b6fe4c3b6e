//! Timeout wrapper for browser steps
//!
//! Every navigation and click attempt runs under an explicit deadline so a
//! stuck page can never hang the session.

use std::future::Future;
use std::time::Duration;

use super::scrape_types::{ScrapeError, ScrapeResult};

/// Run `operation` with a deadline.
///
/// Reaching the deadline is reported as a navigation failure against `target`,
/// which makes it retryable.
pub async fn with_timeout<F, T>(
    operation: F,
    timeout: Duration,
    operation_name: &str,
    target: &str,
) -> ScrapeResult<T>
where
    F: Future<Output = ScrapeResult<T>>,
{
    match tokio::time::timeout(timeout, operation).await {
        Ok(result) => result,
        Err(_) => Err(ScrapeError::navigation(
            target,
            format!("{operation_name} timeout after {}ms", timeout.as_millis()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn deadline_becomes_navigation_error() {
        let result: ScrapeResult<()> = with_timeout(
            async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(())
            },
            Duration::from_secs(1),
            "page load",
            "https://example.com",
        )
        .await;

        match result {
            Err(ScrapeError::Navigation { url, reason }) => {
                assert_eq!(url, "https://example.com");
                assert!(reason.contains("page load timeout"));
            }
            other => panic!("expected navigation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn inner_result_passes_through() {
        let ok = with_timeout(async { Ok(7) }, Duration::from_secs(1), "op", "t").await;
        assert_eq!(ok, Ok(7));

        let err: ScrapeResult<()> = with_timeout(
            async { Err(ScrapeError::Interaction("gone".into())) },
            Duration::from_secs(1),
            "op",
            "t",
        )
        .await;
        assert_eq!(err, Err(ScrapeError::Interaction("gone".into())));
    }
}
