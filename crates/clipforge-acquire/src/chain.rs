//! Strategy chain runner.
//!
//! Executes acquisition strategies in a fixed priority order. Every strategy
//! call runs under its own timeout; failures and timeouts are recorded and
//! the chain continues. A success is only accepted after a file-size sanity
//! check, and partial artifacts of failed attempts are deleted before the
//! next strategy runs.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{timeout, Instant};
use tracing::{info, warn};

use crate::error::{AcquireError, AcquireResult, AggregateFailure};
use crate::request::{DownloadRequest, MediaArtifact};
use crate::strategy::AcquisitionStrategy;

/// Chain-level configuration.
#[derive(Debug, Clone)]
pub struct ChainConfig {
    /// Upper bound for a single strategy execution.
    pub per_strategy_timeout: Duration,
    /// Minimum artifact size; anything smaller is likely an error page.
    pub min_artifact_bytes: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            per_strategy_timeout: Duration::from_secs(300),
            // Under 10KB is almost certainly an error page, not video
            min_artifact_bytes: 10 * 1024,
        }
    }
}

/// Ordered set of acquisition strategies for one deployment.
pub struct StrategyChain {
    strategies: Vec<Arc<dyn AcquisitionStrategy>>,
    config: ChainConfig,
}

impl StrategyChain {
    pub fn new(strategies: Vec<Arc<dyn AcquisitionStrategy>>, config: ChainConfig) -> Self {
        Self { strategies, config }
    }

    /// Names of the strategies in priority order.
    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Whether a strategy with this name exists in the chain.
    pub fn has_strategy(&self, name: &str) -> bool {
        self.strategies.iter().any(|s| s.name() == name)
    }

    /// Run the full chain: first accepted artifact wins.
    pub async fn acquire(
        &self,
        request: &DownloadRequest,
    ) -> Result<MediaArtifact, AggregateFailure> {
        self.run(&self.strategies, request).await
    }

    /// Run exactly one pinned strategy, bypassing the chain order.
    pub async fn acquire_with(
        &self,
        name: &str,
        request: &DownloadRequest,
    ) -> Result<MediaArtifact, AggregateFailure> {
        let pinned: Vec<Arc<dyn AcquisitionStrategy>> = self
            .strategies
            .iter()
            .filter(|s| s.name() == name)
            .cloned()
            .collect();

        if pinned.is_empty() {
            let mut failure = AggregateFailure::default();
            failure.push(
                name,
                AcquireError::UnknownStrategy(name.to_string()),
                Duration::ZERO,
            );
            return Err(failure);
        }

        self.run(&pinned, request).await
    }

    async fn run(
        &self,
        strategies: &[Arc<dyn AcquisitionStrategy>],
        request: &DownloadRequest,
    ) -> Result<MediaArtifact, AggregateFailure> {
        let mut failure = AggregateFailure::default();

        for strategy in strategies {
            let name = strategy.name().to_string();
            let dest = strategy.artifact_path(request);
            let started = Instant::now();

            info!(
                strategy = %name,
                url = %request.url,
                "Trying acquisition strategy"
            );

            let outcome = timeout(
                self.config.per_strategy_timeout,
                strategy.fetch(request, &dest),
            )
            .await;

            let elapsed = started.elapsed();

            let error = match outcome {
                Ok(Ok(())) => match self.accept(&dest).await {
                    Ok(size_bytes) => {
                        info!(
                            strategy = %name,
                            path = %dest.display(),
                            size_mb = size_bytes as f64 / 1_048_576.0,
                            elapsed_secs = elapsed.as_secs(),
                            "Acquisition strategy succeeded"
                        );
                        return Ok(MediaArtifact {
                            path: dest,
                            size_bytes,
                            strategy: name,
                            elapsed,
                        });
                    }
                    Err(e) => e,
                },
                Ok(Err(e)) => e,
                Err(_) => AcquireError::Timeout(self.config.per_strategy_timeout),
            };

            warn!(
                strategy = %name,
                elapsed_secs = elapsed.as_secs(),
                "Acquisition strategy failed: {}",
                error
            );

            // No orphaned partial downloads between attempts
            remove_partial(&dest).await;

            failure.push(name, error, elapsed);
        }

        Err(failure)
    }

    /// Sanity-check a claimed success: the file must exist and be at least
    /// the configured minimum size.
    async fn accept(&self, dest: &std::path::Path) -> AcquireResult<u64> {
        let metadata = tokio::fs::metadata(dest)
            .await
            .map_err(|_| AcquireError::download_failed("Output file not created"))?;

        let size = metadata.len();
        if size < self.config.min_artifact_bytes {
            return Err(AcquireError::SanityCheckFailed {
                size,
                min: self.config.min_artifact_bytes,
            });
        }

        Ok(size)
    }
}

async fn remove_partial(dest: &std::path::Path) {
    if tokio::fs::remove_file(dest).await.is_ok() {
        warn!(path = %dest.display(), "Removed partial artifact");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::quality::Quality;

    /// Test double: either writes a file of `size` bytes or fails.
    struct FakeStrategy {
        name: String,
        succeed: bool,
        size: usize,
        calls: AtomicUsize,
    }

    impl FakeStrategy {
        fn ok(name: &str, size: usize) -> Self {
            Self {
                name: name.to_string(),
                succeed: true,
                size,
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(name: &str) -> Self {
            Self {
                name: name.to_string(),
                succeed: false,
                size: 0,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AcquisitionStrategy for FakeStrategy {
        fn name(&self) -> &str {
            &self.name
        }

        async fn fetch(&self, _request: &DownloadRequest, dest: &PathBuf) -> AcquireResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.succeed {
                tokio::fs::write(dest, vec![0u8; self.size]).await?;
                Ok(())
            } else {
                // Simulate a partial write before the failure
                tokio::fs::write(dest, b"partial").await?;
                Err(AcquireError::download_failed("blocked"))
            }
        }
    }

    fn request(dir: &std::path::Path) -> DownloadRequest {
        DownloadRequest::new(
            "https://youtube.com/watch?v=abc123def45",
            Quality::P720,
            dir,
            "p1",
        )
    }

    fn chain_config() -> ChainConfig {
        ChainConfig {
            per_strategy_timeout: Duration::from_secs(5),
            min_artifact_bytes: 1024,
        }
    }

    #[tokio::test]
    async fn test_first_success_stops_the_chain() {
        let dir = tempfile::tempdir().unwrap();
        let s1 = Arc::new(FakeStrategy::failing("one"));
        let s2 = Arc::new(FakeStrategy::ok("two", 4096));
        let s3 = Arc::new(FakeStrategy::ok("three", 4096));

        let chain = StrategyChain::new(
            vec![s1.clone(), s2.clone(), s3.clone()],
            chain_config(),
        );

        let artifact = chain.acquire(&request(dir.path())).await.unwrap();
        assert_eq!(artifact.strategy, "two");
        assert_eq!(artifact.size_bytes, 4096);

        // Exactly strategies 1..k were invoked, k+1..N were not
        assert_eq!(s1.calls(), 1);
        assert_eq!(s2.calls(), 1);
        assert_eq!(s3.calls(), 0);
    }

    #[tokio::test]
    async fn test_exhaustion_reports_every_failure() {
        let dir = tempfile::tempdir().unwrap();
        let s1 = Arc::new(FakeStrategy::failing("one"));
        let s2 = Arc::new(FakeStrategy::failing("two"));

        let chain = StrategyChain::new(vec![s1, s2], chain_config());

        let failure = chain.acquire(&request(dir.path())).await.unwrap_err();
        assert_eq!(failure.attempts.len(), 2);
        assert_eq!(failure.attempts[0].strategy, "one");
        assert_eq!(failure.attempts[1].strategy, "two");
    }

    #[tokio::test]
    async fn test_undersized_artifact_is_discarded_and_chain_continues() {
        let dir = tempfile::tempdir().unwrap();
        let tiny = Arc::new(FakeStrategy::ok("tiny", 16)); // below the 1024 minimum
        let good = Arc::new(FakeStrategy::ok("good", 4096));

        let chain = StrategyChain::new(vec![tiny.clone(), good.clone()], chain_config());

        let req = request(dir.path());
        let artifact = chain.acquire(&req).await.unwrap();
        assert_eq!(artifact.strategy, "good");

        // The rejected artifact was removed
        let tiny_path = tiny.artifact_path(&req);
        assert!(!tiny_path.exists());

        let failure_only = chain
            .acquire_with("tiny", &req)
            .await
            .unwrap_err();
        assert!(matches!(
            failure_only.attempts[0].error,
            AcquireError::SanityCheckFailed { .. }
        ));
    }

    #[tokio::test]
    async fn test_partial_artifacts_removed_between_attempts() {
        let dir = tempfile::tempdir().unwrap();
        let bad = Arc::new(FakeStrategy::failing("bad"));
        let chain = StrategyChain::new(vec![bad.clone()], chain_config());

        let req = request(dir.path());
        chain.acquire(&req).await.unwrap_err();

        assert!(!bad.artifact_path(&req).exists());
    }

    #[tokio::test]
    async fn test_pinned_strategy_runs_exactly_one() {
        let dir = tempfile::tempdir().unwrap();
        let s1 = Arc::new(FakeStrategy::ok("one", 4096));
        let s2 = Arc::new(FakeStrategy::ok("two", 4096));

        let chain = StrategyChain::new(vec![s1.clone(), s2.clone()], chain_config());

        let artifact = chain
            .acquire_with("two", &request(dir.path()))
            .await
            .unwrap();
        assert_eq!(artifact.strategy, "two");
        assert_eq!(s1.calls(), 0);
        assert_eq!(s2.calls(), 1);
    }

    #[tokio::test]
    async fn test_pinning_unknown_strategy_fails() {
        let dir = tempfile::tempdir().unwrap();
        let chain = StrategyChain::new(
            vec![Arc::new(FakeStrategy::ok("one", 4096)) as Arc<dyn AcquisitionStrategy>],
            chain_config(),
        );

        let failure = chain
            .acquire_with("nope", &request(dir.path()))
            .await
            .unwrap_err();
        assert!(matches!(
            failure.attempts[0].error,
            AcquireError::UnknownStrategy(_)
        ));
    }

    #[tokio::test]
    async fn test_timed_out_strategy_leaves_no_artifact_behind() {
        /// Writes its artifact only after a long delay, like a subprocess
        /// that finishes after the chain gave up on it.
        struct LateWriter;

        #[async_trait]
        impl AcquisitionStrategy for LateWriter {
            fn name(&self) -> &str {
                "late"
            }

            async fn fetch(&self, _r: &DownloadRequest, dest: &PathBuf) -> AcquireResult<()> {
                tokio::time::sleep(Duration::from_secs(60)).await;
                tokio::fs::write(dest, vec![0u8; 4096]).await?;
                Ok(())
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let late = Arc::new(LateWriter) as Arc<dyn AcquisitionStrategy>;
        let chain = StrategyChain::new(
            vec![late.clone()],
            ChainConfig {
                per_strategy_timeout: Duration::from_millis(50),
                min_artifact_bytes: 1024,
            },
        );

        let req = request(dir.path());
        let failure = chain.acquire(&req).await.unwrap_err();
        assert!(matches!(failure.attempts[0].error, AcquireError::Timeout(_)));

        // Dropping the attempt cancels the writer; nothing may reappear at
        // the artifact path after cleanup ran.
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!late.artifact_path(&req).exists());
    }

    #[tokio::test]
    async fn test_slow_strategy_times_out_and_chain_continues() {
        struct SlowStrategy;

        #[async_trait]
        impl AcquisitionStrategy for SlowStrategy {
            fn name(&self) -> &str {
                "slow"
            }

            async fn fetch(&self, _r: &DownloadRequest, _d: &PathBuf) -> AcquireResult<()> {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(())
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let good = Arc::new(FakeStrategy::ok("good", 4096));
        let chain = StrategyChain::new(
            vec![Arc::new(SlowStrategy), good.clone()],
            ChainConfig {
                per_strategy_timeout: Duration::from_millis(50),
                min_artifact_bytes: 1024,
            },
        );

        let artifact = chain.acquire(&request(dir.path())).await.unwrap();
        assert_eq!(artifact.strategy, "good");
    }
}
