//! Application state and runtime assembly.

use std::sync::Arc;

use clipforge_acquire::{
    browser::DEFAULT_PROXY_PAGE, default_profiles, AcquisitionStrategy, BrowserProbe,
    BrowserProxyStrategy, ChainConfig, DirectHttpStrategy, RelayApiStrategy, StrategyChain,
    YtDlpInspector, YtDlpStrategy,
};
use clipforge_engine::{task_channel, EngineConfig, Orchestrator, StubSelector, TaskRunner};
use clipforge_store::MemoryStore;

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub config: ApiConfig,
}

impl AppState {
    /// Assemble the full runtime: store, strategy chain, orchestrator.
    ///
    /// Returns the state plus the task runner the caller must spawn.
    pub fn new(config: ApiConfig, engine_config: EngineConfig) -> (Self, TaskRunner) {
        let store = Arc::new(MemoryStore::new());
        let chain = Arc::new(build_chain(&engine_config));
        let (dispatcher, runner) = task_channel();

        let orchestrator = Orchestrator::new(
            store.clone(),
            store,
            chain,
            Arc::new(YtDlpInspector::new()),
            Arc::new(StubSelector::new()),
            dispatcher,
            engine_config,
        );

        (
            Self {
                orchestrator,
                config,
            },
            runner,
        )
    }
}

/// The default acquisition chain, in priority order: yt-dlp across the
/// identity profiles, then direct HTTP, then the relay API, then the
/// headless-browser proxy.
pub fn build_chain(config: &EngineConfig) -> StrategyChain {
    let mut strategies: Vec<Arc<dyn AcquisitionStrategy>> = Vec::new();

    for profile in default_profiles() {
        strategies.push(Arc::new(YtDlpStrategy::new(
            profile,
            config.cookies_file.clone(),
        )));
    }
    strategies.push(Arc::new(DirectHttpStrategy::new()));
    strategies.push(Arc::new(RelayApiStrategy::default()));
    strategies.push(Arc::new(BrowserProxyStrategy::new(
        Arc::new(BrowserProbe::new()),
        DEFAULT_PROXY_PAGE,
    )));

    StrategyChain::new(
        strategies,
        ChainConfig {
            per_strategy_timeout: config.per_strategy_timeout,
            min_artifact_bytes: config.min_artifact_bytes,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_chain_order() {
        let chain = build_chain(&EngineConfig::default());
        assert_eq!(
            chain.strategy_names(),
            vec![
                "ytdlp_web",
                "ytdlp_android",
                "ytdlp_ios",
                "direct",
                "relay",
                "browser"
            ]
        );
    }
}
