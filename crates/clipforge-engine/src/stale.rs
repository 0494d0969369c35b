//! Stuck-job detection.
//!
//! A crash or deploy mid-acquisition leaves projects parked in `processing`
//! with no task working them. The detector periodically asks the
//! orchestrator to resume anything that has not been touched within the
//! staleness threshold.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use crate::config::EngineConfig;
use crate::orchestrator::Orchestrator;

/// Periodic scanner for abandoned `processing` projects.
pub struct StuckJobDetector {
    orchestrator: Arc<Orchestrator>,
    interval: Duration,
    enabled: bool,
}

impl StuckJobDetector {
    pub fn new(orchestrator: Arc<Orchestrator>, config: &EngineConfig) -> Self {
        Self {
            orchestrator,
            interval: config.detector_interval,
            enabled: config.detector_enabled,
        }
    }

    /// Run the detection loop until the process shuts down.
    pub async fn run(self) {
        if !self.enabled {
            info!("Stuck-job detection disabled");
            return;
        }

        info!(interval_secs = self.interval.as_secs(), "Stuck-job detector started");
        let mut ticker = tokio::time::interval(self.interval);
        // First tick fires immediately; skip it so a restart does not race
        // jobs the previous process had just dispatched.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            self.check_once().await;
        }
    }

    /// One scan pass.
    pub async fn check_once(&self) {
        match self.orchestrator.scan_stuck().await {
            Ok(0) => {}
            Ok(resumed) => info!(resumed, "Stuck-job scan resumed projects"),
            Err(e) => error!("Stuck-job scan failed: {}", e),
        }
    }
}
