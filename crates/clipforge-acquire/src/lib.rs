//! Multi-strategy media acquisition.
//!
//! A single source URL may be blocked, rate-limited, or served
//! inconsistently depending on the network path, so acquisition runs as an
//! ordered chain of strategies behind one trait:
//!
//! 1. `yt-dlp` with per-profile client identities (web, android, ios)
//! 2. direct streaming HTTP download
//! 3. remote extraction relay API
//! 4. headless-browser proxy (when a browser engine is available)
//!
//! The chain tries each strategy under its own timeout, sanity-checks
//! results, cleans up partial artifacts, and reports every individual
//! failure when the whole chain is exhausted.

pub mod browser;
pub mod chain;
pub mod direct;
pub mod error;
pub mod fetch;
pub mod identity;
pub mod inspect;
pub mod quality;
pub mod relay;
pub mod request;
pub mod strategy;
pub mod ytdlp;

pub use browser::{BrowserProbe, BrowserProxyStrategy};
pub use chain::{ChainConfig, StrategyChain};
pub use direct::DirectHttpStrategy;
pub use error::{AcquireError, AcquireResult, AggregateFailure, StrategyFailure};
pub use identity::{default_profiles, IdentityProfile};
pub use inspect::{MediaInspector, YtDlpInspector};
pub use quality::Quality;
pub use relay::RelayApiStrategy;
pub use request::{DownloadRequest, MediaArtifact};
pub use strategy::AcquisitionStrategy;
pub use ytdlp::YtDlpStrategy;
