//! Client identity profiles.
//!
//! YouTube serves different network paths differently depending on the
//! claimed client. Instead of near-duplicate downloader implementations, one
//! yt-dlp strategy is parameterized by an identity profile and the chain
//! holds an ordered list of profiles.

/// One simulated client identity for the command-line extractor.
#[derive(Debug, Clone)]
pub struct IdentityProfile {
    /// Short name, used in the strategy name (`ytdlp_<name>`)
    pub name: &'static str,
    /// User-Agent header value
    pub user_agent: &'static str,
    /// yt-dlp `player_client` extractor hint
    pub player_client: &'static str,
    /// Whether to inject the Netscape cookies file when available
    pub use_cookies: bool,
}

/// Default profile order: the browser identity first (works for most
/// sources), then mobile clients which dodge some datacenter-IP blocks.
pub fn default_profiles() -> Vec<IdentityProfile> {
    vec![
        IdentityProfile {
            name: "web",
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
            player_client: "web",
            use_cookies: true,
        },
        IdentityProfile {
            name: "android",
            user_agent: "com.google.android.youtube/19.09.37 (Linux; U; Android 14) gzip",
            player_client: "android",
            use_cookies: false,
        },
        IdentityProfile {
            name: "ios",
            user_agent: "com.google.ios.youtube/19.09.3 (iPhone16,2; U; CPU iOS 17_4 like Mac OS X)",
            player_client: "ios",
            use_cookies: false,
        },
    ]
}
