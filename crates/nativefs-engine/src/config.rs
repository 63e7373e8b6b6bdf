//! Engine configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the local engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Platform name reported in capability errors.
    pub platform: String,
    /// Application name used to derive cache and data directories.
    pub app_name: String,
    /// Directory served as the asset bundle. Asset operations are
    /// unsupported when unset.
    pub assets_dir: Option<PathBuf>,
    /// Directory holding resource bundles. Defaults to the executable's
    /// directory.
    pub bundle_dir: Option<PathBuf>,
    /// Overall request timeout. Unset lets long transfers run to completion.
    pub timeout: Option<Duration>,
    /// Connection establishment timeout.
    pub connect_timeout: Duration,
    /// User agent string.
    pub user_agent: String,
    /// Size of the chunks uploads are streamed in; one progress event is
    /// published per chunk.
    pub upload_chunk_size: usize,
}

impl EngineConfig {
    /// Returns a config serving assets from `assets_dir`.
    #[must_use]
    pub fn with_assets_dir(mut self, assets_dir: impl Into<PathBuf>) -> Self {
        self.assets_dir = Some(assets_dir.into());
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            platform: std::env::consts::OS.to_string(),
            app_name: "nativefs".to_string(),
            assets_dir: None,
            bundle_dir: None,
            timeout: None,
            connect_timeout: Duration::from_secs(10),
            user_agent: format!("nativefs/{}", env!("CARGO_PKG_VERSION")),
            upload_chunk_size: 64 * 1024,
        }
    }
}
