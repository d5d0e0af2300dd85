use std::path::PathBuf;
use thiserror::Error;

use crate::host::WindowId;
use crate::tracker::TabId;

/// Failures reported by the browser host
#[derive(Debug, Error)]
pub enum HostError {
    #[error("no tab with id {0}")]
    TabNotFound(TabId),

    #[error("no window with id {0}")]
    WindowNotFound(WindowId),

    #[error("host bridge disconnected")]
    Disconnected,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid chat host pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("quiet threshold ({quiet_ms}ms) exceeds settle window ({settle_ms}ms)")]
    QuietExceedsWindow { quiet_ms: u64, settle_ms: u64 },
}
