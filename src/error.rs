use std::path::PathBuf;

use thiserror::Error;

/// The environment handing out asset URLs went away, e.g. the extension was
/// reloaded under a live page. Never recovers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("host context invalidated")]
    ContextInvalidated,
}

/// Playback failures. Logged at most, never fed back into behavior.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    /// Autoplay policy refused playback before any user gesture.
    #[error("playback blocked until user interaction")]
    Blocked,

    #[error("failed to load audio resource: {0}")]
    Resource(String),
}

/// Reading a page snapshot or a config file.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
