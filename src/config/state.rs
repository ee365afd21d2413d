// Application state module
// Immutable per-server state shared across request handlers

use std::path::PathBuf;

use super::types::Config;

/// Application state
///
/// Owned by the running server and shared with connection tasks behind an
/// `Arc`. Every field is read-only for the process lifetime; request
/// handling holds no mutable shared state and needs no locks.
pub struct AppState {
    /// Root directory exposed for serving
    pub root: PathBuf,
    /// Index file names tried for directory requests
    pub index_files: Vec<String>,
}

impl AppState {
    /// Create `AppState` from resolved configuration
    pub fn new(config: &Config) -> Self {
        Self {
            root: config.site.root.clone(),
            index_files: config.site.index_files.clone(),
        }
    }
}
