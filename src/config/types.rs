// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure
///
/// Built once at process start and immutable afterwards. The original
/// deployment shipped several near-duplicate server binaries that differed
/// only in where the port and root directory came from; a single `Config`
/// with a recorded [`PortSource`] replaces all of them.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub site: SiteConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Where the effective port came from. Not read from the config file.
    #[serde(skip)]
    pub port_source: PortSource,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Served site configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    /// Root directory exposed for read-only serving.
    ///
    /// Existence is not checked at startup; a missing root surfaces as
    /// per-request 404s.
    pub root: PathBuf,
    /// File names tried, in order, when a directory is requested.
    #[serde(default = "default_index_files")]
    pub index_files: Vec<String>,
}

fn default_index_files() -> Vec<String> {
    vec!["index.html".to_string(), "index.htm".to_string()]
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct LoggingConfig {
    /// Info log file path (optional, stdout if not set)
    #[serde(default)]
    pub log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

/// Origin of the bound port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PortSource {
    /// Hardcoded default or config file value
    #[default]
    Literal,
    /// Positional command-line argument
    Arg,
    /// `PORT` environment variable
    Env,
}

impl std::fmt::Display for PortSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Literal => f.write_str("literal"),
            Self::Arg => f.write_str("arg"),
            Self::Env => f.write_str("env"),
        }
    }
}
