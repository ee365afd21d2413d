// Configuration module entry point
// Resolves process configuration from defaults, config file, environment and CLI

mod state;
mod types;

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

// Re-export public types
pub use state::AppState;
pub use types::{Config, LoggingConfig, PortSource, ServerConfig, SiteConfig};

/// Command-line interface
///
/// Zero, one or two positional arguments. The positionals reproduce the
/// argument-driven flavors of the original server family.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "staticd", version, about = "Serve a directory of files over plain HTTP")]
pub struct Cli {
    /// Directory to serve (defaults to ./public)
    pub root: Option<PathBuf>,

    /// Port to bind (defaults to 8080)
    pub port: Option<u16>,

    /// Config file stem, e.g. "config" for config.toml
    #[arg(short, long)]
    pub config: Option<String>,
}

impl Config {
    /// Resolve the full configuration for this process.
    ///
    /// Precedence, highest first: positional CLI arguments, the `PORT`
    /// environment variable, the config file / `SERVER_*` environment,
    /// built-in defaults.
    pub fn load(cli: &Cli) -> Result<Self, config::ConfigError> {
        let mut cfg = Self::load_from(cli.config.as_deref().unwrap_or("config"))?;
        cfg.apply_overrides(cli, std::env::var("PORT").ok().as_deref())?;
        Ok(cfg)
    }

    /// Load configuration from specified file path (without extension)
    /// Default config file is "config.toml" when no path specified
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("SERVER"))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("site.root", "./public")?
            .build()?;

        settings.try_deserialize()
    }

    /// Apply CLI and `PORT` overrides, recording the port's origin.
    fn apply_overrides(
        &mut self,
        cli: &Cli,
        env_port: Option<&str>,
    ) -> Result<(), config::ConfigError> {
        if let Some(ref root) = cli.root {
            self.site.root.clone_from(root);
        }

        if let Some(port) = cli.port {
            self.server.port = port;
            self.port_source = PortSource::Arg;
        } else if let Some(raw) = env_port {
            let port = raw.parse::<u16>().map_err(|e| {
                config::ConfigError::Message(format!("invalid PORT value '{raw}': {e}"))
            })?;
            self.server.port = port;
            self.port_source = PortSource::Env;
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, config::ConfigError> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| config::ConfigError::Message(format!("Invalid listen address: {e}")))
    }
}
