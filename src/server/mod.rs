// Server module entry point
// Binds the listener and runs the accept/dispatch loop

pub mod connection;
pub mod listener;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::{AppState, Config};
use crate::logger;

pub use listener::create_listener;

/// A bound static file server.
///
/// Owns the listener and the request-handler state explicitly; nothing is
/// registered in any process-global routing table. The lifecycle is two
/// states: bound (after [`Server::bind`]) and serving (inside
/// [`Server::serve`], until a fatal listener error).
pub struct Server {
    listener: TcpListener,
    state: Arc<AppState>,
}

impl Server {
    /// Bind the given address. Failure here is fatal to startup.
    pub fn bind(config: &Config, addr: SocketAddr) -> io::Result<Self> {
        let listener = listener::create_listener(addr)?;
        Ok(Self {
            listener,
            state: Arc::new(AppState::new(config)),
        })
    }

    /// The address actually bound (resolves port 0 to the assigned port)
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections and dispatch each to its own task.
    ///
    /// Blocks the calling task forever; only a fatal listener error
    /// returns, and the caller is expected to terminate the process.
    pub async fn serve(self) -> io::Result<()> {
        loop {
            let (stream, _peer) = self.listener.accept().await?;
            connection::spawn_serve(stream, &self.state);
        }
    }
}

/// Resolve the listen address, bind, log startup, and serve forever.
pub async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = config.socket_addr()?;
    let server = Server::bind(&config, addr)?;
    let bound = server.local_addr()?;
    logger::log_server_start(&bound, &config);

    server.serve().await?;
    Ok(())
}
