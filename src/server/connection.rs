// Connection handling module
// Serves a single accepted TCP connection

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::sync::Arc;

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Serve one connection on a spawned task.
///
/// hyper owns HTTP/1.1 parsing and keep-alive; every request on the
/// connection is dispatched to the static file handler with shared
/// read-only state. Connection-level errors are logged and never fatal
/// to the process.
pub fn spawn_serve(stream: tokio::net::TcpStream, state: &Arc<AppState>) {
    let state = Arc::clone(state);
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let conn = http1::Builder::new().serve_connection(
            io,
            service_fn(move |req| {
                let state = Arc::clone(&state);
                async move { handler::handle_request(req, state).await }
            }),
        );

        if let Err(err) = conn.await {
            logger::log_connection_error(&err);
        }
    });
}
