//! staticd - a unified static file server.
//!
//! Serves a single root directory over plain HTTP/1.1. Protocol parsing and
//! per-connection concurrency are delegated to hyper and tokio; this crate
//! resolves configuration, maps request paths to filesystem reads, and runs
//! the accept loop.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
