//! Request dispatch module
//!
//! Entry point for HTTP request processing, responsible for method validation,
//! path decoding, and handing off to the static file handler.

use crate::config::AppState;
use crate::handler::static_files;
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response};
use percent_encoding::percent_decode_str;
use std::convert::Infallible;
use std::sync::Arc;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    /// Decoded request path, used for filesystem resolution
    pub path: &'a str,
    /// Original request path as sent on the wire, used in redirects
    pub raw_path: &'a str,
    pub is_head: bool,
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method();
    let raw_path = req.uri().path();
    let is_head = *method == Method::HEAD;

    // 1. Check HTTP method
    if let Some(resp) = check_http_method(method) {
        return Ok(resp);
    }

    // 2. Decode the percent-encoded request path
    let path = match percent_decode_str(raw_path).decode_utf8() {
        Ok(p) => p,
        Err(_) => {
            logger::log_warning(&format!("Undecodable request path: {raw_path}"));
            return Ok(http::build_400_response());
        }
    };

    let ctx = RequestContext {
        path: &path,
        raw_path,
        is_head,
    };

    Ok(static_files::serve(&ctx, &state).await)
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method) -> Option<Response<Full<Bytes>>> {
    match method {
        &Method::GET | &Method::HEAD => None,
        &Method::OPTIONS => Some(http::build_options_response()),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}
