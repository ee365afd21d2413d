//! Static file serving module
//!
//! Maps request paths to filesystem paths under the configured root and
//! builds the corresponding responses: files, index files, directory
//! listings, redirects, and error statuses.

use crate::config::AppState;
use crate::handler::listing;
use crate::handler::router::RequestContext;
use crate::http::{self, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::io;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// Serve the request path from the configured root
pub async fn serve(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    let Some(relative) = sanitize_request_path(ctx.path) else {
        logger::log_warning(&format!("Path traversal attempt blocked: {}", ctx.path));
        return http::build_404_response();
    };

    let full_path = state.root.join(relative);

    let metadata = match fs::metadata(&full_path).await {
        Ok(m) => m,
        Err(e) => return error_response(&full_path, &e),
    };

    if metadata.is_dir() {
        return serve_dir(ctx, state, &full_path).await;
    }

    serve_existing_file(ctx, state, &full_path).await
}

/// Map a decoded request path to a relative filesystem path.
///
/// Keeps only normal components; any parent-directory, root, or prefix
/// component rejects the whole path, so the result always joins cleanly
/// under the serving root.
pub fn sanitize_request_path(path: &str) -> Option<PathBuf> {
    let mut clean = PathBuf::new();
    for component in Path::new(path.trim_start_matches('/')).components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(clean)
}

/// Serve a directory: redirect to the slashed form, then try index files,
/// then fall back to a generated listing
async fn serve_dir(
    ctx: &RequestContext<'_>,
    state: &AppState,
    dir: &Path,
) -> Response<Full<Bytes>> {
    // Directory URLs are canonical only with a trailing slash
    if !ctx.path.ends_with('/') {
        return http::build_redirect_response(&format!("{}/", ctx.raw_path));
    }

    for index_file in &state.index_files {
        let candidate = dir.join(index_file);
        if let Ok(m) = fs::metadata(&candidate).await {
            if m.is_file() {
                return serve_existing_file(ctx, state, &candidate).await;
            }
        }
    }

    match listing::collect(dir).await {
        Ok(entries) => {
            let html = listing::render(ctx.path, &entries);
            http::build_html_response(html, ctx.is_head)
        }
        Err(e) => error_response(dir, &e),
    }
}

/// Read a file known to exist and build the 200 response
async fn serve_existing_file(
    ctx: &RequestContext<'_>,
    state: &AppState,
    file_path: &Path,
) -> Response<Full<Bytes>> {
    // Security: the canonical path must stay within the canonical root.
    // Also catches symlinks pointing outside the served tree.
    let root_canonical = match state.root.canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Serving root not found or inaccessible '{}': {e}",
                state.root.display()
            ));
            return http::build_404_response();
        }
    };

    let file_canonical = match file_path.canonicalize() {
        Ok(p) => p,
        Err(e) => return error_response(file_path, &e),
    };

    if !file_canonical.starts_with(&root_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            ctx.path,
            file_canonical.display()
        ));
        return http::build_404_response();
    }

    let content = match fs::read(file_path).await {
        Ok(c) => c,
        Err(e) => return error_response(file_path, &e),
    };

    let content_type = mime::content_type_for(file_path.extension().and_then(|e| e.to_str()));
    http::build_file_response(Bytes::from(content), content_type, ctx.is_head)
}

/// Map a filesystem error to the response the client sees.
///
/// Per-request errors are never fatal to the process.
fn error_response(path: &Path, err: &io::Error) -> Response<Full<Bytes>> {
    match err.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => http::build_404_response(),
        io::ErrorKind::PermissionDenied => {
            logger::log_warning(&format!("Permission denied: {}", path.display()));
            http::build_403_response()
        }
        _ => {
            logger::log_error(&format!("Failed to read '{}': {err}", path.display()));
            http::build_500_response()
        }
    }
}
